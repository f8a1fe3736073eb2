//! Import remapping applied to source text before compilation.
//!
//! A remapping file holds one `find=replace` rule per line. Rules stay in file
//! order and the first rule that matches an import line is the only one
//! applied to it, so overlapping prefixes resolve by position in the file.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, warn};

const IMPORT_KEYWORD: &str = "import";

/// Prefix substitution for import paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemappingRule {
    pub find: String,
    pub replace: String,
}

impl RemappingRule {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Parse a single `find=replace` line. Returns `None` for blank or malformed lines.
    pub fn parse(line: &str) -> Option<Self> {
        let (find, replace) = line.trim().split_once('=')?;
        let find = find.trim();
        if find.is_empty() {
            return None;
        }
        Some(Self::new(find, replace.trim()))
    }

    fn quoted_find(&self) -> String {
        format!("\"{}", self.find)
    }

    fn quoted_replace(&self) -> String {
        format!("\"{}", self.replace)
    }

    /// Whether the quoted find prefix occurs in `line`
    pub fn matches(&self, line: &str) -> bool {
        line.contains(&self.quoted_find())
    }

    /// Replace the first quoted occurrence of the find prefix
    pub fn apply(&self, line: &str) -> String {
        line.replacen(&self.quoted_find(), &self.quoted_replace(), 1)
    }
}

/// Ordered remapping rules, first match wins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemappingTable {
    rules: Vec<RemappingRule>,
}

impl RemappingTable {
    pub fn new(rules: Vec<RemappingRule>) -> Self {
        Self { rules }
    }

    /// Parse remapping file content, skipping blank and malformed lines
    pub fn parse(content: &str) -> Self {
        let mut rules = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match RemappingRule::parse(line) {
                Some(rule) => rules.push(rule),
                None => warn!(line = index + 1, content = line, "Skipping malformed remapping"),
            }
        }
        debug!(rules = rules.len(), "Parsed remapping table");
        Self { rules }
    }

    pub fn rules(&self) -> &[RemappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule, in file order, that matches `line`
    pub fn first_match(&self, line: &str) -> Option<&RemappingRule> {
        self.rules.iter().find(|rule| rule.matches(line))
    }

    /// Rewrite a single line, see [`rewrite`]
    pub fn rewrite_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        rewrite(line, &self.rules)
    }

    /// Rewrite every line of `source`.
    ///
    /// Line terminators are carried through untouched, so the output has the
    /// same number of lines as the input.
    pub fn rewrite_source(&self, source: &str) -> String {
        let mut rewritten = 0usize;
        let output: String = source
            .split_inclusive('\n')
            .map(|line| {
                let out = self.rewrite_line(line);
                if let Cow::Owned(_) = out {
                    rewritten += 1;
                }
                out
            })
            .collect();

        if rewritten > 0 {
            debug!(rewritten, "Remapped import lines");
        }
        output
    }
}

/// Whether `line` is an import statement.
///
/// Leading whitespace is ignored and the keyword is matched case-insensitively;
/// it must be followed by whitespace.
pub fn is_import_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    match trimmed.get(..IMPORT_KEYWORD.len()) {
        Some(keyword) if keyword.eq_ignore_ascii_case(IMPORT_KEYWORD) => trimmed
            [IMPORT_KEYWORD.len()..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace),
        _ => false,
    }
}

/// Apply the first matching rule to an import line.
///
/// Non-import lines and import lines without a matching rule are returned
/// borrowed and byte-identical.
pub fn rewrite<'a>(line: &'a str, rules: &[RemappingRule]) -> Cow<'a, str> {
    if !is_import_line(line) {
        return Cow::Borrowed(line);
    }

    match rules.iter().find(|rule| rule.matches(line)) {
        Some(rule) => Cow::Owned(rule.apply(line)),
        None => Cow::Borrowed(line),
    }
}
