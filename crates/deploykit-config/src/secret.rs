//! Secret values read from the environment

use serde::{Serialize, Serializer};
use std::fmt;

const REDACTED: &str = "<redacted>";

/// A string that never shows up in `Debug`, `Display` or serialized output.
///
/// The raw value is only reachable through [`SecretString::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({})", REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_are_redacted() {
        let secret = SecretString::new("test test test junk");
        assert_eq!(format!("{}", secret), "<redacted>");
        assert!(!format!("{:?}", secret).contains("junk"));
        assert_eq!(secret.expose(), "test test test junk");
    }

    #[test]
    fn serializes_redacted() {
        let secret = SecretString::from("0xdeadbeef");
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, "\"<redacted>\"");
    }
}
