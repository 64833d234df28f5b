//! Outcome module - what happened after a decision was made

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a decision
///
/// Stored and serialized upper-cased. Parsing is case-insensitive, so
/// `"success"`, `"Success"` and `"SUCCESS"` all normalize to [`Outcome::Success`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Outcome {
    /// Not yet known
    Pending,

    /// The decision worked out
    Success,

    /// The decision did not work out
    Failed,

    /// Mixed results
    Partial,
}

impl Outcome {
    /// All outcomes in display order
    pub const ALL: [Outcome; 4] = [
        Outcome::Pending,
        Outcome::Success,
        Outcome::Failed,
        Outcome::Partial,
    ];

    /// Get the canonical (upper-case) name
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pending => "PENDING",
            Outcome::Success => "SUCCESS",
            Outcome::Failed => "FAILED",
            Outcome::Partial => "PARTIAL",
        }
    }

    /// Parse an outcome, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Outcome::Pending),
            "SUCCESS" => Some(Outcome::Success),
            "FAILED" => Some(Outcome::Failed),
            "PARTIAL" => Some(Outcome::Partial),
            _ => None,
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid outcome: {}", s))
    }
}

impl TryFrom<String> for Outcome {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.as_str().to_string()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Outcome::parse("success"), Some(Outcome::Success));
        assert_eq!(Outcome::parse("Failed"), Some(Outcome::Failed));
        assert_eq!(Outcome::parse(" partial "), Some(Outcome::Partial));
        assert_eq!(Outcome::parse("PENDING"), Some(Outcome::Pending));
        assert_eq!(Outcome::parse("done"), None);
        assert_eq!(Outcome::parse(""), None);
    }

    #[test]
    fn test_serialized_upper_case() {
        let json = serde_json::to_string(&Outcome::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");

        let parsed: Outcome = serde_json::from_str("\"partial\"").unwrap();
        assert_eq!(parsed, Outcome::Partial);
    }

    #[test]
    fn test_as_str_matches_parse() {
        for outcome in Outcome::ALL {
            assert_eq!(Outcome::parse(outcome.as_str()), Some(outcome));
        }
    }
}
