//! Confidence module - how sure the author was when recording a decision

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence attached to a decision, always within [0.0, 1.0]
///
/// Serialized as a bare number. Out-of-range values are rejected on
/// construction and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Create a new confidence value
    ///
    /// # Errors
    /// Returns an error if the value is NaN or outside [0, 1]
    pub fn new(value: f64) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("Confidence must be in [0, 1], got {}", value));
        }
        Ok(Self(value))
    }

    /// Get the raw value
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bounds() {
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
        assert!(Confidence::new(0.75).is_ok());
        assert!(Confidence::new(-0.1).is_err());
        assert!(Confidence::new(1.01).is_err());
        assert!(Confidence::new(f64::NAN).is_err());
    }

    #[test]
    fn test_confidence_serde() {
        let c: Confidence = serde_json::from_str("0.8").unwrap();
        assert_eq!(c.value(), 0.8);
        assert_eq!(serde_json::to_string(&c).unwrap(), "0.8");
        assert!(serde_json::from_str::<Confidence>("1.5").is_err());
    }
}
