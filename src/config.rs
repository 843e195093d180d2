//! Configuration types for runtime conversions.
//!
//! The typed API picks rounding by function (`convert` vs `truncate`). The
//! runtime layer takes the same choice from a [`ConvertConfig`], which can be
//! loaded from any serde format alongside the rest of a pipeline description.

use serde::{Deserialize, Serialize};

/// Rounding applied when a conversion discards fractional bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round to the nearest representable value, ties to even.
    #[default]
    Nearest,
    /// Discard the fractional part (round toward zero).
    TowardZero,
}

impl Rounding {
    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Rounding::Nearest => "nearest",
            Rounding::TowardZero => "toward_zero",
        }
    }
}

/// Configuration for [`AnyVector::convert`](crate::dynamic::AnyVector::convert).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Rounding for float-to-integer conversions.
    ///
    /// `TowardZero` is only defined for float-to-integer pairs; requesting it
    /// for any other pair is an error rather than a silent fallback.
    pub rounding: Rounding,
}

impl ConvertConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for truncating float-to-integer conversions.
    pub fn truncating() -> Self {
        Self::new().with_rounding(Rounding::TowardZero)
    }

    /// Set the rounding mode.
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert_eq!(config.rounding, Rounding::Nearest);
    }

    #[test]
    fn test_truncating_config() {
        let config = ConvertConfig::truncating();
        assert_eq!(config.rounding, Rounding::TowardZero);
        assert_eq!(config.rounding.name(), "toward_zero");
    }

    #[test]
    fn test_config_serialization() {
        let config = ConvertConfig::new().with_rounding(Rounding::TowardZero);

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"rounding":"toward_zero"}"#);

        let deserialized: ConvertConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ConvertConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.rounding, Rounding::Nearest);
    }
}
