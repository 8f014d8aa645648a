//! Provider configuration, passed from the host as JSON.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Smallest visible-frame delta (in pixels) accepted as a keyboard.
pub const DEFAULT_MIN_KEYBOARD_HEIGHT: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Deltas below this are measurement noise and report as "hidden".
    pub min_keyboard_height: i32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            min_keyboard_height: DEFAULT_MIN_KEYBOARD_HEIGHT,
        }
    }
}

impl ProviderConfig {
    /// Parse a config object. Blank input yields the defaults, missing
    /// fields fall back individually.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ProviderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.min_keyboard_height < 0 {
            return Err(ProviderError::InvalidConfig(format!(
                "min_keyboard_height must be >= 0, got {}",
                self.min_keyboard_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_json_is_default() {
        assert_eq!(ProviderConfig::from_json("").unwrap(), ProviderConfig::default());
        assert_eq!(ProviderConfig::from_json("  \n").unwrap().min_keyboard_height, 100);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = ProviderConfig::from_json("{}").unwrap();
        assert_eq!(config.min_keyboard_height, DEFAULT_MIN_KEYBOARD_HEIGHT);
    }

    #[test]
    fn explicit_threshold() {
        let config = ProviderConfig::from_json(r#"{"min_keyboard_height":150}"#).unwrap();
        assert_eq!(config.min_keyboard_height, 150);
    }

    #[test]
    fn negative_threshold_rejected() {
        let err = ProviderConfig::from_json(r#"{"min_keyboard_height":-1}"#).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = ProviderConfig::from_json("{min_keyboard_height").unwrap_err();
        assert!(matches!(err, ProviderError::Json(_)));
    }
}
