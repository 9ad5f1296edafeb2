//! Error types for Tread

use thiserror::Error;

/// The main error type for Tread operations
#[derive(Debug, Error)]
pub enum TreadError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Duplicate node name: {0}")]
    DuplicateNodeName(String),

    #[error("Invalid reparent: {0}")]
    InvalidReparent(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Unknown key name: {0}")]
    UnknownKey(String),

    #[error("Unknown animation clip: {0}")]
    UnknownClip(String),

    #[error("Physics error: {0}")]
    PhysicsError(String),

    #[error("Scenario error: {0}")]
    ScenarioError(String),
}

/// Result type alias for Tread operations
pub type Result<T> = std::result::Result<T, TreadError>;

impl From<toml::de::Error> for TreadError {
    fn from(err: toml::de::Error) -> Self {
        TreadError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for TreadError {
    fn from(err: toml::ser::Error) -> Self {
        TreadError::TomlSerError(err.to_string())
    }
}

impl TreadError {
    /// Range check used by config validation
    pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
        if value.is_nan() || value < min || value > max {
            return Err(TreadError::ValueOutOfRange {
                field: field.to_string(),
                min,
                max,
                value,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(TreadError::check_range("speed", 5.0, 0.0, 10.0).is_ok());
        let err = TreadError::check_range("speed", 11.0, 0.0, 10.0).unwrap_err();
        assert!(err.to_string().contains("speed"));
        assert!(TreadError::check_range("speed", f64::NAN, 0.0, 10.0).is_err());
    }
}
