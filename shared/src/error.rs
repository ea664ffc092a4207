use thiserror::Error;
use serde_json::Error as JsonError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
pub enum SharedError {
    /// A search term or wallet that does not resolve to a player
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success HTTP status or transport failure
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Response body not in the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// A count value that is non-numeric, negative or otherwise unusable
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SharedError {
    pub fn player_not_found(term: &str) -> Self {
        Self::NotFound(format!("player '{}' not found", term))
    }
}

impl From<JsonError> for SharedError {
    fn from(error: JsonError) -> Self {
        Self::Parse(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SharedError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_format() {
        let error = SharedError::Fetch("HTTP 503".to_string());
        assert_eq!(format!("{}", error), "Fetch error: HTTP 503");
    }

    #[test]
    fn test_player_not_found() {
        let error = SharedError::player_not_found("Alice");
        assert_eq!(error, SharedError::NotFound("player 'Alice' not found".to_string()));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: SharedError = json_error.into();

        assert!(matches!(error, SharedError::Parse(_)));
    }
}
