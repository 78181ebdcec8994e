use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid conversation: {0}")]
    InvalidConversation(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_conversation_error() {
        let err = CoreError::InvalidConversation("system message at position 2".to_string());
        assert_eq!(
            err.to_string(),
            "invalid conversation: system message at position 2"
        );
    }

    #[test]
    fn test_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json");
        let err = CoreError::from(json_err.unwrap_err());
        assert!(err.to_string().contains("key must be a string"));
    }
}
