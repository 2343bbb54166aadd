use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    /// Missing input structure or unusable store; aborts the run before any row.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A single field could not be coerced; scoped to one row.
    #[error("Malformed field '{field}' (value {value:?}): {reason}")]
    MalformedField {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImportError {
    pub fn malformed(field: &str, value: &str, reason: impl Into<String>) -> Self {
        ImportError::MalformedField {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_field_message_names_field_and_value() {
        let err = ImportError::malformed("Toxicity Value", "abc", "not a number");
        let msg = err.to_string();
        assert!(msg.contains("Toxicity Value"));
        assert!(msg.contains("\"abc\""));
    }
}
