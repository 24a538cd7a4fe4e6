use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unsupported file format: {0}")]
    BadFormat(String),

    #[error("File not found at path: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Failed to decode JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data is not JSON serializable: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

impl PipelineError {
    /// Stable category name used in logs and exit messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::BadFormat(_) => "bad-format",
            PipelineError::NotFound(_) => "not-found",
            PipelineError::EmptyInput(_) => "empty-input",
            PipelineError::Decode(_) => "decode-error",
            PipelineError::Io(_) => "io-error",
            PipelineError::Serialization(_) => "serialization-error",
            PipelineError::Config(_) | PipelineError::Toml(_) => "config-error",
            PipelineError::Metrics(_) => "metrics-error",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(PipelineError::BadFormat("x.csv".into()).kind(), "bad-format");
        assert_eq!(PipelineError::NotFound(PathBuf::from("a.json")).kind(), "not-found");
        assert_eq!(PipelineError::EmptyInput("File is empty.".into()).kind(), "empty-input");

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(PipelineError::Decode(decode).kind(), "decode-error");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(PipelineError::from(io).kind(), "io-error");
    }

    #[test]
    fn test_not_found_message_names_path() {
        let err = PipelineError::NotFound(PathBuf::from("missing/orders.json"));
        assert_eq!(err.to_string(), "File not found at path: missing/orders.json");
    }
}
