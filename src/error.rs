//! Error types for the synonym indexer.

use crate::core::types::SubjectId;
use thiserror::Error;

/// Result type alias using the crate error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// No meaning entry carries the primary flag; the upstream record is malformed.
    #[error("subject {id} has no primary meaning")]
    MissingPrimaryMeaning { id: SubjectId },

    /// The same id was listed twice.
    #[error("subject {id} appears more than once")]
    DuplicateSubject { id: SubjectId },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The subjects endpoint answered with a non-success status.
    #[error("API returned {status} for {url}")]
    Api { status: u16, url: String },
}

impl Error {
    /// Errors that describe a single bad record rather than a broken run.
    pub const fn is_malformed_subject(&self) -> bool {
        matches!(self, Self::MissingPrimaryMeaning { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_subject_classification() {
        assert!(Error::MissingPrimaryMeaning { id: 7 }.is_malformed_subject());
        assert!(!Error::DuplicateSubject { id: 7 }.is_malformed_subject());
        assert!(!Error::Config("bad".into()).is_malformed_subject());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::MissingPrimaryMeaning { id: 440 }.to_string(),
            "subject 440 has no primary meaning"
        );
        assert_eq!(
            Error::Api { status: 401, url: "https://api.wanikani.com/v2/subjects".into() }.to_string(),
            "API returned 401 for https://api.wanikani.com/v2/subjects"
        );
    }
}
