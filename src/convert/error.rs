// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Conversion errors.
//!
//! Only malformed input and bad options are errors. Stale references
//! inside a well-formed file are skipped, not reported.

use thiserror::Error;

/// Result alias for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Text is not well-formed JSON, or could not be written
    #[error("malformed CKS data: {0}")]
    Json(#[from] serde_json::Error),

    /// Top level is not an object
    #[error("CKS data must be an object at the top level")]
    NotAnObject,

    /// No `song_data` container
    #[error("missing `song_data` container (top-level keys: [{}])", .found.join(", "))]
    MissingSongData { found: Vec<String> },

    /// A song body (or the side-table) does not match the wire schema
    #[error("{} does not match the CKS schema: {source}", describe(.song))]
    InvalidShape {
        song: Option<String>,
        source: serde_json::Error,
    },

    /// Export options that cannot produce scenes
    #[error("invalid export options: {0}")]
    InvalidOptions(String),
}

fn describe(song: &Option<String>) -> String {
    match song {
        Some(name) => format!("song '{}'", name),
        None => "file".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = ConvertError::MissingSongData {
            found: vec!["songs".into(), "version".into()],
        };
        assert_eq!(
            err.to_string(),
            "missing `song_data` container (top-level keys: [songs, version])"
        );

        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = ConvertError::InvalidShape {
            song: Some("Live Set".into()),
            source,
        };
        assert!(err.to_string().starts_with("song 'Live Set' does not match"));
    }
}
