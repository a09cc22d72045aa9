#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML schema {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("duplicate column '{column}' in {list}")]
    DuplicateColumn { column: String, list: &'static str },

    #[error("{role} column '{column}' is not an expected column")]
    UnknownRoleColumn { role: &'static str, column: String },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
