//! Error types for duodeck.
//!
//! Only loading paths can fail: reading a deck, a notes table or the user
//! configuration. Navigation and window sync never produce errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for duodeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The deck file could not be read.
    #[error("failed to read deck {path}: {source}")]
    DeckRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The deck parsed to zero slides.
    #[error("no slides found in {path}")]
    EmptyDeck { path: PathBuf },

    /// The notes file could not be read.
    #[error("failed to read notes {path}: {source}")]
    NotesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The notes file is not a valid notes table.
    #[error("invalid notes in {path}: {source}")]
    NotesParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A notes entry is keyed by slide 0.
    #[error("notes are keyed by 1-based slide number, found slide 0")]
    NotesZeroIndex,

    /// The configuration file could not be read or written.
    #[error("config I/O error at {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for this schema.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// A configuration value was rejected.
    #[error("invalid value for {key}: {message}")]
    ConfigValue { key: String, message: String },

    /// The platform config directory is unknown.
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// A specialized Result type for duodeck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a rejected-config-value error.
    #[must_use]
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// True when the error comes from a file that does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::DeckRead { source, .. }
            | Self::NotesRead { source, .. }
            | Self::ConfigIo { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
