//! Error types for the Tailor core library
//!
//! Absent items and absent transformer output are not errors; they resolve to
//! the scope's null default. Errors raised by transformers travel through this
//! type unchanged, so a transformer returning `Err` aborts the whole render.

use thiserror::Error;

/// Main error type for Tailor operations
#[derive(Error, Debug)]
pub enum Error {
    /// A transformer (or code it called) failed
    #[error("Transformer failed: {message}")]
    Transformer {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// JSON conversion errors, usually from `serde_json::to_value` in a transformer
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing an XML document failed
    #[error("XML error: {message}")]
    Xml {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A mapping key or configured wrapper cannot be used as an element name
    #[error("Invalid XML element name: '{name}'")]
    InvalidElementName { name: String },

    /// Text holds a character XML 1.0 cannot represent, such as a C0 control
    #[error("Text cannot be written as XML 1.0: {text:?}")]
    InvalidText { text: String },

    /// A rendered document could not be re-parsed into a single-rooted tree
    #[error("Invalid XML document: {message}")]
    InvalidDocument { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a reader/writer failure from the XML layer
    pub(crate) fn xml<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Xml {
            message: err.to_string(),
            source: Box::new(err),
        }
    }

    pub(crate) fn invalid_document(message: impl Into<String>) -> Self {
        Error::InvalidDocument {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Transformer {
            message: err.to_string(),
            source: err,
        }
    }
}
