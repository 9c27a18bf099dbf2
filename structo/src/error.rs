//! Error types for the structo facade.
//!
//! Four failure families, mirroring the places a call can go wrong:
//! request validation, schema derivation, transport, and response
//! decoding. All of them surface to the caller unchanged; nothing here
//! is retried or suppressed.

use thiserror::Error;

pub use structo_core::SchemaError;

/// Result alias for structo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A request failed validation before being sent anywhere.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The request named no model and no default was configured.
    #[error("Request has no model and the client has no default model")]
    MissingModel,

    /// The request carried an empty prompt.
    #[error("Request prompt must not be empty")]
    MissingPrompt,

    /// The chat request carried no messages.
    #[error("Chat request must contain at least one message")]
    MissingMessages,

    /// An image file could not be read.
    #[error("Failed to read image file '{path}': {source}")]
    ImageFile {
        /// Path of the unreadable file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// HTTP-level failure from the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The request never completed (connection, TLS, timeout).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl TransportError {
    /// Create an HTTP status error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }
}

/// A response body could not be decoded into the requested type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// JSON deserialization into the target type failed.
    ///
    /// Carries the full raw text so the caller can inspect what the
    /// model actually produced.
    #[error("Failed to decode response into {target}: {source}\nraw text: {raw}")]
    Decode {
        /// Name of the target type.
        target: &'static str,
        /// The raw text that failed to parse.
        raw: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Umbrella error for all structo operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Request validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Schema derivation failure.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response decoding failure.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
