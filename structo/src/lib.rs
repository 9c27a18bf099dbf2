//! # structo
//!
//! Typed structured-output client for Ollama-compatible inference
//! endpoints.
//!
//! structo shapes requests to, and decodes responses from, an external
//! inference service reachable over HTTP. Its centerpiece is the
//! structured-output pipeline: derive a JSON schema from a target type
//! with `#[derive(Schematic)]`, attach it so the model is constrained
//! to emit matching JSON, and deserialize the reply back into that
//! type — including recovery of a `<think>…</think>` reasoning
//! preamble when the model emits one.
//!
//! ## Quick Start
//!
//! ```ignore
//! use serde::Deserialize;
//! use structo::prelude::*;
//!
//! #[derive(Schematic, Deserialize)]
//! struct Pet {
//!     /// Unique identifier.
//!     id: i64,
//!     /// Display name.
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> structo::Result<()> {
//!     let client = InferenceClient::new("http://localhost:11434")
//!         .with_default_model("llama3.1");
//!
//!     // Plain text.
//!     let reply = client
//!         .infer(InferenceRequest::builder().prompt("Why is the sky blue?"))
//!         .await?;
//!     println!("{}", reply.response);
//!
//!     // Schema-constrained, decoded into a Pet.
//!     let request = InferenceRequest::builder().prompt("Invent a pet.");
//!     let pet: Pet = client.infer_as(request, &RequiredFields::All).await?;
//!     println!("{} ({})", pet.name, pet.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Thought splitting
//!
//! ```rust
//! use structo::decode::split_thought;
//!
//! let split = split_thought("<think>check the premise</think>Yes.");
//! assert_eq!(split.thought(), Some("check the premise"));
//! assert_eq!(split.answer(), "Yes.");
//! ```
//!
//! ## Concurrency
//!
//! The client is stateless across calls; clone it freely. Each call
//! blocks (awaits) for the duration of the round trip, bounded by the
//! configured read timeout. There is no retry policy and no
//! cancellation primitive in this crate — drop the future to cancel,
//! and layer retries above if you need them.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;

// Re-exports for convenience
pub use client::InferenceClient;
pub use config::ClientConfig;
pub use decode::{decode_response, split_thought, ThoughtSplit};
pub use error::{DecodeError, Error, Result, TransportError, ValidationError};
pub use request::{ChatRequest, InferenceRequest, InferenceRequestBuilder, Options};
pub use response::{ChatResponse, Choice, InferenceResponse, ModelInfo, Usage};
pub use transport::Transport;

/// Core types: schema derivation, messages, core errors.
pub use structo_core as core;

pub use structo_core::{
    derive_schema, Message, RequiredFields, Role, SchemaDocument, SchemaError, Schematic,
};
pub use structo_macros::Schematic;

/// Prelude module for common imports.
///
/// ```rust
/// use structo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::InferenceClient;
    pub use crate::config::ClientConfig;
    pub use crate::decode::{decode_response, split_thought, ThoughtSplit};
    pub use crate::error::{Error, Result};
    pub use crate::request::{ChatRequest, InferenceRequest, InferenceRequestBuilder, Options};
    pub use crate::response::{ChatResponse, InferenceResponse, ModelInfo};
    pub use structo_core::{
        derive_schema, Message, RequiredFields, Role, SchemaDocument, Schematic,
    };
    pub use structo_macros::Schematic;
}
