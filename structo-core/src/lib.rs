//! # structo-core
//!
//! Schema derivation, chat messages, and core error types for structo.
//!
//! This crate provides the foundational pieces of the structured-output
//! pipeline:
//!
//! - **Schema**: the [`Schematic`] trait, [`SchemaDocument`] tree, and
//!   [`derive_schema`] with its [`RequiredFields`] policy
//! - **Messages**: [`Role`] and [`Message`] for chat conversations
//! - **Errors**: [`SchemaError`] for derivation failures
//!
//! ## Example
//!
//! ```rust
//! use structo_core::{Message, RequiredFields};
//!
//! // Build up a conversation; extending is always append-only.
//! let mut conversation = vec![Message::system("You are a helpful assistant.")];
//! conversation.push(Message::user("Hello!"));
//!
//! // Pick a required-fields policy for schema derivation.
//! let required = RequiredFields::only(["name"]);
//! assert_ne!(required, RequiredFields::All);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod message;
pub mod schema;

// Re-exports for convenience
pub use error::SchemaError;
pub use message::{Message, Role};
pub use schema::{derive_schema, RequiredFields, SchemaDocument, Schematic};

/// Prelude module for common imports.
///
/// ```rust
/// use structo_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::SchemaError;
    pub use crate::message::{Message, Role};
    pub use crate::schema::{derive_schema, RequiredFields, SchemaDocument, Schematic};
}
