//! # structo-macros
//!
//! Procedural macros for structo.
//!
//! This crate provides the `Schematic` derive macro, which turns a type
//! definition into the JSON schema (and field-name listing) that drives
//! schema-constrained generation.
//!
//! ## Schematic Macro
//!
//! ```ignore
//! #[derive(Schematic, Deserialize)]
//! struct Pet {
//!     /// Unique identifier.
//!     id: i64,
//!     /// Display name.
//!     name: String,
//!     /// Optional freeform tag.
//!     tag: Option<String>,
//! }
//! ```

extern crate proc_macro;

mod schematic;

use proc_macro::TokenStream;

/// Derive macro for implementing the `Schematic` trait.
///
/// Generates a JSON schema describing the type, the list of declared
/// field names (used for required-field injection), and the schema name.
///
/// Supported shapes:
///
/// - structs with named fields — one property per field, in declaration
///   order; fields of other `Schematic` types nest their full schema
/// - fieldless enums — rendered as string enums
///
/// `Option<T>` fields render as nullable variants of `T`'s schema and
/// `Vec<T>` fields as arrays with an `items` schema. Doc comments on
/// fields become `description` entries.
///
/// # Example
///
/// ```ignore
/// #[derive(Schematic, Deserialize)]
/// struct Pet {
///     /// Unique identifier.
///     id: i64,
///     /// Display name.
///     name: String,
///     /// Optional freeform tag.
///     tag: Option<String>,
/// }
///
/// let schema = Pet::json_schema();
/// assert_eq!(schema["properties"]["id"]["type"], "integer");
/// ```
#[proc_macro_derive(Schematic)]
pub fn derive_schematic(input: TokenStream) -> TokenStream {
    schematic::derive_schematic_impl(input)
}
