//! Schema documents and typed schema derivation.
//!
//! A [`SchemaDocument`] is a JSON-Schema-shaped tree carried as plain
//! [`serde_json::Value`]. Types describe themselves through the
//! [`Schematic`] trait (normally implemented with `#[derive(Schematic)]`
//! from `structo-macros`), and [`derive_schema`] turns that description
//! into an anonymous document ready to be inlined into a request body,
//! applying a [`RequiredFields`] policy on the way.
//!
//! ## Example
//!
//! ```rust
//! use structo_core::schema::{derive_schema, RequiredFields, SchemaDocument, Schematic};
//!
//! struct Point;
//!
//! impl Schematic for Point {
//!     fn json_schema() -> SchemaDocument {
//!         serde_json::json!({
//!             "$id": "urn:schematic:Point",
//!             "title": "Point",
//!             "type": "object",
//!             "properties": {
//!                 "x": {"type": "number"},
//!                 "y": {"type": "number"}
//!             }
//!         })
//!     }
//!
//!     fn field_names() -> &'static [&'static str] {
//!         &["x", "y"]
//!     }
//!
//!     fn schema_name() -> &'static str {
//!         "Point"
//!     }
//! }
//!
//! let schema = derive_schema::<Point>(&RequiredFields::All).unwrap();
//! assert_eq!(schema["required"], serde_json::json!(["x", "y"]));
//! assert!(schema.get("$id").is_none());
//! ```

use serde_json::Value as JsonValue;

use crate::error::SchemaError;

/// A JSON-Schema-shaped document.
pub type SchemaDocument = JsonValue;

/// Types that can describe their own JSON schema.
///
/// Implement via `#[derive(Schematic)]` for structs with named fields and
/// fieldless enums. The document returned by [`json_schema`] is
/// self-describing (it carries `$id` and `title`); [`derive_schema`]
/// strips those markers before the document goes anywhere near a request.
///
/// [`json_schema`]: Schematic::json_schema
pub trait Schematic {
    /// The JSON schema for this type.
    fn json_schema() -> SchemaDocument;

    /// Declared top-level field names, in declaration order.
    ///
    /// Empty for types without named fields.
    fn field_names() -> &'static [&'static str] {
        &[]
    }

    /// Schema name, usually the type name.
    fn schema_name() -> &'static str;
}

/// Policy for populating the `required` array of a derived schema.
///
/// Exactly one of three things happens to the root `required` array:
/// every declared field is listed, a caller-chosen subset is listed, or
/// the array is omitted altogether. An explicit empty list via
/// [`RequiredFields::only`] yields a literal empty array, not "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequiredFields {
    /// Every declared top-level field is required.
    #[default]
    All,
    /// Exactly the named fields are required.
    Only(Vec<String>),
    /// No `required` array is attached.
    None,
}

impl RequiredFields {
    /// Require exactly the given fields.
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(fields.into_iter().map(Into::into).collect())
    }
}

/// Derive the schema for `T`, applying the required-fields policy.
///
/// The returned document is anonymous: the `$id`/`title` markers emitted
/// by the derive are stripped from the root so the schema can be inlined
/// into a request body. Derivation is a pure function of `T` and the
/// policy; deriving twice yields structurally identical documents.
///
/// # Errors
///
/// With [`RequiredFields::All`] or [`RequiredFields::Only`] the schema
/// root must describe an object, otherwise the injection has nowhere to
/// attach and [`SchemaError::NonObjectRoot`] is returned. A name passed
/// via `Only` that is not a property of the schema is rejected with
/// [`SchemaError::UnknownField`]. [`RequiredFields::None`] never fails.
pub fn derive_schema<T: Schematic>(
    required: &RequiredFields,
) -> Result<SchemaDocument, SchemaError> {
    let mut schema = T::json_schema();

    if let Some(root) = schema.as_object_mut() {
        root.remove("$id");
        root.remove("id");
        root.remove("title");
    }

    attach_required::<T>(&mut schema, required)?;
    Ok(schema)
}

/// Inject the `required` array chosen by the policy into the schema root.
fn attach_required<T: Schematic>(
    schema: &mut SchemaDocument,
    required: &RequiredFields,
) -> Result<(), SchemaError> {
    let names: Vec<String> = match required {
        RequiredFields::None => return Ok(()),
        RequiredFields::All => T::field_names().iter().map(|n| (*n).to_string()).collect(),
        RequiredFields::Only(fields) => fields.clone(),
    };

    let schema_type = schema_type_label(schema);
    let root = match schema.as_object_mut() {
        Some(obj) if obj.get("type").and_then(JsonValue::as_str) == Some("object") => obj,
        _ => return Err(SchemaError::NonObjectRoot { schema_type }),
    };

    {
        let properties = root.get("properties").and_then(JsonValue::as_object);
        for name in &names {
            let known = properties.map_or(false, |props| props.contains_key(name));
            if !known {
                return Err(SchemaError::UnknownField {
                    field: name.clone(),
                });
            }
        }
    }

    root.insert(
        "required".to_string(),
        JsonValue::Array(names.into_iter().map(JsonValue::String).collect()),
    );
    Ok(())
}

fn schema_type_label(schema: &SchemaDocument) -> String {
    schema
        .get("type")
        .and_then(JsonValue::as_str)
        .unwrap_or("unknown")
        .to_string()
}
