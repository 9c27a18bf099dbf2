//! Error types for schema derivation.

use thiserror::Error;

/// Error during schema derivation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Required fields can only be attached to an object-shaped schema.
    #[error("Schema root must be an object, got '{schema_type}'")]
    NonObjectRoot {
        /// The `type` of the offending schema root.
        schema_type: String,
    },

    /// A requested required field is not a property of the schema.
    #[error("Required field '{field}' is not a property of the schema")]
    UnknownField {
        /// The missing field name.
        field: String,
    },
}

impl SchemaError {
    /// Create a non-object-root error.
    pub fn non_object_root(schema_type: impl Into<String>) -> Self {
        Self::NonObjectRoot {
            schema_type: schema_type.into(),
        }
    }

    /// Create an unknown-field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }
}
