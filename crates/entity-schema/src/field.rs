//! Scalar field definitions.

use crate::Annotations;
use serde::{Deserialize, Serialize};

/// A scalar property of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name (snake_case by convention).
    pub name: String,
    /// The field's type.
    pub ty: FieldType,
    /// Whether the field may be absent.
    #[serde(default)]
    pub optional: bool,
    /// Sensitive fields are never serialized into any projection.
    #[serde(default)]
    pub sensitive: bool,
    /// Immutable fields cannot be changed after creation.
    #[serde(default)]
    pub immutable: bool,
    /// Default value, if the schema declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Annotation blobs attached to the field.
    #[serde(default)]
    pub annotations: Annotations,
}

impl FieldDef {
    /// Create a required, non-sensitive field.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            sensitive: false,
            immutable: false,
            default: None,
            annotations: Annotations::new(),
        }
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the field sensitive.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Mark the field immutable.
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Attach an annotation blob.
    pub fn with_annotation(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }
}

/// The type of a scalar field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Bool,
    String,
    /// Raw bytes, serialized base64.
    Bytes,
    /// Timestamp with timezone.
    Time,
    Uuid,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    /// Closed string enumeration.
    Enum(Vec<String>),
    /// Homogeneous list of another field type.
    List(Box<FieldType>),
}

impl FieldType {
    /// Enum values, when this is an enum type.
    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            FieldType::Enum(values) => Some(values),
            _ => None,
        }
    }
}
