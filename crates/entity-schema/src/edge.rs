//! Edge definitions.

use crate::Annotations;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

/// A relation from one entity type to another.
///
/// The target type is referenced by name and resolved through
/// [`crate::Graph::node`]; a dangling target is a graph inconsistency the
/// consumer surfaces as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    /// Edge name (snake_case by convention).
    pub name: String,
    /// Override for the generated struct-field name. Defaults to the
    /// PascalCase form of `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struct_field: Option<String>,
    /// Name of the target type.
    pub target: String,
    /// Whether this is a to-one edge (`true`) or a to-many edge (`false`).
    #[serde(default)]
    pub unique: bool,
    /// Whether the edge may be absent.
    #[serde(default)]
    pub optional: bool,
    /// Annotation blobs attached to the edge.
    #[serde(default)]
    pub annotations: Annotations,
}

impl EdgeDef {
    /// Create a to-many edge to the given target type.
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            struct_field: None,
            target: target.into(),
            unique: false,
            optional: false,
            annotations: Annotations::new(),
        }
    }

    /// Make this a to-one edge.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark the edge optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Override the struct-field name.
    pub fn with_struct_field(mut self, name: impl Into<String>) -> Self {
        self.struct_field = Some(name.into());
        self
    }

    /// Attach an annotation blob.
    pub fn with_annotation(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }

    /// The struct-field name used in generated identifiers: the override if
    /// set, otherwise the PascalCase form of the edge name.
    pub fn struct_field_name(&self) -> String {
        match &self.struct_field {
            Some(name) => name.clone(),
            None => self.name.to_case(Case::Pascal),
        }
    }
}
