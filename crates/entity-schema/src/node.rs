//! Entity type definitions.

use crate::edge::EdgeDef;
use crate::field::{FieldDef, FieldType};
use crate::Annotations;
use serde::{Deserialize, Serialize};

/// One entity type in the schema graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Unique type name (PascalCase by convention).
    pub name: String,
    /// The identifier field. Serialized first in every projection.
    pub id: FieldDef,
    /// Scalar fields, in declaration order. Does not include `id`.
    pub fields: Vec<FieldDef>,
    /// Edges to other types, in declaration order.
    pub edges: Vec<EdgeDef>,
    /// Annotation blobs attached to the type.
    #[serde(default)]
    pub annotations: Annotations,
}

impl TypeDef {
    /// Create a type with the default integer `id` field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: FieldDef::new("id", FieldType::Int),
            fields: Vec::new(),
            edges: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    /// Replace the identifier field.
    pub fn with_id(mut self, id: FieldDef) -> Self {
        self.id = id;
        self
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an edge.
    pub fn with_edge(mut self, edge: EdgeDef) -> Self {
        self.edges.push(edge);
        self
    }

    /// Attach an annotation blob.
    pub fn with_annotation(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up an edge by name.
    pub fn edge(&self, name: &str) -> Option<&EdgeDef> {
        self.edges.iter().find(|e| e.name == name)
    }
}
