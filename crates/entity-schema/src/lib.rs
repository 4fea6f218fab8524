//! In-memory entity schema graph.
//!
//! This crate defines the read-only data model the surface compiler walks:
//!
//! - `Graph` - the whole schema: nodes plus graph-level annotations
//! - `TypeDef` - one entity type: id field, fields, edges
//! - `FieldDef` / `FieldType` - scalar properties
//! - `EdgeDef` - relations to other types
//!
//! # Architecture
//!
//! ```text
//! Graph
//! ├── annotations: { name -> blob }      (generator config lives here)
//! └── nodes: [TypeDef]
//!     ├── id / fields: [FieldDef]        (each with its own annotations)
//!     └── edges: [EdgeDef]               (target referenced by type name)
//! ```
//!
//! Annotations are opaque `serde_json::Value` blobs keyed by consumer name;
//! this crate never interprets them. Edges reference their target by type
//! name and are resolved through [`Graph::node`], so the graph stays a plain
//! owned value with no internal pointers.
//!
//! # Example
//!
//! ```
//! use entity_schema::{EdgeDef, FieldDef, FieldType, Graph, TypeDef};
//!
//! let graph = Graph::new()
//!     .with_node(
//!         TypeDef::new("Pet")
//!             .with_field(FieldDef::new("name", FieldType::String))
//!             .with_edge(EdgeDef::new("owner", "User").unique()),
//!     )
//!     .with_node(TypeDef::new("User"));
//!
//! assert!(graph.node("Pet").is_some());
//! assert_eq!(graph.node("Pet").unwrap().edges[0].struct_field_name(), "Owner");
//! ```

mod edge;
mod field;
mod graph;
mod node;

pub use edge::EdgeDef;
pub use field::{FieldDef, FieldType};
pub use graph::Graph;
pub use node::TypeDef;

use std::collections::BTreeMap;

/// Opaque per-element metadata, keyed by the consuming extension's name.
pub type Annotations = BTreeMap<String, serde_json::Value>;
