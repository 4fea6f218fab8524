//! API-surface compiler for entity schema graphs.
//!
//! This crate computes, for an [`entity_schema::Graph`], the REST surface an
//! OpenAPI generator has to emit:
//!
//! - **Groups**: serialization-group labels controlling visibility
//! - **Annotation**: per-type/field/edge generator metadata
//! - **Operations**: which CRUD operations a type or edge exposes
//! - **Edge trees**: which edges to eager-load per group request
//! - **Views**: the exact field/edge projection per (type, operation)
//!
//! # Architecture
//!
//! ```text
//! views ──► node_operations / edge_operations   (what exists)
//!   │
//!   ├────► edge_tree                            (what to eager-load)
//!   │
//!   └────► serialize_field / serialize_edge     (what to include)
//!                  │
//!                  └──► Annotation / Groups     (leaf metadata)
//! ```
//!
//! Everything is a pure, synchronous pass over the in-memory graph: no I/O,
//! no shared mutable state across calls. Any error aborts the whole run.
//!
//! # Example
//!
//! ```
//! use entity_schema::{EdgeDef, Graph, TypeDef};
//! use oas_surface::{edge_tree, Annotation, Groups, ANNOTATION_KEY};
//!
//! let owner = EdgeDef::new("owner", "User").unique().with_annotation(
//!     ANNOTATION_KEY,
//!     Annotation::groups(["test:edge"]).to_value(),
//! );
//! let graph = Graph::new()
//!     .with_node(TypeDef::new("Pet").with_edge(owner))
//!     .with_node(TypeDef::new("User"));
//!
//! let pet = graph.node("Pet").unwrap();
//! let tree = edge_tree(&graph, pet, &Groups::from_iter(["test:edge"])).unwrap();
//! assert_eq!(tree.flatten().len(), 1);
//! ```

mod annotation;
mod config;
mod edges;
mod error;
mod operations;
pub mod serialization;
mod view;

pub use annotation::{
    edge_annotation, field_annotation, type_annotation, Annotation, OperationConfig, Policy,
    ANNOTATION_KEY,
};
pub use config::{Config, CONFIG_KEY};
pub use edges::{edge_tree, Edges, ResolvedEdge, MAX_DEPTH};
pub use error::Error;
pub use operations::{edge_operations, node_operations, Operation};
pub use serialization::Groups;
pub use view::{edge_view_name, view_name, view_name_edge, views, View};
