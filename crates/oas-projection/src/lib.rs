//! OpenAPI document projection for entity schema graphs.
//!
//! This crate consumes the surface computed by `oas-surface` (operations,
//! views, eager-load trees) and assembles a concrete OpenAPI document:
//!
//! ```text
//! Graph ──► Extension::generate
//!              ├── schemas   (one per type, one per view)
//!              ├── responses (canned error responses)
//!              └── paths     (CRUD routes + edge sub-resources)
//! ```
//!
//! The document model is plain serde data: `BTreeMap` keys keep component
//! and path ordering deterministic, `IndexMap` properties keep field
//! declaration order. Serialization is one `serde_json` call; there is no
//! custom formatting layer.
//!
//! # Example
//!
//! ```
//! use entity_schema::{FieldDef, FieldType, Graph, TypeDef};
//! use oas_projection::Extension;
//!
//! let graph = Graph::new().with_node(
//!     TypeDef::new("Pet").with_field(FieldDef::new("name", FieldType::String)),
//! );
//! let spec = Extension::new()
//!     .spec_title("Petstore")
//!     .generate(&graph)
//!     .unwrap();
//! assert!(spec.components.schemas.contains_key("Pet"));
//! assert!(spec.paths.contains_key("/pets"));
//! ```

mod error;
mod extension;
mod generator;
mod model;

pub use error::GeneratorError;
pub use extension::{Extension, MutateFn};
pub use generator::generate;
pub use model::{
    Components, Info, MediaType, OperationSpec, Parameter, ParameterLocation, PathItem,
    RequestBody, Response, ResponseRef, Schema, Spec, JSON,
};
