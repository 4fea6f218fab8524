//! The schema graph: all entity types plus graph-level configuration.

use crate::node::TypeDef;
use crate::Annotations;
use serde::{Deserialize, Serialize};

/// An entity schema graph.
///
/// Nodes keep their declaration order; lookups go by unique type name.
/// The graph is treated as immutable input once handed to a compiler pass,
/// so sharing a `&Graph` across concurrent readers is safe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Graph {
    /// Graph-level annotation blobs (generator configuration and the like).
    pub annotations: Annotations,
    /// All entity types, in declaration order.
    pub nodes: Vec<TypeDef>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    pub fn with_node(mut self, node: TypeDef) -> Self {
        self.nodes.push(node);
        self
    }

    /// Attach a graph-level annotation blob.
    pub fn with_annotation(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }

    /// Look up a type by name.
    pub fn node(&self, name: &str) -> Option<&TypeDef> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_lookup() {
        let graph = Graph::new()
            .with_node(TypeDef::new("Pet"))
            .with_node(TypeDef::new("User"));

        assert_eq!(graph.node("Pet").map(|n| n.name.as_str()), Some("Pet"));
        assert_eq!(graph.node("User").map(|n| n.name.as_str()), Some("User"));
        assert!(graph.node("Toy").is_none());
    }

    #[test]
    fn annotations_round_trip() {
        let graph = Graph::new().with_annotation("Config", serde_json::json!({"flag": true}));
        assert_eq!(
            graph.annotations.get("Config"),
            Some(&serde_json::json!({"flag": true}))
        );
    }
}
