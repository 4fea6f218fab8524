//! Operation-exposure policy resolution.

use crate::annotation::{Annotation, OperationConfig, Policy, ANNOTATION_KEY};
use crate::config::Config;
use crate::error::Error;
use entity_schema::{EdgeDef, Graph, TypeDef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A REST operation on a resource. The declaration order is the natural
/// sort order used for deterministic output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Operation {
    /// All operations, in natural order.
    pub fn all() -> [Operation; 5] {
        [
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
            Operation::List,
        ]
    }

    /// Lowercase name, as used in operation ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::List => "list",
        }
    }

    /// Title-case name, as used in view names.
    pub fn title(&self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Read => "Read",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::List => "List",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation is exposed if it is explicitly annotated with
/// `Policy::Expose`, or left unset while the global default is `Expose`.
/// An explicit `Exclude` always suppresses.
fn exposed(config: &OperationConfig, global: &Config) -> bool {
    config.policy == Policy::Expose
        || (config.policy == Policy::None && global.default_policy == Policy::Expose)
}

/// The operations to expose for the given type, sorted in natural order.
pub fn node_operations(graph: &Graph, node: &TypeDef) -> Result<Vec<Operation>, Error> {
    let cfg = Config::from_graph(graph)?;
    let Some(blob) = node.annotations.get(ANNOTATION_KEY) else {
        // No policies given: follow the global one.
        if cfg.default_policy == Policy::Expose {
            return Ok(Operation::all().to_vec());
        }
        return Ok(Vec::new());
    };
    let ant = Annotation::decode(blob)?;
    let mut ops: Vec<Operation> = [
        (Operation::Create, &ant.create),
        (Operation::Read, &ant.read),
        (Operation::Update, &ant.update),
        (Operation::Delete, &ant.delete),
        (Operation::List, &ant.list),
    ]
    .into_iter()
    .filter(|(_, config)| exposed(config, &cfg))
    .map(|(op, _)| op)
    .collect();
    // The candidate table is already ordered, but the result must never
    // depend on how it is iterated.
    ops.sort();
    Ok(ops)
}

/// The operations to expose for the given edge sub-resource, sorted in
/// natural order: read for to-one edges, list for to-many edges.
///
/// Explicitly exposing an operation the edge shape cannot support (read on
/// a to-many edge, list on a to-one edge) is a configuration error.
pub fn edge_operations(graph: &Graph, edge: &EdgeDef) -> Result<Vec<Operation>, Error> {
    let cfg = Config::from_graph(graph)?;
    let Some(blob) = edge.annotations.get(ANNOTATION_KEY) else {
        if cfg.default_policy == Policy::Expose {
            return Ok(vec![if edge.unique {
                Operation::Read
            } else {
                Operation::List
            }]);
        }
        return Ok(Vec::new());
    };
    let ant = Annotation::decode(blob)?;
    if !edge.unique && ant.read.policy == Policy::Expose {
        return Err(Error::UnsupportedEdgeOperation {
            op: Operation::Read,
            edge: edge.name.clone(),
            unique: false,
        });
    }
    if edge.unique && ant.list.policy == Policy::Expose {
        return Err(Error::UnsupportedEdgeOperation {
            op: Operation::List,
            edge: edge.name.clone(),
            unique: true,
        });
    }
    let candidate = if edge.unique {
        (Operation::Read, &ant.read)
    } else {
        (Operation::List, &ant.list)
    };
    let mut ops: Vec<Operation> = [candidate]
        .into_iter()
        .filter(|(_, config)| exposed(config, &cfg))
        .map(|(op, _)| op)
        .collect();
    ops.sort();
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_KEY;
    use serde_json::json;

    fn graph_with_policy(policy: &str) -> Graph {
        Graph::new().with_annotation(CONFIG_KEY, json!({ "default_policy": policy }))
    }

    #[test]
    fn unannotated_node_follows_global_policy() {
        let expose = graph_with_policy("expose").with_node(TypeDef::new("Pet"));
        let ops = node_operations(&expose, expose.node("Pet").unwrap()).unwrap();
        assert_eq!(ops, Operation::all().to_vec());

        let exclude = graph_with_policy("exclude").with_node(TypeDef::new("Pet"));
        let ops = node_operations(&exclude, exclude.node("Pet").unwrap()).unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn explicit_exclude_suppresses_one_operation() {
        // Only create is excluded; the four unset operations inherit the
        // default-expose behavior.
        let node = TypeDef::new("Pet").with_annotation(
            ANNOTATION_KEY,
            Annotation::create(OperationConfig::excluded()).to_value(),
        );
        let graph = graph_with_policy("expose").with_node(node);
        let ops = node_operations(&graph, graph.node("Pet").unwrap()).unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Read,
                Operation::Update,
                Operation::Delete,
                Operation::List
            ]
        );
    }

    #[test]
    fn explicit_expose_overrides_exclude_default() {
        let node = TypeDef::new("Pet").with_annotation(
            ANNOTATION_KEY,
            Annotation::read(OperationConfig::exposed())
                .merge(Annotation::list(OperationConfig::exposed()))
                .to_value(),
        );
        let graph = graph_with_policy("exclude").with_node(node);
        let ops = node_operations(&graph, graph.node("Pet").unwrap()).unwrap();
        assert_eq!(ops, vec![Operation::Read, Operation::List]);
    }

    #[test]
    fn edge_shape_selects_candidate() {
        let graph = graph_with_policy("expose")
            .with_node(
                TypeDef::new("Pet")
                    .with_edge(EdgeDef::new("owner", "User").unique())
                    .with_edge(EdgeDef::new("toys", "Toy")),
            )
            .with_node(TypeDef::new("User"))
            .with_node(TypeDef::new("Toy"));
        let pet = graph.node("Pet").unwrap();

        let ops = edge_operations(&graph, pet.edge("owner").unwrap()).unwrap();
        assert_eq!(ops, vec![Operation::Read]);

        let ops = edge_operations(&graph, pet.edge("toys").unwrap()).unwrap();
        assert_eq!(ops, vec![Operation::List]);
    }

    #[test]
    fn edge_exclude_wins() {
        let edge = EdgeDef::new("owner", "User").unique().with_annotation(
            ANNOTATION_KEY,
            Annotation::read(OperationConfig::excluded()).to_value(),
        );
        let graph = graph_with_policy("expose")
            .with_node(TypeDef::new("Pet").with_edge(edge))
            .with_node(TypeDef::new("User"));
        let ops = edge_operations(&graph, graph.node("Pet").unwrap().edge("owner").unwrap())
            .unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let unique = EdgeDef::new("owner", "User").unique().with_annotation(
            ANNOTATION_KEY,
            Annotation::list(OperationConfig::exposed()).to_value(),
        );
        let many = EdgeDef::new("toys", "Toy").with_annotation(
            ANNOTATION_KEY,
            Annotation::read(OperationConfig::exposed()).to_value(),
        );
        let graph = graph_with_policy("expose")
            .with_node(TypeDef::new("Pet").with_edge(unique).with_edge(many))
            .with_node(TypeDef::new("User"))
            .with_node(TypeDef::new("Toy"));
        let pet = graph.node("Pet").unwrap();

        let err = edge_operations(&graph, pet.edge("owner").unwrap()).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedEdgeOperation {
                op: Operation::List,
                edge: "owner".into(),
                unique: true,
            }
        );
        let err = edge_operations(&graph, pet.edge("toys").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedEdgeOperation {
                op: Operation::Read,
                ..
            }
        ));
    }

    #[test]
    fn operation_names() {
        assert_eq!(Operation::Create.title(), "Create");
        assert_eq!(Operation::List.as_str(), "list");
        assert_eq!(Operation::Read.to_string(), "read");
        assert!(Operation::Create < Operation::Read);
        assert!(Operation::Delete < Operation::List);
    }
}
