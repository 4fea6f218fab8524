//! View materialization: the exact projection to serialize per operation.

use crate::annotation::{edge_annotation, field_annotation, Annotation, ANNOTATION_KEY};
use crate::config::Config;
use crate::edges::edge_tree;
use crate::error::Error;
use crate::operations::{edge_operations, node_operations, Operation};
use crate::serialization::Groups;
use entity_schema::{Annotations, EdgeDef, FieldDef, Graph, TypeDef};
use std::collections::BTreeMap;
use std::iter;

/// A subset of a type: the fields and edges present in the serialized
/// output of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    /// The type the view projects.
    pub ty: &'a TypeDef,
    /// Fields to serialize, identifier first.
    pub fields: Vec<&'a FieldDef>,
    /// Edges to serialize.
    pub edges: Vec<&'a EdgeDef>,
}

/// Compute every view needed to emit the document, keyed by deterministic
/// name.
///
/// Per type and exposed operation (delete excepted) this materializes the
/// operation's view, plus one view per edge anywhere in the operation's
/// eager-load tree, plus the views of every edge sub-resource exposing
/// operations of its own. With simple models enabled all names collapse to
/// the bare type name and later computations overwrite earlier ones.
pub fn views(graph: &Graph) -> Result<BTreeMap<String, View<'_>>, Error> {
    let cfg = Config::from_graph(graph)?;
    let mut out = BTreeMap::new();
    for node in &graph.nodes {
        for op in node_operations(graph, node)? {
            // Delete responses have no body.
            if op == Operation::Delete {
                continue;
            }
            let groups = groups_for_operation(&node.annotations, op)?;
            let name = view_name(&cfg, node, op);
            insert_view(&mut out, name.clone(), view(node, &groups)?, &cfg);
            // One view per type involved in the eager-load tree.
            let tree = edge_tree(graph, node, &groups)?;
            for edge in tree.flatten() {
                let target = resolve(graph, &edge.target)?;
                insert_view(
                    &mut out,
                    view_name_edge(&cfg, &name, edge),
                    view(target, &groups)?,
                    &cfg,
                );
            }
        }
        // Second-level operations exposed on the edges themselves.
        for edge in &node.edges {
            for op in edge_operations(graph, edge)? {
                if op == Operation::Delete {
                    continue;
                }
                let groups = groups_for_operation(&edge.annotations, op)?;
                let target = resolve(graph, &edge.target)?;
                let name = edge_view_name(&cfg, node, edge, op);
                insert_view(&mut out, name.clone(), view(target, &groups)?, &cfg);
                let tree = edge_tree(graph, node, &groups)?;
                for nested in tree.flatten() {
                    let target = resolve(graph, &nested.target)?;
                    insert_view(
                        &mut out,
                        view_name_edge(&cfg, &name, nested),
                        view(target, &groups)?,
                        &cfg,
                    );
                }
            }
        }
    }
    Ok(out)
}

fn resolve<'a>(graph: &'a Graph, name: &str) -> Result<&'a TypeDef, Error> {
    graph
        .node(name)
        .ok_or_else(|| Error::UnknownType(name.to_string()))
}

fn insert_view<'a>(
    out: &mut BTreeMap<String, View<'a>>,
    name: String,
    view: View<'a>,
    cfg: &Config,
) {
    if cfg.simple_models {
        // All operations converge on one key; content is expected to agree.
        if let Some(previous) = out.get(&name) {
            debug_assert_eq!(
                previous, &view,
                "simple-models views for {name:?} diverge across operations"
            );
        }
    }
    out.insert(name, view);
}

/// Project the given type for serialization with the given groups.
fn view<'a>(node: &'a TypeDef, groups: &Groups) -> Result<View<'a>, Error> {
    let mut v = View {
        ty: node,
        fields: Vec::new(),
        edges: Vec::new(),
    };
    for field in iter::once(&node.id).chain(node.fields.iter()) {
        if serialize_field(field, groups)? {
            v.fields.push(field);
        }
    }
    for edge in &node.edges {
        if serialize_edge(edge, groups)? {
            v.edges.push(edge);
        }
    }
    Ok(v)
}

/// Whether a field is serialized for the requested groups.
///
/// Sensitive fields never are. Otherwise fields are included by default:
/// only a field carrying groups of its own can be filtered out, and only
/// when none of them is requested.
fn serialize_field(field: &FieldDef, groups: &Groups) -> Result<bool, Error> {
    if field.sensitive {
        return Ok(false);
    }
    if groups.is_empty() || !field.annotations.contains_key(ANNOTATION_KEY) {
        return Ok(true);
    }
    let ant = field_annotation(field)?;
    if ant.groups.is_empty() {
        return Ok(true);
    }
    Ok(groups.matches(&ant.groups))
}

/// Whether an edge is serialized for the requested groups.
///
/// The inverse default of fields: eager-loading is opt-in, so an edge
/// without groups (or a request without groups) is excluded.
fn serialize_edge(edge: &EdgeDef, groups: &Groups) -> Result<bool, Error> {
    if groups.is_empty() || !edge.annotations.contains_key(ANNOTATION_KEY) {
        return Ok(false);
    }
    let ant = edge_annotation(edge)?;
    if ant.groups.is_empty() {
        return Ok(false);
    }
    Ok(groups.matches(&ant.groups))
}

/// The groups requested for the given operation, per the element's
/// annotation. Elements without an annotation request no groups.
fn groups_for_operation(annotations: &Annotations, op: Operation) -> Result<Groups, Error> {
    let Some(blob) = annotations.get(ANNOTATION_KEY) else {
        return Ok(Groups::new());
    };
    let ant = Annotation::decode(blob)?;
    let config = match op {
        Operation::Create => ant.create,
        Operation::Read => ant.read,
        Operation::Update => ant.update,
        Operation::List => ant.list,
        Operation::Delete => return Err(Error::NoOperationGroups(op)),
    };
    Ok(config.groups.unwrap_or_default())
}

/// The view name for an operation on a type: `<Type><OpTitle>`, or the bare
/// type name with simple models enabled.
pub fn view_name(cfg: &Config, node: &TypeDef, op: Operation) -> String {
    if cfg.simple_models {
        node.name.clone()
    } else {
        format!("{}{}", node.name, op.title())
    }
}

/// The view name for a second-level operation on an edge:
/// `<Type>_<EdgeStructField><OpTitle>`, or the bare target type name with
/// simple models enabled.
pub fn edge_view_name(cfg: &Config, node: &TypeDef, edge: &EdgeDef, op: Operation) -> String {
    if cfg.simple_models {
        edge.target.clone()
    } else {
        format!("{}_{}{}", node.name, edge.struct_field_name(), op.title())
    }
}

/// The view name for an edge eager-loaded under a parent view:
/// `<parent>_<EdgeStructField>`, or the bare target type name with simple
/// models enabled.
pub fn view_name_edge(cfg: &Config, parent: &str, edge: &EdgeDef) -> String {
    if cfg.simple_models {
        edge.target.clone()
    } else {
        format!("{}_{}", parent, edge.struct_field_name())
    }
}
