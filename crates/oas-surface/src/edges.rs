//! Edge-tree resolution: which edges to eager-load for a group request.

use crate::annotation::edge_annotation;
use crate::error::Error;
use crate::serialization::Groups;
use entity_schema::{EdgeDef, Graph, TypeDef};
use std::collections::HashSet;
use std::fmt;

/// Hard ceiling on the eager-load walk length. A walk longer than this
/// aborts resolution; per-edge bounds should kick in long before.
pub const MAX_DEPTH: usize = 25;

/// An edge to be eager-loaded, together with the edges to load on the type
/// it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEdge<'a> {
    /// The schema edge.
    pub edge: &'a EdgeDef,
    /// Edges to eager-load on the target type, resolved recursively.
    pub edges: Edges<'a>,
}

/// A list of resolved edges, in schema declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edges<'a>(pub Vec<ResolvedEdge<'a>>);

impl<'a> Edges<'a> {
    /// Number of resolved edges at this level.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any edge was resolved at this level.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over this level's resolved edges.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedEdge<'a>> {
        self.0.iter()
    }

    /// Every edge appearing anywhere in the tree, de-duplicated by target
    /// type name, in first-encounter order.
    ///
    /// The deduplication key is the *target type*, not the edge: two
    /// distinct edges pointing at the same type collapse into a single
    /// entry (the first one encountered), dropping any annotation or group
    /// differences between them. Callers must tolerate this coarsening.
    pub fn flatten(&self) -> Vec<&'a EdgeDef> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_into(&mut seen, &mut out);
        out
    }

    fn collect_into(&self, seen: &mut HashSet<&'a str>, out: &mut Vec<&'a EdgeDef>) {
        for resolved in &self.0 {
            if seen.insert(resolved.edge.target.as_str()) {
                out.push(resolved.edge);
            }
            resolved.edges.collect_into(seen, out);
        }
    }
}

/// A step taken while traversing the schema graph: crossing `over` from
/// type `from`.
#[derive(Debug, Clone, PartialEq)]
struct Step<'a> {
    from: &'a str,
    over: &'a str,
}

impl fmt::Display for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.from, self.over)
    }
}

/// The sequence of steps on the current recursion branch. Owned exclusively
/// by one `edge_tree` call; every push is popped on every exit path so that
/// sibling branches never observe each other's state.
#[derive(Debug, Default)]
struct Walk<'a>(Vec<Step<'a>>);

impl<'a> Walk<'a> {
    fn push(&mut self, step: Step<'a>) {
        self.0.push(step);
    }

    fn pop(&mut self) {
        self.0.pop();
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// How often the given step occurs on the walk. With the step just
    /// pushed, 1 means "first visit".
    fn cycle_depth(&self, step: &Step<'a>) -> usize {
        self.0.iter().filter(|s| *s == step).count()
    }
}

/// Resolve the tree of edges to eager-load on `root` for the requested
/// serialization groups.
///
/// An edge is followed when its annotated groups match the requested ones.
/// Recursion into a followed edge is bounded per edge: once the same
/// traversal step occurs more often on the current branch than the edge's
/// `max_depth` allows (default 1), that subtree is abandoned and traversal
/// backtracks to its siblings. A walk exceeding [`MAX_DEPTH`] aborts with
/// [`Error::MaxDepth`].
pub fn edge_tree<'a>(
    graph: &'a Graph,
    root: &'a TypeDef,
    groups: &Groups,
) -> Result<Edges<'a>, Error> {
    let mut walk = Walk::default();
    let tree = collect(graph, root, &mut walk, groups);
    debug_assert!(walk.is_empty(), "unbalanced eager-load walk");
    tree
}

/// Recursively collect the edges to load on `node` for the requested groups.
fn collect<'a>(
    graph: &'a Graph,
    node: &'a TypeDef,
    walk: &mut Walk<'a>,
    groups: &Groups,
) -> Result<Edges<'a>, Error> {
    if walk.len() > MAX_DEPTH {
        return Err(Error::MaxDepth(MAX_DEPTH));
    }
    let mut out = Vec::new();
    for edge in &node.edges {
        let ant = edge_annotation(edge)?;
        // Only load the edge if it carries at least one requested group.
        if !ant.groups.matches(groups) {
            continue;
        }
        let step = Step {
            from: &node.name,
            over: &edge.name,
        };
        walk.push(step.clone());
        if walk.cycle_depth(&step) > ant.max_depth_or_default() {
            // Edge bound hit: abandon the subtree, keep the siblings.
            walk.pop();
            continue;
        }
        let sub = graph
            .node(&edge.target)
            .ok_or_else(|| Error::UnknownType(edge.target.clone()))
            .and_then(|target| collect(graph, target, walk, groups));
        // Restore the walk before propagating any error.
        walk.pop();
        out.push(ResolvedEdge {
            edge,
            edges: sub?,
        });
    }
    Ok(Edges(out))
}
