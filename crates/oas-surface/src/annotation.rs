//! Generator annotations for types, fields and edges.
//!
//! Annotations travel as opaque blobs inside [`entity_schema::Annotations`]
//! maps under [`ANNOTATION_KEY`] and are decoded here into typed metadata.
//! Decode is total: an absent blob yields the zero-value annotation, never
//! an error. A malformed blob aborts generation.

use crate::error::Error;
use crate::serialization::Groups;
use entity_schema::{Annotations, EdgeDef, FieldDef, TypeDef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key under which the surface annotation is stored in an annotation map.
pub const ANNOTATION_KEY: &str = "Oas";

/// Exposure policy for a single operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Unset: defer to the global default policy.
    #[default]
    None,
    /// Expose the operation.
    Expose,
    /// Suppress the operation, regardless of the global default.
    Exclude,
}

impl Policy {
    /// Whether the policy is unset.
    pub fn is_none(&self) -> bool {
        matches!(self, Policy::None)
    }
}

/// Metadata for one REST operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationConfig {
    /// Exposure policy.
    #[serde(skip_serializing_if = "Policy::is_none")]
    pub policy: Policy,
    /// Serialization groups requested for this operation's responses.
    ///
    /// `None` means "not set" and loses against any present list when
    /// merging; a present-but-empty list still wins wholesale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Groups>,
}

impl OperationConfig {
    /// A config with the given policy.
    pub fn policy(policy: Policy) -> Self {
        Self {
            policy,
            groups: None,
        }
    }

    /// A config exposing the operation.
    pub fn exposed() -> Self {
        Self::policy(Policy::Expose)
    }

    /// A config excluding the operation.
    pub fn excluded() -> Self {
        Self::policy(Policy::Exclude)
    }

    /// Set the serialization groups.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().collect());
        self
    }

    /// Merge a narrower override into this config. A non-`None` override
    /// policy wins; a present override group list wins wholesale.
    fn merge(&mut self, other: &OperationConfig) {
        if other.policy != Policy::None {
            self.policy = other.policy;
        }
        if other.groups.is_some() {
            self.groups = other.groups.clone();
        }
    }
}

/// Generator metadata for a type, field or edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotation {
    /// Serialization groups this field/edge belongs to.
    #[serde(skip_serializing_if = "Groups::is_empty")]
    pub groups: Groups,
    /// Example value for the emitted schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Raw OAS schema object overriding the derived one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Create operation metadata.
    pub create: OperationConfig,
    /// Read operation metadata.
    pub read: OperationConfig,
    /// Update operation metadata.
    pub update: OperationConfig,
    /// Delete operation metadata.
    pub delete: OperationConfig,
    /// List operation metadata.
    pub list: OperationConfig,
    /// Read-only fields/edges take no create/update parameter.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    /// Skipped fields are left out of the emitted document entirely.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,
    /// Eager-load bound for this edge: how many times the same traversal
    /// step may appear on one walk branch. Zero means unset (bound 1).
    #[serde(skip_serializing_if = "is_zero")]
    pub max_depth: usize,
    /// Vendor extensions, emitted as `x-` properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Annotation {
    /// An annotation carrying only serialization groups.
    pub fn groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().collect(),
            ..Self::default()
        }
    }

    /// An annotation carrying only an example value.
    pub fn example(value: impl Into<Value>) -> Self {
        Self {
            example: Some(value.into()),
            ..Self::default()
        }
    }

    /// An annotation carrying only a schema override.
    pub fn schema(value: Value) -> Self {
        Self {
            schema: Some(value),
            ..Self::default()
        }
    }

    /// An annotation carrying only create-operation metadata.
    pub fn create(config: OperationConfig) -> Self {
        Self {
            create: config,
            ..Self::default()
        }
    }

    /// An annotation carrying only read-operation metadata.
    pub fn read(config: OperationConfig) -> Self {
        Self {
            read: config,
            ..Self::default()
        }
    }

    /// An annotation carrying only update-operation metadata.
    pub fn update(config: OperationConfig) -> Self {
        Self {
            update: config,
            ..Self::default()
        }
    }

    /// An annotation carrying only delete-operation metadata.
    pub fn delete(config: OperationConfig) -> Self {
        Self {
            delete: config,
            ..Self::default()
        }
    }

    /// An annotation carrying only list-operation metadata.
    pub fn list(config: OperationConfig) -> Self {
        Self {
            list: config,
            ..Self::default()
        }
    }

    /// An annotation marking the element read-only.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// An annotation marking the element skipped.
    pub fn skip() -> Self {
        Self {
            skip: true,
            ..Self::default()
        }
    }

    /// An annotation setting the eager-load bound.
    pub fn max_depth(depth: usize) -> Self {
        Self {
            max_depth: depth,
            ..Self::default()
        }
    }

    /// An annotation carrying a single vendor extension.
    pub fn extension(key: impl Into<String>, value: Value) -> Self {
        let mut extensions = BTreeMap::new();
        extensions.insert(key.into(), value);
        Self {
            extensions,
            ..Self::default()
        }
    }

    /// Merge a narrower annotation into this one, returning the result.
    ///
    /// Scalars are overwritten only when the override sets a
    /// non-empty/non-false/non-zero value; the five operation configs merge
    /// individually; extension entries merge per key, override wins. The
    /// base group set is kept as-is.
    pub fn merge(mut self, other: Annotation) -> Annotation {
        if other.example.is_some() {
            self.example = other.example;
        }
        if other.schema.is_some() {
            self.schema = other.schema;
        }
        self.create.merge(&other.create);
        self.read.merge(&other.read);
        self.update.merge(&other.update);
        self.delete.merge(&other.delete);
        self.list.merge(&other.list);
        if other.read_only {
            self.read_only = true;
        }
        if other.skip {
            self.skip = true;
        }
        if other.max_depth != 0 {
            self.max_depth = other.max_depth;
        }
        self.extensions.extend(other.extensions);
        self
    }

    /// The effective eager-load bound: `max_depth`, defaulting to 1.
    pub fn max_depth_or_default(&self) -> usize {
        if self.max_depth == 0 {
            1
        } else {
            self.max_depth
        }
    }

    /// Decode an annotation blob.
    pub fn decode(value: &Value) -> Result<Annotation, Error> {
        serde_json::from_value(value.clone()).map_err(|e| Error::InvalidAnnotation(e.to_string()))
    }

    /// Decode the annotation out of an annotation map. Absent blobs yield
    /// the zero-value annotation.
    pub fn of(annotations: &Annotations) -> Result<Annotation, Error> {
        match annotations.get(ANNOTATION_KEY) {
            Some(blob) => Self::decode(blob),
            None => Ok(Annotation::default()),
        }
    }

    /// Encode the annotation into a blob suitable for an annotation map.
    pub fn to_value(&self) -> Value {
        // Every field of the annotation maps onto plain JSON; serialization
        // cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// The annotation attached to a type.
pub fn type_annotation(node: &TypeDef) -> Result<Annotation, Error> {
    Annotation::of(&node.annotations)
}

/// The annotation attached to a field.
pub fn field_annotation(field: &FieldDef) -> Result<Annotation, Error> {
    Annotation::of(&field.annotations)
}

/// The annotation attached to an edge.
pub fn edge_annotation(edge: &EdgeDef) -> Result<Annotation, Error> {
    Annotation::of(&edge.annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors() {
        let a = Annotation::read_only();
        assert!(a.read_only);

        let a = Annotation::groups(["create", "groups"]);
        assert_eq!(a.groups, Groups::from_iter(["create", "groups"]));

        let a = Annotation::create(OperationConfig::exposed().with_groups(["create", "groups"]));
        assert_eq!(a.create.policy, Policy::Expose);
        assert_eq!(
            a.create.groups,
            Some(Groups::from_iter(["create", "groups"]))
        );

        let a = Annotation::example("example");
        assert_eq!(a.example, Some(json!("example")));

        let a = Annotation::max_depth(3);
        assert_eq!(a.max_depth_or_default(), 3);
        assert_eq!(Annotation::default().max_depth_or_default(), 1);
    }

    #[test]
    fn merge_disjoint_fields() {
        // Merging disjoint annotations equals constructing them directly.
        let a = Annotation::list(OperationConfig::exposed().with_groups(["list", "groups"]));
        let b = Annotation::example("example");
        let c = Annotation::schema(json!({"type": "string", "format": "binary"}));

        let merged = a.merge(b).merge(c);
        let expected = Annotation {
            example: Some(json!("example")),
            schema: Some(json!({"type": "string", "format": "binary"})),
            list: OperationConfig::exposed().with_groups(["list", "groups"]),
            ..Annotation::default()
        };
        assert_eq!(merged, expected);
    }

    #[test]
    fn merge_is_idempotent() {
        let a = Annotation::read(OperationConfig::excluded()).merge(Annotation::skip());
        let again = a.clone().merge(a.clone());
        assert_eq!(a, again);
    }

    #[test]
    fn merge_override_wins() {
        let base = Annotation::create(OperationConfig::exposed().with_groups(["base"]))
            .merge(Annotation::example("old"));
        let merged = base.merge(
            Annotation::create(OperationConfig::excluded()).merge(Annotation::example("new")),
        );
        assert_eq!(merged.create.policy, Policy::Exclude);
        // Groups were not set on the override, the base list survives.
        assert_eq!(merged.create.groups, Some(Groups::from_iter(["base"])));
        assert_eq!(merged.example, Some(json!("new")));
    }

    #[test]
    fn merge_present_empty_groups_win() {
        let base = Annotation::read(OperationConfig::default().with_groups(["base"]));
        let merged = base.merge(Annotation::read(
            OperationConfig::default().with_groups(Vec::<String>::new()),
        ));
        assert_eq!(merged.read.groups, Some(Groups::new()));
    }

    #[test]
    fn decode_is_total() {
        let ant = Annotation::of(&Annotations::new()).unwrap();
        assert_eq!(ant, Annotation::default());

        let mut map = Annotations::new();
        map.insert(ANNOTATION_KEY.into(), json!({"read_only": true}));
        let ant = Annotation::of(&map).unwrap();
        assert!(ant.read_only);
        assert!(!ant.skip);
    }

    #[test]
    fn decode_failure_propagates() {
        let mut map = Annotations::new();
        map.insert(ANNOTATION_KEY.into(), json!({"max_depth": "not a number"}));
        let err = Annotation::of(&map).unwrap_err();
        assert!(matches!(err, Error::InvalidAnnotation(_)));
    }

    #[test]
    fn element_accessors() {
        use entity_schema::{EdgeDef, FieldDef, FieldType, TypeDef};

        let ant = Annotation::groups(["a"]);
        let node = TypeDef::new("Pet").with_annotation(ANNOTATION_KEY, ant.to_value());
        assert_eq!(type_annotation(&node).unwrap(), ant);
        assert_eq!(
            type_annotation(&TypeDef::new("User")).unwrap(),
            Annotation::default()
        );

        let field = FieldDef::new("name", FieldType::String)
            .with_annotation(ANNOTATION_KEY, ant.to_value());
        assert_eq!(field_annotation(&field).unwrap(), ant);

        let edge = EdgeDef::new("owner", "User").with_annotation(ANNOTATION_KEY, ant.to_value());
        assert_eq!(edge_annotation(&edge).unwrap(), ant);
    }

    #[test]
    fn round_trips_through_blob() {
        let ant = Annotation::groups(["a", "b"])
            .merge(Annotation::list(OperationConfig::exposed()))
            .merge(Annotation::extension("page-token", json!(true)));
        let decoded = Annotation::decode(&ant.to_value()).unwrap();
        assert_eq!(ant, decoded);
    }
}
