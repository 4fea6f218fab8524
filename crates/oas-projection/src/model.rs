//! The OpenAPI document model.
//!
//! A deliberately small subset of OpenAPI 3.0: exactly what the generator
//! emits. Maps with deterministic iteration order (`BTreeMap` for
//! components and paths, `IndexMap` for properties so fields keep their
//! declaration order).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The JSON media type key used for every request and response body.
pub const JSON: &str = "application/json";

/// An OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    /// OpenAPI version tag.
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// Routes, keyed by path template.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub paths: BTreeMap<String, PathItem>,
    /// Reusable components.
    #[serde(default)]
    pub components: Components,
}

impl Spec {
    /// A document stub with the given info block.
    pub fn new(info: Info) -> Self {
        Self {
            openapi: "3.0.3".to_string(),
            info,
            paths: BTreeMap::new(),
            components: Components::default(),
        }
    }

    /// The path item for the given route, created on first use.
    pub fn path(&mut self, route: impl Into<String>) -> &mut PathItem {
        self.paths.entry(route.into()).or_default()
    }
}

/// The info block of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub version: String,
}

/// Reusable schemas, responses and parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Components {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, Schema>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, Response>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Parameter>,
}

/// The operations available on one route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<OperationSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<OperationSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<OperationSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<OperationSpec>,
}

/// One operation on a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, ResponseRef>,
}

/// A response, inline or referencing a reusable component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseRef {
    /// Reference into `#/components/responses`.
    Ref {
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// Inline response.
    Inline(Response),
}

impl ResponseRef {
    /// A reference to the reusable response registered under `code`.
    pub fn component(code: &str) -> Self {
        ResponseRef::Ref {
            reference: format!("#/components/responses/{code}"),
        }
    }
}

/// A response body description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,
}

impl Response {
    /// A response with a description and no content.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            content: BTreeMap::new(),
        }
    }

    /// Attach a JSON body schema.
    pub fn with_json(mut self, schema: Schema) -> Self {
        self.content.insert(JSON.to_string(), MediaType { schema });
        self
    }
}

/// A single media type entry of a request or response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// A request body description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,
}

impl RequestBody {
    /// A JSON request body with the given schema.
    pub fn json(description: impl Into<String>, schema: Schema) -> Self {
        let mut content = BTreeMap::new();
        content.insert(JSON.to_string(), MediaType { schema });
        Self {
            description: description.into(),
            content,
        }
    }
}

/// Where a parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    pub schema: Schema,
}

impl Parameter {
    /// A query parameter.
    pub fn query(name: impl Into<String>, description: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Query,
            description: description.into(),
            required: false,
            schema,
        }
    }

    /// A required path parameter.
    pub fn path(name: impl Into<String>, description: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            description: description.into(),
            required: true,
            schema,
        }
    }
}

/// A schema object: scalar, array, object or `$ref`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    /// Vendor extensions and any keys carried over from schema overrides.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Schema {
    /// A schema with the given `type`.
    pub fn typed(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }

    fn formatted(schema_type: &str, format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            ..Self::typed(schema_type)
        }
    }

    /// An empty object schema.
    pub fn object() -> Self {
        Self::typed("object")
    }

    pub fn boolean() -> Self {
        Self::typed("boolean")
    }

    pub fn string() -> Self {
        Self::typed("string")
    }

    /// Base64 encoded bytes.
    pub fn bytes() -> Self {
        Self::formatted("string", "byte")
    }

    pub fn date_time() -> Self {
        Self::formatted("string", "date-time")
    }

    pub fn int32() -> Self {
        Self::formatted("integer", "int32")
    }

    pub fn int64() -> Self {
        Self::formatted("integer", "int64")
    }

    pub fn float() -> Self {
        Self::formatted("number", "float")
    }

    pub fn double() -> Self {
        Self::formatted("number", "double")
    }

    /// A string enum over the given values.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enum_values: values.into_iter().map(|v| Value::String(v.into())).collect(),
            ..Self::typed("string")
        }
    }

    /// An array of the given item schema.
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed("array")
        }
    }

    /// A local reference to the component schema with the given name.
    pub fn local_ref(name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{name}")),
            ..Self::default()
        }
    }

    /// Add a property, marking it required if requested.
    pub fn add_property(&mut self, name: impl Into<String>, schema: Schema, required: bool) {
        let name = name.into();
        if required {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ref_serializes_as_dollar_ref() {
        let v = serde_json::to_value(Schema::local_ref("PetRead")).unwrap();
        assert_eq!(v, json!({"$ref": "#/components/schemas/PetRead"}));
    }

    #[test]
    fn empty_fields_are_skipped() {
        let v = serde_json::to_value(Schema::string()).unwrap();
        assert_eq!(v, json!({"type": "string"}));

        let v = serde_json::to_value(Response::new("ok")).unwrap();
        assert_eq!(v, json!({"description": "ok"}));
    }

    #[test]
    fn properties_keep_insertion_order() {
        let mut s = Schema::object();
        s.add_property("zebra", Schema::string(), true);
        s.add_property("aardvark", Schema::int32(), false);
        let text = serde_json::to_string(&s).unwrap();
        assert!(text.find("zebra").unwrap() < text.find("aardvark").unwrap());
    }

    #[test]
    fn response_ref_untagged() {
        let v = serde_json::to_value(ResponseRef::component("404")).unwrap();
        assert_eq!(v, json!({"$ref": "#/components/responses/404"}));

        let v = serde_json::to_value(ResponseRef::Inline(Response::new("gone"))).unwrap();
        assert_eq!(v, json!({"description": "gone"}));
    }

    #[test]
    fn array_wraps_items() {
        let v = serde_json::to_value(Schema::array(Schema::local_ref("User"))).unwrap();
        assert_eq!(
            v,
            json!({"type": "array", "items": {"$ref": "#/components/schemas/User"}})
        );
    }
}
