//! End-to-end generation over a small pet-store schema.

use entity_schema::{EdgeDef, FieldDef, FieldType, Graph, TypeDef};
use oas_projection::{Extension, ResponseRef, Schema};
use oas_surface::{Annotation, OperationConfig, ANNOTATION_KEY};
use pretty_assertions::assert_eq;

/// Pet <-> User with a grouped owner edge and a sensitive field.
fn petstore() -> Graph {
    Graph::new()
        .with_node(
            TypeDef::new("Pet")
                .with_field(FieldDef::new("name", FieldType::String))
                .with_field(
                    FieldDef::new("age", FieldType::Int).optional(),
                )
                .with_field(FieldDef::new("chip_code", FieldType::String).sensitive())
                .with_annotation(
                    ANNOTATION_KEY,
                    Annotation::read(OperationConfig::default().with_groups(["pet:read"]))
                        .to_value(),
                )
                .with_edge(
                    EdgeDef::new("owner", "User").unique().optional().with_annotation(
                        ANNOTATION_KEY,
                        Annotation::groups(["pet:read"]).to_value(),
                    ),
                ),
        )
        .with_node(
            TypeDef::new("User")
                .with_field(FieldDef::new("email", FieldType::String))
                .with_field(FieldDef::new("password_hash", FieldType::String).sensitive()),
        )
}

#[test]
fn component_schemas_cover_types_and_views() {
    let spec = Extension::new().generate(&petstore()).unwrap();
    let schemas = &spec.components.schemas;

    // Raw type schemas.
    assert!(schemas.contains_key("Pet"));
    assert!(schemas.contains_key("User"));

    // One view per non-delete operation.
    for name in [
        "PetCreate", "PetRead", "PetUpdate", "PetList", "UserCreate", "UserRead", "UserUpdate",
        "UserList",
    ] {
        assert!(schemas.contains_key(name), "missing view schema {name}");
    }
    assert!(!schemas.contains_key("PetDelete"));

    // The read operation requests "pet:read", pulling in the owner view.
    assert!(schemas.contains_key("PetRead_Owner"));
    // The unique owner edge exposes a second-level read view.
    assert!(schemas.contains_key("Pet_OwnerRead"));
}

#[test]
fn sensitive_fields_stay_out_of_views() {
    let spec = Extension::new().generate(&petstore()).unwrap();
    let pet_read = &spec.components.schemas["PetRead"];
    assert!(pet_read.properties.contains_key("name"));
    assert!(!pet_read.properties.contains_key("chip_code"));

    let user_read = &spec.components.schemas["UserRead"];
    assert!(!user_read.properties.contains_key("password_hash"));
}

#[test]
fn view_edges_reference_eager_load_views() {
    let spec = Extension::new().generate(&petstore()).unwrap();
    let pet_read = &spec.components.schemas["PetRead"];
    assert_eq!(
        pet_read.properties.get("owner"),
        Some(&Schema::local_ref("PetRead_Owner"))
    );
    // The create view requested no groups: no owner property.
    let pet_create = &spec.components.schemas["PetCreate"];
    assert!(!pet_create.properties.contains_key("owner"));
}

#[test]
fn every_local_ref_resolves() {
    let spec = Extension::new().generate(&petstore()).unwrap();
    let doc = serde_json::to_value(&spec).unwrap();

    let mut refs = Vec::new();
    collect_refs(&doc, &mut refs);
    assert!(!refs.is_empty());
    for reference in refs {
        let resolved = if let Some(name) = reference.strip_prefix("#/components/schemas/") {
            spec.components.schemas.contains_key(name)
        } else if let Some(code) = reference.strip_prefix("#/components/responses/") {
            spec.components.responses.contains_key(code)
        } else {
            false
        };
        assert!(resolved, "dangling reference {reference}");
    }
}

fn collect_refs(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, inner) in map {
                if key == "$ref" {
                    if let Some(target) = inner.as_str() {
                        out.push(target.to_string());
                    }
                } else {
                    collect_refs(inner, out);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for inner in items {
                collect_refs(inner, out);
            }
        }
        _ => {}
    }
}

#[test]
fn paths_cover_crud_and_sub_resources() {
    let spec = Extension::new().generate(&petstore()).unwrap();
    let keys: Vec<_> = spec.paths.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["/pets", "/pets/{id}", "/pets/{id}/owner", "/users", "/users/{id}"]
    );

    let pets = &spec.paths["/pets"];
    assert!(pets.post.is_some(), "create");
    assert!(pets.get.is_some(), "list");

    let pet = &spec.paths["/pets/{id}"];
    assert!(pet.get.is_some(), "read");
    assert!(pet.patch.is_some(), "update");
    assert!(pet.delete.is_some(), "delete");

    let owner = &spec.paths["/pets/{id}/owner"];
    let read = owner.get.as_ref().unwrap();
    assert_eq!(read.operation_id, "readPetOwner");
    match &read.responses["200"] {
        ResponseRef::Inline(response) => {
            let media = &response.content["application/json"];
            assert_eq!(media.schema, Schema::local_ref("Pet_OwnerRead"));
        }
        other => panic!("expected inline 200 response, got {other:?}"),
    }
}

#[test]
fn request_bodies_filter_writable_fields() {
    let graph = Graph::new().with_node(
        TypeDef::new("Account")
            .with_field(FieldDef::new("login", FieldType::String).immutable())
            .with_field(
                FieldDef::new("display_name", FieldType::String).optional(),
            )
            .with_field(
                FieldDef::new("created_at", FieldType::Time)
                    .with_annotation(ANNOTATION_KEY, Annotation::read_only().to_value()),
            )
            .with_field(
                FieldDef::new("internal_notes", FieldType::String)
                    .with_annotation(ANNOTATION_KEY, Annotation::skip().to_value()),
            ),
    );
    let spec = Extension::new().generate(&graph).unwrap();

    let create = spec.paths["/accounts"].post.as_ref().unwrap();
    let body = create.request_body.as_ref().unwrap();
    let schema = &body.content["application/json"].schema;
    assert!(schema.properties.contains_key("login"));
    assert!(schema.properties.contains_key("display_name"));
    assert!(!schema.properties.contains_key("created_at"), "read-only");
    assert!(!schema.properties.contains_key("internal_notes"), "skipped");
    assert_eq!(schema.required, vec!["login"]);

    let update = spec.paths["/accounts/{id}"].patch.as_ref().unwrap();
    let schema = &update.request_body.as_ref().unwrap().content["application/json"].schema;
    assert!(!schema.properties.contains_key("login"), "immutable");
    assert!(schema.properties.contains_key("display_name"));
    // Update bodies never require properties.
    assert!(schema.required.is_empty());
}

#[test]
fn pagination_parameters_carry_config_bounds() {
    let mut ext = Extension::new().min_items_per_page(5).max_items_per_page(100);
    let spec = ext.generate(&petstore()).unwrap();

    let list = spec.paths["/pets"].get.as_ref().unwrap();
    let items = list
        .parameters
        .iter()
        .find(|p| p.name == "itemsPerPage")
        .expect("itemsPerPage parameter");
    assert_eq!(items.schema.minimum, Some(5));
    assert_eq!(items.schema.maximum, Some(100));
    assert_eq!(items.schema.default_value, Some(serde_json::json!(30)));
    assert!(list.parameters.iter().any(|p| p.name == "page"));
}

#[test]
fn simple_models_emit_one_schema_per_type() {
    let spec = Extension::new()
        .simple_models()
        .generate(&petstore())
        .unwrap();
    let keys: Vec<_> = spec.components.schemas.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Pet", "User"]);

    // Responses reference the shared models directly.
    let read = spec.paths["/pets/{id}"].get.as_ref().unwrap();
    match &read.responses["200"] {
        ResponseRef::Inline(response) => {
            assert_eq!(
                response.content["application/json"].schema,
                Schema::local_ref("Pet")
            );
        }
        other => panic!("expected inline 200 response, got {other:?}"),
    }
}

#[test]
fn canned_error_responses_registered() {
    let spec = Extension::new().generate(&petstore()).unwrap();
    for code in ["400", "403", "404", "409", "500"] {
        assert!(
            spec.components.responses.contains_key(code),
            "missing response {code}"
        );
    }
}

#[test]
fn dangling_edge_target_aborts_generation() {
    let graph = Graph::new().with_node(
        TypeDef::new("Pet").with_edge(EdgeDef::new("owner", "Ghost").unique()),
    );
    let err = Extension::new().generate(&graph).unwrap_err();
    assert_eq!(
        err.to_string(),
        "schema \"Ghost\" not found for edge \"owner\" on \"Pet\""
    );
}
