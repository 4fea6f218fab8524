//! Document assembly from the computed surface.

use crate::error::GeneratorError;
use crate::model::{
    OperationSpec, Parameter, RequestBody, Response, ResponseRef, Schema, Spec,
};
use convert_case::{Case, Casing};
use entity_schema::{EdgeDef, FieldDef, FieldType, Graph, TypeDef};
use oas_surface::{
    edge_annotation, edge_operations, edge_view_name, field_annotation, node_operations,
    view_name, view_name_edge, views, Annotation, Config, Operation,
};
use serde_json::Value;
use tracing::debug;

/// Fill the given document stub from the graph: component schemas, canned
/// error responses and all exposed paths.
pub fn generate(graph: &Graph, spec: &mut Spec) -> Result<(), GeneratorError> {
    schemas(graph, spec)?;
    error_responses(spec);
    paths(graph, spec)
}

/// Add one component schema per type and, unless simple models are enabled,
/// one per view.
fn schemas(graph: &Graph, spec: &mut Spec) -> Result<(), GeneratorError> {
    let cfg = Config::from_graph(graph)?;
    for node in &graph.nodes {
        let mut schema = Schema::object();
        add_schema_fields(
            &mut schema,
            std::iter::once(&node.id).chain(node.fields.iter()),
        )?;
        spec.components.schemas.insert(node.name.clone(), schema);
    }
    // Second pass for the edges, now that every target schema exists.
    for node in &graph.nodes {
        for edge in &node.edges {
            if !spec.components.schemas.contains_key(&edge.target) {
                return Err(GeneratorError::UnknownSchema {
                    schema: edge.target.clone(),
                    edge: edge.name.clone(),
                    node: node.name.clone(),
                });
            }
            let mut prop = Schema::local_ref(&edge.target);
            if !edge.unique {
                prop = Schema::array(prop);
            }
            if let Some(schema) = spec.components.schemas.get_mut(&node.name) {
                schema.add_property(&edge.name, prop, !edge.optional);
            }
        }
    }
    if !cfg.simple_models {
        let all_views = views(graph)?;
        for (name, view) in &all_views {
            let mut schema = Schema::object();
            add_schema_fields(&mut schema, view.fields.iter().copied())?;
            spec.components.schemas.insert(name.clone(), schema);
        }
        // Edges on a view reference the eager-load view registered under
        // the parent view's name prefix.
        for (name, view) in &all_views {
            for edge in &view.edges {
                let prefix = name.split('_').next().unwrap_or(name.as_str());
                let ref_name = view_name_edge(&cfg, prefix, edge);
                if !spec.components.schemas.contains_key(&ref_name) {
                    return Err(GeneratorError::UnknownSchema {
                        schema: ref_name,
                        edge: edge.name.clone(),
                        node: name.clone(),
                    });
                }
                let mut prop = Schema::local_ref(&ref_name);
                if !edge.unique {
                    prop = Schema::array(prop);
                }
                if let Some(schema) = spec.components.schemas.get_mut(name) {
                    schema.add_property(&edge.name, prop, !edge.optional);
                }
            }
        }
    }
    debug!(schemas = spec.components.schemas.len(), "added component schemas");
    Ok(())
}

/// Add the given fields as properties, skipping annotated skips.
fn add_schema_fields<'a, I>(schema: &mut Schema, fields: I) -> Result<(), GeneratorError>
where
    I: Iterator<Item = &'a FieldDef>,
{
    for field in fields {
        let ant = field_annotation(field)?;
        if ant.skip {
            continue;
        }
        let prop = property_schema(field, &ant)?;
        schema.add_property(&field.name, prop, !field.optional);
    }
    Ok(())
}

/// The property schema for a field: the annotation override when present,
/// otherwise derived from the field type; example and vendor extensions
/// spliced in either way.
fn property_schema(field: &FieldDef, ant: &Annotation) -> Result<Schema, GeneratorError> {
    let mut schema = match &ant.schema {
        Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
            GeneratorError::InvalidSchemaOverride {
                field: field.name.clone(),
                message: e.to_string(),
            }
        })?,
        None => schema_for_type(&field.ty, field.default.as_ref()),
    };
    if let Some(example) = &ant.example {
        schema.example = Some(example.clone());
    }
    for (key, value) in &ant.extensions {
        let key = if key.starts_with("x-") {
            key.clone()
        } else {
            format!("x-{key}")
        };
        schema.extra.insert(key, value.clone());
    }
    Ok(schema)
}

fn schema_for_type(ty: &FieldType, default: Option<&Value>) -> Schema {
    match ty {
        FieldType::Bool => Schema::boolean(),
        FieldType::String | FieldType::Uuid => Schema::string(),
        FieldType::Bytes => Schema::bytes(),
        FieldType::Time => Schema::date_time(),
        FieldType::Int
        | FieldType::Int8
        | FieldType::Int16
        | FieldType::Int32
        | FieldType::Uint
        | FieldType::Uint8
        | FieldType::Uint16
        | FieldType::Uint32 => Schema::int32(),
        FieldType::Int64 | FieldType::Uint64 => Schema::int64(),
        FieldType::Float32 => Schema::float(),
        FieldType::Float64 => Schema::double(),
        FieldType::Enum(values) => {
            let mut schema = Schema::enumeration(values.iter().cloned());
            schema.default_value = default.cloned();
            schema
        }
        FieldType::List(inner) => Schema::array(schema_for_type(inner, None)),
    }
}

/// Register the canned error responses referenced by every operation.
fn error_responses(spec: &mut Spec) {
    for (code, description) in [
        ("400", "invalid input, data invalid"),
        ("403", "insufficient permissions"),
        ("404", "resource not found"),
        ("409", "conflicting resources"),
        ("500", "unexpected error"),
    ] {
        let mut schema = Schema::object();
        schema.add_property("code", Schema::int32(), true);
        schema.add_property("status", Schema::string(), true);
        schema.add_property("errors", Schema::default(), false);
        spec.components
            .responses
            .insert(code.to_string(), Response::new(description).with_json(schema));
    }
}

/// Add every exposed operation to the document paths.
fn paths(graph: &Graph, spec: &mut Spec) -> Result<(), GeneratorError> {
    let cfg = Config::from_graph(graph)?;
    for node in &graph.nodes {
        let ops = node_operations(graph, node)?;
        let root = format!("/{}", pluralize(&node.name.to_case(Case::Kebab)));
        if ops.contains(&Operation::Create) {
            spec.path(root.clone()).post = Some(create_op(&cfg, graph, node)?);
        }
        if ops.contains(&Operation::Read) {
            spec.path(format!("{root}/{{id}}")).get = Some(read_op(&cfg, node)?);
        }
        if ops.contains(&Operation::Update) {
            spec.path(format!("{root}/{{id}}")).patch = Some(update_op(&cfg, graph, node)?);
        }
        if ops.contains(&Operation::Delete) {
            spec.path(format!("{root}/{{id}}")).delete = Some(delete_op(node)?);
        }
        if ops.contains(&Operation::List) {
            spec.path(root.clone()).get = Some(list_op(&cfg, node)?);
        }
        // Sub-resource operations on the edges.
        for edge in &node.edges {
            let edge_ops = edge_operations(graph, edge)?;
            let sub = format!("{root}/{{id}}/{}", edge.name.to_case(Case::Kebab));
            if edge_ops.contains(&Operation::Read) {
                spec.path(sub.clone()).get = Some(read_edge_op(&cfg, node, edge)?);
            }
            if edge_ops.contains(&Operation::List) {
                spec.path(sub.clone()).get = Some(list_edge_op(&cfg, node, edge)?);
            }
        }
    }
    debug!(paths = spec.paths.len(), "added paths");
    Ok(())
}

fn id_param(node: &TypeDef) -> Result<Parameter, GeneratorError> {
    let ant = field_annotation(&node.id)?;
    Ok(Parameter::path(
        "id",
        format!("ID of the {}", node.name),
        property_schema(&node.id, &ant)?,
    ))
}

fn error_refs(op: &mut OperationSpec, codes: &[&str]) {
    for code in codes {
        op.responses
            .insert((*code).to_string(), ResponseRef::component(code));
    }
}

fn create_op(cfg: &Config, graph: &Graph, node: &TypeDef) -> Result<OperationSpec, GeneratorError> {
    let mut op = OperationSpec {
        summary: format!("Create a new {}", node.name),
        description: format!("Creates a new {} and persists it to storage.", node.name),
        tags: vec![node.name.clone()],
        operation_id: format!("create{}", node.name),
        request_body: Some(request_body(graph, node, Operation::Create)?),
        ..OperationSpec::default()
    };
    op.responses.insert(
        "200".to_string(),
        ResponseRef::Inline(
            Response::new(format!("{} created", node.name))
                .with_json(Schema::local_ref(&view_name(cfg, node, Operation::Create))),
        ),
    );
    error_refs(&mut op, &["400", "409", "500"]);
    Ok(op)
}

fn read_op(cfg: &Config, node: &TypeDef) -> Result<OperationSpec, GeneratorError> {
    let mut op = OperationSpec {
        summary: format!("Find a {} by ID", node.name),
        description: format!("Finds the {} with the requested ID and returns it.", node.name),
        tags: vec![node.name.clone()],
        operation_id: format!("read{}", node.name),
        parameters: vec![id_param(node)?],
        ..OperationSpec::default()
    };
    op.responses.insert(
        "200".to_string(),
        ResponseRef::Inline(
            Response::new(format!("{} with requested ID was found", node.name))
                .with_json(Schema::local_ref(&view_name(cfg, node, Operation::Read))),
        ),
    );
    error_refs(&mut op, &["400", "404", "500"]);
    Ok(op)
}

fn update_op(cfg: &Config, graph: &Graph, node: &TypeDef) -> Result<OperationSpec, GeneratorError> {
    let mut op = OperationSpec {
        summary: format!("Updates a {}", node.name),
        description: format!("Updates a {} and persists changes to storage.", node.name),
        tags: vec![node.name.clone()],
        operation_id: format!("update{}", node.name),
        parameters: vec![id_param(node)?],
        request_body: Some(request_body(graph, node, Operation::Update)?),
        ..OperationSpec::default()
    };
    op.responses.insert(
        "200".to_string(),
        ResponseRef::Inline(
            Response::new(format!("{} updated", node.name))
                .with_json(Schema::local_ref(&view_name(cfg, node, Operation::Update))),
        ),
    );
    error_refs(&mut op, &["400", "404", "500"]);
    Ok(op)
}

fn delete_op(node: &TypeDef) -> Result<OperationSpec, GeneratorError> {
    let mut op = OperationSpec {
        summary: format!("Deletes a {} by ID", node.name),
        description: format!("Deletes the {} with the requested ID.", node.name),
        tags: vec![node.name.clone()],
        operation_id: format!("delete{}", node.name),
        parameters: vec![id_param(node)?],
        ..OperationSpec::default()
    };
    op.responses.insert(
        "204".to_string(),
        ResponseRef::Inline(Response::new(format!(
            "{} with requested ID was deleted",
            node.name
        ))),
    );
    error_refs(&mut op, &["400", "404", "500"]);
    Ok(op)
}

fn list_op(cfg: &Config, node: &TypeDef) -> Result<OperationSpec, GeneratorError> {
    let plural = pluralize(&node.name);
    let mut op = OperationSpec {
        summary: format!("List {plural}"),
        description: format!("List {plural}."),
        tags: vec![node.name.clone()],
        operation_id: format!("list{}", node.name),
        parameters: pagination_params(cfg),
        ..OperationSpec::default()
    };
    op.responses.insert(
        "200".to_string(),
        ResponseRef::Inline(
            Response::new(format!("result {} list", node.name)).with_json(Schema::array(
                Schema::local_ref(&view_name(cfg, node, Operation::List)),
            )),
        ),
    );
    error_refs(&mut op, &["400", "404", "500"]);
    Ok(op)
}

fn read_edge_op(
    cfg: &Config,
    node: &TypeDef,
    edge: &EdgeDef,
) -> Result<OperationSpec, GeneratorError> {
    let mut op = OperationSpec {
        summary: format!("Find the attached {}", edge.target),
        description: format!(
            "Find the attached {} of the {} with the given ID",
            edge.target, node.name
        ),
        tags: vec![node.name.clone()],
        operation_id: format!("read{}{}", node.name, edge.struct_field_name()),
        parameters: vec![id_param(node)?],
        ..OperationSpec::default()
    };
    op.responses.insert(
        "200".to_string(),
        ResponseRef::Inline(
            Response::new(format!(
                "{} attached to {} with requested ID was found",
                edge.target, node.name
            ))
            .with_json(Schema::local_ref(&edge_view_name(
                cfg,
                node,
                edge,
                Operation::Read,
            ))),
        ),
    );
    error_refs(&mut op, &["400", "404", "500"]);
    Ok(op)
}

fn list_edge_op(
    cfg: &Config,
    node: &TypeDef,
    edge: &EdgeDef,
) -> Result<OperationSpec, GeneratorError> {
    let plural = pluralize(&edge.struct_field_name());
    let mut op = OperationSpec {
        summary: format!("List attached {plural}"),
        description: format!("List attached {plural}."),
        tags: vec![node.name.clone()],
        operation_id: format!("list{}{}", node.name, edge.struct_field_name()),
        parameters: {
            let mut params = vec![id_param(node)?];
            params.extend(pagination_params(cfg));
            params
        },
        ..OperationSpec::default()
    };
    op.responses.insert(
        "200".to_string(),
        ResponseRef::Inline(
            Response::new(format!("result {} list", pluralize(&node.name))).with_json(
                Schema::array(Schema::local_ref(&edge_view_name(
                    cfg,
                    node,
                    edge,
                    Operation::List,
                ))),
            ),
        ),
    );
    error_refs(&mut op, &["400", "404", "500"]);
    Ok(op)
}

/// The request body for a create or update operation: writable fields plus
/// edge identifiers.
fn request_body(
    graph: &Graph,
    node: &TypeDef,
    op: Operation,
) -> Result<RequestBody, GeneratorError> {
    let description = match op {
        Operation::Create => format!("{} to create", node.name),
        _ => format!("{} properties to update", node.name),
    };
    let mut schema = Schema::object();
    for field in &node.fields {
        if op == Operation::Update && field.immutable {
            continue;
        }
        let ant = field_annotation(field)?;
        if ant.skip || ant.read_only {
            continue;
        }
        schema.add_property(
            &field.name,
            property_schema(field, &ant)?,
            op == Operation::Create && !field.optional,
        );
    }
    for edge in &node.edges {
        let target = graph
            .node(&edge.target)
            .ok_or_else(|| GeneratorError::UnknownType(edge.target.clone()))?;
        let ant = edge_annotation(edge)?;
        if ant.skip || ant.read_only {
            continue;
        }
        let id_ant = field_annotation(&target.id)?;
        let id_schema = property_schema(&target.id, &id_ant)?;
        let prop = if edge.unique {
            id_schema
        } else {
            Schema::array(id_schema)
        };
        schema.add_property(
            &edge.name,
            prop,
            op == Operation::Create && !edge.optional,
        );
    }
    Ok(RequestBody::json(description, schema))
}

fn pagination_params(cfg: &Config) -> Vec<Parameter> {
    let page = Parameter::query("page", "what page to render", Schema::int32());
    let mut per_page = Schema::int32();
    per_page.minimum = Some(cfg.min_items_per_page as i64);
    per_page.maximum = Some(cfg.max_items_per_page as i64);
    per_page.default_value = Some(Value::from(cfg.items_per_page));
    let items = Parameter::query("itemsPerPage", "item count to render per page", per_page);
    vec![page, items]
}

/// Naive English pluralization, sufficient for route roots and summaries.
fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        if !matches!(stem.chars().last(), None | Some('a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{stem}ies");
        }
    }
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }
    format!("{word}s")
}
