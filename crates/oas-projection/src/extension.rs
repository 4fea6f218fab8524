//! The code-generation hook wiring the compiler into a build step.

use crate::error::GeneratorError;
use crate::generator;
use crate::model::{Info, Spec};
use entity_schema::Graph;
use oas_surface::{Config, Policy, CONFIG_KEY};
use std::fmt;
use std::io;
use tracing::info;

/// A user mutation applied to the generated document.
pub type MutateFn = Box<dyn Fn(&Graph, &mut Spec) -> Result<(), GeneratorError>>;

/// The generation hook: carries the generator config, user mutations and an
/// optional output sink.
///
/// ```
/// use entity_schema::{Graph, TypeDef};
/// use oas_projection::Extension;
///
/// let graph = Graph::new().with_node(TypeDef::new("Pet"));
/// let spec = Extension::new()
///     .spec_title("Petstore API")
///     .spec_version("1.0.0")
///     .generate(&graph)
///     .unwrap();
/// assert_eq!(spec.info.title, "Petstore API");
/// ```
pub struct Extension {
    config: Config,
    info: Info,
    mutations: Vec<MutateFn>,
    out: Option<Box<dyn io::Write>>,
}

impl Default for Extension {
    fn default() -> Self {
        Self::new()
    }
}

impl Extension {
    /// An extension with default config and info block.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            info: Info {
                title: "Entity Schema API".to_string(),
                description:
                    "This is an auto generated API description made out of an entity schema definition"
                        .to_string(),
                version: "0.0.0".to_string(),
            },
            mutations: Vec::new(),
            out: None,
        }
    }

    /// Set the default exposure policy used where no explicit one is given.
    pub fn default_policy(mut self, policy: Policy) -> Self {
        self.config.default_policy = policy;
        self
    }

    /// Emit one shared model per type instead of one model per endpoint.
    pub fn simple_models(mut self) -> Self {
        self.config.simple_models = true;
        self
    }

    /// Set the default `itemsPerPage` value.
    pub fn items_per_page(mut self, n: u64) -> Self {
        self.config.items_per_page = n;
        self
    }

    /// Set the smallest accepted `itemsPerPage` value.
    pub fn min_items_per_page(mut self, n: u64) -> Self {
        self.config.min_items_per_page = n;
        self
    }

    /// Set the largest accepted `itemsPerPage` value.
    pub fn max_items_per_page(mut self, n: u64) -> Self {
        self.config.max_items_per_page = n;
        self
    }

    /// Set the document title.
    pub fn spec_title(mut self, title: impl Into<String>) -> Self {
        self.info.title = title.into();
        self
    }

    /// Set the document description.
    pub fn spec_description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    /// Set the document version.
    pub fn spec_version(mut self, version: impl Into<String>) -> Self {
        self.info.version = version.into();
        self
    }

    /// Add a mutation run on the generated document. Mutations run in
    /// registration order, after generation.
    pub fn mutate(
        mut self,
        f: impl Fn(&Graph, &mut Spec) -> Result<(), GeneratorError> + 'static,
    ) -> Self {
        self.mutations.push(Box::new(f));
        self
    }

    /// Write the generated document, pretty-printed JSON, to the given sink.
    pub fn write_to(mut self, out: impl io::Write + 'static) -> Self {
        self.out = Some(Box::new(out));
        self
    }

    /// Generate the document for the given graph.
    ///
    /// The extension's config is injected as a graph annotation unless the
    /// graph already carries one, so the surface computation and the
    /// emitted document always agree on policy and naming.
    pub fn generate(&mut self, graph: &Graph) -> Result<Spec, GeneratorError> {
        let injected;
        let graph = if graph.annotations.contains_key(CONFIG_KEY) {
            graph
        } else {
            let blob = serde_json::to_value(&self.config)
                .map_err(|e| GeneratorError::Write(e.to_string()))?;
            injected = graph.clone().with_annotation(CONFIG_KEY, blob);
            &injected
        };
        let mut spec = Spec::new(self.info.clone());
        generator::generate(graph, &mut spec)?;
        for mutation in &self.mutations {
            mutation(graph, &mut spec)?;
        }
        info!(
            schemas = spec.components.schemas.len(),
            paths = spec.paths.len(),
            "generated OpenAPI document"
        );
        if let Some(out) = &mut self.out {
            serde_json::to_writer_pretty(&mut *out, &spec)
                .map_err(|e| GeneratorError::Write(e.to_string()))?;
            out.write_all(b"\n")
                .and_then(|()| out.flush())
                .map_err(|e| GeneratorError::Write(e.to_string()))?;
        }
        Ok(spec)
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("config", &self.config)
            .field("info", &self.info)
            .field("mutations", &self.mutations.len())
            .field("out", &self.out.is_some())
            .finish()
    }
}
