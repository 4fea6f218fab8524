//! Global generator configuration.

use crate::annotation::Policy;
use crate::error::Error;
use entity_schema::Graph;
use serde::{Deserialize, Serialize};

/// Key under which the config blob is stored in the graph annotations.
pub const CONFIG_KEY: &str = "OasConfig";

/// Global metadata for a generation run. Injected into the graph as an
/// annotation blob and decoded on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default exposure policy, applied wherever a (sub-)resource carries no
    /// explicit per-operation policy.
    pub default_policy: Policy,
    /// Emit one shared model per type instead of one model per endpoint.
    ///
    /// The generator by default creates one view per endpoint:
    /// `<Type><Op>` for a first-level operation, `<Type><Op>_<Edge>` for an
    /// eager-loaded edge on it, and `<Type>_<Edge><Op>` for a second-level
    /// operation. With simple models enabled every view name collapses to
    /// the bare type name and serialization groups have no effect on the
    /// emitted document.
    pub simple_models: bool,
    /// Smallest accepted `itemsPerPage` parameter value.
    pub min_items_per_page: u64,
    /// Largest accepted `itemsPerPage` parameter value.
    pub max_items_per_page: u64,
    /// Default `itemsPerPage` parameter value.
    pub items_per_page: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_policy: Policy::Expose,
            simple_models: false,
            min_items_per_page: 1,
            max_items_per_page: 255,
            items_per_page: 30,
        }
    }
}

impl Config {
    /// Decode the config out of the graph annotations. An absent blob
    /// yields the default config; a malformed one aborts generation.
    pub fn from_graph(graph: &Graph) -> Result<Config, Error> {
        match graph.annotations.get(CONFIG_KEY) {
            Some(blob) => serde_json::from_value(blob.clone())
                .map_err(|e| Error::InvalidConfig(e.to_string())),
            None => Ok(Config::default()),
        }
    }
}
