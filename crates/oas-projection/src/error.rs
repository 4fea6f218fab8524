//! Emitter error types.

use thiserror::Error;

/// Errors that can occur while assembling the document. Any of these aborts
/// the whole generation run.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// An edge property references a component schema that was never
    /// emitted. Indicates an inconsistency between the graph and the
    /// partially built document.
    #[error("schema {schema:?} not found for edge {edge:?} on {node:?}")]
    UnknownSchema {
        /// The missing schema name.
        schema: String,
        /// The edge whose property needed it.
        edge: String,
        /// The type or view the edge sits on.
        node: String,
    },

    /// An edge references a type name missing from the graph.
    #[error("unknown type {0:?}")]
    UnknownType(String),

    /// A field's annotation-level schema override failed to decode.
    #[error("invalid schema override on field {field:?}: {message}")]
    InvalidSchemaOverride {
        /// The annotated field.
        field: String,
        /// The decode failure.
        message: String,
    },

    /// The surface computation failed.
    #[error(transparent)]
    Surface(#[from] oas_surface::Error),

    /// The document could not be written to the configured sink.
    #[error("write spec: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GeneratorError::UnknownSchema {
            schema: "PetRead_Owner".into(),
            edge: "owner".into(),
            node: "PetRead".into(),
        };
        assert_eq!(
            err.to_string(),
            "schema \"PetRead_Owner\" not found for edge \"owner\" on \"PetRead\""
        );

        let err = GeneratorError::Surface(oas_surface::Error::MaxDepth(25));
        assert_eq!(err.to_string(), "max eager-load depth of 25 reached");
    }
}
