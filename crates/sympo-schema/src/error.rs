use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown schema '{0}'")]
    NotFound(String),

    #[error("document is not JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Every violation, each prefixed with its JSON pointer.
    #[error("{} violation(s) of schema '{schema}': {}", errors.len(), errors.join("; "))]
    ValidationFailed { schema: String, errors: Vec<String> },

    /// `jsonschema` refused a generated schema.
    #[error("schema '{schema}' does not compile: {reason}")]
    Compile { schema: String, reason: String },
}
