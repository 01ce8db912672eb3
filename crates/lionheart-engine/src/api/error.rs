//! Load-time configuration errors.
//!
//! Every variant is raised while a template is parsed or registered. Nothing
//! at frame time returns these: a feature whose runtime expectations are not
//! met simply stays inert.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("template parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template `{template}` has no `{node}` node")]
    MissingNode { template: String, node: String },

    #[error("template `{template}`: node `{node}` is malformed: {source}")]
    Node {
        template: String,
        node: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("template `{template}`: `{node}.{attribute}` {reason}")]
    Invalid {
        template: String,
        node: String,
        attribute: String,
        reason: String,
    },

    #[error("template `{template}` has no `{animation}` animation")]
    MissingAnimation { template: String, animation: String },

    #[error("template `{template}` uses unknown feature `{feature}`")]
    UnknownFeature { template: String, feature: String },

    #[error("unknown template `{0}`")]
    UnknownTemplate(String),

    #[error("template `{0}` is already registered")]
    DuplicateTemplate(String),
}

/// Shorthand result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
