//! Engine error types

use kinflate_core::{CoreError, GroupVersionKindName, Gvk};
use miette::Diagnostic;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Main engine error type
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    #[diagnostic(code(kinflate::core))]
    Core(#[from] CoreError),

    /// A value along a field path has the wrong shape
    #[error("expected {expected} at `{path}`, found {found}")]
    #[diagnostic(code(kinflate::field::type_mismatch))]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A mutation failed at a field path
    #[error("at `{path}`: {error}")]
    #[diagnostic(code(kinflate::field::mutation))]
    Field {
        path: String,
        error: Box<EngineError>,
    },

    /// A transformer failed on one resource
    #[error("{id}: {error}")]
    #[diagnostic(code(kinflate::transform))]
    InResource {
        id: GroupVersionKindName,
        error: Box<EngineError>,
    },

    /// No resource in the collection answers to a referenced name
    #[error("no resource selected by {gvk} is named '{name}'")]
    #[diagnostic(code(kinflate::reference::no_match))]
    NoMatchingReference { gvk: Gvk, name: String },

    /// More than one resource answers to a referenced name
    #[error("reference '{name}' is ambiguous, it matches: {candidates}")]
    #[diagnostic(
        code(kinflate::reference::ambiguous),
        help("qualify the reference path config with a group and version")
    )]
    AmbiguousReference { name: String, candidates: String },

    /// A patch names a resource missing from the base
    #[error("patch target not found: {id}")]
    #[diagnostic(
        code(kinflate::overlay::target_not_found),
        help("patches are matched by apiVersion, kind and metadata.name of a base resource")
    )]
    PatchTargetNotFound { id: GroupVersionKindName },

    #[error("merge failed at `{path}`: {message}")]
    #[diagnostic(code(kinflate::overlay::merge))]
    Merge { path: String, message: String },

    #[error("generator '{name}': {message}")]
    #[diagnostic(code(kinflate::generator))]
    Generator { name: String, message: String },

    #[error("invalid path config: {message}")]
    #[diagnostic(code(kinflate::config::path))]
    InvalidPathConfig { message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(kinflate::io))]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    #[diagnostic(code(kinflate::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(kinflate::json))]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Attach the resource being transformed
    pub fn in_resource(self, id: &GroupVersionKindName) -> Self {
        EngineError::InResource {
            id: id.clone(),
            error: Box::new(self),
        }
    }

    /// The innermost error, skipping path and resource context
    pub fn root_cause(&self) -> &EngineError {
        match self {
            EngineError::Field { error, .. } | EngineError::InResource { error, .. } => {
                error.root_cause()
            }
            other => other,
        }
    }
}

/// Shape name of a decoded value, for error messages
pub fn kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Object(_) => "map",
        JsonValue::Array(_) => "slice",
        JsonValue::String(_) => "string",
        JsonValue::Number(_) => "number",
        JsonValue::Bool(_) => "bool",
        JsonValue::Null => "null",
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
