//! Core error types

use thiserror::Error;

use crate::gvk::GroupVersionKindName;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: String },

    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid regular expression: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("Document {index} is not a valid resource: {message}")]
    InvalidResource { index: usize, message: String },

    #[error("Duplicate resource: {id}")]
    DuplicateResource { id: GroupVersionKindName },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
