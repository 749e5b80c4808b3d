//! Kinflate Core - Document model for Kubernetes manifest composition
//!
//! This crate provides the foundational types used throughout Kinflate:
//! - `predicates`: Composable boolean tests over numbers, strings and tree values
//! - `unstruct`: Mutable, parent-linked view over decoded documents
//! - `unstructpath`: Chainable selectors over document trees
//! - `Gvk` / `GroupVersionKindName`: Resource identity
//! - `ResourceCollection`: Resources keyed by original identity, with YAML decode/encode
//! - `Manifest`: The `Kube-manifest.yaml` file format

pub mod error;
pub mod gvk;
pub mod manifest;
pub mod predicates;
pub mod resource;
pub mod unstruct;
pub mod unstructpath;

pub use error::{CoreError, Result};
pub use gvk::{GroupVersionKindName, Gvk};
pub use manifest::{
    ConfigMapArgs, DataSources, LoadedManifest, MANIFEST_FILE, Manifest, SecretArgs,
};
pub use predicates::Predicate;
pub use resource::{Resource, ResourceCollection};
