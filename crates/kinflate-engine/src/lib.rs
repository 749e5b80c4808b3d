//! Kinflate Engine - Resource transformers for Kubernetes manifests
//!
//! This crate turns a manifest directory into the final list of resources:
//! - `generators`: ConfigMaps and Secrets built from literals and files
//! - `merge` / `OverlayTransformer`: strategic merge of patches onto bases
//! - `NameHashTransformer`: content hashes appended to generated names
//! - `NamePrefixTransformer`, `LabelsMapTransformer`, `AnnotationsMapTransformer`
//! - `NameReferenceTransformer`: references rewritten to the final names
//! - `Application`: loads a manifest and runs the pipeline

pub mod application;
pub mod error;
pub mod generators;
pub mod hash;
pub mod merge;
pub mod mutate;
pub mod path_config;
pub mod transformers;

pub use application::Application;
pub use error::{EngineError, Result};
pub use merge::{PatchMerger, StrategicMerge};
pub use mutate::mutate_field;
pub use path_config::{PathConfig, PathConfigs, ReferencePathConfig};
pub use transformers::{
    AnnotationsMapTransformer, LabelsMapTransformer, MapTransformer, MultiTransformer,
    NameHashTransformer, NamePrefixTransformer, NameReferenceTransformer, OverlayTransformer,
    Transformer,
};
