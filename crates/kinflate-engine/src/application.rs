//! Application loading and the build pipeline
//!
//! Building an application:
//!
//! 1. decode the listed resources and build every base
//! 2. merge the patches on top ([`OverlayTransformer`])
//! 3. add generated ConfigMaps and Secrets
//! 4. hash generated names, prefix names, add labels and annotations
//! 5. rewrite name references to the final names

use std::path::Path;

use kinflate_core::{CoreError, LoadedManifest, Manifest, Resource, ResourceCollection};

use crate::error::{EngineError, Result};
use crate::generators::{generate_configmap, generate_secret};
use crate::path_config::PathConfigs;
use crate::transformers::{
    AnnotationsMapTransformer, LabelsMapTransformer, MultiTransformer, NameHashTransformer,
    NamePrefixTransformer, NameReferenceTransformer, OverlayTransformer, Transformer,
};

/// Bases nested deeper than this are assumed to be cyclic
const MAX_BASE_DEPTH: usize = 32;

/// A manifest directory ready to build
#[derive(Debug, Clone)]
pub struct Application {
    loaded: LoadedManifest,
}

impl Application {
    /// Load the manifest of `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let loaded = LoadedManifest::load(path)?;
        tracing::debug!(root = %loaded.root.display(), "loaded manifest");
        Ok(Self { loaded })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.loaded.manifest
    }

    pub fn root(&self) -> &Path {
        &self.loaded.root
    }

    /// Resources after patching and generation, before the name, label and
    /// reference passes
    pub fn raw_resources(&self) -> Result<ResourceCollection> {
        self.raw_resources_at(0)
    }

    /// Fully built resources
    pub fn resources(&self) -> Result<ResourceCollection> {
        self.resources_at(0)
    }

    /// The name, label and reference passes, in order
    pub fn transformer(&self) -> MultiTransformer {
        let manifest = self.manifest();
        MultiTransformer::new(vec![
            Box::new(NameHashTransformer::new()),
            Box::new(NamePrefixTransformer::new(
                manifest.name_prefix.clone(),
                PathConfigs::default_name_prefix(),
            )),
            Box::new(LabelsMapTransformer::with_defaults(
                manifest.object_labels.clone(),
            )),
            Box::new(AnnotationsMapTransformer::with_defaults(
                manifest.object_annotations.clone(),
            )),
            Box::new(NameReferenceTransformer::with_defaults()),
        ])
    }

    fn resources_at(&self, depth: usize) -> Result<ResourceCollection> {
        let mut resources = self.raw_resources_at(depth)?;
        self.transformer().transform(&mut resources)?;
        tracing::info!(
            root = %self.root().display(),
            resources = resources.len(),
            "built application"
        );
        Ok(resources)
    }

    fn raw_resources_at(&self, depth: usize) -> Result<ResourceCollection> {
        let manifest = self.manifest();
        let mut resources = self.decode_files(&manifest.resources)?;

        for base in &manifest.bases {
            if depth >= MAX_BASE_DEPTH {
                return Err(EngineError::Core(CoreError::InvalidManifest {
                    message: format!("bases nested deeper than {MAX_BASE_DEPTH} levels at {base}"),
                }));
            }
            let base_app = Application::load(self.loaded.resolve(base))?;
            // A built base is plain input here: keyed by its output names, not regenerated.
            for (_, resource) in base_app.resources_at(depth + 1)? {
                resources.insert_resource(Resource::new(resource.into_object()))?;
            }
        }

        if !manifest.patches.is_empty() {
            let overlay = self.decode_files(&manifest.patches)?;
            OverlayTransformer::new(overlay).transform(&mut resources)?;
        }

        for args in &manifest.config_map_generator {
            resources.insert_resource(generate_configmap(args, self.root())?)?;
        }
        for args in &manifest.secret_generator {
            resources.insert_resource(generate_secret(args, self.root())?)?;
        }

        Ok(resources)
    }

    fn decode_files(&self, files: &[String]) -> Result<ResourceCollection> {
        let mut resources = ResourceCollection::new();
        for file in files {
            let path = self.loaded.resolve(file);
            let content = std::fs::read_to_string(&path).map_err(|e| {
                EngineError::Core(CoreError::InvalidManifest {
                    message: format!("cannot read {}: {}", path.display(), e),
                })
            })?;
            let decoded = ResourceCollection::decode(&content)?;
            tracing::debug!(file = %path.display(), resources = decoded.len(), "decoded");
            resources.merge(decoded)?;
        }
        Ok(resources)
    }
}
