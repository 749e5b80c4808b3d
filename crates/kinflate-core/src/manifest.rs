//! Manifest definition and loading
//!
//! A manifest (`Kube-manifest.yaml`) lists the resources of an application,
//! the bases it builds on, the patches to apply on top, the ConfigMaps and
//! Secrets to generate, and the name prefix, labels and annotations to inject.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// File name looked up in a manifest directory
pub const MANIFEST_FILE: &str = "Kube-manifest.yaml";

/// Only accepted value for `kind`
pub const MANIFEST_KIND: &str = "Manifest";

/// A Kinflate manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    /// API version of the manifest format
    #[serde(default)]
    pub api_version: Option<String>,

    /// Must be `Manifest` when present
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: Option<ManifestMetadata>,

    /// Prepended to the name of every resource
    #[serde(default)]
    pub name_prefix: String,

    /// Added to every resource (and to selectors and pod templates)
    #[serde(default)]
    pub object_labels: BTreeMap<String, String>,

    /// Added to every resource and pod template
    #[serde(default)]
    pub object_annotations: BTreeMap<String, String>,

    /// Resource files, relative to the manifest directory
    #[serde(default)]
    pub resources: Vec<String>,

    /// Partial resources merged on top of the matching resources
    #[serde(default)]
    pub patches: Vec<String>,

    /// Directories holding manifests built first and merged in
    #[serde(default)]
    pub bases: Vec<String>,

    #[serde(default)]
    pub config_map_generator: Vec<ConfigMapArgs>,

    #[serde(default)]
    pub secret_generator: Vec<SecretArgs>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,
}

/// Sources of a generated ConfigMap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapArgs {
    pub name: String,

    #[serde(flatten)]
    pub sources: DataSources,
}

/// Sources of a generated Secret
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretArgs {
    pub name: String,

    /// Secret type (default: Opaque)
    #[serde(default, rename = "type")]
    pub secret_type: Option<String>,

    #[serde(flatten)]
    pub sources: DataSources,
}

/// Key/value sources shared by both generators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSources {
    /// `KEY=VALUE` pairs
    #[serde(default)]
    pub literals: Vec<String>,

    /// `[KEY=]PATH` files; the key defaults to the file name
    #[serde(default)]
    pub files: Vec<String>,

    /// A file of `KEY=VALUE` lines
    #[serde(default)]
    pub env: Option<String>,
}

impl Manifest {
    /// Parse a manifest from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(kind) = &self.kind {
            if kind != MANIFEST_KIND {
                return Err(CoreError::InvalidManifest {
                    message: format!("Unsupported kind: {}. Expected: {}", kind, MANIFEST_KIND),
                });
            }
        }

        let generator_names = self
            .config_map_generator
            .iter()
            .map(|g| ("configMapGenerator", g.name.as_str()))
            .chain(
                self.secret_generator
                    .iter()
                    .map(|g| ("secretGenerator", g.name.as_str())),
            );
        for (section, name) in generator_names {
            if name.is_empty() {
                return Err(CoreError::InvalidManifest {
                    message: format!("{} entry is missing a name", section),
                });
            }
        }

        Ok(())
    }
}

/// Loaded manifest with its directory
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub manifest: Manifest,

    /// Directory containing the manifest; relative paths resolve against it
    pub root: PathBuf,
}

impl LoadedManifest {
    /// Load the manifest of a directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();

        if !root.exists() {
            return Err(CoreError::ManifestNotFound {
                path: root.display().to_string(),
            });
        }

        let manifest_file = root.join(MANIFEST_FILE);
        if !manifest_file.exists() {
            return Err(CoreError::InvalidManifest {
                message: format!("{} not found in {}", MANIFEST_FILE, root.display()),
            });
        }

        let content = std::fs::read_to_string(&manifest_file)?;
        let manifest = Manifest::from_yaml(&content)?;

        Ok(Self { manifest, root })
    }

    /// Resolve a path listed in the manifest
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}
