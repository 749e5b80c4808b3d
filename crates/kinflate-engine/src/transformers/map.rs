use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use kinflate_core::ResourceCollection;

use super::{Transformer, object_map};
use crate::error::{EngineError, Result, kind_name};
use crate::mutate::mutate_field;
use crate::path_config::{PathConfig, PathConfigs};

/// Merges fixed entries into string maps such as labels and annotations
///
/// Existing keys are overwritten. A `null` map (as written by `labels:` with
/// nothing after it) is treated as empty.
pub struct MapTransformer {
    name: &'static str,
    entries: BTreeMap<String, String>,
    path_configs: Vec<PathConfig>,
}

/// Labels on metadata, selectors and pod templates
pub struct LabelsMapTransformer;

/// Annotations on metadata and pod templates
pub struct AnnotationsMapTransformer;

impl LabelsMapTransformer {
    pub fn new(labels: BTreeMap<String, String>, path_configs: Vec<PathConfig>) -> MapTransformer {
        MapTransformer::new("labels", labels, path_configs)
    }

    /// Labels on the built-in paths
    pub fn with_defaults(labels: BTreeMap<String, String>) -> MapTransformer {
        Self::new(labels, PathConfigs::default_labels())
    }
}

impl AnnotationsMapTransformer {
    pub fn new(
        annotations: BTreeMap<String, String>,
        path_configs: Vec<PathConfig>,
    ) -> MapTransformer {
        MapTransformer::new("annotations", annotations, path_configs)
    }

    /// Annotations on the built-in paths
    pub fn with_defaults(annotations: BTreeMap<String, String>) -> MapTransformer {
        Self::new(annotations, PathConfigs::default_annotations())
    }
}

impl MapTransformer {
    pub fn new(
        name: &'static str,
        entries: BTreeMap<String, String>,
        path_configs: Vec<PathConfig>,
    ) -> Self {
        Self {
            name,
            entries,
            path_configs,
        }
    }

    fn merge_into(&self, config: &PathConfig, value: JsonValue) -> Result<JsonValue> {
        let mut map = match value {
            JsonValue::Object(map) => map,
            JsonValue::Null => Map::new(),
            other => {
                return Err(EngineError::TypeMismatch {
                    path: config.dotted(),
                    expected: "map",
                    found: kind_name(&other),
                });
            }
        };
        for (key, value) in &self.entries {
            map.insert(key.clone(), JsonValue::String(value.clone()));
        }
        Ok(JsonValue::Object(map))
    }
}

impl Transformer for MapTransformer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn transform(&self, resources: &mut ResourceCollection) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }

        for (id, resource) in resources.iter_mut() {
            for config in self.path_configs.iter().filter(|c| c.applies_to(&id.gvk)) {
                let object = object_map(resource).map_err(|e| e.in_resource(id))?;
                mutate_field(
                    object,
                    config.path(),
                    config.create_if_not_present(),
                    &mut [&mut |value: JsonValue| self.merge_into(config, value)],
                )
                .map_err(|e| e.in_resource(id))?;
            }
        }
        tracing::debug!(field = self.name, entries = self.entries.len(), "merged map entries");
        Ok(())
    }
}
