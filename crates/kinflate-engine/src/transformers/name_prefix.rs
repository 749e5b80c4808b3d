use serde_json::Value as JsonValue;

use kinflate_core::ResourceCollection;

use super::{Transformer, object_map};
use crate::error::{EngineError, Result, kind_name};
use crate::mutate::mutate_field;
use crate::path_config::PathConfig;

/// Prepends a prefix to resource names
pub struct NamePrefixTransformer {
    prefix: String,
    path_configs: Vec<PathConfig>,
}

impl NamePrefixTransformer {
    pub fn new(prefix: impl Into<String>, path_configs: Vec<PathConfig>) -> Self {
        Self {
            prefix: prefix.into(),
            path_configs,
        }
    }
}

impl Transformer for NamePrefixTransformer {
    fn name(&self) -> &'static str {
        "name-prefix"
    }

    fn transform(&self, resources: &mut ResourceCollection) -> Result<()> {
        if self.prefix.is_empty() {
            return Ok(());
        }

        for (id, resource) in resources.iter_mut() {
            for config in self.path_configs.iter().filter(|c| c.applies_to(&id.gvk)) {
                let object = object_map(resource).map_err(|e| e.in_resource(id))?;
                mutate_field(
                    object,
                    config.path(),
                    config.create_if_not_present(),
                    &mut [&mut |value: JsonValue| match value {
                        JsonValue::String(name) => {
                            Ok(JsonValue::String(format!("{}{}", self.prefix, name)))
                        }
                        other => Err(EngineError::TypeMismatch {
                            path: config.dotted(),
                            expected: "string",
                            found: kind_name(&other),
                        }),
                    }],
                )
                .map_err(|e| e.in_resource(id))?;
            }
            tracing::debug!(%id, name = resource.name().unwrap_or_default(), "prefixed");
        }
        Ok(())
    }
}
