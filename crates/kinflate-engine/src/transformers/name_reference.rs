use serde_json::Value as JsonValue;

use kinflate_core::{GroupVersionKindName, Gvk, ResourceCollection};

use super::{Transformer, object_map};
use crate::error::{EngineError, Result, kind_name};
use crate::mutate::mutate_field;
use crate::path_config::{PathConfigs, ReferencePathConfig};

/// Rewrites references to renamed resources
///
/// A reference field holds the name a resource was declared with. It is
/// replaced with that resource's current name, found by looking the
/// declared name up among the collection's keys. References to resources
/// outside the collection are left as they are.
pub struct NameReferenceTransformer {
    configs: Vec<ReferencePathConfig>,
}

impl NameReferenceTransformer {
    pub fn new(configs: Vec<ReferencePathConfig>) -> Self {
        Self { configs }
    }

    pub fn with_defaults() -> Self {
        Self::new(PathConfigs::default_name_references())
    }
}

impl Transformer for NameReferenceTransformer {
    fn name(&self) -> &'static str {
        "name-reference"
    }

    fn transform(&self, resources: &mut ResourceCollection) -> Result<()> {
        // Reference fields never hold metadata.name, so names are stable for the whole pass.
        let targets: Vec<(GroupVersionKindName, String)> = resources
            .iter()
            .filter_map(|(id, r)| r.name().map(|name| (id.clone(), name.to_string())))
            .collect();

        for (id, resource) in resources.iter_mut() {
            for reference in &self.configs {
                let selector = reference.referenced_gvk();
                for config in reference
                    .path_configs()
                    .iter()
                    .filter(|c| c.applies_to(&id.gvk))
                {
                    let object = object_map(resource).map_err(|e| e.in_resource(id))?;
                    mutate_field(
                        object,
                        config.path(),
                        config.create_if_not_present(),
                        &mut [&mut |value: JsonValue| {
                            let JsonValue::String(name) = &value else {
                                return Err(EngineError::TypeMismatch {
                                    path: config.dotted(),
                                    expected: "string",
                                    found: kind_name(&value),
                                });
                            };
                            match find_reference(&targets, selector, name) {
                                Ok(live) => {
                                    tracing::debug!(%id, from = %name, to = %live, "resolved reference");
                                    Ok(JsonValue::String(live))
                                }
                                Err(EngineError::NoMatchingReference { .. }) => {
                                    tracing::debug!(%id, name = %name, kind = %selector.kind, "reference left as is");
                                    Ok(value)
                                }
                                Err(e) => Err(e),
                            }
                        }],
                    )
                    .map_err(|e| e.in_resource(id))?;
                }
            }
        }
        Ok(())
    }
}

/// Current name of the single resource selected by `selector` and declared
/// as `name`
fn find_reference(
    targets: &[(GroupVersionKindName, String)],
    selector: &Gvk,
    name: &str,
) -> Result<String> {
    let matches: Vec<&(GroupVersionKindName, String)> = targets
        .iter()
        .filter(|(id, _)| id.name == name && id.gvk.is_selected(selector))
        .collect();

    match matches.as_slice() {
        [] => Err(EngineError::NoMatchingReference {
            gvk: selector.clone(),
            name: name.to_string(),
        }),
        [(_, live)] => Ok(live.clone()),
        many => Err(EngineError::AmbiguousReference {
            name: name.to_string(),
            candidates: many
                .iter()
                .map(|(id, _)| id.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        }),
    }
}
