use kinflate_core::ResourceCollection;

use super::Transformer;
use crate::error::{EngineError, Result};
use crate::hash::{configmap_hash, secret_hash};

/// Appends a content hash to the name of generated ConfigMaps and Secrets
#[derive(Debug, Default)]
pub struct NameHashTransformer;

impl NameHashTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for NameHashTransformer {
    fn name(&self) -> &'static str {
        "name-hash"
    }

    fn transform(&self, resources: &mut ResourceCollection) -> Result<()> {
        for (id, resource) in resources.iter_mut() {
            if !resource.is_generated() {
                continue;
            }
            let hash = match id.gvk.kind.as_str() {
                "ConfigMap" => configmap_hash(resource),
                "Secret" => secret_hash(resource),
                _ => continue,
            }
            .map_err(|e| e.in_resource(id))?;

            let hashed = format!("{}-{}", resource.name().unwrap_or(id.name.as_str()), hash);
            tracing::debug!(%id, name = %hashed, "hashed name");
            resource
                .set_name(hashed)
                .map_err(|e| EngineError::from(e).in_resource(id))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinflate_core::Resource;
    use serde_json::json;

    #[test]
    fn test_only_generated_resources_are_renamed() {
        let mut resources = ResourceCollection::new();
        let generated = resources
            .insert_resource(Resource::generated(json!({
                "apiVersion": "v1",
                "kind": "ConfigMap",
                "metadata": {"name": "cm1"},
                "data": {"b": "y", "a": "x"}
            })))
            .unwrap();
        let declared = resources
            .insert_resource(Resource::new(json!({
                "apiVersion": "v1",
                "kind": "ConfigMap",
                "metadata": {"name": "plain"},
                "data": {"a": "x"}
            })))
            .unwrap();

        NameHashTransformer::new().transform(&mut resources).unwrap();

        assert_eq!(resources.get(&generated).unwrap().name(), Some("cm1-mdbm669556"));
        assert_eq!(resources.get(&declared).unwrap().name(), Some("plain"));
        assert_eq!(generated.name, "cm1");
    }

    #[test]
    fn test_secret_is_renamed() {
        let mut resources = ResourceCollection::new();
        let id = resources
            .insert_resource(Resource::generated(json!({
                "apiVersion": "v1",
                "kind": "Secret",
                "metadata": {"name": "s1"},
                "type": "Opaque",
                "data": {"k": "dg=="}
            })))
            .unwrap();

        NameHashTransformer::new().transform(&mut resources).unwrap();
        assert_eq!(resources.get(&id).unwrap().name(), Some("s1-m797dbd6b8"));
    }

    #[test]
    fn test_hash_is_stable_across_runs() {
        let build = || {
            let mut resources = ResourceCollection::new();
            resources
                .insert_resource(Resource::generated(json!({
                    "apiVersion": "v1",
                    "kind": "ConfigMap",
                    "metadata": {"name": "cm"},
                    "data": {"x": "1"}
                })))
                .unwrap();
            NameHashTransformer::new().transform(&mut resources).unwrap();
            resources
        };
        assert_eq!(build(), build());
    }
}
