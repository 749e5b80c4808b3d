//! Decoded Kubernetes objects and collections of them
//!
//! A [`ResourceCollection`] maps each resource's *original* identity to its
//! live content. Transformers rewrite the content (including
//! `metadata.name`) but never the key, so later passes can still find "the
//! resource that used to be called X".

use std::collections::BTreeMap;
use std::collections::btree_map::{Entry, Iter, IterMut};

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{CoreError, Result};
use crate::gvk::{GroupVersionKindName, Gvk};

/// One decoded object
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    object: JsonValue,
    generated: bool,
}

impl Resource {
    pub fn new(object: JsonValue) -> Self {
        Self {
            object,
            generated: false,
        }
    }

    /// A resource produced by a ConfigMap/Secret generator
    pub fn generated(object: JsonValue) -> Self {
        Self {
            object,
            generated: true,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn object(&self) -> &JsonValue {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut JsonValue {
        &mut self.object
    }

    pub fn into_object(self) -> JsonValue {
        self.object
    }

    pub fn api_version(&self) -> Option<&str> {
        self.object.get("apiVersion").and_then(JsonValue::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.object.get("kind").and_then(JsonValue::as_str)
    }

    /// Current `metadata.name`
    pub fn name(&self) -> Option<&str> {
        self.object
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(JsonValue::as_str)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let metadata = self
            .object
            .get_mut("metadata")
            .and_then(JsonValue::as_object_mut)
            .ok_or_else(|| CoreError::MissingField {
                field: "metadata".to_string(),
            })?;
        metadata.insert("name".to_string(), JsonValue::String(name.into()));
        Ok(())
    }

    pub fn gvk(&self) -> Gvk {
        Gvk::from_api_version(
            self.api_version().unwrap_or_default(),
            self.kind().unwrap_or_default(),
        )
    }

    /// Identity computed from the current content
    pub fn current_id(&self) -> Result<GroupVersionKindName> {
        if !self.object.is_object() {
            return Err(CoreError::InvalidManifest {
                message: "resource must be a map".to_string(),
            });
        }
        let api_version = self.api_version().ok_or_else(|| missing("apiVersion"))?;
        let kind = self.kind().ok_or_else(|| missing("kind"))?;
        let name = self.name().ok_or_else(|| missing("metadata.name"))?;
        Ok(GroupVersionKindName::new(
            Gvk::from_api_version(api_version, kind),
            name,
        ))
    }
}

fn missing(field: &str) -> CoreError {
    CoreError::MissingField {
        field: field.to_string(),
    }
}

/// Resources keyed by their original identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCollection {
    resources: BTreeMap<GroupVersionKindName, Resource>,
}

impl ResourceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Insert under an explicit identity; an existing identity is an error
    pub fn insert(&mut self, id: GroupVersionKindName, resource: Resource) -> Result<()> {
        match self.resources.entry(id) {
            Entry::Occupied(entry) => Err(CoreError::DuplicateResource {
                id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(resource);
                Ok(())
            }
        }
    }

    /// Insert under the identity derived from the resource's content
    pub fn insert_resource(&mut self, resource: Resource) -> Result<GroupVersionKindName> {
        let id = resource.current_id()?;
        self.insert(id.clone(), resource)?;
        Ok(id)
    }

    pub fn get(&self, id: &GroupVersionKindName) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn get_mut(&mut self, id: &GroupVersionKindName) -> Option<&mut Resource> {
        self.resources.get_mut(id)
    }

    pub fn contains(&self, id: &GroupVersionKindName) -> bool {
        self.resources.contains_key(id)
    }

    pub fn remove(&mut self, id: &GroupVersionKindName) -> Option<Resource> {
        self.resources.remove(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &GroupVersionKindName> {
        self.resources.keys()
    }

    pub fn iter(&self) -> Iter<'_, GroupVersionKindName, Resource> {
        self.resources.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, GroupVersionKindName, Resource> {
        self.resources.iter_mut()
    }

    /// Move every resource of `other` into this collection
    ///
    /// Fails on the first identity present in both.
    pub fn merge(&mut self, other: ResourceCollection) -> Result<()> {
        for (id, resource) in other.resources {
            self.insert(id, resource)?;
        }
        Ok(())
    }

    /// Decode `---` separated YAML (or JSON) documents
    ///
    /// Empty documents are skipped. Every other document must carry
    /// `apiVersion`, `kind` and `metadata.name`.
    pub fn decode(input: &str) -> Result<Self> {
        let mut collection = Self::new();

        for (index, document) in serde_yaml::Deserializer::from_str(input).enumerate() {
            let object = JsonValue::deserialize(document)?;
            if object.is_null() {
                continue;
            }

            let resource = Resource::new(object);
            let id = resource
                .current_id()
                .map_err(|e| CoreError::InvalidResource {
                    index,
                    message: e.to_string(),
                })?;
            collection.insert(id, resource)?;
        }

        Ok(collection)
    }

    /// Encode as YAML documents ordered by type, then original name
    pub fn encode(&self) -> Result<String> {
        let mut out = String::new();
        for (i, resource) in self.resources.values().enumerate() {
            if i > 0 {
                out.push_str("---\n");
            }
            out.push_str(&serde_yaml::to_string(resource.object())?);
        }
        Ok(out)
    }
}

impl<'a> IntoIterator for &'a ResourceCollection {
    type Item = (&'a GroupVersionKindName, &'a Resource);
    type IntoIter = Iter<'a, GroupVersionKindName, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

impl IntoIterator for ResourceCollection {
    type Item = (GroupVersionKindName, Resource);
    type IntoIter = std::collections::btree_map::IntoIter<GroupVersionKindName, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}
