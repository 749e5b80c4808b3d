//! Patch merging
//!
//! [`PatchMerger`] is the seam the overlay transformer merges through.
//! [`StrategicMerge`] implements the subset of Kubernetes strategic merge
//! patch needed for overlays:
//!
//! - maps merge key by key, recursively
//! - `null` in the patch deletes the key
//! - lists of maps merge element by element when the field has a merge key
//!   (`containers` by `name`, `volumeMounts` by `mountPath`, ...)
//! - a patch element or map carrying `$patch: delete` removes its target,
//!   `$patch: replace` replaces it wholesale
//! - every other value, lists included, is replaced

use serde_json::{Map, Value as JsonValue};

use kinflate_core::Gvk;

use crate::error::{EngineError, Result};

const DIRECTIVE: &str = "$patch";

/// Merge a partial resource onto a full one
pub trait PatchMerger {
    /// Return `base` with `patch` merged on top; `gvk` is the resource type
    fn merge(&self, gvk: &Gvk, base: &JsonValue, patch: &JsonValue) -> Result<JsonValue>;
}

/// Built-in strategic merge
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategicMerge;

impl StrategicMerge {
    pub fn new() -> Self {
        Self
    }

    /// Key identifying list elements of `field`, if the list merges by key
    pub fn merge_key(gvk: &Gvk, field: &str) -> Option<&'static str> {
        match field {
            "containers" | "initContainers" | "ephemeralContainers" | "volumes" | "env"
            | "imagePullSecrets" => Some("name"),
            "volumeMounts" | "volumeDevices" => Some("mountPath"),
            "ports" if gvk.kind == "Service" => Some("port"),
            "ports" => Some("containerPort"),
            _ => None,
        }
    }
}

impl PatchMerger for StrategicMerge {
    fn merge(&self, gvk: &Gvk, base: &JsonValue, patch: &JsonValue) -> Result<JsonValue> {
        let mut merged = base.clone();
        merge_value(gvk, None, &mut merged, patch, "")?;
        Ok(merged)
    }
}

fn merge_value(
    gvk: &Gvk,
    field: Option<&str>,
    base: &mut JsonValue,
    patch: &JsonValue,
    path: &str,
) -> Result<()> {
    match (base, patch) {
        (JsonValue::Object(base_map), JsonValue::Object(patch_map)) => {
            match directive(patch_map) {
                Some("replace") => {
                    *base_map = without_directives(patch_map);
                    return Ok(());
                }
                Some("delete" | "merge") | None => {}
                Some(other) => {
                    return Err(EngineError::Merge {
                        path: path.to_string(),
                        message: format!("unknown {DIRECTIVE} directive '{other}'"),
                    });
                }
            }

            for (key, patch_value) in patch_map {
                if key == DIRECTIVE {
                    continue;
                }
                let child_path = join(path, key);
                if patch_value.is_null() || is_delete(patch_value) {
                    base_map.remove(key);
                    continue;
                }
                match base_map.get_mut(key) {
                    Some(base_value) => {
                        merge_value(gvk, Some(key), base_value, patch_value, &child_path)?
                    }
                    None => {
                        base_map.insert(key.clone(), strip(patch_value));
                    }
                }
            }
            Ok(())
        }
        (JsonValue::Array(base_items), JsonValue::Array(patch_items)) => {
            let key = field.and_then(|f| StrategicMerge::merge_key(gvk, f));
            match key {
                Some(key) if keyed(base_items, key) && keyed(patch_items, key) => {
                    merge_keyed_list(gvk, field, base_items, patch_items, key, path)
                }
                _ => {
                    *base_items = patch_items
                        .iter()
                        .filter(|item| !is_delete(item))
                        .map(strip)
                        .collect();
                    Ok(())
                }
            }
        }
        (base, patch) => {
            *base = strip(patch);
            Ok(())
        }
    }
}

fn merge_keyed_list(
    gvk: &Gvk,
    field: Option<&str>,
    base_items: &mut Vec<JsonValue>,
    patch_items: &[JsonValue],
    key: &str,
    path: &str,
) -> Result<()> {
    for patch_item in patch_items {
        let id = patch_item.get(key);
        let position = base_items.iter().position(|item| item.get(key) == id);

        if is_delete(patch_item) {
            base_items.retain(|item| item.get(key) != id);
            continue;
        }

        match position {
            Some(index) => {
                let element_path = format!("{path}[{key}={}]", display_id(id));
                merge_value(gvk, field, &mut base_items[index], patch_item, &element_path)?;
            }
            None => base_items.push(strip(patch_item)),
        }
    }
    Ok(())
}

/// Whether every element is a map carrying `key`
fn keyed(items: &[JsonValue], key: &str) -> bool {
    items
        .iter()
        .all(|item| item.as_object().is_some_and(|map| map.contains_key(key)))
}

fn directive(map: &Map<String, JsonValue>) -> Option<&str> {
    map.get(DIRECTIVE).and_then(JsonValue::as_str)
}

fn is_delete(value: &JsonValue) -> bool {
    value
        .as_object()
        .is_some_and(|map| directive(map) == Some("delete"))
}

/// A patch value with `$patch` keys removed, for insertion as-is
fn strip(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => JsonValue::Object(without_directives(map)),
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(strip).collect()),
        other => other.clone(),
    }
}

fn without_directives(map: &Map<String, JsonValue>) -> Map<String, JsonValue> {
    map.iter()
        .filter(|(k, _)| k.as_str() != DIRECTIVE)
        .map(|(k, v)| (k.clone(), strip(v)))
        .collect()
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn display_id(id: Option<&JsonValue>) -> String {
    match id {
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "?".to_string(),
    }
}
