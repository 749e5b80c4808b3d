//! Content hashes for generated ConfigMaps and Secrets
//!
//! The hash covers the kind, current name and data of the object, encoded
//! as JSON with sorted keys, so it only changes when the content does. It is
//! appended to the name so that a content change rolls the workloads that
//! mount it.

use serde_json::{Map, Value as JsonValue};
use sha2::{Digest, Sha256};

use kinflate_core::Resource;

use crate::error::{EngineError, Result, kind_name};

/// Characters of the hex digest kept in the suffix
const HASH_LENGTH: usize = 10;

/// Hash of a ConfigMap: `kind`, `name`, `data` and `binaryData`
pub fn configmap_hash(resource: &Resource) -> Result<String> {
    let mut content = identity(resource)?;
    copy_field(resource, "data", &mut content)?;
    copy_field(resource, "binaryData", &mut content)?;
    content_hash(&JsonValue::Object(content))
}

/// Hash of a Secret: `kind`, `name`, `type` and `data`
pub fn secret_hash(resource: &Resource) -> Result<String> {
    let mut content = identity(resource)?;
    copy_field(resource, "type", &mut content)?;
    copy_field(resource, "data", &mut content)?;
    content_hash(&JsonValue::Object(content))
}

/// Hash any value, then shorten and encode the digest
pub fn content_hash(value: &JsonValue) -> Result<String> {
    let mut canonical = String::new();
    write_canonical(value, &mut canonical)?;
    let digest = hex::encode(Sha256::digest(canonical.as_bytes()));
    Ok(encode_hash(&digest))
}

/// Keep the first characters of a hex digest, swapping those that could
/// spell words (`0 1 3 a e`) for letters that cannot
fn encode_hash(hex: &str) -> String {
    hex.chars()
        .take(HASH_LENGTH)
        .map(|c| match c {
            '0' => 'g',
            '1' => 'h',
            '3' => 'k',
            'a' => 'm',
            'e' => 't',
            other => other,
        })
        .collect()
}

fn identity(resource: &Resource) -> Result<Map<String, JsonValue>> {
    let name = resource.name().ok_or_else(|| missing("metadata.name"))?;
    let kind = resource.kind().ok_or_else(|| missing("kind"))?;

    let mut content = Map::new();
    content.insert("kind".to_string(), JsonValue::String(kind.to_string()));
    content.insert("name".to_string(), JsonValue::String(name.to_string()));
    Ok(content)
}

fn copy_field(resource: &Resource, field: &str, content: &mut Map<String, JsonValue>) -> Result<()> {
    match resource.object().get(field) {
        None | Some(JsonValue::Null) => Ok(()),
        Some(value @ (JsonValue::Object(_) | JsonValue::String(_))) => {
            content.insert(field.to_string(), value.clone());
            Ok(())
        }
        Some(other) => Err(EngineError::TypeMismatch {
            path: field.to_string(),
            expected: "map or string",
            found: kind_name(other),
        }),
    }
}

fn missing(field: &str) -> EngineError {
    EngineError::Core(kinflate_core::CoreError::MissingField {
        field: field.to_string(),
    })
}

/// Compact JSON with map keys in byte order
fn write_canonical(value: &JsonValue, out: &mut String) -> Result<()> {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push(':');
                write_canonical(value, out)?;
            }
            out.push('}');
        }
        JsonValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}
