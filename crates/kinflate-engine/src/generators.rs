//! ConfigMap and Secret generators

use std::collections::BTreeMap;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value as JsonValue, json};

use kinflate_core::{ConfigMapArgs, DataSources, Resource, SecretArgs};

use crate::error::{EngineError, Result};

const DEFAULT_SECRET_TYPE: &str = "Opaque";

/// Build a ConfigMap from literals and files
///
/// Files that are not valid UTF-8 land in `binaryData`, base64-encoded.
pub fn generate_configmap(args: &ConfigMapArgs, root: &Path) -> Result<Resource> {
    let entries = collect(&args.name, &args.sources, root)?;

    let mut data = Map::new();
    let mut binary_data = Map::new();
    for (key, bytes) in entries {
        match String::from_utf8(bytes) {
            Ok(text) => {
                data.insert(key, JsonValue::String(text));
            }
            Err(e) => {
                binary_data.insert(key, JsonValue::String(BASE64.encode(e.into_bytes())));
            }
        }
    }

    let mut object = json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {"name": args.name},
        "data": data,
    });
    if !binary_data.is_empty() {
        object["binaryData"] = JsonValue::Object(binary_data);
    }

    tracing::debug!(name = %args.name, "generated ConfigMap");
    Ok(Resource::generated(object))
}

/// Build a Secret from literals and files, base64-encoding every value
pub fn generate_secret(args: &SecretArgs, root: &Path) -> Result<Resource> {
    let entries = collect(&args.name, &args.sources, root)?;

    let data: Map<String, JsonValue> = entries
        .into_iter()
        .map(|(key, bytes)| (key, JsonValue::String(BASE64.encode(bytes))))
        .collect();

    let secret_type = args.secret_type.as_deref().unwrap_or(DEFAULT_SECRET_TYPE);

    tracing::debug!(name = %args.name, secret_type, "generated Secret");
    Ok(Resource::generated(json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {"name": args.name},
        "type": secret_type,
        "data": data,
    })))
}

/// Gather every key of a generator, rejecting duplicates
fn collect(name: &str, sources: &DataSources, root: &Path) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut entries = BTreeMap::new();
    let mut add = |key: String, value: Vec<u8>| -> Result<()> {
        validate_key(name, &key)?;
        if entries.insert(key.clone(), value).is_some() {
            return Err(generator_error(name, format!("duplicate key '{key}'")));
        }
        Ok(())
    };

    for literal in &sources.literals {
        let (key, value) = split_pair(name, literal)?;
        add(key.to_string(), value.as_bytes().to_vec())?;
    }

    for source in &sources.files {
        let (key, relative) = match source.split_once('=') {
            Some((key, path)) => (key.to_string(), path),
            None => {
                let key = Path::new(source)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| generator_error(name, format!("invalid file source '{source}'")))?;
                (key, source.as_str())
            }
        };
        let path = root.join(relative);
        let content = std::fs::read(&path).map_err(|e| {
            generator_error(name, format!("cannot read {}: {}", path.display(), e))
        })?;
        add(key, content)?;
    }

    if let Some(env) = &sources.env {
        let path = root.join(env);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            generator_error(name, format!("cannot read {}: {}", path.display(), e))
        })?;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = split_pair(name, line)?;
            add(key.to_string(), value.as_bytes().to_vec())?;
        }
    }

    Ok(entries)
}

fn split_pair<'a>(name: &str, pair: &'a str) -> Result<(&'a str, &'a str)> {
    pair.split_once('=')
        .ok_or_else(|| generator_error(name, format!("'{pair}' is not KEY=VALUE")))
}

/// Keys must be valid ConfigMap/Secret keys: alphanumerics, `-`, `_`, `.`
fn validate_key(name: &str, key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(generator_error(name, format!("invalid key '{key}'")))
    }
}

fn generator_error(name: &str, message: String) -> EngineError {
    EngineError::Generator {
        name: name.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sources(literals: &[&str], files: &[&str]) -> DataSources {
        DataSources {
            literals: literals.iter().map(|s| s.to_string()).collect(),
            files: files.iter().map(|s| s.to_string()).collect(),
            env: None,
        }
    }

    #[test]
    fn test_configmap_from_literals() {
        let args = ConfigMapArgs {
            name: "app".to_string(),
            sources: sources(&["LOG_LEVEL=debug", "EMPTY=", "URL=http://x?a=b"], &[]),
        };
        let cm = generate_configmap(&args, Path::new(".")).unwrap();

        assert!(cm.is_generated());
        assert_eq!(cm.kind(), Some("ConfigMap"));
        assert_eq!(cm.name(), Some("app"));
        assert_eq!(cm.object()["data"]["LOG_LEVEL"], "debug");
        assert_eq!(cm.object()["data"]["EMPTY"], "");
        assert_eq!(cm.object()["data"]["URL"], "http://x?a=b");
        assert!(cm.object().get("binaryData").is_none());
    }

    #[test]
    fn test_configmap_from_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.properties"), "a=1\n").unwrap();
        std::fs::write(dir.path().join("logo.bin"), [0xffu8, 0xfe, 0x00]).unwrap();

        let args = ConfigMapArgs {
            name: "files".to_string(),
            sources: sources(&[], &["app.properties", "custom=app.properties", "logo.bin"]),
        };
        let cm = generate_configmap(&args, dir.path()).unwrap();

        assert_eq!(cm.object()["data"]["app.properties"], "a=1\n");
        assert_eq!(cm.object()["data"]["custom"], "a=1\n");
        assert_eq!(cm.object()["binaryData"]["logo.bin"], "//4A");
    }

    #[test]
    fn test_configmap_from_env_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.env"), "# comment\nA=1\n\nB=two\n").unwrap();

        let args = ConfigMapArgs {
            name: "env".to_string(),
            sources: DataSources {
                env: Some("app.env".to_string()),
                ..Default::default()
            },
        };
        let cm = generate_configmap(&args, dir.path()).unwrap();
        assert_eq!(cm.object()["data"], json!({"A": "1", "B": "two"}));
    }

    #[test]
    fn test_secret_is_base64_with_default_type() {
        let args = SecretArgs {
            name: "creds".to_string(),
            secret_type: None,
            sources: sources(&["password=hunter2"], &[]),
        };
        let secret = generate_secret(&args, Path::new(".")).unwrap();

        assert!(secret.is_generated());
        assert_eq!(secret.object()["type"], "Opaque");
        assert_eq!(secret.object()["data"]["password"], "aHVudGVyMg==");
    }

    #[test]
    fn test_secret_type_is_kept() {
        let args = SecretArgs {
            name: "tls".to_string(),
            secret_type: Some("kubernetes.io/tls".to_string()),
            sources: sources(&["tls.crt=cert", "tls.key=key"], &[]),
        };
        let secret = generate_secret(&args, Path::new(".")).unwrap();
        assert_eq!(secret.object()["type"], "kubernetes.io/tls");
    }

    #[test]
    fn test_duplicate_key_is_an_error() {
        let args = ConfigMapArgs {
            name: "dup".to_string(),
            sources: sources(&["A=1", "A=2"], &[]),
        };
        let err = generate_configmap(&args, Path::new(".")).unwrap_err();
        assert!(matches!(err, EngineError::Generator { ref message, .. } if message.contains("duplicate")));
    }

    #[test]
    fn test_malformed_literal_is_an_error() {
        for literal in ["NOEQUALS", "=value", "bad key=1"] {
            let args = ConfigMapArgs {
                name: "bad".to_string(),
                sources: sources(&[literal], &[]),
            };
            assert!(
                matches!(
                    generate_configmap(&args, Path::new(".")),
                    Err(EngineError::Generator { .. })
                ),
                "{literal} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let args = ConfigMapArgs {
            name: "missing".to_string(),
            sources: sources(&[], &["nope.txt"]),
        };
        assert!(matches!(
            generate_configmap(&args, dir.path()),
            Err(EngineError::Generator { .. })
        ));
    }
}
