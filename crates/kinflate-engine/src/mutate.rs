//! Apply a chain of functions to the value at a field path

use serde_json::{Map, Value as JsonValue};

use crate::error::{EngineError, Result, kind_name};

/// A value rewrite threaded through [`mutate_field`]
pub type MutateFn<'a> = dyn FnMut(JsonValue) -> Result<JsonValue> + 'a;

/// Rewrite the field at `path` inside `object`
///
/// Walks `path` one segment at a time:
/// - a missing key ends the walk silently, unless `create_if_not_present`,
///   in which case an empty map is inserted and the walk continues
/// - a slice applies the rest of the path to each of its elements, which
///   must all be maps
/// - at the last segment the functions run in order, each receiving the
///   previous result, and the final result is stored
///
/// An empty path is a no-op. If a function fails the field keeps its
/// previous value.
pub fn mutate_field(
    object: &mut Map<String, JsonValue>,
    path: &[String],
    create_if_not_present: bool,
    fns: &mut [&mut MutateFn<'_>],
) -> Result<()> {
    mutate_at(object, path, 0, create_if_not_present, fns)
}

fn mutate_at(
    object: &mut Map<String, JsonValue>,
    path: &[String],
    depth: usize,
    create_if_not_present: bool,
    fns: &mut [&mut MutateFn<'_>],
) -> Result<()> {
    let Some(key) = path.get(depth) else {
        return Ok(());
    };

    if !object.contains_key(key) {
        if !create_if_not_present {
            return Ok(());
        }
        object.insert(key.clone(), JsonValue::Object(Map::new()));
    }
    let Some(slot) = object.get_mut(key) else {
        return Ok(());
    };

    if depth + 1 == path.len() {
        let mut value = slot.clone();
        for f in fns.iter_mut() {
            value = f(value).map_err(|error| EngineError::Field {
                path: dotted(path, depth),
                error: Box::new(error),
            })?;
        }
        *slot = value;
        return Ok(());
    }

    match slot {
        JsonValue::Object(child) => mutate_at(child, path, depth + 1, create_if_not_present, fns),
        JsonValue::Array(items) => {
            for (index, item) in items.iter_mut().enumerate() {
                match item {
                    JsonValue::Object(child) => {
                        mutate_at(child, path, depth + 1, create_if_not_present, fns)?
                    }
                    other => {
                        return Err(EngineError::TypeMismatch {
                            path: format!("{}[{}]", dotted(path, depth), index),
                            expected: "map",
                            found: kind_name(other),
                        });
                    }
                }
            }
            Ok(())
        }
        other => Err(EngineError::TypeMismatch {
            path: dotted(path, depth),
            expected: "map or slice",
            found: kind_name(other),
        }),
    }
}

fn dotted(path: &[String], depth: usize) -> String {
    path[..=depth].join(".")
}
