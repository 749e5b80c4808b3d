//! Map predicates

use serde_json::Value as JsonValue;

use super::{MapP, NumberP, Predicate};
use crate::unstruct::Map;

/// Applies `count` to the number of fields in the map
pub fn num_fields(count: NumberP) -> MapP {
    Predicate::new(move |m: &Map| count.matches(&(m.len() as f64)))
}

pub fn deep_equal(reference: JsonValue) -> MapP {
    Predicate::new(move |m: &Map| m.to_json() == reference)
}
