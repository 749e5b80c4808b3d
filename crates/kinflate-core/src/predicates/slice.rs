//! Slice predicates

use serde_json::Value as JsonValue;

use super::{NumberP, Predicate, SliceP};
use crate::unstruct::Slice;

/// Applies `length` to the number of elements
pub fn length(length: NumberP) -> SliceP {
    Predicate::new(move |s: &Slice| length.matches(&(s.len() as f64)))
}

pub fn deep_equal(reference: JsonValue) -> SliceP {
    Predicate::new(move |s: &Slice| s.to_json() == reference)
}
