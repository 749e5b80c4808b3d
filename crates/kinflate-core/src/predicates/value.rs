//! Predicates over tree values of any shape

use serde_json::Value as JsonValue;

use super::{MapP, NumberP, Predicate, SliceP, StringP, ValueP};
use crate::unstruct::{Kind, Value};

/// Structural equality with a decoded document
pub fn deep_equal(reference: JsonValue) -> ValueP {
    Predicate::new(move |v: &Value| v.to_json() == reference)
}

pub fn is_kind(kind: Kind) -> ValueP {
    Predicate::new(move |v: &Value| v.kind() == kind)
}

pub fn is_map() -> ValueP {
    is_kind(Kind::Map)
}

pub fn is_slice() -> ValueP {
    is_kind(Kind::Slice)
}

pub fn is_string() -> ValueP {
    is_kind(Kind::String)
}

pub fn is_number() -> ValueP {
    is_kind(Kind::Number)
}

pub fn is_bool() -> ValueP {
    is_kind(Kind::Bool)
}

pub fn is_null() -> ValueP {
    is_kind(Kind::Null)
}

/// Matches numbers accepted by `p`; other values never match
pub fn number(p: NumberP) -> ValueP {
    Predicate::new(move |v: &Value| v.as_f64().is_some_and(|n| p.matches(&n)))
}

/// Matches strings accepted by `p`; other values never match
pub fn string(p: StringP) -> ValueP {
    Predicate::new(move |v: &Value| v.as_str().is_some_and(|s| p.matches(s.as_str())))
}

/// Matches maps accepted by `p`; other values never match
pub fn map(p: MapP) -> ValueP {
    Predicate::new(move |v: &Value| v.as_map().is_some_and(|m| p.matches(&m)))
}

/// Matches slices accepted by `p`; other values never match
pub fn slice(p: SliceP) -> ValueP {
    Predicate::new(move |v: &Value| v.as_slice().is_some_and(|s| p.matches(&s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::{map as map_p, number as number_p, string as string_p};
    use serde_json::json;

    #[test]
    fn test_deep_equal() {
        let p = deep_equal(json!({"a": [1, 2], "b": "c"}));
        assert!(p.matches(&Value::new(json!({"b": "c", "a": [1, 2]}))));
        assert!(!p.matches(&Value::new(json!({"a": [2, 1], "b": "c"}))));
    }

    #[test]
    fn test_lifted_predicates_ignore_other_kinds() {
        let n = number(number_p::greater_than(2.0));
        assert!(n.matches(&Value::new(json!(3))));
        assert!(!n.matches(&Value::new(json!("3"))));

        let s = string(string_p::has_prefix("app"));
        assert!(s.matches(&Value::new(json!("app-cm"))));
        assert!(!s.matches(&Value::new(json!(["app"]))));

        let m = map(map_p::num_fields(number_p::equal(1.0)));
        assert!(m.matches(&Value::new(json!({"k": 1}))));
        assert!(!m.matches(&Value::new(json!([1]))));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(is_null().matches(&Value::new(json!(null))));
        assert!(is_bool().matches(&Value::new(json!(true))));
        assert!(is_slice().matches(&Value::new(json!([]))));
        assert!(!is_map().matches(&Value::new(json!([]))));
    }
}
