//! Selectors whose results are projected onto one shape

use super::ValueS;
use crate::predicates::{MapP, NumberP, Predicate, SliceP, StringP, ValueP, value};
use crate::unstruct::{Map, Slice, Value};

/// Selector producing maps
#[derive(Clone)]
pub struct MapS(ValueS);

impl MapS {
    pub(super) fn new(values: ValueS) -> Self {
        Self(values)
    }

    pub fn select(&self, roots: &[Value]) -> Vec<Map> {
        self.0.select(roots).iter().filter_map(Value::as_map).collect()
    }

    pub fn matches(&self, value: &Value) -> bool {
        self.0.matches(value)
    }

    /// Keep the maps matching every predicate
    pub fn filter(&self, predicates: impl IntoIterator<Item = MapP>) -> MapS {
        MapS(self.0.filter(predicates.into_iter().map(value::map)))
    }

    pub fn field(&self, key: impl Into<String>) -> ValueS {
        self.0.field(key)
    }

    pub fn field_p(&self, predicates: impl IntoIterator<Item = StringP>) -> ValueS {
        self.0.field_p(predicates)
    }

    /// Back to an untyped selector over the same results
    pub fn values(&self) -> ValueS {
        self.0.clone()
    }
}

/// Selector producing slices
#[derive(Clone)]
pub struct SliceS(ValueS);

impl SliceS {
    pub(super) fn new(values: ValueS) -> Self {
        Self(values)
    }

    pub fn select(&self, roots: &[Value]) -> Vec<Slice> {
        self.0
            .select(roots)
            .iter()
            .filter_map(Value::as_slice)
            .collect()
    }

    pub fn matches(&self, value: &Value) -> bool {
        self.0.matches(value)
    }

    pub fn filter(&self, predicates: impl IntoIterator<Item = SliceP>) -> SliceS {
        SliceS(self.0.filter(predicates.into_iter().map(value::slice)))
    }

    pub fn at(&self, index: usize) -> ValueS {
        self.0.at(index)
    }

    pub fn at_p(&self, predicates: impl IntoIterator<Item = NumberP>) -> ValueS {
        self.0.at_p(predicates)
    }

    pub fn last(&self) -> ValueS {
        self.0.last()
    }

    pub fn values(&self) -> ValueS {
        self.0.clone()
    }
}

/// Selector producing numbers
#[derive(Clone)]
pub struct NumberS(ValueS);

impl NumberS {
    pub(super) fn new(values: ValueS) -> Self {
        Self(values)
    }

    pub fn select(&self, roots: &[Value]) -> Vec<f64> {
        self.0
            .select(roots)
            .iter()
            .filter_map(Value::as_f64)
            .collect()
    }

    pub fn matches(&self, value: &Value) -> bool {
        self.0.matches(value)
    }

    pub fn filter(&self, predicates: impl IntoIterator<Item = NumberP>) -> NumberS {
        NumberS(self.0.filter(predicates.into_iter().map(value::number)))
    }

    pub fn values(&self) -> ValueS {
        self.0.clone()
    }
}

/// Selector producing strings
#[derive(Clone)]
pub struct StringS(ValueS);

impl StringS {
    pub(super) fn new(values: ValueS) -> Self {
        Self(values)
    }

    pub fn select(&self, roots: &[Value]) -> Vec<String> {
        self.0
            .select(roots)
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    pub fn matches(&self, value: &Value) -> bool {
        self.0.matches(value)
    }

    pub fn filter(&self, predicates: impl IntoIterator<Item = StringP>) -> StringS {
        StringS(self.0.filter(predicates.into_iter().map(value::string)))
    }

    pub fn values(&self) -> ValueS {
        self.0.clone()
    }
}

macro_rules! selector_predicate {
    ($($selector:ty),*) => {
        $(
            impl From<$selector> for ValueP {
                fn from(selector: $selector) -> Self {
                    Predicate::new(move |v: &Value| selector.matches(v))
                }
            }
        )*
    };
}

selector_predicate!(MapS, SliceS, NumberS, StringS);

#[cfg(test)]
mod tests {
    use crate::predicates::{number, slice, string};
    use crate::unstruct::Value;
    use crate::unstructpath;
    use serde_json::json;

    fn deployment() -> Value {
        Value::new(json!({
            "spec": {
                "template": {
                    "spec": {
                        "containers": [
                            {"name": "app", "image": "nginx:1.25", "ports": [{"containerPort": 80}]},
                            {"name": "sidecar", "image": "envoy:1.30", "ports": []}
                        ]
                    }
                }
            }
        }))
    }

    #[test]
    fn test_slice_filter_by_length() {
        let non_empty = unstructpath::all()
            .field("ports")
            .slice()
            .filter([slice::length(number::greater_than(0.0))])
            .select(&[deployment()]);
        assert_eq!(non_empty.len(), 1);
        assert_eq!(non_empty[0].to_json(), json!([{"containerPort": 80}]));
    }

    #[test]
    fn test_string_filter() {
        let images = unstructpath::all()
            .field("image")
            .string()
            .filter([string::has_prefix("nginx")])
            .select(&[deployment()]);
        assert_eq!(images, vec!["nginx:1.25"]);
    }

    #[test]
    fn test_slice_accessors() {
        let containers = unstructpath::field("spec")
            .field("template")
            .field("spec")
            .field("containers")
            .slice();
        let names = containers.last().field("name").string().select(&[deployment()]);
        assert_eq!(names, vec!["sidecar"]);

        let first = containers.at(0).field("name").string().select(&[deployment()]);
        assert_eq!(first, vec!["app"]);

        let ports = containers
            .at_p([])
            .field("ports")
            .slice()
            .at(0)
            .field("containerPort")
            .number()
            .select(&[deployment()]);
        assert_eq!(ports, vec![80.0]);
    }

    #[test]
    fn test_values_returns_untyped_selector() {
        let spec = unstructpath::field("spec").map();
        let template = spec.values().field("template").map().select(&[deployment()]);
        assert_eq!(template.len(), 1);
        assert_eq!(spec.field("template").select(&[deployment()]).len(), 1);
    }
}
