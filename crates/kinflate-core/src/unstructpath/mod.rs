//! Chainable queries over document trees
//!
//! A selector turns a list of tree values into another list of tree values.
//! Every step (`field`, `at`, `children`, `filter`, ...) returns a new
//! selector that wraps the previous one, so pipelines read left to right:
//!
//! ```
//! use kinflate_core::predicates::number;
//! use kinflate_core::unstruct::Value;
//! use kinflate_core::unstructpath;
//! use serde_json::json;
//!
//! let doc = Value::new(json!({
//!     "store": {"book": [{"price": 8.95}, {"price": 22.99}]}
//! }));
//!
//! let cheap = unstructpath::all()
//!     .field("price")
//!     .number()
//!     .filter([number::less_than(10.0)]);
//!
//! assert_eq!(cheap.select(&[doc]), vec![8.95]);
//! ```
//!
//! Missing fields, out-of-range indices and values of the wrong shape select
//! nothing; selection never fails. Map fields are visited in sorted key order.
//!
//! Any selector is also a predicate: it matches a value when selecting from
//! that value yields at least one result.

use std::sync::Arc;

use crate::predicates::{NumberP, Predicate, StringP, ValueP, and, number, string, value};
use crate::unstruct::Value;

mod typed;

pub use typed::{MapS, NumberS, SliceS, StringS};

#[derive(Clone)]
enum Filter {
    Field(StringP),
    At(NumberP),
    Last,
    Children,
    All,
    Parent,
    Matching(ValueP),
}

impl Filter {
    fn apply(&self, values: Vec<Value>) -> Vec<Value> {
        match self {
            Filter::Field(key) => select_fields(&values, key),
            Filter::At(index) => select_indices(&values, index),
            Filter::Last => values
                .iter()
                .filter_map(|v| v.as_slice().and_then(|s| s.last()))
                .collect(),
            Filter::Children => select_children(&values),
            Filter::All => {
                let mut out = Vec::new();
                for v in values {
                    collect_all(v, &mut out);
                }
                out
            }
            Filter::Parent => values.iter().filter_map(Value::parent).collect(),
            Filter::Matching(p) => values.into_iter().filter(|v| p.matches(v)).collect(),
        }
    }
}

fn select_fields(values: &[Value], key: &StringP) -> Vec<Value> {
    values
        .iter()
        .filter_map(Value::as_map)
        .flat_map(|m| m.entries())
        .filter(|(k, _)| key.matches(k))
        .map(|(_, v)| v)
        .collect()
}

fn select_indices(values: &[Value], index: &NumberP) -> Vec<Value> {
    values
        .iter()
        .filter_map(Value::as_slice)
        .flat_map(|s| {
            s.values()
                .into_iter()
                .enumerate()
                .filter(|(i, _)| index.matches(&(*i as f64)))
                .map(|(_, v)| v)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Map children of every input first, then slice children of every input
fn select_children(values: &[Value]) -> Vec<Value> {
    let mut out = select_fields(values, &and([]));
    out.extend(select_indices(values, &and([])));
    out
}

fn collect_all(v: Value, out: &mut Vec<Value>) {
    let children = select_children(std::slice::from_ref(&v));
    out.push(v);
    for child in children {
        collect_all(child, out);
    }
}

/// A step in a selection pipeline producing tree values
#[derive(Clone)]
pub struct ValueS {
    upstream: Option<Arc<ValueS>>,
    filter: Filter,
}

impl ValueS {
    fn start(filter: Filter) -> Self {
        Self {
            upstream: None,
            filter,
        }
    }

    fn then(&self, filter: Filter) -> Self {
        Self {
            upstream: Some(Arc::new(self.clone())),
            filter,
        }
    }

    /// Run the pipeline starting from `roots`
    pub fn select(&self, roots: &[Value]) -> Vec<Value> {
        let input = match &self.upstream {
            Some(upstream) => upstream.select(roots),
            None => roots.to_vec(),
        };
        self.filter.apply(input)
    }

    /// True when selecting from `value` yields anything
    pub fn matches(&self, value: &Value) -> bool {
        !self.select(std::slice::from_ref(value)).is_empty()
    }

    /// Value of the field named `key` in each map
    pub fn field(&self, key: impl Into<String>) -> ValueS {
        self.then(Filter::Field(string::equal(key)))
    }

    /// Values of the fields whose names match all `predicates` (every field if none)
    pub fn field_p(&self, predicates: impl IntoIterator<Item = StringP>) -> ValueS {
        self.then(Filter::Field(and(predicates)))
    }

    /// Element at `index` in each slice
    pub fn at(&self, index: usize) -> ValueS {
        self.then(Filter::At(number::equal(index as f64)))
    }

    /// Elements whose index matches all `predicates` (every element if none)
    pub fn at_p(&self, predicates: impl IntoIterator<Item = NumberP>) -> ValueS {
        self.then(Filter::At(and(predicates)))
    }

    /// Final element of each non-empty slice
    pub fn last(&self) -> ValueS {
        self.then(Filter::Last)
    }

    /// Direct children of each value
    pub fn children(&self) -> ValueS {
        self.then(Filter::Children)
    }

    /// Each value followed by all of its descendants, in pre-order
    pub fn all(&self) -> ValueS {
        self.then(Filter::All)
    }

    /// Container of each value; roots select nothing
    pub fn parent(&self) -> ValueS {
        self.then(Filter::Parent)
    }

    /// Keep the values matching every predicate
    pub fn filter(&self, predicates: impl IntoIterator<Item = ValueP>) -> ValueS {
        self.then(Filter::Matching(and(predicates)))
    }

    pub fn map(&self) -> MapS {
        MapS::new(self.filter([value::is_map()]))
    }

    pub fn slice(&self) -> SliceS {
        SliceS::new(self.filter([value::is_slice()]))
    }

    pub fn number(&self) -> NumberS {
        NumberS::new(self.filter([value::is_number()]))
    }

    pub fn string(&self) -> StringS {
        StringS::new(self.filter([value::is_string()]))
    }
}

impl From<ValueS> for ValueP {
    fn from(selector: ValueS) -> Self {
        Predicate::new(move |v: &Value| selector.matches(v))
    }
}

pub fn field(key: impl Into<String>) -> ValueS {
    ValueS::start(Filter::Field(string::equal(key)))
}

pub fn field_p(predicates: impl IntoIterator<Item = StringP>) -> ValueS {
    ValueS::start(Filter::Field(and(predicates)))
}

pub fn at(index: usize) -> ValueS {
    ValueS::start(Filter::At(number::equal(index as f64)))
}

pub fn at_p(predicates: impl IntoIterator<Item = NumberP>) -> ValueS {
    ValueS::start(Filter::At(and(predicates)))
}

pub fn last() -> ValueS {
    ValueS::start(Filter::Last)
}

pub fn children() -> ValueS {
    ValueS::start(Filter::Children)
}

pub fn all() -> ValueS {
    ValueS::start(Filter::All)
}

pub fn parent() -> ValueS {
    ValueS::start(Filter::Parent)
}

pub fn filter(predicates: impl IntoIterator<Item = ValueP>) -> ValueS {
    ValueS::start(Filter::Matching(and(predicates)))
}

pub fn map() -> MapS {
    MapS::new(filter([value::is_map()]))
}

pub fn slice() -> SliceS {
    SliceS::new(filter([value::is_slice()]))
}

pub fn number() -> NumberS {
    NumberS::new(filter([value::is_number()]))
}

pub fn string() -> StringS {
    StringS::new(filter([value::is_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::{map as map_p, number as number_p, string as string_p};
    use serde_json::json;

    fn store() -> Value {
        Value::new(json!({
            "store": {
                "book": [
                    {
                        "category": "reference",
                        "author": "Nigel Rees",
                        "title": "Sayings of the Century",
                        "price": 8.95
                    },
                    {
                        "category": "fiction",
                        "author": "Evelyn Waugh",
                        "title": "Sword of Honour",
                        "price": 12.99
                    },
                    {
                        "category": "fiction",
                        "author": "Herman Melville",
                        "title": "Moby Dick",
                        "isbn": "0-553-21311-3",
                        "price": 8.99
                    },
                    {
                        "category": "fiction",
                        "author": "J. R. R. Tolkien",
                        "title": "The Lord of the Rings",
                        "isbn": "0-395-19395-8",
                        "price": 22.99
                    }
                ],
                "bicycle": {
                    "color": "red",
                    "price": 19.95
                }
            }
        }))
    }

    fn preorder(v: &Value) -> Vec<Value> {
        let mut out = vec![v.clone()];
        if let Some(map) = v.as_map() {
            for (_, child) in map.entries() {
                out.extend(preorder(&child));
            }
        }
        if let Some(slice) = v.as_slice() {
            for child in slice.values() {
                out.extend(preorder(&child));
            }
        }
        out
    }

    #[test]
    fn test_field_chain() {
        let authors = field("store")
            .field("book")
            .at(1)
            .field("author")
            .string()
            .select(&[store()]);
        assert_eq!(authors, vec!["Evelyn Waugh"]);
    }

    #[test]
    fn test_missing_field_and_index_select_nothing() {
        let root = store();
        assert!(field("nope").select(&[root.clone()]).is_empty());
        assert!(field("store").field("book").at(99).select(&[root.clone()]).is_empty());
        assert!(field("store").field("bicycle").at(0).select(&[root.clone()]).is_empty());
        assert!(
            field("store")
                .field("book")
                .field("title")
                .select(&[root.clone()])
                .is_empty()
        );
        assert!(all().field("missing").at(3).select(&[root]).is_empty());
    }

    #[test]
    fn test_all_prices_in_sorted_preorder() {
        let prices = all().field("price").number().select(&[store()]);
        assert_eq!(prices, vec![19.95, 8.95, 12.99, 8.99, 22.99]);
    }

    #[test]
    fn test_all_is_preorder_closure() {
        let root = store();
        let selected = all().select(&[root.clone()]);
        let expected = preorder(&root);

        assert_eq!(selected.len(), expected.len());
        for (a, b) in selected.iter().zip(expected.iter()) {
            assert!(a.same(b));
        }
        assert!(selected[0].same(&root));
    }

    #[test]
    fn test_all_equals_self_plus_children_all() {
        let root = store();
        let mut expected = vec![root.clone()];
        expected.extend(children().all().select(&[root.clone()]));

        let selected = all().select(&[root]);
        assert_eq!(selected.len(), expected.len());
        assert!(selected.iter().zip(expected.iter()).all(|(a, b)| a.same(b)));
    }

    #[test]
    fn test_children_maps_before_slices() {
        let list = Value::new(json!([1, 2]));
        let obj = Value::new(json!({"b": "x", "a": "y"}));

        let selected: Vec<_> = children()
            .select(&[list, obj])
            .iter()
            .map(Value::to_json)
            .collect();
        assert_eq!(selected, vec![json!("y"), json!("x"), json!(1), json!(2)]);
    }

    #[test]
    fn test_filter_cheap_books() {
        let cheap = field("store")
            .field("book")
            .at_p([])
            .filter([field("price")
                .number()
                .filter([number_p::less_than(10.0)])
                .into()])
            .field("title")
            .string()
            .select(&[store()]);

        assert_eq!(cheap, vec!["Sayings of the Century", "Moby Dick"]);
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let books = field("store")
            .field("book")
            .at_p([])
            .filter([
                field("category").string().filter([string_p::equal("fiction")]).into(),
                field("price").number().filter([number_p::greater_than(10.0)]).into(),
            ])
            .field("title")
            .string()
            .select(&[store()]);

        assert_eq!(books, vec!["Sword of Honour", "The Lord of the Rings"]);
    }

    #[test]
    fn test_parent() {
        let titles = all()
            .field("isbn")
            .parent()
            .field("title")
            .string()
            .select(&[store()]);
        assert_eq!(titles, vec!["Moby Dick", "The Lord of the Rings"]);

        assert!(parent().select(&[store()]).is_empty());
    }

    #[test]
    fn test_last_and_at_p() {
        let root = store();
        let final_author = field("store")
            .field("book")
            .last()
            .field("author")
            .string()
            .select(&[root.clone()]);
        assert_eq!(final_author, vec!["J. R. R. Tolkien"]);

        let first_two = field("store")
            .field("book")
            .at_p([number_p::less_than(2.0)])
            .field("price")
            .number()
            .select(&[root.clone()]);
        assert_eq!(first_two, vec![8.95, 12.99]);

        assert!(last().select(&[Value::new(json!([]))]).is_empty());
    }

    #[test]
    fn test_field_p() {
        let root = Value::new(json!({"app.kubernetes.io/name": "a", "app.kubernetes.io/part-of": "b", "tier": "c"}));
        let values = field_p([string_p::has_prefix("app.kubernetes.io/")])
            .string()
            .select(&[root.clone()]);
        assert_eq!(values, vec!["a", "b"]);

        assert_eq!(field_p([]).select(&[root]).len(), 3);
    }

    #[test]
    fn test_typed_projections_drop_other_kinds() {
        let root = Value::new(json!({"a": 1, "b": "two", "c": [3], "d": {"e": 4}, "f": null}));
        assert_eq!(children().number().select(&[root.clone()]), vec![1.0]);
        assert_eq!(children().string().select(&[root.clone()]), vec!["two"]);
        assert_eq!(children().slice().select(&[root.clone()]).len(), 1);
        assert_eq!(children().map().select(&[root]).len(), 1);
    }

    #[test]
    fn test_map_filter() {
        let maps = all()
            .map()
            .filter([map_p::num_fields(number_p::equal(2.0))])
            .select(&[store()]);
        // `store` (book, bicycle) and `bicycle` (color, price)
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0].keys(), vec!["bicycle", "book"]);
        assert_eq!(maps[1].to_json(), json!({"color": "red", "price": 19.95}));
    }

    #[test]
    fn test_selector_as_predicate() {
        let has_isbn: ValueP = field("isbn").into();
        let books = field("store").field("book").at_p([]).select(&[store()]);
        let flags: Vec<bool> = books.iter().map(|b| has_isbn.matches(b)).collect();
        assert_eq!(flags, vec![false, false, true, true]);

        assert!(field("store").matches(&store()));
        assert!(!field("shop").matches(&store()));
    }

    #[test]
    fn test_selectors_are_reusable() {
        let titles = field("store").field("book").at_p([]).field("title");
        let a = titles.select(&[store()]);
        let b = titles.select(&[store()]);
        assert_eq!(a.len(), 4);
        assert_eq!(
            a.iter().map(Value::to_json).collect::<Vec<_>>(),
            b.iter().map(Value::to_json).collect::<Vec<_>>()
        );
    }
}
