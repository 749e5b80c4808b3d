//! Composable boolean tests
//!
//! A [`Predicate<T>`] wraps a pure test over values of a domain `T`. The
//! combinators [`not`], [`and`] and [`or`] are written once and work for every
//! domain:
//!
//! | domain | type | leaves |
//! |--------|------|--------|
//! | numbers | `Predicate<f64>` | [`number`] |
//! | strings | `Predicate<str>` | [`string`] |
//! | tree values | `Predicate<Value>` | [`value`] |
//! | maps | `Predicate<Map>` | [`map`] |
//! | slices | `Predicate<Slice>` | [`slice`] |
//!
//! `or` is defined through De Morgan's law, so `and([])` always matches and
//! `or([])` never does.

use std::fmt;
use std::sync::Arc;

use crate::unstruct::{Map, Slice, Value};

pub mod map;
pub mod number;
pub mod slice;
pub mod string;
pub mod value;

/// A pure boolean test over values of type `T`
pub struct Predicate<T: ?Sized>(Arc<dyn Fn(&T) -> bool + Send + Sync>);

pub type NumberP = Predicate<f64>;
pub type StringP = Predicate<str>;
pub type ValueP = Predicate<Value>;
pub type MapP = Predicate<Map>;
pub type SliceP = Predicate<Slice>;

impl<T: ?Sized> Predicate<T> {
    pub fn new(test: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(test))
    }

    pub fn matches(&self, value: &T) -> bool {
        (self.0)(value)
    }
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// Matches exactly when `predicate` does not
pub fn not<T: ?Sized + 'static>(predicate: Predicate<T>) -> Predicate<T> {
    Predicate::new(move |value: &T| !predicate.matches(value))
}

/// Matches when every predicate matches; an empty list always matches
pub fn and<T: ?Sized + 'static>(
    predicates: impl IntoIterator<Item = Predicate<T>>,
) -> Predicate<T> {
    let predicates: Vec<Predicate<T>> = predicates.into_iter().collect();
    Predicate::new(move |value: &T| predicates.iter().all(|p| p.matches(value)))
}

/// Matches when any predicate matches; an empty list never matches
///
/// Built as `not(and(not(p1), .., not(pn)))`.
pub fn or<T: ?Sized + 'static>(predicates: impl IntoIterator<Item = Predicate<T>>) -> Predicate<T> {
    not(and(predicates.into_iter().map(not)))
}
