//! Number predicates
//!
//! Numbers are compared as `f64` under a total order: values that compare
//! equal with `==` are equal (so `0.0` equals `-0.0`), everything else is
//! ordered by [`f64::total_cmp`]. NaN therefore equals itself and sorts above
//! every finite value and infinity, which keeps the derived comparisons
//! consistent with each other.

use std::cmp::Ordering;

use super::{NumberP, Predicate, and, not, or};

fn compare(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

pub fn equal(expected: f64) -> NumberP {
    Predicate::new(move |n: &f64| compare(*n, expected) == Ordering::Equal)
}

/// Strictly greater than `bound`
pub fn greater_than(bound: f64) -> NumberP {
    Predicate::new(move |n: &f64| compare(*n, bound) == Ordering::Greater)
}

/// Strictly less than `bound`, derived as neither equal nor greater
pub fn less_than(bound: f64) -> NumberP {
    and([not(equal(bound)), not(greater_than(bound))])
}

pub fn equal_or_greater_than(bound: f64) -> NumberP {
    or([equal(bound), greater_than(bound)])
}

pub fn equal_or_less_than(bound: f64) -> NumberP {
    or([equal(bound), less_than(bound)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_comparisons() {
        assert!(greater_than(1.0).matches(&1.5));
        assert!(!greater_than(1.0).matches(&1.0));
        assert!(less_than(1.0).matches(&0.5));
        assert!(!less_than(1.0).matches(&1.0));
        assert!(!less_than(1.0).matches(&2.0));
    }

    #[test]
    fn test_inclusive_comparisons() {
        assert!(equal_or_greater_than(1.0).matches(&1.0));
        assert!(equal_or_greater_than(1.0).matches(&7.0));
        assert!(!equal_or_greater_than(1.0).matches(&0.0));
        assert!(equal_or_less_than(1.0).matches(&1.0));
        assert!(equal_or_less_than(1.0).matches(&-7.0));
        assert!(!equal_or_less_than(1.0).matches(&1.1));
    }

    #[test]
    fn test_signed_zero_is_equal() {
        assert!(equal(0.0).matches(&-0.0));
        assert!(!less_than(0.0).matches(&-0.0));
    }

    #[test]
    fn test_nan_is_ordered_above_infinity() {
        assert!(equal(f64::NAN).matches(&f64::NAN));
        assert!(!less_than(1.0).matches(&f64::NAN));
        assert!(greater_than(f64::INFINITY).matches(&f64::NAN));
        assert!(less_than(f64::NAN).matches(&f64::INFINITY));
    }
}
