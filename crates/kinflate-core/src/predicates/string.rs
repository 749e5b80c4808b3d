//! String predicates

use regex::Regex;

use super::{NumberP, Predicate, StringP};
use crate::error::Result;

pub fn equal(expected: impl Into<String>) -> StringP {
    let expected = expected.into();
    Predicate::new(move |s: &str| s == expected)
}

pub fn has_prefix(prefix: impl Into<String>) -> StringP {
    let prefix = prefix.into();
    Predicate::new(move |s: &str| s.starts_with(prefix.as_str()))
}

pub fn has_suffix(suffix: impl Into<String>) -> StringP {
    let suffix = suffix.into();
    Predicate::new(move |s: &str| s.ends_with(suffix.as_str()))
}

/// Matches strings containing a match of `pattern`
pub fn regexp(pattern: &str) -> Result<StringP> {
    let re = Regex::new(pattern)?;
    Ok(Predicate::new(move |s: &str| re.is_match(s)))
}

/// Applies `length` to the number of characters in the string
pub fn length(length: NumberP) -> StringP {
    Predicate::new(move |s: &str| length.matches(&(s.chars().count() as f64)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::predicates::number;

    #[test]
    fn test_equal_prefix_suffix() {
        assert!(equal("kind").matches("kind"));
        assert!(!equal("kind").matches("Kind"));
        assert!(has_prefix("spec.").matches("spec.template"));
        assert!(!has_prefix("spec.").matches("metadata"));
        assert!(has_suffix("-cm").matches("app-cm"));
        assert!(has_suffix("").matches("anything"));
    }

    #[test]
    fn test_regexp() {
        let p = regexp("^cm[0-9]+$").unwrap();
        assert!(p.matches("cm1"));
        assert!(p.matches("cm42"));
        assert!(!p.matches("xcm1"));
    }

    #[test]
    fn test_invalid_regexp() {
        assert!(matches!(regexp("(unclosed"), Err(CoreError::InvalidRegex(_))));
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(length(number::equal(3.0)).matches("abc"));
        assert!(length(number::equal(2.0)).matches("né"));
        assert!(length(number::equal(0.0)).matches(""));
        assert!(!length(number::greater_than(3.0)).matches("abc"));
    }
}
