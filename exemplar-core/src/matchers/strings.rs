//! String matchers.

use std::fmt::Debug;

use super::{MatchOutcome, Matcher, MatcherExt, describe};
use crate::error::Error;

/// Matches strings holding a substring.
#[derive(Clone, Debug)]
pub struct Contain {
    needle: String,
}

/// Returns a matcher succeeding when the string contains `needle`.
pub fn contain(needle: impl Into<String>) -> Contain {
    Contain {
        needle: needle.into(),
    }
}

impl<T: AsRef<str> + Debug + ?Sized> Matcher<T> for Contain {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        Ok(MatchOutcome::new(
            value.as_ref().contains(self.needle.as_str()),
            format!("{actual} contains {:?}", self.needle),
            format!("{actual} does not contain {:?}", self.needle),
        ))
    }
}

impl MatcherExt for Contain {}

/// Matches strings starting with a prefix.
#[derive(Clone, Debug)]
pub struct StartWith {
    prefix: String,
}

/// Returns a matcher succeeding when the string starts with `prefix`.
pub fn start_with(prefix: impl Into<String>) -> StartWith {
    StartWith {
        prefix: prefix.into(),
    }
}

impl<T: AsRef<str> + Debug + ?Sized> Matcher<T> for StartWith {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        Ok(MatchOutcome::new(
            value.as_ref().starts_with(self.prefix.as_str()),
            format!("{actual} starts with {:?}", self.prefix),
            format!("{actual} does not start with {:?}", self.prefix),
        ))
    }
}

impl MatcherExt for StartWith {}

/// Matches strings ending with a suffix.
#[derive(Clone, Debug)]
pub struct EndWith {
    suffix: String,
}

/// Returns a matcher succeeding when the string ends with `suffix`.
pub fn end_with(suffix: impl Into<String>) -> EndWith {
    EndWith {
        suffix: suffix.into(),
    }
}

impl<T: AsRef<str> + Debug + ?Sized> Matcher<T> for EndWith {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        Ok(MatchOutcome::new(
            value.as_ref().ends_with(self.suffix.as_str()),
            format!("{actual} ends with {:?}", self.suffix),
            format!("{actual} does not end with {:?}", self.suffix),
        ))
    }
}

impl MatcherExt for EndWith {}

/// Matches strings against a regular expression.
#[derive(Clone, Debug)]
pub struct MatchRegex {
    regex: fancy_regex::Regex,
}

/// Returns a matcher succeeding when the string matches `pattern` anywhere.
///
/// # Arguments
///
/// * `pattern` - The regular expression; backreferences and lookaround are
///   supported.
pub fn match_regex(pattern: &str) -> Result<MatchRegex, Error> {
    let regex = fancy_regex::Regex::new(pattern)
        .map_err(|e| Error::InvalidRegex(pattern.to_owned(), Box::new(e)))?;

    Ok(MatchRegex { regex })
}

impl<T: AsRef<str> + Debug + ?Sized> Matcher<T> for MatchRegex {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        let pattern = self.regex.as_str();

        let matched = self
            .regex
            .is_match(value.as_ref())
            .map_err(|e| Error::MatcherEvaluation(Box::new(e)))?;

        Ok(MatchOutcome::new(
            matched,
            format!("{actual} matches /{pattern}/"),
            format!("{actual} does not match /{pattern}/"),
        ))
    }
}

impl MatcherExt for MatchRegex {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_substrings() -> anyhow::Result<()> {
        assert!(contain("ell").apply("hello", None)?.success);
        assert!(start_with("he").apply(&String::from("hello"), None)?.success);
        assert!(end_with("lo").apply("hello", None)?.success);

        let outcome = contain("xyz").apply("hello", Some("the greeting"))?;
        assert!(!outcome.success);
        assert_eq!(
            outcome.ko_message,
            r#"the greeting "hello" does not contain "xyz""#
        );
        Ok(())
    }

    #[test]
    fn test_regex() -> anyhow::Result<()> {
        let matcher = match_regex(r"^a(b|c)+$")?;
        assert!(matcher.apply("abcb", None)?.success);
        assert!(!matcher.apply("abd", None)?.success);

        let backref = match_regex(r"(\w)\1")?;
        assert!(backref.apply("hello", None)?.success);
        Ok(())
    }

    #[test]
    fn test_regex_runtime_error_is_not_a_verdict() -> anyhow::Result<()> {
        let matcher = match_regex(r"^(a|a)*\1b")?;
        let input = "a".repeat(40);

        assert!(matches!(
            matcher.apply(&input, None),
            Err(Error::MatcherEvaluation(_))
        ));
        assert!(matches!(
            matcher.negate().apply(&input, None),
            Err(Error::MatcherEvaluation(_))
        ));
        Ok(())
    }

    #[test]
    fn test_invalid_regex() {
        assert!(matches!(match_regex("a(b"), Err(Error::InvalidRegex(_, _))));
    }
}
