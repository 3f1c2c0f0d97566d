//! Matchers over sized collections.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use super::{MatchOutcome, Matcher, MatcherExt, describe};
use crate::error::Error;

/// Collections whose size can be inspected by the collection matchers.
pub trait Collection {
    /// Returns the number of items in the collection.
    fn item_count(&self) -> usize;
}

impl Collection for str {
    fn item_count(&self) -> usize {
        self.chars().count()
    }
}

impl Collection for String {
    fn item_count(&self) -> usize {
        self.as_str().item_count()
    }
}

impl<V> Collection for [V] {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl<V, const N: usize> Collection for [V; N] {
    fn item_count(&self) -> usize {
        N
    }
}

impl<V> Collection for Vec<V> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl<V> Collection for VecDeque<V> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl<K, V, S> Collection for HashMap<K, V, S> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl<V, S> Collection for HashSet<V, S> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl<K, V> Collection for BTreeMap<K, V> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl<V> Collection for BTreeSet<V> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

/// Matches empty collections.
#[derive(Clone, Copy, Debug, Default)]
pub struct BeEmpty;

/// Returns a matcher succeeding when the collection holds no items.
pub const fn be_empty() -> BeEmpty {
    BeEmpty
}

impl<T: Collection + Debug + ?Sized> Matcher<T> for BeEmpty {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        Ok(MatchOutcome::new(
            value.item_count() == 0,
            format!("{actual} is empty"),
            format!("{actual} is not empty"),
        ))
    }
}

impl MatcherExt for BeEmpty {}

/// Matches collections holding an exact number of items.
#[derive(Clone, Copy, Debug)]
pub struct HaveLength {
    expected: usize,
}

/// Returns a matcher succeeding when the collection holds exactly `expected` items.
pub const fn have_length(expected: usize) -> HaveLength {
    HaveLength { expected }
}

impl<T: Collection + Debug + ?Sized> Matcher<T> for HaveLength {
    fn apply(&self, value: &T, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        let count = value.item_count();
        Ok(MatchOutcome::new(
            count == self.expected,
            format!("{actual} has length {}", self.expected),
            format!("{actual} has length {count}, not {}", self.expected),
        ))
    }
}

impl MatcherExt for HaveLength {}

/// Matches slices or vectors holding a given element.
#[derive(Clone, Debug)]
pub struct ContainElement<E> {
    element: E,
}

/// Returns a matcher succeeding when the sequence holds an item equal to `element`.
pub const fn contain_element<E>(element: E) -> ContainElement<E> {
    ContainElement { element }
}

impl<E: Debug> ContainElement<E> {
    fn check<V: PartialEq<E>>(&self, items: &[V], actual: String) -> MatchOutcome {
        MatchOutcome::new(
            items.iter().any(|item| *item == self.element),
            format!("{actual} contains {:?}", self.element),
            format!("{actual} does not contain {:?}", self.element),
        )
    }
}

impl<V: PartialEq<E> + Debug, E: Debug> Matcher<[V]> for ContainElement<E> {
    fn apply(&self, value: &[V], description: Option<&str>) -> Result<MatchOutcome, Error> {
        Ok(self.check(value, describe(value, description)))
    }
}

impl<V: PartialEq<E> + Debug, E: Debug, const N: usize> Matcher<[V; N]> for ContainElement<E> {
    fn apply(&self, value: &[V; N], description: Option<&str>) -> Result<MatchOutcome, Error> {
        Ok(self.check(value, describe(value, description)))
    }
}

impl<V: PartialEq<E> + Debug, E: Debug> Matcher<Vec<V>> for ContainElement<E> {
    fn apply(&self, value: &Vec<V>, description: Option<&str>) -> Result<MatchOutcome, Error> {
        Ok(self.check(value, describe(value, description)))
    }
}

impl<V: PartialEq<E> + Debug, E: Debug> Matcher<VecDeque<V>> for ContainElement<E> {
    fn apply(&self, value: &VecDeque<V>, description: Option<&str>) -> Result<MatchOutcome, Error> {
        let actual = describe(value, description);
        Ok(MatchOutcome::new(
            value.iter().any(|item| *item == self.element),
            format!("{actual} contains {:?}", self.element),
            format!("{actual} does not contain {:?}", self.element),
        ))
    }
}

impl<E> MatcherExt for ContainElement<E> {}
