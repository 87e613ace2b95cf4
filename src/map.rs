//! Ordered map type for query string mappings.
//!
//! This module provides [`QsMap`], a wrapper around [`IndexMap`] that keeps
//! keys in insertion order. Parsing inserts keys in the order they first
//! appear in the input, and stringifying walks them in that same order, so
//! `a=1&b=2` survives a round trip with its field order intact.
//!
//! Equality ignores order: two maps are equal when they hold the same keys
//! with equal values.
//!
//! ## Examples
//!
//! ```rust
//! use qs_value::{QsMap, Value};
//!
//! let mut map = QsMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to query string values.
///
/// # Examples
///
/// ```rust
/// use qs_value::{QsMap, Value};
///
/// let mut map = QsMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QsMap(IndexMap<String, crate::Value>);

impl QsMap {
    /// Creates an empty `QsMap`.
    #[must_use]
    pub fn new() -> Self {
        QsMap(IndexMap::new())
    }

    /// Creates an empty `QsMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        QsMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced in place
    /// (keeping the key's original position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qs_value::{QsMap, Value};
    ///
    /// let mut map = QsMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut crate::Value> {
        self.0.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<crate::Value> {
        self.0.shift_remove(key)
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns a mutable iterator over the values of the map, in insertion order.
    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, crate::Value> {
        self.0.values_mut()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl Default for QsMap {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HashMap<String, crate::Value>> for QsMap {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        QsMap(map.into_iter().collect())
    }
}

impl From<QsMap> for HashMap<String, crate::Value> {
    fn from(map: QsMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for QsMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QsMap {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::Value)> for QsMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        QsMap(IndexMap::from_iter(iter))
    }
}
