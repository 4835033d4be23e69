//! Query string encoding and decoding.

use std::fmt;

/// An ordered query mapping with unique keys.
///
/// Insertion order is kept for encoding. Inserting an existing key replaces
/// its value in place. Equality ignores order.
#[derive(Clone, Default)]
pub struct QueryMap {
	entries: Vec<(String, String)>,
}

impl QueryMap {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a key, replacing the value of an existing one.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((key, value)),
		}
	}

	/// Returns the value for a key.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Returns whether the key is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether the mapping is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

impl PartialEq for QueryMap {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
	}
}

impl Eq for QueryMap {}

impl fmt::Debug for QueryMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<K, V> FromIterator<(K, V)> for QueryMap
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (k, v) in iter {
			map.insert(k, v);
		}
		map
	}
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryMap
where
	K: Into<String>,
	V: Into<String>,
{
	fn from(entries: [(K, V); N]) -> Self {
		entries.into_iter().collect()
	}
}

/// Encodes a mapping as a `?`-prefixed query string.
///
/// An empty mapping encodes to the empty string.
///
/// ```
/// use reinhardt_navigation::router::{QueryMap, encode_query};
///
/// let query = QueryMap::from([("x", "1"), ("q", "a b")]);
/// assert_eq!(encode_query(&query), "?x=1&q=a+b");
/// ```
pub fn encode_query(query: &QueryMap) -> String {
	if query.is_empty() {
		return String::new();
	}
	// Serializing a sequence of string pairs cannot fail.
	let encoded = serde_urlencoded::to_string(&query.entries).unwrap_or_default();
	format!("?{}", encoded)
}

/// Decodes a query string, with or without its leading `?`.
///
/// Duplicate keys keep the last value.
pub fn decode_query(search: &str) -> QueryMap {
	let raw = search.strip_prefix('?').unwrap_or(search);
	if raw.is_empty() {
		return QueryMap::new();
	}
	serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
		.map(QueryMap::from_iter)
		.unwrap_or_else(|e| {
			tracing::warn!(search, error = %e, "discarding undecodable query string");
			QueryMap::new()
		})
}
