//! Path parsing for `name:value` parameter segments.
//!
//! A navigation slug carries its parameters inline. `/product/id:42` is shown
//! in the address bar as `/product/42` (the value path) and looked up in the
//! view registry as `/product/id` (the raw path).

use std::collections::HashMap;

/// Mapping from parameter name to its value.
pub type ParamMap = HashMap<String, String>;

/// Result of parsing a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
	/// Path with every `name:value` segment replaced by `value`.
	pub value_path: String,
	/// Path with every `name:value` segment replaced by `name`.
	pub raw_path: String,
	/// Parameters extracted from `name:value` segments.
	pub params: ParamMap,
	/// Segments of the value path.
	pub segments: Vec<String>,
}

impl ParsedPath {
	/// Returns the number of path segments.
	pub fn segment_count(&self) -> usize {
		self.segments.len()
	}
}

/// Parses a path (without query component) into its value and raw variants.
///
/// Only the first `:` of a segment is a separator; `a:b:c` binds `a` to
/// `b:c`. A segment with an empty name such as `:id` is kept literally.
///
/// # Example
///
/// ```
/// use reinhardt_navigation::router::parse_path;
///
/// let parsed = parse_path("/product/id:42/reviews");
/// assert_eq!(parsed.value_path, "/product/42/reviews");
/// assert_eq!(parsed.raw_path, "/product/id/reviews");
/// assert_eq!(parsed.params.get("id").map(String::as_str), Some("42"));
/// ```
pub fn parse_path(path: &str) -> ParsedPath {
	let mut value_path = String::from("/");
	let mut raw_path = String::from("/");
	let mut params = ParamMap::new();
	let mut segments = Vec::new();

	for component in path.split('/').filter(|c| !c.is_empty()) {
		match split_param(component) {
			Some((name, value)) => {
				if value.contains(':') {
					tracing::debug!(
						segment = component,
						"segment has more than one ':'; binding the remainder as the value"
					);
				}
				params.insert(name.to_string(), value.to_string());
				value_path.push_str(value);
				raw_path.push_str(name);
				segments.push(value.to_string());
			}
			None => {
				value_path.push_str(component);
				raw_path.push_str(component);
				segments.push(component.to_string());
			}
		}
		value_path.push('/');
		raw_path.push('/');
	}

	ParsedPath {
		value_path: drop_trailing_slash(&value_path).to_string(),
		raw_path: drop_trailing_slash(&raw_path).to_string(),
		params,
		segments,
	}
}

/// Splits a `name:value` segment on its first separator.
fn split_param(component: &str) -> Option<(&str, &str)> {
	component
		.split_once(':')
		.filter(|(name, _)| !name.is_empty())
}

/// Removes exactly one trailing `/`, leaving the root path untouched.
pub fn drop_trailing_slash(path: &str) -> &str {
	if path == "/" {
		return path;
	}
	path.strip_suffix('/').unwrap_or(path)
}

/// Splits a slug into its path and optional query on the first `?`.
///
/// The returned query does not include the `?`.
pub fn split_slug(slug: &str) -> (&str, Option<&str>) {
	match slug.split_once('?') {
		Some((path, query)) => (path, Some(query)),
		None => (slug, None),
	}
}

/// Returns the non-empty segments of a path.
pub fn path_segments(path: &str) -> Vec<String> {
	path.split('/')
		.filter(|c| !c.is_empty())
		.map(str::to_string)
		.collect()
}

/// Returns the parameter name a declared segment stands for.
///
/// `:id` and `id:42` both declare `id`; a plain segment declares itself.
pub fn declared_segment(segment: &str) -> &str {
	if let Some(name) = segment.strip_prefix(':') {
		return name;
	}
	split_param(segment).map_or(segment, |(name, _)| name)
}

/// Normalises a view declaration to its raw lookup key.
///
/// ```
/// use reinhardt_navigation::router::declared_key;
///
/// assert_eq!(declared_key("/product/:id"), "/product/id");
/// assert_eq!(declared_key("/product/id/"), "/product/id");
/// assert_eq!(declared_key("/"), "/");
/// ```
pub fn declared_key(expression: &str) -> String {
	let mut key = String::from("/");
	for segment in expression.split('/').filter(|c| !c.is_empty()) {
		key.push_str(declared_segment(segment));
		key.push('/');
	}
	drop_trailing_slash(&key).to_string()
}
