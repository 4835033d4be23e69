//! View resolution for the current path.
//!
//! Resolution is exact on the raw path first. When a path arrives without its
//! parameter names (typed in the address bar, or restored by back/forward),
//! the best-match fallback guesses the view by segment count and rebuilds the
//! `name:value` slug that exact-matches it.
//!
//! # Known limitation
//!
//! When several views share a segment count the first registered one wins,
//! whether or not its literal segments agree with the path.

use super::path::parse_path;
use super::views::{ViewDescriptor, ViewRegistry};

/// Outcome of resolving a path against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	/// A view is registered under the raw path.
	Exact {
		/// Key of the matched view.
		key: String,
	},
	/// No exact match; a view with the same segment count was picked.
	Fallback {
		/// Key of the picked view.
		key: String,
		/// Slug that exact-matches the picked view.
		candidate: String,
	},
	/// Nothing renders for this path.
	Unmatched,
}

/// Resolves a raw path and its live segments to a view.
pub fn resolve(registry: &ViewRegistry, raw_path: &str, segments: &[String]) -> Resolution {
	if registry.contains(raw_path) {
		return Resolution::Exact {
			key: raw_path.to_string(),
		};
	}

	let Some(view) = first_registered_with_segment_count(registry, segments.len()) else {
		return Resolution::Unmatched;
	};
	let candidate = reconstruct_raw_path(view.segments(), segments);
	// A candidate that does not parse back to the key would re-navigate forever.
	if parse_path(&candidate).raw_path != view.key() {
		tracing::warn!(view = view.key(), %candidate, "best match cannot be rebuilt as a slug");
		return Resolution::Unmatched;
	}
	Resolution::Fallback {
		key: view.key().to_string(),
		candidate,
	}
}

/// Tie-break for the best-match fallback: the first view, in declaration
/// order, whose segment count equals `count`.
pub fn first_registered_with_segment_count(
	registry: &ViewRegistry,
	count: usize,
) -> Option<&ViewDescriptor> {
	registry.iter().find(|view| view.segment_count() == count)
}

/// Rebuilds a `name:value` slug by walking declared and live segments
/// positionally.
///
/// Equal segments are kept literally; differing ones bind the declared
/// segment as a parameter name to the live value.
///
/// ```
/// use reinhardt_navigation::router::reconstruct_raw_path;
///
/// let declared = ["product".to_string(), "id".to_string()];
/// let live = ["product".to_string(), "42".to_string()];
/// assert_eq!(reconstruct_raw_path(&declared, &live), "/product/id:42");
/// ```
pub fn reconstruct_raw_path(declared: &[String], live: &[String]) -> String {
	let parts: Vec<String> = declared
		.iter()
		.zip(live)
		.map(|(declared, live)| {
			if declared == live {
				declared.clone()
			} else {
				format!("{}:{}", declared, live)
			}
		})
		.collect();
	format!("/{}", parts.join("/"))
}
