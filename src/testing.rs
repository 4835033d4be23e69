//! In-memory doubles for the browser-facing traits.
//!
//! They let the router run outside the browser: [`MemoryRoot`] stands in for
//! a document or shadow root, [`StaticFetcher`] serves canned templates (or
//! never answers, for in-flight fetches) and
//! [`RecordingBinder`] records every bind.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::render::{Binder, MountRoot, MountedSubtree, TemplateFetcher};

/// A mount root with a fixed set of selectable elements.
#[derive(Debug)]
pub struct MemoryRoot {
	name: String,
	elements: RefCell<HashMap<String, Option<String>>>,
}

impl MemoryRoot {
	/// Creates a root whose elements match exactly `selectors`.
	pub fn new(name: impl Into<String>, selectors: &[&str]) -> Self {
		Self {
			name: name.into(),
			elements: RefCell::new(
				selectors
					.iter()
					.map(|selector| ((*selector).to_string(), None))
					.collect(),
			),
		}
	}

	/// Returns what was last injected into `selector`.
	pub fn content(&self, selector: &str) -> Option<String> {
		self.elements.borrow().get(selector).cloned().flatten()
	}
}

impl MountRoot for MemoryRoot {
	fn name(&self) -> &str {
		&self.name
	}

	fn inject(&self, selector: &str, html: &str) -> bool {
		match self.elements.borrow_mut().get_mut(selector) {
			Some(slot) => {
				*slot = Some(html.to_string());
				true
			}
			None => false,
		}
	}
}

/// Serves registered bodies by URL; anything else is a 404.
#[derive(Debug, Default)]
pub struct StaticFetcher {
	bodies: HashMap<String, String>,
	stalled: HashSet<String>,
	requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
	/// Creates a fetcher with no bodies.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the body served for `url`.
	pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
		self.bodies.insert(url.into(), body.into());
		self
	}

	/// Makes requests for `url` never complete.
	pub fn stall(mut self, url: impl Into<String>) -> Self {
		self.stalled.insert(url.into());
		self
	}

	/// Returns the requested URLs in request order.
	pub fn requests(&self) -> Vec<String> {
		self.requests.borrow().clone()
	}
}

#[async_trait(?Send)]
impl TemplateFetcher for StaticFetcher {
	async fn fetch(&self, url: &str) -> Result<String, FetchError> {
		self.requests.borrow_mut().push(url.to_string());
		if self.stalled.contains(url) {
			return futures::future::pending::<Result<String, FetchError>>().await;
		}
		self.bodies
			.get(url)
			.cloned()
			.ok_or_else(|| FetchError::Status {
				url: url.to_string(),
				status: 404,
			})
	}
}

/// Binder that records the subtrees it was asked to bind.
#[derive(Debug, Default)]
pub struct RecordingBinder {
	bound: RefCell<Vec<MountedSubtree>>,
}

impl RecordingBinder {
	/// Creates an empty binder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the bound subtrees in bind order.
	pub fn bound(&self) -> Vec<MountedSubtree> {
		self.bound.borrow().clone()
	}
}

impl Binder for RecordingBinder {
	fn bind(&self, subtree: &MountedSubtree) {
		self.bound.borrow_mut().push(subtree.clone());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_memory_root_only_matches_known_selectors() {
		// Arrange
		let root = MemoryRoot::new("document", &["main"]);

		// Act
		let hit = root.inject("main", "<p>a</p>");
		let miss = root.inject("#app", "<p>b</p>");

		// Assert
		assert!(hit);
		assert!(!miss);
		assert_eq!(root.content("main").as_deref(), Some("<p>a</p>"));
		assert!(root.content("#app").is_none());
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_static_fetcher_records_requests() {
		// Arrange
		let fetcher = StaticFetcher::new().with("/a.html", "a");

		// Act
		let found = fetcher.fetch("/a.html").await;
		let missing = fetcher.fetch("/b.html").await;

		// Assert
		assert_eq!(found.unwrap(), "a");
		assert_eq!(missing.unwrap_err().url(), "/b.html");
		assert_eq!(fetcher.requests(), vec!["/a.html", "/b.html"]);
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	fn test_stalled_url_never_answers() {
		// Arrange
		let fetcher = StaticFetcher::new().with("/a.html", "a").stall("/a.html");

		// Act
		let answer = futures::FutureExt::now_or_never(fetcher.fetch("/a.html"));

		// Assert
		assert!(answer.is_none());
		assert_eq!(fetcher.requests(), vec!["/a.html"]);
	}
}
