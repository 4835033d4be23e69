//! Browser history integration.
//!
//! The router only needs three things from history: push an entry, replace
//! the current one, and read the location back. [`MemoryHistory`] provides
//! them outside the browser; `BrowserHistory` wraps the History API on wasm.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

use super::path::split_slug;
use crate::error::NavigationResult;

/// State stored with every history entry the router creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
	/// URL shown in the address bar (value path plus query).
	pub url: String,
	/// Mount target the navigation rendered into.
	pub target: String,
}

impl HistoryEntry {
	/// Creates a new entry.
	pub fn new(url: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			target: target.into(),
		}
	}
}

/// The parts of the current location the router reads back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
	/// Path component, e.g. `/view/aaron`.
	pub pathname: String,
	/// Query component including `?`, or empty.
	pub search: String,
	/// Scheme, host and port, e.g. `http://localhost:5173`.
	pub origin: String,
}

impl Location {
	/// Builds a location from an origin and a same-origin URL.
	pub fn from_url(origin: impl Into<String>, url: &str) -> Self {
		let (path, query) = split_slug(url);
		let pathname = if path.is_empty() { "/" } else { path };
		let search = match query {
			Some(q) if !q.is_empty() => format!("?{}", q),
			_ => String::new(),
		};
		Self {
			pathname: pathname.to_string(),
			search,
			origin: origin.into(),
		}
	}

	/// Returns the path and query, the slug that reproduces this location.
	pub fn slug(&self) -> String {
		format!("{}{}", self.pathname, self.search)
	}
}

/// A history backend.
pub trait History {
	/// Adds an entry without reloading the document.
	fn push(&self, entry: &HistoryEntry) -> NavigationResult<()>;

	/// Replaces the current entry without reloading the document.
	fn replace(&self, entry: &HistoryEntry) -> NavigationResult<()>;

	/// Reads the current location.
	fn location(&self) -> Location;
}

#[derive(Debug, Clone)]
struct MemoryRecord {
	url: String,
	state: Option<HistoryEntry>,
}

/// In-memory history with back/forward support.
///
/// Like a browser, the initial entry carries no state, pushing discards the
/// forward entries, and `back`/`forward` only move the cursor. The caller
/// delivers the popstate by passing [`MemoryHistory::current_state`] to
/// [`Router::handle_popstate`](crate::Router::handle_popstate).
#[derive(Debug)]
pub struct MemoryHistory {
	origin: String,
	records: RefCell<Vec<MemoryRecord>>,
	cursor: Cell<usize>,
}

impl MemoryHistory {
	/// Creates a history positioned at `initial_url`.
	pub fn new(origin: impl Into<String>, initial_url: impl Into<String>) -> Self {
		Self {
			origin: origin.into(),
			records: RefCell::new(vec![MemoryRecord {
				url: initial_url.into(),
				state: None,
			}]),
			cursor: Cell::new(0),
		}
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.records.borrow().len()
	}

	/// Always `false`; a history has at least its initial entry.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Returns the index of the current entry.
	pub fn position(&self) -> usize {
		self.cursor.get()
	}

	/// Returns the URL of the current entry.
	pub fn current_url(&self) -> String {
		self.records.borrow()[self.cursor.get()].url.clone()
	}

	/// Returns the state of the current entry.
	pub fn current_state(&self) -> Option<HistoryEntry> {
		self.records.borrow()[self.cursor.get()].state.clone()
	}

	/// Moves one entry back. Returns `false` at the first entry.
	pub fn back(&self) -> bool {
		let cursor = self.cursor.get();
		if cursor == 0 {
			return false;
		}
		self.cursor.set(cursor - 1);
		true
	}

	/// Moves one entry forward. Returns `false` at the last entry.
	pub fn forward(&self) -> bool {
		let cursor = self.cursor.get();
		if cursor + 1 >= self.len() {
			return false;
		}
		self.cursor.set(cursor + 1);
		true
	}
}

impl History for MemoryHistory {
	fn push(&self, entry: &HistoryEntry) -> NavigationResult<()> {
		let mut records = self.records.borrow_mut();
		records.truncate(self.cursor.get() + 1);
		records.push(MemoryRecord {
			url: entry.url.clone(),
			state: Some(entry.clone()),
		});
		self.cursor.set(records.len() - 1);
		Ok(())
	}

	fn replace(&self, entry: &HistoryEntry) -> NavigationResult<()> {
		self.records.borrow_mut()[self.cursor.get()] = MemoryRecord {
			url: entry.url.clone(),
			state: Some(entry.clone()),
		};
		Ok(())
	}

	fn location(&self) -> Location {
		Location::from_url(self.origin.clone(), &self.current_url())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const ORIGIN: &str = "http://localhost:5173";

	#[rstest]
	#[case("/somepath/example?key=123", "/somepath/example", "?key=123")]
	#[case("/newpath?", "/newpath", "")]
	#[case("/", "/", "")]
	#[case("?key=change", "/", "?key=change")]
	fn test_location_from_url(#[case] url: &str, #[case] pathname: &str, #[case] search: &str) {
		// Act
		let location = Location::from_url(ORIGIN, url);

		// Assert
		assert_eq!(location.pathname, pathname);
		assert_eq!(location.search, search);
		assert_eq!(location.origin, ORIGIN);
	}

	#[rstest]
	fn test_memory_history_push_and_back() {
		// Arrange
		let history = MemoryHistory::new(ORIGIN, "/");

		// Act
		history.push(&HistoryEntry::new("/a", "main")).unwrap();
		history.push(&HistoryEntry::new("/b?x=1", "#app")).unwrap();

		// Assert
		assert_eq!(history.len(), 3);
		assert_eq!(history.location().slug(), "/b?x=1");
		assert!(history.back());
		assert_eq!(history.location().pathname, "/a");
		assert_eq!(history.current_state().unwrap().target, "main");
		assert!(history.back());
		assert!(history.current_state().is_none());
		assert!(!history.back());
	}

	#[rstest]
	fn test_memory_history_push_discards_forward_entries() {
		// Arrange
		let history = MemoryHistory::new(ORIGIN, "/");
		history.push(&HistoryEntry::new("/a", "main")).unwrap();
		history.push(&HistoryEntry::new("/b", "main")).unwrap();
		history.back();

		// Act
		history.push(&HistoryEntry::new("/c", "main")).unwrap();

		// Assert
		assert_eq!(history.len(), 3);
		assert!(!history.forward());
		assert_eq!(history.current_url(), "/c");
	}

	#[rstest]
	fn test_memory_history_replace_keeps_length() {
		// Arrange
		let history = MemoryHistory::new(ORIGIN, "/start");

		// Act
		history.replace(&HistoryEntry::new("/other", "main")).unwrap();

		// Assert
		assert_eq!(history.len(), 1);
		assert_eq!(history.location().pathname, "/other");
		assert_eq!(history.position(), 0);
	}

	#[rstest]
	fn test_history_entry_serde_round_trip() {
		// Arrange
		let entry = HistoryEntry::new("/view/aaron", "#app");

		// Act
		let json = serde_json::to_string(&entry).unwrap();

		// Assert
		assert_eq!(json, r##"{"url":"/view/aaron","target":"#app"}"##);
		assert_eq!(serde_json::from_str::<HistoryEntry>(&json).unwrap(), entry);
	}
}
