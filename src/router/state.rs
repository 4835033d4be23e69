//! Observable navigation state.
//!
//! The state is replaced wholesale on every commit and observers are
//! notified synchronously afterwards, so an observer always reads the state
//! of the commit that woke it. Only the controller commits.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use super::history::HistoryEntry;
use super::path::ParamMap;
use super::query::QueryMap;

/// Handle of a registered route activator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteId(usize);

impl RouteId {
	/// Creates a handle from its index.
	pub fn new(index: usize) -> Self {
		Self(index)
	}

	/// Returns the index of the handle.
	pub fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for RouteId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// A registered route activator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
	/// Handle returned at registration.
	pub id: RouteId,
	/// Path expression the activator navigates to.
	pub expression: String,
	/// Mount target the navigation renders into.
	pub target: String,
}

/// One consistent view of the navigation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationSnapshot {
	/// Current pathname, as read back from the location.
	pub path: String,
	/// Decoded query.
	pub query: QueryMap,
	/// Query string including `?`, or empty.
	pub query_raw: String,
	/// Parameters of the last parsed path.
	pub params: ParamMap,
	/// Segments of the value path.
	pub segments: Vec<String>,
	/// Raw path used as the view lookup key.
	pub raw_path: String,
	/// Current origin.
	pub origin: String,
	/// Entry of the last navigation.
	pub last_entry: Option<HistoryEntry>,
}

/// Handle returned by [`NavigationState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Rc<dyn Fn(&NavigationSnapshot)>;

/// The navigation state of one router.
#[derive(Default)]
pub struct NavigationState {
	current: RefCell<NavigationSnapshot>,
	routes: RefCell<Vec<RouteDescriptor>>,
	observers: RefCell<Vec<(SubscriptionId, Observer)>>,
	next_subscription: Cell<u64>,
	generation: Cell<u64>,
}

impl fmt::Debug for NavigationState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavigationState")
			.field("current", &*self.current.borrow())
			.field("routes", &self.routes.borrow().len())
			.field("observers", &self.observers.borrow().len())
			.field("generation", &self.generation.get())
			.finish()
	}
}

impl NavigationState {
	/// Creates an empty state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Borrows the current snapshot.
	///
	/// Do not hold the borrow across a navigation.
	pub fn current(&self) -> Ref<'_, NavigationSnapshot> {
		self.current.borrow()
	}

	/// Returns a copy of the current snapshot.
	pub fn snapshot(&self) -> NavigationSnapshot {
		self.current.borrow().clone()
	}

	/// Returns the number of commits so far.
	pub fn generation(&self) -> u64 {
		self.generation.get()
	}

	/// Returns the registered routes.
	pub fn routes(&self) -> Vec<RouteDescriptor> {
		self.routes.borrow().clone()
	}

	/// Returns a registered route.
	pub fn route(&self, id: RouteId) -> Option<RouteDescriptor> {
		self.routes.borrow().get(id.index()).cloned()
	}

	/// Registers an observer called after every commit.
	pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
	where
		F: Fn(&NavigationSnapshot) + 'static,
	{
		let id = SubscriptionId(self.next_subscription.get());
		self.next_subscription.set(id.0 + 1);
		self.observers.borrow_mut().push((id, Rc::new(observer)));
		id
	}

	/// Removes an observer. Returns `false` if it was not registered.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut observers = self.observers.borrow_mut();
		let before = observers.len();
		observers.retain(|(sub, _)| *sub != id);
		observers.len() != before
	}

	pub(crate) fn register_route(
		&self,
		expression: impl Into<String>,
		target: impl Into<String>,
	) -> RouteId {
		let mut routes = self.routes.borrow_mut();
		let id = RouteId::new(routes.len());
		routes.push(RouteDescriptor {
			id,
			expression: expression.into(),
			target: target.into(),
		});
		id
	}

	/// Replaces the snapshot and notifies observers.
	pub(crate) fn commit(&self, snapshot: NavigationSnapshot) {
		*self.current.borrow_mut() = snapshot;
		self.generation.set(self.generation.get() + 1);

		// Observers may subscribe or unsubscribe while being notified.
		let observers: Vec<Observer> = self
			.observers
			.borrow()
			.iter()
			.map(|(_, observer)| Rc::clone(observer))
			.collect();
		let snapshot = self.snapshot();
		for observer in observers {
			observer(&snapshot);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn snapshot_at(path: &str) -> NavigationSnapshot {
		NavigationSnapshot {
			path: path.to_string(),
			raw_path: path.to_string(),
			..Default::default()
		}
	}

	#[rstest]
	fn test_commit_notifies_with_latest_snapshot() {
		// Arrange
		let state = NavigationState::new();
		let seen = Rc::new(RefCell::new(Vec::new()));
		{
			let seen = Rc::clone(&seen);
			state.subscribe(move |snapshot| seen.borrow_mut().push(snapshot.path.clone()));
		}

		// Act
		state.commit(snapshot_at("/a"));
		state.commit(snapshot_at("/b"));

		// Assert
		assert_eq!(*seen.borrow(), vec!["/a", "/b"]);
		assert_eq!(state.current().path, "/b");
		assert_eq!(state.generation(), 2);
	}

	#[rstest]
	fn test_unsubscribe_stops_notifications() {
		// Arrange
		let state = NavigationState::new();
		let calls = Rc::new(Cell::new(0));
		let id = {
			let calls = Rc::clone(&calls);
			state.subscribe(move |_| calls.set(calls.get() + 1))
		};
		state.commit(snapshot_at("/a"));

		// Act
		let removed = state.unsubscribe(id);
		state.commit(snapshot_at("/b"));

		// Assert
		assert!(removed);
		assert!(!state.unsubscribe(id));
		assert_eq!(calls.get(), 1);
	}

	#[rstest]
	fn test_observer_can_read_state_during_commit() {
		// Arrange
		let state = Rc::new(NavigationState::new());
		let read_back = Rc::new(RefCell::new(String::new()));
		{
			let weak = Rc::downgrade(&state);
			let read_back = Rc::clone(&read_back);
			state.subscribe(move |_| {
				if let Some(state) = weak.upgrade() {
					*read_back.borrow_mut() = state.current().raw_path.clone();
				}
			});
		}

		// Act
		state.commit(snapshot_at("/view"));

		// Assert
		assert_eq!(*read_back.borrow(), "/view");
	}

	#[rstest]
	fn test_routes_only_grow() {
		// Arrange
		let state = NavigationState::new();

		// Act
		let first = state.register_route("/view", "main");
		let second = state.register_route("/view/name:aaron", "#app");

		// Assert
		assert_eq!(first, RouteId::new(0));
		assert_eq!(second.to_string(), "#1");
		assert_eq!(state.routes().len(), 2);
		assert_eq!(state.route(second).unwrap().target, "#app");
		assert!(state.route(RouteId::new(5)).is_none());
	}
}
