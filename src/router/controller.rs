//! The navigation controller.
//!
//! [`Router`] ties the pieces together: it writes history, commits the
//! navigation state, resolves the committed path against the declared views
//! and queues the materialization of the match.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::history::{History, HistoryEntry, Location};
use super::link::{LinkAction, classify_link};
use super::path::{ParamMap, ParsedPath, drop_trailing_slash, parse_path, split_slug};
use super::query::{QueryMap, decode_query, encode_query};
use super::resolver::{Resolution, resolve};
use super::state::{NavigationSnapshot, NavigationState, RouteId, SubscriptionId};
use super::tasks::TaskQueue;
use super::views::{ViewDeclaration, ViewRegistry};
use crate::config::RouterConfig;
use crate::error::{NavigationError, NavigationResult};
use crate::render::{
	Binder, HttpFetcher, MountRegistry, MountRoot, NoopBinder, Rebind, TemplateFetcher,
	ViewMaterializer,
};

type ErrorHandler = Rc<dyn Fn(&NavigationError)>;

/// How a navigation touches the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigationType {
	Push,
	Replace,
}

struct RouterInner {
	config: RouterConfig,
	state: NavigationState,
	views: Rc<RefCell<ViewRegistry>>,
	materializer: ViewMaterializer,
	history: Rc<dyn History>,
	tasks: TaskQueue,
	target: RefCell<String>,
	error_handlers: RefCell<Vec<ErrorHandler>>,
}

/// Client-side router.
///
/// Cloning is cheap; every clone drives the same navigation state.
#[derive(Clone)]
pub struct Router {
	inner: Rc<RouterInner>,
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("state", &self.inner.state)
			.field("views", &self.inner.views.borrow().len())
			.field("target", &*self.inner.target.borrow())
			.field("tasks", &self.inner.tasks)
			.finish()
	}
}

impl Router {
	/// Starts building a router.
	pub fn builder(config: RouterConfig) -> RouterBuilder {
		RouterBuilder::new(config)
	}

	/// Boots the router on the current location.
	///
	/// The view declared for the root or for the first path segment (the
	/// longest key wins) is rendered into the default target first, so the
	/// mount target of a deeper view exists before the location is
	/// navigated to. A failing base view is reported and boot goes on.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::History`] when the initial navigation
	/// cannot be written.
	pub async fn start(&self) -> NavigationResult<()> {
		let location = self.inner.history.location();
		let pathname = drop_trailing_slash(&location.pathname).to_string();

		let base = self
			.inner
			.views
			.borrow()
			.base_view(&pathname)
			.map(|view| view.key().to_string());
		if let Some(key) = base {
			let rebind = if self.inner.config.rebind_on_boot {
				Rebind::Bind
			} else {
				Rebind::Skip
			};
			tracing::debug!(view = %key, "rendering base view");
			if let Err(e) = self
				.inner
				.materializer
				.materialize(&key, &self.inner.config.default_target, rebind)
				.await
			{
				self.report(&e);
			}
		}

		self.push(&format!("{}{}", pathname, location.search))?;
		Ok(())
	}

	/// Navigates to `slug`, a path with an optional query string.
	///
	/// `name:value` segments become parameters; the address bar shows the
	/// value path.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::History`] when history refuses the entry.
	pub fn push(&self, slug: &str) -> NavigationResult<&Self> {
		self.navigate(slug, None, NavigationType::Push)
	}

	/// Navigates to `slug` with `query` replacing any query in the slug.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::History`] when history refuses the entry.
	pub fn push_with_query(&self, slug: &str, query: &QueryMap) -> NavigationResult<&Self> {
		self.navigate(slug, Some(query), NavigationType::Push)
	}

	/// Navigates to `slug` by replacing the current history entry.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::History`] when history refuses the entry.
	pub fn replace(&self, slug: &str) -> NavigationResult<&Self> {
		self.navigate(slug, None, NavigationType::Replace)
	}

	fn navigate(
		&self,
		slug: &str,
		query: Option<&QueryMap>,
		nav_type: NavigationType,
	) -> NavigationResult<&Self> {
		let (path, embedded) = split_slug(slug);
		let parsed = parse_path(path);
		let search = match (query, embedded) {
			(Some(query), _) => encode_query(query),
			(None, Some(embedded)) if !embedded.is_empty() => format!("?{}", embedded),
			(None, _) => String::new(),
		};

		let entry = HistoryEntry::new(
			format!("{}{}", parsed.value_path, search),
			self.current_target(),
		);
		match nav_type {
			NavigationType::Push => self.inner.history.push(&entry)?,
			NavigationType::Replace => self.inner.history.replace(&entry)?,
		}
		tracing::debug!(url = %entry.url, selector = %entry.target, ?nav_type, "navigated");

		let location = self.inner.history.location();
		self.commit(&location, parsed, entry);
		Ok(self)
	}

	/// Re-derives the state after the browser restored a history entry.
	///
	/// `entry` is the state of the restored entry, `None` for entries the
	/// router did not create. The active target is reset to the default and
	/// the view renders into the restored entry's target. History is never
	/// written; a path that only best-matches a view is bound to that view
	/// directly.
	pub fn handle_popstate(&self, entry: Option<HistoryEntry>) {
		let default_target = self.inner.config.default_target.clone();
		self.set_target(default_target.clone());

		let location = self.inner.history.location();
		let mut parsed = parse_path(&location.pathname);
		let resolution = resolve(&self.inner.views.borrow(), &parsed.raw_path, &parsed.segments);
		if let Resolution::Fallback { candidate, .. } = resolution {
			tracing::debug!(path = %location.pathname, %candidate, "restored path best-matches a view");
			parsed = parse_path(&candidate);
		}

		let entry = entry.unwrap_or_else(|| HistoryEntry::new(location.slug(), default_target));
		self.commit(&location, parsed, entry);
	}

	fn commit(&self, location: &Location, parsed: ParsedPath, entry: HistoryEntry) {
		self.inner.state.commit(NavigationSnapshot {
			path: location.pathname.clone(),
			query: decode_query(&location.search),
			query_raw: location.search.clone(),
			params: parsed.params,
			segments: parsed.segments,
			raw_path: parsed.raw_path,
			origin: location.origin.clone(),
			last_entry: Some(entry),
		});
	}

	/// Handles activation of a link with the given `href`.
	///
	/// Links that stay on the current origin set the active target (the
	/// default when `target` is `None`) and navigate. Anything else is left
	/// to the browser.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::History`] when history refuses the entry.
	pub fn activate_link(&self, href: &str, target: Option<&str>) -> NavigationResult<LinkAction> {
		let action = classify_link(href, &self.inner.history.location());
		match &action {
			LinkAction::Navigate(slug) => {
				let target = target.unwrap_or(self.inner.config.default_target.as_str()).to_string();
				self.set_target(target);
				self.push(slug)?;
			}
			LinkAction::PassThrough => {
				tracing::debug!(href, "leaving link to the browser");
			}
		}
		Ok(action)
	}

	/// Registers a route activator and returns its handle.
	///
	/// Without a `target` the activator renders into the default target.
	pub fn register_route(&self, expression: impl Into<String>, target: Option<&str>) -> RouteId {
		let target = target.unwrap_or(self.inner.config.default_target.as_str());
		self.inner.state.register_route(expression, target)
	}

	/// Activates a registered route as if its link was clicked.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::UnknownRoute`] for a handle this router did
	/// not issue, or any error of [`Router::activate_link`].
	pub fn activate_route(&self, id: RouteId) -> NavigationResult<LinkAction> {
		let route = self.inner.state.route(id).ok_or_else(|| {
			tracing::warn!(route = %id, "activating unknown route");
			NavigationError::UnknownRoute(id)
		})?;
		self.activate_link(&route.expression, Some(&route.target))
	}

	/// Declares a view and returns its lookup key.
	///
	/// A view declared after a navigation (for instance by a [`Binder`] over
	/// injected content) renders at once when it is the current path's view,
	/// or when nothing matched the current path before.
	pub fn declare_view(&self, declaration: ViewDeclaration) -> String {
		let snapshot = self.snapshot();
		let unmatched_before = resolve(
			&self.inner.views.borrow(),
			&snapshot.raw_path,
			&snapshot.segments,
		) == Resolution::Unmatched;
		let key = self.inner.views.borrow_mut().declare(declaration);

		if snapshot.last_entry.is_some() && (key == snapshot.raw_path || unmatched_before) {
			tracing::debug!(view = %key, path = %snapshot.path, "re-resolving after declaration");
			self.on_commit(&snapshot);
		}
		key
	}

	/// Borrows the view registry.
	pub fn views(&self) -> Ref<'_, ViewRegistry> {
		self.inner.views.borrow()
	}

	/// Sets the target the next navigation renders into.
	pub fn set_target(&self, target: impl Into<String>) {
		*self.inner.target.borrow_mut() = target.into();
	}

	/// Returns the target the next navigation renders into.
	pub fn current_target(&self) -> String {
		self.inner.target.borrow().clone()
	}

	/// Attaches an encapsulated root owning the given targets.
	pub fn attach_root(&self, root: Rc<dyn MountRoot>, targets: &[&str]) {
		self.inner.materializer.mounts().attach_root(root, targets);
	}

	/// Detaches a root. Returns `false` if no root had that name.
	pub fn detach_root(&self, name: &str) -> bool {
		self.inner.materializer.mounts().detach_root(name)
	}

	/// Registers a handler for errors raised by queued work.
	pub fn on_error<F>(&self, handler: F)
	where
		F: Fn(&NavigationError) + 'static,
	{
		self.inner.error_handlers.borrow_mut().push(Rc::new(handler));
	}

	/// Registers an observer called after every committed navigation.
	pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
	where
		F: Fn(&NavigationSnapshot) + 'static,
	{
		self.inner.state.subscribe(observer)
	}

	/// Removes an observer.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.inner.state.unsubscribe(id)
	}

	/// Returns the navigation state.
	pub fn state(&self) -> &NavigationState {
		&self.inner.state
	}

	/// Returns the router configuration.
	pub fn config(&self) -> &RouterConfig {
		&self.inner.config
	}

	/// Runs all queued work, including work queued while running.
	///
	/// On wasm queued work is spawned on the browser's executor and this
	/// returns at once; elsewhere call this after navigating.
	pub async fn settle(&self) -> usize {
		self.inner.tasks.flush().await
	}

	/// Returns a copy of the current navigation state.
	pub fn snapshot(&self) -> NavigationSnapshot {
		self.inner.state.snapshot()
	}

	/// Current pathname.
	pub fn path(&self) -> String {
		self.inner.state.current().path.clone()
	}

	/// Decoded query of the current location.
	pub fn query(&self) -> QueryMap {
		self.inner.state.current().query.clone()
	}

	/// Query string of the current location, including `?`, or empty.
	pub fn query_raw(&self) -> String {
		self.inner.state.current().query_raw.clone()
	}

	/// Parameters of the current path.
	pub fn params(&self) -> ParamMap {
		self.inner.state.current().params.clone()
	}

	/// Current origin.
	pub fn origin(&self) -> String {
		self.inner.state.current().origin.clone()
	}

	/// Raw path the current view was looked up by.
	pub fn raw_path(&self) -> String {
		self.inner.state.current().raw_path.clone()
	}

	/// Segments of the current path.
	pub fn segments(&self) -> Vec<String> {
		self.inner.state.current().segments.clone()
	}

	/// Entry of the last navigation.
	pub fn last_entry(&self) -> Option<HistoryEntry> {
		self.inner.state.current().last_entry.clone()
	}

	fn report(&self, error: &NavigationError) {
		tracing::error!(error = %error, "navigation task failed");
		let handlers: Vec<ErrorHandler> = self.inner.error_handlers.borrow().clone();
		for handler in handlers {
			handler(error);
		}
	}

	fn from_weak(inner: &Weak<RouterInner>) -> Option<Self> {
		inner.upgrade().map(|inner| Self { inner })
	}

	/// Resolves a committed snapshot and queues what it asks for.
	fn on_commit(&self, snapshot: &NavigationSnapshot) {
		let resolution = resolve(
			&self.inner.views.borrow(),
			&snapshot.raw_path,
			&snapshot.segments,
		);

		match resolution {
			Resolution::Exact { key } => {
				let view_target = self
					.inner
					.views
					.borrow()
					.get(&key)
					.and_then(|view| view.target().map(str::to_string));
				let target = match view_target {
					Some(target) => {
						self.set_target(target.clone());
						target
					}
					None => snapshot
						.last_entry
						.as_ref()
						.map(|entry| entry.target.clone())
						.unwrap_or_else(|| self.inner.config.default_target.clone()),
				};
				self.schedule_render(key, target);
			}
			Resolution::Fallback { key, candidate } => {
				let slug = format!("{}{}", candidate, snapshot.query_raw);
				tracing::debug!(path = %snapshot.path, view = %key, %slug, "best-matched a view");
				let weak = Rc::downgrade(&self.inner);
				self.inner.tasks.schedule(async move {
					if let Some(router) = Router::from_weak(&weak) {
						if let Err(e) = router.push(&slug) {
							router.report(&e);
						}
					}
				});
			}
			Resolution::Unmatched => {
				tracing::debug!(raw_path = %snapshot.raw_path, "no view matches");
			}
		}
	}

	fn schedule_render(&self, key: String, target: String) {
		let generation = self.inner.state.generation();
		let weak = Rc::downgrade(&self.inner);
		self.inner.tasks.schedule(async move {
			if let Some(router) = Router::from_weak(&weak) {
				router.render_view(&key, &target, generation).await;
			}
		});
	}

	async fn render_view(&self, key: &str, target: &str, generation: u64) {
		let html = match self.inner.materializer.ensure_content(key).await {
			Ok(html) => html,
			Err(e) => {
				self.report(&e);
				return;
			}
		};

		// A newer navigation owns the mount now; the content stays cached.
		if self.inner.state.generation() != generation {
			tracing::debug!(view = key, "skipping superseded render");
			return;
		}
		self.inner.materializer.render(target, &html, Rebind::Bind);
	}
}

/// Builder for [`Router`].
///
/// History and the document root default to the browser's on wasm and must
/// be supplied elsewhere. The fetcher defaults to [`HttpFetcher`] resolving
/// against `template_base_url`, or the location origin when unset. The
/// binder defaults to [`NoopBinder`].
pub struct RouterBuilder {
	config: RouterConfig,
	history: Option<Rc<dyn History>>,
	fetcher: Option<Rc<dyn TemplateFetcher>>,
	document: Option<Rc<dyn MountRoot>>,
	binder: Option<Rc<dyn Binder>>,
}

impl fmt::Debug for RouterBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("config", &self.config)
			.field("history", &self.history.is_some())
			.field("fetcher", &self.fetcher.is_some())
			.field("document", &self.document.is_some())
			.field("binder", &self.binder.is_some())
			.finish()
	}
}

impl RouterBuilder {
	/// Creates a builder with the given configuration.
	pub fn new(config: RouterConfig) -> Self {
		Self {
			config,
			history: None,
			fetcher: None,
			document: None,
			binder: None,
		}
	}

	/// Sets the history backend.
	pub fn history(mut self, history: Rc<dyn History>) -> Self {
		self.history = Some(history);
		self
	}

	/// Sets the template fetcher.
	pub fn fetcher(mut self, fetcher: Rc<dyn TemplateFetcher>) -> Self {
		self.fetcher = Some(fetcher);
		self
	}

	/// Sets the primary document root.
	pub fn document(mut self, document: Rc<dyn MountRoot>) -> Self {
		self.document = Some(document);
		self
	}

	/// Sets the binder run over injected content.
	pub fn binder(mut self, binder: Rc<dyn Binder>) -> Self {
		self.binder = Some(binder);
		self
	}

	/// Builds the router.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::Unavailable`] when history or the document
	/// root was not supplied and no browser default exists.
	pub fn build(self) -> NavigationResult<Router> {
		let history = match self.history {
			Some(history) => history,
			None => default_history()?,
		};
		let document = match self.document {
			Some(document) => document,
			None => default_document()?,
		};
		let fetcher = self.fetcher.unwrap_or_else(|| {
			let base = self
				.config
				.template_base_url
				.clone()
				.unwrap_or_else(|| history.location().origin);
			Rc::new(HttpFetcher::with_base_url(base))
		});
		let binder = self.binder.unwrap_or_else(|| Rc::new(NoopBinder));

		let views = Rc::new(RefCell::new(ViewRegistry::new()));
		let materializer = ViewMaterializer::new(
			&self.config,
			Rc::clone(&views),
			Rc::new(MountRegistry::new(document)),
			fetcher,
			binder,
		);

		let inner = Rc::new(RouterInner {
			target: RefCell::new(self.config.default_target.clone()),
			config: self.config,
			state: NavigationState::new(),
			views,
			materializer,
			history,
			tasks: TaskQueue::new(),
			error_handlers: RefCell::new(Vec::new()),
		});

		let weak = Rc::downgrade(&inner);
		inner.state.subscribe(move |snapshot| {
			if let Some(router) = Router::from_weak(&weak) {
				router.on_commit(snapshot);
			}
		});

		Ok(Router { inner })
	}
}

#[cfg(target_arch = "wasm32")]
fn default_history() -> NavigationResult<Rc<dyn History>> {
	Ok(Rc::new(super::browser::BrowserHistory::current()?))
}

#[cfg(not(target_arch = "wasm32"))]
fn default_history() -> NavigationResult<Rc<dyn History>> {
	Err(NavigationError::Unavailable("history".to_string()))
}

#[cfg(target_arch = "wasm32")]
fn default_document() -> NavigationResult<Rc<dyn MountRoot>> {
	Ok(Rc::new(crate::render::DocumentRoot::current()?))
}

#[cfg(not(target_arch = "wasm32"))]
fn default_document() -> NavigationResult<Rc<dyn MountRoot>> {
	Err(NavigationError::Unavailable("document".to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::render::DOCUMENT_ROOT;
	use crate::router::MemoryHistory;
	use crate::testing::{MemoryRoot, RecordingBinder, StaticFetcher};
	use futures::FutureExt;
	use rstest::{fixture, rstest};
	use std::cell::Cell;

	const ORIGIN: &str = "http://localhost:5173";

	struct Harness {
		router: Router,
		history: Rc<MemoryHistory>,
		document: Rc<MemoryRoot>,
		binder: Rc<RecordingBinder>,
	}

	#[fixture]
	fn harness() -> Harness {
		let history = Rc::new(MemoryHistory::new(ORIGIN, "/"));
		let document = Rc::new(MemoryRoot::new(DOCUMENT_ROOT, &["main", "#app"]));
		let binder = Rc::new(RecordingBinder::new());
		let router = Router::builder(RouterConfig::default())
			.history(history.clone())
			.document(document.clone())
			.fetcher(Rc::new(
				StaticFetcher::new()
					.with("/remote.html", "<p>remote</p>")
					.stall("/slow.html"),
			))
			.binder(binder.clone())
			.build()
			.unwrap();
		Harness {
			router,
			history,
			document,
			binder,
		}
	}

	#[rstest]
	fn test_build_without_history_is_unavailable() {
		let result = Router::builder(RouterConfig::default()).build();
		assert_eq!(
			result.unwrap_err(),
			NavigationError::Unavailable("history".to_string())
		);
	}

	#[rstest]
	fn test_push_commits_location_and_parse(harness: Harness) {
		// Act
		harness.router.push("/product/id:42?tab=reviews").unwrap();

		// Assert
		let snapshot = harness.router.snapshot();
		assert_eq!(snapshot.path, "/product/42");
		assert_eq!(snapshot.raw_path, "/product/id");
		assert_eq!(snapshot.query_raw, "?tab=reviews");
		assert_eq!(snapshot.query.get("tab"), Some("reviews"));
		assert_eq!(snapshot.params.get("id").map(String::as_str), Some("42"));
		assert_eq!(snapshot.origin, ORIGIN);
		assert_eq!(
			snapshot.last_entry,
			Some(HistoryEntry::new("/product/42?tab=reviews", "main"))
		);
		assert_eq!(harness.history.len(), 2);
	}

	#[rstest]
	fn test_push_with_query_replaces_embedded_query(harness: Harness) {
		// Act
		harness
			.router
			.push_with_query("/list?old=1", &QueryMap::from([("x", "1")]))
			.unwrap();

		// Assert
		assert_eq!(harness.router.query_raw(), "?x=1");
		assert_eq!(harness.history.current_url(), "/list?x=1");
	}

	#[rstest]
	fn test_replace_does_not_grow_history(harness: Harness) {
		// Act
		harness.router.replace("/other").unwrap();

		// Assert
		assert_eq!(harness.history.len(), 1);
		assert_eq!(harness.router.path(), "/other");
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_exact_match_renders_into_last_entry_target(harness: Harness) {
		// Arrange
		harness
			.router
			.declare_view(ViewDeclaration::new("/view").content("<p>view</p>"));
		harness.router.set_target("#app");

		// Act
		harness.router.push("/view").unwrap();
		harness.router.settle().await;

		// Assert
		assert_eq!(harness.document.content("#app").as_deref(), Some("<p>view</p>"));
		assert!(harness.document.content("main").is_none());
		assert_eq!(harness.binder.bound().len(), 1);
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_view_target_overrides_entry_target(harness: Harness) {
		// Arrange
		harness.router.declare_view(
			ViewDeclaration::new("/view")
				.content("<p>view</p>")
				.target("#app"),
		);

		// Act
		harness.router.push("/view").unwrap();
		harness.router.settle().await;

		// Assert
		assert_eq!(harness.document.content("#app").as_deref(), Some("<p>view</p>"));
		assert_eq!(harness.router.current_target(), "#app");
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_fallback_pushes_reconstructed_slug_later(harness: Harness) {
		// Arrange
		harness
			.router
			.declare_view(ViewDeclaration::new("/product/:id").content("<p>product</p>"));

		// Act
		harness.router.push("/product/42?tab=a").unwrap();
		let raw_before_flush = harness.router.raw_path();
		harness.router.settle().await;

		// Assert
		assert_eq!(raw_before_flush, "/product/42");
		assert_eq!(harness.router.raw_path(), "/product/id");
		assert_eq!(harness.router.path(), "/product/42");
		assert_eq!(harness.router.query_raw(), "?tab=a");
		assert_eq!(harness.history.len(), 3);
		assert_eq!(harness.document.content("main").as_deref(), Some("<p>product</p>"));
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_unmatched_path_is_a_no_op(harness: Harness) {
		// Act
		harness.router.push("/nowhere/at/all").unwrap();
		let ran = harness.router.settle().await;

		// Assert
		assert_eq!(ran, 0);
		assert!(harness.document.content("main").is_none());
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_fetch_failure_reaches_error_handlers(harness: Harness) {
		// Arrange
		let failures = Rc::new(Cell::new(0));
		{
			let failures = Rc::clone(&failures);
			harness.router.on_error(move |_| failures.set(failures.get() + 1));
		}
		harness.router.declare_view(ViewDeclaration::new("/missing"));

		// Act
		harness.router.push("/missing").unwrap();
		harness.router.settle().await;

		// Assert
		assert_eq!(failures.get(), 1);
		assert!(harness.document.content("main").is_none());
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_superseded_render_is_skipped_but_cached(harness: Harness) {
		// Arrange
		harness.router.declare_view(ViewDeclaration::new("/remote"));
		harness
			.router
			.declare_view(ViewDeclaration::new("/local").content("<p>local</p>"));

		// Act
		harness.router.push("/remote").unwrap();
		harness.router.push("/local").unwrap();
		harness.router.settle().await;

		// Assert
		assert_eq!(harness.document.content("main").as_deref(), Some("<p>local</p>"));
		assert!(harness.router.views().get("/remote").unwrap().has_content());
		assert_eq!(harness.binder.bound().len(), 1);
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	fn test_in_flight_fetch_does_not_hold_back_newer_render(harness: Harness) {
		// Arrange
		harness.router.declare_view(ViewDeclaration::new("/slow"));
		harness
			.router
			.declare_view(ViewDeclaration::new("/local").content("<p>local</p>"));

		// Act
		harness.router.push("/slow").unwrap();
		harness.router.push("/local").unwrap();
		let settled = harness.router.settle().now_or_never();

		// Assert
		assert!(settled.is_none());
		assert_eq!(harness.document.content("main").as_deref(), Some("<p>local</p>"));
		assert!(!harness.router.views().get("/slow").unwrap().has_content());
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_fallback_that_cannot_exact_match_is_not_pushed(harness: Harness) {
		// Arrange
		let commits = Rc::new(Cell::new(0));
		{
			let commits = Rc::clone(&commits);
			harness.router.subscribe(move |_| commits.set(commits.get() + 1));
		}
		harness
			.router
			.declare_view(ViewDeclaration::new("/:").content("<p>broken</p>"));

		// Act
		harness.router.push("/x").unwrap();
		let ran = harness.router.settle().await;

		// Assert
		assert_eq!(ran, 0);
		assert_eq!(commits.get(), 1);
		assert_eq!(harness.history.len(), 2);
		assert_eq!(harness.router.raw_path(), "/x");
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_view_declared_after_navigation_renders(harness: Harness) {
		// Arrange
		harness.router.push("/shell/view").unwrap();
		harness.router.settle().await;

		// Act
		harness
			.router
			.declare_view(ViewDeclaration::new("/shell/view").content("<p>deep</p>"));
		harness.router.settle().await;

		// Assert
		assert_eq!(harness.document.content("main").as_deref(), Some("<p>deep</p>"));
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_view_declared_after_navigation_best_matches(harness: Harness) {
		// Arrange
		harness.router.push("/product/42").unwrap();
		harness.router.settle().await;

		// Act
		harness
			.router
			.declare_view(ViewDeclaration::new("/product/:id").content("<p>product</p>"));
		harness.router.settle().await;

		// Assert
		assert_eq!(harness.router.raw_path(), "/product/id");
		assert_eq!(harness.document.content("main").as_deref(), Some("<p>product</p>"));
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	fn test_declaring_unrelated_view_leaves_current_render(harness: Harness) {
		// Arrange
		harness
			.router
			.declare_view(ViewDeclaration::new("/a").content("<p>a</p>"));
		harness.router.push("/a").unwrap();

		// Act
		harness.router.declare_view(ViewDeclaration::new("/b").content("<p>b</p>"));

		// Assert
		assert_eq!(harness.router.inner.tasks.len(), 1);
	}

	#[rstest]
	fn test_declaring_before_navigation_queues_nothing(harness: Harness) {
		// Act
		harness.router.declare_view(ViewDeclaration::new("/").content("<p>home</p>"));

		// Assert
		assert!(harness.router.inner.tasks.is_empty());
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_popstate_renders_into_restored_target_without_pushing(harness: Harness) {
		// Arrange
		harness
			.router
			.declare_view(ViewDeclaration::new("/a").content("<p>a</p>"));
		harness
			.router
			.declare_view(ViewDeclaration::new("/b").content("<p>b</p>"));
		harness.router.set_target("#app");
		harness.router.push("/a").unwrap();
		harness.router.set_target("main");
		harness.router.push("/b").unwrap();
		harness.router.settle().await;
		harness.router.set_target("#app");

		// Act
		harness.history.back();
		harness.router.handle_popstate(harness.history.current_state());
		harness.router.settle().await;

		// Assert
		assert_eq!(harness.history.len(), 3);
		assert_eq!(harness.router.path(), "/a");
		assert_eq!(harness.router.current_target(), "main");
		assert_eq!(harness.document.content("#app").as_deref(), Some("<p>a</p>"));
		assert_eq!(harness.router.last_entry().unwrap().url, "/a");
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_popstate_binds_best_match_inline(harness: Harness) {
		// Arrange
		harness
			.router
			.declare_view(ViewDeclaration::new("/product/:id").content("<p>product</p>"));
		harness.router.push("/start").unwrap();
		harness.router.push("/product/id:7").unwrap();
		harness.router.push("/start").unwrap();
		harness.router.settle().await;
		harness.history.back();

		// Act
		harness.router.handle_popstate(None);
		harness.router.settle().await;

		// Assert
		assert_eq!(harness.router.raw_path(), "/product/id");
		assert_eq!(harness.router.params().get("id").map(String::as_str), Some("7"));
		assert_eq!(harness.history.len(), 4);
		assert_eq!(
			harness.router.last_entry(),
			Some(HistoryEntry::new("/product/7", "main"))
		);
	}

	#[rstest]
	#[case("/view", true)]
	#[case("view/name:aaron", true)]
	#[case("http://localhost:5173/view", true)]
	#[case("http://localhost:5173.evil.test/view", false)]
	#[case("https://example.com/", false)]
	fn test_activate_link_intercepts_same_origin_only(
		harness: Harness,
		#[case] href: &str,
		#[case] intercepted: bool,
	) {
		// Act
		let action = harness.router.activate_link(href, Some("#app")).unwrap();

		// Assert
		assert_eq!(action.is_intercepted(), intercepted);
		assert_eq!(harness.history.len(), if intercepted { 2 } else { 1 });
	}

	#[rstest]
	fn test_activate_route_uses_route_target(harness: Harness) {
		// Arrange
		let id = harness.router.register_route("/view/name:aaron", Some("#app"));

		// Act
		let action = harness.router.activate_route(id).unwrap();

		// Assert
		assert_eq!(action, LinkAction::Navigate("/view/name:aaron".to_string()));
		assert_eq!(harness.router.path(), "/view/aaron");
		assert_eq!(harness.router.last_entry().unwrap().target, "#app");
	}

	#[rstest]
	fn test_activate_unknown_route(harness: Harness) {
		let result = harness.router.activate_route(RouteId::new(9));
		assert_eq!(result, Err(NavigationError::UnknownRoute(RouteId::new(9))));
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	#[tokio::test]
	async fn test_start_renders_base_view_then_navigates() {
		// Arrange
		let history = Rc::new(MemoryHistory::new(ORIGIN, "/remote/item/?x=1"));
		let document = Rc::new(MemoryRoot::new(DOCUMENT_ROOT, &["main"]));
		let binder = Rc::new(RecordingBinder::new());
		let router = Router::builder(RouterConfig::default())
			.history(history.clone())
			.document(document.clone())
			.fetcher(Rc::new(StaticFetcher::new().with("/remote.html", "<p>remote</p>")))
			.binder(binder.clone())
			.build()
			.unwrap();
		router.declare_view(ViewDeclaration::new("/").content("<p>root</p>"));
		router.declare_view(ViewDeclaration::new("/remote"));

		// Act
		router.start().await.unwrap();

		// Assert
		assert_eq!(document.content("main").as_deref(), Some("<p>remote</p>"));
		assert!(binder.bound().is_empty());
		assert_eq!(router.path(), "/remote/item");
		assert_eq!(router.query_raw(), "?x=1");
		assert_eq!(history.len(), 2);
	}
}
