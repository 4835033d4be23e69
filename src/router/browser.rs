//! Browser bindings for the router.
//!
//! [`BrowserHistory`] stores a serialised [`HistoryEntry`] as the state of
//! every entry it creates. [`listen_popstate`] and [`intercept_links`]
//! install page-lifetime listeners on the window and document.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, MouseEvent, PopStateEvent};

use super::controller::Router;
use super::history::{History, HistoryEntry, Location};
use crate::error::{NavigationError, NavigationResult};

/// Attribute naming the mount target of a link.
pub const TARGET_ATTRIBUTE: &str = "data-target";

/// [`History`] backed by `window.history`.
#[derive(Debug, Clone)]
pub struct BrowserHistory {
	window: web_sys::Window,
	history: web_sys::History,
}

impl BrowserHistory {
	/// Wraps the current window's history.
	pub fn current() -> NavigationResult<Self> {
		let window =
			web_sys::window().ok_or_else(|| NavigationError::Unavailable("window".to_string()))?;
		let history = window
			.history()
			.map_err(|_| NavigationError::Unavailable("history".to_string()))?;
		Ok(Self { window, history })
	}

	fn state_value(entry: &HistoryEntry) -> NavigationResult<JsValue> {
		let json = serde_json::to_string(entry)
			.map_err(|e| NavigationError::History(format!("cannot serialise entry: {}", e)))?;
		js_sys::JSON::parse(&json)
			.map_err(|e| NavigationError::History(format!("cannot build state: {:?}", e)))
	}
}

impl History for BrowserHistory {
	fn push(&self, entry: &HistoryEntry) -> NavigationResult<()> {
		let state = Self::state_value(entry)?;
		self.history
			.push_state_with_url(&state, "", Some(&entry.url))
			.map_err(|e| NavigationError::History(format!("pushState failed: {:?}", e)))
	}

	fn replace(&self, entry: &HistoryEntry) -> NavigationResult<()> {
		let state = Self::state_value(entry)?;
		self.history
			.replace_state_with_url(&state, "", Some(&entry.url))
			.map_err(|e| NavigationError::History(format!("replaceState failed: {:?}", e)))
	}

	fn location(&self) -> Location {
		let location = self.window.location();
		Location {
			pathname: location.pathname().unwrap_or_else(|_| "/".to_string()),
			search: location.search().unwrap_or_default(),
			origin: location.origin().unwrap_or_default(),
		}
	}
}

/// Reads the [`HistoryEntry`] stored in a popstate event, if any.
pub fn entry_from_state(state: &JsValue) -> Option<HistoryEntry> {
	if state.is_null() || state.is_undefined() {
		return None;
	}
	let json = js_sys::JSON::stringify(state).ok()?.as_string()?;
	match serde_json::from_str(&json) {
		Ok(entry) => Some(entry),
		Err(e) => {
			tracing::debug!(error = %e, "ignoring foreign history state");
			None
		}
	}
}

/// Routes back/forward navigation through `router` for the page lifetime.
pub fn listen_popstate(router: &Router) -> NavigationResult<()> {
	let window =
		web_sys::window().ok_or_else(|| NavigationError::Unavailable("window".to_string()))?;
	let router = router.clone();
	let handler = Closure::wrap(Box::new(move |event: Event| {
		let entry = event
			.dyn_ref::<PopStateEvent>()
			.and_then(|event| entry_from_state(&event.state()));
		router.handle_popstate(entry);
	}) as Box<dyn FnMut(_)>);

	window
		.add_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref())
		.map_err(|_| NavigationError::Unavailable("popstate listener".to_string()))?;
	handler.forget();
	Ok(())
}

/// Intercepts clicks on `a[href]` elements anywhere in the document.
///
/// The link's [`TARGET_ATTRIBUTE`] names its mount target. Modified clicks
/// and links the router passes through keep the browser's behaviour.
pub fn intercept_links(router: &Router) -> NavigationResult<()> {
	let document = web_sys::window()
		.and_then(|window| window.document())
		.ok_or_else(|| NavigationError::Unavailable("document".to_string()))?;
	let router = router.clone();
	let handler = Closure::wrap(Box::new(move |event: Event| {
		if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
			if mouse.button() != 0 || mouse.ctrl_key() || mouse.meta_key() || mouse.shift_key() {
				return;
			}
		}
		let link = event
			.target()
			.and_then(|target| target.dyn_into::<Element>().ok())
			.and_then(|element| element.closest("a[href]").ok().flatten());
		let Some(link) = link else {
			return;
		};
		let Some(href) = link.get_attribute("href") else {
			return;
		};
		let target = link.get_attribute(TARGET_ATTRIBUTE);
		match router.activate_link(&href, target.as_deref()) {
			Ok(action) if action.is_intercepted() => event.prevent_default(),
			Ok(_) => {}
			Err(e) => {
				event.prevent_default();
				tracing::error!(href = %href, error = %e, "link navigation failed");
			}
		}
	}) as Box<dyn FnMut(_)>);

	document
		.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
		.map_err(|_| NavigationError::Unavailable("click listener".to_string()))?;
	handler.forget();
	Ok(())
}

impl Router {
	/// Builds a router on the browser's history and document and installs
	/// the popstate and link listeners.
	///
	/// Declare views, then call [`Router::start`].
	///
	/// # Errors
	///
	/// Returns [`NavigationError::Unavailable`] outside a browser page.
	pub fn browser(config: crate::RouterConfig) -> NavigationResult<Self> {
		let router = Router::builder(config).build()?;
		listen_popstate(&router)?;
		intercept_links(&router)?;
		Ok(router)
	}
}
