//! Router configuration.

use serde::{Deserialize, Serialize};

/// Selector used when neither the activator nor the view names a target.
pub const DEFAULT_TARGET: &str = "main";

/// Suffix appended to a view's source when its template is fetched remotely.
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".html";

/// Configuration for a [`Router`](crate::Router).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use reinhardt_navigation::RouterConfig;
///
/// let config = RouterConfig::from_json(r##"{ "default_target": "#app" }"##).unwrap();
/// assert_eq!(config.default_target, "#app");
/// assert_eq!(config.template_suffix, ".html");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// Mount target selector used when nothing else is specified.
	pub default_target: String,

	/// Suffix appended to a view source to build its template URL.
	pub template_suffix: String,

	/// Base URL that relative template URLs are resolved against.
	///
	/// Required by [`HttpFetcher`](crate::render::HttpFetcher) outside the
	/// browser, where there is no document URL to resolve against.
	pub template_base_url: Option<String>,

	/// Whether the boot-time base view triggers a re-binding pass.
	pub rebind_on_boot: bool,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			default_target: DEFAULT_TARGET.to_string(),
			template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
			template_base_url: None,
			rebind_on_boot: false,
		}
	}
}

impl RouterConfig {
	/// Creates a new RouterConfig with default values.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a configuration from JSON, filling missing fields with defaults.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Sets the default mount target.
	pub fn default_target(mut self, target: impl Into<String>) -> Self {
		self.default_target = target.into();
		self
	}

	/// Sets the template URL suffix.
	pub fn template_suffix(mut self, suffix: impl Into<String>) -> Self {
		self.template_suffix = suffix.into();
		self
	}

	/// Sets the base URL for remote templates.
	pub fn template_base_url(mut self, base: impl Into<String>) -> Self {
		self.template_base_url = Some(base.into());
		self
	}

	/// Sets whether the boot render re-binds its subtree.
	pub fn rebind_on_boot(mut self, rebind: bool) -> Self {
		self.rebind_on_boot = rebind;
		self
	}

	/// Builds the URL a view's template is fetched from.
	pub fn template_url(&self, source: &str) -> String {
		format!("{}{}", source, self.template_suffix)
	}
}
