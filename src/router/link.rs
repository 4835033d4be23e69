//! Classification of activated links.

use url::Url;

use super::history::Location;

/// What to do with an activated link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
	/// Handled by the router: navigate to this slug.
	Navigate(String),
	/// Left to the browser's default navigation.
	PassThrough,
}

impl LinkAction {
	/// Returns whether the router handles the link.
	pub fn is_intercepted(&self) -> bool {
		matches!(self, Self::Navigate(_))
	}
}

/// Decides whether a link stays inside the application.
///
/// Root-relative hrefs are routed as written. Everything else is resolved
/// against the current location and routed only when its origin equals the
/// current origin, so `http://localhost:5173.example.com` is not mistaken
/// for `http://localhost:5173`.
///
/// ```
/// use reinhardt_navigation::router::{LinkAction, Location, classify_link};
///
/// let here = Location::from_url("http://localhost:5173", "/router");
/// assert_eq!(classify_link("/view", &here), LinkAction::Navigate("/view".into()));
/// assert_eq!(classify_link("https://example.com/", &here), LinkAction::PassThrough);
/// ```
pub fn classify_link(href: &str, location: &Location) -> LinkAction {
	if href.starts_with('/') && !href.starts_with("//") {
		return LinkAction::Navigate(href.to_string());
	}

	let base = match Url::parse(&format!("{}{}", location.origin, location.pathname)) {
		Ok(base) => base,
		Err(e) => {
			tracing::warn!(origin = %location.origin, error = %e, "cannot resolve links against current location");
			return LinkAction::PassThrough;
		}
	};

	match base.join(href) {
		Ok(resolved) if resolved.origin() == base.origin() => {
			let mut slug = resolved.path().to_string();
			if let Some(query) = resolved.query() {
				slug.push('?');
				slug.push_str(query);
			}
			LinkAction::Navigate(slug)
		}
		Ok(_) => LinkAction::PassThrough,
		Err(e) => {
			tracing::warn!(href, error = %e, "leaving unparsable link to the browser");
			LinkAction::PassThrough
		}
	}
}
