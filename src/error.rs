//! Error types for client-side navigation.

use thiserror::Error;

use crate::router::RouteId;

/// Result type for navigation operations.
pub type NavigationResult<T> = Result<T, NavigationError>;

/// Failure while fetching remote template content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// The server answered with a non-success status.
	#[error("template request to {url} failed with status {status}")]
	Status {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},

	/// The request never produced a response.
	#[error("template request to {url} failed: {message}")]
	Transport {
		/// Requested URL.
		url: String,
		/// Underlying transport error message.
		message: String,
	},
}

impl FetchError {
	/// Returns the URL of the failed request.
	pub fn url(&self) -> &str {
		match self {
			Self::Status { url, .. } | Self::Transport { url, .. } => url,
		}
	}
}

/// Navigation errors.
///
/// None of these are fatal to the host page. Unmatched paths and malformed
/// parameter segments are not errors at all: the former render nothing, the
/// latter are parsed permissively.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NavigationError {
	/// Remote template content could not be fetched.
	#[error(transparent)]
	RemoteFetch(#[from] FetchError),

	/// The history backend refused a state update.
	#[error("history update failed: {0}")]
	History(String),

	/// A route handle that was never registered.
	#[error("unknown route handle: {0}")]
	UnknownRoute(RouteId),

	/// A view key that was never declared.
	#[error("unknown view: {0}")]
	UnknownView(String),

	/// A required browser API is not available.
	#[error("browser API unavailable: {0}")]
	Unavailable(String),
}
