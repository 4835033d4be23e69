//! Remote template fetching.

use async_trait::async_trait;

use crate::error::FetchError;

/// Fetches template text by URL.
#[async_trait(?Send)]
pub trait TemplateFetcher {
	/// Fetches the body of `url`.
	///
	/// # Errors
	///
	/// Returns [`FetchError::Status`] for non-success responses and
	/// [`FetchError::Transport`] when no response was received.
	async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`TemplateFetcher`] backed by `reqwest`.
///
/// Relative URLs are resolved against the base URL when one is set. In the
/// browser the base is usually the location origin.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
	client: reqwest::Client,
	base_url: Option<String>,
}

impl HttpFetcher {
	/// Creates a fetcher without a base URL.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a fetcher resolving relative URLs against `base_url`.
	pub fn with_base_url(base_url: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			base_url: Some(base_url.into()),
		}
	}

	/// Resolves `url` against the base URL.
	pub fn resolve(&self, url: &str) -> String {
		match &self.base_url {
			Some(base) if url.starts_with('/') => {
				format!("{}{}", base.trim_end_matches('/'), url)
			}
			_ => url.to_string(),
		}
	}
}

#[async_trait(?Send)]
impl TemplateFetcher for HttpFetcher {
	async fn fetch(&self, url: &str) -> Result<String, FetchError> {
		let resolved = self.resolve(url);
		let transport = |e: reqwest::Error| FetchError::Transport {
			url: resolved.clone(),
			message: e.to_string(),
		};

		let response = self.client.get(&resolved).send().await.map_err(transport)?;
		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status {
				url: resolved.clone(),
				status: status.as_u16(),
			});
		}
		response.text().await.map_err(transport)
	}
}
