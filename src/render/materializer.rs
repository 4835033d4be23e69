//! Turning a resolved view into mounted content.

use std::cell::RefCell;
use std::rc::Rc;

use super::fetch::TemplateFetcher;
use super::mount::{Binder, MountRegistry, MountedSubtree};
use crate::config::RouterConfig;
use crate::error::{NavigationError, NavigationResult};
use crate::router::ViewRegistry;

/// Whether injected content is re-bound by the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rebind {
	/// Bind the injected subtree.
	#[default]
	Bind,
	/// Skip binding; a broader pass follows, as on boot.
	Skip,
}

/// Loads view templates and injects them into mount targets.
pub struct ViewMaterializer {
	views: Rc<RefCell<ViewRegistry>>,
	mounts: Rc<MountRegistry>,
	fetcher: Rc<dyn TemplateFetcher>,
	binder: Rc<dyn Binder>,
	config: RouterConfig,
}

impl std::fmt::Debug for ViewMaterializer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewMaterializer")
			.field("mounts", &self.mounts)
			.field("template_suffix", &self.config.template_suffix)
			.finish()
	}
}

impl ViewMaterializer {
	/// Creates a materializer.
	pub fn new(
		config: &RouterConfig,
		views: Rc<RefCell<ViewRegistry>>,
		mounts: Rc<MountRegistry>,
		fetcher: Rc<dyn TemplateFetcher>,
		binder: Rc<dyn Binder>,
	) -> Self {
		Self {
			views,
			mounts,
			fetcher,
			binder,
			config: config.clone(),
		}
	}

	/// Returns the mount registry.
	pub fn mounts(&self) -> &Rc<MountRegistry> {
		&self.mounts
	}

	/// Ensures the view's content is available and renders it into `target`.
	///
	/// Returns the mounted subtree, or `None` when no element matches
	/// `target`.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::UnknownView`] for an undeclared key and
	/// [`NavigationError::RemoteFetch`] when the template cannot be fetched;
	/// the mount is left untouched in both cases.
	pub async fn materialize(
		&self,
		key: &str,
		target: &str,
		rebind: Rebind,
	) -> NavigationResult<Option<MountedSubtree>> {
		let html = self.ensure_content(key).await?;
		Ok(self.render(target, &html, rebind))
	}

	/// Returns the view's content, fetching and caching it when missing.
	pub async fn ensure_content(&self, key: &str) -> NavigationResult<String> {
		let source = {
			let views = self.views.borrow();
			let view = views
				.get(key)
				.ok_or_else(|| NavigationError::UnknownView(key.to_string()))?;
			if let Some(content) = view.content() {
				return Ok(content.to_string());
			}
			view.source().to_string()
		};

		let url = self.config.template_url(&source);
		tracing::debug!(view = key, url = %url, "fetching remote template");
		let html = self.fetcher.fetch(&url).await?;
		self.views.borrow_mut().store_content(key, html.clone());
		Ok(html)
	}

	/// Injects `html` into `target` and binds it unless told otherwise.
	pub fn render(&self, target: &str, html: &str, rebind: Rebind) -> Option<MountedSubtree> {
		let mounted = self.mounts.inject(target, html);
		match &mounted {
			Some(subtree) => {
				if rebind == Rebind::Bind {
					self.binder.bind(subtree);
				}
			}
			None => tracing::debug!(selector = target, "no element matches mount target"),
		}
		mounted
	}
}
