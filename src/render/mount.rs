//! Mount targets and the roots that own them.
//!
//! View content is injected into the element matching a target selector.
//! The primary document is searched first; targets living inside
//! encapsulated roots (shadow roots of custom components) are found through
//! the registry, which roots join when created and leave when destroyed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Name of the primary document root.
pub const DOCUMENT_ROOT: &str = "document";

/// A tree that mount targets can live in.
pub trait MountRoot {
	/// Name the root is registered under.
	fn name(&self) -> &str;

	/// Replaces the content of the element matching `selector`.
	///
	/// Returns `false` when no element matches.
	fn inject(&self, selector: &str, html: &str) -> bool;
}

/// The element content was injected into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedSubtree {
	/// Name of the owning root.
	pub root: String,
	/// Selector of the element.
	pub selector: String,
}

/// Re-initialises declarative behaviour over injected content.
pub trait Binder {
	/// Binds the subtree content was just injected into.
	fn bind(&self, subtree: &MountedSubtree);
}

/// Binder that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBinder;

impl Binder for NoopBinder {
	fn bind(&self, _subtree: &MountedSubtree) {}
}

/// Primary document plus the encapsulated roots attached to it.
pub struct MountRegistry {
	document: Rc<dyn MountRoot>,
	roots: RefCell<Vec<Rc<dyn MountRoot>>>,
	owners: RefCell<HashMap<String, String>>,
}

impl fmt::Debug for MountRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MountRegistry")
			.field("document", &self.document.name())
			.field(
				"roots",
				&self
					.roots
					.borrow()
					.iter()
					.map(|root| root.name().to_string())
					.collect::<Vec<_>>(),
			)
			.field("owners", &*self.owners.borrow())
			.finish()
	}
}

impl MountRegistry {
	/// Creates a registry around the primary document.
	pub fn new(document: Rc<dyn MountRoot>) -> Self {
		Self {
			document,
			roots: RefCell::new(Vec::new()),
			owners: RefCell::new(HashMap::new()),
		}
	}

	/// Attaches an encapsulated root owning the given targets.
	///
	/// Attaching a root under an existing name replaces it.
	pub fn attach_root(&self, root: Rc<dyn MountRoot>, targets: &[&str]) {
		let name = root.name().to_string();
		self.detach_root(&name);
		let mut owners = self.owners.borrow_mut();
		for target in targets {
			owners.insert((*target).to_string(), name.clone());
		}
		self.roots.borrow_mut().push(root);
	}

	/// Detaches a root and forgets the targets it owned.
	///
	/// Returns `false` if no root had that name.
	pub fn detach_root(&self, name: &str) -> bool {
		let mut roots = self.roots.borrow_mut();
		let before = roots.len();
		roots.retain(|root| root.name() != name);
		self.owners.borrow_mut().retain(|_, owner| owner != name);
		roots.len() != before
	}

	/// Returns the names of attached roots in attach order.
	pub fn root_names(&self) -> Vec<String> {
		self.roots
			.borrow()
			.iter()
			.map(|root| root.name().to_string())
			.collect()
	}

	/// Injects `html` into the element matching `target`.
	///
	/// Search order: the primary document, the root registered as the
	/// target's owner, then every attached root in attach order. The first
	/// match wins. Returns `None` when nothing matches.
	pub fn inject(&self, target: &str, html: &str) -> Option<MountedSubtree> {
		if self.document.inject(target, html) {
			return Some(self.mounted(self.document.as_ref(), target));
		}

		let roots: Vec<Rc<dyn MountRoot>> = self.roots.borrow().clone();
		let owner = self.owners.borrow().get(target).cloned();
		let owning_root = owner.and_then(|owner| roots.iter().find(|root| root.name() == owner));
		if let Some(root) = owning_root {
			if root.inject(target, html) {
				return Some(self.mounted(root.as_ref(), target));
			}
		}

		roots
			.iter()
			.find(|root| root.inject(target, html))
			.map(|root| self.mounted(root.as_ref(), target))
	}

	fn mounted(&self, root: &dyn MountRoot, target: &str) -> MountedSubtree {
		MountedSubtree {
			root: root.name().to_string(),
			selector: target.to_string(),
		}
	}
}

#[cfg(target_arch = "wasm32")]
pub use self::web::{DocumentRoot, ShadowMountRoot};

#[cfg(target_arch = "wasm32")]
mod web {
	use super::{DOCUMENT_ROOT, MountRoot};
	use crate::error::{NavigationError, NavigationResult};

	/// The page's `document`.
	pub struct DocumentRoot {
		document: web_sys::Document,
	}

	impl DocumentRoot {
		/// Wraps the current window's document.
		pub fn current() -> NavigationResult<Self> {
			let document = web_sys::window()
				.and_then(|window| window.document())
				.ok_or_else(|| NavigationError::Unavailable("document".to_string()))?;
			Ok(Self { document })
		}
	}

	impl MountRoot for DocumentRoot {
		fn name(&self) -> &str {
			DOCUMENT_ROOT
		}

		fn inject(&self, selector: &str, html: &str) -> bool {
			match self.document.query_selector(selector) {
				Ok(Some(element)) => {
					element.set_inner_html(html);
					true
				}
				_ => false,
			}
		}
	}

	/// A custom component's shadow root.
	pub struct ShadowMountRoot {
		name: String,
		root: web_sys::ShadowRoot,
	}

	impl ShadowMountRoot {
		/// Wraps a shadow root under a registry name.
		pub fn new(name: impl Into<String>, root: web_sys::ShadowRoot) -> Self {
			Self {
				name: name.into(),
				root,
			}
		}
	}

	impl MountRoot for ShadowMountRoot {
		fn name(&self) -> &str {
			&self.name
		}

		fn inject(&self, selector: &str, html: &str) -> bool {
			match self.root.query_selector(selector) {
				Ok(Some(element)) => {
					element.set_inner_html(html);
					true
				}
				_ => false,
			}
		}
	}
}
