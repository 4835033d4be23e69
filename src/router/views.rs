//! View declarations and their registry.

use std::collections::HashMap;

use super::path::{declared_key, declared_segment, path_segments};

/// A view as declared by the application.
///
/// ```
/// use reinhardt_navigation::router::ViewDeclaration;
///
/// let view = ViewDeclaration::new("/product/:id")
///     .content("<h1>Product</h1>")
///     .target("#app");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDeclaration {
	expression: String,
	content: Option<String>,
	target: Option<String>,
}

impl ViewDeclaration {
	/// Declares a view whose template is fetched remotely on first use.
	pub fn new(expression: impl Into<String>) -> Self {
		Self {
			expression: expression.into(),
			content: None,
			target: None,
		}
	}

	/// Sets the inline template content.
	///
	/// Blank content counts as no content, so the template is fetched.
	pub fn content(mut self, html: impl Into<String>) -> Self {
		let html = html.into();
		self.content = (!html.trim().is_empty()).then_some(html);
		self
	}

	/// Sets the mount target this view always renders into.
	pub fn target(mut self, selector: impl Into<String>) -> Self {
		self.target = Some(selector.into());
		self
	}
}

/// A registered view template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor {
	key: String,
	source: String,
	segments: Vec<String>,
	target: Option<String>,
	content: Option<String>,
}

impl ViewDescriptor {
	fn from_declaration(declaration: ViewDeclaration) -> Self {
		let segments = path_segments(&declaration.expression)
			.iter()
			.map(|segment| declared_segment(segment).to_string())
			.collect();
		Self {
			key: declared_key(&declaration.expression),
			source: declaration.expression,
			segments,
			target: declaration.target,
			content: declaration.content,
		}
	}

	/// Returns the raw lookup key.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the declared expression remote templates are fetched by.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Returns the declared segments, parameter names in place of values.
	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// Returns the number of declared segments.
	pub fn segment_count(&self) -> usize {
		self.segments.len()
	}

	/// Returns the explicit mount target, if any.
	pub fn target(&self) -> Option<&str> {
		self.target.as_deref()
	}

	/// Returns the template content, if loaded.
	pub fn content(&self) -> Option<&str> {
		self.content.as_deref()
	}

	/// Returns whether the template content is available.
	pub fn has_content(&self) -> bool {
		self.content.is_some()
	}
}

/// Registry of declared views, in declaration order.
#[derive(Debug, Default)]
pub struct ViewRegistry {
	views: Vec<ViewDescriptor>,
	by_key: HashMap<String, usize>,
}

impl ViewRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a view and returns its key.
	///
	/// Re-declaring a key replaces the descriptor but keeps its position.
	pub fn declare(&mut self, declaration: ViewDeclaration) -> String {
		let descriptor = ViewDescriptor::from_declaration(declaration);
		let key = descriptor.key.clone();
		match self.by_key.get(&key) {
			Some(&index) => self.views[index] = descriptor,
			None => {
				self.by_key.insert(key.clone(), self.views.len());
				self.views.push(descriptor);
			}
		}
		key
	}

	/// Returns the descriptor registered under a raw key.
	pub fn get(&self, key: &str) -> Option<&ViewDescriptor> {
		self.by_key.get(key).map(|&index| &self.views[index])
	}

	/// Returns whether a key is registered.
	pub fn contains(&self, key: &str) -> bool {
		self.by_key.contains_key(key)
	}

	/// Stores fetched content on a descriptor.
	///
	/// Returns `false` if the key is unknown. Writing the same content twice
	/// is harmless.
	pub fn store_content(&mut self, key: &str, html: impl Into<String>) -> bool {
		match self.by_key.get(key) {
			Some(&index) => {
				self.views[index].content = Some(html.into());
				true
			}
			None => false,
		}
	}

	/// Iterates over descriptors in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &ViewDescriptor> {
		self.views.iter()
	}

	/// Returns the number of declared views.
	pub fn len(&self) -> usize {
		self.views.len()
	}

	/// Returns whether no view is declared.
	pub fn is_empty(&self) -> bool {
		self.views.is_empty()
	}

	/// Picks the view to render before the first navigation.
	///
	/// Starts from the view declared at `/` and considers `/part` for every
	/// segment of `pathname`, keeping the one with the longest key. A remote
	/// view found this way usually contains the mount target of a deeper view.
	pub fn base_view(&self, pathname: &str) -> Option<&ViewDescriptor> {
		path_segments(pathname)
			.iter()
			.filter_map(|part| self.get(&format!("/{}", part)))
			.fold(self.get("/"), |longest, candidate| match longest {
				Some(current) if candidate.key.len() <= current.key.len() => Some(current),
				_ => Some(candidate),
			})
	}
}
