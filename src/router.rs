//! Client-side routing
//!
//! Paths carry their parameters inline (`/view/name:aaron`), views are
//! declared under the raw path they answer (`/view/name`), and the
//! [`Router`] keeps the navigation state in sync with history.
//!
//! ## Usage
//!
//! ```
//! use std::rc::Rc;
//!
//! use reinhardt_navigation::RouterConfig;
//! use reinhardt_navigation::render::DOCUMENT_ROOT;
//! use reinhardt_navigation::router::{MemoryHistory, Router, ViewDeclaration};
//! use reinhardt_navigation::testing::{MemoryRoot, StaticFetcher};
//!
//! let router = Router::builder(RouterConfig::default())
//!     .history(Rc::new(MemoryHistory::new("http://localhost:5173", "/")))
//!     .document(Rc::new(MemoryRoot::new(DOCUMENT_ROOT, &["main"])))
//!     .fetcher(Rc::new(StaticFetcher::new()))
//!     .build()
//!     .unwrap();
//! router.declare_view(ViewDeclaration::new("/view/name").content("<p>hi</p>"));
//!
//! router.push("/view/name:aaron").unwrap();
//! assert_eq!(router.path(), "/view/aaron");
//! assert_eq!(router.raw_path(), "/view/name");
//! ```

mod controller;
mod history;
mod link;
mod path;
mod query;
mod resolver;
mod state;
mod tasks;
mod views;

#[cfg(target_arch = "wasm32")]
mod browser;

pub use controller::{Router, RouterBuilder};
pub use history::{History, HistoryEntry, Location, MemoryHistory};
pub use link::{LinkAction, classify_link};
pub use path::{
	ParamMap, ParsedPath, declared_key, declared_segment, drop_trailing_slash, parse_path,
	path_segments, split_slug,
};
pub use query::{QueryMap, decode_query, encode_query};
pub use resolver::{Resolution, first_registered_with_segment_count, reconstruct_raw_path, resolve};
pub use state::{NavigationSnapshot, NavigationState, RouteDescriptor, RouteId, SubscriptionId};
pub use tasks::TaskQueue;
pub use views::{ViewDeclaration, ViewDescriptor, ViewRegistry};

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserHistory, TARGET_ATTRIBUTE, entry_from_state, intercept_links, listen_popstate};
