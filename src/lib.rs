//! # Reinhardt Navigation
//!
//! Client-side navigation for single-page documents.
//!
//! The router intercepts in-document links, keeps browser history and an
//! observable navigation state in sync, extracts `name:value` path
//! parameters and query parameters, and swaps the content of the matching
//! declared view into a mount target. Mount targets may live in the
//! document or inside encapsulated roots such as component shadow roots.
//!
//! ## Modules
//!
//! - [`router`]: path parsing, view resolution, history and the [`Router`]
//! - [`render`]: template fetching, mount roots and the materializer
//! - [`config`]: [`RouterConfig`]
//! - [`error`]: [`NavigationError`]
//! - [`testing`]: in-memory doubles for running outside the browser
//!
//! ## Threading
//!
//! Everything is single-threaded: state lives in `Rc`/`RefCell` and queued
//! work is a local future. On wasm queued work runs on the browser's task
//! queue; elsewhere drive it with [`Router::settle`].

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod render;
pub mod router;

// Available on both wasm and native
pub mod testing;

pub use config::RouterConfig;
pub use error::{FetchError, NavigationError, NavigationResult};
pub use router::{
	HistoryEntry, LinkAction, NavigationSnapshot, QueryMap, RouteId, Router, RouterBuilder,
	ViewDeclaration,
};
