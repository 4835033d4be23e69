//! View materialization
//!
//! Remote templates are fetched once and kept on their view. Content is
//! injected into the primary document or into an attached encapsulated
//! root, then handed to the [`Binder`].

mod fetch;
mod materializer;
mod mount;

pub use fetch::{HttpFetcher, TemplateFetcher};
pub use materializer::{Rebind, ViewMaterializer};
pub use mount::{Binder, DOCUMENT_ROOT, MountRegistry, MountRoot, MountedSubtree, NoopBinder};

#[cfg(target_arch = "wasm32")]
pub use mount::{DocumentRoot, ShadowMountRoot};
