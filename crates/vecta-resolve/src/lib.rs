//! Vecta Resolve: concrete answers to "what do I do with this image?"
//!
//! Two resolvers, one per output mode:
//!
//! - [`RuntimeImageResolver`] - Output ships with the runtime helper layer, so
//!   payloads are decoded, probed and embedded under a key
//! - [`NativeImageResolver`] - Output stands alone, so images are linked and
//!   inline payloads are refused
//!
//! [`resolver_for`] picks between them from a [`RenderConfig`], and
//! [`FilesystemResourceProvider`] feeds external references from disk.
//!
//! ```no_run
//! use std::sync::Arc;
//! use vecta_core::{ImageNode, RenderConfig, RenderContext};
//! use vecta_resolve::{resolver_for, FilesystemResourceProvider};
//!
//! let config = RenderConfig::new();
//! let resolver = resolver_for(&config);
//! let context = RenderContext::with_resources(
//!     config,
//!     Arc::new(FilesystemResourceProvider::new("assets")),
//! );
//!
//! let handle = context.resolve_image(resolver.as_ref(), &ImageNode::new("logo.png"))?;
//! # Ok::<(), vecta_core::ImageError>(())
//! ```

mod filesystem;
mod native;
pub mod payload;
mod runtime;

use std::sync::Arc;

use vecta_core::{ImageResolver, RenderConfig};

pub use filesystem::FilesystemResourceProvider;
pub use native::NativeImageResolver;
pub use payload::{ProbedImage, MAX_PAYLOAD_SIZE};
pub use runtime::RuntimeImageResolver;

// Re-export the in-memory provider from vecta-core for convenience
pub use vecta_core::InMemoryResourceProvider;

/// The resolver matching the configuration's runtime-helpers setting
pub fn resolver_for(config: &RenderConfig) -> Arc<dyn ImageResolver> {
    if config.include_runtime_helpers() {
        log::debug!("Images will be embedded for the runtime layer");
        Arc::new(RuntimeImageResolver::new())
    } else {
        log::debug!("Images will be linked for the host");
        Arc::new(NativeImageResolver::new())
    }
}
