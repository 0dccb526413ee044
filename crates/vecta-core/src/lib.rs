//! Vecta Core: the policy surface of a vector translation pipeline
//!
//! A document full of paths, shapes, text and images goes in; primitives for a
//! host renderer come out. The visitors that do that work all read from the
//! same two things defined here:
//!
//! - [`RenderConfig`] - The per-run policy: path optimization, text as
//!   geometry, runtime helpers, locales, default font family
//! - [`ImageResolver`] - The extension point called for every image reference
//!
//! Around them sit the [`FontFallbackRegistry`] shared by every configuration,
//! the [`RenderContext`] that carries one traversal, and the [`ResourceProvider`]
//! seam for loading external bytes.
//!
//! ## Resolve an image
//!
//! ```
//! use vecta_core::{
//!     FnImageResolver, ImageHandle, ImageNode, LinkedImage, RenderConfig, RenderContext,
//! };
//!
//! let resolver = FnImageResolver::new("link", |node, _context| {
//!     Ok(ImageHandle::Linked(LinkedImage { uri: node.href.clone() }))
//! });
//!
//! let context = RenderContext::new(RenderConfig::new());
//! let handle = context.resolve_image(&resolver, &ImageNode::new("logo.png"))?;
//! assert!(matches!(handle, Some(ImageHandle::Linked(_))));
//! # Ok::<(), vecta_core::ImageError>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod font;
pub mod image;
pub mod locale;
pub mod resource;
pub mod settings;
pub mod traits;

pub use config::{ImageFailurePolicy, RenderConfig, RenderConfigBuilder};
pub use context::RenderContext;
pub use error::{ConfigError, ImageError, ResourceError, Result, VectaError};
pub use font::{FallbackSlot, FontFallbackRegistry, FontFallbacks, FontFamily, SharedFallbackRegistry};
pub use image::{
    EmbeddedImage, ImageHandle, ImageNode, ImageSource, InlineImage, LinkedImage, SharedImageData,
};
pub use locale::Locale;
pub use resource::InMemoryResourceProvider;
pub use settings::{FallbackSettings, RenderSettings};
pub use traits::{FnImageResolver, ImageResolver, ResourceProvider};
