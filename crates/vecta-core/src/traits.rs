//! The seams between the traversal and the outside world
//!
//! - [`ImageResolver`] - Turns an image reference into something the host can draw
//! - [`ResourceProvider`] - Loads bytes for external references

use std::fmt::{self, Debug};

use crate::context::RenderContext;
use crate::error::{ImageError, ResourceError};
use crate::image::{ImageHandle, ImageNode, SharedImageData};

/// Called once for every image-reference node the traversal meets
///
/// Resolvers keep no state between calls. Anything worth remembering across
/// nodes, such as decoded payloads, belongs in the [`RenderContext`].
///
/// ```
/// use vecta_core::{
///     ImageError, ImageHandle, ImageNode, ImageResolver, LinkedImage, RenderConfig, RenderContext,
/// };
///
/// struct LinkEverything;
///
/// impl ImageResolver for LinkEverything {
///     fn name(&self) -> &'static str {
///         "link-everything"
///     }
///
///     fn resolve(&self, node: &ImageNode, _context: &RenderContext) -> Result<ImageHandle, ImageError> {
///         Ok(ImageHandle::Linked(LinkedImage { uri: node.href.clone() }))
///     }
/// }
///
/// let context = RenderContext::new(RenderConfig::new());
/// let handle = LinkEverything.resolve(&ImageNode::new("logo.png"), &context)?;
/// assert_eq!(handle, ImageHandle::Linked(LinkedImage { uri: "logo.png".to_string() }));
/// # Ok::<(), ImageError>(())
/// ```
pub trait ImageResolver: Send + Sync {
    /// Used in logs and error messages
    fn name(&self) -> &'static str;

    /// Produce a handle for `node`
    fn resolve(&self, node: &ImageNode, context: &RenderContext) -> Result<ImageHandle, ImageError>;
}

/// A plain function acting as a resolver
///
/// ```
/// use vecta_core::{FnImageResolver, ImageHandle, ImageResolver, LinkedImage};
///
/// let resolver = FnImageResolver::new("passthrough", |node, _context| {
///     Ok(ImageHandle::Linked(LinkedImage { uri: node.href.clone() }))
/// });
/// assert_eq!(resolver.name(), "passthrough");
/// ```
pub struct FnImageResolver<F> {
    name: &'static str,
    resolve: F,
}

impl<F> FnImageResolver<F> {
    pub fn new(name: &'static str, resolve: F) -> Self
    where
        F: Fn(&ImageNode, &RenderContext) -> Result<ImageHandle, ImageError> + Send + Sync,
    {
        Self { name, resolve }
    }
}

impl<F> ImageResolver for FnImageResolver<F>
where
    F: Fn(&ImageNode, &RenderContext) -> Result<ImageHandle, ImageError> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn resolve(&self, node: &ImageNode, context: &RenderContext) -> Result<ImageHandle, ImageError> {
        (self.resolve)(node, context)
    }
}

impl<F> Debug for FnImageResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnImageResolver").field("name", &self.name).finish()
    }
}

/// Loads resources without tying the engine to a filesystem
///
/// Implementations include an in-memory store
/// ([`InMemoryResourceProvider`](crate::InMemoryResourceProvider)) and a
/// sandboxed filesystem loader in `vecta-resolve`.
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its path or URI
    fn load(&self, path: &str) -> Result<SharedImageData, ResourceError>;

    /// Check whether a resource exists without loading it
    fn exists(&self, path: &str) -> bool;

    /// Size in bytes, if it can be learned without loading the resource
    ///
    /// Lets callers enforce payload limits before any bytes are read.
    fn size_hint(&self, _path: &str) -> Option<u64> {
        None
    }

    /// Base for relative references, if the provider has one
    fn base_path(&self) -> Option<&str> {
        None
    }

    /// Human-readable name for logs
    fn name(&self) -> &'static str;
}
