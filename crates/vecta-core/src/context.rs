//! The per-traversal container resolvers read from
//!
//! One [`RenderContext`] lives for the translation of one document. It carries
//! the configuration, the resource provider used for external references, and
//! a cache of handles already produced, so an image referenced twice is
//! resolved once. That holds across threads too: concurrent lookups of the same
//! `href` wait for the first resolution instead of starting their own.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::config::{ImageFailurePolicy, RenderConfig};
use crate::error::ImageError;
use crate::font::FontFallbacks;
use crate::image::{ImageHandle, ImageNode};
use crate::resource::InMemoryResourceProvider;
use crate::traits::{ImageResolver, ResourceProvider};

/// Cache entry for one `href`; its lock is held while the image resolves
type ImageSlot = Arc<Mutex<Option<ImageHandle>>>;

/// Everything a resolver needs while one document is translated
pub struct RenderContext {
    config: RenderConfig,
    fallbacks: FontFallbacks,
    resources: Arc<dyn ResourceProvider>,
    images: DashMap<String, ImageSlot>,
    next_image_key: AtomicUsize,
}

impl RenderContext {
    /// Start a traversal with an empty in-memory resource store
    ///
    /// The fallback families are frozen here; registry writes made during the
    /// traversal do not reach this document.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_resources(config, Arc::new(InMemoryResourceProvider::new()))
    }

    pub fn with_resources(config: RenderConfig, resources: Arc<dyn ResourceProvider>) -> Self {
        let fallbacks = config.fallbacks();
        Self {
            config,
            fallbacks,
            resources,
            images: DashMap::new(),
            next_image_key: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Fallback families as they were when the traversal started
    pub fn fallbacks(&self) -> &FontFallbacks {
        &self.fallbacks
    }

    pub fn resources(&self) -> &Arc<dyn ResourceProvider> {
        &self.resources
    }

    /// Base for relative image references, taken from the resource provider
    pub fn base_path(&self) -> Option<&str> {
        self.resources.base_path()
    }

    /// Issues the next key for a payload handed to the runtime layer
    pub fn next_image_key(&self) -> String {
        format!("img{}", self.next_image_key.fetch_add(1, Ordering::Relaxed))
    }

    pub fn cached_image(&self, href: &str) -> Option<ImageHandle> {
        self.images
            .get(href)
            .map(|entry| Arc::clone(entry.value()))
            .and_then(|slot| slot.lock().clone())
    }

    pub fn cache_image(&self, href: impl Into<String>, handle: ImageHandle) {
        *self.slot(href.into()).lock() = Some(handle);
    }

    /// Number of hrefs with a resolved handle
    pub fn cached_image_count(&self) -> usize {
        // Collected first so no map shard stays locked while waiting on a slot
        let slots: Vec<ImageSlot> = self.images.iter().map(|entry| Arc::clone(entry.value())).collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    pub fn clear_image_cache(&self) {
        self.images.clear();
    }

    fn slot(&self, href: String) -> ImageSlot {
        Arc::clone(self.images.entry(href).or_default().value())
    }

    /// Resolves `node` through `resolver`, applying cache and failure policy
    ///
    /// Returns `Ok(None)` only when the image failed and the policy is
    /// [`ImageFailurePolicy::Skip`]. Placeholders are returned but not cached,
    /// so a later call with a different resolver can still succeed.
    ///
    /// The resolver must not resolve the same `href` through this context
    /// from inside `resolve`; that call would wait on itself.
    pub fn resolve_image(
        &self,
        resolver: &dyn ImageResolver,
        node: &ImageNode,
    ) -> Result<Option<ImageHandle>, ImageError> {
        let slot = self.slot(node.href.clone());
        let mut cached = slot.lock();
        if let Some(handle) = cached.as_ref() {
            log::trace!("Image cache hit for {}", describe(node));
            return Ok(Some(handle.clone()));
        }

        match resolver.resolve(node, self) {
            Ok(handle) => {
                log::debug!("{} resolved {}", resolver.name(), describe(node));
                *cached = Some(handle.clone());
                Ok(Some(handle))
            }
            Err(err) => match self.config.image_failure_policy() {
                ImageFailurePolicy::Abort => Err(err),
                ImageFailurePolicy::Skip => {
                    log::warn!("Skipping {}: {}", describe(node), err);
                    Ok(None)
                }
                ImageFailurePolicy::Placeholder => {
                    log::warn!("Substituting placeholder for {}: {}", describe(node), err);
                    Ok(Some(ImageHandle::placeholder_for(node)))
                }
            },
        }
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("config", &self.config)
            .field("resources", &self.resources.name())
            .field("cached_images", &self.images.len())
            .finish()
    }
}

/// Short label for logs: the element id if there is one, else a clipped href
fn describe(node: &ImageNode) -> String {
    match &node.id {
        Some(id) => format!("#{id}"),
        None if node.href.len() > 48 => {
            let cut = (0..=48).rev().find(|&i| node.href.is_char_boundary(i)).unwrap_or(0);
            format!("{}...", &node.href[..cut])
        }
        None => node.href.clone(),
    }
}
