//! In-memory resources
//!
//! The provider every [`RenderContext`](crate::RenderContext) starts with.
//! Useful for tests and for drivers that have already fetched every external
//! image before the traversal begins.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ResourceError;
use crate::image::SharedImageData;
use crate::traits::ResourceProvider;

/// Resources held in a map, keyed by the path they are referenced with
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedImageData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `path`, replacing anything already there
    pub fn add(&self, path: impl Into<String>, data: impl Into<SharedImageData>) {
        self.resources.write().insert(path.into(), data.into());
    }

    pub fn remove(&self, path: &str) -> Option<SharedImageData> {
        self.resources.write().remove(path)
    }

    pub fn clear(&self) {
        self.resources.write().clear();
    }

    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedImageData, ResourceError> {
        self.resources
            .read()
            .get(path)
            .map(Arc::clone)
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources.read().contains_key(path)
    }

    fn size_hint(&self, path: &str) -> Option<u64> {
        self.resources.read().get(path).map(|data| data.len() as u64)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
