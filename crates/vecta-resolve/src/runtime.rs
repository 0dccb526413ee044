//! Resolver for output that ships with the runtime helper layer
//!
//! Every image, inline or external, ends up as bytes under a key the runtime
//! layer decodes on the host. Nothing in the output points at the filesystem
//! the translation ran on.

use std::sync::Arc;

use vecta_core::{
    EmbeddedImage, ImageError, ImageHandle, ImageNode, ImageResolver, ImageSource, RenderContext,
};

use crate::payload::{check_size, decode_inline, probe, MAX_PAYLOAD_SIZE};

/// Embeds image payloads for the runtime layer
#[derive(Debug, Clone)]
pub struct RuntimeImageResolver {
    max_payload: usize,
}

impl RuntimeImageResolver {
    pub fn new() -> Self {
        Self {
            max_payload: MAX_PAYLOAD_SIZE,
        }
    }

    /// Caps the decoded size of any single image
    pub fn with_max_payload(mut self, bytes: usize) -> Self {
        self.max_payload = bytes;
        self
    }
}

impl Default for RuntimeImageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResolver for RuntimeImageResolver {
    fn name(&self) -> &'static str {
        "runtime"
    }

    fn resolve(&self, node: &ImageNode, context: &RenderContext) -> Result<ImageHandle, ImageError> {
        let (data, declared): (Arc<[u8]>, Option<String>) = match node.source()? {
            ImageSource::Inline(inline) => {
                let bytes = decode_inline(&inline, self.max_payload)?;
                (bytes.into(), inline.mime)
            }
            ImageSource::External(href) => {
                let resources = context.resources();
                if let Some(size) = resources.size_hint(&href) {
                    check_size(usize::try_from(size).unwrap_or(usize::MAX), self.max_payload)?;
                }
                let data = resources.load(&href)?;
                check_size(data.len(), self.max_payload)?;
                (data, None)
            }
        };

        let probed = probe(&data)?;
        if let Some(declared) = declared.filter(|mime| *mime != probed.mime) {
            log::debug!("Data URI declares {} but holds {}", declared, probed.mime);
        }

        Ok(ImageHandle::Embedded(EmbeddedImage {
            key: context.next_image_key(),
            mime: probed.mime,
            width: probed.width,
            height: probed.height,
            data,
        }))
    }
}
