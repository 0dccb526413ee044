//! Image references going in, image handles coming out
//!
//! An [`ImageNode`] is what the traversal sees in the document: an `href` and
//! maybe a size. [`ImageSource`] is the parsed form of that `href`. An
//! [`ImageHandle`] is what a resolver gives back for the host renderer.

use std::fmt;
use std::sync::Arc;

use crate::error::ImageError;

/// Raw image bytes shared between the cache and the output tree
pub type SharedImageData = Arc<[u8]>;

/// A document node that references a raster image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    pub id: Option<String>,
    pub href: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl ImageNode {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            id: None,
            href: href.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Parses the `href` into an inline payload or an external reference
    pub fn source(&self) -> Result<ImageSource, ImageError> {
        ImageSource::parse(&self.href)
    }
}

/// Where an image's bytes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Payload carried in a `data:` URI
    Inline(InlineImage),
    /// Path or URL to be resolved outside the document
    External(String),
}

/// The pieces of a `data:` URI, payload still encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Declared media type, if the URI names one
    pub mime: Option<String>,
    /// `;base64` was present; otherwise the payload is percent-encoded
    pub base64: bool,
    pub payload: String,
}

impl ImageSource {
    /// Splits an `href` into its source form
    ///
    /// `data:` URIs must contain a comma separating metadata from payload.
    /// Anything else is taken as an external reference.
    pub fn parse(href: &str) -> Result<Self, ImageError> {
        let href = href.trim();
        if href.is_empty() {
            return Err(ImageError::NotFound("<empty href>".to_string()));
        }

        let Some(rest) = strip_prefix_ignore_case(href, "data:") else {
            return Ok(ImageSource::External(href.to_string()));
        };

        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::InvalidDataUri("missing ',' before payload".to_string()))?;

        let mut parts = meta.split(';').map(str::trim);
        let mime = parts
            .next()
            .filter(|mime| !mime.is_empty())
            .map(str::to_ascii_lowercase);
        let base64 = parts.any(|param| param.eq_ignore_ascii_case("base64"));

        Ok(ImageSource::Inline(InlineImage {
            mime,
            base64,
            payload: payload.to_string(),
        }))
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// An image the runtime helper layer will decode from memory
#[derive(Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Key the runtime layer stores the payload under
    pub key: String,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub data: SharedImageData,
}

impl fmt::Debug for EmbeddedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedImage")
            .field("key", &self.key)
            .field("mime", &self.mime)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// An image the host loads by itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedImage {
    pub uri: String,
}

/// What a resolver hands back to be attached to the output tree
#[derive(Debug, Clone, PartialEq)]
pub enum ImageHandle {
    Embedded(EmbeddedImage),
    Linked(LinkedImage),
    /// Stand-in for an image that failed to resolve
    Placeholder { width: f32, height: f32 },
}

impl ImageHandle {
    /// Placeholder sized from the node; unknown dimensions become zero
    pub fn placeholder_for(node: &ImageNode) -> Self {
        ImageHandle::Placeholder {
            width: node.width.unwrap_or(0.0),
            height: node.height.unwrap_or(0.0),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageHandle::Placeholder { .. })
    }
}
