//! Resolver for output that must stand on host capabilities alone
//!
//! Without the runtime helper layer the host can only load images it can find
//! by itself, so every handle is a link. Inline payloads have nowhere to go and
//! are refused.

use std::path::Path;

use vecta_core::{
    ImageError, ImageHandle, ImageNode, ImageResolver, ImageSource, LinkedImage, RenderContext,
};

/// URL schemes the host loads natively
const LINKABLE_SCHEMES: [&str; 3] = ["http", "https", "file"];

/// Links images the host can load without help
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeImageResolver;

impl NativeImageResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ImageResolver for NativeImageResolver {
    fn name(&self) -> &'static str {
        "native"
    }

    fn resolve(&self, node: &ImageNode, context: &RenderContext) -> Result<ImageHandle, ImageError> {
        let href = match node.source()? {
            ImageSource::Inline(_) => {
                let label = node.id.clone().unwrap_or_else(|| "data URI".to_string());
                return Err(ImageError::RuntimeHelpersRequired(label));
            }
            ImageSource::External(href) => href,
        };

        if has_linkable_scheme(&href) {
            return Ok(ImageHandle::Linked(LinkedImage { uri: href }));
        }

        if !context.resources().exists(&href) {
            return Err(ImageError::NotFound(href));
        }

        let uri = match context.base_path() {
            Some(base) => Path::new(base).join(&href).to_string_lossy().into_owned(),
            None => href,
        };
        Ok(ImageHandle::Linked(LinkedImage { uri }))
    }
}

fn has_linkable_scheme(href: &str) -> bool {
    href.split_once(':').is_some_and(|(scheme, _)| {
        LINKABLE_SCHEMES
            .iter()
            .any(|known| scheme.eq_ignore_ascii_case(known))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linkable_schemes() {
        assert!(has_linkable_scheme("https://example.com/a.png"));
        assert!(has_linkable_scheme("HTTP://example.com/a.png"));
        assert!(has_linkable_scheme("file:///tmp/a.png"));
        assert!(!has_linkable_scheme("images/a.png"));
        assert!(!has_linkable_scheme("C:\\images\\a.png"));
        assert!(!has_linkable_scheme("ftp://example.com/a.png"));
    }
}
