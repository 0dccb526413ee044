//! End-to-end image resolution against real files

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{ImageFormat, RgbaImage};
use tempfile::TempDir;
use vecta_core::{
    FontFallbackRegistry, ImageError, ImageFailurePolicy, ImageHandle, ImageNode, ImageResolver,
    RenderConfig, RenderContext,
};
use vecta_resolve::{
    resolver_for, FilesystemResourceProvider, NativeImageResolver, RuntimeImageResolver,
};

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    RgbaImage::new(width, height)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

fn data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(bytes))
}

fn config(runtime_helpers: bool, policy: ImageFailurePolicy) -> RenderConfig {
    RenderConfig::builder()
        .registry(Arc::new(FontFallbackRegistry::new()))
        .include_runtime_helpers(runtime_helpers)
        .image_failure_policy(policy)
        .build()
        .unwrap()
}

/// A document directory holding `images/logo.png` (5x4)
fn document_dir() -> TempDir {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("images")).unwrap();
    fs::write(dir.path().join("images/logo.png"), png(5, 4)).unwrap();
    dir
}

fn context_in(dir: &Path, config: RenderConfig) -> RenderContext {
    RenderContext::with_resources(config, Arc::new(FilesystemResourceProvider::new(dir)))
}

#[test]
fn runtime_embeds_inline_images() {
    let dir = document_dir();
    let context = context_in(dir.path(), config(true, ImageFailurePolicy::Abort));
    let node = ImageNode::new(data_uri(&png(3, 2)));

    let handle = RuntimeImageResolver::new().resolve(&node, &context).unwrap();
    match handle {
        ImageHandle::Embedded(image) => {
            assert_eq!(image.key, "img0");
            assert_eq!(image.mime, "image/png");
            assert_eq!((image.width, image.height), (3, 2));
        }
        other => panic!("expected an embedded image, got {other:?}"),
    }
}

#[test]
fn runtime_embeds_external_images() {
    let dir = document_dir();
    let context = context_in(dir.path(), config(true, ImageFailurePolicy::Abort));
    let resolver = RuntimeImageResolver::new();

    let first = resolver.resolve(&ImageNode::new("images/logo.png"), &context).unwrap();
    let second = resolver.resolve(&ImageNode::new(data_uri(&png(1, 1))), &context).unwrap();

    match (first, second) {
        (ImageHandle::Embedded(a), ImageHandle::Embedded(b)) => {
            assert_eq!((a.width, a.height), (5, 4));
            assert_eq!(a.key, "img0");
            assert_eq!(b.key, "img1");
            assert_eq!(&*a.data, png(5, 4).as_slice());
        }
        other => panic!("expected two embedded images, got {other:?}"),
    }
}

#[test]
fn runtime_enforces_payload_limit() {
    let dir = document_dir();
    let context = context_in(dir.path(), config(true, ImageFailurePolicy::Abort));
    let resolver = RuntimeImageResolver::new().with_max_payload(16);

    let result = context.resolve_image(&resolver, &ImageNode::new("images/logo.png"));
    assert!(matches!(result, Err(ImageError::TooLarge { limit: 16, .. })));
}

#[test]
fn native_links_relative_paths_against_the_base() {
    let dir = document_dir();
    let context = context_in(dir.path(), config(false, ImageFailurePolicy::Abort));

    let handle = NativeImageResolver::new().resolve(&ImageNode::new("images/logo.png"), &context).unwrap();
    let expected = dir.path().join("images/logo.png");
    match handle {
        ImageHandle::Linked(link) => assert_eq!(Path::new(&link.uri), expected),
        other => panic!("expected a linked image, got {other:?}"),
    }
}

#[test]
fn native_links_urls_as_written() {
    let dir = document_dir();
    let context = context_in(dir.path(), config(false, ImageFailurePolicy::Abort));
    let href = "https://example.com/banner.png";

    let handle = NativeImageResolver::new().resolve(&ImageNode::new(href), &context).unwrap();
    match handle {
        ImageHandle::Linked(link) => assert_eq!(link.uri, href),
        other => panic!("expected a linked image, got {other:?}"),
    }
}

#[test]
fn native_refuses_inline_payloads() {
    let dir = document_dir();
    let context = context_in(dir.path(), config(false, ImageFailurePolicy::Abort));
    let node = ImageNode::new(data_uri(&png(1, 1))).with_id("hero");

    let result = context.resolve_image(&NativeImageResolver::new(), &node);
    match result {
        Err(ImageError::RuntimeHelpersRequired(label)) => assert_eq!(label, "hero"),
        other => panic!("expected RuntimeHelpersRequired, got {other:?}"),
    }
}

#[test]
fn native_reports_missing_files() {
    let dir = document_dir();
    let context = context_in(dir.path(), config(false, ImageFailurePolicy::Abort));

    let result = context.resolve_image(&NativeImageResolver::new(), &ImageNode::new("images/gone.png"));
    assert!(matches!(result, Err(ImageError::NotFound(_))));

    let escape = context.resolve_image(&NativeImageResolver::new(), &ImageNode::new("../outside.png"));
    assert!(matches!(escape, Err(ImageError::NotFound(_))));
}

#[test]
fn resolver_follows_runtime_helpers_flag() {
    assert_eq!(resolver_for(&config(true, ImageFailurePolicy::Abort)).name(), "runtime");
    assert_eq!(resolver_for(&config(false, ImageFailurePolicy::Abort)).name(), "native");
}

#[test]
fn selected_resolver_caches_by_href() {
    let dir = document_dir();
    let context = context_in(dir.path(), config(true, ImageFailurePolicy::Abort));
    let resolver = resolver_for(context.config());
    let node = ImageNode::new("images/logo.png");

    let first = context.resolve_image(resolver.as_ref(), &node).unwrap();
    let second = context.resolve_image(resolver.as_ref(), &node).unwrap();

    assert_eq!(first, second);
    assert_eq!(context.cached_image_count(), 1);
    // A cache hit does not consume a key
    assert_eq!(context.next_image_key(), "img1");
}

#[test]
fn failure_policies_apply_to_missing_images() {
    let dir = document_dir();
    let node = ImageNode::new("images/gone.png").with_size(40.0, 30.0);

    let skip = context_in(dir.path(), config(false, ImageFailurePolicy::Skip));
    let resolver = resolver_for(skip.config());
    assert_eq!(skip.resolve_image(resolver.as_ref(), &node).unwrap(), None);

    let placeholder = context_in(dir.path(), config(false, ImageFailurePolicy::Placeholder));
    let handle = placeholder.resolve_image(resolver.as_ref(), &node).unwrap();
    assert_eq!(
        handle,
        Some(ImageHandle::Placeholder {
            width: 40.0,
            height: 30.0
        })
    );
    assert_eq!(placeholder.cached_image_count(), 0);
}

#[test]
fn undecodable_bytes_are_reported() {
    let dir = document_dir();
    fs::write(dir.path().join("images/notes.txt"), b"plain text, not pixels").unwrap();
    let context = context_in(dir.path(), config(true, ImageFailurePolicy::Abort));

    let result = context.resolve_image(&RuntimeImageResolver::new(), &ImageNode::new("images/notes.txt"));
    assert!(matches!(result, Err(ImageError::UnsupportedFormat(_))));
}
