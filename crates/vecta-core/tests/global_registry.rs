//! Everything in this file touches the process-wide fallback registry, so the
//! tests take a lock and reset the registry before running.

use std::sync::Mutex;
use std::thread;

use vecta_core::font::{self, FallbackSlot, FontFallbackRegistry, FontFamily};
use vecta_core::{ConfigError, RenderConfig};

static GLOBAL: Mutex<()> = Mutex::new(());

fn with_clean_registry(test: impl FnOnce()) {
    let _ = env_logger::builder().is_test(true).try_init();
    let _guard = GLOBAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    FontFallbackRegistry::global().reset();
    test();
    FontFallbackRegistry::global().reset();
}

#[test]
fn builtins_are_materialized_on_first_read() {
    with_clean_registry(|| {
        let registry = FontFallbackRegistry::global();
        assert!(!registry.is_materialized(FallbackSlot::Monospace));

        assert_eq!(font::default_family().as_str(), "Arial Unicode MS");
        assert_eq!(font::serif().as_str(), "Times New Roman");
        assert_eq!(font::sans_serif().as_str(), "Tahoma");
        assert_eq!(font::monospace().as_str(), "MS Gothic");

        assert!(registry.is_materialized(FallbackSlot::Monospace));
        assert_eq!(font::monospace(), font::monospace());
    });
}

#[test]
fn sans_serif_override_is_seen_by_every_configuration() {
    with_clean_registry(|| {
        let before = RenderConfig::new();
        font::set_sans_serif(FontFamily::new("Custom Sans").unwrap()).unwrap();
        let after = RenderConfig::new();

        for config in [&before, &after, &before.clone()] {
            assert_eq!(config.fallbacks().get(FallbackSlot::SansSerif).as_str(), "Custom Sans");
        }

        font::set_sans_serif(FontFamily::new("Other Sans").unwrap()).unwrap();
        assert_eq!(before.fallbacks().get(FallbackSlot::SansSerif).as_str(), "Other Sans");
    });
}

#[test]
fn missing_override_is_a_no_op() {
    with_clean_registry(|| {
        font::set_serif(FontFamily::new("Georgia").unwrap()).unwrap();
        assert_eq!(font::set_serif(None), Err(ConfigError::MissingFontFamily));
        assert_eq!(font::set_default_family(None), Err(ConfigError::MissingFontFamily));
        assert_eq!(font::set_monospace(None), Err(ConfigError::MissingFontFamily));
        assert_eq!(font::serif().as_str(), "Georgia");
    });
}

#[test]
fn default_font_name_writes_through_to_the_global_default() {
    with_clean_registry(|| {
        let mut config = RenderConfig::new();
        let observer = RenderConfig::new();

        config.set_default_font_name("  Verdana ").unwrap();
        assert_eq!(font::default_family().as_str(), "Verdana");
        assert_eq!(observer.fallbacks().get(FallbackSlot::Default).as_str(), "Verdana");
        // The observer's own field is per-instance
        assert_eq!(observer.default_font_name(), "Arial Unicode MS");

        assert!(config.set_default_font_name("   ").is_err());
        assert_eq!(font::default_family().as_str(), "Verdana");
    });
}

#[test]
fn concurrent_writers_leave_one_of_their_values() {
    with_clean_registry(|| {
        let names = ["Alpha", "Beta", "Gamma", "Delta"];
        let handles: Vec<_> = names
            .into_iter()
            .map(|name| {
                thread::spawn(move || {
                    let mut config = RenderConfig::new();
                    for _ in 0..50 {
                        config.set_default_font_name(name).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let winner = font::default_family();
        assert!(names.contains(&winner.as_str()));
    });
}
