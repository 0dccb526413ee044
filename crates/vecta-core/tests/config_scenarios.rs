use std::sync::Arc;

use vecta_core::{
    ConfigError, FallbackSlot, FontFallbackRegistry, ImageFailurePolicy, RenderConfig,
    RenderSettings,
};

fn isolated() -> RenderConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    RenderConfig::with_registry(Arc::new(FontFallbackRegistry::new()))
}

#[test]
fn clone_then_rename_leaves_the_original_alone() {
    let config = isolated();
    let mut copy = config.clone();
    copy.set_default_font_name("Verdana").unwrap();

    assert_eq!(config.default_font_name(), "Arial Unicode MS");
    assert_eq!(copy.default_font_name(), "Verdana");
}

#[test]
fn clone_matches_on_every_copyable_field() {
    let mut config = isolated();
    config.set_optimize_path_geometry(false);
    config.set_primary_locale_tag("ko-KR").unwrap();

    let copy = config.clone();
    assert_eq!(copy.optimize_path_geometry(), config.optimize_path_geometry());
    assert_eq!(copy.text_as_geometry(), config.text_as_geometry());
    assert_eq!(copy.include_runtime_helpers(), config.include_runtime_helpers());
    assert_eq!(copy.default_font_name(), config.default_font_name());
    assert_eq!(copy.primary_locale(), config.primary_locale());
    assert_eq!(copy.neutral_locale(), config.neutral_locale());
}

#[test]
fn json_settings_drive_a_configuration() {
    let _ = env_logger::builder().is_test(true).try_init();
    let registry = Arc::new(FontFallbackRegistry::new());
    let mut config = RenderConfig::with_registry(registry.clone());
    let settings = RenderSettings::from_json(
        r#"{
            "optimize-path-geometry": false,
            "include-runtime-helpers": false,
            "primary-locale": "pt_BR",
            "default-font-name": " Noto Sans ",
            "image-failure-policy": "skip",
            "fallbacks": { "serif": "Georgia", "sans-serif": "Custom Sans" }
        }"#,
    )
    .unwrap();

    config.apply_settings(&settings).unwrap();

    assert!(!config.optimize_path_geometry());
    assert!(!config.include_runtime_helpers());
    assert_eq!(config.primary_locale().as_str(), "pt-br");
    assert_eq!(config.default_font_name(), "Noto Sans");
    assert_eq!(config.image_failure_policy(), ImageFailurePolicy::Skip);
    assert_eq!(registry.get(FallbackSlot::Default).as_str(), "Noto Sans");
    assert_eq!(registry.get(FallbackSlot::Serif).as_str(), "Georgia");
    assert_eq!(registry.get(FallbackSlot::SansSerif).as_str(), "Custom Sans");
    assert_eq!(registry.get(FallbackSlot::Monospace).as_str(), "MS Gothic");
}

#[test]
fn rejected_setting_keeps_earlier_fields() {
    let mut config = isolated();
    let settings = RenderSettings::from_json(
        r#"{ "text-as-geometry": true, "default-font-name": "   " }"#,
    )
    .unwrap();

    assert_eq!(config.apply_settings(&settings), Err(ConfigError::EmptyFontName));
    assert!(config.text_as_geometry());
    assert_eq!(config.default_font_name(), "Arial Unicode MS");
}

#[test]
fn settings_survive_a_json_round_trip() {
    let mut config = isolated();
    config.set_text_as_geometry(true);
    config.set_image_failure_policy(ImageFailurePolicy::Placeholder);

    let json = config.settings().to_json().unwrap();
    let parsed = RenderSettings::from_json(&json).unwrap();
    assert_eq!(parsed, config.settings());
}
