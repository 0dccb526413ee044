//! Serializable configuration input
//!
//! [`RenderSettings`] is the on-disk and environment form of a
//! [`RenderConfig`](crate::RenderConfig). Every field is optional; absent fields
//! leave the configuration as it is.
//!
//! ```json
//! {
//!   "text-as-geometry": true,
//!   "primary-locale": "de-DE",
//!   "default-font-name": "Noto Sans",
//!   "image-failure-policy": "placeholder",
//!   "fallbacks": { "monospace": "Consolas" }
//! }
//! ```
//!
//! # Environment Variables
//!
//! | variable | field |
//! |----------|-------|
//! | `VECTA_OPTIMIZE_PATHS` | `optimize-path-geometry` |
//! | `VECTA_TEXT_AS_GEOMETRY` | `text-as-geometry` |
//! | `VECTA_RUNTIME_HELPERS` | `include-runtime-helpers` |
//! | `VECTA_LOCALE` | `primary-locale` |
//! | `VECTA_DEFAULT_FONT` | `default-font-name` |
//! | `VECTA_IMAGE_FAILURES` | `image-failure-policy` |

use serde::{Deserialize, Serialize};

use crate::config::ImageFailurePolicy;
use crate::error::ConfigError;

pub const ENV_OPTIMIZE_PATHS: &str = "VECTA_OPTIMIZE_PATHS";
pub const ENV_TEXT_AS_GEOMETRY: &str = "VECTA_TEXT_AS_GEOMETRY";
pub const ENV_RUNTIME_HELPERS: &str = "VECTA_RUNTIME_HELPERS";
pub const ENV_LOCALE: &str = "VECTA_LOCALE";
pub const ENV_DEFAULT_FONT: &str = "VECTA_DEFAULT_FONT";
pub const ENV_IMAGE_FAILURES: &str = "VECTA_IMAGE_FAILURES";

const ENV_KEYS: [&str; 6] = [
    ENV_OPTIMIZE_PATHS,
    ENV_TEXT_AS_GEOMETRY,
    ENV_RUNTIME_HELPERS,
    ENV_LOCALE,
    ENV_DEFAULT_FONT,
    ENV_IMAGE_FAILURES,
];

/// Optional values for every configurable field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimize_path_geometry: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_as_geometry: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_runtime_helpers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_font_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_failure_policy: Option<ImageFailurePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallbacks: Option<FallbackSettings>,
}

/// Overrides for the generic fallback slots
///
/// The default slot is driven by `default-font-name` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FallbackSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serif: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sans_serif: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monospace: Option<String>,
}

impl RenderSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One settings value per `VECTA_*` variable present in the environment
    pub fn from_env() -> Vec<(&'static str, Result<RenderSettings, ConfigError>)> {
        Self::from_vars(ENV_KEYS.iter().filter_map(|key| {
            std::env::var(key).ok().map(|value| (*key, value))
        }))
    }

    /// Same as [`from_env`](Self::from_env), reading from the given pairs
    ///
    /// Unknown keys are ignored.
    pub fn from_vars<I, V>(vars: I) -> Vec<(&'static str, Result<RenderSettings, ConfigError>)>
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: AsRef<str>,
    {
        vars.into_iter()
            .filter(|(key, _)| ENV_KEYS.contains(key))
            .map(|(key, value)| (key, Self::from_var(key, value.as_ref())))
            .collect()
    }

    fn from_var(key: &str, value: &str) -> Result<RenderSettings, ConfigError> {
        let mut settings = RenderSettings::default();
        match key {
            ENV_OPTIMIZE_PATHS => settings.optimize_path_geometry = Some(parse_flag(key, value)?),
            ENV_TEXT_AS_GEOMETRY => settings.text_as_geometry = Some(parse_flag(key, value)?),
            ENV_RUNTIME_HELPERS => settings.include_runtime_helpers = Some(parse_flag(key, value)?),
            ENV_LOCALE => settings.primary_locale = Some(value.to_string()),
            ENV_DEFAULT_FONT => settings.default_font_name = Some(value.to_string()),
            ENV_IMAGE_FAILURES => settings.image_failure_policy = Some(value.parse()?),
            _ => {}
        }
        Ok(settings)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
