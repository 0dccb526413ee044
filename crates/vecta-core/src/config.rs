//! Per-run translation policy
//!
//! [`RenderConfig`] decides how a document is translated: whether paths are
//! optimized, whether text is emitted as outlines, whether the output may lean
//! on the runtime helper layer, which locales drive shaping, and which font
//! family stands in when a document names none.
//!
//! Setters that validate return `Err` and keep the previous value. Nothing is
//! logged on rejection; the result is the only signal.

use crate::error::ConfigError;
use crate::font::{FallbackSlot, FontFallbackRegistry, FontFallbacks, FontFamily};
use crate::locale::Locale;
use crate::settings::RenderSettings;
use crate::SharedFallbackRegistry;

/// What a traversal does when an image cannot be resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFailurePolicy {
    /// Fail the whole traversal
    #[default]
    Abort,
    /// Leave the image out of the output
    Skip,
    /// Emit an empty box the size of the image node
    Placeholder,
}

impl std::str::FromStr for ImageFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            "placeholder" => Ok(Self::Placeholder),
            _ => Err(ConfigError::InvalidSetting {
                key: "image-failure-policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Translation policy for one run
///
/// Cloning copies every field by value. The fallback registry is the one thing
/// a clone shares with its source: both keep observing the same registry, and
/// [`set_default_font_name`](Self::set_default_font_name) on either writes
/// through to it.
///
/// ```
/// use vecta_core::RenderConfig;
///
/// let config = RenderConfig::new();
/// let mut copy = config.clone();
/// copy.set_text_as_geometry(true);
///
/// assert!(!config.text_as_geometry());
/// assert_eq!(config.neutral_locale().as_str(), "en-us");
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    optimize_path_geometry: bool,
    text_as_geometry: bool,
    include_runtime_helpers: bool,
    primary_locale: Locale,
    neutral_locale: Locale,
    default_font_name: FontFamily,
    image_failure_policy: ImageFailurePolicy,
    fallbacks: SharedFallbackRegistry,
}

impl RenderConfig {
    /// Defaults, bound to the process-wide fallback registry
    pub fn new() -> Self {
        Self::with_registry(FontFallbackRegistry::global().clone())
    }

    /// Defaults, bound to the given fallback registry
    pub fn with_registry(fallbacks: SharedFallbackRegistry) -> Self {
        Self {
            optimize_path_geometry: true,
            text_as_geometry: false,
            include_runtime_helpers: true,
            primary_locale: Locale::en_us(),
            neutral_locale: Locale::en_us(),
            default_font_name: FallbackSlot::Default.builtin(),
            image_failure_policy: ImageFailurePolicy::default(),
            fallbacks,
        }
    }

    /// Copies every setting of `template` into a new, independent instance
    ///
    /// The fallback registry is shared, not copied, and is left untouched.
    pub fn from_template(template: &RenderConfig) -> Self {
        Self {
            optimize_path_geometry: template.optimize_path_geometry,
            text_as_geometry: template.text_as_geometry,
            include_runtime_helpers: template.include_runtime_helpers,
            primary_locale: template.primary_locale.clone(),
            neutral_locale: template.neutral_locale.clone(),
            default_font_name: template.default_font_name.clone(),
            image_failure_policy: template.image_failure_policy,
            fallbacks: template.fallbacks.clone(),
        }
    }

    /// Defaults with any `VECTA_*` environment overrides applied
    ///
    /// Overrides that do not validate are logged and skipped.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.apply_env_settings(RenderSettings::from_env());
        config
    }

    /// Applies `VECTA_*` pairs one at a time, as [`from_env`](Self::from_env) does
    ///
    /// A pair that fails to parse or validate is logged and skipped; the
    /// others still apply.
    pub fn apply_vars<I, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: AsRef<str>,
    {
        self.apply_env_settings(RenderSettings::from_vars(vars));
    }

    fn apply_env_settings(&mut self, parsed: Vec<(&'static str, Result<RenderSettings, ConfigError>)>) {
        for (key, result) in parsed {
            match result.and_then(|settings| self.apply_settings(&settings)) {
                Ok(()) => log::debug!("Applied {} from environment", key),
                Err(err) => log::warn!("Ignoring {}: {}", key, err),
            }
        }
    }

    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::new()
    }

    pub fn optimize_path_geometry(&self) -> bool {
        self.optimize_path_geometry
    }

    pub fn set_optimize_path_geometry(&mut self, enabled: bool) {
        self.optimize_path_geometry = enabled;
    }

    pub fn text_as_geometry(&self) -> bool {
        self.text_as_geometry
    }

    pub fn set_text_as_geometry(&mut self, enabled: bool) {
        self.text_as_geometry = enabled;
    }

    /// Whether output may depend on the companion runtime layer
    ///
    /// With helpers, embedded image payloads are supported and no host-specific
    /// absolute font paths end up in the output.
    pub fn include_runtime_helpers(&self) -> bool {
        self.include_runtime_helpers
    }

    pub fn set_include_runtime_helpers(&mut self, enabled: bool) {
        self.include_runtime_helpers = enabled;
    }

    pub fn primary_locale(&self) -> &Locale {
        &self.primary_locale
    }

    /// Replaces the primary locale; `None` keeps the current one
    pub fn set_primary_locale(&mut self, locale: impl Into<Option<Locale>>) -> Result<(), ConfigError> {
        self.primary_locale = locale.into().ok_or(ConfigError::MissingLocale)?;
        Ok(())
    }

    /// Parses `tag` and makes it the primary locale
    pub fn set_primary_locale_tag(&mut self, tag: &str) -> Result<(), ConfigError> {
        self.set_primary_locale(Locale::parse(tag)?)
    }

    /// Locale fixed at construction
    pub fn neutral_locale(&self) -> &Locale {
        &self.neutral_locale
    }

    pub fn default_font_name(&self) -> &str {
        self.default_font_name.as_str()
    }

    /// Stores the trimmed name and points the registry's default slot at it
    ///
    /// This writes to the shared fallback registry, so every configuration
    /// bound to the same registry sees the new default family.
    pub fn set_default_font_name(&mut self, name: &str) -> Result<(), ConfigError> {
        let family = FontFamily::new(name).map_err(|_| ConfigError::EmptyFontName)?;
        self.fallbacks.set(FallbackSlot::Default, family.clone())?;
        self.default_font_name = family;
        Ok(())
    }

    pub fn image_failure_policy(&self) -> ImageFailurePolicy {
        self.image_failure_policy
    }

    pub fn set_image_failure_policy(&mut self, policy: ImageFailurePolicy) {
        self.image_failure_policy = policy;
    }

    /// The registry this configuration reads and writes fallbacks through
    pub fn fallback_registry(&self) -> &SharedFallbackRegistry {
        &self.fallbacks
    }

    /// Frozen copy of the current fallback families
    pub fn fallbacks(&self) -> FontFallbacks {
        self.fallbacks.snapshot()
    }

    /// Applies every field present in `settings`
    ///
    /// Fields are applied in declaration order; the first rejection stops the
    /// run and is returned, leaving earlier fields applied.
    pub fn apply_settings(&mut self, settings: &RenderSettings) -> Result<(), ConfigError> {
        if let Some(enabled) = settings.optimize_path_geometry {
            self.set_optimize_path_geometry(enabled);
        }
        if let Some(enabled) = settings.text_as_geometry {
            self.set_text_as_geometry(enabled);
        }
        if let Some(enabled) = settings.include_runtime_helpers {
            self.set_include_runtime_helpers(enabled);
        }
        if let Some(tag) = &settings.primary_locale {
            self.set_primary_locale_tag(tag)?;
        }
        if let Some(name) = &settings.default_font_name {
            self.set_default_font_name(name)?;
        }
        if let Some(policy) = settings.image_failure_policy {
            self.set_image_failure_policy(policy);
        }
        if let Some(fallbacks) = &settings.fallbacks {
            let overrides = [
                (FallbackSlot::Serif, &fallbacks.serif),
                (FallbackSlot::SansSerif, &fallbacks.sans_serif),
                (FallbackSlot::Monospace, &fallbacks.monospace),
            ];
            for (slot, name) in overrides {
                if let Some(name) = name {
                    self.fallbacks.set_name(slot, name)?;
                }
            }
        }
        Ok(())
    }

    /// Current values as settings, fallbacks included
    pub fn settings(&self) -> RenderSettings {
        let fallbacks = self.fallbacks();
        RenderSettings {
            optimize_path_geometry: Some(self.optimize_path_geometry),
            text_as_geometry: Some(self.text_as_geometry),
            include_runtime_helpers: Some(self.include_runtime_helpers),
            primary_locale: Some(self.primary_locale.to_string()),
            default_font_name: Some(self.default_font_name.to_string()),
            image_failure_policy: Some(self.image_failure_policy),
            fallbacks: Some(crate::settings::FallbackSettings {
                serif: Some(fallbacks.get(FallbackSlot::Serif).to_string()),
                sans_serif: Some(fallbacks.get(FallbackSlot::SansSerif).to_string()),
                monospace: Some(fallbacks.get(FallbackSlot::Monospace).to_string()),
            }),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a [`RenderConfig`], validating everything at [`build`](Self::build)
///
/// ```
/// use vecta_core::{ImageFailurePolicy, RenderConfig};
///
/// let config = RenderConfig::builder()
///     .text_as_geometry(true)
///     .primary_locale("de-DE")
///     .image_failure_policy(ImageFailurePolicy::Skip)
///     .build()?;
///
/// assert_eq!(config.primary_locale().as_str(), "de-de");
/// # Ok::<(), vecta_core::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct RenderConfigBuilder {
    settings: RenderSettings,
    registry: Option<SharedFallbackRegistry>,
}

impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optimize_path_geometry(mut self, enabled: bool) -> Self {
        self.settings.optimize_path_geometry = Some(enabled);
        self
    }

    pub fn text_as_geometry(mut self, enabled: bool) -> Self {
        self.settings.text_as_geometry = Some(enabled);
        self
    }

    pub fn include_runtime_helpers(mut self, enabled: bool) -> Self {
        self.settings.include_runtime_helpers = Some(enabled);
        self
    }

    pub fn primary_locale(mut self, tag: impl Into<String>) -> Self {
        self.settings.primary_locale = Some(tag.into());
        self
    }

    pub fn default_font_name(mut self, name: impl Into<String>) -> Self {
        self.settings.default_font_name = Some(name.into());
        self
    }

    pub fn image_failure_policy(mut self, policy: ImageFailurePolicy) -> Self {
        self.settings.image_failure_policy = Some(policy);
        self
    }

    /// Binds the configuration to a specific registry instead of the global one
    pub fn registry(mut self, registry: SharedFallbackRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Validates the collected settings and produces the configuration
    ///
    /// Values are checked before anything is written, so a failed build never
    /// touches the fallback registry.
    pub fn build(self) -> Result<RenderConfig, ConfigError> {
        if let Some(tag) = &self.settings.primary_locale {
            Locale::parse(tag)?;
        }
        if let Some(name) = &self.settings.default_font_name {
            FontFamily::new(name).map_err(|_| ConfigError::EmptyFontName)?;
        }

        let mut config = match self.registry {
            Some(registry) => RenderConfig::with_registry(registry),
            None => RenderConfig::new(),
        };
        config.apply_settings(&self.settings)?;
        Ok(config)
    }
}
