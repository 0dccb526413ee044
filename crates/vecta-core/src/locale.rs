//! Locale descriptors handed to the text-shaping layer
//!
//! A locale here is just a normalized language tag. `"en_US"`, `"EN-us"` and
//! `"en-us"` all describe the same locale and compare equal. Nothing in this
//! module knows which locales a shaper actually supports.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ConfigError;

/// The tag every configuration starts from
pub const NEUTRAL_LOCALE_TAG: &str = "en-us";

/// A language-region identifier such as `en-us` or `zh-hant-tw`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    tag: Arc<str>,
}

impl Locale {
    /// Parses a tag, accepting `-` or `_` as the subtag separator
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidLocale(tag.to_string());

        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let mut subtags = Vec::new();
        for (index, subtag) in trimmed.split(['-', '_']).enumerate() {
            let valid = if index == 0 {
                (2..=8).contains(&subtag.len()) && subtag.bytes().all(|b| b.is_ascii_alphabetic())
            } else {
                (1..=8).contains(&subtag.len()) && subtag.bytes().all(|b| b.is_ascii_alphanumeric())
            };
            if !valid {
                return Err(invalid());
            }
            subtags.push(subtag.to_ascii_lowercase());
        }

        Ok(Self {
            tag: subtags.join("-").into(),
        })
    }

    /// The neutral `en-us` locale
    pub fn en_us() -> Self {
        Self {
            tag: Arc::from(NEUTRAL_LOCALE_TAG),
        }
    }

    /// Normalized tag, lowercase and `-` separated
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Primary language subtag
    pub fn language(&self) -> &str {
        self.tag.split('-').next().unwrap_or_default()
    }

    /// Region subtag (two letters or three digits), if the tag carries one
    pub fn region(&self) -> Option<&str> {
        self.tag.split('-').skip(1).find(|subtag| {
            (subtag.len() == 2 && subtag.bytes().all(|b| b.is_ascii_alphabetic()))
                || (subtag.len() == 3 && subtag.bytes().all(|b| b.is_ascii_digit()))
        })
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.tag
    }
}
