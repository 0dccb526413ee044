// this_file: crates/vecta-core/src/font.rs

//! Font families and the fallback registry
//!
//! Looking up and registering font families on the host is expensive, so the
//! fallback families are kept in one shared registry instead of being copied
//! into every [`RenderConfig`](crate::RenderConfig). The registry is shared,
//! mutable state: every configuration bound to it sees every override, and
//! when two configurations set different default font names the last writer
//! wins.
//!
//! Most callers use the process-wide registry through the free functions in
//! this module. Drivers that render several documents concurrently should
//! inject their own registry with
//! [`RenderConfig::with_registry`](crate::RenderConfig::with_registry), or hand
//! a [`FontFallbacks`] snapshot down the traversal.
//!
//! ```
//! use vecta_core::font::{FallbackSlot, FontFallbackRegistry, FontFamily};
//!
//! let registry = FontFallbackRegistry::new();
//! assert_eq!(registry.get(FallbackSlot::SansSerif).as_str(), "Tahoma");
//!
//! registry.set(FallbackSlot::SansSerif, FontFamily::new("Custom Sans")?)?;
//! assert_eq!(registry.get(FallbackSlot::SansSerif).as_str(), "Custom Sans");
//! # Ok::<(), vecta_core::ConfigError>(())
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::error::ConfigError;

/// Family used when nothing else is specified
pub const DEFAULT_FONT_FAMILY: &str = "Arial Unicode MS";
/// Family behind the generic `serif` keyword
pub const SERIF_FONT_FAMILY: &str = "Times New Roman";
/// Family behind the generic `sans-serif` keyword
pub const SANS_SERIF_FONT_FAMILY: &str = "Tahoma";
/// Family behind the generic `monospace` keyword
pub const MONOSPACE_FONT_FAMILY: &str = "MS Gothic";

/// A font family identified by name
///
/// The name is not checked against installed fonts. It is only guaranteed to
/// be trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontFamily {
    name: Arc<str>,
}

impl FontFamily {
    /// Builds a family from a name, trimming surrounding whitespace
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyFontFamily);
        }
        Ok(Self { name: name.into() })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for FontFamily {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// The four fallback slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackSlot {
    Default,
    Serif,
    SansSerif,
    Monospace,
}

impl FallbackSlot {
    pub const ALL: [FallbackSlot; 4] = [
        FallbackSlot::Default,
        FallbackSlot::Serif,
        FallbackSlot::SansSerif,
        FallbackSlot::Monospace,
    ];

    /// Name the slot materializes to when never overridden
    pub const fn builtin_name(self) -> &'static str {
        match self {
            FallbackSlot::Default => DEFAULT_FONT_FAMILY,
            FallbackSlot::Serif => SERIF_FONT_FAMILY,
            FallbackSlot::SansSerif => SANS_SERIF_FONT_FAMILY,
            FallbackSlot::Monospace => MONOSPACE_FONT_FAMILY,
        }
    }

    /// Maps a CSS generic family keyword to its slot
    pub fn from_generic(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "serif" => Some(FallbackSlot::Serif),
            "sans-serif" => Some(FallbackSlot::SansSerif),
            "monospace" => Some(FallbackSlot::Monospace),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            FallbackSlot::Default => 0,
            FallbackSlot::Serif => 1,
            FallbackSlot::SansSerif => 2,
            FallbackSlot::Monospace => 3,
        }
    }

    pub(crate) fn builtin(self) -> FontFamily {
        FontFamily {
            name: Arc::from(self.builtin_name()),
        }
    }
}

/// Shared handle to a registry
pub type SharedFallbackRegistry = Arc<FontFallbackRegistry>;

/// Lazily materialized fallback families
///
/// Slots start empty and are filled with their built-in family on first read.
/// Overrides replace a slot until the next override or [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct FontFallbackRegistry {
    slots: RwLock<[Option<FontFamily>; 4]>,
}

static GLOBAL_REGISTRY: OnceLock<SharedFallbackRegistry> = OnceLock::new();

impl FontFallbackRegistry {
    /// Creates a registry with every slot still unmaterialized
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first access
    pub fn global() -> &'static SharedFallbackRegistry {
        GLOBAL_REGISTRY.get_or_init(|| Arc::new(FontFallbackRegistry::new()))
    }

    /// Reads a slot, materializing its built-in family on first access
    pub fn get(&self, slot: FallbackSlot) -> FontFamily {
        if let Some(family) = &self.slots.read()[slot.index()] {
            return family.clone();
        }

        // Re-check under the write lock; another reader may have won the race
        let mut slots = self.slots.write();
        slots[slot.index()]
            .get_or_insert_with(|| {
                log::trace!("Materializing {:?} fallback as {}", slot, slot.builtin_name());
                slot.builtin()
            })
            .clone()
    }

    /// Overrides a slot; `None` leaves the current family in place
    pub fn set(
        &self,
        slot: FallbackSlot,
        family: impl Into<Option<FontFamily>>,
    ) -> Result<(), ConfigError> {
        let family = family.into().ok_or(ConfigError::MissingFontFamily)?;
        log::debug!("Fallback {:?} set to {}", slot, family);
        self.slots.write()[slot.index()] = Some(family);
        Ok(())
    }

    /// Overrides a slot by family name
    pub fn set_name(&self, slot: FallbackSlot, name: &str) -> Result<(), ConfigError> {
        self.set(slot, FontFamily::new(name)?)
    }

    /// Whether the slot has been read or written yet
    pub fn is_materialized(&self, slot: FallbackSlot) -> bool {
        self.slots.read()[slot.index()].is_some()
    }

    /// Drops every override; slots go back to their built-ins on next read
    pub fn reset(&self) {
        *self.slots.write() = Default::default();
    }

    /// Immutable copy of all four slots, materializing any that are empty
    pub fn snapshot(&self) -> FontFallbacks {
        FontFallbacks {
            families: FallbackSlot::ALL.map(|slot| self.get(slot)),
        }
    }

    pub fn default_family(&self) -> FontFamily {
        self.get(FallbackSlot::Default)
    }

    pub fn serif(&self) -> FontFamily {
        self.get(FallbackSlot::Serif)
    }

    pub fn sans_serif(&self) -> FontFamily {
        self.get(FallbackSlot::SansSerif)
    }

    pub fn monospace(&self) -> FontFamily {
        self.get(FallbackSlot::Monospace)
    }
}

/// A frozen view of the fallback families
///
/// Hand this down a traversal when later registry writes must not leak into a
/// document that is already being translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFallbacks {
    families: [FontFamily; 4],
}

impl FontFallbacks {
    /// The built-in families, without touching any registry
    pub fn builtin() -> Self {
        Self {
            families: FallbackSlot::ALL.map(FallbackSlot::builtin),
        }
    }

    pub fn get(&self, slot: FallbackSlot) -> &FontFamily {
        &self.families[slot.index()]
    }

    /// Picks a family for a CSS-style `font-family` list
    ///
    /// The first concrete name wins. Generic keywords map to their slot. An
    /// empty list falls back to the default slot.
    pub fn resolve(&self, family_list: &str) -> FontFamily {
        for entry in family_list.split(',') {
            let name = entry.trim().trim_matches(|c: char| c == '"' || c == '\'');
            if let Some(slot) = FallbackSlot::from_generic(name) {
                return self.get(slot).clone();
            }
            if let Ok(family) = FontFamily::new(name) {
                return family;
            }
        }
        self.get(FallbackSlot::Default).clone()
    }
}

/// Default fallback from the process-wide registry
pub fn default_family() -> FontFamily {
    FontFallbackRegistry::global().default_family()
}

/// Serif fallback from the process-wide registry
pub fn serif() -> FontFamily {
    FontFallbackRegistry::global().serif()
}

/// Sans-serif fallback from the process-wide registry
pub fn sans_serif() -> FontFamily {
    FontFallbackRegistry::global().sans_serif()
}

/// Monospace fallback from the process-wide registry
pub fn monospace() -> FontFamily {
    FontFallbackRegistry::global().monospace()
}

pub fn set_default_family(family: impl Into<Option<FontFamily>>) -> Result<(), ConfigError> {
    FontFallbackRegistry::global().set(FallbackSlot::Default, family)
}

pub fn set_serif(family: impl Into<Option<FontFamily>>) -> Result<(), ConfigError> {
    FontFallbackRegistry::global().set(FallbackSlot::Serif, family)
}

pub fn set_sans_serif(family: impl Into<Option<FontFamily>>) -> Result<(), ConfigError> {
    FontFallbackRegistry::global().set(FallbackSlot::SansSerif, family)
}

pub fn set_monospace(family: impl Into<Option<FontFamily>>) -> Result<(), ConfigError> {
    FontFallbackRegistry::global().set(FallbackSlot::Monospace, family)
}
