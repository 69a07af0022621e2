// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Presentation settings value types (full and partial) and the recognized key set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SettingsError;

/// Accent color preset. Tags outside the built-in set are kept as [`ColorPreset::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPreset {
    /// Blue accent.
    Blue,
    /// Cyan accent.
    Cyan,
    /// Green accent.
    Green,
    /// Indigo accent (default).
    #[default]
    Indigo,
    /// Purple accent.
    Purple,
    /// Host-defined preset, carried verbatim.
    #[serde(untagged)]
    Other(String),
}

/// Contrast level. Unlisted levels are kept as [`Contrast::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    /// Standard contrast (default).
    #[default]
    Normal,
    /// High contrast.
    High,
    /// Host-defined level, carried verbatim.
    #[serde(untagged)]
    Other(String),
}

/// Text/layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left-to-right (default).
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
}

/// Navigation layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Top bar navigation.
    Horizontal,
    /// Side bar navigation (default).
    #[default]
    Vertical,
    /// Host-defined layout, carried verbatim.
    #[serde(untagged)]
    Other(String),
}

/// Navigation surface coloring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavColor {
    /// Navigation blends into the page background.
    BlendIn,
    /// Subtle separation from the page.
    Discreet,
    /// Strongly separated navigation (default).
    #[default]
    Evident,
    /// Host-defined coloring, carried verbatim.
    #[serde(untagged)]
    Other(String),
}

/// Light or dark palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    /// Light palette (default).
    #[default]
    Light,
    /// Dark palette.
    Dark,
}

/// Complete presentation settings. Every field is always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Accent color preset.
    pub color_preset: ColorPreset,
    /// Contrast level.
    pub contrast: Contrast,
    /// Layout direction.
    pub direction: Direction,
    /// Navigation layout.
    pub layout: Layout,
    /// Navigation coloring.
    pub nav_color: NavColor,
    /// Light or dark palette.
    pub palette_mode: PaletteMode,
    /// Scale typography with the viewport.
    pub responsive_font_sizes: bool,
    /// Let content stretch to the full viewport width.
    pub stretch: bool,
}

/// The built-in default set.
pub const DEFAULT_SETTINGS: Settings = Settings {
    color_preset: ColorPreset::Indigo,
    contrast: Contrast::Normal,
    direction: Direction::Ltr,
    layout: Layout::Vertical,
    nav_color: NavColor::Evident,
    palette_mode: PaletteMode::Light,
    responsive_font_sizes: true,
    stretch: false,
};

impl Default for Settings {
    fn default() -> Self {
        DEFAULT_SETTINGS
    }
}

impl Settings {
    /// True when `self` and `other` hold different values for `key`.
    pub fn differs_at(&self, other: &Self, key: SettingKey) -> bool {
        match key {
            SettingKey::ColorPreset => self.color_preset != other.color_preset,
            SettingKey::Contrast => self.contrast != other.contrast,
            SettingKey::Direction => self.direction != other.direction,
            SettingKey::Layout => self.layout != other.layout,
            SettingKey::NavColor => self.nav_color != other.nav_color,
            SettingKey::PaletteMode => self.palette_mode != other.palette_mode,
            SettingKey::ResponsiveFontSizes => {
                self.responsive_font_sizes != other.responsive_font_sizes
            }
            SettingKey::Stretch => self.stretch != other.stretch,
        }
    }
}

/// Caller-supplied overrides. `None` means "not supplied".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSettings {
    /// Accent color preset override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_preset: Option<ColorPreset>,
    /// Contrast override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<Contrast>,
    /// Direction override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Layout override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    /// Navigation coloring override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_color: Option<NavColor>,
    /// Palette override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_mode: Option<PaletteMode>,
    /// Responsive typography override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive_font_sizes: Option<bool>,
    /// Stretch override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stretch: Option<bool>,
}

impl PartialSettings {
    /// Overlay the supplied fields onto `base`; omitted fields keep `base`'s values.
    pub fn apply_to(&self, base: &Settings) -> Settings {
        Settings {
            color_preset: overlay(self.color_preset.as_ref(), &base.color_preset),
            contrast: overlay(self.contrast.as_ref(), &base.contrast),
            direction: self.direction.unwrap_or(base.direction),
            layout: overlay(self.layout.as_ref(), &base.layout),
            nav_color: overlay(self.nav_color.as_ref(), &base.nav_color),
            palette_mode: self.palette_mode.unwrap_or(base.palette_mode),
            responsive_font_sizes: self
                .responsive_font_sizes
                .unwrap_or(base.responsive_font_sizes),
            stretch: self.stretch.unwrap_or(base.stretch),
        }
    }

    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Keys that carry an override.
    pub fn supplied_keys(&self) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|key| self.supplies(*key))
            .collect()
    }

    fn supplies(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::ColorPreset => self.color_preset.is_some(),
            SettingKey::Contrast => self.contrast.is_some(),
            SettingKey::Direction => self.direction.is_some(),
            SettingKey::Layout => self.layout.is_some(),
            SettingKey::NavColor => self.nav_color.is_some(),
            SettingKey::PaletteMode => self.palette_mode.is_some(),
            SettingKey::ResponsiveFontSizes => self.responsive_font_sizes.is_some(),
            SettingKey::Stretch => self.stretch.is_some(),
        }
    }
}

fn overlay<T: Clone>(supplied: Option<&T>, base: &T) -> T {
    supplied.unwrap_or(base).clone()
}

impl From<Settings> for PartialSettings {
    fn from(settings: Settings) -> Self {
        Self {
            color_preset: Some(settings.color_preset),
            contrast: Some(settings.contrast),
            direction: Some(settings.direction),
            layout: Some(settings.layout),
            nav_color: Some(settings.nav_color),
            palette_mode: Some(settings.palette_mode),
            responsive_font_sizes: Some(settings.responsive_font_sizes),
            stretch: Some(settings.stretch),
        }
    }
}

/// The eight recognized settings keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    /// `colorPreset`
    ColorPreset,
    /// `contrast`
    Contrast,
    /// `direction`
    Direction,
    /// `layout`
    Layout,
    /// `navColor`
    NavColor,
    /// `paletteMode`
    PaletteMode,
    /// `responsiveFontSizes`
    ResponsiveFontSizes,
    /// `stretch`
    Stretch,
}

impl SettingKey {
    /// All keys in canonical order.
    pub const ALL: [Self; 8] = [
        Self::ColorPreset,
        Self::Contrast,
        Self::Direction,
        Self::Layout,
        Self::NavColor,
        Self::PaletteMode,
        Self::ResponsiveFontSizes,
        Self::Stretch,
    ];

    /// Wire name (camelCase) of the key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColorPreset => "colorPreset",
            Self::Contrast => "contrast",
            Self::Direction => "direction",
            Self::Layout => "layout",
            Self::NavColor => "navColor",
            Self::PaletteMode => "paletteMode",
            Self::ResponsiveFontSizes => "responsiveFontSizes",
            Self::Stretch => "stretch",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_owned()))
    }
}
