// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Lenient JSON input for partial settings.
//!
//! Only the eight recognized keys are read; everything else in the object is
//! discarded. Tag strings outside the built-in sets are carried verbatim; a
//! recognized key whose value has the wrong JSON shape (a number where a tag
//! or flag belongs) is left unsupplied instead of failing the whole input.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{trace, warn};

use crate::{PartialSettings, SettingKey, SettingsError};

impl PartialSettings {
    /// Parse a JSON document into partial settings.
    pub fn from_json(input: &str) -> Result<Self, SettingsError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    /// Project a JSON object onto the recognized keys.
    pub fn from_value(value: &Value) -> Result<Self, SettingsError> {
        let Value::Object(map) = value else {
            return Err(SettingsError::NotAnObject(json_kind(value)));
        };
        let mut out = Self::default();
        for (name, raw) in map {
            match name.parse::<SettingKey>() {
                Ok(key) => out.set_raw(key, raw),
                Err(_) => trace!(key = %name, "ignoring unrecognized settings key"),
            }
        }
        Ok(out)
    }

    /// Build partial settings from already-split `(key, value)` pairs.
    ///
    /// Later pairs win over earlier ones for the same key.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (SettingKey, Value)>,
    {
        let mut out = Self::default();
        for (key, raw) in pairs {
            out.set_raw(key, &raw);
        }
        out
    }

    fn set_raw(&mut self, key: SettingKey, raw: &Value) {
        let result = match key {
            SettingKey::ColorPreset => decode(raw).map(|v| self.color_preset = Some(v)),
            SettingKey::Contrast => decode(raw).map(|v| self.contrast = Some(v)),
            SettingKey::Direction => decode(raw).map(|v| self.direction = Some(v)),
            SettingKey::Layout => decode(raw).map(|v| self.layout = Some(v)),
            SettingKey::NavColor => decode(raw).map(|v| self.nav_color = Some(v)),
            SettingKey::PaletteMode => decode(raw).map(|v| self.palette_mode = Some(v)),
            SettingKey::ResponsiveFontSizes => {
                decode(raw).map(|v| self.responsive_font_sizes = Some(v))
            }
            SettingKey::Stretch => decode(raw).map(|v| self.stretch = Some(v)),
        };
        if let Err(err) = result {
            warn!(key = %key, %err, "ignoring malformed settings value");
        }
    }
}

fn decode<T: DeserializeOwned>(raw: &Value) -> Result<T, serde_json::Error> {
    T::deserialize(raw)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Split a `KEY=VALUE` assignment.
///
/// VALUE is read as JSON when it parses (`true`, `"x"`), otherwise taken as a
/// bare string (`cyan`).
pub fn parse_assignment(raw: &str) -> Result<(SettingKey, Value), SettingsError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| SettingsError::InvalidAssignment(raw.to_owned()))?;
    let key = name.trim().parse::<SettingKey>()?;
    let value = value.trim();
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::{ColorPreset, Contrast, NavColor, PaletteMode};
    use serde_json::json;

    #[test]
    fn extraneous_keys_are_discarded() {
        let partial = PartialSettings::from_value(&json!({
            "paletteMode": "dark",
            "openDrawer": true,
            "isCustom": false,
            "handleUpdate": null,
        }))
        .expect("object input");
        assert_eq!(partial.palette_mode, Some(PaletteMode::Dark));
        assert_eq!(partial.supplied_keys(), vec![SettingKey::PaletteMode]);
    }

    #[test]
    fn wrong_json_shapes_are_not_overridden() {
        let partial = PartialSettings::from_value(&json!({
            "stretch": "yes",
            "colorPreset": 7,
            "navColor": "blend-in",
        }))
        .expect("object input");
        assert_eq!(partial.stretch, None);
        assert_eq!(partial.color_preset, None);
        assert_eq!(partial.nav_color, Some(NavColor::BlendIn));
    }

    #[test]
    fn unlisted_tags_are_supplied_verbatim() {
        let partial = PartialSettings::from_value(&json!({
            "colorPreset": "teal",
            "contrast": "medium",
        }))
        .expect("object input");
        assert_eq!(partial.color_preset, Some(ColorPreset::Other("teal".into())));
        assert_eq!(partial.contrast, Some(Contrast::Other("medium".into())));
        assert_eq!(
            partial.supplied_keys(),
            vec![SettingKey::ColorPreset, SettingKey::Contrast]
        );
    }

    #[test]
    fn non_object_input_is_rejected() {
        let err = PartialSettings::from_json("[1, 2]").err();
        assert!(matches!(err, Some(SettingsError::NotAnObject("array"))));
        let err = PartialSettings::from_json("{not json").err();
        assert!(matches!(err, Some(SettingsError::Json(_))));
    }

    #[test]
    fn assignments_accept_bare_strings_and_json() {
        let (key, value) = parse_assignment("colorPreset=cyan").expect("assignment");
        assert_eq!(key, SettingKey::ColorPreset);
        assert_eq!(value, json!("cyan"));

        let (key, value) = parse_assignment("stretch = true").expect("assignment");
        assert_eq!(key, SettingKey::Stretch);
        assert_eq!(value, json!(true));

        assert!(matches!(
            parse_assignment("stretch"),
            Err(SettingsError::InvalidAssignment(_))
        ));
        assert!(matches!(
            parse_assignment("openDrawer=true"),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn later_pairs_win() {
        let partial = PartialSettings::from_pairs([
            (SettingKey::ColorPreset, json!("green")),
            (SettingKey::ColorPreset, json!("cyan")),
        ]);
        assert_eq!(partial.color_preset, Some(ColorPreset::Cyan));
    }
}
