// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Default set, merge, and customization diff.

use serde_json::Value;
use tracing::warn;

use crate::{PartialSettings, SettingKey, Settings, DEFAULT_SETTINGS};

/// Holds the default set and derives complete settings from partial input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    defaults: Settings,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    /// Store over the built-in defaults.
    pub const fn new() -> Self {
        Self {
            defaults: DEFAULT_SETTINGS,
        }
    }

    /// The default set.
    pub const fn defaults(&self) -> &Settings {
        &self.defaults
    }

    /// Complete settings: defaults with every supplied field of `partial` on top.
    pub fn merge(&self, partial: Option<&PartialSettings>) -> Settings {
        partial.map_or_else(|| self.defaults.clone(), |p| p.apply_to(&self.defaults))
    }

    /// Project an arbitrary JSON object onto the recognized keys and merge it.
    ///
    /// Unrecognized keys and malformed values are dropped; a non-object value
    /// projects to the defaults.
    pub fn project(&self, value: &Value) -> Settings {
        PartialSettings::from_value(value).map_or_else(
            |err| {
                warn!(%err, "projecting settings input to the defaults");
                self.merge(None)
            },
            |partial| self.merge(Some(&partial)),
        )
    }

    /// Keys whose value deviates from the default set, in canonical order.
    pub fn customized_keys(&self, settings: &Settings) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|key| settings.differs_at(&self.defaults, *key))
            .collect()
    }

    /// True iff any recognized field differs from the default set.
    pub fn is_custom(&self, settings: &Settings) -> bool {
        SettingKey::ALL
            .into_iter()
            .any(|key| settings.differs_at(&self.defaults, key))
    }
}
