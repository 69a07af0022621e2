// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host-facing port for settings changes (persistence and re-render live behind it).

use std::fmt;

use crate::Settings;

/// Outbound callbacks the controller invokes; the only side effects of a settings change.
pub trait SettingsHooks {
    /// Receive the complete next settings value computed by `update`.
    fn on_update(&self, settings: Settings);
    /// The user asked to restore defaults.
    fn on_reset(&self);
}

/// Hooks that ignore every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl SettingsHooks for NoopHooks {
    fn on_update(&self, _settings: Settings) {}

    fn on_reset(&self) {}
}

type UpdateFn = Box<dyn Fn(Settings)>;
type ResetFn = Box<dyn Fn()>;

/// Closure-backed hooks; a missing closure behaves as a no-op.
#[derive(Default)]
pub struct FnHooks {
    update: Option<UpdateFn>,
    reset: Option<ResetFn>,
}

impl FnHooks {
    /// Hooks with neither callback set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `on_update` callback.
    #[must_use]
    pub fn with_update<F>(mut self, f: F) -> Self
    where
        F: Fn(Settings) + 'static,
    {
        self.update = Some(Box::new(f));
        self
    }

    /// Set the `on_reset` callback.
    #[must_use]
    pub fn with_reset<F>(mut self, f: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.reset = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for FnHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHooks")
            .field("update", &self.update.is_some())
            .field("reset", &self.reset.is_some())
            .finish()
    }
}

impl SettingsHooks for FnHooks {
    fn on_update(&self, settings: Settings) {
        if let Some(update) = &self.update {
            update(settings);
        }
    }

    fn on_reset(&self) {
        if let Some(reset) = &self.reset {
            reset();
        }
    }
}
