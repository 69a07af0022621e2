// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Presentation settings for interactive tools.
//!
//! Two pieces compose the whole:
//!
//! - [`SettingsStore`] — pure data: the default set, merging partial input over
//!   it, and the customization diff.
//! - [`SettingsController`] — owns the transient drawer flag, publishes an
//!   immutable [`Snapshot`] to subscribers and forwards `update`/`reset` to
//!   host [`SettingsHooks`].
//!
//! # Data Flow
//!
//! The controller is not the system of record. `update` computes the full next
//! value and hands it to the host; the host persists it (or not) and feeds it
//! back through [`SettingsController::set_initial_settings`].

use thiserror::Error;

/// Errors raised at the JSON input boundary. Controller operations never fail.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Input was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Input parsed but the top-level value is not an object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
    /// Name does not match any recognized settings key.
    #[error("unknown settings key: {0}")]
    UnknownKey(String),
    /// `KEY=VALUE` assignment without a `=`.
    #[error("invalid assignment (expected KEY=VALUE): {0}")]
    InvalidAssignment(String),
}

mod controller;
mod decode;
mod hooks;
mod model;
mod store;
pub mod ui_state;

pub use controller::{
    SettingsController, SettingsControllerBuilder, SettingsHandles, Snapshot, Subscription,
};
pub use decode::parse_assignment;
pub use hooks::{FnHooks, NoopHooks, SettingsHooks};
pub use model::{
    ColorPreset, Contrast, Direction, Layout, NavColor, PaletteMode, PartialSettings,
    SettingKey, Settings, DEFAULT_SETTINGS,
};
pub use store::SettingsStore;
pub use ui_state::{DrawerEvent, UiState};
