// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure state transitions for the settings drawer.

use serde::{Deserialize, Serialize};

/// Transient interface state. Never merged with caller input; starts closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Whether the settings drawer is open.
    pub open_drawer: bool,
}

/// Drawer transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerEvent {
    /// Open the drawer.
    Open,
    /// Close the drawer.
    Close,
}

/// Apply `ev` to `ui`. Both transitions are idempotent.
pub fn reduce(ui: UiState, ev: DrawerEvent) -> UiState {
    let mut next = ui;
    match ev {
        DrawerEvent::Open => next.open_drawer = true,
        DrawerEvent::Close => next.open_drawer = false,
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        assert!(!UiState::default().open_drawer);
    }

    #[test]
    fn open_then_close() {
        let ui = UiState::default();
        let opened = reduce(ui, DrawerEvent::Open);
        assert!(opened.open_drawer);
        let closed = reduce(opened, DrawerEvent::Close);
        assert_eq!(closed, UiState::default());
    }

    #[test]
    fn transitions_are_idempotent() {
        let once = reduce(UiState::default(), DrawerEvent::Open);
        assert_eq!(reduce(once, DrawerEvent::Open), once);
        let closed = reduce(UiState::default(), DrawerEvent::Close);
        assert_eq!(closed, UiState::default());
    }
}
