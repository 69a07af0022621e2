// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Settings controller: drawer state, snapshot publishing, and hook forwarding.
//!
//! # Invariants
//!
//! - Exactly one live [`Snapshot`] per controller; a state change swaps in a new
//!   `Rc<Snapshot>` and never mutates a published one.
//! - `update` and `reset` only call hooks. The controller's settings change only
//!   through [`SettingsController::set_initial_settings`].
//! - No internal borrow is held while hooks or subscribers run, so either may
//!   call back into the controller.
//! - Snapshots reach every subscriber in publication order. A publish triggered
//!   from inside a subscriber is queued until the current one has reached all
//!   subscribers, so the last snapshot any subscriber sees is the live one.
//!
//! Single-threaded: the controller is `Rc`-shared and `!Send`.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;
use tracing::{debug, trace};

use crate::hooks::{FnHooks, NoopHooks, SettingsHooks};
use crate::ui_state::{self, DrawerEvent, UiState};
use crate::{PartialSettings, Settings, SettingsStore};

type Subscriber = Rc<dyn Fn(&Snapshot)>;
type SubscriberList = RefCell<Vec<(u64, Subscriber)>>;

struct Shared {
    store: SettingsStore,
    hooks: Box<dyn SettingsHooks>,
    state: RefCell<State>,
    subscribers: Rc<SubscriberList>,
    next_subscriber: Cell<u64>,
    pending: RefCell<VecDeque<Rc<Snapshot>>>,
    publishing: Cell<bool>,
}

struct State {
    source: Option<Rc<PartialSettings>>,
    settings: Settings,
    ui: UiState,
    snapshot: Rc<Snapshot>,
}

impl Shared {
    fn snapshot_for(self: &Rc<Self>, settings: Settings, ui: UiState) -> Rc<Snapshot> {
        let is_custom = self.store.is_custom(&settings);
        Rc::new(Snapshot {
            settings,
            ui,
            is_custom,
            handles: SettingsHandles {
                shared: Rc::downgrade(self),
            },
        })
    }

    fn apply_drawer(self: &Rc<Self>, ev: DrawerEvent) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            let next = ui_state::reduce(state.ui, ev);
            if next == state.ui {
                trace!(?ev, "drawer already in requested state");
                return;
            }
            state.ui = next;
            state.snapshot = self.snapshot_for(state.settings.clone(), next);
            Rc::clone(&state.snapshot)
        };
        debug!(?ev, open = snapshot.ui.open_drawer, "drawer transition");
        self.publish(snapshot);
    }

    fn set_source(self: &Rc<Self>, source: Option<Rc<PartialSettings>>) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            let unchanged = match (&state.source, &source) {
                (None, None) => true,
                (Some(current), Some(next)) => Rc::ptr_eq(current, next),
                _ => false,
            };
            if unchanged {
                trace!("initial settings unchanged; keeping memoized merge");
                return;
            }
            let settings = self.store.merge(source.as_deref());
            state.source = source;
            state.settings = settings.clone();
            state.snapshot = self.snapshot_for(settings, state.ui);
            Rc::clone(&state.snapshot)
        };
        debug!(custom = snapshot.is_custom, "settings re-merged");
        self.publish(snapshot);
    }

    fn update(&self, patch: &PartialSettings) {
        let next = patch.apply_to(&self.state.borrow().settings);
        debug!(keys = ?patch.supplied_keys(), "forwarding settings update");
        self.hooks.on_update(next);
    }

    fn reset(&self) {
        debug!("forwarding settings reset");
        self.hooks.on_reset();
    }

    fn publish(&self, snapshot: Rc<Snapshot>) {
        self.pending.borrow_mut().push_back(snapshot);
        if self.publishing.replace(true) {
            trace!("publish already in progress; snapshot queued");
            return;
        }
        while let Some(snapshot) = self.next_pending() {
            let subscribers: Vec<Subscriber> = self
                .subscribers
                .borrow()
                .iter()
                .map(|(_, s)| Rc::clone(s))
                .collect();
            trace!(subscribers = subscribers.len(), "publishing settings snapshot");
            for subscriber in subscribers {
                subscriber(&snapshot);
            }
        }
        self.publishing.set(false);
    }

    fn next_pending(&self) -> Option<Rc<Snapshot>> {
        self.pending.borrow_mut().pop_front()
    }
}

/// Owns the drawer flag and the merged settings; publishes [`Snapshot`]s.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct SettingsController {
    shared: Rc<Shared>,
}

impl Default for SettingsController {
    fn default() -> Self {
        Self::new(None, NoopHooks)
    }
}

impl SettingsController {
    /// Merge `initial` over the defaults once and start with the drawer closed.
    pub fn new<H>(initial: Option<Rc<PartialSettings>>, hooks: H) -> Self
    where
        H: SettingsHooks + 'static,
    {
        Self::from_parts(initial, Box::new(hooks))
    }

    /// Builder accepting closures for the hooks.
    pub fn builder() -> SettingsControllerBuilder {
        SettingsControllerBuilder::default()
    }

    fn from_parts(initial: Option<Rc<PartialSettings>>, hooks: Box<dyn SettingsHooks>) -> Self {
        let store = SettingsStore::new();
        let settings = store.merge(initial.as_deref());
        let is_custom = store.is_custom(&settings);
        let ui = UiState::default();
        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| Shared {
            store,
            hooks,
            state: RefCell::new(State {
                source: initial,
                settings: settings.clone(),
                ui,
                snapshot: Rc::new(Snapshot {
                    settings,
                    ui,
                    is_custom,
                    handles: SettingsHandles {
                        shared: weak.clone(),
                    },
                }),
            }),
            subscribers: Rc::default(),
            next_subscriber: Cell::new(0),
            pending: RefCell::default(),
            publishing: Cell::new(false),
        });
        debug!(custom = is_custom, "settings controller constructed");
        Self { shared }
    }

    /// The live snapshot.
    pub fn snapshot(&self) -> Rc<Snapshot> {
        Rc::clone(&self.shared.state.borrow().snapshot)
    }

    /// Current merged settings.
    pub fn settings(&self) -> Settings {
        self.shared.state.borrow().settings.clone()
    }

    /// Current drawer state.
    pub fn ui_state(&self) -> UiState {
        self.shared.state.borrow().ui
    }

    /// Whether the current settings deviate from the defaults.
    pub fn is_custom(&self) -> bool {
        self.snapshot().is_custom
    }

    /// Open the settings drawer. No-op when already open.
    pub fn open_drawer(&self) {
        self.shared.apply_drawer(DrawerEvent::Open);
    }

    /// Close the settings drawer. No-op when already closed.
    pub fn close_drawer(&self) {
        self.shared.apply_drawer(DrawerEvent::Close);
    }

    /// Overlay `patch` on the current settings and hand the full value to `on_update`.
    ///
    /// Omitted fields keep their current values. The controller's own settings
    /// are left untouched; the host feeds the result back via
    /// [`set_initial_settings`](Self::set_initial_settings).
    pub fn update(&self, patch: &PartialSettings) {
        self.shared.update(patch);
    }

    /// Invoke `on_reset`. Settings and drawer state are left untouched.
    pub fn reset(&self) {
        self.shared.reset();
    }

    /// Feed new caller settings in.
    ///
    /// The merge is memoized by identity: passing the same `Rc` (or `None`
    /// twice) keeps the current snapshot; any other value re-merges and
    /// publishes.
    pub fn set_initial_settings(&self, initial: Option<Rc<PartialSettings>>) {
        self.shared.set_source(initial);
    }

    /// Call `f` with every snapshot published after this point, in registration order.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&Snapshot) + 'static,
    {
        let id = self.shared.next_subscriber.get();
        self.shared.next_subscriber.set(id + 1);
        self.shared
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(f)));
        Subscription {
            id,
            subscribers: Rc::downgrade(&self.shared.subscribers),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }
}

impl fmt::Debug for SettingsController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("SettingsController")
            .field("settings", &state.settings)
            .field("ui", &state.ui)
            .field("subscribers", &self.shared.subscribers.borrow().len())
            .finish_non_exhaustive()
    }
}

/// RAII guard; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    subscribers: Weak<SubscriberList>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Immutable published view: settings, drawer flag, customization flag and operation handles.
///
/// Serializes to the flat shape consumers read (`colorPreset`, …, `openDrawer`, `isCustom`).
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Merged settings.
    #[serde(flatten)]
    pub settings: Settings,
    /// Drawer state.
    #[serde(flatten)]
    pub ui: UiState,
    /// Any recognized field differs from the defaults.
    pub is_custom: bool,
    #[serde(skip)]
    handles: SettingsHandles,
}

impl Snapshot {
    /// Whether the settings drawer is open.
    pub const fn is_drawer_open(&self) -> bool {
        self.ui.open_drawer
    }

    /// The bound operation handles.
    pub const fn handles(&self) -> &SettingsHandles {
        &self.handles
    }

    /// See [`SettingsHandles::handle_drawer_open`].
    pub fn handle_drawer_open(&self) {
        self.handles.handle_drawer_open();
    }

    /// See [`SettingsHandles::handle_drawer_close`].
    pub fn handle_drawer_close(&self) {
        self.handles.handle_drawer_close();
    }

    /// See [`SettingsHandles::handle_reset`].
    pub fn handle_reset(&self) {
        self.handles.handle_reset();
    }

    /// See [`SettingsHandles::handle_update`].
    pub fn handle_update(&self, patch: &PartialSettings) {
        self.handles.handle_update(patch);
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.settings == other.settings
            && self.ui == other.ui
            && self.is_custom == other.is_custom
    }
}

impl Eq for Snapshot {}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("settings", &self.settings)
            .field("ui", &self.ui)
            .field("is_custom", &self.is_custom)
            .finish_non_exhaustive()
    }
}

/// Operation handles bound to the controller that published a snapshot.
///
/// They hold a weak reference; once the controller is gone every call is ignored.
#[derive(Clone, Default)]
pub struct SettingsHandles {
    shared: Weak<Shared>,
}

impl SettingsHandles {
    fn with(&self, op: &'static str, f: impl FnOnce(&Rc<Shared>)) {
        match self.shared.upgrade() {
            Some(shared) => f(&shared),
            None => debug!(operation = op, "settings controller dropped; ignoring handle call"),
        }
    }

    /// Open the drawer.
    pub fn handle_drawer_open(&self) {
        self.with("drawer_open", |shared| shared.apply_drawer(DrawerEvent::Open));
    }

    /// Close the drawer.
    pub fn handle_drawer_close(&self) {
        self.with("drawer_close", |shared| {
            shared.apply_drawer(DrawerEvent::Close);
        });
    }

    /// Forward a reset request to the host.
    pub fn handle_reset(&self) {
        self.with("reset", |shared| shared.reset());
    }

    /// Forward a merged update to the host.
    pub fn handle_update(&self, patch: &PartialSettings) {
        self.with("update", |shared| shared.update(patch));
    }

    /// True while the owning controller is alive.
    pub fn is_bound(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl fmt::Debug for SettingsHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsHandles")
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Builder for [`SettingsController`].
#[derive(Default)]
pub struct SettingsControllerBuilder {
    initial: Option<Rc<PartialSettings>>,
    fn_hooks: FnHooks,
    hooks: Option<Box<dyn SettingsHooks>>,
}

impl SettingsControllerBuilder {
    /// Caller-supplied initial settings.
    pub fn settings(mut self, initial: impl Into<Rc<PartialSettings>>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Callback for `update`.
    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: Fn(Settings) + 'static,
    {
        self.fn_hooks = self.fn_hooks.with_update(f);
        self
    }

    /// Callback for `reset`.
    pub fn on_reset<F>(mut self, f: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.fn_hooks = self.fn_hooks.with_reset(f);
        self
    }

    /// Use a custom hooks implementation; takes precedence over `on_update`/`on_reset`.
    pub fn hooks<H>(mut self, hooks: H) -> Self
    where
        H: SettingsHooks + 'static,
    {
        self.hooks = Some(Box::new(hooks));
        self
    }

    /// Construct the controller.
    pub fn build(self) -> SettingsController {
        let hooks = self
            .hooks
            .unwrap_or_else(|| Box::new(self.fn_hooks) as Box<dyn SettingsHooks>);
        SettingsController::from_parts(self.initial, hooks)
    }
}

impl fmt::Debug for SettingsControllerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsControllerBuilder")
            .field("initial", &self.initial)
            .field("fn_hooks", &self.fn_hooks)
            .field("custom_hooks", &self.hooks.is_some())
            .finish()
    }
}
