// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Property tests for merge, customization diff, projection, and update carry-over.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use serde_json::Value;
use tint_settings::{
    ColorPreset, Contrast, Direction, Layout, NavColor, PaletteMode, PartialSettings, SettingKey,
    SettingsController, SettingsStore, DEFAULT_SETTINGS,
};

// Host-defined tags; the `x` prefix keeps them clear of the built-in names.
fn unlisted_tag() -> impl Strategy<Value = String> {
    "x[a-z]{2,8}"
}

fn color_preset() -> impl Strategy<Value = ColorPreset> {
    prop_oneof![
        Just(ColorPreset::Blue),
        Just(ColorPreset::Cyan),
        Just(ColorPreset::Green),
        Just(ColorPreset::Indigo),
        Just(ColorPreset::Purple),
        unlisted_tag().prop_map(ColorPreset::Other),
    ]
}

fn contrast() -> impl Strategy<Value = Contrast> {
    prop_oneof![
        Just(Contrast::Normal),
        Just(Contrast::High),
        unlisted_tag().prop_map(Contrast::Other),
    ]
}

fn layout() -> impl Strategy<Value = Layout> {
    prop_oneof![
        Just(Layout::Horizontal),
        Just(Layout::Vertical),
        unlisted_tag().prop_map(Layout::Other),
    ]
}

fn nav_color() -> impl Strategy<Value = NavColor> {
    prop_oneof![
        Just(NavColor::BlendIn),
        Just(NavColor::Discreet),
        Just(NavColor::Evident),
        unlisted_tag().prop_map(NavColor::Other),
    ]
}

fn partial_settings() -> impl Strategy<Value = PartialSettings> {
    (
        proptest::option::of(color_preset()),
        proptest::option::of(contrast()),
        proptest::option::of(prop_oneof![Just(Direction::Ltr), Just(Direction::Rtl)]),
        proptest::option::of(layout()),
        proptest::option::of(nav_color()),
        proptest::option::of(prop_oneof![Just(PaletteMode::Light), Just(PaletteMode::Dark)]),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(
            |(
                color_preset,
                contrast,
                direction,
                layout,
                nav_color,
                palette_mode,
                responsive_font_sizes,
                stretch,
            )| PartialSettings {
                color_preset,
                contrast,
                direction,
                layout,
                nav_color,
                palette_mode,
                responsive_font_sizes,
                stretch,
            },
        )
}

fn extraneous_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn merge_populates_every_field_and_honors_overrides(partial in partial_settings()) {
        let store = SettingsStore::new();
        let merged = store.merge(Some(&partial));

        // re-applying the same overrides is a fixed point
        prop_assert_eq!(&partial.apply_to(&merged), &merged);

        let supplied = partial.supplied_keys();
        for key in SettingKey::ALL {
            if !supplied.contains(&key) {
                prop_assert!(!merged.differs_at(&DEFAULT_SETTINGS, key));
            }
        }

        let customized = store.customized_keys(&merged);
        prop_assert!(customized.iter().all(|key| supplied.contains(key)));
        prop_assert_eq!(store.is_custom(&merged), !customized.is_empty());
    }

    #[test]
    fn extraneous_fields_do_not_affect_is_custom(
        partial in partial_settings(),
        extras in prop::collection::btree_map("x[A-Za-z]{1,12}", extraneous_value(), 0..6),
        open_drawer in any::<bool>(),
    ) {
        let store = SettingsStore::new();
        let merged = store.merge(Some(&partial));

        let mut value = serde_json::to_value(&merged).expect("serialize settings");
        let object = value.as_object_mut().expect("settings object");
        object.insert("openDrawer".to_owned(), Value::Bool(open_drawer));
        object.insert("isCustom".to_owned(), Value::Bool(!store.is_custom(&merged)));
        for (name, extra) in extras {
            object.insert(name, extra);
        }

        let projected = store.project(&value);
        prop_assert_eq!(&projected, &merged);
        prop_assert_eq!(store.is_custom(&projected), store.is_custom(&merged));
    }

    #[test]
    fn update_overlays_patch_on_current_settings(
        initial in partial_settings(),
        patch in partial_settings(),
    ) {
        let received = Rc::new(Cell::new(None));
        let ctl = SettingsController::builder()
            .settings(initial)
            .on_update({
                let received = Rc::clone(&received);
                move |s| received.set(Some(s))
            })
            .build();
        let current = ctl.settings();

        ctl.update(&patch);

        let sent = received.take().expect("on_update called");
        let supplied = patch.supplied_keys();
        for key in SettingKey::ALL {
            if !supplied.contains(&key) {
                prop_assert!(!sent.differs_at(&current, key));
            }
        }
        prop_assert_eq!(sent, patch.apply_to(&current));
        prop_assert_eq!(ctl.settings(), current);
    }
}
