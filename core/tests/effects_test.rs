//! Effect library contract, checked across the whole catalog

use std::time::Duration;

use pretty_assertions::assert_eq;
use ticklist_core::animation::CHECK_ANIMATION;
use ticklist_core::effects::{self, plain_text, EffectClock};
use ticklist_core::{EffectId, EffectKind, Palette};

const TITLES: [&str; 4] = ["a", "water the plants", "ünïcødé ✔ title", "odd"];

fn clock(ms: u64) -> EffectClock {
    EffectClock::new(Duration::from_millis(ms), CHECK_ANIMATION)
}

#[test]
fn test_empty_text_renders_empty_for_every_effect() {
    let palette = Palette::default();
    for &effect in EffectId::ALL {
        for ms in [0, 145, 290, 10_000] {
            assert!(
                effects::render(effect, "", clock(ms), &palette).is_empty(),
                "{effect} at {ms}ms"
            );
        }
    }
}

#[test]
fn test_character_count_is_preserved() {
    let palette = Palette::default();
    for &effect in EffectId::ALL {
        for title in TITLES {
            let len = title.chars().count();
            let expected = if effect == EffectId::Wide { 2 * len } else { len };
            for ms in [0, 50, 145, 289, 290, 1_000] {
                let rendering = effects::render(effect, title, clock(ms), &palette);
                assert_eq!(rendering.len(), expected, "{effect} on {title:?} at {ms}ms");
            }
        }
    }
}

#[test]
fn test_progress_effects_settle_at_full_duration() {
    let palette = Palette::default();
    let progress_effects = EffectId::ALL
        .iter()
        .copied()
        .filter(|e| e.kind() == EffectKind::Progress);

    for effect in progress_effects {
        for title in TITLES {
            let at_end = effects::render(effect, title, clock(290), &palette);
            for later in [291, 500, 60_000] {
                assert_eq!(
                    effects::render(effect, title, clock(later), &palette),
                    at_end,
                    "{effect} on {title:?} at {later}ms"
                );
            }
        }
    }
}

#[test]
fn test_wide_is_stable_over_time() {
    let palette = Palette::default();
    let first = effects::render(EffectId::Wide, "ok", clock(0), &palette);
    let later = effects::render(EffectId::Wide, "ok", clock(200), &palette);
    assert_eq!(first, later);
    assert_eq!(plain_text(&first), "o k ");
}

#[test]
fn test_every_family_is_represented() {
    let count = |kind| EffectId::ALL.iter().filter(|e| e.kind() == kind).count();
    assert_eq!(count(EffectKind::Progress), 7);
    assert_eq!(count(EffectKind::Cycle), 4);
    assert_eq!(count(EffectKind::Static), 2);
    assert_eq!(count(EffectKind::Noise), 17);
}
