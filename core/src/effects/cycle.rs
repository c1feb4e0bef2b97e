//! Periodic and time-independent effects

use super::{EffectId, Glyph, GlyphStyle, Palette, Rendering, TRAFFIC_AMBER};

const SPINNER: [char; 4] = ['-', '\\', '|', '/'];

// Steps per second of the periodic effects
const WAVE_RATE: f64 = 30.0;
const PULSE_RATE: f64 = 40.0;
const SPIN_RATE: f64 = 20.0;
const TRAFFIC_RATE: f64 = 10.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn step(seconds: f64, rate: f64) -> usize {
    (seconds * rate).max(0.0) as usize
}

pub(super) fn render(effect: EffectId, chars: &[char], seconds: f64, palette: &Palette) -> Rendering {
    match effect {
        EffectId::Wave => {
            let colors = [palette.accent, palette.secondary, palette.success, palette.fg];
            let offset = step(seconds, WAVE_RATE);
            chars
                .iter()
                .enumerate()
                .map(|(i, &ch)| Glyph::new(ch, GlyphStyle::fg(colors[(i + offset) % colors.len()])))
                .collect()
        }
        EffectId::Pulse => {
            let lit = (seconds * PULSE_RATE).sin() > 0.0;
            let style = if lit {
                GlyphStyle::fg(palette.accent).bold()
            } else {
                GlyphStyle::fg(palette.fg)
            };
            super::uniform(&chars.iter().collect::<String>(), style)
        }
        EffectId::Spin => {
            let frame = SPINNER[step(seconds, SPIN_RATE) % SPINNER.len()];
            let style = GlyphStyle::fg(palette.success);
            chars.iter().map(|_| Glyph::new(frame, style)).collect()
        }
        EffectId::Traffic => {
            let lights = [palette.warning, TRAFFIC_AMBER, palette.success];
            let color = lights[step(seconds, TRAFFIC_RATE) % lights.len()];
            super::uniform(&chars.iter().collect::<String>(), GlyphStyle::fg(color))
        }
        _ => super::fallback(&chars.iter().collect::<String>(), palette),
    }
}

pub(super) fn render_static(effect: EffectId, chars: &[char], palette: &Palette) -> Rendering {
    match effect {
        EffectId::Reverse => {
            let style = GlyphStyle::fg(palette.warning);
            chars.iter().rev().map(|&ch| Glyph::new(ch, style)).collect()
        }
        EffectId::Wide => {
            let style = GlyphStyle::fg(palette.secondary);
            chars
                .iter()
                .flat_map(|&ch| [Glyph::new(ch, style), Glyph::new(' ', style)])
                .collect()
        }
        _ => super::fallback(&chars.iter().collect::<String>(), palette),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::plain_text;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wide_inserts_one_spacer_per_character() {
        let out = render_static(EffectId::Wide, &['o', 'k'], &Palette::default());
        assert_eq!(plain_text(&out), "o k ");
    }

    #[test]
    fn test_reverse() {
        let out = render_static(EffectId::Reverse, &['a', 'b', 'c'], &Palette::default());
        assert_eq!(plain_text(&out), "cba");
    }

    #[test]
    fn test_spinner_advances_with_time() {
        let palette = Palette::default();
        let a = render(EffectId::Spin, &['x', 'y'], 0.0, &palette);
        let b = render(EffectId::Spin, &['x', 'y'], 0.06, &palette);
        assert_eq!(plain_text(&a), "--");
        assert_eq!(plain_text(&b), "\\\\");
    }

    #[test]
    fn test_traffic_cycles_red_amber_green() {
        let palette = Palette::default();
        let color = |s: f64| render(EffectId::Traffic, &['a'], s, &palette)[0].style.fg;
        assert_eq!(color(0.0), Some(palette.warning));
        assert_eq!(color(0.15), Some(TRAFFIC_AMBER));
        assert_eq!(color(0.25), Some(palette.success));
        assert_eq!(color(0.35), Some(palette.warning));
    }
}
