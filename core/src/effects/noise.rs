//! Noise-driven effects
//!
//! Every call resamples. Nothing is remembered between frames.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{
    EffectId, Glyph, GlyphStyle, Palette, Rendering, RAINBOW_BLUE, RAINBOW_GREEN, RAINBOW_RED,
};

const SPARKS: &[char] = &['*', '+', '°', '.', 'x', 'o'];
const MATRIX: &[char] = &[
    'H', '3', 'L', 'L', '0', 'W', '0', 'R', 'L', 'D', '$', '#', '@', '!', '%', '*', '&', '^',
];
const SHADES: &[char] = &['█', '▓', '▒', '░'];
const SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+'];
const GLITCHES: &str = "¡¢£¤¥¦§¨©ª«¬®¯°±²³´µ¶·¸¹º»¼½¾¿";
const MOONS: &[char] = &['◐', '◓', '◑', '◒'];
const HEX: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

pub(super) fn render<R: Rng + ?Sized>(
    effect: EffectId,
    chars: &[char],
    progress: f64,
    palette: &Palette,
    rng: &mut R,
) -> Rendering {
    let dim = GlyphStyle::fg(palette.dim);

    match effect {
        EffectId::Sparkle => map(chars, |ch| {
            if rng.gen_bool(0.4) {
                let color = if rng.gen_bool(0.5) { palette.accent } else { palette.secondary };
                Glyph::new(pick(SPARKS, rng), GlyphStyle::fg(color))
            } else {
                Glyph::new(ch, dim)
            }
        }),
        EffectId::Matrix => map(chars, |_| Glyph::new(pick(MATRIX, rng), GlyphStyle::fg(palette.success))),
        EffectId::Rainbow => {
            let colors = [
                palette.accent,
                palette.secondary,
                palette.success,
                palette.warning,
                RAINBOW_RED,
                RAINBOW_GREEN,
                RAINBOW_BLUE,
            ];
            map(chars, |ch| Glyph::new(ch, GlyphStyle::fg(pick(&colors, rng))))
        }
        EffectId::Binary => map(chars, |_| {
            Glyph::new(if rng.gen_bool(0.5) { '1' } else { '0' }, GlyphStyle::fg(palette.success))
        }),
        EffectId::Dissolve => {
            let chance = (progress * 1.5).min(1.0);
            let struck = GlyphStyle::strike(palette);
            map(chars, |ch| {
                if rng.gen_bool(chance) {
                    Glyph::new(ch, struck)
                } else {
                    Glyph::new(ch, GlyphStyle::PLAIN)
                }
            })
        }
        EffectId::Flip => map(chars, |ch| {
            if rng.gen_bool(0.3) {
                Glyph::new(swap_case(ch), GlyphStyle::fg(palette.secondary))
            } else {
                Glyph::new(ch, GlyphStyle::PLAIN)
            }
        }),
        EffectId::Particle => map(chars, |ch| {
            if rng.gen_bool(0.5) {
                Glyph::new('.', GlyphStyle::fg(palette.secondary))
            } else {
                Glyph::new(ch, GlyphStyle::fg(palette.accent))
            }
        }),
        EffectId::Redact => map(chars, |ch| {
            if rng.gen_bool(0.5) {
                Glyph::new(pick(SHADES, rng), GlyphStyle::fg(palette.warning))
            } else {
                Glyph::new(ch, dim)
            }
        }),
        EffectId::Chaos => map(chars, |ch| {
            if rng.gen_bool(0.5) {
                Glyph::new(pick(SYMBOLS, rng), GlyphStyle::fg(palette.secondary))
            } else {
                Glyph::new(ch, GlyphStyle::PLAIN)
            }
        }),
        EffectId::Bounce => map(chars, |ch| {
            let color = if rng.gen_bool(0.5) { palette.accent } else { palette.secondary };
            Glyph::new(ch, GlyphStyle::fg(color))
        }),
        EffectId::Eraser => {
            let chance = progress.clamp(0.0, 1.0);
            map(chars, |ch| {
                if rng.gen_bool(chance) {
                    Glyph::new(' ', GlyphStyle::PLAIN)
                } else {
                    Glyph::new(ch, dim)
                }
            })
        }
        EffectId::Glitch => {
            let glitches: Vec<char> = GLITCHES.chars().collect();
            let style = GlyphStyle::fg(palette.warning).on(palette.dim);
            map(chars, |ch| {
                if rng.gen_bool(0.3) {
                    Glyph::new(pick(&glitches, rng), style)
                } else {
                    Glyph::new(ch, GlyphStyle::PLAIN)
                }
            })
        }
        EffectId::Moons => map(chars, |ch| {
            if rng.gen_bool(0.3) {
                Glyph::new(pick(MOONS, rng), GlyphStyle::fg(palette.secondary))
            } else {
                Glyph::new(ch, dim)
            }
        }),
        EffectId::Braille => map(chars, |ch| {
            if rng.gen_bool(0.4) {
                let cell = char::from_u32(0x2800 + rng.gen_range(0..255)).unwrap_or('⠿');
                Glyph::new(cell, GlyphStyle::fg(palette.accent))
            } else {
                Glyph::new(ch, GlyphStyle::PLAIN)
            }
        }),
        EffectId::Hex => map(chars, |_| Glyph::new(pick(HEX, rng), GlyphStyle::fg(palette.success))),
        EffectId::CaseFlip => map(chars, |ch| {
            let flipped = if rng.gen_bool(0.5) { upper(ch) } else { lower(ch) };
            Glyph::new(flipped, GlyphStyle::fg(palette.accent))
        }),
        EffectId::Slider => map(chars, |ch| {
            if rng.gen_bool(0.3) {
                Glyph::new('^', GlyphStyle::fg(palette.accent))
            } else {
                Glyph::new(ch, GlyphStyle::PLAIN)
            }
        }),
        _ => super::fallback(&chars.iter().collect::<String>(), palette),
    }
}

fn map(chars: &[char], mut f: impl FnMut(char) -> Glyph) -> Rendering {
    chars.iter().map(|&ch| f(ch)).collect()
}

fn pick<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> T {
    // Tables are non-empty constants
    *items.choose(rng).unwrap_or(&items[0])
}

// Case mappings that expand (e.g. 'ß' -> "SS") keep the original character
fn upper(ch: char) -> char {
    let mut it = ch.to_uppercase();
    match (it.next(), it.next()) {
        (Some(u), None) => u,
        _ => ch,
    }
}

fn lower(ch: char) -> char {
    let mut it = ch.to_lowercase();
    match (it.next(), it.next()) {
        (Some(l), None) => l,
        _ => ch,
    }
}

fn swap_case(ch: char) -> char {
    if ch.is_uppercase() {
        lower(ch)
    } else {
        upper(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::plain_text;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn test_case_helpers_keep_width() {
        assert_eq!(upper('a'), 'A');
        assert_eq!(lower('Q'), 'q');
        assert_eq!(upper('ß'), 'ß');
        assert_eq!(swap_case('x'), 'X');
        assert_eq!(swap_case('7'), '7');
    }

    #[test]
    fn test_eraser_clears_everything_at_full_progress() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = render(EffectId::Eraser, &chars("buy milk"), 1.0, &Palette::default(), &mut rng);
        assert_eq!(plain_text(&out), "        ");
    }

    #[test]
    fn test_dissolve_untouched_at_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = render(EffectId::Dissolve, &chars("buy milk"), 0.0, &Palette::default(), &mut rng);
        assert!(out.iter().all(|g| !g.style.strikethrough));
        assert_eq!(plain_text(&out), "buy milk");
    }

    #[test]
    fn test_hex_and_matrix_replace_every_character() {
        let mut rng = StdRng::seed_from_u64(9);
        let palette = Palette::default();
        let hex = render(EffectId::Hex, &chars("abcdef"), 0.5, &palette, &mut rng);
        assert!(hex.iter().all(|g| g.ch.is_ascii_hexdigit() && !g.ch.is_ascii_lowercase()));

        let matrix = render(EffectId::Matrix, &chars("abcdef"), 0.5, &palette, &mut rng);
        assert!(matrix.iter().all(|g| MATRIX.contains(&g.ch)));
    }

    #[test]
    fn test_braille_cells_stay_in_block() {
        let mut rng = StdRng::seed_from_u64(11);
        let out = render(EffectId::Braille, &chars(&"x".repeat(200)), 0.5, &Palette::default(), &mut rng);
        assert!(out.iter().all(|g| g.ch == 'x' || ('\u{2800}'..='\u{28ff}').contains(&g.ch)));
    }
}
