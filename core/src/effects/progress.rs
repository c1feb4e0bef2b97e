//! Progress-driven effects
//!
//! Each function here is monotonic in `progress` and reaches its terminal
//! form at `progress == 1.0`.

use super::{boundary, EffectId, Glyph, GlyphStyle, Palette, Rendering};

pub(super) fn render(effect: EffectId, chars: &[char], progress: f64, palette: &Palette) -> Rendering {
    match effect {
        EffectId::WipeRight => wipe_right(chars, progress, palette),
        EffectId::WipeLeft => wipe_left(chars, progress, palette),
        EffectId::Typewriter => typewriter(chars, progress, palette),
        EffectId::Converge => converge(chars, progress, palette),
        EffectId::Zipper => zipper(chars, progress, palette),
        EffectId::CenterStrike => center_strike(chars, progress, palette),
        EffectId::Loading => loading(chars, progress, palette),
        _ => super::fallback(&chars.iter().collect::<String>(), palette),
    }
}

fn wipe_right(chars: &[char], progress: f64, palette: &Palette) -> Rendering {
    let edge = boundary(progress, chars.len());
    let struck = GlyphStyle::strike(palette);
    let cursor = GlyphStyle::cursor(palette.secondary, palette);

    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            let style = match i.cmp(&edge) {
                std::cmp::Ordering::Less => struck,
                std::cmp::Ordering::Equal => cursor,
                std::cmp::Ordering::Greater => GlyphStyle::PLAIN,
            };
            Glyph::new(ch, style)
        })
        .collect()
}

fn wipe_left(chars: &[char], progress: f64, palette: &Palette) -> Rendering {
    let len = chars.len();
    // Number of struck positions counted from the right end
    let swept = boundary(progress, len);
    let struck = GlyphStyle::strike(palette);
    let cursor = GlyphStyle::cursor(palette.accent, palette);

    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            let from_right = len - 1 - i;
            let style = match from_right.cmp(&swept) {
                std::cmp::Ordering::Less => struck,
                std::cmp::Ordering::Equal => cursor,
                std::cmp::Ordering::Greater => GlyphStyle::PLAIN,
            };
            Glyph::new(ch, style)
        })
        .collect()
}

fn typewriter(chars: &[char], progress: f64, palette: &Palette) -> Rendering {
    let typed = boundary(progress, chars.len());
    let ink = GlyphStyle::fg(palette.success);
    let cursor = GlyphStyle::cursor(palette.success, palette);

    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| match i.cmp(&typed) {
            std::cmp::Ordering::Less => Glyph::new(ch, ink),
            std::cmp::Ordering::Equal => Glyph::new(ch, cursor),
            std::cmp::Ordering::Greater => Glyph::new(' ', GlyphStyle::PLAIN),
        })
        .collect()
}

fn converge(chars: &[char], progress: f64, palette: &Palette) -> Rendering {
    let len = chars.len();
    let fill = boundary(progress, len.div_ceil(2));
    let struck = GlyphStyle::strike(palette);
    let open = GlyphStyle::fg(palette.accent);
    let cursor = GlyphStyle::cursor(palette.secondary, palette);

    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            let style = if i < fill || i >= len - fill {
                struck
            } else if i == fill || i == len - 1 - fill {
                cursor
            } else {
                open
            };
            Glyph::new(ch, style)
        })
        .collect()
}

fn zipper(chars: &[char], progress: f64, palette: &Palette) -> Rendering {
    let len = chars.len();
    let zipped = boundary(progress, len.div_ceil(2));
    let struck = GlyphStyle::strike(palette);
    let open = GlyphStyle::cursor(palette.accent, palette);

    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            let from_edge = i.min(len - 1 - i);
            Glyph::new(ch, if from_edge < zipped { struck } else { open })
        })
        .collect()
}

fn center_strike(chars: &[char], progress: f64, palette: &Palette) -> Rendering {
    let len = chars.len();
    let mid = len / 2;
    // The left half is never shorter than the right, so `mid + 1` covers both
    let reach = boundary(progress, mid + 1);
    let struck = GlyphStyle::strike(palette);
    let cursor = GlyphStyle::cursor(palette.warning, palette);

    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            let style = match i.abs_diff(mid).cmp(&reach) {
                std::cmp::Ordering::Less => struck,
                std::cmp::Ordering::Equal => cursor,
                std::cmp::Ordering::Greater => GlyphStyle::PLAIN,
            };
            Glyph::new(ch, style)
        })
        .collect()
}

fn loading(chars: &[char], progress: f64, palette: &Palette) -> Rendering {
    let fill = boundary(progress, chars.len());
    let full = Glyph::new('█', GlyphStyle::fg(palette.success));
    let empty = Glyph::new('▒', GlyphStyle::fg(palette.dim));
    let head = Glyph::new('▒', GlyphStyle::cursor(palette.success, palette));

    (0..chars.len())
        .map(|i| match i.cmp(&fill) {
            std::cmp::Ordering::Less => full,
            std::cmp::Ordering::Equal => head,
            std::cmp::Ordering::Greater => empty,
        })
        .collect()
}
