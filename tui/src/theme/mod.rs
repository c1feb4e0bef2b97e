//! Theme and Colors
//!
//! Ten named palettes, cycled with `t`. Each palette carries the seven
//! semantic colors the effect library draws from; this module also maps the
//! library's terminal-agnostic styles onto ratatui styles.

use ratatui::style::{Color, Modifier, Style};

use ticklist_core::{GlyphStyle, Palette, Rgb};

/// A named palette
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Shown in the status line
    pub name: &'static str,
    /// Semantic colors
    pub palette: Palette,
}

const fn hex(value: u32) -> Rgb {
    Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

#[allow(clippy::too_many_arguments)]
const fn theme(
    name: &'static str,
    bg: u32,
    fg: u32,
    dim: u32,
    accent: u32,
    secondary: u32,
    success: u32,
    warning: u32,
) -> Theme {
    Theme {
        name,
        palette: Palette {
            bg: hex(bg),
            fg: hex(fg),
            dim: hex(dim),
            accent: hex(accent),
            secondary: hex(secondary),
            success: hex(success),
            warning: hex(warning),
        },
    }
}

// ============================================================================
// Theme Catalog
// ============================================================================

/// Every theme, in cycle order
pub const THEMES: [Theme; 10] = [
    theme("Catppuccin", 0x000000, 0xcdd6f4, 0x6c7086, 0xcba6f7, 0xf5c2e7, 0xa6e3a1, 0xf38ba8),
    theme("Nord", 0x2e3440, 0xeceff4, 0x4c566a, 0x88c0d0, 0x81a1c1, 0xa3be8c, 0xbf616a),
    theme("Gruvbox", 0x282828, 0xebdbb2, 0x928374, 0xfabd2f, 0xfe8019, 0xb8bb26, 0xfb4934),
    theme("Dracula", 0x282a36, 0xf8f8f2, 0x6272a4, 0xbd93f9, 0xff79c6, 0x50fa7b, 0xff5555),
    theme("Tokyo Night", 0x1a1b26, 0xc0caf5, 0x565f89, 0x7aa2f7, 0xbb9af7, 0x9ece6a, 0xf7768e),
    theme("Rose Pine", 0x191724, 0xe0def4, 0x6e6a86, 0xebbcba, 0xc4a7e7, 0x31748f, 0xeb6f92),
    theme("Everforest", 0x272e33, 0xd3c6aa, 0x859289, 0xa7c080, 0x7fbbb3, 0xa7c080, 0xe67e80),
    theme("One Dark", 0x282c34, 0xabb2bf, 0x5c6370, 0x61afef, 0xc678dd, 0x98c379, 0xe06c75),
    theme("Solarized", 0x002b36, 0x839496, 0x586e75, 0x268bd2, 0x2aa198, 0x859900, 0xdc322f),
    theme("Kanagawa", 0x1f1f28, 0xdcd7ba, 0x727169, 0x7e9cd8, 0x957fb8, 0x76946a, 0xc34043),
];

/// Theme at `index`, falling back to the first
#[must_use]
pub fn theme_at(index: usize) -> &'static Theme {
    THEMES.get(index).unwrap_or(&THEMES[0])
}

// ============================================================================
// Style Mapping
// ============================================================================

/// Convert a palette color
#[must_use]
pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Convert an effect glyph style
#[must_use]
pub fn style(glyph: GlyphStyle) -> Style {
    let mut style = Style::default();
    if let Some(fg) = glyph.fg {
        style = style.fg(color(fg));
    }
    if let Some(bg) = glyph.bg {
        style = style.bg(color(bg));
    }
    if glyph.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if glyph.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if glyph.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_starts_with_core_default() {
        assert_eq!(THEMES[0].palette, Palette::default());
        assert_eq!(THEMES[9].name, "Kanagawa");
    }

    #[test]
    fn test_out_of_range_falls_back() {
        assert_eq!(theme_at(42).name, "Catppuccin");
        assert_eq!(theme_at(3).name, "Dracula");
    }

    #[test]
    fn test_style_mapping() {
        let palette = Palette::default();
        let mapped = style(GlyphStyle::strike(&palette));
        assert_eq!(mapped.fg, Some(color(palette.dim)));
        assert!(mapped.add_modifier.contains(Modifier::CROSSED_OUT));
        assert_eq!(style(GlyphStyle::PLAIN), Style::default());
    }
}
