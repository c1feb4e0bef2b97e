//! Text Effects - The Check-Off Animation Library
//!
//! Every effect is a pure function of `(text, elapsed time, effect, palette)`
//! that yields a styled [`Rendering`]. Effects substitute or recolor
//! characters; they never add or drop any, with the single exception of
//! [`EffectId::Wide`], which places one constant spacer after each character.
//!
//! # Families
//!
//! - **Progress** effects compute `progress = min(1, elapsed / duration)` and
//!   only ever move forward: a position resolved at some elapsed time stays
//!   resolved for every later one, and every call with `elapsed >= duration`
//!   returns the same terminal rendering. Boundaries use
//!   `floor(progress * len)`; the boundary position itself gets a cursor
//!   highlight.
//! - **Noise** effects draw fresh per-character random decisions on every
//!   call. They carry no memory and are neither monotonic nor reproducible.
//! - **Cycle** effects are deterministic periodic functions of elapsed time.
//! - **Static** effects ignore time entirely.
//!
//! # Colors
//!
//! Nothing here reads global style state. Callers pass a [`Palette`] into
//! every render call and map the resulting [`GlyphStyle`]s onto whatever
//! their surface understands.

mod cycle;
mod noise;
mod progress;

use std::fmt;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// Colors and Styled Glyphs
// ============================================================================

/// A 24-bit color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Pure red, used by the rainbow effect
pub const RAINBOW_RED: Rgb = Rgb(0xff, 0x00, 0x00);
/// Pure green, used by the rainbow effect
pub const RAINBOW_GREEN: Rgb = Rgb(0x00, 0xff, 0x00);
/// Pure blue, used by the rainbow effect
pub const RAINBOW_BLUE: Rgb = Rgb(0x00, 0x00, 0xff);
/// Amber, the middle light of the traffic effect
pub const TRAFFIC_AMBER: Rgb = Rgb(0xff, 0xff, 0x00);

/// The semantic colors effects draw from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Background
    pub bg: Rgb,
    /// Regular foreground text
    pub fg: Rgb,
    /// De-emphasized text (completed items, hints)
    pub dim: Rgb,
    /// Primary accent
    pub accent: Rgb,
    /// Secondary accent
    pub secondary: Rgb,
    /// Success / completion
    pub success: Rgb,
    /// Warnings, overdue items, deletions
    pub warning: Rgb,
}

impl Default for Palette {
    /// Catppuccin-like colors on black
    fn default() -> Self {
        Self {
            bg: Rgb(0x00, 0x00, 0x00),
            fg: Rgb(0xcd, 0xd6, 0xf4),
            dim: Rgb(0x6c, 0x70, 0x86),
            accent: Rgb(0xcb, 0xa6, 0xf7),
            secondary: Rgb(0xf5, 0xc2, 0xe7),
            success: Rgb(0xa6, 0xe3, 0xa1),
            warning: Rgb(0xf3, 0x8b, 0xa8),
        }
    }
}

/// Style of a single rendered glyph
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphStyle {
    /// Foreground color (`None` inherits the surrounding style)
    pub fg: Option<Rgb>,
    /// Background color
    pub bg: Option<Rgb>,
    /// Bold weight
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Struck through
    pub strikethrough: bool,
}

impl GlyphStyle {
    /// Unstyled glyph
    pub const PLAIN: Self = Self {
        fg: None,
        bg: None,
        bold: false,
        italic: false,
        strikethrough: false,
    };

    /// Style with only a foreground color
    #[must_use]
    pub const fn fg(color: Rgb) -> Self {
        Self {
            fg: Some(color),
            ..Self::PLAIN
        }
    }

    /// Add a background color
    #[must_use]
    pub const fn on(mut self, color: Rgb) -> Self {
        self.bg = Some(color);
        self
    }

    /// Make bold
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Strike through
    #[must_use]
    pub const fn struck(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    /// The resolved "done" look: dim and struck through
    #[must_use]
    pub const fn strike(palette: &Palette) -> Self {
        Self::fg(palette.dim).struck()
    }

    /// Highlight for the moving boundary of progress effects
    #[must_use]
    pub const fn cursor(highlight: Rgb, palette: &Palette) -> Self {
        Self::fg(palette.bg).on(highlight)
    }
}

/// One rendered character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// The character to draw
    pub ch: char,
    /// How to draw it
    pub style: GlyphStyle,
}

impl Glyph {
    /// Create a glyph
    #[must_use]
    pub const fn new(ch: char, style: GlyphStyle) -> Self {
        Self { ch, style }
    }
}

/// A styled rendering of a task title
pub type Rendering = Vec<Glyph>;

/// The characters of a rendering, without styling
#[must_use]
pub fn plain_text(rendering: &[Glyph]) -> String {
    rendering.iter().map(|g| g.ch).collect()
}

/// Render text in a single style
#[must_use]
pub fn uniform(text: &str, style: GlyphStyle) -> Rendering {
    text.chars().map(|ch| Glyph::new(ch, style)).collect()
}

// ============================================================================
// Timing
// ============================================================================

/// Elapsed time of an animation relative to its full duration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectClock {
    /// Time since the animation started
    pub elapsed: Duration,
    /// Full animation duration
    pub duration: Duration,
}

impl EffectClock {
    /// Create a clock
    #[must_use]
    pub const fn new(elapsed: Duration, duration: Duration) -> Self {
        Self { elapsed, duration }
    }

    /// Normalized progress in `[0, 1]`
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Elapsed seconds, for periodic effects
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// `floor(progress * len)`, clamped to `len`
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn boundary(progress: f64, len: usize) -> usize {
    ((progress * len as f64).floor() as usize).min(len)
}

// ============================================================================
// Effect Catalog
// ============================================================================

/// Which family an effect belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    /// Monotonic in time, converges to a terminal rendering
    Progress,
    /// Freshly random on every call
    Noise,
    /// Deterministic and periodic in elapsed time
    Cycle,
    /// Independent of time
    Static,
}

macro_rules! effect_catalog {
    ($($(#[$doc:meta])* $variant:ident => $name:literal, $kind:ident;)+) => {
        /// Identifier of a check-off effect
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EffectId {
            $($(#[$doc])* $variant,)+
        }

        impl EffectId {
            /// Every effect, in catalog order
            pub const ALL: &'static [EffectId] = &[$(EffectId::$variant,)+];

            /// Short human-readable name
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(EffectId::$variant => $name,)+
                }
            }

            /// The family this effect belongs to
            #[must_use]
            pub const fn kind(self) -> EffectKind {
                match self {
                    $(EffectId::$variant => EffectKind::$kind,)+
                }
            }
        }
    };
}

effect_catalog! {
    /// Random sparks over dimmed text
    Sparkle => "sparkle", Noise;
    /// Every character replaced by scrolling code
    Matrix => "matrix", Noise;
    /// Strike-through sweeping left to right
    WipeRight => "wipe-right", Progress;
    /// Strike-through sweeping right to left
    WipeLeft => "wipe-left", Progress;
    /// Random color per character
    Rainbow => "rainbow", Noise;
    /// Colors rolling along the text
    Wave => "wave", Cycle;
    /// Random bits
    Binary => "binary", Noise;
    /// Characters randomly struck, more as time passes
    Dissolve => "dissolve", Noise;
    /// Random case flips
    Flip => "flip", Noise;
    /// Whole title blinking between accent and foreground
    Pulse => "pulse", Cycle;
    /// Characters typed in from the left
    Typewriter => "typewriter", Progress;
    /// Characters randomly dissolving into dots
    Particle => "particle", Noise;
    /// Random redaction blocks
    Redact => "redact", Noise;
    /// Random punctuation
    Chaos => "chaos", Noise;
    /// Strike-through closing in from both ends
    Converge => "converge", Progress;
    /// Characters randomly hopping between two colors
    Bounce => "bounce", Noise;
    /// Every character a spinner
    Spin => "spin", Cycle;
    /// Highlighted text zipped shut from both ends
    Zipper => "zipper", Progress;
    /// Characters randomly erased, more as time passes
    Eraser => "eraser", Noise;
    /// Random Latin-1 glitches
    Glitch => "glitch", Noise;
    /// Random moon phases
    Moons => "moons", Noise;
    /// Random braille cells
    Braille => "braille", Noise;
    /// Random hex digits
    Hex => "hex", Noise;
    /// The title spelled backwards
    Reverse => "reverse", Static;
    /// Random upper/lower case
    CaseFlip => "case-flip", Noise;
    /// Letter-spaced title
    Wide => "wide", Static;
    /// Red, amber, green lights
    Traffic => "traffic", Cycle;
    /// Strike-through growing out of the middle
    CenterStrike => "center-strike", Progress;
    /// Progress bar filling the title
    Loading => "loading", Progress;
    /// Random carets
    Slider => "slider", Noise;
}

impl EffectId {
    /// Number of effects in the catalog
    pub const COUNT: usize = Self::ALL.len();

    /// Position in the catalog
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up an effect by catalog position
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render one frame of a check-off effect using the thread-local RNG
#[must_use]
pub fn render(effect: EffectId, text: &str, clock: EffectClock, palette: &Palette) -> Rendering {
    render_with_rng(effect, text, clock, palette, &mut rand::thread_rng())
}

/// Render one frame of a check-off effect with an explicit RNG
pub fn render_with_rng<R: Rng + ?Sized>(
    effect: EffectId,
    text: &str,
    clock: EffectClock,
    palette: &Palette,
    rng: &mut R,
) -> Rendering {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    match effect.kind() {
        EffectKind::Progress => progress::render(effect, &chars, clock.progress(), palette),
        EffectKind::Noise => noise::render(effect, &chars, clock.progress(), palette, rng),
        EffectKind::Cycle => cycle::render(effect, &chars, clock.seconds(), palette),
        EffectKind::Static => cycle::render_static(effect, &chars, palette),
    }
}

/// Render by raw catalog index
///
/// An index outside the catalog renders the unmodified text in the success
/// color.
#[must_use]
pub fn render_by_index(index: usize, text: &str, clock: EffectClock, palette: &Palette) -> Rendering {
    match EffectId::from_index(index) {
        Some(effect) => render(effect, text, clock, palette),
        None => fallback(text, palette),
    }
}

/// Single-color rendering used when no effect applies
#[must_use]
pub fn fallback(text: &str, palette: &Palette) -> Rendering {
    uniform(text, GlyphStyle::fg(palette.success))
}

/// One frame of the deletion animation: bold warning-colored bits
pub fn render_deletion<R: Rng + ?Sized>(text: &str, palette: &Palette, rng: &mut R) -> Rendering {
    let style = GlyphStyle::fg(palette.warning).bold();
    text.chars()
        .map(|_| Glyph::new(if rng.gen_bool(0.5) { '1' } else { '0' }, style))
        .collect()
}

/// A settled completed title: dim and struck through
#[must_use]
pub fn render_completed(text: &str, palette: &Palette) -> Rendering {
    uniform(text, GlyphStyle::strike(palette))
}

/// A settled pending title
#[must_use]
pub fn render_pending(text: &str, palette: &Palette) -> Rendering {
    uniform(text, GlyphStyle::fg(palette.fg))
}

// ============================================================================
// Effect Selection
// ============================================================================

/// Picks check-off effects, never the same one twice in a row
///
/// The memory is deliberately short-lived: it lives in the interaction
/// session and starts empty on every run.
#[derive(Clone, Debug, Default)]
pub struct EffectPicker {
    last: Option<EffectId>,
}

impl EffectPicker {
    /// A picker with no history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent pick
    #[must_use]
    pub fn last(&self) -> Option<EffectId> {
        self.last
    }

    /// Pick uniformly among all effects except the previous pick
    pub fn pick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EffectId {
        let effect = match self.last {
            None => EffectId::ALL[rng.gen_range(0..EffectId::COUNT)],
            Some(last) => {
                // Draw from the other COUNT - 1 slots and step over `last`
                let mut index = rng.gen_range(0..EffectId::COUNT - 1);
                if index >= last.index() {
                    index += 1;
                }
                EffectId::ALL[index]
            }
        };
        self.last = Some(effect);
        effect
    }
}
