//! List View
//!
//! Draws a [`Session`] into a ratatui frame. Rendering is a pure function of
//! the session, the sampled time, and the random source used for deletion
//! frames, so it can be exercised against a `TestBackend`.
//!
//! ```text
//!                   // TODO LIST
//! ╭──────────────────────────────────────────────╮
//! │┃   1. [ ] pay rent                  2h5m0s   │
//! │    2. [✔] read book                          │
//! │    3.  >  new ti█                            │
//! ╰──────────────────────────────────────────────╯
//!  Theme: Nord (t) • Sort: Off (s) • New (n) • ...
//! ```

use rand::Rng;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use ticklist_core::effects::{self, Glyph};
use ticklist_core::{format_remaining, Mode, Moment, Palette, Session, Task, TextBuffer};

use crate::theme::{self, Theme};

/// Header text
pub const TITLE: &str = "// TODO LIST";

/// Widest the list container gets
pub const MAX_LIST_WIDTH: u16 = 100;

/// Rows above and below the list container
const CHROME_HEIGHT: u16 = 7;

/// Columns reserved for number, icon, spacers, and the countdown
const RESERVED_COLUMNS: usize = 40;

/// Narrowest title column
const MIN_TITLE_WIDTH: usize = 10;

/// Width of the inline deadline input
const DEADLINE_INPUT_WIDTH: usize = 20;

/// Shown for a passed deadline
pub const OVERDUE: &str = "[OVERDUE]";

/// Draw the whole screen
pub fn draw<R: Rng + ?Sized>(frame: &mut Frame, session: &Session, now: Moment, rng: &mut R) {
    let theme = theme::theme_at(session.theme_index());
    let area = frame.area();

    let list_width = area.width.saturating_sub(4).min(MAX_LIST_WIDTH);
    let list_height = area.height.saturating_sub(CHROME_HEIGHT).max(3);
    let total_height = (list_height + 2).min(area.height);
    let top = area.y + (area.height - total_height) / 2;

    let header_area = Rect::new(area.x, top, area.width, 1).intersection(area);
    let list_area = centered(Rect::new(area.x, top + 1, area.width, list_height), list_width)
        .intersection(area);
    let status_area = Rect::new(area.x, list_area.bottom(), area.width, 1).intersection(area);

    frame.render_widget(header(theme), header_area);
    draw_list(frame, list_area, session, theme, now, rng);
    frame.render_widget(status_line(session, theme), status_area);
}

/// `width` columns horizontally centered in `area`
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height)
}

fn header(theme: &Theme) -> Paragraph<'static> {
    let style = Style::default()
        .fg(theme::color(theme.palette.bg))
        .bg(theme::color(theme.palette.accent))
        .add_modifier(Modifier::BOLD);
    Paragraph::new(Line::from(Span::styled(format!(" {TITLE} "), style))).alignment(Alignment::Center)
}

/// The help and status line
#[must_use]
pub fn help_text(session: &Session) -> String {
    format!(
        "Theme: {} (t) • Sort: {} (s) • New (n) • Edit (e) • Check (Space) • Notify (@) • Del (d)",
        theme::theme_at(session.theme_index()).name,
        session.store().sort_mode().label(),
    )
}

fn status_line(session: &Session, theme: &Theme) -> Paragraph<'static> {
    Paragraph::new(help_text(session))
        .style(Style::default().fg(theme::color(theme.palette.dim)))
        .alignment(Alignment::Center)
}

// ============================================================================
// List
// ============================================================================

fn draw_list<R: Rng + ?Sized>(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    theme: &Theme,
    now: Moment,
    rng: &mut R,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::color(theme.palette.accent)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let store = session.store();
    let creating = session.mode() == Mode::Creating;

    if store.is_empty() && !creating {
        let empty = Paragraph::new("No tasks.")
            .style(Style::default().fg(theme::color(theme.palette.dim)))
            .block(Block::default().padding(Padding::uniform(2)));
        frame.render_widget(empty, inner);
        return;
    }

    let title_width = usize::from(area.width)
        .saturating_sub(RESERVED_COLUMNS)
        .max(MIN_TITLE_WIDTH);
    let selected = if creating { store.len() } else { session.cursor() };

    let mut lines: Vec<Line<'static>> = store
        .tasks()
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let row = RowView {
                number: index + 1,
                selected: index == selected,
                title_width,
            };
            row.task_line(task, session, &theme.palette, now, &mut *rng)
        })
        .collect();

    if creating {
        let row = RowView {
            number: store.len() + 1,
            selected: true,
            title_width,
        };
        lines.push(row.input_line(session.input(), &theme.palette));
    }

    // Keep the selected row on screen
    let visible = usize::from(inner.height).max(1);
    let offset = selected.saturating_sub(visible - 1);
    let lines: Vec<Line<'static>> = lines.into_iter().skip(offset).take(visible).collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Per-row layout parameters
struct RowView {
    number: usize,
    selected: bool,
    title_width: usize,
}

impl RowView {
    fn task_line<R: Rng + ?Sized>(
        &self,
        task: &Task,
        session: &Session,
        palette: &Palette,
        now: Moment,
        rng: &mut R,
    ) -> Line<'static> {
        let mode = session.mode();
        if matches!(mode, Mode::Editing { target } if target == task.id) {
            return self.input_line(session.input(), palette);
        }

        let icon = if task.done {
            Span::styled("[✔]", Style::default().fg(theme::color(palette.success)))
        } else {
            Span::styled("[ ]", Style::default().fg(theme::color(palette.accent)))
        };

        let mut spans = self.lead(icon, palette);
        let title = title_glyphs(task, session, palette, now, rng);
        spans.extend(padded(glyph_spans(&title), &effects::plain_text(&title), self.title_width));
        spans.push(Span::raw("   "));

        if matches!(mode, Mode::SettingDeadline { target } if target == task.id) {
            spans.extend(input_spans(session.input(), DEADLINE_INPUT_WIDTH, palette));
        } else if let Some(due) = deadline_span(task, palette, now) {
            spans.push(due);
        }

        self.finish(spans, palette)
    }

    fn input_line(&self, input: &TextBuffer, palette: &Palette) -> Line<'static> {
        let icon = Span::styled(" > ", Style::default().fg(theme::color(palette.accent)));
        let mut spans = self.lead(icon, palette);
        spans.extend(input_spans(input, self.title_width, palette));
        self.finish(spans, palette)
    }

    /// Selection bar, number, and icon
    fn lead(&self, icon: Span<'static>, palette: &Palette) -> Vec<Span<'static>> {
        let accent = Style::default().fg(theme::color(palette.accent));
        let bar = if self.selected {
            Span::styled("┃ ", accent)
        } else {
            Span::raw("  ")
        };
        vec![
            bar,
            Span::styled(
                format!("{:>4}", format!("{}.", self.number)),
                Style::default().fg(theme::color(palette.dim)),
            ),
            Span::raw(" "),
            icon,
            Span::raw(" "),
        ]
    }

    fn finish(&self, spans: Vec<Span<'static>>, palette: &Palette) -> Line<'static> {
        let line = Line::from(spans);
        if self.selected {
            line.style(
                Style::default()
                    .fg(theme::color(palette.accent))
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            line.style(Style::default().fg(theme::color(palette.fg)))
        }
    }
}

/// The title in its current animation frame
fn title_glyphs<R: Rng + ?Sized>(
    task: &Task,
    session: &Session,
    palette: &Palette,
    now: Moment,
    rng: &mut R,
) -> Vec<Glyph> {
    if task.animation.is_deleting() {
        return effects::render_deletion(&task.title, palette, rng);
    }
    if let Some(effect) = task.animation.effect() {
        return match session.timings().clock(&task.animation, now.instant) {
            Some(clock) => effects::render(effect, &task.title, clock, palette),
            None => effects::fallback(&task.title, palette),
        };
    }
    if task.done {
        effects::render_completed(&task.title, palette)
    } else {
        effects::render_pending(&task.title, palette)
    }
}

/// Countdown or overdue marker for an open deadline
fn deadline_span(task: &Task, palette: &Palette, now: Moment) -> Option<Span<'static>> {
    if task.done {
        return None;
    }
    let due = task.due_at?;
    let remaining = due - now.wall;
    match remaining.to_std() {
        Ok(remaining) => Some(Span::styled(
            format_remaining(remaining),
            Style::default()
                .fg(theme::color(palette.secondary))
                .add_modifier(Modifier::ITALIC),
        )),
        Err(_) => Some(Span::styled(
            OVERDUE,
            Style::default()
                .fg(theme::color(palette.warning))
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        )),
    }
}

/// Consecutive glyphs with the same style share a span
fn glyph_spans(glyphs: &[Glyph]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut current = None;

    for glyph in glyphs {
        if current.is_some_and(|style| style != glyph.style) {
            if let Some(style) = current {
                spans.push(Span::styled(std::mem::take(&mut run), theme::style(style)));
            }
        }
        current = Some(glyph.style);
        run.push(glyph.ch);
    }
    if let Some(style) = current {
        spans.push(Span::styled(run, theme::style(style)));
    }
    spans
}

/// Pad spans with blanks up to `width` display columns
fn padded(mut spans: Vec<Span<'static>>, text: &str, width: usize) -> Vec<Span<'static>> {
    let used = text.width();
    if used < width {
        spans.push(Span::raw(" ".repeat(width - used)));
    }
    spans
}

/// The edit buffer with a block cursor, scrolled to keep the cursor visible
fn input_spans(input: &TextBuffer, width: usize, palette: &Palette) -> Vec<Span<'static>> {
    let style = Style::default()
        .fg(theme::color(palette.accent))
        .add_modifier(Modifier::BOLD);
    let cursor_style = style.add_modifier(Modifier::REVERSED);

    let chars: Vec<char> = input.text().chars().collect();
    let cursor = input.cursor();
    let start = (cursor + 1).saturating_sub(width.max(1));

    let before: String = chars[start..cursor].iter().collect();
    let under = chars.get(cursor).copied().unwrap_or(' ');
    let after_end = chars.len().min(start + width.max(1));
    let after: String = chars
        .get(cursor + 1..after_end)
        .map(|rest| rest.iter().collect())
        .unwrap_or_default();

    vec![
        Span::styled(before, style),
        Span::styled(under.to_string(), cursor_style),
        Span::styled(after, style),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ticklist_core::GlyphStyle;

    fn text(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_glyph_spans_merge_runs() {
        let red = GlyphStyle::fg(ticklist_core::Rgb(255, 0, 0));
        let glyphs = [
            Glyph::new('a', red),
            Glyph::new('b', red),
            Glyph::new('c', GlyphStyle::PLAIN),
        ];
        let spans = glyph_spans(&glyphs);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "ab");
        assert_eq!(spans[1].content, "c");
        assert!(glyph_spans(&[]).is_empty());
    }

    #[test]
    fn test_input_cursor_at_end() {
        let input = TextBuffer::with_text("abc");
        let spans = input_spans(&input, 10, &Palette::default());
        assert_eq!(text(&spans), "abc ");
        assert!(spans[1].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_input_scrolls_to_cursor() {
        let input = TextBuffer::with_text("abcdefgh");
        let spans = input_spans(&input, 4, &Palette::default());
        assert_eq!(text(&spans), "fgh ");
    }

    #[test]
    fn test_input_cursor_in_middle() {
        let mut input = TextBuffer::with_text("abcd");
        input.left();
        input.left();
        let spans = input_spans(&input, 10, &Palette::default());
        assert_eq!(spans[0].content, "ab");
        assert_eq!(spans[1].content, "c");
        assert_eq!(spans[2].content, "d");
    }

    #[test]
    fn test_padding_uses_display_width() {
        let spans = padded(vec![Span::raw("日本")], "日本", 6);
        assert_eq!(text(&spans), "日本  ");
    }
}
