use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::keymap::{KeymapState, KEY_ROWS};

/// Rows of keys plus the space bar.
pub const KEYBOARD_HEIGHT: u16 = KEY_ROWS.len() as u16 + 1;

const SPACE_BAR: &str = "          space          ";

/// On-screen keyboard with the expected key highlighted and the last
/// keystroke flashing.
pub struct Keyboard<'a> {
    state: &'a KeymapState,
    accent: Color,
    now: Instant,
}

impl<'a> Keyboard<'a> {
    pub fn new(state: &'a KeymapState, accent: Color, now: Instant) -> Self {
        Self { state, accent, now }
    }

    fn key_style(&self, key: char) -> Style {
        let base = Style::default().add_modifier(Modifier::DIM);
        if let Some(flash) = self.state.active_flash(self.now) {
            if flash.key.lights(key) {
                let bg = if flash.ok { Color::Green } else { Color::Red };
                return Style::default().fg(Color::Black).bg(bg);
            }
        }
        if self.state.highlighted() == Some(key) {
            return Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        base
    }
}

impl Widget for Keyboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines: Vec<Line> = KEY_ROWS
            .iter()
            .map(|row| {
                let spans = row
                    .chars()
                    .map(|key| Span::styled(format!(" {key} "), self.key_style(key)))
                    .collect::<Vec<Span>>();
                Line::from(spans)
            })
            .collect();
        lines.push(Line::from(Span::styled(SPACE_BAR, self.key_style(' '))));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{FlashKey, KeyFlash, KeyboardObserver};

    fn find(buf: &Buffer, symbol: &str) -> (u16, u16) {
        let area = buf.area;
        for y in 0..area.height {
            for x in 0..area.width {
                if buf[(x, y)].symbol() == symbol {
                    return (x, y);
                }
            }
        }
        panic!("{symbol} not rendered");
    }

    #[test]
    fn renders_all_rows() {
        let state = KeymapState::new();
        let area = Rect::new(0, 0, 60, KEYBOARD_HEIGHT);
        let mut buf = Buffer::empty(area);
        Keyboard::new(&state, Color::Yellow, Instant::now()).render(area, &mut buf);

        let text: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains('q'));
        assert!(text.contains('/'));
        assert!(text.contains("space"));
    }

    #[test]
    fn highlights_expected_key() {
        let mut state = KeymapState::new();
        state.next_expected('k');
        let area = Rect::new(0, 0, 60, KEYBOARD_HEIGHT);
        let mut buf = Buffer::empty(area);
        Keyboard::new(&state, Color::Yellow, Instant::now()).render(area, &mut buf);

        let pos = find(&buf, "k");
        assert_eq!(buf[pos].fg, Color::Yellow);
        assert_eq!(buf[find(&buf, "j")].fg, Color::Reset);
    }

    #[test]
    fn flash_colours_follow_outcome() {
        let now = Instant::now();
        let mut state = KeymapState::new();
        state.flash(
            KeyFlash {
                key: FlashKey::Char('x'),
                ok: false,
            },
            now,
        );
        let area = Rect::new(0, 0, 60, KEYBOARD_HEIGHT);

        let mut buf = Buffer::empty(area);
        Keyboard::new(&state, Color::Yellow, now).render(area, &mut buf);
        assert_eq!(buf[find(&buf, "x")].bg, Color::Red);

        // expired flash falls back to the plain style
        let mut buf = Buffer::empty(area);
        Keyboard::new(&state, Color::Yellow, now + crate::keymap::FLASH_DURATION).render(area, &mut buf);
        assert_eq!(buf[find(&buf, "x")].bg, Color::Reset);
    }
}
