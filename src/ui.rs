pub mod charting;
pub mod keyboard;

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, LineGauge, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::language::Language;
use crate::session::{Session, TestDuration};
use crate::ui::keyboard::{Keyboard, KEYBOARD_HEIGHT};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
/// Lines of words visible while typing.
const WORD_LINES: usize = 3;

pub const REVEAL_HINT: &str = "press space to start typing";
pub const RESTART_HINT: &str = "press tab to restart";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.session.is_finished() {
            render_results(self, area, buf);
        } else {
            render_typing(self, area, buf);
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let accent = app.theme().accent();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // settings
            Constraint::Min(0),
            Constraint::Length(1), // timer
            Constraint::Length(WORD_LINES as u16),
            Constraint::Length(1), // live stats or hint
            Constraint::Length(1),
            Constraint::Length(KEYBOARD_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    if !session.is_running() {
        Paragraph::new(settings_line(app, accent))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
    }

    LineGauge::default()
        .label(Span::styled(
            format!("{:>2} ", session.seconds_remaining()),
            bold_style.fg(accent),
        ))
        .line_set(symbols::line::THICK)
        .filled_style(Style::default().fg(accent))
        .unfilled_style(Style::default().add_modifier(Modifier::DIM))
        .ratio(session.progress())
        .render(chunks[2], buf);

    let width = chunks[3].width as usize;
    Paragraph::new(word_lines(session, width, accent)).render(chunks[3], buf);

    if !session.revealed() {
        Paragraph::new(Span::styled(REVEAL_HINT, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    } else if session.is_running()
        && session.seconds_remaining() < session.config().duration.secs()
    {
        let stats = session.snapshot();
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} wpm", stats.wpm), bold_style.fg(accent)),
            Span::styled(
                format!(
                    "   {} raw   {}% acc   {}/{}/{}/{}",
                    stats.raw_wpm,
                    stats.accuracy,
                    stats.correct_chars,
                    stats.incorrect_chars,
                    stats.extra_chars,
                    stats.missed_chars
                ),
                dim_style,
            ),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }

    if session.is_running() {
        Keyboard::new(&app.keymap, accent, Instant::now()).render(chunks[6], buf);
    }

    Paragraph::new(Span::styled(
        "(tab) restart / (←→) time / (↑↓) language / (ctrl-t) theme / (esc)ape",
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[8], buf);
}

fn settings_line(app: &App, accent: Color) -> Line<'static> {
    let selected = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    let other = Style::default().add_modifier(Modifier::DIM);
    let config = app.session.config();

    let mut spans = TestDuration::ALL
        .iter()
        .map(|d| {
            let style = if *d == config.duration { selected } else { other };
            Span::styled(format!("{} ", d.secs()), style)
        })
        .collect::<Vec<Span>>();
    spans.push(Span::styled("| ", other));
    spans.extend(Language::ALL.iter().map(|l| {
        let style = if *l == config.language { selected } else { other };
        Span::styled(format!("{} ", l.label()), style)
    }));
    spans.push(Span::styled("| ", other));
    spans.push(Span::styled(app.theme().to_string(), selected));

    Line::from(spans)
}

/// Line each visible word lands on when wrapped at `width` columns.
fn wrap_words(widths: &[usize], width: usize) -> Vec<usize> {
    let mut line = 0;
    let mut used = 0;
    widths
        .iter()
        .map(|&w| {
            let needed = if used == 0 { w } else { used + 1 + w };
            if used > 0 && needed > width {
                line += 1;
                used = w;
            } else {
                used = needed;
            }
            line
        })
        .collect()
}

fn word_spans(session: &Session, idx: usize, word: &str, accent: Color) -> Vec<Span<'static>> {
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let correct_style = Style::default().add_modifier(Modifier::BOLD);
    let incorrect_style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
    let extra_style = Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT);
    let caret_style = Style::default()
        .fg(accent)
        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD);

    let current = idx == session.word_index();
    if !session.revealed() || idx > session.word_index() {
        return vec![Span::styled(word.to_string(), dim_style)];
    }

    let typed = session.typed().get(idx).map_or("", String::as_str);
    let typed_len = typed.chars().count();
    let mut spans = Vec::new();
    let mut typed_chars = typed.chars();

    for (pos, expected) in word.chars().enumerate() {
        let style = match typed_chars.next() {
            Some(c) if c == expected => correct_style,
            Some(_) => incorrect_style,
            None if current && pos == typed_len => caret_style,
            None => dim_style,
        };
        spans.push(Span::styled(expected.to_string(), style));
    }
    let extra: String = typed_chars.collect();
    if !extra.is_empty() {
        spans.push(Span::styled(extra, extra_style));
    }
    if current && typed_len >= word.chars().count() {
        // caret sits on the separator once the word is complete
        spans.push(Span::styled("_", caret_style.remove_modifier(Modifier::UNDERLINED)));
    }

    spans
}

fn word_lines(session: &Session, width: usize, accent: Color) -> Vec<Line<'static>> {
    let words = session.visible_words();
    let widths = words
        .iter()
        .enumerate()
        .map(|(idx, w)| {
            let typed = session.typed().get(idx).map_or(0, |t| t.width());
            w.width().max(typed)
        })
        .collect::<Vec<usize>>();
    let line_of = wrap_words(&widths, width.max(1));

    let current_line = line_of
        .get(session.word_index())
        .or(line_of.last())
        .copied()
        .unwrap_or(0);
    let first_line = current_line.saturating_sub(1);

    let mut lines: Vec<Vec<Span>> = vec![Vec::new(); WORD_LINES];
    for (idx, word) in words.iter().enumerate() {
        let Some(row) = line_of[idx].checked_sub(first_line).filter(|r| *r < WORD_LINES) else {
            continue;
        };
        if !lines[row].is_empty() {
            lines[row].push(Span::raw(" "));
        }
        lines[row].extend(word_spans(session, idx, word, accent));
    }

    lines.into_iter().map(Line::from).collect()
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let accent = app.theme().accent();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // headline figures
            Constraint::Length(1), // breakdown
            Constraint::Length(1), // word counts
            Constraint::Length(1), // legend
        ])
        .split(area);

    let duration = session.config().duration.secs();
    let points = session.series().chart_points(duration);
    let (overall_duration, highest_wpm) = charting::compute_chart_params(&points, duration);

    let tuples: Vec<(f64, f64)> = points.iter().map(|p| (*p).into()).collect();
    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(accent))
        .graph_type(GraphType::Line)
        .data(&tuples)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, overall_duration])
                .labels(
                    charting::x_labels(duration)
                        .into_iter()
                        .map(|l| Span::styled(l, bold_style))
                        .collect::<Vec<Span>>(),
                ),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        )
        .render(chunks[0], buf);

    let stats = session.final_snapshot();
    Paragraph::new(Line::from(vec![
        Span::styled(format!("{} wpm", stats.wpm), bold_style.fg(accent)),
        Span::styled(
            format!(
                "   {}% acc   {}/{} chars",
                stats.accuracy, stats.correct_chars, stats.total_chars
            ),
            bold_style,
        ),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::raw(format!(
        "{} raw   {}/{}/{}/{} c/i/e/m   {:.2} sd   {}s {}",
        stats.raw_wpm,
        stats.correct_chars,
        stats.incorrect_chars,
        stats.extra_chars,
        stats.missed_chars,
        session.series().consistency(),
        duration,
        session.config().language,
    )))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} perfect words   {} spaces",
            stats.perfect_words, stats.separators
        ),
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        format!("{RESTART_HINT} / (esc)ape"),
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FileConfigStore};
    use crate::keymap::NoopObserver;
    use crate::session::{KeyInput, SessionConfig};
    use std::time::Duration;

    fn create_test_app(words: &[&str]) -> App {
        let session = Session::with_words(
            SessionConfig::default(),
            words.iter().map(|w| w.to_string()).collect(),
        );
        let store = FileConfigStore::with_path(std::env::temp_dir().join("sprintype-ui-test.json"));
        App::with_session(session, Config::default(), Box::new(store))
    }

    fn type_str(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            let key = if c == ' ' {
                KeyInput::Space
            } else {
                KeyInput::Char(c)
            };
            app.session.handle_key(key, now, &mut NoopObserver);
        }
    }

    fn render(app: &App, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
    }

    fn text(buffer: &Buffer) -> String {
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap_words(&[3, 5, 5], 20), vec![0, 0, 0]);
        assert_eq!(wrap_words(&[3, 5, 5], 9), vec![0, 0, 1]);
        // a word wider than the line still gets a line of its own
        assert_eq!(wrap_words(&[12, 2], 5), vec![0, 1]);
        assert!(wrap_words(&[], 5).is_empty());
    }

    #[test]
    fn test_idle_screen_shows_hint_and_settings() {
        let app = create_test_app(&["hello", "world"]);
        let rendered = text(&render(&app, 80, 24));

        assert!(rendered.contains(REVEAL_HINT));
        assert!(rendered.contains("hello"));
        assert!(rendered.contains("English"));
        assert!(rendered.contains("charcoal"));
        assert!(rendered.contains("15"));
    }

    #[test]
    fn test_running_screen_colours_glyphs() {
        let mut app = create_test_app(&["hello", "world"]);
        let now = Instant::now();
        app.session.handle_key(KeyInput::Reveal, now, &mut NoopObserver);
        type_str(&mut app, "hx", now);

        let buffer = render(&app, 80, 24);
        let rendered = text(&buffer);
        assert!(!rendered.contains(REVEAL_HINT));
        assert!(rendered.contains("hello world"));

        let row = (0..24u16)
            .find(|y| (0..80u16).any(|x| buffer[(x, *y)].symbol() == "w"))
            .unwrap();
        let start = (0..80u16).find(|x| buffer[(*x, row)].symbol() == "h").unwrap();
        assert_eq!(buffer[(start + 1, row)].fg, Color::Red);
        assert!(buffer[(start, row)].modifier.contains(Modifier::BOLD));
        // caret on the next expected glyph
        assert!(buffer[(start + 2, row)].modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_extra_chars_are_appended() {
        let mut app = create_test_app(&["fox", "jumps"]);
        let now = Instant::now();
        app.session.handle_key(KeyInput::Reveal, now, &mut NoopObserver);
        type_str(&mut app, "foxtrot", now);

        let rendered = text(&render(&app, 80, 24));
        assert!(rendered.contains("foxtrot"));
    }

    #[test]
    fn test_live_stats_after_first_second() {
        let mut app = create_test_app(&["hello", "world"]);
        let t0 = Instant::now();
        app.session.handle_key(KeyInput::Reveal, t0, &mut NoopObserver);
        type_str(&mut app, "hello ", t0);
        assert!(!text(&render(&app, 80, 24)).contains("wpm"));

        app.session.poll_timer(t0 + Duration::from_secs(1));
        let rendered = text(&render(&app, 80, 24));
        assert!(rendered.contains("60 wpm"));
        assert!(rendered.contains("100% acc"));
        assert!(rendered.contains("5/0/0/0"));
    }

    #[test]
    fn test_results_screen() {
        let mut app = create_test_app(&["the", "quick", "brown"]);
        let t0 = Instant::now();
        app.session.handle_key(KeyInput::Reveal, t0, &mut NoopObserver);
        type_str(&mut app, "the quikc", t0);
        app.session.poll_timer(t0 + Duration::from_secs(15));
        assert!(app.session.is_finished());

        let rendered = text(&render(&app, 100, 30));
        assert!(rendered.contains(RESTART_HINT));
        assert!(rendered.contains("wpm"));
        assert!(rendered.contains("seconds"));
        // finished stats include the untouched "brown"
        assert!(rendered.contains("6/2/0/5"));
        assert!(rendered.contains("1 perfect words   1 spaces"));
    }

    #[test]
    fn test_timer_bar_fills_with_elapsed_time() {
        let filled = |buffer: &Buffer| {
            buffer
                .content
                .iter()
                .filter(|c| c.symbol() == "━" && c.fg == Color::Rgb(0xe2, 0xb7, 0x14))
                .count()
        };
        let mut app = create_test_app(&["hello", "world"]);
        let t0 = Instant::now();
        assert_eq!(filled(&render(&app, 80, 24)), 0);

        app.session.handle_key(KeyInput::Reveal, t0, &mut NoopObserver);
        type_str(&mut app, "he", t0);
        app.session.poll_timer(t0 + Duration::from_secs(5));
        let third = render(&app, 80, 24);
        assert!(text(&third).contains("10 "));

        app.session.poll_timer(t0 + Duration::from_secs(10));
        let two_thirds = render(&app, 80, 24);
        assert!(filled(&third) > 0);
        assert!(filled(&two_thirds) > filled(&third));
    }

    #[test]
    fn test_renders_in_tiny_area() {
        let app = create_test_app(&["hello"]);
        render(&app, 10, 3);
        render(&app, 1, 1);
    }

    #[test]
    fn test_current_word_stays_visible() {
        let words = (0..60).map(|i| format!("w{i:02}")).collect::<Vec<String>>();
        let refs = words.iter().map(String::as_str).collect::<Vec<&str>>();
        let mut app = create_test_app(&refs);
        let now = Instant::now();
        app.session.handle_key(KeyInput::Reveal, now, &mut NoopObserver);
        for word in &words[..40] {
            type_str(&mut app, word, now);
            app.session.handle_key(KeyInput::Space, now, &mut NoopObserver);
        }

        let rendered = text(&render(&app, 40, 24));
        assert!(rendered.contains("w40"));
        assert!(!rendered.contains("w00"));
    }
}
