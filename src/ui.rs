//! Terminal UI rendering for the folio TUI.
//!
//! Layout, top to bottom: navbar, separator, the visible slice of the page,
//! status bar. Minimal chrome: grayscale plus one accent color, whitespace
//! for structure.
//!
//! This module renders from RenderState (immutable snapshot) - it never
//! mutates application state.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::content::{Row, SectionId};
use crate::render::{CounterView, RenderState};
use crate::tea::{Notification, NotificationLevel};
use crate::typewriter::Phase;

const COLOR_ACCENT: Color = Color::Rgb(0xF3, 0x03, 0x7E);
const COLOR_TEXT_DIMMED: Color = Color::Gray;
const COLOR_TEXT_MUTED: Color = Color::DarkGray;
const COLOR_SEPARATOR: Color = Color::White;
const COLOR_BADGE: Color = Color::Green;

/// Rows taken by the navbar, separator and status bar.
pub const CHROME_HEIGHT: u16 = 3;

const INDENT: &str = "  ";
const CURSOR: &str = "▌";
const BAR_WIDTH: usize = 24;

/// A single keybinding entry for display.
struct Keybinding(&'static str, &'static str);

/// A group of related keybindings (separated by │).
struct KeybindingGroup(Vec<Keybinding>);

fn keybindings() -> Vec<KeybindingGroup> {
    vec![
        KeybindingGroup(vec![
            Keybinding("j/k", "scroll"),
            Keybinding("space", "page"),
            Keybinding("g/G", "top/bottom"),
        ]),
        KeybindingGroup(vec![
            Keybinding("tab", "next section"),
            Keybinding("1-7", "jump"),
            Keybinding("p", "projects"),
            Keybinding("c", "contact"),
        ]),
        KeybindingGroup(vec![Keybinding("q", "quit")]),
    ]
}

/// Main render function - entry point for all UI drawing.
pub fn draw(frame: &mut Frame, state: &RenderState) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    frame.render_widget(Paragraph::new(render_navbar(state)), chunks[0]);
    render_separator(frame, chunks[1]);
    render_page(frame, state, chunks[2]);
    frame.render_widget(
        Paragraph::new(render_statusbar(state, chunks[2].height, area.width)),
        chunks[3],
    );

    if let Some(ref notification) = state.notification {
        render_notification(frame, notification, area);
    }
}

/// Initials, name, then one numbered link per section. The link for the
/// section at the top of the screen is highlighted.
fn render_navbar(state: &RenderState) -> Line<'static> {
    let active = match state.active_section {
        SectionId::Highlights => SectionId::Home,
        other => other,
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            state.initials.clone(),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(state.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
    ];

    for (i, section) in SectionId::NAV.iter().enumerate() {
        let style = if *section == active {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(COLOR_TEXT_DIMMED)
        };
        spans.push(Span::styled(format!("{}", i + 1), Style::default().fg(COLOR_TEXT_MUTED)));
        spans.push(Span::styled(format!(" {} ", section.label()), style));
        spans.push(Span::raw(" "));
    }

    Line::from(spans)
}

fn render_separator(frame: &mut Frame, area: Rect) {
    let solid = "─".repeat(area.width as usize);
    let line = Line::from(Span::styled(solid, Style::default().fg(COLOR_SEPARATOR)));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_page(frame: &mut Frame, state: &RenderState, area: Rect) {
    let lines: Vec<Line> = state
        .page
        .rows
        .iter()
        .skip(state.offset)
        .take(area.height as usize)
        .map(|row| render_row(row, state))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_row(row: &Row, state: &RenderState) -> Line<'static> {
    let dimmed = Style::default().fg(COLOR_TEXT_DIMMED);
    let muted = Style::default().fg(COLOR_TEXT_MUTED);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let body: Vec<Span<'static>> = match row {
        Row::Blank => return Line::default(),
        Row::Badge(text) => vec![
            Span::styled("● ", Style::default().fg(COLOR_BADGE)),
            Span::styled(text.clone(), Style::default().fg(COLOR_BADGE)),
        ],
        Row::Name(name) => vec![Span::styled(name.clone(), bold)],
        Row::Headline(text) => vec![Span::styled(text.clone(), dimmed)],
        Row::Typewriter { prefix } => typewriter_spans(prefix, &state.typed, state.phase),
        Row::Tagline(text) => vec![Span::styled(text.clone(), dimmed)],
        Row::Actions(actions) => {
            let mut spans = Vec::new();
            for (i, action) in actions.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw("  "));
                }
                let style = if i == 0 {
                    Style::default().fg(Color::Black).bg(COLOR_ACCENT)
                } else {
                    Style::default().add_modifier(Modifier::REVERSED)
                };
                spans.push(Span::styled(format!(" {} ", action), style));
            }
            spans
        }
        Row::ScrollHint => vec![Span::styled("↓ scroll", muted)],
        Row::SectionTitle(title) => vec![Span::styled(
            title.clone(),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        )],
        Row::Text(text) => vec![Span::raw(text.clone())],
        Row::Kicker(text) => vec![Span::styled(text.to_uppercase(), muted)],
        Row::ItemTitle(text) => vec![Span::styled(text.clone(), bold)],
        Row::Bullet(text) => vec![Span::styled("• ", muted), Span::raw(text.clone())],
        Row::Tags(tags) => vec![Span::styled(tags.join(" · "), dimmed)],
        Row::Meta(text) => vec![Span::styled(text.clone(), muted)],
        Row::Link(link) => vec![
            Span::styled(format!("{:<10}", link.label), bold),
            Span::styled(
                link.url.clone(),
                Style::default().add_modifier(Modifier::UNDERLINED),
            ),
        ],
        Row::Counter(index) => match state.counters.get(*index) {
            Some(view) => counter_spans(view),
            None => return Line::default(),
        },
    };

    let mut spans = Vec::with_capacity(body.len() + 1);
    spans.push(Span::raw(INDENT));
    spans.extend(body);
    Line::from(spans)
}

fn typewriter_spans(prefix: &str, typed: &str, phase: Phase) -> Vec<Span<'static>> {
    // The cursor only blinks while the word sits fully typed
    let cursor_style = match phase {
        Phase::PausingAfterTyped => Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::SLOW_BLINK),
        _ => Style::default().fg(COLOR_ACCENT),
    };
    vec![
        Span::styled(prefix.to_string(), Style::default().fg(COLOR_TEXT_DIMMED)),
        Span::styled(
            typed.to_string(),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(CURSOR, cursor_style),
    ]
}

fn counter_spans(view: &CounterView) -> Vec<Span<'static>> {
    let value_style = if view.started {
        Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_TEXT_MUTED)
    };
    vec![
        Span::styled(format!("{:>6}", view.display_value()), value_style),
        Span::raw("  "),
        Span::styled(progress_bar(view.ratio(), BAR_WIDTH), Style::default().fg(COLOR_ACCENT)),
        Span::raw("  "),
        Span::styled(view.label.clone(), Style::default().fg(COLOR_TEXT_DIMMED)),
    ]
}

/// `width` cells of █ and ░, filled in proportion to `ratio`.
fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Bottom line: the '?' toggle (plus the legend when expanded) on the left,
/// scroll position on the right.
fn render_statusbar(state: &RenderState, page_height: u16, width: u16) -> Line<'static> {
    let key_style = Style::default().fg(COLOR_TEXT_DIMMED);
    let desc_style = Style::default().fg(COLOR_TEXT_MUTED);
    let sep_style = Style::default().fg(COLOR_TEXT_MUTED);

    let help_style = if state.show_keymap {
        Style::default()
    } else {
        Style::default().fg(COLOR_TEXT_MUTED)
    };
    let mut spans: Vec<Span> = vec![Span::styled("?", help_style)];

    if state.show_keymap {
        for group in keybindings() {
            spans.push(Span::styled(" │ ", sep_style));
            for (key_idx, keybinding) in group.0.iter().enumerate() {
                if key_idx > 0 {
                    spans.push(Span::styled(" • ", sep_style));
                }
                spans.push(Span::styled(keybinding.0, key_style));
                spans.push(Span::styled(format!(" {}", keybinding.1), desc_style));
            }
        }
    }

    let position = format!("{:>3}% ", state.scroll_percent(page_height as usize));
    let content_width: usize = spans.iter().map(Span::width).sum();
    let spacer = (width as usize)
        .saturating_sub(content_width)
        .saturating_sub(position.width());
    if spacer > 0 {
        spans.push(Span::raw(" ".repeat(spacer)));
    }
    spans.push(Span::styled(position, desc_style));

    Line::from(spans)
}

/// Render notification message on the bottom line of the screen.
///
/// - Error: Red text with "Error:" prefix and bold styling
/// - Info: Green text without prefix
fn render_notification(frame: &mut Frame, notification: &Notification, area: Rect) {
    let notification_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, notification_area);

    let message = truncate(&notification.message, area.width.saturating_sub(7) as usize);
    let line = match notification.level {
        NotificationLevel::Error => Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(message, Style::default().fg(Color::Red)),
        ]),
        NotificationLevel::Info => {
            Line::from(Span::styled(message, Style::default().fg(Color::Green)))
        }
    };

    frame.render_widget(Paragraph::new(line), notification_area);
}

/// Cut `s` to at most `max_width` cells, marking the cut with `~`.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = if max_width <= 3 { max_width } else { max_width - 1 };
    let mut out = String::new();
    let mut used = 0;
    for grapheme in s.graphemes(true) {
        let w = grapheme.width();
        if used + w > budget {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    if max_width > 3 {
        out.push('~');
    }
    out
}
