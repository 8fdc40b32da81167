//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  The layout is two panes side by
//! side — the feed list on the left, the article detail on the right — with
//! a one-line status bar underneath.  The focused pane gets the green
//! border.
//!
//! ## For contributors
//!
//! * Drawing is pure: these functions read `App` and render widgets, never
//!   mutating anything except the `ListState` scroll bookkeeping that
//!   [`ratatui`] requires.
//! * Colours are defined inline — extract them into a theme struct if the
//!   palette grows.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, Row};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(main_area);

    draw_item_list(app, frame, list_area);
    draw_detail(app, frame, detail_area);
    draw_status_bar(app, frame, status_area);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Render the scrollable feed item list.
fn draw_item_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let highlight_after = app.highlight_after;
    let list_items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| ListItem::new(row_line(row, highlight_after)))
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(" Feeds ")
                .borders(Borders::ALL)
                .border_style(border_style(app.focus == Focus::List)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// One rendered list row: `date  title  [feed]`, with title cards in green
/// and recently published items in cyan.
fn row_line(row: &Row, highlight_after: chrono::DateTime<chrono::Utc>) -> Line<'_> {
    let item = &row.item;
    if item.is_title_card() {
        return Line::from(Span::styled(
            item.title.as_str(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }
    if item.links.is_empty() {
        // Separator row.
        return Line::default();
    }

    let date_str = item
        .publish_time
        .map(|d| d.format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_default();
    let title_colour = match item.publish_time {
        Some(t) if t > highlight_after => Color::Cyan,
        _ => Color::White,
    };

    Line::from(vec![
        Span::styled(format!("{date_str:<17}"), Style::default().fg(Color::DarkGray)),
        Span::styled(item.title.as_str(), Style::default().fg(title_colour)),
        Span::raw("  "),
        Span::styled(format!("[{}]", item.feed), Style::default().fg(Color::Yellow)),
    ])
}

/// Render the article detail pane.
fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let text = if app.detail.body.is_empty() {
        "Select an item to read it here.".to_string()
    } else {
        format!("{}\n\n{}", app.detail.link, app.detail.body)
    };

    let detail = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Article ")
                .borders(Borders::ALL)
                .border_style(border_style(app.focus == Focus::Detail)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.detail.scroll, 0));

    frame.render_widget(detail, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let articles = app.rows.iter().filter(|r| !r.link.is_empty()).count();
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(format!("{articles} items"), Style::default().fg(Color::Green)),
        Span::raw("  q: quit  ↑/↓: move  ⏎: read  →/←: switch pane"),
    ]));
    frame.render_widget(status, area);
}
