//! Dashboard rendering: pure function of app state to a frame.

use crate::app::{App, Focus};
use chrono::{DateTime, Local, Utc};
use muster_types::{Agent, Command, CommandStatus};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};
use ratatui::Frame;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const ACCENT: Color = Color::Cyan;
const DIM: Color = Color::DarkGray;
const OK: Color = Color::Green;
const BAD: Color = Color::Red;
const PENDING: Color = Color::Yellow;

pub fn draw(frame: &mut Frame, app: &mut App) {
    if !app.console.loaded() {
        draw_loading(frame, app);
        return;
    }

    let [header, body, footer] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .areas(frame.area());

    draw_header(frame, app, header);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(34), Constraint::Percentage(66)]).areas(body);
    draw_agent_list(frame, app, left);
    draw_command_panel(frame, app, right);

    draw_footer(frame, app, footer);
}

fn draw_loading(frame: &mut Frame, app: &App) {
    let spinner = SPINNER[app.tick % SPINNER.len()];
    let text = Paragraph::new(format!("{spinner} Loading agent data..."))
        .alignment(Alignment::Center)
        .style(Style::default().fg(ACCENT));
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Length(1),
        Constraint::Percentage(45),
    ])
    .areas(frame.area());
    frame.render_widget(text, middle);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut status = vec![
        Span::styled("auto-refresh ", Style::default().fg(DIM)),
        Span::raw(format!("{}s", app.console.interval_secs())),
        Span::styled("  last updated ", Style::default().fg(DIM)),
        Span::raw(
            app.scheduler
                .last_success_at()
                .map(format_clock)
                .unwrap_or_else(|| "never".to_string()),
        ),
        Span::styled("  agents ", Style::default().fg(DIM)),
        Span::raw(app.console.roster().len().to_string()),
    ];
    if app.scheduler.in_flight() {
        status.push(Span::styled(
            format!("  {} refreshing", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(ACCENT),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " muster — agent operations ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(Line::from(status)), inner);
}

fn draw_agent_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Agents;
    let border_style = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Connected Agents ");

    let roster = app.console.roster();
    if roster.is_empty() {
        let empty = Paragraph::new("No agents connected")
            .alignment(Alignment::Center)
            .style(Style::default().fg(DIM))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let now = Utc::now();
    let selected_id = app.console.selected().map(|a| a.id.clone());
    let items: Vec<ListItem> = roster
        .iter()
        .map(|agent| agent_item(agent, selected_id.as_deref(), now))
        .collect();

    app.cursor = app.cursor.min(roster.len() - 1);
    let mut state = ListState::default();
    state.select(Some(app.cursor));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn agent_item<'a>(agent: &'a Agent, selected_id: Option<&str>, now: DateTime<Utc>) -> ListItem<'a> {
    let (dot, dot_color, liveness) = if agent.is_active {
        ("●", OK, "active")
    } else {
        ("○", BAD, "inactive")
    };
    let marker = if selected_id == Some(agent.id.as_str()) {
        "▸ "
    } else {
        "  "
    };

    let title = Line::from(vec![
        Span::raw(marker),
        Span::styled(dot, Style::default().fg(dot_color)),
        Span::styled(
            format!(" {}", agent.hostname),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {liveness}"), Style::default().fg(dot_color)),
    ]);
    let detail = Line::from(Span::styled(
        format!(
            "    {}  {}  {}  seen {}",
            short_id(&agent.id),
            agent.ip,
            agent.os,
            humanize_since(agent.last_seen, now)
        ),
        Style::default().fg(DIM),
    ));

    ListItem::new(vec![title, detail])
}

fn draw_command_panel(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Command;
    let border_style = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Command ");

    let Some(agent) = app.console.selected() else {
        let hint = Paragraph::new("Select an agent from the list to send commands")
            .alignment(Alignment::Center)
            .style(Style::default().fg(DIM))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [banner, input_area, history_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(inner);

    let banner_line = Line::from(vec![
        Span::styled("Selected: ", Style::default().fg(DIM)),
        Span::styled(
            agent.hostname.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  ({})", short_id(&agent.id)), Style::default().fg(DIM)),
    ]);
    frame.render_widget(Paragraph::new(banner_line), banner);

    let cursor = if focused { "█" } else { "" };
    let input = Paragraph::new(format!("$ {}{cursor}", app.console.input())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DIM))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(input, input_area);

    draw_history(frame, app.console.history(), history_area);
}

fn draw_history(frame: &mut Frame, history: &[Command], area: Rect) {
    if history.is_empty() {
        let empty = Paragraph::new("No commands have been sent yet")
            .alignment(Alignment::Center)
            .style(Style::default().fg(DIM));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = history.iter().map(history_item).collect();
    frame.render_widget(List::new(items), area);
}

fn history_item(cmd: &Command) -> ListItem<'_> {
    let mut lines = vec![Line::from(vec![
        Span::styled("$ ", Style::default().fg(DIM)),
        Span::raw(cmd.command.clone()),
        Span::styled(
            format!("  {}  ", format_clock(cmd.timestamp)),
            Style::default().fg(DIM),
        ),
        Span::styled(cmd.status.to_string(), Style::default().fg(status_color(cmd.status))),
    ])];
    for out_line in cmd.output.lines() {
        lines.push(Line::from(Span::styled(
            format!("  {out_line}"),
            Style::default().fg(OK),
        )));
    }
    ListItem::new(lines)
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "Tab focus  ↑/↓ move  Enter select/send  r refresh  i interval  q quit",
        Style::default().fg(DIM),
    )];
    if let Some(err) = app.console.last_error() {
        spans.push(Span::styled(
            format!("  ✗ {err}"),
            Style::default().fg(BAD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ─── Formatting helpers ──────────────────────────────────────────────────

fn status_color(status: CommandStatus) -> Color {
    match status {
        CommandStatus::Queued => PENDING,
        CommandStatus::Success => OK,
        CommandStatus::Error => BAD,
    }
}

fn format_clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Compact "time since" for the agent list, matching what operators expect
/// at a glance: seconds under a minute, minutes under an hour, else hours.
fn humanize_since(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - last_seen).num_seconds().max(0);
    if seconds < 60 {
        format!("{seconds}s ago")
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else {
        format!("{}h ago", seconds / 3600)
    }
}

fn short_id(id: &str) -> String {
    if id.chars().count() <= 8 {
        id.to_string()
    } else {
        let head: String = id.chars().take(8).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn humanize_since_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap();
        let secs = |s: i64| now - chrono::Duration::seconds(s);

        assert_eq!(humanize_since(secs(0), now), "0s ago");
        assert_eq!(humanize_since(secs(59), now), "59s ago");
        assert_eq!(humanize_since(secs(60), now), "1m ago");
        assert_eq!(humanize_since(secs(3599), now), "59m ago");
        assert_eq!(humanize_since(secs(3600), now), "1h ago");
        assert_eq!(humanize_since(secs(7300), now), "2h ago");
    }

    #[test]
    fn humanize_since_clamps_clock_skew() {
        let now = Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap();
        let future = now + chrono::Duration::seconds(30);
        assert_eq!(humanize_since(future, now), "0s ago");
    }

    #[test]
    fn short_id_truncates_long_ids() {
        assert_eq!(short_id("3f6c2a1e"), "3f6c2a1e");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("3f6c2a1e-9d41-4b7f"), "3f6c2a1e…");
    }
}
