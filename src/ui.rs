use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{App, AppState, SettingsField};
use thirty::session::PingUnit;

const HORIZONTAL_MARGIN: u16 = 4;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Timer => render_timer(self, area, buf),
            AppState::Settings => render_settings(self, area, buf),
            AppState::ConfirmNextSet => render_confirm(
                "Set complete!",
                "Start the next set?  (y/n)",
                Color::Green,
                area,
                buf,
            ),
            AppState::ConfirmResetSets => render_confirm(
                "Reset sets?",
                "Reset the set counter to 0?  (y/n)",
                Color::Yellow,
                area,
                buf,
            ),
        }
    }
}

fn render_timer(app: &App, area: Rect, buf: &mut Buffer) {
    let display = app.session.display();
    let config = app.session.config();

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let clock_style = if display.running {
        bold_style.fg(Color::Green)
    } else if app.session.remaining_seconds() == 0 {
        bold_style.fg(Color::Red)
    } else {
        bold_style.fg(Color::Gray)
    };

    let status = if display.running {
        "running"
    } else if app.session.remaining_seconds() == 0 {
        "set complete"
    } else {
        "paused"
    };

    let ping_summary = match config.ping_unit {
        PingUnit::Off => "ping off".to_string(),
        PingUnit::Seconds => format!("ping every {}s", config.ping_value),
        PingUnit::Minutes => format!("ping every {}m", config.ping_value),
    };

    let body_lines = 6u16;
    let top_pad = area.height.saturating_sub(body_lines) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(top_pad),
                Constraint::Length(1), // clock
                Constraint::Length(1), // status
                Constraint::Length(1), // sets counter
                Constraint::Length(1), // config summary
                Constraint::Min(0),
                Constraint::Length(1), // hints
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Span::styled(display.clock, clock_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(status, italic_style))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        format!("Sets done: {}", display.sets_done),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} min set   ·   {}   ·   vol {}%",
            config.set_minutes, ping_summary, config.volume
        ),
        dim_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "space start/pause · r reset · +/- sets · 0 zero sets · s settings · q quit",
        dim_style,
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[6], buf);
}

fn render_settings(app: &App, area: Rect, buf: &mut Buffer) {
    let form = &app.settings;

    let rows: [(SettingsField, &str, String); 4] = [
        (
            SettingsField::SetMinutes,
            "Set length (min)",
            form.set_minutes.clone(),
        ),
        (
            SettingsField::PingValue,
            "Ping every",
            form.ping_value.clone(),
        ),
        (
            SettingsField::PingUnit,
            "Ping unit",
            form.ping_unit.label().to_string(),
        ),
        (SettingsField::Volume, "Volume", format!("{}%", form.volume)),
    ];

    let lines: Vec<Line> = rows
        .iter()
        .map(|(field, label, value)| {
            let selected = *field == form.field;
            let marker = if selected { "▸ " } else { "  " };
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{}{:<18}{}", marker, label, value),
                style,
            ))
        })
        .collect();

    let form_height = lines.len() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(form_height + 2) / 2),
                Constraint::Length(form_height),
                Constraint::Min(0),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Settings"))
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "↑/↓ field · ←/→ adjust · digits type · enter apply (resets the set) · esc cancel",
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[3], buf);
}

fn render_confirm(title: &str, question: &str, accent: Color, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(3) / 2),
                Constraint::Length(3),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Span::styled(
        question,
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL).title(title))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);
}
