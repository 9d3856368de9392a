use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, PlayState};
use crate::theme::Theme;

const TITLE: &str = "◆ Ocean Snake";
const SEPARATOR: &str = " │ ";

/// Values shown on the right side of the header.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct HeaderValues {
    score: u32,
    session: u32,
    best: u32,
    speed_ms: u64,
}

/// Draws the title and score chips.
pub fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = app.theme();
    let snapshot = app.snapshot();
    let values = HeaderValues {
        score: snapshot.score,
        session: app.session().total(),
        best: app.session().best(),
        speed_ms: snapshot.speed_ms,
    };

    let title_width = u16::try_from(TITLE.chars().count()).unwrap_or(u16::MAX);
    let [title_area, info_area] =
        Layout::horizontal([Constraint::Length(title_width.saturating_add(1)), Constraint::Min(0)]).areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(TITLE)).style(
            Style::default()
                .fg(theme.ui_accent)
                .bg(theme.ui_bg)
                .add_modifier(Modifier::BOLD),
        ),
        title_area,
    );

    let compact = info_width(values, false) > usize::from(info_area.width);
    frame.render_widget(
        Paragraph::new(info_line(values, compact, theme))
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.ui_muted).bg(theme.ui_bg)),
        info_area,
    );
}

/// Draws the control tips and the active theme name.
pub fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = app.theme();
    let start_label = match app.play_state() {
        PlayState::Running => "pause",
        _ => "start",
    };
    let tips = format!(
        "Arrows/WASD move{SEPARATOR}Space {start_label}{SEPARATOR}R reset{SEPARATOR}T theme{SEPARATOR}Q quit"
    );

    let [tips_area, theme_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(theme_label_width(theme))])
            .areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(tips)).style(Style::default().fg(theme.ui_muted).bg(theme.ui_bg)),
        tips_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(theme.name.as_str()))
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.ui_text).bg(theme.ui_bg)),
        theme_area,
    );
}

fn theme_label_width(theme: &Theme) -> u16 {
    u16::try_from(theme.name.chars().count() + 1).unwrap_or(u16::MAX)
}

fn labels(compact: bool) -> [&'static str; 4] {
    if compact {
        ["S", "Σ", "B", "T"]
    } else {
        ["Score", "Session", "Best", "Tick"]
    }
}

fn info_line(values: HeaderValues, compact: bool, theme: &Theme) -> Line<'static> {
    let [score_label, session_label, best_label, tick_label] = labels(compact);
    let value_style = Style::default().fg(theme.ui_text);
    let score_style = Style::default()
        .fg(theme.ui_accent)
        .add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::raw(format!("{score_label}: ")),
        Span::styled(values.score.to_string(), score_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{session_label}: ")),
        Span::styled(values.session.to_string(), value_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{best_label}: ")),
        Span::styled(values.best.to_string(), value_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{tick_label}: ")),
        Span::styled(format!("{} ms", values.speed_ms), value_style),
    ])
}

fn info_width(values: HeaderValues, compact: bool) -> usize {
    let [score_label, session_label, best_label, tick_label] = labels(compact);

    format!("{score_label}: {}", values.score).chars().count()
        + format!("{session_label}: {}", values.session).chars().count()
        + format!("{best_label}: {}", values.best).chars().count()
        + format!("{tick_label}: {} ms", values.speed_ms).chars().count()
        + 3 * SEPARATOR.chars().count()
}
