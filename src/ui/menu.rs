use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::game::DeathReason;
use crate::theme::Theme;

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, best: u32, theme: &Theme) {
    let popup = centered_popup(area, 80, 60);
    frame.render_widget(Clear, popup);

    let [title_row, body_row] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(3)]).areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("OCEAN SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.ui_accent)
                    .bg(theme.ui_bg)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body = vec![
        Line::from(format!("Session best: {best}")),
        Line::from(""),
        Line::from("[Enter]/[Space] Start"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(popup_paragraph(body, " start ", theme), body_row);
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let popup = centered_popup(area, 70, 40);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[Space] Resume"),
        Line::from("[R] Reset"),
    ];
    frame.render_widget(popup_paragraph(lines, " pause ", theme), popup);
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    best: u32,
    death_reason: Option<DeathReason>,
    theme: &Theme,
) {
    let popup = centered_popup(area, 80, 60);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(format!("Session best: {best}")),
        Line::from(match death_reason {
            Some(DeathReason::WallCollision) => "Cause: hit the reef",
            Some(DeathReason::SelfCollision) => "Cause: bit your tail",
            None => "",
        }),
        Line::from(""),
        Line::from("[Enter] Play Again"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(popup_paragraph(lines, " game over ", theme), popup);
}

/// Draws the board-filled screen as a centered popup.
pub fn render_won_menu(frame: &mut Frame<'_>, area: Rect, score: u32, theme: &Theme) {
    let popup = centered_popup(area, 80, 50);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("THE OCEAN IS YOURS"),
        Line::from(""),
        Line::from(format!("Final score: {score}")),
        Line::from(""),
        Line::from("[Enter] Play Again"),
    ];
    frame.render_widget(popup_paragraph(lines, " board filled ", theme), popup);
}

fn popup_paragraph<'a>(lines: Vec<Line<'a>>, title: &'a str, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.ui_text).bg(theme.ui_bg))
        .block(
            Block::bordered()
                .title(title)
                .border_style(Style::default().fg(theme.border)),
        )
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
