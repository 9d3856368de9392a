use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::app::{App, PlayState};
use crate::config::{GridSize, CELL_WIDTH};
use crate::input::Direction;
use crate::snake::Position;
use crate::theme::Theme;
use crate::ui::hud::{render_footer, render_header};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu, render_won_menu};

const GLYPH_SNAKE_BODY: &str = "██";
const GLYPH_FOOD: &str = "◆ ";
const GLYPH_SNAKE_HEAD_UP: &str = "▲▲";
const GLYPH_SNAKE_HEAD_DOWN: &str = "▼▼";
const GLYPH_SNAKE_HEAD_LEFT: &str = "◀█";
const GLYPH_SNAKE_HEAD_RIGHT: &str = "█▶";

/// Renders the full game frame from the latest snapshot.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let theme = app.theme();
    let snapshot = app.snapshot();
    let area = frame.area();

    frame.render_widget(Block::new().style(Style::new().bg(theme.ui_bg)), area);

    let [header, middle, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header, app);
    render_footer(frame, footer, app);

    let play_area = field_rect(middle, snapshot.grid());
    let block = Block::bordered()
        .border_style(Style::new().fg(theme.border).bg(theme.ui_bg))
        .style(Style::new().bg(theme.field_bg));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    if let Some(food) = snapshot.food {
        draw_cell(frame, inner, snapshot.grid(), food, GLYPH_FOOD, Style::new().fg(theme.food));
    }
    render_snake(frame, inner, app, theme);

    match app.play_state() {
        PlayState::Ready => render_start_menu(frame, play_area, app.session().best(), theme),
        PlayState::Paused => render_pause_menu(frame, play_area, theme),
        PlayState::GameOver(reason) => render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            app.session().best(),
            reason,
            theme,
        ),
        PlayState::Won => render_won_menu(frame, play_area, snapshot.score, theme),
        PlayState::Running => {}
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, app: &App, theme: &Theme) {
    let snapshot = app.snapshot();
    let grid = snapshot.grid();
    let Some((head, body)) = snapshot.snake.split_last() else {
        return;
    };

    for segment in body {
        draw_cell(
            frame,
            inner,
            grid,
            *segment,
            GLYPH_SNAKE_BODY,
            Style::new().fg(theme.snake_body),
        );
    }

    draw_cell(
        frame,
        inner,
        grid,
        *head,
        head_glyph(snapshot.heading),
        Style::new()
            .fg(theme.snake_head)
            .add_modifier(Modifier::BOLD),
    );
}

fn draw_cell(
    frame: &mut Frame<'_>,
    inner: Rect,
    grid: GridSize,
    position: Position,
    glyph: &str,
    style: Style,
) {
    let Some((x, y)) = logical_to_terminal(inner, grid, position) else {
        return;
    };

    frame.buffer_mut().set_string(x, y, glyph, style);
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

/// Centers a bordered field for `grid` inside `area`, clipped to fit.
fn field_rect(area: Rect, grid: GridSize) -> Rect {
    let width = grid.width.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = grid.height.saturating_add(2);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [field] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    field
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;

    use crate::app::{App, AppOptions};
    use crate::config::{EngineConfig, GridSize};
    use crate::snake::Position;
    use crate::theme::ThemeCatalog;

    use super::{field_rect, logical_to_terminal, render};

    #[test]
    fn cells_map_to_two_columns() {
        let inner = Rect::new(1, 1, 20, 10);
        let grid = GridSize {
            width: 10,
            height: 10,
        };

        assert_eq!(logical_to_terminal(inner, grid, Position::new(0, 0)), Some((1, 1)));
        assert_eq!(logical_to_terminal(inner, grid, Position::new(9, 9)), Some((19, 10)));
        assert_eq!(logical_to_terminal(inner, grid, Position::new(10, 0)), None);
        assert_eq!(logical_to_terminal(inner, grid, Position::new(-1, 0)), None);
    }

    #[test]
    fn field_is_centered() {
        let field = field_rect(
            Rect::new(0, 1, 80, 22),
            GridSize {
                width: 20,
                height: 20,
            },
        );

        assert_eq!(field, Rect::new(19, 1, 42, 22));
    }

    #[test]
    fn frame_shows_title_and_start_prompt() {
        let app = App::new(
            AppOptions {
                engine: EngineConfig {
                    seed: Some(5),
                    ..EngineConfig::default()
                },
                ..AppOptions::default()
            },
            ThemeCatalog::builtin(),
        )
        .expect("default options are valid");
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("test backend");

        terminal
            .draw(|frame| render(frame, &app))
            .expect("draw should succeed");

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Ocean Snake"));
        assert!(text.contains("Start"));
    }
}
