use std::time::Duration;

use thiserror::Error;

use crate::snake::{Position, SnakeError};

/// Logical grid dimensions (`cols × rows`) passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Largest grid whose cells, border, header and footer fit a terminal of
    /// `columns × lines`, clamped to the playable range.
    #[must_use]
    pub fn fit_terminal(columns: u16, lines: u16) -> Self {
        Self {
            width: (columns.saturating_sub(CHROME_WIDTH) / CELL_WIDTH)
                .clamp(MIN_GRID_WIDTH, MAX_GRID_WIDTH),
            height: lines
                .saturating_sub(CHROME_HEIGHT)
                .clamp(MIN_GRID_HEIGHT, MAX_GRID_HEIGHT),
        }
    }

    /// Returns the center cell, rounding down on both axes.
    #[must_use]
    pub fn center(self) -> (i32, i32) {
        (i32::from(self.width / 2), i32::from(self.height / 2))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_COLS,
            height: DEFAULT_ROWS,
        }
    }
}

/// Construction parameters for one engine instance.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EngineConfig {
    pub grid: GridSize,
    /// Initial tick interval in milliseconds.
    pub speed_ms: u64,
    /// Food placement seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Rejects grids outside the playable range and zero intervals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridSize { width, height } = self.grid;
        if width < MIN_GRID_WIDTH || height < MIN_GRID_HEIGHT {
            return Err(ConfigError::GridTooSmall { width, height });
        }

        if width > MAX_GRID_WIDTH || height > MAX_GRID_HEIGHT {
            return Err(ConfigError::GridTooLarge { width, height });
        }

        if self.speed_ms == 0 {
            return Err(ConfigError::ZeroSpeed);
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            speed_ms: DEFAULT_SPEED_MS,
            seed: None,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ConfigError {
    #[error(
        "grid {width}x{height} is too small (minimum {}x{})",
        MIN_GRID_WIDTH,
        MIN_GRID_HEIGHT
    )]
    GridTooSmall { width: u16, height: u16 },
    #[error(
        "grid {width}x{height} is too large (maximum {}x{})",
        MAX_GRID_WIDTH,
        MAX_GRID_HEIGHT
    )]
    GridTooLarge { width: u16, height: u16 },
    #[error("tick interval must be at least 1 ms")]
    ZeroSpeed,
    #[error("invalid snake: {0}")]
    Snake(#[from] SnakeError),
    #[error("segment {0:?} lies outside the grid")]
    SegmentOutOfBounds(Position),
    #[error("food {0:?} lies outside the grid")]
    FoodOutOfBounds(Position),
    #[error("food {0:?} overlaps the snake")]
    FoodOnSnake(Position),
}

/// Default grid width in cells.
pub const DEFAULT_COLS: u16 = 20;

/// Default grid height in cells.
pub const DEFAULT_ROWS: u16 = 20;

/// Smallest width that fits the starting snake plus one free cell.
pub const MIN_GRID_WIDTH: u16 = 4;

pub const MIN_GRID_HEIGHT: u16 = 1;

/// Upper bound on either grid side; food placement scans every cell.
pub const MAX_GRID_WIDTH: u16 = 1024;

pub const MAX_GRID_HEIGHT: u16 = 1024;

/// Length of a freshly reset snake.
pub const INITIAL_SNAKE_LEN: usize = 3;

/// Base tick interval in milliseconds.
pub const DEFAULT_SPEED_MS: u64 = 160;

/// Floor for the speed ramp in milliseconds.
pub const MIN_SPEED_MS: u64 = 80;

/// Interval reduction per speed step in milliseconds.
pub const SPEED_STEP_MS: u64 = 8;

/// Score needed per speed step.
pub const POINTS_PER_SPEED_STEP: u32 = 4;

/// Terminal columns used to draw one grid cell, keeping cells roughly square.
pub const CELL_WIDTH: u16 = 2;

/// Rows taken by the header and footer around the play field (border included).
pub const CHROME_HEIGHT: u16 = 4;

/// Columns taken by the play field border.
pub const CHROME_WIDTH: u16 = 2;

/// How long the game loop waits for input before redrawing.
pub const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(16);
