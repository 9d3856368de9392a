use std::collections::{HashSet, VecDeque};

use serde::Serialize;
use thiserror::Error;

use crate::config::{GridSize, INITIAL_SNAKE_LEN};
use crate::input::{direction_change_is_valid, Direction};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Wire form of "no food could be placed".
    pub const NONE: Self = Self { x: -1, y: -1 };

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step in `direction`, unclamped.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Why a list of segments cannot form a snake.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum SnakeError {
    #[error("a snake needs at least one segment")]
    Empty,
    #[error("segment {0:?} appears more than once")]
    DuplicateSegment(Position),
    #[error("segments {from:?} and {to:?} are not adjacent")]
    Disjoint { from: Position, to: Position },
}

/// Snake body plus its heading and the heading buffered for the next tick.
///
/// Segments are stored tail-first, head-last.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    buffered_direction: Direction,
}

impl Snake {
    /// Creates the canonical starting snake: three cells ending at the grid
    /// center, heading right.
    #[must_use]
    pub fn starting(bounds: GridSize) -> Self {
        let (center_x, center_y) = bounds.center();
        let body = (0..INITIAL_SNAKE_LEN as i32)
            .rev()
            .map(|offset| Position::new(center_x - offset, center_y))
            .collect();

        Self {
            body,
            direction: Direction::Right,
            buffered_direction: Direction::Right,
        }
    }

    /// Creates a snake from explicit body segments (tail first, head last).
    ///
    /// Segments must be distinct and each one must touch the next.
    pub fn from_segments(
        segments: Vec<Position>,
        direction: Direction,
    ) -> Result<Self, SnakeError> {
        if segments.is_empty() {
            return Err(SnakeError::Empty);
        }

        let mut seen = HashSet::with_capacity(segments.len());
        for &segment in &segments {
            if !seen.insert(segment) {
                return Err(SnakeError::DuplicateSegment(segment));
            }
        }

        for pair in segments.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if (from.x - to.x).abs() + (from.y - to.y).abs() != 1 {
                return Err(SnakeError::Disjoint { from, to });
            }
        }

        Ok(Self {
            body: VecDeque::from(segments),
            direction,
            buffered_direction: direction,
        })
    }

    /// Buffers a heading for the next tick.
    ///
    /// Reversals are judged against the current heading, not the buffered
    /// one; the last accepted request before a tick wins. Returns whether the
    /// request was accepted.
    pub fn buffer_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.buffered_direction = direction;
        true
    }

    /// Makes the buffered heading current and returns the cell the head moves to.
    pub fn turn_and_aim(&mut self) -> Position {
        self.direction = self.buffered_direction;
        self.head().step(self.direction)
    }

    /// Pushes `head` onto the body, dropping the tail unless `grow` is set.
    pub fn advance(&mut self, head: Position, grow: bool) {
        self.body.push_back(head);
        if !grow {
            self.body.pop_front();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body.back().copied().unwrap_or(Position::NONE)
    }

    #[must_use]
    pub fn tail(&self) -> Position {
        self.body.front().copied().unwrap_or(Position::NONE)
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the heading that the next tick will apply.
    #[must_use]
    pub fn buffered_direction(&self) -> Direction {
        self.buffered_direction
    }

    /// Copies the body into a fresh vector, tail first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Position> {
        self.body.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GridSize;
    use crate::input::Direction;

    use super::{Position, Snake, SnakeError};

    const GRID: GridSize = GridSize {
        width: 20,
        height: 20,
    };

    #[test]
    fn starting_snake_is_centered_and_heads_right() {
        let snake = Snake::starting(GRID);

        assert_eq!(
            snake.to_vec(),
            vec![
                Position::new(8, 10),
                Position::new(9, 10),
                Position::new(10, 10)
            ]
        );
        assert_eq!(snake.head(), Position::new(10, 10));
        assert_eq!(snake.tail(), Position::new(8, 10));
        assert_eq!(snake.direction(), Direction::Right);
    }

    #[test]
    fn odd_grid_center_rounds_down() {
        let snake = Snake::starting(GridSize {
            width: 7,
            height: 9,
        });

        assert_eq!(snake.head(), Position::new(3, 4));
        assert_eq!(snake.tail(), Position::new(1, 4));
    }

    #[test]
    fn advance_without_growth_keeps_length() {
        let mut snake = Snake::starting(GRID);

        let next = snake.turn_and_aim();
        snake.advance(next, false);

        assert_eq!(snake.head(), Position::new(11, 10));
        assert_eq!(snake.tail(), Position::new(9, 10));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn advance_with_growth_keeps_previous_tail() {
        let mut snake = Snake::starting(GRID);

        let next = snake.turn_and_aim();
        snake.advance(next, true);

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Position::new(8, 10));
    }

    #[test]
    fn direction_buffer_rejects_reverse() {
        let mut snake = Snake::starting(GRID);

        assert!(!snake.buffer_direction(Direction::Left));
        assert_eq!(snake.buffered_direction(), Direction::Right);
    }

    #[test]
    fn reversal_is_judged_against_current_heading() {
        let mut snake = Snake::starting(GRID);

        assert!(snake.buffer_direction(Direction::Up));
        // Down reverses the buffered Up but not the current Right.
        assert!(snake.buffer_direction(Direction::Down));
        assert_eq!(snake.buffered_direction(), Direction::Down);

        let next = snake.turn_and_aim();
        assert_eq!(next, Position::new(10, 11));
        assert_eq!(snake.direction(), Direction::Down);
    }

    #[test]
    fn step_follows_direction_vectors() {
        let origin = Position::new(5, 5);

        assert_eq!(origin.step(Direction::Up), Position::new(5, 4));
        assert_eq!(origin.step(Direction::Down), Position::new(5, 6));
        assert_eq!(origin.step(Direction::Left), Position::new(4, 5));
        assert_eq!(origin.step(Direction::Right), Position::new(6, 5));
    }

    #[test]
    fn bounds_check_is_half_open() {
        let grid = GridSize {
            width: 4,
            height: 3,
        };

        assert!(Position::new(3, 2).is_within_bounds(grid));
        assert!(!Position::new(4, 2).is_within_bounds(grid));
        assert!(!Position::new(0, -1).is_within_bounds(grid));
    }

    #[test]
    fn explicit_segments_must_be_distinct_and_touching() {
        assert_eq!(
            Snake::from_segments(Vec::new(), Direction::Right).err(),
            Some(SnakeError::Empty)
        );
        assert_eq!(
            Snake::from_segments(
                vec![Position::new(4, 5), Position::new(4, 5)],
                Direction::Right
            )
            .err(),
            Some(SnakeError::DuplicateSegment(Position::new(4, 5)))
        );
        assert_eq!(
            Snake::from_segments(
                vec![Position::new(1, 1), Position::new(3, 1)],
                Direction::Right
            )
            .err(),
            Some(SnakeError::Disjoint {
                from: Position::new(1, 1),
                to: Position::new(3, 1),
            })
        );

        let snake = Snake::from_segments(
            vec![Position::new(1, 1), Position::new(1, 2), Position::new(2, 2)],
            Direction::Right,
        )
        .expect("segments form a path");
        assert_eq!(snake.head(), Position::new(2, 2));
        assert_eq!(snake.tail(), Position::new(1, 1));
    }
}
