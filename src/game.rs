use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{ConfigError, GridSize, MIN_SPEED_MS, POINTS_PER_SPEED_STEP, SPEED_STEP_MS};
use crate::food;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Why a round ended in death.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Current high-level simulation state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Alive,
    Dead(DeathReason),
    /// The snake covers every cell; no food can be placed.
    Won,
}

/// What a single [`GameState::step`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The round is over; nothing changed.
    Ignored,
    Moved,
    Ate { sped_up: bool },
    Died(DeathReason),
    Won,
}

/// Rules of one round, free of any timing concerns.
#[derive(Debug, Clone)]
pub struct GameState {
    snake: Snake,
    food: Option<Position>,
    score: u32,
    speed_ms: u64,
    tick_count: u64,
    status: GameStatus,
    bounds: GridSize,
    initial_speed_ms: u64,
    rng: StdRng,
}

impl GameState {
    /// Creates a freshly reset round drawing food positions from `rng`.
    #[must_use]
    pub fn new(bounds: GridSize, speed_ms: u64, rng: StdRng) -> Self {
        let snake = Snake::starting(bounds);
        let mut state = Self {
            snake,
            food: None,
            score: 0,
            speed_ms,
            tick_count: 0,
            status: GameStatus::Alive,
            bounds,
            initial_speed_ms: speed_ms,
            rng,
        };
        state.reset();
        state
    }

    /// Creates a running-ready round with an explicit body and food cell.
    ///
    /// Every segment and the food must lie on the grid, and the food must
    /// not sit on the body. [`GameState::reset`] still returns to the
    /// canonical start.
    pub fn with_layout(
        bounds: GridSize,
        speed_ms: u64,
        rng: StdRng,
        snake: Snake,
        food: Position,
    ) -> Result<Self, ConfigError> {
        if let Some(outside) = snake
            .to_vec()
            .into_iter()
            .find(|segment| !segment.is_within_bounds(bounds))
        {
            return Err(ConfigError::SegmentOutOfBounds(outside));
        }

        if !food.is_within_bounds(bounds) {
            return Err(ConfigError::FoodOutOfBounds(food));
        }

        if snake.occupies(food) {
            return Err(ConfigError::FoodOnSnake(food));
        }

        Ok(Self {
            snake,
            food: Some(food),
            score: 0,
            speed_ms,
            tick_count: 0,
            status: GameStatus::Alive,
            bounds,
            initial_speed_ms: speed_ms,
            rng,
        })
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(bounds: GridSize, speed_ms: u64, seed: u64) -> Self {
        Self::new(bounds, speed_ms, StdRng::seed_from_u64(seed))
    }

    /// Restores the canonical starting configuration.
    pub fn reset(&mut self) {
        self.snake = Snake::starting(self.bounds);
        self.score = 0;
        self.speed_ms = self.initial_speed_ms;
        self.tick_count = 0;
        self.status = GameStatus::Alive;
        self.food = food::spawn_position(&mut self.rng, self.bounds, &self.snake);
    }

    /// Buffers a heading change; returns whether it was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Alive {
            return false;
        }

        self.snake.buffer_direction(direction)
    }

    /// Advances the simulation by one move.
    pub fn step(&mut self) -> TickOutcome {
        if self.status != GameStatus::Alive {
            return TickOutcome::Ignored;
        }

        let next_head = self.snake.turn_and_aim();

        if !next_head.is_within_bounds(self.bounds) {
            return self.die(DeathReason::WallCollision);
        }

        // The tail cell still counts: the body grows before it shrinks.
        if self.snake.occupies(next_head) {
            return self.die(DeathReason::SelfCollision);
        }

        self.tick_count += 1;

        if self.food != Some(next_head) {
            self.snake.advance(next_head, false);
            return TickOutcome::Moved;
        }

        self.snake.advance(next_head, true);
        self.score += 1;
        let sped_up = self.ramp_speed();
        self.food = food::spawn_position(&mut self.rng, self.bounds, &self.snake);

        if self.food.is_none() {
            self.status = GameStatus::Won;
            return TickOutcome::Won;
        }

        TickOutcome::Ate { sped_up }
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current tick interval in milliseconds.
    #[must_use]
    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    /// Moves made this round.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        !matches!(self.status, GameStatus::Dead(_))
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        match self.status {
            GameStatus::Dead(reason) => Some(reason),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, food: Position) {
        self.food = Some(food);
    }

    fn die(&mut self, reason: DeathReason) -> TickOutcome {
        self.status = GameStatus::Dead(reason);
        TickOutcome::Died(reason)
    }

    fn ramp_speed(&mut self) -> bool {
        if self.score % POINTS_PER_SPEED_STEP != 0 || self.speed_ms <= MIN_SPEED_MS {
            return false;
        }

        self.speed_ms = self.speed_ms.saturating_sub(SPEED_STEP_MS).max(MIN_SPEED_MS);
        true
    }
}
