//! Tick-driven snake engine: owns one round's state, arms a [`Ticker`] while
//! running and reports every state change to a [`Listener`].

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Serializer};

use crate::config::{ConfigError, EngineConfig, GridSize};
use crate::game::{GameState, TickOutcome};
use crate::input::Direction;
use crate::listener::Listener;
use crate::snake::{Position, Snake};
use crate::ticker::{IntervalTicker, Ticker};

thread_local! {
    static IN_LISTENER: Cell<bool> = const { Cell::new(false) };
}

/// True while this thread is running a listener callback. A panic raised
/// there is caught and logged by the engine, so panic hooks can leave
/// process-wide state such as the terminal alone.
#[must_use]
pub fn listener_running() -> bool {
    IN_LISTENER.with(Cell::get)
}

/// Copied view of engine state handed to listeners.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub cols: u16,
    pub rows: u16,
    /// Body segments, tail first and head last.
    pub snake: Vec<Position>,
    #[serde(serialize_with = "serialize_food")]
    pub food: Option<Position>,
    pub score: u32,
    pub alive: bool,
    pub won: bool,
    pub running: bool,
    pub speed_ms: u64,
    pub heading: Direction,
    pub ticks: u64,
}

impl Snapshot {
    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize {
            width: self.cols,
            height: self.rows,
        }
    }

    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.snake.last().copied()
    }

    /// True once the round ended by collision or by filling the board.
    #[must_use]
    pub fn is_over(&self) -> bool {
        !self.alive || self.won
    }

    #[cfg(test)]
    pub(crate) fn placeholder() -> Self {
        Self {
            cols: 20,
            rows: 20,
            snake: vec![
                Position::new(8, 10),
                Position::new(9, 10),
                Position::new(10, 10),
            ],
            food: Some(Position::new(3, 4)),
            score: 0,
            alive: true,
            won: false,
            running: false,
            speed_ms: 160,
            heading: Direction::Right,
            ticks: 0,
        }
    }
}

fn serialize_food<S: Serializer>(food: &Option<Position>, serializer: S) -> Result<S::Ok, S::Error> {
    food.unwrap_or(Position::NONE).serialize(serializer)
}

/// Snake engine bound to a tick source `T`.
pub struct SnakeEngine<T: Ticker> {
    game: GameState,
    ticker: T,
    listener: Box<dyn Listener>,
}

impl<T: Ticker> SnakeEngine<T> {
    /// Validates `config`, resets to the starting position and emits the
    /// first snapshot.
    pub fn new(
        config: EngineConfig,
        ticker: T,
        listener: impl Listener + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let game = GameState::new(config.grid, config.speed_ms, seeded_rng(config.seed));
        Ok(Self::assemble(game, ticker, Box::new(listener)))
    }

    /// Like [`SnakeEngine::new`] but starts from an explicit body and food
    /// cell instead of the canonical layout. Used for scripted scenarios.
    ///
    /// Fails if any segment or the food lies off the grid, or if the food
    /// sits on the body. `reset()` returns to the canonical layout.
    pub fn with_state(
        config: EngineConfig,
        snake: Snake,
        food: Position,
        ticker: T,
        listener: impl Listener + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let game = GameState::with_layout(
            config.grid,
            config.speed_ms,
            seeded_rng(config.seed),
            snake,
            food,
        )?;
        Ok(Self::assemble(game, ticker, Box::new(listener)))
    }

    fn assemble(game: GameState, mut ticker: T, listener: Box<dyn Listener>) -> Self {
        ticker.disarm();
        let mut engine = Self {
            game,
            ticker,
            listener,
        };
        engine.emit();
        engine
    }

    /// Returns to the starting configuration and stops ticking.
    pub fn reset(&mut self) {
        self.ticker.disarm();
        self.game.reset();
        self.emit();
    }

    /// Begins ticking at the current interval. No-op while running or once
    /// the round is over.
    pub fn start(&mut self) {
        if self.ticker.is_armed() {
            return;
        }

        if !self.game.is_alive() || self.game.is_won() {
            debug!("start ignored: round is over, reset first");
            return;
        }

        self.ticker.arm(self.interval());
        self.emit();
    }

    /// Pauses ticking. No-op when not running.
    pub fn stop(&mut self) {
        if !self.ticker.is_armed() {
            return;
        }

        self.ticker.disarm();
        self.emit();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Returns an owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let bounds = self.game.bounds();
        Snapshot {
            cols: bounds.width,
            rows: bounds.height,
            snake: self.game.snake().to_vec(),
            food: self.game.food(),
            score: self.game.score(),
            alive: self.game.is_alive(),
            won: self.game.is_won(),
            running: self.is_running(),
            speed_ms: self.game.speed_ms(),
            heading: self.game.snake().direction(),
            ticks: self.game.tick_count(),
        }
    }

    /// Requests a heading for the next tick. Reversals and requests after the
    /// round ended are dropped.
    pub fn set_direction(&mut self, direction: Direction) {
        if !self.game.set_direction(direction) {
            debug!("direction {direction:?} discarded");
        }
    }

    /// Like [`Self::set_direction`] for `up|down|left|right` tokens; anything
    /// else is dropped.
    pub fn set_direction_token(&mut self, token: &str) {
        match token.parse::<Direction>() {
            Ok(direction) => self.set_direction(direction),
            Err(error) => debug!("{error}"),
        }
    }

    /// Runs one tick. Called by the environment when the armed ticker fires;
    /// fires that arrive after `stop()` are ignored.
    pub fn on_tick(&mut self) {
        if !self.ticker.is_armed() {
            return;
        }

        match self.game.step() {
            TickOutcome::Ignored => return,
            TickOutcome::Moved => {}
            TickOutcome::Ate { sped_up } => {
                if sped_up {
                    debug!("speed up to {} ms", self.game.speed_ms());
                    self.ticker.disarm();
                    self.ticker.arm(self.interval());
                }
            }
            TickOutcome::Died(reason) => {
                info!("game over ({reason:?}) with score {}", self.game.score());
                self.ticker.disarm();
            }
            TickOutcome::Won => {
                info!("board filled with score {}", self.game.score());
                self.ticker.disarm();
            }
        }

        self.emit();
    }

    /// Read access to the round, for renderers and tests.
    #[must_use]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, food: Position) {
        self.game.place_food(food);
    }

    #[must_use]
    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.game.speed_ms())
    }

    /// Hands a fresh snapshot to the listener.
    ///
    /// Listener errors and panics are logged and never reach the caller.
    /// Panic hooks still run for a listener panic; they can check
    /// [`listener_running`] to tell it apart from a fatal one.
    fn emit(&mut self) {
        let snapshot = self.snapshot();
        let listener = &mut self.listener;

        IN_LISTENER.with(|flag| flag.set(true));
        let result = panic::catch_unwind(AssertUnwindSafe(|| listener.on_change(&snapshot)));
        IN_LISTENER.with(|flag| flag.set(false));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(listener_error)) => warn!("listener failed: {listener_error}"),
            Err(payload) => error!(
                "listener panicked ({}); engine state unaffected",
                panic_message(payload.as_ref())
            ),
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload")
}

impl SnakeEngine<IntervalTicker> {
    /// Fires a tick if the wall-clock ticker is due at `now`. Returns whether
    /// a tick ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.ticker.poll_due(now) {
            return false;
        }

        self.on_tick();
        true
    }
}

impl<T: Ticker> Drop for SnakeEngine<T> {
    fn drop(&mut self) {
        self.ticker.disarm();
    }
}
