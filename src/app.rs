use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use log::{info, warn};
use thiserror::Error;

use crate::config::{ConfigError, EngineConfig, GridSize};
use crate::engine::{SnakeEngine, Snapshot};
use crate::game::DeathReason;
use crate::input::GameInput;
use crate::listener::ListenerError;
use crate::recorder::SnapshotRecorder;
use crate::session::SessionScore;
use crate::theme::{Theme, ThemeCatalog};
use crate::ticker::IntervalTicker;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot open snapshot log: {0}")]
    Record(#[from] ListenerError),
}

/// Startup options resolved from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub engine: EngineConfig,
    /// Size the grid to the terminal and rebuild the engine on resize.
    pub fit_terminal: bool,
    pub theme_id: Option<String>,
    pub record: Option<PathBuf>,
}

/// What the front end should show for the current round.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PlayState {
    /// Fresh round waiting for the first start.
    Ready,
    Running,
    Paused,
    GameOver(Option<DeathReason>),
    Won,
}

type SharedRecorder = Rc<RefCell<SnapshotRecorder>>;

/// Owns the engine and routes every control to it.
pub struct App {
    engine: SnakeEngine<IntervalTicker>,
    updates: Receiver<Snapshot>,
    latest: Snapshot,
    session: SessionScore,
    themes: ThemeCatalog,
    config: EngineConfig,
    fit_terminal: bool,
    recorder: Option<SharedRecorder>,
    /// Set once the current round has been started; cleared on reset.
    round_started: bool,
}

impl App {
    pub fn new(options: AppOptions, mut themes: ThemeCatalog) -> Result<Self, AppError> {
        if let Some(id) = options.theme_id.as_deref() {
            if !themes.select_by_id(id) {
                warn!("unknown theme {id:?}; keeping {}", themes.current_id());
            }
        }

        let recorder = match options.record.as_deref() {
            Some(path) => Some(Rc::new(RefCell::new(SnapshotRecorder::create(path)?))),
            None => None,
        };

        let (engine, updates) = build_engine(options.engine, recorder.clone())?;
        let latest = engine.snapshot();

        let mut app = Self {
            engine,
            updates,
            latest,
            session: SessionScore::new(),
            themes,
            config: options.engine,
            fit_terminal: options.fit_terminal,
            recorder,
            round_started: false,
        };
        app.drain();
        Ok(app)
    }

    /// Applies one input. Returns `false` when the player asked to quit.
    pub fn handle_input(&mut self, input: GameInput) -> bool {
        match input {
            GameInput::Quit => return false,
            GameInput::Direction(direction) => self.engine.set_direction(direction),
            GameInput::StartPause => {
                if self.engine.is_running() {
                    self.engine.stop();
                } else {
                    self.start_round();
                }
            }
            GameInput::Confirm => {
                if self.latest.is_over() {
                    self.reset_round();
                }
                self.start_round();
            }
            GameInput::Reset => {
                self.drain();
                self.session.reset();
                self.reset_round();
                self.start_round();
            }
            GameInput::ToggleTheme => self.themes.select_next(),
            GameInput::Resize { width, height } => {
                if self.fit_terminal {
                    self.resize(GridSize::fit_terminal(width, height));
                }
            }
        }

        self.drain();
        true
    }

    /// Runs a tick if one is due.
    pub fn update(&mut self, now: Instant) {
        if self.engine.poll(now) {
            self.drain();
        }
    }

    /// Replaces the engine with a fresh one for `grid`. The old engine is
    /// dropped, which disarms its ticker.
    pub fn resize(&mut self, grid: GridSize) {
        if grid == self.config.grid {
            return;
        }

        let config = EngineConfig { grid, ..self.config };
        match build_engine(config, self.recorder.clone()) {
            Ok((engine, updates)) => {
                info!("grid resized to {}x{}", grid.width, grid.height);
                self.drain();
                self.engine = engine;
                self.updates = updates;
                self.config = config;
                self.round_started = false;
                self.drain();
            }
            Err(error) => warn!("resize to {}x{} rejected: {error}", grid.width, grid.height),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.latest
    }

    #[must_use]
    pub fn session(&self) -> &SessionScore {
        &self.session
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        self.themes.current_theme()
    }

    #[must_use]
    pub fn themes(&self) -> &ThemeCatalog {
        &self.themes
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.config.grid
    }

    #[must_use]
    pub fn play_state(&self) -> PlayState {
        let snapshot = &self.latest;
        if snapshot.won {
            PlayState::Won
        } else if !snapshot.alive {
            PlayState::GameOver(self.engine.game().death_reason())
        } else if snapshot.running {
            PlayState::Running
        } else if !self.round_started {
            PlayState::Ready
        } else {
            PlayState::Paused
        }
    }

    fn start_round(&mut self) {
        self.engine.start();
        if self.engine.is_running() {
            self.round_started = true;
        }
    }

    fn reset_round(&mut self) {
        self.engine.reset();
        self.round_started = false;
    }

    fn drain(&mut self) {
        while let Ok(snapshot) = self.updates.try_recv() {
            self.session.observe(&snapshot);
            self.latest = snapshot;
        }
    }
}

fn build_engine(
    config: EngineConfig,
    recorder: Option<SharedRecorder>,
) -> Result<(SnakeEngine<IntervalTicker>, Receiver<Snapshot>), ConfigError> {
    let (sender, updates) = mpsc::channel();
    let engine = SnakeEngine::new(config, IntervalTicker::new(), (sender, recorder))?;
    Ok((engine, updates))
}
