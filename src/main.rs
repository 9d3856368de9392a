use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{error, info};
use ocean_snake::app::{App, AppError, AppOptions};
use ocean_snake::config::{
    EngineConfig, GridSize, DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SPEED_MS, FRAME_POLL_INTERVAL,
};
use ocean_snake::input::InputHandler;
use ocean_snake::logging;
use ocean_snake::renderer;
use ocean_snake::terminal_runtime::{install_panic_hook, TerminalSession};
use ocean_snake::theme::{ThemeCatalog, DEFAULT_THEME_ID};

#[derive(Debug, Parser)]
#[command(version, about = "Ocean Snake in your terminal")]
struct Cli {
    /// Grid width in cells.
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: u16,

    /// Grid height in cells.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: u16,

    /// Size the grid to the terminal (overrides --cols/--rows).
    #[arg(long)]
    fit: bool,

    /// Initial tick interval in milliseconds.
    #[arg(long = "speed-ms", default_value_t = DEFAULT_SPEED_MS)]
    speed_ms: u64,

    /// Seed for food placement, for reproducible rounds.
    #[arg(long)]
    seed: Option<u64>,

    /// Theme id (built-in: ocean-light, ocean-dark).
    #[arg(long, default_value = DEFAULT_THEME_ID)]
    theme: String,

    /// Append every engine snapshot to this JSON-lines file.
    #[arg(long, value_name = "PATH")]
    record: Option<PathBuf>,

    /// Write logs to this file (RUST_LOG sets the filter).
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;
    install_panic_hook();

    let result = run(cli);
    if let Err(error) = &result {
        error!("exiting: {error}");
    }
    result
}

fn run(cli: Cli) -> Result<(), AppError> {
    let themes = ThemeCatalog::load();
    let mut session = TerminalSession::enter()?;

    let grid = if cli.fit {
        session.fitted_grid()?
    } else {
        GridSize {
            width: cli.cols,
            height: cli.rows,
        }
    };

    let mut app = App::new(
        AppOptions {
            engine: EngineConfig {
                grid,
                speed_ms: cli.speed_ms,
                seed: cli.seed,
            },
            fit_terminal: cli.fit,
            theme_id: Some(cli.theme),
            record: cli.record,
        },
        themes,
    )?;
    info!("starting on a {}x{} grid", grid.width, grid.height);

    let mut input = InputHandler::new();
    loop {
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &app))?;

        if let Some(game_input) = input.poll_input(FRAME_POLL_INTERVAL)? {
            if !app.handle_input(game_input) {
                break;
            }
        }

        app.update(Instant::now());
    }

    info!(
        "session over: {} points across {} rounds",
        app.session().total(),
        app.session().rounds()
    );
    Ok(())
}
