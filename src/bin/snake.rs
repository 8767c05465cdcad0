//! Snake entry point

use std::process::ExitCode;

use arcade_duo::app::{self, Game, SnakeApp};
use arcade_duo::platform::TerminalSurface;
use arcade_duo::{Config, GameError};

fn play() -> Result<(), GameError> {
    let config = Config::load()?;
    let mut game = SnakeApp::new(&config.snake, app::resolve_seed(&config));
    let mut surface = TerminalSurface::open(game.title(), game.world_size())
        .map_err(|e| GameError::Init(format!("terminal unavailable: {e}")))?;
    app::run(&mut game, &mut surface)
}

fn main() -> ExitCode {
    if let Err(e) = app::init_logging() {
        eprintln!("snake: {e}");
        return ExitCode::FAILURE;
    }

    // The surface is dropped inside `play`, so the terminal is restored first
    match play() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal: {}", e);
            eprintln!("snake: {e}");
            ExitCode::FAILURE
        }
    }
}
