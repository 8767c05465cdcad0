//! Skirmish (AI vs AI shooter) entry point

use std::process::ExitCode;

use arcade_duo::app::{self, Game, ShooterApp};
use arcade_duo::platform::TerminalSurface;
use arcade_duo::{Config, GameError};

fn play() -> Result<(), GameError> {
    let config = Config::load()?;
    let mut game = ShooterApp::new(&config.shooter, app::resolve_seed(&config));
    let mut surface = TerminalSurface::open(game.title(), game.world_size())
        .map_err(|e| GameError::Init(format!("terminal unavailable: {e}")))?;
    app::run(&mut game, &mut surface)
}

fn main() -> ExitCode {
    if let Err(e) = app::init_logging() {
        eprintln!("skirmish: {e}");
        return ExitCode::FAILURE;
    }

    // The surface is dropped inside `play`, so the terminal is restored first
    match play() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal: {}", e);
            eprintln!("skirmish: {e}");
            ExitCode::FAILURE
        }
    }
}
