//! Error taxonomy for both games
//!
//! - `Init`: config, display or input unavailable at start. Fatal.
//! - `Step`: a pipeline sub-step failed. Whether the loop continues is decided
//!   by the game's policy table (see `sim::pipeline`).
//! - `Loop`: something escaped the loop itself. Fatal after teardown.

use crate::sim::pipeline::Step;

/// Failure inside a single update or draw sub-step
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("entity {id} has non-finite state (pos={pos}, vel={vel})")]
    NonFinite { id: u32, pos: glam::Vec2, vel: glam::Vec2 },

    #[error("render failed: {0}")]
    Render(#[from] std::io::Error),
}

/// Top-level game errors
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("initialization failed: {0}")]
    Init(String),

    #[error("step `{step}` failed: {source}")]
    Step {
        step: Step,
        #[source]
        source: StepError,
    },

    #[error("game loop failed: {0}")]
    Loop(#[source] std::io::Error),
}
