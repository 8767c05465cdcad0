//! Per-tick pipeline runner
//!
//! Each sub-step returns a `Result`. What happens on failure is decided by an
//! explicit policy table per game instead of a catch-all around the tick.

use std::fmt;

use crate::error::{GameError, StepError};

/// Named sub-steps of a tick, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Input,
    Steer,
    Spawn,
    Integrate,
    Collide,
    Prune,
    Render,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Input => "input",
            Step::Steer => "steer",
            Step::Spawn => "spawn",
            Step::Integrate => "integrate",
            Step::Collide => "collide",
            Step::Prune => "prune",
            Step::Render => "render",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when a sub-step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and carry on with the rest of the tick
    LogAndContinue,
    /// Propagate the failure out of the loop
    Abort,
}

/// Failure policy for every step of one game
#[derive(Debug, Clone, Copy)]
pub struct PolicyTable {
    pub update: FailurePolicy,
    pub render: FailurePolicy,
}

impl PolicyTable {
    /// Shooter: cosmetic or isolated faults never stop the demo
    pub const SHOOTER: PolicyTable = PolicyTable {
        update: FailurePolicy::LogAndContinue,
        render: FailurePolicy::LogAndContinue,
    };

    /// Snake: any fault is fatal
    pub const SNAKE: PolicyTable = PolicyTable {
        update: FailurePolicy::Abort,
        render: FailurePolicy::Abort,
    };

    pub fn policy(&self, step: Step) -> FailurePolicy {
        match step {
            Step::Render => self.render,
            _ => self.update,
        }
    }

    /// Run one sub-step under this table's policy
    pub fn run<F>(&self, step: Step, f: F) -> Result<(), GameError>
    where
        F: FnOnce() -> Result<(), StepError>,
    {
        match f() {
            Ok(()) => Ok(()),
            Err(source) => match self.policy(step) {
                FailurePolicy::LogAndContinue => {
                    log::warn!("Step `{}` failed, skipping: {}", step, source);
                    Ok(())
                }
                FailurePolicy::Abort => {
                    log::error!("Step `{}` failed: {}", step, source);
                    Err(GameError::Step { step, source })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing() -> Result<(), StepError> {
        Err(StepError::Render(std::io::Error::other("boom")))
    }

    #[test]
    fn test_shooter_policy_continues() {
        assert!(PolicyTable::SHOOTER.run(Step::Integrate, failing).is_ok());
        assert!(PolicyTable::SHOOTER.run(Step::Render, failing).is_ok());
    }

    #[test]
    fn test_snake_policy_aborts() {
        let err = PolicyTable::SNAKE.run(Step::Collide, failing).unwrap_err();
        assert!(matches!(err, GameError::Step { step: Step::Collide, .. }));
    }

    #[test]
    fn test_success_passes_through() {
        assert!(PolicyTable::SNAKE.run(Step::Spawn, || Ok(())).is_ok());
    }
}
