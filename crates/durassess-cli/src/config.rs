use std::time::Duration;

use clap::{Parser, ValueEnum};

const MAX_DELAY_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Interactive, animated terminal session.
    Console,
    /// JSON commands on stdin, JSON replies on stdout.
    Stdio,
}

#[derive(Debug, Parser)]
#[command(
    name = "durassess",
    version,
    about = "Score bottle durability from shell thickness and weight"
)]
pub struct Cli {
    #[arg(long, value_enum, env = "DURASSESS_MODE", default_value_t = Mode::Console)]
    pub mode: Mode,

    /// Delay between progress-bar steps, in milliseconds.
    #[arg(long, env = "DURASSESS_STEP_DELAY_MS", default_value_t = 50)]
    pub step_delay_ms: u64,

    /// Delay between startup-bar steps, in milliseconds.
    #[arg(long, env = "DURASSESS_STARTUP_DELAY_MS", default_value_t = 80)]
    pub startup_delay_ms: u64,

    /// Skip progress bars and delays entirely.
    #[arg(long, env = "DURASSESS_NO_ANIMATION")]
    pub no_animation: bool,
}

impl Cli {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            step_delay: Duration::from_millis(self.step_delay_ms.min(MAX_DELAY_MS)),
            startup_delay: Duration::from_millis(self.startup_delay_ms.min(MAX_DELAY_MS)),
            animate: !self.no_animation,
        }
    }
}

/// Presentation timing. Never affects scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub step_delay: Duration,
    pub startup_delay: Duration,
    pub animate: bool,
}

impl Pacing {
    pub fn instant() -> Self {
        Self {
            step_delay: Duration::ZERO,
            startup_delay: Duration::ZERO,
            animate: false,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(50),
            startup_delay: Duration::from_millis(80),
            animate: true,
        }
    }
}
