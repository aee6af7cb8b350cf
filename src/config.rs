//! Run configuration: API key, pacing speed, and the optional step bound.

use std::str::FromStr;
use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pacing between propagation steps, chosen by the user to make execution
/// watchable. Purely cosmetic: `Realtime` must produce identical outcomes to
/// any other speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionSpeed {
    Realtime,
    Fast,
    #[default]
    Medium,
    Slow,
}

impl ExecutionSpeed {
    #[must_use]
    pub fn delay_ms(&self) -> u64 {
        match self {
            Self::Realtime => 0,
            Self::Fast => 500,
            Self::Medium => 1000,
            Self::Slow => 2000,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms())
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
        }
    }
}

impl std::fmt::Display for ExecutionSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("unknown execution speed: {0}")]
#[diagnostic(
    code(wireloom::config::speed),
    help("Expected one of: realtime, fast, medium, slow.")
)]
pub struct SpeedParseError(String);

impl FromStr for ExecutionSpeed {
    type Err = SpeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "realtime" => Ok(Self::Realtime),
            "fast" => Ok(Self::Fast),
            "medium" => Ok(Self::Medium),
            "slow" => Ok(Self::Slow),
            other => Err(SpeedParseError(other.to_string())),
        }
    }
}

/// Configuration injected into [`crate::engine::Engine`].
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    /// Provider API key, forwarded verbatim to the adapters.
    pub api_key: String,
    pub speed: ExecutionSpeed,
    /// Upper bound on steps per run. `None` leaves cyclic wirings free to
    /// run until aborted externally.
    pub max_steps: Option<u64>,
}

impl EngineConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Read `OPENAI_API_KEY` and `EXECUTION_SPEED` from the environment,
    /// loading a `.env` file first when present. Missing or unparsable
    /// values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let speed = std::env::var("EXECUTION_SPEED")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Self {
            api_key,
            speed,
            max_steps: None,
        }
    }

    #[must_use]
    pub fn with_speed(mut self, speed: ExecutionSpeed) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, limit: u64) -> Self {
        self.max_steps = Some(limit);
        self
    }
}
