/*!
 * Driver Configuration
 *
 * Defaults reproduce the classic run: ten rounds, tables of 2 and 4,
 * dedicated threads, unbounded waits. Environment variables override:
 *
 * - `ALTERNATOR_ROUNDS`: actions per worker
 * - `ALTERNATOR_EXECUTOR`: `threads` or `pool`
 * - `ALTERNATOR_TURN_TIMEOUT_MS`: bound on each turn wait (0 disables)
 * - `ALTERNATOR_OUTPUT`: `text` or `json`
 */

use crate::core::errors::ConfigError;
use crate::core::limits::{
    DEFAULT_MULTIPLIER_A, DEFAULT_MULTIPLIER_B, DEFAULT_ROUNDS, MAX_ROUNDS,
};
use crate::core::sync::AlternatorConfig;
use crate::core::timeout::TimeoutPolicy;
use crate::worker::OutputFormat;
use serde::Serialize;
use std::time::Duration;

pub const ENV_ROUNDS: &str = "ALTERNATOR_ROUNDS";
pub const ENV_EXECUTOR: &str = "ALTERNATOR_EXECUTOR";
pub const ENV_TURN_TIMEOUT_MS: &str = "ALTERNATOR_TURN_TIMEOUT_MS";
pub const ENV_OUTPUT: &str = "ALTERNATOR_OUTPUT";

/// Where the two workers run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    /// One dedicated, named OS thread per worker
    #[default]
    Threads,
    /// Fixed pool of two blocking threads, awaited with a grace period
    Pool,
}

impl std::str::FromStr for ExecutorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threads" | "thread" => Ok(Self::Threads),
            "pool" | "executor" => Ok(Self::Pool),
            _ => Err("expected `threads` or `pool`".to_string()),
        }
    }
}

/// Driver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub rounds_a: u32,
    pub rounds_b: u32,
    pub multiplier_a: u64,
    pub multiplier_b: u64,
    pub executor: ExecutorKind,
    /// Bound on each turn wait
    pub turn_timeout: TimeoutPolicy,
    /// Pool executor only: how long to wait for both workers before cancelling
    pub shutdown_grace: TimeoutPolicy,
    pub output: OutputFormat,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            rounds_a: DEFAULT_ROUNDS,
            rounds_b: DEFAULT_ROUNDS,
            multiplier_a: DEFAULT_MULTIPLIER_A,
            multiplier_b: DEFAULT_MULTIPLIER_B,
            executor: ExecutorKind::Threads,
            turn_timeout: TimeoutPolicy::None,
            shutdown_grace: TimeoutPolicy::default_shutdown(),
            output: OutputFormat::Text,
        }
    }
}

impl DriverConfig {
    /// Defaults with bounded turn waits
    pub fn hardened() -> Self {
        Self {
            turn_timeout: TimeoutPolicy::default_turn(),
            ..Self::default()
        }
    }

    /// Same round count for both workers
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds_a = rounds;
        self.rounds_b = rounds;
        self
    }

    pub fn with_multipliers(mut self, a: u64, b: u64) -> Self {
        self.multiplier_a = a;
        self.multiplier_b = b;
        self
    }

    pub fn with_executor(mut self, executor: ExecutorKind) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = TimeoutPolicy::Turn(timeout);
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = TimeoutPolicy::Shutdown(grace);
        self
    }

    /// Alternator settings derived from this configuration; A always moves first
    pub fn alternator_config(&self) -> AlternatorConfig {
        AlternatorConfig {
            turn_timeout: self.turn_timeout,
            ..AlternatorConfig::baseline()
        }
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ROUNDS) {
            let rounds: u32 = parse(ENV_ROUNDS, &raw)?;
            if rounds == 0 || rounds > MAX_ROUNDS {
                return Err(invalid(
                    ENV_ROUNDS,
                    &raw,
                    format!("must be between 1 and {}", MAX_ROUNDS),
                ));
            }
            config = config.with_rounds(rounds);
        }

        if let Some(raw) = lookup(ENV_EXECUTOR) {
            config.executor = parse(ENV_EXECUTOR, &raw)?;
        }

        if let Some(raw) = lookup(ENV_TURN_TIMEOUT_MS) {
            let millis: u64 = parse(ENV_TURN_TIMEOUT_MS, &raw)?;
            config.turn_timeout = match millis {
                0 => TimeoutPolicy::None,
                ms => TimeoutPolicy::Turn(Duration::from_millis(ms)),
            };
        }

        if let Some(raw) = lookup(ENV_OUTPUT) {
            config.output = match raw.trim().to_ascii_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "json" => OutputFormat::Json,
                _ => return Err(invalid(ENV_OUTPUT, &raw, "expected `text` or `json`")),
            };
        }

        Ok(config)
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, raw, e.to_string()))
}

fn invalid(key: &str, raw: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: reason.into(),
    }
}
