//! Session configuration.
//!
//! Defaults can be overridden from the environment:
//! `LIMBER_REPETITIONS`, `LIMBER_COUNTDOWN_SECS`, `LIMBER_FPS` and
//! `LIMBER_LOG`. Counting thresholds are fixed and not configurable.

use log::debug;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{LimberError, Result};
use crate::exercise::{DEFAULT_REPETITIONS, ExerciseKind, STANDARD_SEQUENCE};
use crate::logging;

pub const REPETITIONS_VAR: &str = "LIMBER_REPETITIONS";
pub const COUNTDOWN_VAR: &str = "LIMBER_COUNTDOWN_SECS";
pub const FPS_VAR: &str = "LIMBER_FPS";
pub const LOG_VAR: &str = "LIMBER_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub repetitions_per_exercise: u32,
    /// Pause between exercises, in seconds.
    pub countdown_secs: u64,
    /// Rate at which frames are fed in interactive mode.
    pub frames_per_second: u32,
    pub log_level: String,
    pub exercises: Vec<ExerciseKind>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            repetitions_per_exercise: DEFAULT_REPETITIONS,
            countdown_secs: 3,
            frames_per_second: 30,
            log_level: "info".to_string(),
            exercises: STANDARD_SEQUENCE.to_vec(),
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from defaults plus whatever `lookup` returns for the
    /// `LIMBER_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(REPETITIONS_VAR) {
            config.repetitions_per_exercise = parse_var(REPETITIONS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(COUNTDOWN_VAR) {
            config.countdown_secs = parse_var(COUNTDOWN_VAR, &raw)?;
        }
        if let Some(raw) = lookup(FPS_VAR) {
            config.frames_per_second = parse_var(FPS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(LOG_VAR) {
            config.log_level = raw.trim().to_lowercase();
        }

        config.validate()?;
        debug!("SessionConfig::from_lookup resolved {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.repetitions_per_exercise == 0 {
            return Err(LimberError::invalid_config(
                "repetitions per exercise must be at least 1",
            ));
        }
        if self.frames_per_second == 0 {
            return Err(LimberError::invalid_config("frames per second must be at least 1"));
        }
        if self.exercises.is_empty() {
            return Err(LimberError::invalid_config("exercise list is empty"));
        }
        if logging::parse_level(&self.log_level).is_none() {
            return Err(LimberError::invalid_config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.frames_per_second.max(1) as u64)
    }

    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| LimberError::invalid_config(format!("{}='{}': {}", key, raw, e)))
}
