//! File and environment configuration.

use crate::constants::DEFAULT_MAX_TICKS;
use crate::reward::RewardTable;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::Path;

impl RewardTable {
    /// Missing fields keep their default magnitudes.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read(path)
            .with_context(|| format!("failed reading reward table {}", path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("failed parsing reward table {}", path.display()))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunDefaults {
    pub max_ticks: u32,
    pub jobs: Option<usize>,
}

impl RunDefaults {
    /// `ARENA_MAX_TICKS` and `ARENA_BENCH_JOBS`.
    pub fn from_env() -> Self {
        let mut max_ticks = read_env_u32("ARENA_MAX_TICKS", DEFAULT_MAX_TICKS);
        if max_ticks == 0 {
            tracing::warn!(
                "ARENA_MAX_TICKS must be > 0. Falling back to {}.",
                DEFAULT_MAX_TICKS
            );
            max_ticks = DEFAULT_MAX_TICKS;
        }
        let jobs = read_env_u32("ARENA_BENCH_JOBS", 0);
        Self {
            max_ticks,
            jobs: (jobs > 0).then_some(jobs as usize),
        }
    }
}

pub fn read_env_u32(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<u32>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("{key}={raw:?} is not a u32. Using {default}.");
                default
            }
        },
        Err(_) => default,
    }
}
