use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::ConfigError;

/// Which end of the memory range a node should be on to rank first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Prefer nodes with the least allocatable memory
    #[default]
    Least,
    /// Prefer nodes with the most allocatable memory
    Most,
}

impl Mode {
    /// Signed raw score for a node reporting `memory` allocatable bytes.
    pub fn raw_score(self, memory: i64) -> i64 {
        match self {
            Mode::Least => memory.saturating_neg(),
            Mode::Most => memory,
        }
    }

    /// Resolves the mode from the plugin args payload, `Least` when no
    /// payload is given. A payload must name a valid mode.
    pub fn from_args(args: Option<&[u8]>) -> Result<Self, ConfigError> {
        let Some(raw) = args else {
            return Ok(Mode::default());
        };
        let args: CustomSchedulerArgs = serde_json::from_slice(raw)?;
        args.mode.unwrap_or_default().parse()
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Least" => Ok(Mode::Least),
            "Most" => Ok(Mode::Most),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Least => write!(f, "Least"),
            Mode::Most => write!(f, "Most"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CustomSchedulerArgs {
    #[serde(default)]
    mode: Option<String>,
}
