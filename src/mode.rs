use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One of the three fixed ways to play
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
pub enum Mode {
    Blitz,
    Standard,
    Unlimited,
}

/// Time and mistake limits for a mode. Exactly one of the two is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePolicy {
    pub time_budget_secs: Option<u32>,
    pub mistake_budget: Option<u32>,
}

impl ModePolicy {
    pub fn is_timed(&self) -> bool {
        self.time_budget_secs.is_some()
    }
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Blitz, Mode::Standard, Mode::Unlimited];

    pub fn policy(&self) -> ModePolicy {
        match self {
            Mode::Blitz => ModePolicy {
                time_budget_secs: Some(30),
                mistake_budget: None,
            },
            Mode::Standard => ModePolicy {
                time_budget_secs: Some(180),
                mistake_budget: None,
            },
            Mode::Unlimited => ModePolicy {
                time_budget_secs: None,
                mistake_budget: Some(3),
            },
        }
    }

    /// Look up a mode by its display name, ignoring case
    pub fn from_name(name: &str) -> Result<Self> {
        Mode::ALL
            .into_iter()
            .find(|m| m.to_string().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Error::InvalidMode(name.to_string()))
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            Mode::Blitz => "30 seconds, go fast",
            Mode::Standard => "3 minutes to show what you know",
            Mode::Unlimited => "no clock, 3 mistakes",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Mode::Blitz => Mode::Standard,
            Mode::Standard => Mode::Unlimited,
            Mode::Unlimited => Mode::Blitz,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Mode::Blitz => Mode::Unlimited,
            Mode::Standard => Mode::Blitz,
            Mode::Unlimited => Mode::Standard,
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Mode::from_name(s)
    }
}
