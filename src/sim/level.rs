//! Difficulty levels and board shapes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{CLASSIC_COLS, CLASSIC_PAIRS, CLASSIC_ROWS};

/// Difficulty tier (leveled mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Board shape and pair count for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelConfig {
    pub rows: u32,
    pub cols: u32,
    pub pair_count: usize,
    pub display_name: &'static str,
}

impl LevelConfig {
    /// Number of cells on the board
    pub fn cells(&self) -> usize {
        (self.rows * self.cols) as usize
    }
}

const EASY: LevelConfig = LevelConfig {
    rows: 4,
    cols: 4,
    pair_count: 8,
    display_name: "Easy",
};

const MEDIUM: LevelConfig = LevelConfig {
    rows: 6,
    cols: 6,
    pair_count: 18,
    display_name: "Medium",
};

const HARD: LevelConfig = LevelConfig {
    rows: 8,
    cols: 8,
    pair_count: 32,
    display_name: "Hard",
};

/// Fixed classic-mode board
pub const CLASSIC: LevelConfig = LevelConfig {
    rows: CLASSIC_ROWS,
    cols: CLASSIC_COLS,
    pair_count: CLASSIC_PAIRS,
    display_name: "Classic",
};

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub fn config(self) -> LevelConfig {
        match self {
            Level::Easy => EASY,
            Level::Medium => MEDIUM,
            Level::Hard => HARD,
        }
    }

    /// Identifier used in markup (`data-level`) and settings
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().display_name)
    }
}

/// Level identifier could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    Unknown(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Unknown(s) => write!(f, "unknown level '{}' (expected easy, medium or hard)", s),
        }
    }
}

impl std::error::Error for LevelError {}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "medium" | "med" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            _ => Err(LevelError::Unknown(s.to_string())),
        }
    }
}
