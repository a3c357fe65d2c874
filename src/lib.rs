//! Pair Match - A match-the-pairs memory card game
//!
//! Core modules:
//! - `sim`: Deterministic game simulation (deck, levels, turn controller, timer)
//! - `renderer`: View model plus DOM and text renderers
//! - `settings`: Startup configuration (URL query, JSON, CLI arguments)

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{GameState, Variant};

/// Game configuration constants
pub mod consts {
    /// Classic mode: delay before a mismatched pair flips back
    pub const CLASSIC_MISMATCH_DELAY_MS: u64 = 900;
    /// Classic mode: delay between the final match and the victory alert
    pub const CLASSIC_VICTORY_DELAY_MS: u64 = 400;

    /// Leveled mode: delay before a mismatched pair flips back
    pub const LEVELED_MISMATCH_DELAY_MS: u64 = 1000;
    /// Leveled mode: delay between the final match and the success modal
    pub const LEVELED_VICTORY_DELAY_MS: u64 = 500;

    /// Elapsed-time display refresh interval
    pub const TIMER_INTERVAL_MS: u64 = 1000;

    /// Classic board shape (4x4, 8 pairs)
    pub const CLASSIC_ROWS: u32 = 4;
    pub const CLASSIC_COLS: u32 = 4;
    pub const CLASSIC_PAIRS: usize = 8;
}

/// Format whole seconds as `MM:SS`
///
/// Minutes are not wrapped at an hour; `3725` renders as `62:05`.
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
