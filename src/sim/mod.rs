//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Session clock advanced only by `tick`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod deck;
pub mod level;
pub mod state;
pub mod tick;
pub mod timer;

pub use autoplay::{AUTOPLAY_THINK_MS, Autoplayer};
pub use deck::{Card, ICONS, Icon, deal, shuffle};
pub use level::{CLASSIC, Level, LevelConfig, LevelError};
pub use state::{GameEvent, GameState, RngState, Screen, Summary, TurnPhase, Variant};
pub use tick::{TickInput, tick};
pub use timer::GameTimer;
