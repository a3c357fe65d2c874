//! Game state and core session types
//!
//! All state a frontend needs to render or resume a session lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::deck::{Card, Icon, deal};
use super::level::{CLASSIC, Level, LevelConfig};
use super::timer::GameTimer;
use crate::consts::*;

/// Which flavour of the game is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Fixed 4x4 board, no timer, alert on completion
    Classic,
    /// Difficulty levels, timer, level selection and success screens
    #[default]
    Leveled,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Leveled => "leveled",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "1" => Some(Variant::Classic),
            "leveled" | "levels" | "2" => Some(Variant::Leveled),
            _ => None,
        }
    }

    /// How long a mismatched pair stays visible
    pub fn mismatch_delay_ms(&self) -> u64 {
        match self {
            Variant::Classic => CLASSIC_MISMATCH_DELAY_MS,
            Variant::Leveled => LEVELED_MISMATCH_DELAY_MS,
        }
    }

    /// Delay between the final match and the completion notice
    pub fn victory_delay_ms(&self) -> u64 {
        match self {
            Variant::Classic => CLASSIC_VICTORY_DELAY_MS,
            Variant::Leveled => LEVELED_VICTORY_DELAY_MS,
        }
    }

    /// Levels, timer, wrong-pair marking and screen transitions
    pub fn is_leveled(&self) -> bool {
        *self == Variant::Leveled
    }
}

/// Visible screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Difficulty picker (leveled only)
    LevelSelect,
    /// Board is in play
    Game,
    /// Completion summary (leveled only)
    Success,
}

/// Turn controller state
///
/// Selections live inside the variants, so they are set in first/second
/// order and cleared together when the turn ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Nothing selected this turn
    #[default]
    Idle,
    /// First card of the turn is face up
    OneSelected { first: usize },
    /// Mismatched pair on display; input locked until `flip_back_at`
    Resolving {
        first: usize,
        second: usize,
        flip_back_at: u64,
    },
}

/// Result of a finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub variant: Variant,
    pub level: Option<Level>,
    pub moves: u32,
    pub pairs: usize,
    pub elapsed_ms: u64,
}

impl Summary {
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }
}

/// Things that happened during a tick, for frontends and logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A new deal is on the board
    GameStarted { variant: Variant, level: Option<Level> },
    /// Back on the level selection screen
    LevelSelectShown,
    CardFlipped { id: usize },
    TimerStarted,
    PairMatched { first: usize, second: usize, icon: Icon },
    PairMissed { first: usize, second: usize },
    /// A mismatched pair has been turned face down again
    TurnReleased,
    /// Completion notice is due (fires once per game)
    Victory(Summary),
}

/// RNG state wrapper for serialization
///
/// Each deal draws from its own stream so consecutive deals differ while a
/// seed stays reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// RNG for the next deal
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.stream += 1;
        rng
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub variant: Variant,
    /// Current difficulty (ignored in classic mode)
    pub level: Level,
    pub screen: Screen,
    /// Cards in board order
    pub cards: Vec<Card>,
    pub phase: TurnPhase,
    /// Completed turns this game
    pub moves: u32,
    pub pairs_matched: usize,
    /// Session clock in milliseconds
    pub clock_ms: u64,
    pub timer: GameTimer,
    /// Pending completion notice deadline
    pub victory_at: Option<u64>,
    pub victory_announced: bool,
    /// Set once the last pair is matched
    pub summary: Option<Summary>,
    /// Bumped on every visible change
    pub revision: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session. Classic deals immediately; leveled opens on the
    /// level selection screen.
    pub fn new(seed: u64, variant: Variant) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            variant,
            level: Level::default(),
            screen: Screen::LevelSelect,
            cards: Vec::new(),
            phase: TurnPhase::Idle,
            moves: 0,
            pairs_matched: 0,
            clock_ms: 0,
            timer: GameTimer::default(),
            victory_at: None,
            victory_announced: false,
            summary: None,
            revision: 0,
            events: Vec::new(),
        };

        if !variant.is_leveled() {
            state.new_deal();
        }

        state
    }

    /// Board shape for the current game
    pub fn config(&self) -> LevelConfig {
        match self.variant {
            Variant::Classic => CLASSIC,
            Variant::Leveled => self.level.config(),
        }
    }

    pub fn pair_count(&self) -> usize {
        self.config().pair_count
    }

    /// Level shown in summaries (leveled only)
    pub fn active_level(&self) -> Option<Level> {
        self.variant.is_leveled().then_some(self.level)
    }

    /// Every pair has been found
    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.pairs_matched == self.pair_count()
    }

    /// Input lock: a mismatched pair is on display
    pub fn is_locked(&self) -> bool {
        matches!(self.phase, TurnPhase::Resolving { .. })
    }

    /// A card click would be considered right now
    pub fn accepts_input(&self) -> bool {
        self.screen == Screen::Game && !self.is_locked() && !self.is_complete()
    }

    /// Currently selected cards in first/second order
    pub fn selection(&self) -> (Option<usize>, Option<usize>) {
        match self.phase {
            TurnPhase::Idle => (None, None),
            TurnPhase::OneSelected { first } => (Some(first), None),
            TurnPhase::Resolving { first, second, .. } => (Some(first), Some(second)),
        }
    }

    /// Elapsed play time (leveled), from the timer's start timestamp
    pub fn elapsed_ms(&self) -> u64 {
        self.timer.elapsed_ms(self.clock_ms)
    }

    /// Leveled: choose a level and begin a fresh game on it
    pub fn start_level(&mut self, level: Level) {
        if !self.variant.is_leveled() {
            log::warn!("Level selection ignored in classic mode");
            return;
        }
        self.level = level;
        self.new_deal();
    }

    /// Fresh deal on the current board shape (reset / play again)
    pub fn restart(&mut self) {
        if self.variant.is_leveled() && self.screen == Screen::LevelSelect {
            return;
        }
        self.new_deal();
    }

    /// Leveled: stop the game and go back to the level picker
    pub fn show_level_select(&mut self) {
        if !self.variant.is_leveled() || self.screen == Screen::LevelSelect {
            return;
        }
        self.timer.stop(self.clock_ms);
        self.cancel_pending();
        self.screen = Screen::LevelSelect;
        self.events.push(GameEvent::LevelSelectShown);
        self.touch();
        log::info!("Back to level selection");
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Mark the state as visibly changed
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    /// Drop the pending flip-back and victory notice
    fn cancel_pending(&mut self) {
        let (first, second) = self.selection();
        for id in first.into_iter().chain(second) {
            if let Some(card) = self.cards.get_mut(id) {
                card.flipped = false;
                card.wrong = false;
            }
        }
        self.phase = TurnPhase::Idle;
        self.victory_at = None;
    }

    fn new_deal(&mut self) {
        let config = self.config();
        let mut rng = self.rng_state.next_rng();
        self.cards = deal(config.pair_count, &mut rng);
        self.phase = TurnPhase::Idle;
        self.moves = 0;
        self.pairs_matched = 0;
        self.timer.reset();
        self.victory_at = None;
        self.victory_announced = false;
        self.summary = None;
        self.screen = Screen::Game;
        self.events.push(GameEvent::GameStarted {
            variant: self.variant,
            level: self.active_level(),
        });
        self.touch();
        log::info!(
            "New {} game: {} ({}x{}, {} pairs)",
            self.variant.as_str(),
            config.display_name,
            config.rows,
            config.cols,
            config.pair_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_deals_immediately() {
        let state = GameState::new(1, Variant::Classic);
        assert_eq!(state.screen, Screen::Game);
        assert_eq!(state.cards.len(), 16);
        assert_eq!(state.pair_count(), 8);
        assert!(state.accepts_input());
        assert_eq!(state.active_level(), None);
    }

    #[test]
    fn test_leveled_opens_on_selection() {
        let state = GameState::new(1, Variant::Leveled);
        assert_eq!(state.screen, Screen::LevelSelect);
        assert!(state.cards.is_empty());
        assert!(!state.accepts_input());
        assert!(!state.is_complete());
    }

    #[test]
    fn test_start_hard_level() {
        let mut state = GameState::new(7, Variant::Leveled);
        state.start_level(Level::Hard);
        assert_eq!(state.screen, Screen::Game);
        assert_eq!(state.cards.len(), 64);
        let mut icons: Vec<_> = state.cards.iter().map(|c| c.icon).collect();
        icons.sort();
        icons.dedup();
        assert_eq!(icons.len(), 32);
        assert!(!state.timer.has_started());
    }

    #[test]
    fn test_restart_deals_differently() {
        let mut state = GameState::new(3, Variant::Classic);
        let first = state.cards.clone();
        state.restart();
        assert_eq!(state.cards.len(), 16);
        assert_ne!(state.cards, first);
    }

    #[test]
    fn test_restart_ignored_on_selection_screen() {
        let mut state = GameState::new(3, Variant::Leveled);
        let revision = state.revision;
        state.restart();
        assert_eq!(state.screen, Screen::LevelSelect);
        assert_eq!(state.revision, revision);
    }

    #[test]
    fn test_classic_ignores_level_navigation() {
        let mut state = GameState::new(3, Variant::Classic);
        state.start_level(Level::Hard);
        state.show_level_select();
        assert_eq!(state.cards.len(), 16);
        assert_eq!(state.screen, Screen::Game);
    }

    #[test]
    fn test_rng_streams_are_reproducible() {
        let mut a = RngState::new(11);
        let mut b = RngState::new(11);
        let mut x = a.next_rng();
        let mut y = b.next_rng();
        assert_eq!(rand::Rng::random::<u32>(&mut x), rand::Rng::random::<u32>(&mut y));
        assert_eq!(a.stream, 1);
    }

    #[test]
    fn test_state_serializes() {
        let mut state = GameState::new(5, Variant::Leveled);
        state.start_level(Level::Medium);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.cards, state.cards);
        assert_eq!(back.level, Level::Medium);
        assert!(back.events.is_empty());
    }
}
