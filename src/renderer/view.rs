//! Pure view model
//!
//! Everything a renderer needs, derived from `GameState` with no platform
//! dependencies. Renderers rebuild from scratch whenever `revision` changes.

use crate::format_clock;
use crate::sim::{GameState, Screen, Summary, Variant};

/// Text on the classic completion alert
pub const CLASSIC_VICTORY_MESSAGE: &str = "Congratulations! You matched all pairs!";

/// One board cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub id: usize,
    /// Space separated CSS classes (`card`, `flipped`, `matched`, `wrong`)
    pub class_name: String,
    /// Icon when face up, empty otherwise
    pub text: &'static str,
}

/// Status line texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub moves: String,
    pub pairs: String,
    /// Leveled only
    pub time: Option<String>,
}

/// Completion summary (leveled success screen)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub title: String,
    pub moves: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub screen: Screen,
    pub rows: u32,
    pub cols: u32,
    pub cells: Vec<CellView>,
    pub hud: HudView,
    pub summary: Option<SummaryView>,
}

impl BoardView {
    pub fn build(state: &GameState) -> Self {
        let config = state.config();
        Self {
            screen: state.screen,
            rows: config.rows,
            cols: config.cols,
            cells: cells(state),
            hud: hud(state),
            summary: match state.screen {
                Screen::Success => state.summary.as_ref().map(summary),
                _ => None,
            },
        }
    }
}

pub fn cells(state: &GameState) -> Vec<CellView> {
    state
        .cards
        .iter()
        .map(|card| {
            let mut class_name = String::from("card");
            if card.is_face_up() {
                class_name.push_str(" flipped");
            }
            if card.matched {
                class_name.push_str(" matched");
            }
            if card.wrong {
                class_name.push_str(" wrong");
            }
            CellView {
                id: card.id,
                class_name,
                text: if card.is_face_up() { card.icon.glyph() } else { "" },
            }
        })
        .collect()
}

pub fn hud(state: &GameState) -> HudView {
    HudView {
        moves: format!("Moves: {}", state.moves),
        pairs: format!("Pairs matched: {}/{}", state.pairs_matched, state.pair_count()),
        time: state
            .variant
            .is_leveled()
            .then(|| format!("Time: {}", format_clock(state.timer.displayed_secs))),
    }
}

pub fn summary(summary: &Summary) -> SummaryView {
    let title = match (summary.variant, summary.level) {
        (Variant::Leveled, Some(level)) => format!("{} level complete!", level),
        _ => CLASSIC_VICTORY_MESSAGE.to_string(),
    };
    SummaryView {
        title,
        moves: format!("Moves: {}", summary.moves),
        time: format!("Time: {}", format_clock(summary.elapsed_secs())),
    }
}
