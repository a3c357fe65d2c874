//! Computer player for idle/demo mode
//!
//! Remembers every face it has seen and plays a perfect-memory strategy:
//! finish a known pair first, otherwise explore an unseen card.

use std::collections::HashMap;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::deck::Icon;
use super::state::GameState;

/// Default pause between autoplay clicks
pub const AUTOPLAY_THINK_MS: u64 = 350;

#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
    think_ms: u64,
    next_move_at: u64,
    /// Deal the memory belongs to (RNG stream of the state)
    deal: Option<u64>,
    memory: HashMap<usize, Icon>,
}

impl Autoplayer {
    pub fn new(seed: u64, think_ms: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            think_ms,
            next_move_at: 0,
            deal: None,
            memory: HashMap::new(),
        }
    }

    /// Record every face currently visible; forget everything on a new deal
    pub fn observe(&mut self, state: &GameState) {
        if self.deal != Some(state.rng_state.stream) {
            self.deal = Some(state.rng_state.stream);
            self.memory.clear();
            self.next_move_at = state.clock_ms + self.think_ms;
        }
        for card in state.cards.iter().filter(|c| c.is_face_up()) {
            self.memory.insert(card.id, card.icon);
        }
    }

    /// Next card to click, if the board is ready and the think time elapsed
    pub fn next_click(&mut self, state: &GameState) -> Option<usize> {
        self.observe(state);
        if !state.accepts_input() || state.clock_ms < self.next_move_at {
            return None;
        }
        let choice = self.choose(state)?;
        self.next_move_at = state.clock_ms + self.think_ms;
        Some(choice)
    }

    fn choose(&mut self, state: &GameState) -> Option<usize> {
        let selectable: Vec<usize> = state
            .cards
            .iter()
            .filter(|c| c.is_selectable())
            .map(|c| c.id)
            .collect();

        let (first, _) = state.selection();
        if let Some(first) = first {
            let icon = state.cards.get(first)?.icon;
            if let Some(&partner) = selectable
                .iter()
                .find(|&&id| self.memory.get(&id) == Some(&icon))
            {
                return Some(partner);
            }
        } else if let Some(id) = self.known_pair(&selectable) {
            return Some(id);
        }

        let unseen: Vec<usize> = selectable
            .iter()
            .copied()
            .filter(|id| !self.memory.contains_key(id))
            .collect();
        let pool = if unseen.is_empty() { &selectable } else { &unseen };
        if pool.is_empty() {
            return None;
        }
        Some(pool[self.rng.random_range(0..pool.len())])
    }

    /// One card of a pair whose both faces are remembered
    fn known_pair(&self, selectable: &[usize]) -> Option<usize> {
        let mut seen: HashMap<Icon, usize> = HashMap::new();
        for &id in selectable {
            if let Some(&icon) = self.memory.get(&id) {
                if let Some(&other) = seen.get(&icon) {
                    return Some(other.min(id));
                }
                seen.insert(icon, id);
            }
        }
        None
    }
}
