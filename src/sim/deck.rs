//! Card set generation
//!
//! A deal doubles a prefix of the icon alphabet and shuffles it in place.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Icon alphabet. The first 8 entries are the classic set.
pub const ICONS: [&str; 32] = [
    "🐶", "🐱", "🦄", "🐙", "🦖", "🐝", "🌱", "👷", //
    "🦊", "🐼", "🐸", "🐵", "🦁", "🐯", "🐨", "🐷", //
    "🐧", "🦉", "🐢", "🦋", "🍎", "🍉", "🍒", "🍕", //
    "⚽", "🎲", "🎸", "🚀", "⭐", "🌈", "🔥", "🎈",
];

/// An icon token (index into [`ICONS`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Icon(pub u8);

impl Icon {
    /// Emoji shown on the face of the card
    pub fn glyph(self) -> &'static str {
        ICONS[self.0 as usize % ICONS.len()]
    }
}

/// A single card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Ordinal position on the board
    pub id: usize,
    pub icon: Icon,
    /// Permanently revealed; never cleared except by a new deal
    pub matched: bool,
    /// Revealed during the current turn
    pub flipped: bool,
    /// Transient mismatch mark (leveled mode only)
    #[serde(default)]
    pub wrong: bool,
}

impl Card {
    pub fn new(id: usize, icon: Icon) -> Self {
        Self {
            id,
            icon,
            matched: false,
            flipped: false,
            wrong: false,
        }
    }

    /// Face is visible (flipped this turn or already matched)
    pub fn is_face_up(&self) -> bool {
        self.flipped || self.matched
    }

    /// Card may be picked by the player
    pub fn is_selectable(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// In-place Fisher–Yates shuffle
///
/// Walks from the last index down, swapping each slot with a uniformly
/// chosen index at or below it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Deal a fresh shuffled set of `pair_count` pairs
///
/// Uses the first `pair_count` icons of the alphabet; each appears exactly twice.
pub fn deal<R: Rng + ?Sized>(pair_count: usize, rng: &mut R) -> Vec<Card> {
    let pair_count = pair_count.min(ICONS.len());
    let mut icons: Vec<Icon> = (0..pair_count as u8)
        .chain(0..pair_count as u8)
        .map(Icon)
        .collect();
    shuffle(&mut icons, rng);

    icons
        .into_iter()
        .enumerate()
        .map(|(id, icon)| Card::new(id, icon))
        .collect()
}
