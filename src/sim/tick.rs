//! Turn controller
//!
//! Advances the session clock, fires due timed transitions, then applies
//! player input. Timed transitions (mismatch flip-back, completion notice,
//! timer display) are deadlines stored in the state, so a reset or level
//! change simply drops them.

use super::level::Level;
use super::state::{GameEvent, GameState, Screen, Summary, TurnPhase};

/// Input commands for a single tick (one-shot)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Card clicked (by id)
    pub click: Option<usize>,
    /// Reset / play again
    pub reset: bool,
    /// Level chosen on the selection screen
    pub select_level: Option<Level>,
    /// Back / change level
    pub back_to_levels: bool,
}

impl TickInput {
    pub fn click(id: usize) -> Self {
        Self {
            click: Some(id),
            ..Default::default()
        }
    }
}

/// Advance the session by `dt_ms` milliseconds and apply `input`
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    // Navigation replaces the board, dropping anything pending on the old one
    if input.back_to_levels {
        state.show_level_select();
    }
    if let Some(level) = input.select_level {
        state.start_level(level);
    }
    if input.reset {
        state.restart();
    }

    state.clock_ms += dt_ms;
    fire_due(state);

    if let Some(id) = input.click {
        click_card(state, id);
    }
}

/// Run every timed transition whose deadline has passed
fn fire_due(state: &mut GameState) {
    let now = state.clock_ms;

    if state.timer.advance(now) {
        state.touch();
    }

    if let TurnPhase::Resolving {
        first,
        second,
        flip_back_at,
    } = state.phase
    {
        if now >= flip_back_at {
            for id in [first, second] {
                let card = &mut state.cards[id];
                card.flipped = false;
                card.wrong = false;
            }
            state.phase = TurnPhase::Idle;
            state.events.push(GameEvent::TurnReleased);
            state.touch();
        }
    }

    if let Some(at) = state.victory_at {
        if now >= at && !state.victory_announced {
            state.victory_at = None;
            state.victory_announced = true;
            if state.variant.is_leveled() {
                state.screen = Screen::Success;
            }
            if let Some(summary) = state.summary.clone() {
                log::info!(
                    "Victory in {} moves ({} ms)",
                    summary.moves,
                    summary.elapsed_ms
                );
                state.events.push(GameEvent::Victory(summary));
            }
            state.touch();
        }
    }
}

/// Handle a click on card `id`. Ignored while locked, off the game screen,
/// or when the card is already face up.
fn click_card(state: &mut GameState, id: usize) {
    if !state.accepts_input() {
        return;
    }
    let first = match state.phase {
        TurnPhase::Idle => None,
        TurnPhase::OneSelected { first } => Some(first),
        TurnPhase::Resolving { .. } => return,
    };
    let Some(card) = state.cards.get_mut(id) else {
        log::debug!("Click on unknown card {}", id);
        return;
    };
    if !card.is_selectable() {
        return;
    }

    card.flipped = true;
    state.events.push(GameEvent::CardFlipped { id });
    state.touch();

    if state.variant.is_leveled() && !state.timer.has_started() {
        state.timer.start(state.clock_ms);
        state.events.push(GameEvent::TimerStarted);
    }

    match first {
        None => state.phase = TurnPhase::OneSelected { first: id },
        Some(first) => {
            state.moves += 1;
            resolve_turn(state, first, id);
        }
    }
}

/// Compare the two selected cards and apply the outcome
fn resolve_turn(state: &mut GameState, first: usize, second: usize) {
    let now = state.clock_ms;
    let icon = state.cards[first].icon;

    if icon == state.cards[second].icon {
        for id in [first, second] {
            let card = &mut state.cards[id];
            card.flipped = false;
            card.matched = true;
        }
        state.pairs_matched += 1;
        state.phase = TurnPhase::Idle;
        state.events.push(GameEvent::PairMatched {
            first,
            second,
            icon,
        });
        log::debug!(
            "Matched {} ({}/{})",
            icon.glyph(),
            state.pairs_matched,
            state.pair_count()
        );

        if state.is_complete() {
            state.timer.stop(now);
            state.summary = Some(Summary {
                variant: state.variant,
                level: state.active_level(),
                moves: state.moves,
                pairs: state.pairs_matched,
                elapsed_ms: state.elapsed_ms(),
            });
            state.victory_at = Some(now + state.variant.victory_delay_ms());
        }
    } else {
        if state.variant.is_leveled() {
            state.cards[first].wrong = true;
            state.cards[second].wrong = true;
        }
        state.phase = TurnPhase::Resolving {
            first,
            second,
            flip_back_at: now + state.variant.mismatch_delay_ms(),
        };
        state.events.push(GameEvent::PairMissed { first, second });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Variant;
    use proptest::prelude::*;

    /// Ids of two cards sharing an icon, and of two that differ
    fn pair_and_miss(state: &GameState) -> ((usize, usize), (usize, usize)) {
        let a = &state.cards[0];
        let partner = state.cards.iter().find(|c| c.id != a.id && c.icon == a.icon).unwrap();
        let other = state.cards.iter().find(|c| c.icon != a.icon).unwrap();
        ((a.id, partner.id), (a.id, other.id))
    }

    /// Click every pair in order, tick by tick
    fn solve(state: &mut GameState) {
        let mut ids: Vec<usize> = (0..state.cards.len()).collect();
        ids.sort_by_key(|&i| state.cards[i].icon);
        for chunk in ids.chunks(2) {
            tick(state, &TickInput::click(chunk[0]), 100);
            tick(state, &TickInput::click(chunk[1]), 100);
        }
    }

    fn leveled(level: Level) -> GameState {
        let mut state = GameState::new(2024, Variant::Leveled);
        state.start_level(level);
        state
    }

    #[test]
    fn test_single_selection_does_not_count_move() {
        let mut state = GameState::new(1, Variant::Classic);
        tick(&mut state, &TickInput::click(0), 0);
        assert_eq!(state.moves, 0);
        assert!(state.cards[0].flipped);
        assert_eq!(state.phase, TurnPhase::OneSelected { first: 0 });
        assert_eq!(state.selection(), (Some(0), None));
    }

    #[test]
    fn test_mismatch_flips_back_after_delay() {
        let mut state = GameState::new(1, Variant::Classic);
        let (_, (a, b)) = pair_and_miss(&state);

        tick(&mut state, &TickInput::click(a), 0);
        tick(&mut state, &TickInput::click(b), 0);
        assert_eq!(state.moves, 1);
        assert!(state.is_locked());
        assert_eq!(state.selection(), (Some(a), Some(b)));
        assert!(state.cards[a].flipped && state.cards[b].flipped);
        assert!(!state.cards[a].wrong, "classic mode never marks wrong pairs");

        tick(&mut state, &TickInput::default(), CLASSIC_MISMATCH_DELAY_MS - 1);
        assert!(state.cards[a].flipped);

        tick(&mut state, &TickInput::default(), 1);
        assert!(!state.cards[a].is_face_up() && !state.cards[b].is_face_up());
        assert_eq!(state.moves, 1);
        assert_eq!(state.pairs_matched, 0);
        assert_eq!(state.phase, TurnPhase::Idle);
        assert_eq!(state.selection(), (None, None));
    }

    #[test]
    fn test_match_is_immediate() {
        let mut state = GameState::new(1, Variant::Classic);
        let ((a, b), _) = pair_and_miss(&state);

        tick(&mut state, &TickInput::click(a), 0);
        tick(&mut state, &TickInput::click(b), 0);
        assert!(state.cards[a].matched && state.cards[b].matched);
        assert_eq!(state.pairs_matched, 1);
        assert_eq!(state.moves, 1);
        assert_eq!(state.phase, TurnPhase::Idle);
        assert!(!state.is_locked());
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::PairMatched { .. })));
    }

    #[test]
    fn test_input_locked_during_mismatch_window() {
        let mut state = GameState::new(9, Variant::Leveled);
        state.start_level(Level::Easy);
        let (_, (a, b)) = pair_and_miss(&state);
        let free = (0..state.cards.len()).find(|&i| i != a && i != b).unwrap();

        tick(&mut state, &TickInput::click(a), 0);
        tick(&mut state, &TickInput::click(b), 0);
        assert!(state.cards[a].wrong && state.cards[b].wrong);

        let revision = state.revision;
        for _ in 0..9 {
            tick(&mut state, &TickInput::click(free), 100);
            assert!(!state.cards[free].flipped);
        }
        assert_eq!(state.moves, 1);
        assert_eq!(state.selection(), (Some(a), Some(b)));
        // Only timer ticks may have bumped the revision
        assert!(state.revision <= revision + 1);

        // Window elapses at 1000 ms; the click in the same tick lands after it
        tick(&mut state, &TickInput::click(free), 100);
        assert!(!state.cards[a].wrong && !state.cards[a].flipped);
        assert!(state.cards[free].flipped);
        assert_eq!(state.phase, TurnPhase::OneSelected { first: free });
    }

    #[test]
    fn test_same_card_twice_rejected() {
        let mut state = GameState::new(4, Variant::Classic);
        tick(&mut state, &TickInput::click(3), 0);
        let revision = state.revision;
        tick(&mut state, &TickInput::click(3), 0);
        assert_eq!(state.moves, 0);
        assert_eq!(state.revision, revision);
        assert_eq!(state.phase, TurnPhase::OneSelected { first: 3 });
    }

    #[test]
    fn test_unknown_card_ignored() {
        let mut state = GameState::new(4, Variant::Classic);
        tick(&mut state, &TickInput::click(99), 0);
        assert_eq!(state.phase, TurnPhase::Idle);
    }

    #[test]
    fn test_clicks_off_game_screen_ignored() {
        let mut state = GameState::new(4, Variant::Leveled);
        tick(&mut state, &TickInput::click(0), 0);
        assert_eq!(state.screen, Screen::LevelSelect);
        assert!(state.cards.is_empty());
    }

    #[test]
    fn test_classic_completion_alert_once() {
        let mut state = GameState::new(77, Variant::Classic);
        solve(&mut state);
        assert!(state.is_complete());
        assert!(state.cards.iter().all(|c| c.matched));
        assert_eq!(state.pairs_matched, 8);
        assert_eq!(state.moves, 8);
        state.drain_events();

        tick(&mut state, &TickInput::default(), CLASSIC_VICTORY_DELAY_MS - 1);
        assert!(!state.victory_announced);
        tick(&mut state, &TickInput::default(), 1);
        let events = state.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::Victory(s)] if s.moves == 8 && s.level.is_none()));

        let mut victories = 0;
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 500);
            victories += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Victory(_)))
                .count();
        }
        assert_eq!(victories, 0, "already drained after the first notice");
        assert!(state.victory_announced);
        assert_eq!(state.screen, Screen::Game);
    }

    #[test]
    fn test_victory_event_fires_exactly_once() {
        let mut state = GameState::new(77, Variant::Classic);
        solve(&mut state);
        let mut victories = 0;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 200);
            victories += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Victory(_)))
                .count();
        }
        assert_eq!(victories, 1);
    }

    #[test]
    fn test_leveled_success_screen_and_summary() {
        let mut state = leveled(Level::Easy);
        tick(&mut state, &TickInput::default(), 5000);
        assert!(!state.timer.has_started(), "timer waits for the first flip");

        solve(&mut state);
        let summary = state.summary.clone().expect("summary recorded");
        assert_eq!(summary.moves, 8);
        assert_eq!(summary.level, Some(Level::Easy));
        // 16 clicks, 100 ms apart; the timer starts on the first
        assert_eq!(summary.elapsed_ms, 1500);
        assert!(!state.timer.is_running());

        tick(&mut state, &TickInput::default(), LEVELED_VICTORY_DELAY_MS);
        assert_eq!(state.screen, Screen::Success);
        assert!(!state.accepts_input());
        assert_eq!(state.elapsed_ms(), 1500);
    }

    #[test]
    fn test_reset_cancels_pending_flip_back() {
        let mut state = leveled(Level::Medium);
        let (_, (a, b)) = pair_and_miss(&state);
        tick(&mut state, &TickInput::click(a), 0);
        tick(&mut state, &TickInput::click(b), 0);
        assert!(state.is_locked());

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, 300);
        assert!(!state.is_locked());
        assert_eq!(state.moves, 0);
        assert!(!state.timer.has_started());

        tick(&mut state, &TickInput::click(5), 0);
        tick(&mut state, &TickInput::default(), 2000);
        assert!(state.cards[5].flipped, "stale flip-back must not touch the new deal");
    }

    #[test]
    fn test_back_cancels_pending_victory() {
        let mut state = leveled(Level::Easy);
        solve(&mut state);
        let back = TickInput {
            back_to_levels: true,
            ..Default::default()
        };
        tick(&mut state, &back, 0);
        assert_eq!(state.screen, Screen::LevelSelect);
        tick(&mut state, &TickInput::default(), 5000);
        assert_eq!(state.screen, Screen::LevelSelect);
        assert!(!state.drain_events().iter().any(|e| matches!(e, GameEvent::Victory(_))));
    }

    #[test]
    fn test_back_stops_timer() {
        let mut state = leveled(Level::Hard);
        tick(&mut state, &TickInput::click(0), 0);
        tick(&mut state, &TickInput::default(), 2500);
        assert_eq!(state.timer.displayed_secs, 2);
        let back = TickInput {
            back_to_levels: true,
            ..Default::default()
        };
        tick(&mut state, &back, 0);
        assert!(!state.timer.is_running());
        assert_eq!(state.phase, TurnPhase::Idle);
        assert!(!state.cards[0].flipped);
    }

    #[test]
    fn test_select_level_from_success_screen() {
        let mut state = leveled(Level::Easy);
        solve(&mut state);
        tick(&mut state, &TickInput::default(), 1000);
        assert_eq!(state.screen, Screen::Success);

        let pick = TickInput {
            select_level: Some(Level::Hard),
            ..Default::default()
        };
        tick(&mut state, &pick, 0);
        assert_eq!(state.screen, Screen::Game);
        assert_eq!(state.cards.len(), 64);
        assert_eq!(state.pairs_matched, 0);
        assert!(state.summary.is_none());
    }

    #[test]
    fn test_determinism() {
        let mut s1 = GameState::new(99999, Variant::Leveled);
        let mut s2 = GameState::new(99999, Variant::Leveled);
        let pick = TickInput {
            select_level: Some(Level::Medium),
            ..Default::default()
        };
        let inputs = [pick, TickInput::click(3), TickInput::click(17), TickInput::default(), TickInput::click(8)];
        for input in &inputs {
            tick(&mut s1, input, 400);
            tick(&mut s2, input, 400);
        }
        assert_eq!(s1.cards, s2.cards);
        assert_eq!(s1.phase, s2.phase);
        assert_eq!(s1.moves, s2.moves);
        assert_eq!(s1.revision, s2.revision);
    }

    proptest! {
        #[test]
        fn prop_face_up_clicks_are_noops(seed in any::<u64>(), clicks in prop::collection::vec(0usize..16, 1..40)) {
            let mut state = GameState::new(seed, Variant::Classic);
            for id in clicks {
                // Let any mismatch resolve so the board accepts input
                tick(&mut state, &TickInput::default(), CLASSIC_MISMATCH_DELAY_MS);
                if state.cards[id].is_face_up() {
                    let cards = state.cards.clone();
                    let (moves, phase, revision) = (state.moves, state.phase, state.revision);
                    tick(&mut state, &TickInput::click(id), 0);
                    prop_assert_eq!(&state.cards, &cards);
                    prop_assert_eq!(state.moves, moves);
                    prop_assert_eq!(state.phase, phase);
                    prop_assert_eq!(state.revision, revision);
                } else {
                    tick(&mut state, &TickInput::click(id), 0);
                }
                prop_assert!(state.pairs_matched <= state.pair_count());
            }
        }

        #[test]
        fn prop_moves_count_completed_turns(seed in any::<u64>(), clicks in prop::collection::vec(0usize..16, 1..60)) {
            let mut state = GameState::new(seed, Variant::Classic);
            let mut accepted = 0u32;
            for id in clicks {
                let selectable = state.accepts_input() && state.cards[id].is_selectable();
                tick(&mut state, &TickInput::click(id), 0);
                if selectable {
                    accepted += 1;
                }
                prop_assert_eq!(state.moves, accepted / 2);
                tick(&mut state, &TickInput::default(), CLASSIC_MISMATCH_DELAY_MS);
            }
        }
    }
}
