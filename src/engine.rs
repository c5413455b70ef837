//! The betting state machine. Applies validated actions to a [`HandRecord`],
//! keeps pot and stack accounting in lockstep, and advances the hand through
//! `preflop -> flop -> turn -> river` until it is ready for settlement.

use crate::hand::{ActionKind, GameAction, HandRecord, Round};
use crate::validator;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("hand {id} is already completed")]
    HandCompleted { id: String },
    #[error("illegal action {kind:?} (amount {amount}) for seat {seat}")]
    InvalidAction { seat: usize, kind: ActionKind, amount: u64 },
}

/// What applying an action did to the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Outcome {
    /// The betting round continues; more action is expected.
    Continue,
    /// The round closed and play advanced to the given round.
    Advanced(Round),
    /// The hand is terminal: river betting closed, or at most one live
    /// player remains. The caller must settle it next.
    Settle,
}

/// Apply one action to the hand.
///
/// The action is validated first; a rejected action returns
/// [`ActionError::InvalidAction`] and leaves the record untouched. An
/// accepted action is appended to the log tagged with the active round,
/// its chips moved from stack to pot, and the round-completion check run:
/// a round closes when at most one live player remains or every live player
/// with chips behind has matched the table's highest bet (all-in players
/// are exempt). Closing any round resets all `current_bet`s; closing the
/// river, or losing all but one live player, makes the hand terminal
/// instead and returns [`Outcome::Settle`] without advancing.
pub fn apply_action(
    hand: &mut HandRecord,
    seat: usize,
    kind: ActionKind,
    amount: u64,
) -> Result<Outcome, ActionError> {
    if hand.is_completed {
        return Err(ActionError::HandCompleted { id: hand.id.clone() });
    }
    if !validator::action_is_legal(hand, seat, kind, amount) {
        return Err(ActionError::InvalidAction { seat, kind, amount });
    }

    let round = hand.current_round;
    let max_bet = hand.max_live_bet();
    let pot_delta = {
        let player = match hand.player_mut(seat) {
            Some(p) => p,
            None => return Err(ActionError::InvalidAction { seat, kind, amount }),
        };
        match kind {
            ActionKind::Fold => {
                player.is_folded = true;
                0
            }
            ActionKind::Check => 0,
            ActionKind::Call => {
                let owed = max_bet - player.current_bet;
                player.stack -= owed;
                player.current_bet = max_bet;
                player.total_invested += owed;
                owed
            }
            ActionKind::Bet => {
                player.stack -= amount;
                player.current_bet = amount;
                player.total_invested += amount;
                amount
            }
            ActionKind::Raise => {
                let added = amount - player.current_bet;
                player.stack -= added;
                player.current_bet = amount;
                player.total_invested += added;
                added
            }
            ActionKind::AllIn => {
                let added = player.stack;
                player.stack = 0;
                player.current_bet += added;
                player.total_invested += added;
                added
            }
        }
    };
    hand.pot_size += pot_delta;

    hand.actions.push(GameAction { seat, kind, amount, round });
    log::debug!(
        "hand {}: seat {seat} {kind:?} {amount} in {round:?}, pot {}",
        hand.id,
        hand.pot_size
    );

    if !betting_round_complete(hand) {
        return Ok(Outcome::Continue);
    }
    if hand.live_count() <= 1 {
        return Ok(Outcome::Settle);
    }
    match hand.current_round.next() {
        Some(next) => {
            for p in &mut hand.players {
                p.current_bet = 0;
            }
            hand.current_round = next;
            log::debug!("hand {}: betting advanced to {next:?}", hand.id);
            Ok(Outcome::Advanced(next))
        }
        None => Ok(Outcome::Settle),
    }
}

/// A round is done when at most one live player remains, or every live
/// player still holding chips has matched the highest live bet.
fn betting_round_complete(hand: &HandRecord) -> bool {
    if hand.live_count() <= 1 {
        return true;
    }
    let max_bet = hand.max_live_bet();
    hand.live_players().all(|p| p.current_bet == max_bet || p.stack == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::HandRecord;

    fn fresh_hand() -> HandRecord {
        HandRecord::open(&[1000; 6]).unwrap()
    }

    #[test]
    fn rejected_action_leaves_state_untouched() {
        let mut hand = fresh_hand();
        let before = hand.clone();
        let err = apply_action(&mut hand, 4, ActionKind::Bet, 39).unwrap_err();
        assert!(matches!(err, ActionError::InvalidAction { seat: 4, .. }));
        assert_eq!(hand, before);
    }

    #[test]
    fn call_pays_only_the_difference() {
        let mut hand = fresh_hand();
        // Small blind completes: 20 already in, owes 20 more.
        apply_action(&mut hand, 1, ActionKind::Call, 0).unwrap();
        assert_eq!(hand.players[1].stack, 960);
        assert_eq!(hand.players[1].current_bet, 40);
        assert_eq!(hand.players[1].total_invested, 40);
        assert_eq!(hand.pot_size, 80);
        assert!(hand.pot_matches_investment());
    }

    #[test]
    fn raise_charges_the_increment_over_current_bet() {
        let mut hand = fresh_hand();
        apply_action(&mut hand, 1, ActionKind::Raise, 120).unwrap();
        // Seat 1 had 20 in already.
        assert_eq!(hand.players[1].stack, 900);
        assert_eq!(hand.players[1].current_bet, 120);
        assert_eq!(hand.players[1].total_invested, 120);
        assert_eq!(hand.pot_size, 160);
    }

    #[test]
    fn allin_empties_the_stack_on_top_of_the_current_bet() {
        let mut hand = fresh_hand();
        apply_action(&mut hand, 2, ActionKind::AllIn, 0).unwrap();
        assert_eq!(hand.players[2].stack, 0);
        assert_eq!(hand.players[2].current_bet, 1000);
        assert_eq!(hand.players[2].total_invested, 1000);
        assert_eq!(hand.pot_size, 1020);
    }

    #[test]
    fn round_advances_when_all_live_bets_match() {
        let mut hand = fresh_hand();
        for seat in [3, 4, 5, 0] {
            assert_eq!(apply_action(&mut hand, seat, ActionKind::Call, 0).unwrap(), Outcome::Continue);
        }
        // The small blind's completion matches everyone, big blind included.
        let outcome = apply_action(&mut hand, 1, ActionKind::Call, 0).unwrap();
        assert_eq!(outcome, Outcome::Advanced(Round::Flop));
        assert_eq!(hand.current_round, Round::Flop);
        assert_eq!(hand.pot_size, 240);
        assert!(hand.players.iter().all(|p| p.current_bet == 0));
        assert!(hand.pot_matches_investment());
    }

    #[test]
    fn allin_players_are_exempt_from_matching() {
        let mut hand = fresh_hand();
        hand.players[3].stack = 30;
        apply_action(&mut hand, 3, ActionKind::AllIn, 0).unwrap();
        assert_eq!(hand.players[3].current_bet, 30);
        for seat in [4, 5, 0] {
            assert_eq!(apply_action(&mut hand, seat, ActionKind::Call, 0).unwrap(), Outcome::Continue);
        }
        // Seat 3 is short of the 40 but all-in, so the last call closes the round.
        let outcome = apply_action(&mut hand, 1, ActionKind::Call, 0).unwrap();
        assert_eq!(outcome, Outcome::Advanced(Round::Flop));
    }

    #[test]
    fn folding_down_to_one_makes_the_hand_terminal() {
        let mut hand = fresh_hand();
        for seat in [3, 4, 5, 0] {
            assert_eq!(apply_action(&mut hand, seat, ActionKind::Fold, 0).unwrap(), Outcome::Continue);
        }
        let outcome = apply_action(&mut hand, 1, ActionKind::Fold, 0).unwrap();
        assert_eq!(outcome, Outcome::Settle);
        assert_eq!(hand.current_round, Round::Preflop);
        assert_eq!(hand.live_count(), 1);
    }

    #[test]
    fn river_close_routes_to_settlement() {
        let mut hand = fresh_hand();
        for seat in [3, 4, 5, 0, 1] {
            apply_action(&mut hand, seat, ActionKind::Call, 0).unwrap();
        }
        assert_eq!(hand.current_round, Round::Flop);
        // With no open bet every live bet already matches, so a single
        // check closes each postflop round.
        assert_eq!(
            apply_action(&mut hand, 0, ActionKind::Check, 0).unwrap(),
            Outcome::Advanced(Round::Turn)
        );
        assert_eq!(
            apply_action(&mut hand, 0, ActionKind::Check, 0).unwrap(),
            Outcome::Advanced(Round::River)
        );
        let outcome = apply_action(&mut hand, 0, ActionKind::Check, 0).unwrap();
        assert_eq!(outcome, Outcome::Settle);
        // Terminal, but settlement owns the completion flag.
        assert!(!hand.is_completed);
        assert_eq!(hand.current_round, Round::River);
    }

    #[test]
    fn a_flop_bet_keeps_the_round_open_until_called() {
        let mut hand = fresh_hand();
        for seat in [3, 4, 5, 0, 1] {
            apply_action(&mut hand, seat, ActionKind::Call, 0).unwrap();
        }
        assert_eq!(hand.current_round, Round::Flop);
        assert_eq!(apply_action(&mut hand, 0, ActionKind::Bet, 100).unwrap(), Outcome::Continue);
        for seat in [1, 2, 3, 4] {
            assert_eq!(apply_action(&mut hand, seat, ActionKind::Call, 0).unwrap(), Outcome::Continue);
        }
        assert_eq!(
            apply_action(&mut hand, 5, ActionKind::Call, 0).unwrap(),
            Outcome::Advanced(Round::Turn)
        );
        assert_eq!(hand.pot_size, 240 + 600);
    }

    #[test]
    fn actions_are_logged_with_their_round() {
        let mut hand = fresh_hand();
        for seat in [3, 4, 5, 0, 1] {
            apply_action(&mut hand, seat, ActionKind::Call, 0).unwrap();
        }
        apply_action(&mut hand, 0, ActionKind::Bet, 100).unwrap();

        assert_eq!(hand.actions.len(), 6);
        assert!(hand.actions[..5].iter().all(|a| a.round == Round::Preflop));
        let last = hand.actions.last().unwrap();
        assert_eq!(last.round, Round::Flop);
        assert_eq!(last.kind, ActionKind::Bet);
        assert_eq!(last.amount, 100);
    }

    #[test]
    fn completed_hand_rejects_further_actions() {
        let mut hand = fresh_hand();
        hand.is_completed = true;
        let err = apply_action(&mut hand, 3, ActionKind::Fold, 0).unwrap_err();
        assert!(matches!(err, ActionError::HandCompleted { .. }));
    }
}
