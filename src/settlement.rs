//! Settlement: turning a terminal hand into final per-seat winnings.
//!
//! Card ranking lives behind the [`HandEvaluator`] capability. The primary
//! path hands the evaluator the starting stacks, revealed cards, and the
//! chronological action log, and interprets the final stacks it returns.
//! When the evaluator is unavailable or errors, the pot is split evenly
//! among the live players instead; the hand still completes, but the
//! degradation is logged because it can mask a scoring inaccuracy.

use crate::hand::{GameAction, HandRecord, SEATS};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvaluatorError {
    #[error("evaluator unavailable: {0}")]
    Unavailable(String),
    #[error("hand evaluation failed: {0}")]
    Failed(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettleError {
    #[error("hand {0} is already settled")]
    AlreadySettled(String),
}

/// Everything an external evaluator needs to replay the hand, indexed by
/// seat position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    /// Per-seat stack at the moment the hand opened (`stack + total_invested`).
    pub starting_stacks: Vec<u64>,
    /// Per-seat hole cards where revealed.
    pub hole_cards: Vec<Option<String>>,
    /// Board string, two characters per card, flop/turn/river by position.
    pub board_cards: String,
    /// Chronological action log, each entry tagged with its round.
    pub actions: Vec<GameAction>,
}

impl EvaluationRequest {
    pub fn from_hand(hand: &HandRecord) -> Self {
        Self {
            starting_stacks: hand.players.iter().map(|p| p.starting_stack()).collect(),
            hole_cards: hand.players.iter().map(|p| p.hole_cards.clone()).collect(),
            board_cards: hand.board_cards.clone(),
            actions: hand.actions.clone(),
        }
    }
}

/// External showdown oracle. Replays the action log against the revealed
/// cards and reports each seat's final stack.
pub trait HandEvaluator {
    fn evaluate(&self, request: &EvaluationRequest) -> Result<Vec<u64>, EvaluatorError>;
}

/// How the hand was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The evaluator replay produced the final stacks.
    Evaluated,
    /// The evaluator failed; the pot was split evenly among live players.
    Degraded,
}

/// Settle a terminal hand: flip `is_completed`, fill `winnings` for every
/// seat, and record the winner set (seats with positive net).
///
/// Settling twice is a caller bug and is rejected without touching state.
/// Evaluator failure is not an error here: the fallback split always leaves
/// the hand fully settled, with any integer-division remainder routed to
/// the earliest live seat so the winnings still sum to zero.
pub fn settle(
    hand: &mut HandRecord,
    evaluator: &dyn HandEvaluator,
) -> Result<Settlement, SettleError> {
    if hand.is_completed {
        return Err(SettleError::AlreadySettled(hand.id.clone()));
    }
    hand.is_completed = true;

    let request = EvaluationRequest::from_hand(hand);
    let settlement = match evaluator.evaluate(&request) {
        Ok(final_stacks) if final_stacks.len() == SEATS => {
            for (player, &final_stack) in hand.players.iter().zip(&final_stacks) {
                let net = final_stack as i64 - player.starting_stack() as i64;
                hand.winnings.insert(player.position, net);
            }
            Settlement::Evaluated
        }
        Ok(final_stacks) => {
            log::warn!(
                "hand {}: evaluator returned {} stacks for {SEATS} seats, splitting pot evenly",
                hand.id,
                final_stacks.len()
            );
            split_pot_evenly(hand);
            Settlement::Degraded
        }
        Err(e) => {
            log::warn!("hand {}: {e}, splitting pot evenly", hand.id);
            split_pot_evenly(hand);
            Settlement::Degraded
        }
    };

    hand.winner_positions =
        hand.winnings.iter().filter(|&(_, &net)| net > 0).map(|(&pos, _)| pos).collect();
    log::info!(
        "hand {} settled ({settlement:?}), winners {:?}",
        hand.id,
        hand.winner_positions
    );
    Ok(settlement)
}

fn split_pot_evenly(hand: &mut HandRecord) {
    let live: Vec<usize> = hand.live_players().map(|p| p.position).collect();
    if live.is_empty() {
        for p in &hand.players {
            hand.winnings.insert(p.position, -(p.total_invested as i64));
        }
        return;
    }
    let share = hand.pot_size / live.len() as u64;
    let remainder = hand.pot_size % live.len() as u64;
    for p in &hand.players {
        let net = if p.is_folded {
            -(p.total_invested as i64)
        } else {
            share as i64 - p.total_invested as i64
        };
        hand.winnings.insert(p.position, net);
    }
    // Odd chips go to the earliest live seat so the split stays zero-sum.
    if remainder > 0 {
        if let Some(net) = hand.winnings.get_mut(&live[0]) {
            *net += remainder as i64;
        }
    }
}
