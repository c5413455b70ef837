//! Action legality rules. Pure queries over a [`HandRecord`]; nothing here
//! mutates state or errors. Callers that want to apply an action go through
//! [`crate::engine::apply_action`], which rejects anything these rules refuse.

use crate::hand::{ActionKind, HandRecord, BIG_BLIND};

/// Decide whether `kind` with `amount` is legal for the given seat right now.
///
/// Rules (betting unit = big blind = 40):
/// - folded seats, unknown seats, and completed hands refuse everything
/// - `Fold` is always available to a live seat
/// - `Check` only when the seat already matches the table's highest bet
/// - `Call` only when strictly below the highest bet, and affordable
/// - `Bet` only when no live seat has chips in yet and `amount >= 40`
/// - `Raise` only to at least the highest bet plus 40
/// - `AllIn` whenever the seat has chips behind
///
/// `Call`, `Bet`, and `Raise` additionally require the seat to afford the
/// chips owed; only `AllIn` may empty a stack.
pub fn action_is_legal(hand: &HandRecord, seat: usize, kind: ActionKind, amount: u64) -> bool {
    if hand.is_completed {
        return false;
    }
    let player = match hand.player(seat) {
        Some(p) if !p.is_folded => p,
        _ => return false,
    };
    let max_bet = hand.max_live_bet();
    match kind {
        ActionKind::Fold => true,
        ActionKind::Check => player.current_bet == max_bet,
        ActionKind::Call => {
            player.current_bet < max_bet && player.stack >= max_bet - player.current_bet
        }
        ActionKind::Bet => max_bet == 0 && amount >= BIG_BLIND && player.stack >= amount,
        ActionKind::Raise => {
            amount >= max_bet + BIG_BLIND && player.stack >= amount - player.current_bet
        }
        ActionKind::AllIn => player.stack > 0,
    }
}

/// The subset of actions currently legal for a seat, in fixed display order.
/// `Bet` and `Raise` are probed at their minimum legal amounts; the caller
/// still chooses the actual amount.
pub fn valid_actions(hand: &HandRecord, seat: usize) -> Vec<ActionKind> {
    let max_bet = hand.max_live_bet();
    [
        (ActionKind::Fold, 0),
        (ActionKind::Check, 0),
        (ActionKind::Call, 0),
        (ActionKind::Bet, BIG_BLIND),
        (ActionKind::Raise, max_bet + BIG_BLIND),
        (ActionKind::AllIn, 0),
    ]
    .into_iter()
    .filter(|&(kind, amount)| action_is_legal(hand, seat, kind, amount))
    .map(|(kind, _)| kind)
    .collect()
}
