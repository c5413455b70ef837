//! Thin orchestrator tying the betting engine and settlement to the
//! persistence and evaluator collaborators. Every operation on a hand is a
//! load, mutate, save cycle serialized per hand id; distinct hands proceed
//! independently.

use crate::engine::{self, ActionError, Outcome};
use crate::hand::{ActionKind, HandError, HandRecord};
use crate::settlement::{self, HandEvaluator, SettleError};
use crate::store::{HandStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("hand not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    InvalidAction(#[from] ActionError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Persistence(#[from] StoreError),
    #[error(transparent)]
    Settlement(#[from] SettleError),
}

pub struct GameService<S, E> {
    store: S,
    evaluator: E,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: HandStore, E: HandEvaluator> GameService<S, E> {
    pub fn new(store: S, evaluator: E) -> Self {
        Self { store, evaluator, locks: Mutex::new(HashMap::new()) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a six-handed hand with the given starting stacks, post blinds,
    /// and persist it.
    pub fn create_hand(&self, stacks: &[u64]) -> Result<HandRecord, ServiceError> {
        let hand = HandRecord::open(stacks)?;
        self.store.save(&hand)?;
        log::info!("opened hand {} with pot {}", hand.id, hand.pot_size);
        Ok(hand)
    }

    /// Record a player action. If the action makes the hand terminal, the
    /// hand is settled before being saved; evaluator failure degrades to the
    /// even-split fallback inside settlement rather than surfacing here.
    pub fn add_action(
        &self,
        id: &str,
        seat: usize,
        kind: ActionKind,
        amount: u64,
    ) -> Result<HandRecord, ServiceError> {
        let lock = self.hand_lock(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut hand = self.load_hand(id)?;
        let outcome = engine::apply_action(&mut hand, seat, kind, amount)?;
        if outcome == Outcome::Settle {
            settlement::settle(&mut hand, &self.evaluator)?;
        }
        self.store.save(&hand)?;
        Ok(hand)
    }

    /// Attach hole cards to seats. The card strings are opaque to the core.
    pub fn deal_hole_cards(
        &self,
        id: &str,
        cards_by_position: &HashMap<usize, String>,
    ) -> Result<HandRecord, ServiceError> {
        let lock = self.hand_lock(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut hand = self.load_hand(id)?;
        for (&position, cards) in cards_by_position {
            let player = hand
                .player_mut(position)
                .ok_or(HandError::UnknownSeat(position))?;
            player.hole_cards = Some(cards.clone());
        }
        self.store.save(&hand)?;
        Ok(hand)
    }

    /// Set the revealed board string (two characters per card; flop, turn,
    /// river by position).
    pub fn deal_board(&self, id: &str, board_cards: &str) -> Result<HandRecord, ServiceError> {
        let lock = self.hand_lock(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut hand = self.load_hand(id)?;
        hand.board_cards = board_cards.to_string();
        self.store.save(&hand)?;
        Ok(hand)
    }

    pub fn hand(&self, id: &str) -> Result<HandRecord, ServiceError> {
        self.load_hand(id)
    }

    /// Most recent hands, completed or in progress.
    pub fn history(&self, limit: usize) -> Result<Vec<HandRecord>, ServiceError> {
        Ok(self.store.recent(limit)?)
    }

    fn load_hand(&self, id: &str) -> Result<HandRecord, ServiceError> {
        self.store.load(id)?.ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    fn hand_lock(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(id.to_string()).or_default().clone()
    }
}
