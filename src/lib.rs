//! holdem-tracker: six-max No-Limit Hold'em hand tracking and adjudication
//!
//! Goals:
//! - Deterministic betting state machine with strict pot/stack accounting
//! - Card ranking stays external: settlement talks to a [`settlement::HandEvaluator`]
//!   and degrades to an even pot split if the evaluator fails
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: open a hand and record actions
//! ```
//! use holdem_tracker::engine::{apply_action, Outcome};
//! use holdem_tracker::hand::{ActionKind, HandRecord, Round};
//!
//! let mut hand = HandRecord::open(&[1000, 1000, 1000, 1000, 1000, 1000]).unwrap();
//! // Blinds are posted on open: seat 1 the small blind, seat 2 the big blind.
//! assert_eq!(hand.pot_size, 60);
//!
//! assert_eq!(apply_action(&mut hand, 3, ActionKind::Call, 0).unwrap(), Outcome::Continue);
//! assert_eq!(hand.pot_size, 100);
//!
//! // An illegal action is rejected without touching the record.
//! assert!(apply_action(&mut hand, 4, ActionKind::Bet, 39).is_err());
//! assert_eq!(hand.current_round, Round::Preflop);
//! ```

pub mod engine;
pub mod hand;
pub mod service;
pub mod settlement;
pub mod store;
pub mod validator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
