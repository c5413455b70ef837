use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Small blind posted by seat 1 when a hand opens.
pub const SMALL_BLIND: u64 = 20;
/// Big blind posted by seat 2; also the fixed betting unit for min bets and raises.
pub const BIG_BLIND: u64 = 40;
/// Seats at the table. Every hand is exactly six-handed.
pub const SEATS: usize = 6;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("expected exactly six starting stacks, got {0}")]
    SeatCount(usize),
    #[error("starting stack for seat {0} must be positive")]
    EmptyStack(usize),
    #[error("unknown seat position: {0}")]
    UnknownSeat(usize),
}

/// Betting rounds in table order. A hand only ever moves forward through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Round {
    pub fn next(self) -> Option<Round> {
        match self {
            Round::Preflop => Some(Round::Flop),
            Round::Flop => Some(Round::Turn),
            Round::Turn => Some(Round::River),
            Round::River => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

/// One recorded player action, tagged with the round that was active when it
/// was applied. The meaning of `amount` depends on the kind: the target total
/// for `Bet`/`Raise`, ignored for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameAction {
    pub seat: usize,
    pub kind: ActionKind,
    pub amount: u64,
    pub round: Round,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: usize,
    pub name: String,
    /// Chips not yet committed to the pot. Never negative.
    pub stack: u64,
    /// Opaque card string, two characters per card, until revealed.
    pub hole_cards: Option<String>,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
    pub is_folded: bool,
    /// Chips committed in the current betting round. Reset on round transition.
    pub current_bet: u64,
    /// Cumulative chips committed across the whole hand. Monotone.
    pub total_invested: u64,
}

impl Player {
    /// The stack this player started the hand with.
    pub fn starting_stack(&self) -> u64 {
        self.stack + self.total_invested
    }
}

/// Full state of one six-handed hand: seats, action log, pot and round
/// bookkeeping, and (once settled) the final winnings.
///
/// A record is opened once with blinds posted, mutated in place by the
/// betting engine, and completed exactly once by settlement. After
/// `is_completed` flips, the core refuses further mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRecord {
    pub id: String,
    /// Six players, index equal to seat position.
    pub players: Vec<Player>,
    /// Append-only chronological action log.
    pub actions: Vec<GameAction>,
    /// Revealed community cards as one string, two characters per card:
    /// chars 0-5 flop, 6-7 turn, 8-9 river.
    pub board_cards: String,
    /// Total chips committed by all players. Always equals the sum of
    /// `total_invested` while the hand is live.
    pub pot_size: u64,
    pub current_round: Round,
    pub is_completed: bool,
    /// Seats with positive net winnings, filled at settlement.
    pub winner_positions: Vec<usize>,
    /// Net chips won or lost per seat relative to the starting stack.
    pub winnings: BTreeMap<usize, i64>,
    pub created_at: SystemTime,
}

impl HandRecord {
    /// Open a new hand: seat 0 deals, seat 1 posts the small blind, seat 2
    /// posts the big blind, and the pot is seeded with both blinds.
    pub fn open(stacks: &[u64]) -> Result<Self, HandError> {
        if stacks.len() != SEATS {
            return Err(HandError::SeatCount(stacks.len()));
        }
        if let Some(pos) = stacks.iter().position(|&s| s == 0) {
            return Err(HandError::EmptyStack(pos));
        }
        let mut players: Vec<Player> = stacks
            .iter()
            .enumerate()
            .map(|(i, &stack)| Player {
                position: i,
                name: format!("Player {}", i + 1),
                stack,
                hole_cards: None,
                is_dealer: i == 0,
                is_small_blind: i == 1,
                is_big_blind: i == 2,
                is_folded: false,
                current_bet: 0,
                total_invested: 0,
            })
            .collect();

        let sb = players[1].stack.min(SMALL_BLIND);
        players[1].stack -= sb;
        players[1].current_bet = sb;
        players[1].total_invested = sb;

        let bb = players[2].stack.min(BIG_BLIND);
        players[2].stack -= bb;
        players[2].current_bet = bb;
        players[2].total_invested = bb;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            players,
            actions: Vec::new(),
            board_cards: String::new(),
            pot_size: sb + bb,
            current_round: Round::Preflop,
            is_completed: false,
            winner_positions: Vec::new(),
            winnings: BTreeMap::new(),
            created_at: SystemTime::now(),
        })
    }

    pub fn player(&self, position: usize) -> Option<&Player> {
        self.players.get(position)
    }

    pub fn player_mut(&mut self, position: usize) -> Option<&mut Player> {
        self.players.get_mut(position)
    }

    /// Players still contesting the pot.
    pub fn live_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_folded)
    }

    pub fn live_count(&self) -> usize {
        self.live_players().count()
    }

    /// Highest `current_bet` among non-folded players.
    pub fn max_live_bet(&self) -> u64 {
        self.live_players().map(|p| p.current_bet).max().unwrap_or(0)
    }

    /// Pot conservation check: the pot must equal total investment.
    pub fn pot_matches_investment(&self) -> bool {
        self.pot_size == self.players.iter().map(|p| p.total_invested).sum::<u64>()
    }

    /// Flop cards (first three), once dealt.
    pub fn flop(&self) -> Option<&str> {
        self.board_cards.get(0..6)
    }

    /// Turn card, once dealt.
    pub fn turn(&self) -> Option<&str> {
        self.board_cards.get(6..8)
    }

    /// River card, once dealt.
    pub fn river(&self) -> Option<&str> {
        self.board_cards.get(8..10)
    }

    /// Compact five-line history summary: id, stacks and button positions,
    /// hole cards, action sequence with board, and net winnings per seat.
    pub fn summary(&self) -> String {
        let dealer = self.players.iter().find(|p| p.is_dealer).map(|p| p.position);
        let sb = self.players.iter().find(|p| p.is_small_blind).map(|p| p.position);
        let bb = self.players.iter().find(|p| p.is_big_blind).map(|p| p.position);
        let stacks: Vec<u64> = self.players.iter().map(|p| p.starting_stack()).collect();

        let cards: Vec<&str> =
            self.players.iter().map(|p| p.hole_cards.as_deref().unwrap_or("??")).collect();

        let mut tokens: Vec<String> = self
            .actions
            .iter()
            .map(|a| match a.kind {
                ActionKind::Fold => "f".to_string(),
                ActionKind::Check => "x".to_string(),
                ActionKind::Call => "c".to_string(),
                ActionKind::Bet => format!("b{}", a.amount),
                ActionKind::Raise => format!("r{}", a.amount),
                ActionKind::AllIn => "allin".to_string(),
            })
            .collect();
        if !self.board_cards.is_empty() {
            tokens.push(self.board_cards.clone());
        }

        let winnings: Vec<String> = self
            .players
            .iter()
            .map(|p| {
                let amount = self.winnings.get(&p.position).copied().unwrap_or(0);
                if amount > 0 {
                    format!("+{amount}")
                } else {
                    format!("{amount}")
                }
            })
            .collect();

        format!(
            "{}\nStacks: {:?} | Dealer: {} | SB: {} | BB: {}\nCards: {}\nActions: {}\nWinnings: {}",
            self.id,
            stacks,
            dealer.map_or("-".to_string(), |p| p.to_string()),
            sb.map_or("-".to_string(), |p| p.to_string()),
            bb.map_or("-".to_string(), |p| p.to_string()),
            cards.join(" | "),
            tokens.join(" "),
            winnings.join(" | "),
        )
    }
}
