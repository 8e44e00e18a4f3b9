//! Domain types: seats, table, configuration, and projections.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Card, Deck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatStatus {
    Playing,
    Folded,
    AllIn,
    Eliminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Btn,
    Sb,
    Bb,
    Ep,
    Mp,
    Co,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bet {
    pub street_amount: u32,
    pub round_volume: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub name: String,
    pub chips: u32,
    pub hole: Option<(Card, Card)>,
    pub status: SeatStatus,
    pub position: Option<Position>,
    pub bet: Bet,
    pub acted_this_street: bool,
}

impl Seat {
    pub fn new(id: impl Into<String>, name: impl Into<String>, chips: u32) -> Self {
        Seat {
            id: id.into(),
            name: name.into(),
            chips,
            hole: None,
            status: if chips > 0 {
                SeatStatus::Playing
            } else {
                SeatStatus::Eliminated
            },
            position: None,
            bet: Bet::default(),
            acted_this_street: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseState {
    pub street: Street,
    pub action_count: u32,
    pub street_volume: u32,
}

impl Default for PhaseState {
    fn default() -> Self {
        PhaseState {
            street: Street::PreFlop,
            action_count: 0,
            street_volume: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundState {
    pub number: u32,
    pub round_volume: u32,
    pub current_bet: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    Waiting,
    Playing,
    RoundOver,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DeckSource {
    Random { seed: Option<u64> },
    Scenario { id: String },
}

impl Default for DeckSource {
    fn default() -> Self {
        DeckSource::Random { seed: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub min_players: usize,
    pub starting_chips: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub max_rounds: Option<u32>,
    pub auto_start_enabled: bool,
    pub start_delay_ms: u64,
    pub round_over_delay_ms: u64,
    pub auto_restart_enabled: bool,
    pub auto_restart_delay_ms: u64,
    pub deck_source: DeckSource,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_players: 2,
            starting_chips: 1000,
            small_blind: 10,
            big_blind: 20,
            max_rounds: None,
            auto_start_enabled: true,
            start_delay_ms: 0,
            round_over_delay_ms: 50,
            auto_restart_enabled: true,
            auto_restart_delay_ms: 5_000,
            deck_source: DeckSource::Random { seed: None },
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), HoldemError> {
        if self.starting_chips == 0 || self.small_blind == 0 || self.big_blind == 0 {
            return Err(HoldemError::InconsistentState(
                "chip counts and blinds must be positive".into(),
            ));
        }
        if self.big_blind < self.small_blind {
            return Err(HoldemError::InconsistentState(
                "big blind must be at least the small blind".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_number: u32,
    pub winner_ids: Vec<String>,
    pub pot: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Move {
    Fold,
    Check,
    Call,
    Raise { amount: u32 },
    AllIn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub seat_id: String,
    pub mv: Move,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub status: TableStatus,
    pub seats: Vec<Seat>,
    pub dealer: Option<usize>,
    pub actor: Option<usize>,
    pub community: Vec<Card>,
    pub deck: Deck,
    pub round: RoundState,
    pub phase: PhaseState,
    pub last_move: Option<MoveRecord>,
    pub last_round_result: Option<RoundResult>,
    pub config: Config,
}

impl Table {
    pub fn new(id: impl Into<String>, config: Config) -> Self {
        Table {
            id: id.into(),
            status: TableStatus::Waiting,
            seats: Vec::new(),
            dealer: None,
            actor: None,
            community: Vec::new(),
            deck: Deck::shuffled(None),
            round: RoundState::default(),
            phase: PhaseState::default(),
            last_move: None,
            last_round_result: None,
            config,
        }
    }
}

/// Error taxonomy per the propagation policy: transitions return these,
/// the room surfaces them to the event's originator without mutating state.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldemError {
    #[error("it is not this seat's turn to act")]
    NotYourTurn,
    #[error("the table is locked while a hand is in progress")]
    TableLocked,
    #[error("not enough players to start a round")]
    InsufficientPlayers,
    #[error("illegal move for the current state")]
    InvalidMove,
    #[error("internal invariant violation: {0}")]
    InconsistentState(String),
}

/// Per-seat opponent projection: hands are hidden unless the showdown or
/// all-in-reveal conditions are met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentView {
    pub id: String,
    pub name: String,
    pub status: SeatStatus,
    pub chips: u32,
    pub bet: Bet,
    pub hand: Option<(Card, Card)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub table_id: String,
    pub status: TableStatus,
    pub dealer_id: Option<String>,
    pub small_blind_id: Option<String>,
    pub big_blind_id: Option<String>,
    pub actor_id: Option<String>,
    pub phase: PhaseState,
    pub round: RoundState,
    pub community: Vec<Card>,
    pub own_hole: Option<(Card, Card)>,
    pub own_seat: Seat,
    pub opponents: Vec<OpponentView>,
    pub last_round_result: Option<RoundResult>,
}
