//! A pure, deterministic Texas Hold'em state machine: given a table and an
//! event, transitions compute the next table or a typed error. This crate
//! does no I/O and assumes no scheduler; the `holdem-room` crate drives it
//! from a single-writer event loop.

pub mod cards;
pub mod model;
pub mod queries;
pub mod scenarios;
pub mod transitions;

pub use cards::{compare_hands, evaluate_hand, Card, Deck, HandCategory, HandValue, Rank, Suit};
pub use model::{
    Bet, Config, DeckSource, HoldemError, Move, MoveRecord, OpponentView, PhaseState, PlayerView,
    Position, RoundResult, RoundState, Seat, SeatStatus, Street, Table, TableStatus,
};
pub use queries::player_view;
pub use scenarios::{scenario_by_id, Scenario};
pub use transitions::{
    add_seat, end_game, finalize_round, next_phase, next_round, process_move, remove_seat,
    restart_table, start_round,
};
