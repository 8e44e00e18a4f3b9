//! Thin async front door over `holdem-engine`: a single-writer room actor
//! drives the pure state machine and fans state updates out to subscribers.
//! This crate owns no poker rules of its own.

pub mod room;

pub use holdem_engine::{
    Card, Config, DeckSource, HoldemError, Move, PlayerView, Table, TableStatus,
};
pub use room::{spawn_room, RoomHandle};
