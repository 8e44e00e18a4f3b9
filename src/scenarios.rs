//! Named, deterministic scenarios for reproducible tests. Each scenario
//! fixes every seat's hole cards and the board; scenario state never
//! leaks between calls because `scenario_by_id` builds a fresh value
//! every time rather than handing out shared mutable state.

use crate::cards::{Card, Rank, Suit};

pub struct Scenario {
    pub hole_cards: Vec<(Card, Card)>,
    pub community: [Card; 5],
}

fn card(rank: Rank, suit: Suit) -> Card {
    Card { rank, suit }
}

/// Heads-up: seat 0 holds pocket aces, seat 1 holds 7-9 offsuit; the board
/// gives seat 0 a pair of aces against seat 1's nine-high.
fn player1_wins() -> Scenario {
    Scenario {
        hole_cards: vec![
            (card(Rank::Ace, Suit::Hearts), card(Rank::Ace, Suit::Spades)),
            (card(Rank::Seven, Suit::Clubs), card(Rank::Nine, Suit::Diamonds)),
        ],
        community: [
            card(Rank::Two, Suit::Hearts),
            card(Rank::Five, Suit::Clubs),
            card(Rank::Ten, Suit::Spades),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Eight, Suit::Hearts),
        ],
    }
}

/// Heads-up: both seats hold pocket eights; the board pairs neither hand,
/// so the pot splits evenly.
fn tie() -> Scenario {
    Scenario {
        hole_cards: vec![
            (card(Rank::Eight, Suit::Hearts), card(Rank::Eight, Suit::Spades)),
            (card(Rank::Eight, Suit::Clubs), card(Rank::Eight, Suit::Diamonds)),
        ],
        community: [
            card(Rank::Two, Suit::Hearts),
            card(Rank::Five, Suit::Clubs),
            card(Rank::Ten, Suit::Spades),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Seven, Suit::Hearts),
        ],
    }
}

/// Three seats: a main-pot/side-pot scenario where the shortest stack is
/// still the best hand, so the side pot goes to the two deeper stacks.
fn side_pot_three_way() -> Scenario {
    Scenario {
        hole_cards: vec![
            (card(Rank::King, Suit::Hearts), card(Rank::King, Suit::Spades)),
            (card(Rank::Queen, Suit::Clubs), card(Rank::Queen, Suit::Diamonds)),
            (card(Rank::Ace, Suit::Clubs), card(Rank::Ace, Suit::Diamonds)),
        ],
        community: [
            card(Rank::Two, Suit::Hearts),
            card(Rank::Five, Suit::Clubs),
            card(Rank::Nine, Suit::Spades),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Jack, Suit::Hearts),
        ],
    }
}

pub fn scenario_by_id(id: &str) -> Option<Scenario> {
    match id {
        "PLAYER1_WINS" => Some(player1_wins()),
        "TIE" => Some(tie()),
        "SIDE_POT_THREE_WAY" => Some(side_pot_three_way()),
        _ => None,
    }
}
