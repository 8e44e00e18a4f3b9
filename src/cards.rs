//! Card model, deck construction, and hand evaluation.
//!
//! Ace is represented internally with value 14 so that high-card and kicker
//! comparisons fall out of ordinary integer ordering; the wheel straight
//! (A-2-3-4-5) is special-cased in [`straight_top`].

use std::collections::VecDeque;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Diamonds,
    Clubs,
    Hearts,
}

impl Suit {
    const ALL: [Suit; 4] = [Suit::Spades, Suit::Diamonds, Suit::Clubs, Suit::Hearts];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn from_value(value: u8) -> Self {
        match value {
            2 => Rank::Two,
            3 => Rank::Three,
            4 => Rank::Four,
            5 => Rank::Five,
            6 => Rank::Six,
            7 => Rank::Seven,
            8 => Rank::Eight,
            9 => Rank::Nine,
            10 => Rank::Ten,
            11 => Rank::Jack,
            12 => Rank::Queen,
            13 => Rank::King,
            14 | 1 => Rank::Ace,
            other => panic!("invalid rank value: {other}"),
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };
        write!(f, "{c}")
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            Suit::Spades => 's',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Hearts => 'h',
        };
        write!(f, "{c}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// A deck dealt strictly from the head; the deterministic harness in
/// [`crate::scenarios`] relies on this orientation to stack scenario cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck(VecDeque<Card>);

impl Deck {
    fn full_set() -> Vec<Card> {
        let mut cards = Vec::with_capacity(52);
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                cards.push(Card { rank, suit });
            }
        }
        cards
    }

    /// Fisher-Yates shuffle of the full 52-card set.
    pub fn shuffled(seed: Option<u64>) -> Self {
        let mut cards = Self::full_set();
        match seed {
            Some(seed) => cards.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => cards.shuffle(&mut rand::rng()),
        }
        Deck(cards.into())
    }

    /// Builds a deck for a named scenario: hole cards for each chip-bearing
    /// seat (in seat order, two cards each) followed by the scenario's
    /// community cards, followed by the unused complement as padding.
    /// Dealing always consumes from the head, so hole cards come out first
    /// and community cards immediately follow once hole-dealing is done.
    pub fn scenario(hole_cards: &[(Card, Card)], community: &[Card; 5]) -> Self {
        let mut ordered: Vec<Card> = Vec::with_capacity(52);
        for (a, b) in hole_cards {
            ordered.push(*a);
            ordered.push(*b);
        }
        ordered.extend_from_slice(community);

        let used: std::collections::HashSet<Card> = ordered.iter().copied().collect();
        let padding = Self::full_set().into_iter().filter(|c| !used.contains(c));
        ordered.extend(padding);

        Deck(ordered.into())
    }

    pub fn deal_one(&mut self) -> Option<Card> {
        self.0.pop_front()
    }

    pub fn deal_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.deal_one()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

/// A categorical hand value with ordered kickers; `Ord` gives exactly the
/// total order `compareHands` needs (category first, then kickers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandValue {
    pub category: HandCategory,
    pub kickers: [u8; 5],
}

/// Evaluates the best 5-card hand from 2 hole cards and the board, searching
/// all C(7,5) = 21 subsets when all 5 community cards are present (fewer
/// subsets pre-river, where this is only used for display, never showdown).
pub fn evaluate_hand(hole: (Card, Card), community: &[Card]) -> HandValue {
    let mut all = vec![hole.0, hole.1];
    all.extend_from_slice(community);
    best_of(&all)
}

fn best_of(cards: &[Card]) -> HandValue {
    if cards.len() <= 5 {
        let mut padded = cards.to_vec();
        // pad impossible in practice (evaluator is only called with >=5 cards
        // once both hole cards are known and at least flop is out), guard anyway
        while padded.len() < 5 {
            padded.push(padded[0]);
        }
        return evaluate_five(&padded);
    }
    cards
        .iter()
        .copied()
        .combinations(5)
        .map(|five| evaluate_five(&five))
        .max()
        .expect("at least one 5-card combination exists")
}

fn evaluate_five(cards: &[Card]) -> HandValue {
    assert_eq!(cards.len(), 5, "hand evaluation requires exactly 5 cards");

    let mut rank_counts: std::collections::HashMap<Rank, u8> = std::collections::HashMap::new();
    for c in cards {
        *rank_counts.entry(c.rank).or_insert(0) += 1;
    }
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_top = straight_top(cards);

    let mut by_count: Vec<(Rank, u8)> = rank_counts.into_iter().collect();
    // sort by count desc, then rank desc, so the most significant groups lead
    by_count.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let kickers_desc = |ranks: &[Rank]| -> Vec<u8> {
        let mut v: Vec<u8> = ranks.iter().map(|r| r.value()).collect();
        v.sort_unstable_by(|a, b| b.cmp(a));
        v
    };

    if is_flush {
        if let Some(top) = straight_top {
            return HandValue {
                category: HandCategory::StraightFlush,
                kickers: pad([top.value(), 0, 0, 0, 0]),
            };
        }
    }

    if by_count[0].1 == 4 {
        let quad = by_count[0].0;
        let kicker = by_count[1].0;
        return HandValue {
            category: HandCategory::FourOfAKind,
            kickers: pad([quad.value(), kicker.value(), 0, 0, 0]),
        };
    }

    if by_count[0].1 == 3 && by_count.len() > 1 && by_count[1].1 >= 2 {
        let trips = by_count[0].0;
        let pair = by_count[1].0;
        return HandValue {
            category: HandCategory::FullHouse,
            kickers: pad([trips.value(), pair.value(), 0, 0, 0]),
        };
    }

    if is_flush {
        let ks = kickers_desc(&cards.iter().map(|c| c.rank).collect::<Vec<_>>());
        return HandValue {
            category: HandCategory::Flush,
            kickers: pad([ks[0], ks[1], ks[2], ks[3], ks[4]]),
        };
    }

    if let Some(top) = straight_top {
        return HandValue {
            category: HandCategory::Straight,
            kickers: pad([top.value(), 0, 0, 0, 0]),
        };
    }

    if by_count[0].1 == 3 {
        let trips = by_count[0].0;
        let mut ks: Vec<u8> = by_count[1..].iter().map(|(r, _)| r.value()).collect();
        ks.sort_unstable_by(|a, b| b.cmp(a));
        ks.truncate(2);
        return HandValue {
            category: HandCategory::ThreeOfAKind,
            kickers: pad([trips.value(), ks[0], ks[1], 0, 0]),
        };
    }

    let pairs: Vec<Rank> = by_count
        .iter()
        .filter(|(_, c)| *c == 2)
        .map(|(r, _)| *r)
        .collect();

    if pairs.len() >= 2 {
        let mut sorted_pairs = pairs.clone();
        sorted_pairs.sort_by(|a, b| b.cmp(a));
        let (high, low) = (sorted_pairs[0], sorted_pairs[1]);
        let kicker = by_count
            .iter()
            .map(|(r, _)| *r)
            .find(|r| *r != high && *r != low)
            .expect("a fifth card exists outside both pairs");
        return HandValue {
            category: HandCategory::TwoPair,
            kickers: pad([high.value(), low.value(), kicker.value(), 0, 0]),
        };
    }

    if pairs.len() == 1 {
        let pair = pairs[0];
        let mut ks: Vec<u8> = by_count
            .iter()
            .filter(|(r, _)| *r != pair)
            .map(|(r, _)| r.value())
            .collect();
        ks.sort_unstable_by(|a, b| b.cmp(a));
        ks.truncate(3);
        return HandValue {
            category: HandCategory::Pair,
            kickers: pad([pair.value(), ks[0], ks[1], ks[2], 0]),
        };
    }

    let ks = kickers_desc(&cards.iter().map(|c| c.rank).collect::<Vec<_>>());
    HandValue {
        category: HandCategory::HighCard,
        kickers: pad([ks[0], ks[1], ks[2], ks[3], ks[4]]),
    }
}

fn pad(values: [u8; 5]) -> [u8; 5] {
    values
}

/// Returns the straight's top card value if the 5 cards form a straight,
/// treating Ace as low for the A-2-3-4-5 wheel (top card value 5).
fn straight_top(cards: &[Card]) -> Option<Rank> {
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    values.dedup();
    if values.len() < 5 {
        return None;
    }
    let best_run = values
        .windows(5)
        .filter(|w| w.windows(2).all(|p| p[1] == p[0] + 1))
        .map(|w| w[4])
        .max();
    if let Some(top) = best_run {
        return Some(Rank::from_value(top));
    }
    // wheel: A,2,3,4,5
    if values.contains(&14) && [2u8, 3, 4, 5].iter().all(|v| values.contains(v)) {
        return Some(Rank::Five);
    }
    None
}

/// Strict ordering for two hand values, matching `Ord`'s usual -1/0/+1 shape.
pub fn compare_hands(a: HandValue, b: HandValue) -> std::cmp::Ordering {
    a.cmp(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    #[test]
    fn shuffled_deck_has_52_unique_cards() {
        let mut deck = Deck::shuffled(Some(7));
        let mut seen = std::collections::HashSet::new();
        while let Some(c) = deck.deal_one() {
            assert!(seen.insert(c), "duplicate card dealt");
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn royal_flush_ranks_as_straight_flush() {
        let hole = (card(Rank::Ace, Suit::Spades), card(Rank::King, Suit::Spades));
        let board = [
            card(Rank::Queen, Suit::Spades),
            card(Rank::Jack, Suit::Spades),
            card(Rank::Ten, Suit::Spades),
            card(Rank::Two, Suit::Hearts),
            card(Rank::Three, Suit::Clubs),
        ];
        let value = evaluate_hand(hole, &board);
        assert_eq!(value.category, HandCategory::StraightFlush);
        assert_eq!(value.kickers[0], 14);
    }

    #[test]
    fn wheel_straight_top_is_five() {
        let hole = (card(Rank::Ace, Suit::Spades), card(Rank::Two, Suit::Hearts));
        let board = [
            card(Rank::Three, Suit::Clubs),
            card(Rank::Four, Suit::Diamonds),
            card(Rank::Five, Suit::Spades),
            card(Rank::King, Suit::Hearts),
            card(Rank::Queen, Suit::Hearts),
        ];
        let value = evaluate_hand(hole, &board);
        assert_eq!(value.category, HandCategory::Straight);
        assert_eq!(value.kickers[0], 5);
    }

    #[test]
    fn pair_of_aces_beats_high_card_nine() {
        let a_hole = (card(Rank::Ace, Suit::Hearts), card(Rank::Ace, Suit::Spades));
        let b_hole = (card(Rank::Seven, Suit::Clubs), card(Rank::Nine, Suit::Diamonds));
        let board = [
            card(Rank::Two, Suit::Hearts),
            card(Rank::Five, Suit::Clubs),
            card(Rank::Ten, Suit::Spades),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Eight, Suit::Hearts),
        ];
        let a = evaluate_hand(a_hole, &board);
        let b = evaluate_hand(b_hole, &board);
        assert_eq!(compare_hands(a, b), std::cmp::Ordering::Greater);
    }

    #[test]
    fn scenario_deck_deals_hole_then_community_from_head() {
        let hole = vec![
            (card(Rank::Ace, Suit::Hearts), card(Rank::Ace, Suit::Spades)),
            (card(Rank::Seven, Suit::Clubs), card(Rank::Nine, Suit::Diamonds)),
        ];
        let board = [
            card(Rank::Two, Suit::Hearts),
            card(Rank::Five, Suit::Clubs),
            card(Rank::Ten, Suit::Spades),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Eight, Suit::Hearts),
        ];
        let mut deck = Deck::scenario(&hole, &board);
        assert_eq!(deck.deal_one(), Some(hole[0].0));
        assert_eq!(deck.deal_one(), Some(hole[0].1));
        assert_eq!(deck.deal_one(), Some(hole[1].0));
        assert_eq!(deck.deal_one(), Some(hole[1].1));
        assert_eq!(deck.deal_n(5), board.to_vec());
        assert_eq!(deck.len(), 52 - 4 - 5);
    }
}
