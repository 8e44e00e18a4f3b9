use holdem_engine::{compare_hands, evaluate_hand, Card, HandCategory, Rank, Suit};

fn card(rank: Rank, suit: Suit) -> Card {
    Card { rank, suit }
}

#[test]
fn test_straight_flush() {
    let player_cards = (card(Rank::Nine, Suit::Spades), card(Rank::Eight, Suit::Spades));
    let community_cards = [
        card(Rank::Seven, Suit::Spades),
        card(Rank::Six, Suit::Spades),
        card(Rank::Five, Suit::Spades),
        card(Rank::King, Suit::Diamonds),
        card(Rank::Queen, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::StraightFlush);
    assert_eq!(value.kickers[0], 9);
}

#[test]
fn test_ace_high_straight_flush_ranks_highest() {
    let player_cards = (card(Rank::Ace, Suit::Hearts), card(Rank::King, Suit::Hearts));
    let community_cards = [
        card(Rank::Queen, Suit::Hearts),
        card(Rank::Jack, Suit::Hearts),
        card(Rank::Ten, Suit::Hearts),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::StraightFlush);
    assert_eq!(value.kickers[0], 14);
}

#[test]
fn test_four_of_a_kind() {
    let player_cards = (card(Rank::Ace, Suit::Hearts), card(Rank::Ace, Suit::Diamonds));
    let community_cards = [
        card(Rank::Ace, Suit::Clubs),
        card(Rank::Ace, Suit::Spades),
        card(Rank::King, Suit::Hearts),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::FourOfAKind);
    assert_eq!(value.kickers[0], 14);
    assert_eq!(value.kickers[1], 13);
}

#[test]
fn test_full_house() {
    let player_cards = (card(Rank::King, Suit::Hearts), card(Rank::King, Suit::Diamonds));
    let community_cards = [
        card(Rank::King, Suit::Clubs),
        card(Rank::Queen, Suit::Spades),
        card(Rank::Queen, Suit::Hearts),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::FullHouse);
    assert_eq!(value.kickers[0], 13);
    assert_eq!(value.kickers[1], 12);
}

#[test]
fn test_flush() {
    let player_cards = (card(Rank::Ace, Suit::Hearts), card(Rank::Ten, Suit::Hearts));
    let community_cards = [
        card(Rank::King, Suit::Hearts),
        card(Rank::Queen, Suit::Hearts),
        card(Rank::Jack, Suit::Diamonds),
        card(Rank::Two, Suit::Hearts),
        card(Rank::Three, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::Flush);
    assert_eq!(&value.kickers[..5], &[14, 13, 12, 10, 2]);
}

#[test]
fn test_straight() {
    let player_cards = (card(Rank::Ten, Suit::Hearts), card(Rank::Nine, Suit::Diamonds));
    let community_cards = [
        card(Rank::Eight, Suit::Clubs),
        card(Rank::Seven, Suit::Spades),
        card(Rank::Six, Suit::Hearts),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::Straight);
    assert_eq!(value.kickers[0], 10);
}

#[test]
fn test_straight_ace_low_ranks_as_five_high() {
    let player_cards = (card(Rank::Ace, Suit::Hearts), card(Rank::Two, Suit::Diamonds));
    let community_cards = [
        card(Rank::Three, Suit::Clubs),
        card(Rank::Four, Suit::Spades),
        card(Rank::Five, Suit::Hearts),
        card(Rank::King, Suit::Diamonds),
        card(Rank::Queen, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::Straight);
    assert_eq!(value.kickers[0], 5);
}

#[test]
fn test_three_of_a_kind() {
    let player_cards = (card(Rank::Jack, Suit::Hearts), card(Rank::Jack, Suit::Diamonds));
    let community_cards = [
        card(Rank::Jack, Suit::Clubs),
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::ThreeOfAKind);
    assert_eq!(value.kickers[0], 11);
    assert_eq!(&value.kickers[1..3], &[10, 9]);
}

#[test]
fn test_two_pair() {
    let player_cards = (card(Rank::Queen, Suit::Hearts), card(Rank::Queen, Suit::Diamonds));
    let community_cards = [
        card(Rank::Ten, Suit::Clubs),
        card(Rank::Ten, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::TwoPair);
    assert_eq!(value.kickers[0], 12);
    assert_eq!(value.kickers[1], 10);
    assert_eq!(value.kickers[2], 9);
}

#[test]
fn test_one_pair() {
    let player_cards = (card(Rank::Ace, Suit::Hearts), card(Rank::Ace, Suit::Diamonds));
    let community_cards = [
        card(Rank::King, Suit::Clubs),
        card(Rank::Queen, Suit::Spades),
        card(Rank::Jack, Suit::Hearts),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::Pair);
    assert_eq!(value.kickers[0], 14);
    assert_eq!(&value.kickers[1..4], &[13, 12, 11]);
}

#[test]
fn test_high_card() {
    let player_cards = (card(Rank::Ace, Suit::Hearts), card(Rank::King, Suit::Diamonds));
    let community_cards = [
        card(Rank::Queen, Suit::Clubs),
        card(Rank::Jack, Suit::Spades),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::HighCard);
    assert_eq!(&value.kickers[..5], &[14, 13, 12, 11, 9]);
}

#[test]
fn test_best_five_of_seven_ignores_the_lower_pair() {
    let player_cards = (card(Rank::Two, Suit::Hearts), card(Rank::Nine, Suit::Hearts));
    let community_cards = [
        card(Rank::Four, Suit::Hearts),
        card(Rank::Six, Suit::Hearts),
        card(Rank::King, Suit::Hearts),
        card(Rank::King, Suit::Clubs),
        card(Rank::Two, Suit::Clubs),
    ];

    let value = evaluate_hand(player_cards, &community_cards);
    assert_eq!(value.category, HandCategory::Flush);
}

#[test]
fn test_pair_of_aces_beats_ace_high() {
    let a_hole = (card(Rank::Ace, Suit::Hearts), card(Rank::Ace, Suit::Spades));
    let b_hole = (card(Rank::King, Suit::Clubs), card(Rank::Queen, Suit::Diamonds));
    let community_cards = [
        card(Rank::Two, Suit::Hearts),
        card(Rank::Five, Suit::Clubs),
        card(Rank::Ten, Suit::Spades),
        card(Rank::Three, Suit::Diamonds),
        card(Rank::Eight, Suit::Hearts),
    ];

    let a = evaluate_hand(a_hole, &community_cards);
    let b = evaluate_hand(b_hole, &community_cards);
    assert_eq!(compare_hands(a, b), std::cmp::Ordering::Greater);
}
