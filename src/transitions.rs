//! Pure `(state, action) -> state | error` transitions: the hand life-cycle.

use std::collections::BTreeSet;

use crate::cards::{compare_hands, evaluate_hand, Deck};
use crate::model::{
    Config, DeckSource, HoldemError, Move, MoveRecord, PhaseState, RoundResult, RoundState, Seat,
    SeatStatus, Street, Table, TableStatus,
};
use crate::queries;
use crate::scenarios;

fn validate_seating_open(table: &Table) -> Result<(), HoldemError> {
    match table.status {
        TableStatus::Waiting | TableStatus::RoundOver => Ok(()),
        _ => Err(HoldemError::TableLocked),
    }
}

pub fn add_seat(table: &Table, id: &str, name: &str) -> Result<Table, HoldemError> {
    validate_seating_open(table)?;
    if table.seats.iter().any(|s| s.id == id) {
        return Err(HoldemError::InvalidMove);
    }
    let mut t = table.clone();
    let chips = t.config.starting_chips;
    t.seats.push(Seat::new(id, name, chips));
    Ok(t)
}

pub fn remove_seat(table: &Table, id: &str) -> Result<Table, HoldemError> {
    validate_seating_open(table)?;
    let mut t = table.clone();
    let idx = t
        .seats
        .iter()
        .position(|s| s.id == id)
        .ok_or(HoldemError::InvalidMove)?;
    t.seats.remove(idx);
    t.actor = t.actor.and_then(|a| match a.cmp(&idx) {
        std::cmp::Ordering::Greater => Some(a - 1),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Less => Some(a),
    });
    t.dealer = t.dealer.and_then(|d| match d.cmp(&idx) {
        std::cmp::Ordering::Greater => Some(d - 1),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Less => Some(d),
    });
    Ok(t)
}

fn build_deck(config: &Config, active_count: usize) -> Result<Deck, HoldemError> {
    match &config.deck_source {
        DeckSource::Random { seed } => Ok(Deck::shuffled(*seed)),
        DeckSource::Scenario { id } => {
            let scenario = scenarios::scenario_by_id(id).ok_or_else(|| {
                HoldemError::InconsistentState(format!("unknown scenario id: {id}"))
            })?;
            if scenario.hole_cards.len() != active_count {
                return Err(HoldemError::InconsistentState(
                    "scenario hole card count does not match the active roster".into(),
                ));
            }
            Ok(Deck::scenario(&scenario.hole_cards, &scenario.community))
        }
    }
}

/// Shared entry point for `start_round` and `next_round`: rotates (or picks
/// an initial) dealer, assigns positions, deals hole cards, posts blinds and
/// sets the first actor. Eliminated seats are skipped entirely.
fn begin_hand(table: &Table) -> Result<Table, HoldemError> {
    table.config.validate()?;
    let active = queries::chip_bearing_seats(table);
    let threshold = table.config.min_players.max(2);
    if active.len() < threshold {
        return Err(HoldemError::InsufficientPlayers);
    }

    let mut t = table.clone();
    for seat in &mut t.seats {
        seat.hole = None;
        seat.bet = Default::default();
        seat.acted_this_street = false;
        if seat.status != SeatStatus::Eliminated {
            seat.status = SeatStatus::Playing;
        }
    }
    t.community.clear();
    t.round = RoundState {
        number: t.round.number + 1,
        round_volume: 0,
        current_bet: 0,
    };
    t.phase = PhaseState {
        street: Street::PreFlop,
        action_count: 0,
        street_volume: 0,
    };
    t.last_move = None;

    let dealer = match t.dealer {
        None => active[0],
        Some(previous) => queries::next_matching(&t, previous, |s| s.chips > 0)
            .unwrap_or(active[0]),
    };
    t.dealer = Some(dealer);
    queries::assign_positions(&mut t.seats, dealer, &active);

    t.deck = build_deck(&t.config, active.len())?;
    for &idx in &active {
        let first = t
            .deck
            .deal_one()
            .ok_or_else(|| HoldemError::InconsistentState("deck exhausted dealing hole cards".into()))?;
        let second = t
            .deck
            .deal_one()
            .ok_or_else(|| HoldemError::InconsistentState("deck exhausted dealing hole cards".into()))?;
        t.seats[idx].hole = Some((first, second));
    }

    if let Some(sb) = queries::small_blind_index(&t) {
        let amount = t.config.small_blind;
        apply_bet(&mut t.seats[sb], &mut t.round, &mut t.phase, amount, true);
    }
    if let Some(bb) = queries::big_blind_index(&t) {
        let amount = t.config.big_blind;
        apply_bet(&mut t.seats[bb], &mut t.round, &mut t.phase, amount, true);
    }

    t.actor = queries::first_to_act(&t);
    t.status = TableStatus::Playing;
    Ok(t)
}

pub fn start_round(table: &Table) -> Result<Table, HoldemError> {
    if table.status != TableStatus::Waiting {
        return Err(HoldemError::TableLocked);
    }
    begin_hand(table)
}

pub fn next_round(table: &Table) -> Result<Table, HoldemError> {
    if table.status != TableStatus::RoundOver {
        return Err(HoldemError::TableLocked);
    }
    begin_hand(table)
}

pub fn end_game(table: &Table) -> Result<Table, HoldemError> {
    let mut t = table.clone();
    t.status = TableStatus::GameOver;
    t.actor = None;
    Ok(t)
}

/// Resets a `GameOver` table back to an initial-shaped `Waiting` table,
/// preserving seat identities and configuration (the room's auto-restart
/// handler).
pub fn restart_table(table: &Table) -> Result<Table, HoldemError> {
    if table.status != TableStatus::GameOver {
        return Err(HoldemError::InvalidMove);
    }
    let mut t = table.clone();
    for seat in &mut t.seats {
        seat.chips = t.config.starting_chips;
        seat.hole = None;
        seat.bet = Default::default();
        seat.acted_this_street = false;
        seat.position = None;
        seat.status = SeatStatus::Playing;
    }
    t.status = TableStatus::Waiting;
    t.dealer = None;
    t.actor = None;
    t.community.clear();
    t.round = RoundState::default();
    t.phase = PhaseState::default();
    t.last_move = None;
    t.last_round_result = None;
    Ok(t)
}

/// Applying an additional amount for a seat: see spec's shared bet helper.
/// `is_blind` leaves `acted_this_street` false rather than marking it true.
fn apply_bet(seat: &mut Seat, round: &mut RoundState, phase: &mut PhaseState, delta: u32, is_blind: bool) {
    let actual = delta.min(seat.chips);
    seat.bet.street_amount += actual;
    seat.bet.round_volume += actual;
    seat.chips -= actual;
    round.round_volume += actual;
    phase.street_volume += actual;
    round.current_bet = round.current_bet.max(seat.bet.street_amount);
    if seat.chips == 0 {
        seat.status = SeatStatus::AllIn;
    }
    seat.acted_this_street = !is_blind;
}

pub fn process_move(table: &Table, seat_id: &str, mv: Move) -> Result<Table, HoldemError> {
    if table.status != TableStatus::Playing {
        return Err(HoldemError::TableLocked);
    }
    let idx = table
        .actor
        .ok_or(HoldemError::NotYourTurn)?;
    if table.seats[idx].id != seat_id {
        return Err(HoldemError::NotYourTurn);
    }
    if table.seats[idx].status != SeatStatus::Playing {
        return Err(HoldemError::InconsistentState(
            "current actor is not in Playing status".into(),
        ));
    }

    let mut t = table.clone();
    let prior_current_bet = t.round.current_bet;

    match mv {
        Move::Fold => {
            t.seats[idx].status = SeatStatus::Folded;
        }
        Move::Check => {
            if t.seats[idx].bet.street_amount != t.round.current_bet {
                return Err(HoldemError::InconsistentState(
                    "check requires the actor to already match the current bet".into(),
                ));
            }
        }
        Move::Call => {
            let owed = t.round.current_bet.saturating_sub(t.seats[idx].bet.street_amount);
            if owed > 0 {
                apply_bet(&mut t.seats[idx], &mut t.round, &mut t.phase, owed, false);
            }
        }
        Move::Raise { amount } => {
            let new_street_amount = t.seats[idx].bet.street_amount + amount;
            if amount == 0 || new_street_amount <= prior_current_bet {
                return Err(HoldemError::InvalidMove);
            }
            apply_bet(&mut t.seats[idx], &mut t.round, &mut t.phase, amount, false);
            if t.seats[idx].bet.street_amount > prior_current_bet {
                reopen_action(&mut t, idx);
            }
        }
        Move::AllIn => {
            if t.seats[idx].chips == 0 {
                return Err(HoldemError::InvalidMove);
            }
            let chips = t.seats[idx].chips;
            apply_bet(&mut t.seats[idx], &mut t.round, &mut t.phase, chips, false);
            if t.seats[idx].bet.street_amount > prior_current_bet {
                reopen_action(&mut t, idx);
            }
        }
    }

    t.phase.action_count += 1;
    t.seats[idx].acted_this_street = true;
    t.last_move = Some(MoveRecord {
        seat_id: seat_id.to_string(),
        mv,
    });

    run_oracle(&mut t)?;
    Ok(t)
}

fn reopen_action(table: &mut Table, raiser: usize) {
    for (i, seat) in table.seats.iter_mut().enumerate() {
        if i != raiser && seat.status == SeatStatus::Playing {
            seat.acted_this_street = false;
        }
    }
}

fn contenders(table: &Table) -> (Vec<usize>, Vec<usize>) {
    let playing: Vec<usize> = (0..table.seats.len())
        .filter(|&i| table.seats[i].status == SeatStatus::Playing)
        .collect();
    let all_in: Vec<usize> = (0..table.seats.len())
        .filter(|&i| table.seats[i].status == SeatStatus::AllIn)
        .collect();
    (playing, all_in)
}

fn street_closed(table: &Table, playing: &[usize]) -> bool {
    playing.iter().all(|&i| {
        let seat = &table.seats[i];
        seat.acted_this_street && seat.bet.street_amount >= table.round.current_bet
    })
}

/// Decides, after a move has been applied, whether to stay on the same
/// street with a new actor, advance the street, or finalize the round.
fn run_oracle(table: &mut Table) -> Result<(), HoldemError> {
    let (playing, all_in) = contenders(table);

    if playing.len() + all_in.len() <= 1 {
        return finalize_draft(table);
    }

    if playing.is_empty() && all_in.len() >= 2 {
        advance_to_river(table)?;
        return finalize_draft(table);
    }

    if street_closed(table, &playing) {
        return advance_street_or_finalize(table);
    }

    let current = table.actor.ok_or_else(|| {
        HoldemError::InconsistentState("no current actor while street is open".into())
    })?;
    let next = queries::next_matching(table, current, |s| {
        s.status == SeatStatus::Playing
            && (!s.acted_this_street || s.bet.street_amount < table.round.current_bet)
    });

    match next {
        Some(idx) => {
            table.actor = Some(idx);
            Ok(())
        }
        None => advance_street_or_finalize(table),
    }
}

fn advance_street_or_finalize(table: &mut Table) -> Result<(), HoldemError> {
    if table.phase.street == Street::River {
        finalize_draft(table)
    } else {
        advance_one_street(table)?;
        Ok(())
    }
}

fn deal_for_street(table: &mut Table, street: Street) -> Result<(), HoldemError> {
    let n = match street {
        Street::Flop => 3,
        Street::Turn | Street::River => 1,
        _ => 0,
    };
    if n > 0 {
        let dealt = table.deck.deal_n(n);
        if dealt.len() != n {
            return Err(HoldemError::InconsistentState(
                "deck exhausted before community cards were complete".into(),
            ));
        }
        table.community.extend(dealt);
    }
    Ok(())
}

fn advance_one_street(table: &mut Table) -> Result<(), HoldemError> {
    let next_street = match table.phase.street {
        Street::PreFlop => Street::Flop,
        Street::Flop => Street::Turn,
        Street::Turn => Street::River,
        Street::River | Street::Showdown => {
            return Err(HoldemError::InconsistentState(
                "cannot advance past the river without finalizing".into(),
            ))
        }
    };
    deal_for_street(table, next_street)?;
    table.phase.street = next_street;
    table.phase.action_count = 0;
    table.phase.street_volume = 0;
    table.round.current_bet = 0;
    for seat in &mut table.seats {
        seat.bet.street_amount = 0;
        if seat.status == SeatStatus::Playing {
            seat.acted_this_street = false;
        }
    }
    table.actor = queries::first_to_act(table);
    Ok(())
}

pub fn next_phase(table: &Table) -> Result<Table, HoldemError> {
    if table.status != TableStatus::Playing {
        return Err(HoldemError::TableLocked);
    }
    let mut t = table.clone();
    advance_one_street(&mut t)?;
    Ok(t)
}

/// Deals remaining community cards with no further betting, used when
/// every contender is all-in and play races straight to showdown.
fn advance_to_river(table: &mut Table) -> Result<(), HoldemError> {
    while table.phase.street != Street::River {
        let next_street = match table.phase.street {
            Street::PreFlop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River | Street::Showdown => break,
        };
        deal_for_street(table, next_street)?;
        table.phase.street = next_street;
    }
    table.actor = None;
    Ok(())
}

pub fn finalize_round(table: &Table) -> Result<Table, HoldemError> {
    let mut t = table.clone();
    finalize_draft(&mut t)?;
    Ok(t)
}

fn finalize_draft(table: &mut Table) -> Result<(), HoldemError> {
    let levels: BTreeSet<u32> = table
        .seats
        .iter()
        .map(|s| s.bet.round_volume)
        .filter(|&v| v > 0)
        .collect();

    let showdown = table.community.len() == 5;
    let mut winnings = vec![0u32; table.seats.len()];
    let mut total_winners: BTreeSet<String> = BTreeSet::new();

    let mut prev_level = 0u32;
    for level in levels {
        let contributors: Vec<usize> = (0..table.seats.len())
            .filter(|&i| table.seats[i].bet.round_volume >= level)
            .collect();
        let pot = (level - prev_level) * contributors.len() as u32;
        prev_level = level;

        let eligible: Vec<usize> = contributors
            .iter()
            .copied()
            .filter(|&i| {
                table.seats[i].bet.round_volume >= level
                    && !matches!(table.seats[i].status, SeatStatus::Folded | SeatStatus::Eliminated)
            })
            .collect();

        if eligible.is_empty() || pot == 0 {
            continue;
        }

        let winners: Vec<usize> = if showdown {
            let mut best_idx = eligible[0];
            let mut best_value = evaluate_hand(
                table.seats[best_idx]
                    .hole
                    .ok_or_else(|| HoldemError::InconsistentState("eligible seat has no hole cards".into()))?,
                &table.community,
            );
            let mut winners = vec![best_idx];
            for &i in &eligible[1..] {
                let value = evaluate_hand(
                    table.seats[i]
                        .hole
                        .ok_or_else(|| HoldemError::InconsistentState("eligible seat has no hole cards".into()))?,
                    &table.community,
                );
                match compare_hands(value, best_value) {
                    std::cmp::Ordering::Greater => {
                        best_value = value;
                        best_idx = i;
                        winners = vec![i];
                    }
                    std::cmp::Ordering::Equal => winners.push(i),
                    std::cmp::Ordering::Less => {}
                }
            }
            winners
        } else {
            eligible.clone()
        };

        let share = pot / winners.len() as u32;
        let remainder = pot - share * winners.len() as u32;
        for &w in &winners {
            winnings[w] += share;
            total_winners.insert(table.seats[w].id.clone());
        }

        if remainder > 0 {
            let dealer = table.dealer.unwrap_or(0);
            let clockwise: Vec<usize> = (1..=table.seats.len())
                .map(|step| (dealer + step) % table.seats.len())
                .filter(|i| winners.contains(i))
                .collect();
            for &w in clockwise.iter().take(remainder as usize) {
                winnings[w] += 1;
            }
        }
    }

    let distributed: u32 = winnings.iter().sum();
    if distributed != table.round.round_volume {
        return Err(HoldemError::InconsistentState(format!(
            "pot distribution {distributed} does not match round volume {}",
            table.round.round_volume
        )));
    }

    for (i, seat) in table.seats.iter_mut().enumerate() {
        seat.chips += winnings[i];
        seat.bet.street_amount = 0;
        seat.bet.round_volume = 0;
        seat.status = if seat.chips > 0 {
            SeatStatus::Playing
        } else {
            SeatStatus::Eliminated
        };
    }

    table.last_round_result = Some(RoundResult {
        round_number: table.round.number,
        winner_ids: total_winners.into_iter().collect(),
        pot: distributed,
    });
    table.phase.street = Street::Showdown;
    table.actor = None;
    let sole_survivor = table.seats.iter().filter(|s| s.chips > 0).count() <= 1;
    let hit_round_cap = table
        .config
        .max_rounds
        .is_some_and(|max| table.round.number >= max);
    table.status = if sole_survivor || hit_round_cap {
        TableStatus::GameOver
    } else {
        TableStatus::RoundOver
    };
    Ok(())
}
