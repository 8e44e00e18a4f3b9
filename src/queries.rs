//! Pure, read-only helpers over a [`Table`]: locating seats, rotation order,
//! and the per-seat projections exposed to external callers.

use crate::model::{OpponentView, PlayerView, Position, Seat, SeatStatus, Street, Table};

pub fn seat_index(table: &Table, seat_id: &str) -> Option<usize> {
    table.seats.iter().position(|s| s.id == seat_id)
}

pub fn seat_id_at(table: &Table, index: usize) -> Option<String> {
    table.seats.get(index).map(|s| s.id.clone())
}

/// Seats still part of the roster for rotation purposes: anyone not
/// Eliminated. Folded/AllIn seats still occupy a clockwise slot.
pub fn rostered_seats(table: &Table) -> Vec<usize> {
    (0..table.seats.len())
        .filter(|&i| table.seats[i].status != SeatStatus::Eliminated)
        .collect()
}

/// Seats eligible to be dealt into a new hand (chips > 0).
pub fn chip_bearing_seats(table: &Table) -> Vec<usize> {
    (0..table.seats.len())
        .filter(|&i| table.seats[i].chips > 0)
        .collect()
}

/// Walks clockwise from `from` (exclusive) and returns the first seat index
/// satisfying `pred`, skipping Eliminated seats entirely. Returns `None` if
/// no seat in the roster satisfies `pred`.
pub fn next_matching(table: &Table, from: usize, pred: impl Fn(&Seat) -> bool) -> Option<usize> {
    let n = table.seats.len();
    if n == 0 {
        return None;
    }
    for step in 1..=n {
        let idx = (from + step) % n;
        let seat = &table.seats[idx];
        if seat.status == SeatStatus::Eliminated {
            continue;
        }
        if pred(seat) {
            return Some(idx);
        }
    }
    None
}

pub fn next_rostered(table: &Table, from: usize) -> Option<usize> {
    next_matching(table, from, |_| true)
}

/// Assigns position labels radiating out from the dealer for the active
/// roster. Heads-up collapses BTN and SB onto the dealer seat.
pub fn assign_positions(seats: &mut [Seat], dealer: usize, active: &[usize]) {
    for seat in seats.iter_mut() {
        seat.position = None;
    }
    if active.len() < 2 {
        if let Some(&only) = active.first() {
            seats[only].position = Some(Position::Btn);
        }
        return;
    }

    let dealer_pos = active.iter().position(|&i| i == dealer).unwrap_or(0);
    let rotated: Vec<usize> = active
        .iter()
        .cycle()
        .skip(dealer_pos)
        .take(active.len())
        .copied()
        .collect();

    if active.len() == 2 {
        seats[rotated[0]].position = Some(Position::Sb);
        seats[rotated[1]].position = Some(Position::Bb);
        return;
    }

    let labels = [
        Position::Btn,
        Position::Sb,
        Position::Bb,
        Position::Ep,
        Position::Mp,
    ];
    for (offset, &idx) in rotated.iter().enumerate() {
        let label = labels.get(offset).copied().unwrap_or(Position::Co);
        seats[idx].position = Some(label);
    }
}

pub fn small_blind_index(table: &Table) -> Option<usize> {
    table
        .seats
        .iter()
        .position(|s| s.position == Some(Position::Sb))
}

pub fn big_blind_index(table: &Table) -> Option<usize> {
    table
        .seats
        .iter()
        .position(|s| s.position == Some(Position::Bb))
}

/// First-to-act rule (`first_player_index`): heads-up SB acts first
/// pre-flop and BB first post-flop; 3+ seats, UTG (3 seats clockwise from
/// the dealer) acts first pre-flop, and the first Playing seat at or after
/// the small blind acts first post-flop.
pub fn first_to_act(table: &Table) -> Option<usize> {
    let active: Vec<usize> = (0..table.seats.len())
        .filter(|&i| {
            matches!(
                table.seats[i].status,
                SeatStatus::Playing | SeatStatus::AllIn
            )
        })
        .collect();
    let playing: Vec<usize> = active
        .iter()
        .copied()
        .filter(|&i| table.seats[i].status == SeatStatus::Playing)
        .collect();
    if playing.is_empty() {
        return None;
    }
    let dealer = table.dealer?;

    if active.len() == 2 {
        return match table.phase.street {
            Street::PreFlop => Some(dealer).filter(|&d| playing.contains(&d)).or_else(|| {
                next_matching(table, dealer, |s| s.status == SeatStatus::Playing)
            }),
            _ => {
                let bb = big_blind_index(table)?;
                if playing.contains(&bb) {
                    Some(bb)
                } else {
                    next_matching(table, bb, |s| s.status == SeatStatus::Playing)
                }
            }
        };
    }

    match table.phase.street {
        Street::PreFlop => {
            let mut idx = dealer;
            for _ in 0..3 {
                idx = next_rostered(table, idx)?;
            }
            if table.seats[idx].status == SeatStatus::Playing {
                Some(idx)
            } else {
                next_matching(table, idx, |s| s.status == SeatStatus::Playing)
                    .or_else(|| Some(idx))
            }
        }
        _ => {
            let sb = small_blind_index(table).unwrap_or(dealer);
            if table.seats[sb].status == SeatStatus::Playing {
                Some(sb)
            } else {
                next_matching(table, sb, |s| s.status == SeatStatus::Playing).or(Some(sb))
            }
        }
    }
}

fn reveal_opponent_hand(table: &Table, seat: &Seat) -> bool {
    if seat.status == SeatStatus::Eliminated || seat.status == SeatStatus::Folded {
        return false;
    }
    let showdown_reached = matches!(table.status, crate::model::TableStatus::RoundOver)
        && table.community.len() == 5;
    let all_nonfolded_allin = table
        .seats
        .iter()
        .filter(|s| s.status != SeatStatus::Folded && s.status != SeatStatus::Eliminated)
        .all(|s| s.status == SeatStatus::AllIn);
    showdown_reached || all_nonfolded_allin
}

/// Builds the per-seat projection: own hole cards always visible, opponent
/// hole cards hidden unless a showdown or all-in reveal condition holds.
pub fn player_view(table: &Table, seat_id: &str) -> Option<PlayerView> {
    let own_idx = seat_index(table, seat_id)?;
    let own_seat = table.seats[own_idx].clone();

    let opponents = table
        .seats
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != own_idx)
        .map(|(_, seat)| OpponentView {
            id: seat.id.clone(),
            name: seat.name.clone(),
            status: seat.status,
            chips: seat.chips,
            bet: seat.bet,
            hand: if reveal_opponent_hand(table, seat) {
                seat.hole
            } else {
                None
            },
        })
        .collect();

    Some(PlayerView {
        table_id: table.id.clone(),
        status: table.status,
        dealer_id: table.dealer.and_then(|i| seat_id_at(table, i)),
        small_blind_id: small_blind_index(table).and_then(|i| seat_id_at(table, i)),
        big_blind_id: big_blind_index(table).and_then(|i| seat_id_at(table, i)),
        actor_id: table.actor.and_then(|i| seat_id_at(table, i)),
        phase: table.phase,
        round: table.round,
        community: table.community.clone(),
        own_hole: own_seat.hole,
        own_seat,
        opponents,
        last_round_result: table.last_round_result.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Config, Table};

    fn table_with_seats(n: usize) -> Table {
        let mut table = Table::new("t1", Config::default());
        for i in 0..n {
            table
                .seats
                .push(Seat::new(format!("p{i}"), format!("Player {i}"), 1000));
        }
        table
    }

    #[test]
    fn heads_up_positions_collapse_dealer_to_small_blind() {
        let mut table = table_with_seats(2);
        table.dealer = Some(0);
        let active = chip_bearing_seats(&table);
        assign_positions(&mut table.seats, 0, &active);
        assert_eq!(table.seats[0].position, Some(Position::Sb));
        assert_eq!(table.seats[1].position, Some(Position::Bb));
    }

    #[test]
    fn three_seat_positions_assign_btn_sb_bb() {
        let mut table = table_with_seats(3);
        table.dealer = Some(1);
        let active = chip_bearing_seats(&table);
        assign_positions(&mut table.seats, 1, &active);
        assert_eq!(table.seats[1].position, Some(Position::Btn));
        assert_eq!(table.seats[2].position, Some(Position::Sb));
        assert_eq!(table.seats[0].position, Some(Position::Bb));
    }
}
