use std::time::Duration;

use holdem_room::{spawn_room, Config, DeckSource, Move, TableStatus};

fn scenario_config(id: &str) -> Config {
    Config {
        min_players: 2,
        starting_chips: 1000,
        small_blind: 10,
        big_blind: 20,
        auto_start_enabled: false,
        auto_restart_enabled: false,
        deck_source: DeckSource::Scenario { id: id.into() },
        ..Config::default()
    }
}

#[tokio::test]
async fn heads_up_all_in_showdown_eliminates_the_loser() {
    let room = spawn_room("t1", scenario_config("PLAYER1_WINS"));
    room.join("alice", "Alice").await.unwrap();
    room.join("bob", "Bob").await.unwrap();
    room.start().await.unwrap();

    let table = room.current_state().await;
    let first = table.seats[table.actor.unwrap()].id.clone();
    room.act(&first, Move::AllIn).await.unwrap();
    let table = room.current_state().await;
    let second = table.seats[table.actor.unwrap()].id.clone();
    room.act(&second, Move::AllIn).await.unwrap();

    let table = room.current_state().await;
    assert_eq!(table.status, TableStatus::GameOver);
    let result = table.last_round_result.expect("round result recorded");
    assert_eq!(result.winner_ids, vec!["alice".to_string()]);
    assert_eq!(table.seats.iter().find(|s| s.id == "alice").unwrap().chips, 2000);
    assert_eq!(table.seats.iter().find(|s| s.id == "bob").unwrap().chips, 0);
}

#[tokio::test]
async fn round_over_auto_advances_to_the_next_hand() {
    tokio::time::pause();
    let mut config = scenario_config("PLAYER1_WINS");
    config.round_over_delay_ms = 20;
    let room = spawn_room("t1", config);
    room.join("alice", "Alice").await.unwrap();
    room.join("bob", "Bob").await.unwrap();
    room.start().await.unwrap();

    let table = room.current_state().await;
    let actor_id = table.seats[table.actor.unwrap()].id.clone();
    room.act(actor_id, Move::Fold).await.unwrap();
    assert_eq!(room.current_state().await.status, TableStatus::RoundOver);

    let mut updates = room.subscribe();
    tokio::time::advance(Duration::from_millis(50)).await;
    let mut table = updates.recv().await.unwrap();
    while table.status != TableStatus::Playing {
        table = updates.recv().await.unwrap();
    }
    assert_eq!(table.round.number, 2);
}

#[tokio::test]
async fn leaving_seat_after_round_over_is_accepted() {
    let mut config = scenario_config("PLAYER1_WINS");
    config.round_over_delay_ms = 60_000;
    let room = spawn_room("t1", config);
    room.join("alice", "Alice").await.unwrap();
    room.join("bob", "Bob").await.unwrap();
    room.start().await.unwrap();

    let table = room.current_state().await;
    let actor_id = table.seats[table.actor.unwrap()].id.clone();
    room.act(actor_id, Move::Fold).await.unwrap();
    assert_eq!(room.current_state().await.status, TableStatus::RoundOver);

    room.leave("bob").await.unwrap();
    let table = room.current_state().await;
    assert_eq!(table.seats.len(), 1);
}
