use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use holdem_engine::{player_view, Config, DeckSource, Move, PlayerView};
use holdem_room::{spawn_room, RoomHandle};

/// The wire-facing subset of [`Config`]: callers never pick a deck source
/// over the network, since `Scenario` decks exist for deterministic tests.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RoomConfig {
    small_blind: u32,
    big_blind: u32,
    starting_chips: u32,
    min_players: usize,
    auto_start_enabled: bool,
    start_delay_ms: u64,
    round_over_delay_ms: u64,
    auto_restart_enabled: bool,
    auto_restart_delay_ms: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        let d = Config::default();
        RoomConfig {
            small_blind: d.small_blind,
            big_blind: d.big_blind,
            starting_chips: d.starting_chips,
            min_players: d.min_players,
            auto_start_enabled: d.auto_start_enabled,
            start_delay_ms: d.start_delay_ms,
            round_over_delay_ms: d.round_over_delay_ms,
            auto_restart_enabled: d.auto_restart_enabled,
            auto_restart_delay_ms: d.auto_restart_delay_ms,
        }
    }
}

impl RoomConfig {
    fn into_engine_config(self) -> Config {
        Config {
            min_players: self.min_players,
            starting_chips: self.starting_chips,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            max_rounds: None,
            auto_start_enabled: self.auto_start_enabled,
            start_delay_ms: self.start_delay_ms,
            round_over_delay_ms: self.round_over_delay_ms,
            auto_restart_enabled: self.auto_restart_enabled,
            auto_restart_delay_ms: self.auto_restart_delay_ms,
            deck_source: DeckSource::Random { seed: None },
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientAction {
    CreateRoom {
        table_id: Option<String>,
        config: Option<RoomConfig>,
        client_msg_id: String,
    },
    JoinRoom {
        table_id: String,
        client_msg_id: String,
    },
    LeaveRoom {
        table_id: String,
        client_msg_id: String,
    },
    StartRoom {
        table_id: String,
        client_msg_id: String,
    },
    Action {
        table_id: String,
        mv: Move,
        /// An autonomous player's free-form rationale for this move; humans
        /// leave it unset. Never consulted by the engine, only logged.
        decision_context: Option<String>,
        client_msg_id: String,
    },
}

#[derive(Debug, Serialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerEvent {
    RoomCreated { table_id: String },
    PlayerJoined { table_id: String, client_msg_id: String },
    PlayerLeft { table_id: String, client_msg_id: String },
    State { table_id: String, view: PlayerView },
    Error { message: String },
}

type RoomMap = Arc<Mutex<HashMap<String, RoomHandle>>>;

async fn ws_handler(ws: WebSocketUpgrade, State(rooms): State<RoomMap>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, rooms))
}

fn send(tx: &mpsc::UnboundedSender<Message>, evt: &ServerEvent) {
    if let Ok(text) = serde_json::to_string(evt) {
        let _ = tx.send(Message::Text(text));
    }
}

async fn get_room(rooms: &RoomMap, table_id: &str) -> Option<RoomHandle> {
    rooms.lock().await.get(table_id).cloned()
}

/// Streams this connection's [`PlayerView`] on every table change, starting
/// with the current snapshot so a subscriber never waits on someone else's
/// move to see where the table already stands.
fn spawn_forwarder(
    room: RoomHandle,
    table_id: String,
    seat_id: String,
    out_tx: mpsc::UnboundedSender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut updates = room.subscribe();
        let initial = room.current_state().await;
        if let Some(view) = player_view(&initial, &seat_id) {
            send(&out_tx, &ServerEvent::State { table_id: table_id.clone(), view });
        }
        while let Ok(table) = updates.recv().await {
            if let Some(view) = player_view(&table, &seat_id) {
                send(&out_tx, &ServerEvent::State { table_id: table_id.clone(), view });
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, rooms: RoomMap) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();

    let writer = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut forwarder: Option<JoinHandle<()>> = None;

    while let Some(Ok(Message::Text(text))) = ws_rx.next().await {
        let Ok(cmd) = serde_json::from_str::<ClientAction>(&text) else {
            send(&out_tx, &ServerEvent::Error { message: "bad_json".into() });
            continue;
        };

        match cmd {
            ClientAction::CreateRoom { table_id, config, client_msg_id } => {
                let id = table_id.unwrap_or_else(|| format!("room-{client_msg_id}"));
                let engine_config = config.unwrap_or_default().into_engine_config();
                {
                    let mut map = rooms.lock().await;
                    map.entry(id.clone())
                        .or_insert_with(|| spawn_room(id.clone(), engine_config));
                }
                info!(table_id = %id, client_msg_id, "room_created");
                send(&out_tx, &ServerEvent::RoomCreated { table_id: id });
            }
            ClientAction::JoinRoom { table_id, client_msg_id } => {
                let Some(room) = get_room(&rooms, &table_id).await else {
                    send(&out_tx, &ServerEvent::Error { message: "no_such_room".into() });
                    continue;
                };
                match room.join(client_msg_id.clone(), client_msg_id.clone()).await {
                    Ok(()) => {
                        info!(table_id = %table_id, client_msg_id, "player_joined");
                        if let Some(old) = forwarder.take() {
                            old.abort();
                        }
                        forwarder = Some(spawn_forwarder(
                            room,
                            table_id.clone(),
                            client_msg_id.clone(),
                            out_tx.clone(),
                        ));
                        send(&out_tx, &ServerEvent::PlayerJoined { table_id, client_msg_id });
                    }
                    Err(err) => send(&out_tx, &ServerEvent::Error { message: err.to_string() }),
                }
            }
            ClientAction::LeaveRoom { table_id, client_msg_id } => {
                let Some(room) = get_room(&rooms, &table_id).await else {
                    continue;
                };
                match room.leave(client_msg_id.clone()).await {
                    Ok(()) => {
                        if let Some(handle) = forwarder.take() {
                            handle.abort();
                        }
                        send(&out_tx, &ServerEvent::PlayerLeft { table_id, client_msg_id });
                    }
                    Err(err) => send(&out_tx, &ServerEvent::Error { message: err.to_string() }),
                }
            }
            ClientAction::StartRoom { table_id, client_msg_id: _ } => {
                if let Some(room) = get_room(&rooms, &table_id).await {
                    if let Err(err) = room.start().await {
                        send(&out_tx, &ServerEvent::Error { message: err.to_string() });
                    }
                }
            }
            ClientAction::Action { table_id, mv, decision_context, client_msg_id } => {
                let Some(room) = get_room(&rooms, &table_id).await else {
                    continue;
                };
                info!(table_id = %table_id, client_msg_id, ?mv, "action_received");
                if let Err(err) = room.act_with_context(client_msg_id, mv, decision_context).await {
                    send(&out_tx, &ServerEvent::Error { message: err.to_string() });
                }
            }
        }
    }

    if let Some(handle) = forwarder {
        handle.abort();
    }
    let _ = writer.await;
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let rooms: RoomMap = Arc::new(Mutex::new(HashMap::new()));
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .nest_service("/", ServeDir::new("public"))
        .with_state(rooms);

    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
