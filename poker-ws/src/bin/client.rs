use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::connect_async;

#[tokio::main]
async fn main() {
    let url = std::env::args().nth(1).unwrap_or_else(|| "ws://127.0.0.1:8080/ws".to_string());
    // modes: host <client_id> | join <client_id> <room_id> | leave <client_id> <room_id> | start <client_id> <room_id>
    let mode = std::env::args().nth(2).unwrap_or_else(|| "host".to_string());
    let client_id = std::env::args().nth(3).unwrap_or_else(|| format!("c-{}", std::process::id()));
    let room_arg = std::env::args().nth(4);
    let (mut ws, _resp) = connect_async(url.as_str()).await.expect("connect");
    let mut room_id: Option<String> = None;
    match mode.as_str() {
        "host" => {
            let create = serde_json::json!({
                "type": "create_room",
                "table_id": null,
                "config": null,
                "client_msg_id": client_id
            });
            ws.send(tokio_tungstenite::tungstenite::Message::Text(create.to_string())).await.unwrap();
        }
        "join" => {
            let rid = room_arg.expect("room_id required for join");
            room_id = Some(rid.clone());
            let join = serde_json::json!({"type":"join_room","table_id":rid,"client_msg_id":client_id});
            ws.send(tokio_tungstenite::tungstenite::Message::Text(join.to_string())).await.unwrap();
        }
        "leave" => {
            let rid = room_arg.expect("room_id required for leave");
            room_id = Some(rid.clone());
            let leave = serde_json::json!({"type":"leave_room","table_id":rid,"client_msg_id":client_id});
            ws.send(tokio_tungstenite::tungstenite::Message::Text(leave.to_string())).await.unwrap();
        }
        "start" => {
            let rid = room_arg.expect("room_id required for start");
            room_id = Some(rid.clone());
            let start = serde_json::json!({"type":"start_room","table_id":rid,"client_msg_id":client_id});
            ws.send(tokio_tungstenite::tungstenite::Message::Text(start.to_string())).await.unwrap();
        }
        _ => {}
    }

    // read loop; when room_created arrives, remember the table id so later
    // modes invoked from the same process could reuse it
    let mut reads = 0;
    while reads < 100 {
        if let Some(msg) = ws.next().await {
            let txt = msg.unwrap().to_string();
            println!("<- {}", txt);
            if let Ok(v) = serde_json::from_str::<Value>(&txt) {
                if v.get("type").and_then(|t| t.as_str()) == Some("room_created") {
                    if let Some(tid) = v.get("table_id").and_then(|x| x.as_str()) {
                        room_id = Some(tid.to_string());
                    }
                }
            }
        }
        reads += 1;
    }
    let _ = room_id;
}


