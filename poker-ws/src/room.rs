//! The room actor: a single task owns the authoritative [`Table`] and
//! processes one command at a time from an unbounded channel, the same
//! single-writer shape the rest of this workspace uses for the table
//! itself, just pushed out to the async boundary. Every accepted command
//! or system event replaces the table wholesale via a `holdem_engine`
//! transition and republishes the result; nothing ever mutates the table
//! in place.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, RwLock};
use tokio::task::AbortHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use holdem_engine::{
    add_seat, end_game, next_round, process_move, remove_seat, restart_table, start_round,
    Config, HoldemError, Move, Table, TableStatus,
};

enum Command {
    Join {
        seat_id: String,
        name: String,
        reply: oneshot::Sender<Result<(), HoldemError>>,
    },
    Leave {
        seat_id: String,
        reply: oneshot::Sender<Result<(), HoldemError>>,
    },
    Action {
        seat_id: String,
        mv: Move,
        /// Free-form rationale an autonomous player attaches to its own move;
        /// the core never sees it, it only exists for the room's own logs.
        decision_context: Option<String>,
        reply: oneshot::Sender<Result<(), HoldemError>>,
    },
    Start {
        reply: oneshot::Sender<Result<(), HoldemError>>,
    },
    NextRound {
        reply: oneshot::Sender<Result<(), HoldemError>>,
    },
    AutoRestart {
        reply: oneshot::Sender<Result<(), HoldemError>>,
    },
    EndGame {
        reply: oneshot::Sender<Result<(), HoldemError>>,
    },
}

/// A transition the room drives itself, with no client originator: dealing
/// in once enough seats are filled, dealing the next hand after a showdown,
/// and resetting stacks once a game has a sole survivor.
enum SystemEvent {
    Start,
    NextRound,
    AutoRestart,
}

enum ActorMsg {
    Command(Command),
    /// Tagged with the generation it was scheduled under; a superseded
    /// timer's message is dropped even if it lands after cancellation.
    System(SystemEvent, u64),
}

/// A cheaply-cloned handle to a running room. Every websocket connection
/// for a table holds one of these rather than touching the table directly.
#[derive(Clone)]
pub struct RoomHandle {
    tx: mpsc::UnboundedSender<ActorMsg>,
    updates: broadcast::Sender<Table>,
    snapshot: Arc<RwLock<Table>>,
}

impl RoomHandle {
    pub async fn join(
        &self,
        seat_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<(), HoldemError> {
        let seat_id = seat_id.into();
        let name = name.into();
        self.call(|reply| ActorMsg::Command(Command::Join { seat_id, name, reply }))
            .await
    }

    pub async fn leave(&self, seat_id: impl Into<String>) -> Result<(), HoldemError> {
        let seat_id = seat_id.into();
        self.call(|reply| ActorMsg::Command(Command::Leave { seat_id, reply }))
            .await
    }

    pub async fn act(&self, seat_id: impl Into<String>, mv: Move) -> Result<(), HoldemError> {
        self.act_with_context(seat_id, mv, None).await
    }

    /// Same as [`RoomHandle::act`], but carries an optional rationale string
    /// an autonomous player attaches to its own move (spec's `decision_context`).
    pub async fn act_with_context(
        &self,
        seat_id: impl Into<String>,
        mv: Move,
        decision_context: Option<String>,
    ) -> Result<(), HoldemError> {
        let seat_id = seat_id.into();
        self.call(|reply| {
            ActorMsg::Command(Command::Action {
                seat_id,
                mv,
                decision_context,
                reply,
            })
        })
        .await
    }

    pub async fn start(&self) -> Result<(), HoldemError> {
        self.call(|reply| ActorMsg::Command(Command::Start { reply }))
            .await
    }

    /// Deals the next hand directly, same as the scheduler's own
    /// `RoundOver` -> `NextRound` system event, but callable by the
    /// originator rather than only waiting out `round_over_delay_ms`.
    pub async fn next_round(&self) -> Result<(), HoldemError> {
        self.call(|reply| ActorMsg::Command(Command::NextRound { reply }))
            .await
    }

    /// Resets a `GameOver` table back to `Waiting` directly, same as the
    /// scheduler's own `GameOver` -> `AutoRestart` system event.
    pub async fn auto_restart(&self) -> Result<(), HoldemError> {
        self.call(|reply| ActorMsg::Command(Command::AutoRestart { reply }))
            .await
    }

    pub async fn end_game(&self) -> Result<(), HoldemError> {
        self.call(|reply| ActorMsg::Command(Command::EndGame { reply }))
            .await
    }

    /// A read-only snapshot of the authoritative table, for a subscriber
    /// that just connected and has not seen a broadcast yet.
    pub async fn current_state(&self) -> Table {
        self.snapshot.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.updates.subscribe()
    }

    async fn call(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<(), HoldemError>>) -> ActorMsg,
    ) -> Result<(), HoldemError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(build(reply_tx)).map_err(|_| {
            HoldemError::InconsistentState("room actor has shut down".into())
        })?;
        reply_rx.await.map_err(|_| {
            HoldemError::InconsistentState("room actor dropped the reply channel".into())
        })?
    }
}

struct RoomActor {
    table: Table,
    rx: mpsc::UnboundedReceiver<ActorMsg>,
    tx: mpsc::UnboundedSender<ActorMsg>,
    updates: broadcast::Sender<Table>,
    snapshot: Arc<RwLock<Table>>,
    generation: u64,
    pending: Option<AbortHandle>,
}

/// Spawns a room actor for a fresh table and returns a handle to it. The
/// room starts empty (`Waiting`) and schedules nothing until seats fill.
pub fn spawn_room(id: impl Into<String>, config: Config) -> RoomHandle {
    let table = Table::new(id, config);
    let (tx, rx) = mpsc::unbounded_channel();
    let (updates, _) = broadcast::channel(64);
    let snapshot = Arc::new(RwLock::new(table.clone()));

    let handle = RoomHandle {
        tx: tx.clone(),
        updates: updates.clone(),
        snapshot: snapshot.clone(),
    };

    let actor = RoomActor {
        table,
        rx,
        tx,
        updates,
        snapshot,
        generation: 0,
        pending: None,
    };
    tokio::spawn(actor.run());
    handle
}

impl RoomActor {
    async fn run(mut self) {
        self.after_transition();
        while let Some(msg) = self.rx.recv().await {
            match msg {
                ActorMsg::Command(cmd) => self.handle_command(cmd).await,
                ActorMsg::System(event, generation) => {
                    if generation == self.generation {
                        self.handle_system(event).await;
                    }
                }
            }
        }
    }

    async fn publish(&mut self) {
        *self.snapshot.write().await = self.table.clone();
        let _ = self.updates.send(self.table.clone());
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn schedule(&mut self, delay_ms: u64, event: SystemEvent) {
        self.cancel_pending();
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();
        let join = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let _ = tx.send(ActorMsg::System(event, generation));
        });
        self.pending = Some(join.abort_handle());
    }

    fn chip_bearing_count(&self) -> usize {
        self.table.seats.iter().filter(|s| s.chips > 0).count()
    }

    /// Decides what, if anything, the room should do to itself next. Called
    /// after every accepted command and system event, so it is the single
    /// place that schedules (or cancels) a pending timer.
    fn after_transition(&mut self) {
        let config = self.table.config.clone();
        match self.table.status {
            TableStatus::Waiting
                if config.auto_start_enabled
                    && self.chip_bearing_count() >= config.min_players =>
            {
                self.schedule(config.start_delay_ms, SystemEvent::Start);
            }
            TableStatus::RoundOver => {
                self.schedule(config.round_over_delay_ms, SystemEvent::NextRound);
            }
            TableStatus::GameOver if config.auto_restart_enabled => {
                self.schedule(config.auto_restart_delay_ms, SystemEvent::AutoRestart);
            }
            _ => self.cancel_pending(),
        }
    }

    fn apply(&mut self, result: Result<Table, HoldemError>) -> Result<(), HoldemError> {
        let next = result?;
        self.table = next;
        Ok(())
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Join { seat_id, name, reply } => {
                // Reconnecting with an id already at the table is a no-op,
                // not an error: the client may retry a join after a dropped
                // connection without needing to track whether it landed.
                let outcome = if self.table.seats.iter().any(|s| s.id == seat_id) {
                    Ok(())
                } else {
                    self.apply(add_seat(&self.table, &seat_id, &name))
                };
                self.finish(outcome, reply).await;
            }
            Command::Leave { seat_id, reply } => {
                let outcome = self.apply(remove_seat(&self.table, &seat_id));
                self.finish(outcome, reply).await;
            }
            Command::Action { seat_id, mv, decision_context, reply } => {
                if let Some(context) = decision_context {
                    info!(room_id = %self.table.id, seat_id = %seat_id, ?mv, context, "decision_context");
                }
                let outcome = self.apply(process_move(&self.table, &seat_id, mv));
                self.finish(outcome, reply).await;
            }
            Command::Start { reply } => {
                let outcome = self.apply(start_round(&self.table));
                self.finish(outcome, reply).await;
            }
            Command::NextRound { reply } => {
                let outcome = self.apply(next_round(&self.table));
                self.finish(outcome, reply).await;
            }
            Command::AutoRestart { reply } => {
                let outcome = self.apply(restart_table(&self.table));
                self.finish(outcome, reply).await;
            }
            Command::EndGame { reply } => {
                let outcome = self.apply(end_game(&self.table));
                self.finish(outcome, reply).await;
            }
        }
    }

    async fn finish(
        &mut self,
        outcome: Result<(), HoldemError>,
        reply: oneshot::Sender<Result<(), HoldemError>>,
    ) {
        if outcome.is_ok() {
            self.publish().await;
            self.after_transition();
        }
        let _ = reply.send(outcome);
    }

    async fn handle_system(&mut self, event: SystemEvent) {
        let outcome = match event {
            SystemEvent::Start => self.apply(start_round(&self.table)),
            SystemEvent::NextRound => self.apply(next_round(&self.table)),
            SystemEvent::AutoRestart => self.apply(restart_table(&self.table)),
        };
        match outcome {
            Ok(()) => self.publish().await,
            Err(err) => warn!(room_id = %self.table.id, ?err, "scheduled system event did not apply"),
        }
        self.after_transition();
    }
}
