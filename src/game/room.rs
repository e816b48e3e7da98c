//! One async task per live match.
//!
//! The task owns its `World` outright. Connections talk to it through a
//! bounded queue that is drained once per tick, then the world advances and
//! the snapshot goes out to every seated player.

use crate::{
    auth,
    config::settings,
    error::RoomError,
    game::{
        commands::{self, Command},
        types::PlayerId,
        world::World,
    },
    metrics,
    protocol::{ClientMsg, ServerMsg},
};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tokio::{
    sync::{
        mpsc::{self, error::TryRecvError},
        oneshot,
    },
    time::{interval, Duration, Instant, MissedTickBehavior},
};
use uuid::Uuid;

/// Live rooms: room_id → handle.
pub static ROOMS: Lazy<DashMap<Uuid, RoomHandle>> = Lazy::new(DashMap::new);

/// A room nobody ever sat down in is reclaimed after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum RoomMsg {
    Join {
        player_id: PlayerId,
        name: String,
        outbound: mpsc::Sender<String>,
        reply: oneshot::Sender<Result<ServerMsg, RoomError>>,
    },
    Client {
        player_id: PlayerId,
        msg: ClientMsg,
    },
    Leave {
        player_id: PlayerId,
    },
}

#[derive(Debug, Clone)]
pub struct RoomHandle {
    pub id: Uuid,
    tx: mpsc::Sender<RoomMsg>,
}

impl RoomHandle {
    /// Seat a player. `outbound` receives every serialized server message.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        outbound: mpsc::Sender<String>,
    ) -> Result<ServerMsg, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RoomMsg::Join {
                player_id,
                name,
                outbound,
                reply,
            })
            .await
            .map_err(|_| RoomError::RoomClosed)?;
        rx.await.map_err(|_| RoomError::RoomClosed)?
    }

    pub async fn send(&self, player_id: PlayerId, msg: ClientMsg) -> Result<(), RoomError> {
        self.tx
            .send(RoomMsg::Client { player_id, msg })
            .await
            .map_err(|_| RoomError::RoomClosed)
    }

    pub async fn command(&self, player_id: PlayerId, command: Command) -> Result<(), RoomError> {
        self.send(player_id, ClientMsg::Command(command)).await
    }

    pub async fn leave(&self, player_id: PlayerId) {
        if self.tx.send(RoomMsg::Leave { player_id }).await.is_err() {
            log::debug!("room {} already gone when {player_id} left", self.id);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Start a fresh room task and register it.
pub fn spawn() -> RoomHandle {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel::<RoomMsg>(256);
    let handle = RoomHandle { id, tx };

    ROOMS.insert(id, handle.clone());
    metrics::ROOMS_ACTIVE.inc();
    log::info!("room {id} opened");

    tokio::spawn(run(id, rx));
    handle
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

struct Room {
    id: Uuid,
    world: World,
    sessions: HashMap<PlayerId, mpsc::Sender<String>>,
    seated_once: bool,
}

impl Room {
    fn handle(&mut self, msg: RoomMsg) {
        match msg {
            RoomMsg::Join {
                player_id,
                name,
                outbound,
                reply,
            } => {
                let s = settings();
                let res = self
                    .world
                    .join(player_id, name, s.start_memory, s.start_cpu)
                    .map(|_| {
                        self.sessions.insert(player_id, outbound);
                        self.seated_once = true;
                        log::info!("{player_id} joined room {}", self.id);
                        ServerMsg::JoinAck {
                            player_id,
                            map_width: self.world.map_width,
                            map_height: self.world.map_height,
                        }
                    });
                if let Err(e) = &res {
                    log::info!("join of {player_id} to room {} refused: {e}", self.id);
                }
                let _ = reply.send(res);
            }

            RoomMsg::Client { player_id, msg } => {
                if !self.sessions.contains_key(&player_id) {
                    return;
                }
                match msg {
                    ClientMsg::Command(cmd) => {
                        commands::handle_command(&mut self.world, player_id, &cmd)
                    }
                    ClientMsg::Login { name } => {
                        // Blank or overlong names keep the current one.
                        if let (Some(p), Some(name)) = (
                            self.world.players.get_mut(&player_id),
                            auth::normalize_name(&name),
                        ) {
                            p.name = name;
                        }
                    }
                }
            }

            RoomMsg::Leave { player_id } => {
                if self.sessions.remove(&player_id).is_some() {
                    self.world.remove_player(player_id);
                    log::info!("{player_id} left room {}", self.id);
                }
            }
        }
    }

    fn broadcast(&self, msg: &ServerMsg) {
        let json = match serde_json::to_string(msg) {
            Ok(j) => j,
            Err(e) => {
                log::error!("room {} failed to serialize broadcast: {e}", self.id);
                return;
            }
        };
        for (pid, tx) in &self.sessions {
            if let Err(e) = tx.try_send(json.clone()) {
                metrics::BROADCAST_DROPS.inc();
                log::debug!("dropping frame for {pid}: {e}");
            }
        }
    }

    fn snapshot(&self, server_time: i64) -> ServerMsg {
        ServerMsg::StateUpdate {
            entities: self.world.entities.values().cloned().collect(),
            players: self.world.players.values().cloned().collect(),
            server_time,
        }
    }
}

async fn run(id: Uuid, mut rx: mpsc::Receiver<RoomMsg>) {
    let s = settings();
    let mut room = Room {
        id,
        world: World::new(s.map_width, s.map_height),
        sessions: HashMap::new(),
        seated_once: false,
    };

    let mut ticker = interval(Duration::from_secs_f64(1.0 / f64::from(s.tick_rate)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let opened = Instant::now();
    let mut last = Instant::now();

    loop {
        ticker.tick().await;

        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(msg) => room.handle(msg),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if room.sessions.is_empty()
            && (disconnected || room.seated_once || opened.elapsed() >= IDLE_TIMEOUT)
        {
            break;
        }

        let started = Instant::now();
        let delta = started.duration_since(last).as_secs_f32();
        last = started;
        let now = now_ms();

        room.world.tick(now, delta);

        metrics::TICKS.inc();
        metrics::TICK_SECONDS.observe(started.elapsed().as_secs_f64());
        metrics::ENTITIES.set(room.world.entities.len() as i64);

        if let Some(winner_id) = room.world.take_game_over() {
            log::info!("room {id} over, winner {winner_id}");
            room.broadcast(&ServerMsg::GameOver { winner_id });
        }
        room.broadcast(&room.snapshot(now));
    }

    // Close the queue before deregistering so matchmaking sees the room as gone.
    rx.close();
    ROOMS.remove(&id);
    metrics::ROOMS_ACTIVE.dec();
    log::info!("room {id} closed");
}
