//! Pairs incoming connections into two-seat rooms.
//
//  A single "open" room is offered until both its seats are reserved;
//  the next connection then gets a brand-new room.

use std::sync::Mutex;

use once_cell::sync::Lazy;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    error::RoomError,
    game::{
        room::{self, RoomHandle},
        world::MAX_PLAYERS,
    },
    protocol::ServerMsg,
};

/// Room still taking players, with the number of seats handed out.
static OPEN_ROOM: Lazy<Mutex<Option<(RoomHandle, usize)>>> = Lazy::new(|| Mutex::new(None));

const JOIN_ATTEMPTS: usize = 3;

/// Reserve a seat, opening a room if none is waiting.
fn assign() -> RoomHandle {
    let mut open = OPEN_ROOM.lock().unwrap_or_else(|e| e.into_inner());

    if let Some((room, seats)) = open.take() {
        if !room.is_closed() {
            if seats + 1 < MAX_PLAYERS {
                *open = Some((room.clone(), seats + 1));
            }
            return room;
        }
    }

    let room = room::spawn();
    if MAX_PLAYERS > 1 {
        *open = Some((room.clone(), 1));
    }
    room
}

/// Stop offering `room_id`.
fn forget(room_id: Uuid) {
    let mut open = OPEN_ROOM.lock().unwrap_or_else(|e| e.into_inner());
    if open.as_ref().is_some_and(|(r, _)| r.id == room_id) {
        *open = None;
    }
}

/// Place a player in a room and return it together with the `JoinAck`.
pub async fn join(
    player_id: Uuid,
    name: String,
    outbound: mpsc::Sender<String>,
) -> Result<(RoomHandle, ServerMsg), RoomError> {
    let mut last_err = RoomError::RoomClosed;
    for _ in 0..JOIN_ATTEMPTS {
        let room = assign();
        match room.join(player_id, name.clone(), outbound.clone()).await {
            Ok(ack) => return Ok((room, ack)),
            Err(e @ RoomError::AlreadyJoined) => return Err(e),
            Err(e) => {
                log::warn!("room {} refused {player_id}: {e}, retrying", room.id);
                forget(room.id);
                last_err = e;
            }
        }
    }
    Err(last_err)
}
