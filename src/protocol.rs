//! Wire protocol shared by client, WS handler and room actor.

use crate::game::{
    commands::Command,
    types::{Entity, PlayerId, PlayerState},
};
use serde::{Deserialize, Serialize};

// ---------- client → server ----------
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Change the display name shown to the opponent.
    Login { name: String },
    Command(Command),
}

// ---------- server → client ----------
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMsg {
    /// Sent once on a successful join.
    JoinAck {
        player_id: PlayerId,
        map_width: f32,
        map_height: f32,
    },
    /// Full snapshot, broadcast every tick.
    StateUpdate {
        entities: Vec<Entity>,
        players: Vec<PlayerState>,
        server_time: i64,
    },
    /// Sent once when a single base remains.
    GameOver { winner_id: PlayerId },
}
