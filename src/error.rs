//! Errors crossing the room actor boundary and the wire.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("room already seats two players")]
    RoomFull,
    #[error("player already joined this room")]
    AlreadyJoined,
    #[error("match in this room has already ended")]
    MatchOver,
    #[error("room actor has shut down")]
    RoomClosed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown card type {0:?}")]
pub struct UnknownCardKind(pub String);
