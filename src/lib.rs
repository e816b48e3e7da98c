//! Authoritative match server for the two-player base-destruction game.

pub mod auth;
pub mod config;
pub mod error;
pub mod game;
pub mod http;
pub mod matchmaking;
pub mod metrics;
pub mod protocol;
pub mod ws;
