pub mod abilities;
pub mod ai;
pub mod combat;
pub mod commands;
pub mod deck;
pub mod room;
pub mod stats;
pub mod status;
pub mod types;
pub mod world;
