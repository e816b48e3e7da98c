//! Inbound player commands: Move, Build and PlayCard.
//!
//! Unauthorised or unaffordable requests are silent no-ops; a rejected card
//! play goes back to the hand.

use crate::game::{
    deck,
    types::{CardId, CardKind, Entity, EntityId, EntityKind, PlayerId, UnitType},
    world::World,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const FACTORY_MEMORY_COST: i32 = 100;
pub const FACTORY_UNIT_CPU_COST: i32 = 50;
pub const FACTORY_UNIT_HP: i32 = 50;
pub const FACTORY_UNIT_SPEED: f32 = 120.0;
pub const MAX_SPAWN_DISTANCE: f32 = 200.0;
/// Seconds between two card plays.
pub const GLOBAL_COOLDOWN: f32 = 1.5;
const FACTORY_SCATTER: f32 = 30.0;
const FACTORY_UNIT_OFFSET: f32 = 20.0;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Move,
    /// Accepted on the wire, no behaviour.
    Attack,
    Build,
    /// Accepted on the wire, no behaviour.
    Capture,
    PlayCard,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub command_type: CommandType,
    #[serde(default)]
    pub entity_id: Option<EntityId>,
    #[serde(default)]
    pub target_x: f32,
    #[serde(default)]
    pub target_y: f32,
    #[serde(default)]
    pub card_id: Option<CardId>,
}

/// Apply a command issued by `player_id`.
pub fn handle_command(world: &mut World, player_id: PlayerId, cmd: &Command) {
    if world.is_over() {
        return;
    }
    match cmd.command_type {
        CommandType::Move => {
            if let Some(id) = cmd.entity_id {
                move_entity(world, player_id, id, cmd.target_x, cmd.target_y);
            }
        }
        CommandType::Build => {
            if let Some(id) = cmd.entity_id {
                build(world, player_id, id);
            }
        }
        CommandType::PlayCard => {
            if let Some(card_id) = cmd.card_id {
                play_card(world, player_id, card_id, cmd.target_x, cmd.target_y);
            }
        }
        CommandType::Attack | CommandType::Capture => {}
    }
}

fn move_entity(world: &mut World, player_id: PlayerId, id: EntityId, x: f32, y: f32) {
    match world.entities.get_mut(&id) {
        Some(e) if e.owner_id == Some(player_id) => {
            e.target_x = Some(x);
            e.target_y = Some(y);
        }
        _ => log::debug!("ignoring move of {id} by {player_id}"),
    }
}

fn build(world: &mut World, player_id: PlayerId, source_id: EntityId) {
    let Some((kind, sx, sy)) = world
        .entities
        .get(&source_id)
        .filter(|e| e.owner_id == Some(player_id))
        .map(|e| (e.kind, e.x, e.y))
    else {
        return;
    };
    let Some(player) = world.players.get_mut(&player_id) else {
        return;
    };

    match kind {
        EntityKind::Instance if player.memory >= FACTORY_MEMORY_COST => {
            player.memory -= FACTORY_MEMORY_COST;
            let mut rng = rand::rng();
            let x = sx + rng.random_range(-FACTORY_SCATTER..FACTORY_SCATTER);
            let y = sy + rng.random_range(-FACTORY_SCATTER..FACTORY_SCATTER);
            world.insert(Entity::factory(player_id, x, y));
        }
        EntityKind::Factory if player.cpu >= FACTORY_UNIT_CPU_COST => {
            player.cpu -= FACTORY_UNIT_CPU_COST;
            let mut unit = Entity::unit(
                player_id,
                UnitType::BasicProcess,
                sx + FACTORY_UNIT_OFFSET,
                sy + FACTORY_UNIT_OFFSET,
            );
            unit.max_hp = FACTORY_UNIT_HP;
            unit.hp = FACTORY_UNIT_HP;
            unit.speed = FACTORY_UNIT_SPEED;
            world.insert(unit);
        }
        _ => {}
    }
}

fn play_card(world: &mut World, player_id: PlayerId, card_id: CardId, x: f32, y: f32) {
    let base = world.base_of(player_id).map(|b| (b.x, b.y));
    let Some(player) = world.players.get_mut(&player_id) else {
        return;
    };
    let Some(card) = deck::play_card(player, card_id) else {
        return;
    };

    if player.global_cooldown > 0.0 {
        log::debug!("{player_id} played {card_id} on cooldown");
        deck::refund_card(player, card);
        return;
    }
    if let Some((bx, by)) = base {
        let (dx, dy) = (x - bx, y - by);
        if dx * dx + dy * dy > MAX_SPAWN_DISTANCE * MAX_SPAWN_DISTANCE {
            log::debug!("{player_id} spawn point too far from base");
            deck::refund_card(player, card);
            return;
        }
    }
    if !player.can_afford(&card) {
        deck::refund_card(player, card);
        return;
    }

    player.memory -= card.memory_cost;
    player.cpu -= card.cpu_cost;
    player.global_cooldown = GLOBAL_COOLDOWN;

    match card.kind {
        CardKind::Spawn(unit_type) => {
            world.spawn_unit(player_id, unit_type, x, y);
        }
        CardKind::BuildFactory => {
            world.insert(Entity::factory(player_id, x, y));
        }
    }

    if let Some(player) = world.players.get_mut(&player_id) {
        deck::draw_card(player);
    }
}
