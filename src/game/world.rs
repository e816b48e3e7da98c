//! Match state and the per-tick orchestration of every subsystem.
//!
//! A `World` is owned by exactly one room actor, so nothing in here locks.
//! Entity references are ids into `entities` and are re-resolved on use.

use crate::{
    error::RoomError,
    game::{
        abilities, ai, combat, deck,
        status::INFECTION_DAMAGE,
        types::{
            EffectKind, Entity, EntityId, EntityKind, PlayerId, PlayerState, ResourceKind,
            UnitType,
        },
    },
};
use rand::Rng;
use std::collections::HashMap;

pub const MAX_PLAYERS: usize = 2;
pub const INCOME_INTERVAL_MS: i64 = 1000;
pub const PASSIVE_INCOME: i32 = 5;
pub const NODE_INCOME: i32 = 1;
pub const ALLOCATOR_INCOME: i32 = 2;
pub const CAPTURE_RADIUS: f32 = 30.0;
/// Structures snap onto their move target inside this distance.
const ARRIVE_EPSILON: f32 = 2.0;

#[derive(Debug)]
pub struct World {
    pub map_width: f32,
    pub map_height: f32,
    pub entities: HashMap<EntityId, Entity>,
    pub players: HashMap<PlayerId, PlayerState>,
    /// Units removed during the current tick, visible to later units.
    pub dead_this_tick: Vec<Entity>,
    last_income: Option<i64>,
    /// Both bases have existed at some point.
    started: bool,
    winner: Option<PlayerId>,
    game_over_pending: Option<PlayerId>,
}

impl World {
    /// An empty map without resource nodes.
    pub fn empty(map_width: f32, map_height: f32) -> Self {
        World {
            map_width,
            map_height,
            entities: HashMap::new(),
            players: HashMap::new(),
            dead_this_tick: Vec::new(),
            last_income: None,
            started: false,
            winner: None,
            game_over_pending: None,
        }
    }

    /// Standard map with the four neutral resource nodes.
    pub fn new(map_width: f32, map_height: f32) -> Self {
        let mut world = World::empty(map_width, map_height);
        world.insert(Entity::resource_node(ResourceKind::Memory, 100.0, 100.0));
        world.insert(Entity::resource_node(ResourceKind::Memory, 700.0, 500.0));
        world.insert(Entity::resource_node(ResourceKind::Cpu, 700.0, 100.0));
        world.insert(Entity::resource_node(ResourceKind::Cpu, 100.0, 500.0));
        world
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        id
    }

    pub fn spawn_unit(&mut self, owner: PlayerId, unit_type: UnitType, x: f32, y: f32) -> EntityId {
        self.insert(Entity::unit(owner, unit_type, x, y))
    }

    /// Seat a player: starting resources, shuffled deck, four cards, a base.
    pub fn join(
        &mut self,
        player_id: PlayerId,
        name: String,
        memory: i32,
        cpu: i32,
    ) -> Result<EntityId, RoomError> {
        if self.winner.is_some() {
            return Err(RoomError::MatchOver);
        }
        if self.players.contains_key(&player_id) {
            return Err(RoomError::AlreadyJoined);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RoomError::RoomFull);
        }

        let mut player = PlayerState::new(player_id, name, memory, cpu);
        player.deck = deck::default_deck();
        for _ in 0..deck::MAX_HAND {
            deck::draw_card(&mut player);
        }
        self.players.insert(player_id, player);

        let mut rng = rand::rng();
        let x = rng.random_range(0.0..self.map_width.max(1.0));
        let y = rng.random_range(0.0..self.map_height.max(1.0));
        let base = self.insert(Entity::instance(player_id, x, y));

        if self.bases().count() >= MAX_PLAYERS {
            self.started = true;
        }
        Ok(base)
    }

    /// Drop a player and, in the same step, everything they own.
    pub fn remove_player(&mut self, player_id: PlayerId) {
        if self.players.remove(&player_id).is_none() {
            return;
        }
        self.entities.retain(|_, e| e.owner_id != Some(player_id));

        // Leaving a running match forfeits it.
        if self.started {
            self.check_victory();
        }
    }

    pub fn bases(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .values()
            .filter(|e| e.kind == EntityKind::Instance)
    }

    pub fn base_of(&self, player_id: PlayerId) -> Option<&Entity> {
        self.bases().find(|e| e.owner_id == Some(player_id))
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Declare a winner when exactly one base is left. Fires at most once.
    pub fn check_victory(&mut self) {
        if self.winner.is_some() {
            return;
        }
        let survivor = {
            let mut bases = self.bases();
            match (bases.next(), bases.next()) {
                (Some(last), None) => last.owner_id,
                _ => None,
            }
        };
        if let Some(owner) = survivor {
            self.winner = Some(owner);
            self.game_over_pending = Some(owner);
            log::info!("match decided, winner {owner}");
        }
    }

    /// Winner announced since the last call, if any.
    pub fn take_game_over(&mut self) -> Option<PlayerId> {
        self.game_over_pending.take()
    }

    /// Advance the simulation by one step.
    ///
    /// `now` is the wall-clock time in ms sampled once for the tick, `delta`
    /// the seconds since the previous tick. A decided match stays frozen.
    pub fn tick(&mut self, now: i64, delta: f32) {
        if self.is_over() {
            return;
        }
        self.dead_this_tick.clear();

        for entity in self.entities.values_mut() {
            entity.expire_effects(now);
        }

        for player in self.players.values_mut() {
            if player.global_cooldown > 0.0 {
                player.global_cooldown = (player.global_cooldown - delta).max(0.0);
            }
        }

        match self.last_income {
            None => self.last_income = Some(now),
            Some(last) if now - last >= INCOME_INTERVAL_MS => {
                self.last_income = Some(now);
                self.apply_income(now);
            }
            Some(_) => {}
        }

        let units: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.is_unit())
            .map(|e| e.id)
            .collect();
        for id in units {
            if !self.entities.contains_key(&id) {
                continue;
            }
            ai::update_unit(self, id, now, delta);
            if self.entities.contains_key(&id) {
                abilities::trigger(self, id, now);
            }
        }

        self.move_structures(delta);
        self.capture_nodes();
    }

    fn apply_income(&mut self, now: i64) {
        for player in self.players.values_mut() {
            player.memory += PASSIVE_INCOME;
            player.cpu += PASSIVE_INCOME;
        }

        let mut grants: Vec<(PlayerId, i32, i32)> = Vec::new();
        for e in self.entities.values() {
            let Some(owner) = e.owner_id else { continue };
            match (e.kind, e.resource_type) {
                (EntityKind::ResourceNode, Some(ResourceKind::Memory)) => {
                    grants.push((owner, NODE_INCOME, 0))
                }
                (EntityKind::ResourceNode, Some(ResourceKind::Cpu)) => {
                    grants.push((owner, 0, NODE_INCOME))
                }
                _ if e.is_unit_of(UnitType::Allocator) => grants.push((owner, ALLOCATOR_INCOME, 0)),
                _ => {}
            }
        }
        for (owner, memory, cpu) in grants {
            if let Some(player) = self.players.get_mut(&owner) {
                player.memory += memory;
                player.cpu += cpu;
            }
        }

        let infected: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.has_effect(EffectKind::Infected, now))
            .map(|e| e.id)
            .collect();
        for id in infected {
            combat::apply_damage(self, id, INFECTION_DAMAGE, None, now);
        }
    }

    /// Factories and bases walk toward a commanded point.
    fn move_structures(&mut self, delta: f32) {
        for e in self.entities.values_mut() {
            if !matches!(e.kind, EntityKind::Factory | EntityKind::Instance) {
                continue;
            }
            let (Some(tx), Some(ty)) = (e.target_x, e.target_y) else {
                continue;
            };
            let dist = e.distance_to_point(tx, ty);
            let step = e.speed * delta;
            if dist <= ARRIVE_EPSILON || ai::step_toward(e, tx, ty, step) {
                e.x = tx;
                e.y = ty;
                e.target_x = None;
                e.target_y = None;
            }
        }
    }

    /// Hand each node to the nearest owned unit within reach.
    fn capture_nodes(&mut self) {
        let nodes: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.kind == EntityKind::ResourceNode)
            .map(|e| e.id)
            .collect();

        for node_id in nodes {
            let Some(node) = self.entities.get(&node_id) else {
                continue;
            };
            let captor = self
                .entities
                .values()
                .filter(|u| u.is_unit() && u.owner_id.is_some())
                .map(|u| (u.owner_id, u.distance_to(node)))
                .filter(|(_, d)| *d < CAPTURE_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(owner, _)| owner);

            if let Some(owner) = captor {
                if let Some(node) = self.entities.get_mut(&node_id) {
                    if node.owner_id != owner {
                        log::debug!("node {node_id} captured by {owner:?}");
                        node.owner_id = owner;
                    }
                }
            }
        }
    }
}
