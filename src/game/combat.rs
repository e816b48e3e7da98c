//! Damage computation, death side effects and win detection.
//!
//! Damage is a pure function of attacker and target; no randomness.

use crate::game::{
    types::{EffectKind, Entity, EntityId, EntityKind, UnitType},
    world::World,
};
use rand::Rng;

pub const SPLASH_RADIUS: f32 = 80.0;
pub const SPLASH_DAMAGE: i32 = 15;
pub const MAX_GENERATION: u8 = 2;
pub const SPLIT_OFFSET: f32 = 20.0;
pub const ROLLBACK_RADIUS: f32 = 100.0;
pub const RECLAIM_MEMORY: i32 = 3;
pub const RECLAIM_CPU: i32 = 2;

fn scale(damage: i32, factor: f64) -> i32 {
    (damage as f64 * factor).floor() as i32
}

/// Damage `attacker` deals to `target` with every active modifier applied.
pub fn compute_damage(attacker: &Entity, target: &Entity, now: i64) -> i32 {
    let mut damage = attacker.damage;

    if attacker.is_unit_of(UnitType::PolymorphWarrior) {
        damage = match target.kind {
            EntityKind::Unit => scale(damage, 1.3),
            EntityKind::Factory => scale(damage, 1.5),
            EntityKind::Instance => scale(damage, 2.0),
            EntityKind::ResourceNode => damage,
        };
    }
    if attacker.has_effect(EffectKind::Commanded, now) {
        damage = scale(damage, 1.2);
    }
    if target.has_effect(EffectKind::Indexed, now) {
        damage = scale(damage, 1.25);
    }
    if attacker.is_unit_of(UnitType::CoroutineArcher) {
        damage = scale(damage, 1.3);
    }
    if target.has_effect(EffectKind::Shielded, now) {
        damage /= 2;
    }
    damage
}

/// One hit from `attacker_id` on `target_id`.
pub fn perform_attack(world: &mut World, attacker_id: EntityId, target_id: EntityId, now: i64) {
    let (Some(attacker), Some(target)) =
        (world.entities.get(&attacker_id), world.entities.get(&target_id))
    else {
        return;
    };
    let damage = compute_damage(attacker, target, now);
    apply_damage(world, target_id, damage, Some(attacker_id), now);
}

/// Subtract `amount` hp and resolve the death if it drops to zero.
/// `killer` is the entity credited with the kill, if any. Returns `true` on death.
pub fn apply_damage(
    world: &mut World,
    target_id: EntityId,
    amount: i32,
    killer: Option<EntityId>,
    now: i64,
) -> bool {
    let Some(target) = world.entities.get_mut(&target_id) else {
        return false;
    };
    target.hp -= amount;
    if target.hp > 0 {
        return false;
    }
    resolve_death(world, target_id, killer, now);
    true
}

fn resolve_death(world: &mut World, dead_id: EntityId, killer: Option<EntityId>, now: i64) {
    // Removed first so chained splash can't hit the same corpse twice.
    let Some(dead) = world.entities.remove(&dead_id) else {
        return;
    };
    // Read before the side effects: a splash may kill the collector too.
    let reclaimer = killer
        .and_then(|id| world.entities.get(&id))
        .filter(|k| k.is_unit_of(UnitType::GarbageCollector))
        .and_then(|k| k.owner_id);

    match dead.unit_type {
        Some(UnitType::PromiseKnight) => {
            let victims: Vec<EntityId> = world
                .entities
                .values()
                .filter(|e| {
                    e.is_unit() && e.owner_id != dead.owner_id && e.distance_to(&dead) < SPLASH_RADIUS
                })
                .map(|e| e.id)
                .collect();
            for victim in victims {
                apply_damage(world, victim, SPLASH_DAMAGE, None, now);
            }
        }
        Some(UnitType::RecursiveBomb) if dead.generation < MAX_GENERATION => {
            if let Some(owner) = dead.owner_id {
                let mut rng = rand::rng();
                for _ in 0..2 {
                    let x = dead.x + rng.random_range(-SPLIT_OFFSET..SPLIT_OFFSET);
                    let y = dead.y + rng.random_range(-SPLIT_OFFSET..SPLIT_OFFSET);
                    let mut copy = Entity::unit(owner, UnitType::RecursiveBomb, x, y);
                    copy.max_hp = (dead.max_hp / 2).max(1);
                    copy.hp = copy.max_hp;
                    copy.damage = dead.damage / 2;
                    copy.generation = dead.generation + 1;
                    world.insert(copy);
                }
            }
        }
        Some(UnitType::TransactionGuard) => {
            for node in world.entities.values_mut() {
                if node.kind == EntityKind::ResourceNode
                    && node.owner_id.is_some()
                    && node.owner_id == dead.owner_id
                    && node.distance_to(&dead) < ROLLBACK_RADIUS
                {
                    node.owner_id = None;
                }
            }
        }
        _ => {}
    }

    log::debug!("{:?} {dead_id} destroyed", dead.kind);

    if let Some(player) = reclaimer.and_then(|owner| world.players.get_mut(&owner)) {
        player.memory += RECLAIM_MEMORY;
        player.cpu += RECLAIM_CPU;
    }

    let was_base = dead.kind == EntityKind::Instance;
    if dead.is_unit() {
        world.dead_this_tick.push(dead);
    }
    if was_base {
        world.check_victory();
    }
}
