//! Per-unit state machine: Idle -> MovingToTarget -> Attacking.

use crate::game::{
    combat,
    status::{BOOST_ATTACK_SPEED, RANGE_BOOST},
    types::{AiState, EffectKind, Entity, EntityId, EntityKind},
    world::World,
};

/// Pick what `unit` should pursue this tick.
///
/// Enemies rank Unit > Factory > Instance, then by distance. The nearest
/// capturable node competes on distance only; collectors take any node.
pub fn select_target(world: &World, unit: &Entity, now: i64) -> Option<EntityId> {
    let nearest_node = world
        .entities
        .values()
        .filter(|e| e.kind == EntityKind::ResourceNode && e.owner_id != unit.owner_id)
        .map(|e| (e.id, unit.distance_to(e)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let nearest_enemy = world
        .entities
        .values()
        .filter(|e| {
            e.kind != EntityKind::ResourceNode
                && e.owner_id.is_some()
                && e.owner_id != unit.owner_id
                && !e.is_concealed(now)
        })
        .map(|e| (e.id, e.kind.target_priority(), unit.distance_to(e)))
        .min_by(|a, b| a.1.cmp(&b.1).then(a.2.total_cmp(&b.2)))
        .map(|(id, _, dist)| (id, dist));

    let collector = unit.unit_type.is_some_and(|t| t.is_collector());
    match (nearest_node, nearest_enemy) {
        (Some((node, _)), _) if collector => Some(node),
        (Some((node, node_dist)), Some((_, enemy_dist))) if node_dist < enemy_dist => Some(node),
        (_, Some((enemy, _))) => Some(enemy),
        (Some((node, _)), None) => Some(node),
        (None, None) => None,
    }
}

/// Advance `e` toward `(tx, ty)` by at most `amount`. Returns `true` on arrival.
pub fn step_toward(e: &mut Entity, tx: f32, ty: f32, amount: f32) -> bool {
    let dx = tx - e.x;
    let dy = ty - e.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= amount {
        e.x = tx;
        e.y = ty;
        return true;
    }
    if dist > 0.0 {
        e.x += dx / dist * amount;
        e.y += dy / dist * amount;
    }
    false
}

pub fn attack_range(unit: &Entity, now: i64) -> f32 {
    let base = unit.unit_type.map_or(0.0, |t| t.stats().attack_range);
    if unit.has_effect(EffectKind::RangeBoosted, now) {
        base + RANGE_BOOST
    } else {
        base
    }
}

pub fn attack_cooldown_ms(unit: &Entity, now: i64) -> i64 {
    let Some(stats) = unit.unit_type.map(|t| t.stats()) else {
        return i64::MAX;
    };
    if unit.has_effect(EffectKind::Boosted, now) {
        let boosted = stats.attack_speed * BOOST_ATTACK_SPEED;
        if boosted <= 0.0 {
            return i64::MAX;
        }
        (1000.0 / boosted) as i64
    } else {
        stats.attack_cooldown_ms()
    }
}

/// Run one AI step for the unit. May attack (and kill) through the resolver.
pub fn update_unit(world: &mut World, unit_id: EntityId, now: i64, delta: f32) {
    let Some(unit) = world.entities.get(&unit_id) else {
        return;
    };
    if unit.unit_type.is_none() {
        return;
    }

    if unit.ai_state != AiState::Attacking {
        let choice = select_target(world, unit, now);
        let Some(unit) = world.entities.get_mut(&unit_id) else {
            return;
        };
        unit.target_enemy_id = choice;
        unit.ai_state = if choice.is_some() {
            AiState::MovingToTarget
        } else {
            AiState::Idle
        };
    }

    let Some(unit) = world.entities.get(&unit_id) else {
        return;
    };
    let target = unit
        .target_enemy_id
        .and_then(|id| world.entities.get(&id))
        .filter(|t| t.owner_id == unit.owner_id || !t.is_concealed(now))
        .map(|t| (t.id, t.kind, t.x, t.y));

    let Some((target_id, target_kind, tx, ty)) = target else {
        if let Some(unit) = world.entities.get_mut(&unit_id) {
            unit.ai_state = AiState::Idle;
            unit.target_enemy_id = None;
            unit.attacking_target_id = None;
        }
        return;
    };

    let dist = unit.distance_to_point(tx, ty);
    if target_kind.is_attackable() && dist <= attack_range(unit, now) {
        let ready = now - unit.last_attack_time >= attack_cooldown_ms(unit, now);
        if let Some(unit) = world.entities.get_mut(&unit_id) {
            unit.ai_state = AiState::Attacking;
            unit.target_x = None;
            unit.target_y = None;
            if ready {
                unit.last_attack_time = now;
            }
        }
        if ready {
            combat::perform_attack(world, unit_id, target_id, now);
        }
        if let Some(unit) = world.entities.get_mut(&unit_id) {
            unit.attacking_target_id = Some(target_id);
        }
        return;
    }

    let Some(unit) = world.entities.get_mut(&unit_id) else {
        return;
    };
    unit.ai_state = AiState::MovingToTarget;
    unit.attacking_target_id = None;
    unit.target_x = Some(tx);
    unit.target_y = Some(ty);
    let amount = unit.effective_speed(now) * delta;
    step_toward(unit, tx, ty, amount);
}
