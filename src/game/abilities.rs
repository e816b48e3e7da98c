//! Unit special abilities, driven by a per-kind table.
//!
//! Each kind maps to an [`Ability`]: a cooldown plus one of a handful of
//! effect shapes. Adding a kind means adding a row, not a branch.

use crate::game::{
    combat,
    status::{
        BOOST_MS, COMMAND_MS, DEADLOCK_MS, HIDE_MS, INDEX_MS, INFECTION_MS, RANGE_BOOST_MS,
        REVEAL_MS, SCAN_MS, SHIELD_MS,
    },
    types::{EffectKind, Entity, EntityId, EntityKind, UnitType},
    world::World,
};

pub const DEFAULT_COOLDOWN_MS: i64 = 3000;
pub const SNIPER_COOLDOWN_MS: i64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityEffect {
    /// Restore hp to nearby allies (never self), optionally cleansing debuffs.
    Heal { radius: f32, amount: i32, cleanse: bool },
    /// Absorb a share of allies that died nearby this tick.
    Inherit { radius: f32, hp_share: f32, speed_share: f32 },
    /// Tag same-owner units in range.
    AllyAura {
        radius: f32,
        include_self: bool,
        effect: EffectKind,
        duration_ms: i64,
    },
    /// Tag every enemy unit on the map.
    MapWide { effect: EffectKind, duration_ms: i64 },
    /// Immobilise enemy units in range once enough are clustered.
    Immobilize { radius: f32, min_targets: usize, duration_ms: i64 },
    /// Tag the current combat target.
    MarkTarget { effect: EffectKind, duration_ms: i64 },
    /// Direct damage to the current combat target.
    Burst { damage: i32 },
    /// Damage and infect the first enemy factory in range.
    Infect { radius: f32, damage: i32, duration_ms: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ability {
    pub cooldown_ms: i64,
    pub effect: AbilityEffect,
}

const fn every(effect: AbilityEffect) -> Ability {
    Ability {
        cooldown_ms: DEFAULT_COOLDOWN_MS,
        effect,
    }
}

impl UnitType {
    pub fn ability(self) -> Option<Ability> {
        use AbilityEffect::*;
        let ability = match self {
            UnitType::Healer => every(Heal {
                radius: 80.0,
                amount: 10,
                cleanse: false,
            }),
            UnitType::RestfulHealer => every(Heal {
                radius: 90.0,
                amount: 15,
                cleanse: true,
            }),
            UnitType::InheritanceDrone => every(Inherit {
                radius: 70.0,
                hp_share: 0.2,
                speed_share: 0.1,
            }),
            UnitType::EncapsulationShield => every(AllyAura {
                radius: 80.0,
                include_self: false,
                effect: EffectKind::Shielded,
                duration_ms: SHIELD_MS,
            }),
            UnitType::AbstractionAgent => every(AllyAura {
                radius: 90.0,
                include_self: true,
                effect: EffectKind::Hidden,
                duration_ms: HIDE_MS,
            }),
            UnitType::DynamicDispatcher => every(AllyAura {
                radius: 100.0,
                include_self: false,
                effect: EffectKind::Boosted,
                duration_ms: BOOST_MS,
            }),
            UnitType::HigherOrderCommander => every(AllyAura {
                radius: 120.0,
                include_self: true,
                effect: EffectKind::Commanded,
                duration_ms: COMMAND_MS,
            }),
            UnitType::ApiGateway => every(AllyAura {
                radius: 100.0,
                include_self: true,
                effect: EffectKind::RangeBoosted,
                duration_ms: RANGE_BOOST_MS,
            }),
            UnitType::WebsocketScout => every(MapWide {
                effect: EffectKind::Revealed,
                duration_ms: REVEAL_MS,
            }),
            UnitType::DeadlockTrap => every(Immobilize {
                radius: 70.0,
                min_targets: 2,
                duration_ms: DEADLOCK_MS,
            }),
            UnitType::ReflectionSpy => every(MarkTarget {
                effect: EffectKind::Scanned,
                duration_ms: SCAN_MS,
            }),
            UnitType::Indexer => every(MarkTarget {
                effect: EffectKind::Indexed,
                duration_ms: INDEX_MS,
            }),
            UnitType::CodeInjector => every(Infect {
                radius: 100.0,
                damage: 20,
                duration_ms: INFECTION_MS,
            }),
            UnitType::LambdaSniper => Ability {
                cooldown_ms: SNIPER_COOLDOWN_MS,
                effect: Burst { damage: 50 },
            },
            _ => return None,
        };
        Some(ability)
    }
}

fn is_enemy(unit: &Entity, other: &Entity) -> bool {
    other.owner_id.is_some() && other.owner_id != unit.owner_id
}

fn units_near<'a>(
    world: &'a World,
    unit: &'a Entity,
    radius: f32,
    enemies: bool,
) -> impl Iterator<Item = EntityId> + 'a {
    world
        .entities
        .values()
        .filter(move |e| {
            e.is_unit()
                && e.distance_to(unit) < radius
                && if enemies {
                    is_enemy(unit, e)
                } else {
                    e.owner_id == unit.owner_id
                }
        })
        .map(|e| e.id)
}

/// The unit's resolved combat target, if it is a live enemy structure or unit.
fn combat_target(world: &World, unit: &Entity) -> Option<EntityId> {
    unit.target_enemy_id
        .and_then(|id| world.entities.get(&id))
        .filter(|t| t.kind != EntityKind::ResourceNode && is_enemy(unit, t))
        .map(|t| t.id)
}

/// Fire the unit's ability if it has one and it is off cooldown.
pub fn trigger(world: &mut World, unit_id: EntityId, now: i64) {
    let Some(unit) = world.entities.get(&unit_id) else {
        return;
    };
    let Some(ability) = unit.unit_type.and_then(UnitType::ability) else {
        return;
    };
    if now - unit.last_ability_time < ability.cooldown_ms {
        return;
    }

    let fired = match ability.effect {
        AbilityEffect::Heal {
            radius,
            amount,
            cleanse,
        } => {
            let allies: Vec<EntityId> = units_near(world, unit, radius, false)
                .filter(|id| *id != unit_id)
                .collect();
            for id in &allies {
                if let Some(ally) = world.entities.get_mut(id) {
                    ally.hp = (ally.hp + amount).min(ally.max_hp);
                    if cleanse {
                        ally.clear_effect(EffectKind::Deadlocked);
                        ally.clear_effect(EffectKind::Infected);
                    }
                }
            }
            !allies.is_empty()
        }
        AbilityEffect::Inherit {
            radius,
            hp_share,
            speed_share,
        } => {
            let gains: Vec<(i32, f32)> = world
                .dead_this_tick
                .iter()
                .filter(|d| d.owner_id == unit.owner_id && d.distance_to(unit) < radius)
                .map(|d| ((d.max_hp as f32 * hp_share) as i32, d.speed * speed_share))
                .collect();
            if let Some(unit) = world.entities.get_mut(&unit_id) {
                for (hp, speed) in &gains {
                    unit.max_hp += hp;
                    unit.hp += hp;
                    unit.speed += speed;
                }
            }
            !gains.is_empty()
        }
        AbilityEffect::AllyAura {
            radius,
            include_self,
            effect,
            duration_ms,
        } => {
            let allies: Vec<EntityId> = units_near(world, unit, radius, false)
                .filter(|id| include_self || *id != unit_id)
                .collect();
            tag(world, &allies, effect, now, duration_ms);
            !allies.is_empty()
        }
        AbilityEffect::MapWide {
            effect,
            duration_ms,
        } => {
            let enemies: Vec<EntityId> = world
                .entities
                .values()
                .filter(|e| e.is_unit() && is_enemy(unit, e))
                .map(|e| e.id)
                .collect();
            tag(world, &enemies, effect, now, duration_ms);
            !enemies.is_empty()
        }
        AbilityEffect::Immobilize {
            radius,
            min_targets,
            duration_ms,
        } => {
            let enemies: Vec<EntityId> = units_near(world, unit, radius, true).collect();
            if enemies.len() >= min_targets {
                tag(world, &enemies, EffectKind::Deadlocked, now, duration_ms);
                true
            } else {
                false
            }
        }
        AbilityEffect::MarkTarget {
            effect,
            duration_ms,
        } => match combat_target(world, unit) {
            Some(target) => {
                tag(world, &[target], effect, now, duration_ms);
                true
            }
            None => false,
        },
        AbilityEffect::Burst { damage } => match combat_target(world, unit) {
            Some(target) => {
                combat::apply_damage(world, target, damage, Some(unit_id), now);
                true
            }
            None => false,
        },
        AbilityEffect::Infect {
            radius,
            damage,
            duration_ms,
        } => {
            let factory = world
                .entities
                .values()
                .find(|e| {
                    e.kind == EntityKind::Factory && is_enemy(unit, e) && e.distance_to(unit) < radius
                })
                .map(|e| e.id);
            match factory {
                Some(target) => {
                    if !combat::apply_damage(world, target, damage, Some(unit_id), now) {
                        tag(world, &[target], EffectKind::Infected, now, duration_ms);
                    }
                    true
                }
                None => false,
            }
        }
    };

    if fired {
        if let Some(unit) = world.entities.get_mut(&unit_id) {
            unit.last_ability_time = now;
        }
    }
}

fn tag(world: &mut World, ids: &[EntityId], effect: EffectKind, now: i64, duration_ms: i64) {
    for id in ids {
        if let Some(e) = world.entities.get_mut(id) {
            e.apply_effect(effect, now, duration_ms);
        }
    }
}
