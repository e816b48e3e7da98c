//! Damage modifiers, death side effects and win detection.
//!
//! Run with `cargo test -p memoryleak-server --tests`.

use memoryleak_server::game::{
    combat::{self, compute_damage},
    types::{EffectKind, Entity, PlayerState, ResourceKind, UnitType},
    world::World,
};
use uuid::Uuid;

const NOW: i64 = 1_000_000;

fn arena() -> (World, Uuid, Uuid) {
    let mut world = World::empty(800.0, 600.0);
    let p1 = Uuid::new_v4();
    let p2 = Uuid::new_v4();
    world.players.insert(p1, PlayerState::new(p1, "one".into(), 0, 0));
    world.players.insert(p2, PlayerState::new(p2, "two".into(), 0, 0));
    (world, p1, p2)
}

#[test]
fn polymorph_scales_by_target_kind() {
    let p1 = Uuid::new_v4();
    let p2 = Uuid::new_v4();
    let warrior = Entity::unit(p1, UnitType::PolymorphWarrior, 0.0, 0.0);
    let d = warrior.damage;
    assert_eq!(d, 12);

    let base = Entity::instance(p2, 0.0, 0.0);
    let factory = Entity::factory(p2, 0.0, 0.0);
    let unit = Entity::unit(p2, UnitType::Tank, 0.0, 0.0);

    assert_eq!(compute_damage(&warrior, &base, NOW), 24);
    assert_eq!(compute_damage(&warrior, &factory, NOW), 18);
    assert_eq!(compute_damage(&warrior, &unit, NOW), 15, "12 * 1.3 rounds down");
}

#[test]
fn indexed_mark_applies_after_polymorph_scaling() {
    let warrior = Entity::unit(Uuid::new_v4(), UnitType::PolymorphWarrior, 0.0, 0.0);
    let mut unit = Entity::unit(Uuid::new_v4(), UnitType::Tank, 0.0, 0.0);
    unit.apply_effect(EffectKind::Indexed, NOW, 5000);

    // floor(floor(12 * 1.3) * 1.25) = floor(15 * 1.25)
    assert_eq!(compute_damage(&warrior, &unit, NOW), 18);
}

#[test]
fn expired_mark_no_longer_applies() {
    let scout = Entity::unit(Uuid::new_v4(), UnitType::Ranged, 0.0, 0.0);
    let mut unit = Entity::unit(Uuid::new_v4(), UnitType::Tank, 0.0, 0.0);
    unit.apply_effect(EffectKind::Indexed, NOW, 5000);

    assert_eq!(compute_damage(&scout, &unit, NOW + 4999), 18);
    assert_eq!(compute_damage(&scout, &unit, NOW + 5000), 15);
}

#[test]
fn coroutine_archer_bonus_ignores_target_kind() {
    let archer = Entity::unit(Uuid::new_v4(), UnitType::CoroutineArcher, 0.0, 0.0);
    let p2 = Uuid::new_v4();
    assert_eq!(compute_damage(&archer, &Entity::instance(p2, 0.0, 0.0), NOW), 23);
    assert_eq!(compute_damage(&archer, &Entity::unit(p2, UnitType::Scout, 0.0, 0.0), NOW), 23);
}

#[test]
fn shield_halves_incoming_damage() {
    let ranged = Entity::unit(Uuid::new_v4(), UnitType::Ranged, 0.0, 0.0);
    let mut tank = Entity::unit(Uuid::new_v4(), UnitType::Tank, 0.0, 0.0);
    tank.apply_effect(EffectKind::Shielded, NOW, 2000);
    assert_eq!(compute_damage(&ranged, &tank, NOW), 7);
}

#[test]
fn attack_subtracts_hp_and_removes_the_dead() {
    let (mut world, p1, p2) = arena();
    let tank = world.spawn_unit(p1, UnitType::Tank, 0.0, 0.0);
    let scout = world.spawn_unit(p2, UnitType::Scout, 10.0, 0.0);

    combat::perform_attack(&mut world, tank, scout, NOW);
    assert_eq!(world.entities[&scout].hp, 20);

    combat::perform_attack(&mut world, tank, scout, NOW);
    combat::perform_attack(&mut world, tank, scout, NOW);
    assert!(!world.entities.contains_key(&scout));
    assert_eq!(world.dead_this_tick.len(), 1);
}

#[test]
fn promise_knight_splashes_nearby_enemies_on_death() {
    let (mut world, p1, p2) = arena();
    let knight = world.spawn_unit(p2, UnitType::PromiseKnight, 0.0, 0.0);
    let near = world.spawn_unit(p1, UnitType::Tank, 50.0, 0.0);
    let far = world.spawn_unit(p1, UnitType::Tank, 200.0, 0.0);
    let friend = world.spawn_unit(p2, UnitType::Tank, 10.0, 0.0);

    combat::apply_damage(&mut world, knight, 1000, None, NOW);

    assert!(!world.entities.contains_key(&knight));
    assert_eq!(world.entities[&near].hp, 135);
    assert_eq!(world.entities[&far].hp, 150);
    assert_eq!(world.entities[&friend].hp, 150);
}

#[test]
fn splash_kills_are_resolved_in_the_same_step() {
    let (mut world, p1, p2) = arena();
    let knight = world.spawn_unit(p2, UnitType::PromiseKnight, 0.0, 0.0);
    let weak = world.spawn_unit(p1, UnitType::Scout, 20.0, 0.0);
    world.entities.get_mut(&weak).unwrap().hp = 10;

    combat::apply_damage(&mut world, knight, 1000, None, NOW);
    assert!(!world.entities.contains_key(&weak));
}

#[test]
fn recursive_bomb_splits_twice_then_stops() {
    let (mut world, _p1, p2) = arena();
    let bomb = world.spawn_unit(p2, UnitType::RecursiveBomb, 300.0, 300.0);

    combat::apply_damage(&mut world, bomb, 100, None, NOW);

    let children: Vec<Entity> = world.entities.values().cloned().collect();
    assert_eq!(children.len(), 2);
    for child in &children {
        assert!(child.is_unit_of(UnitType::RecursiveBomb));
        assert_eq!(child.generation, 1);
        assert_eq!(child.max_hp, 12);
        assert_eq!(child.hp, 12);
        assert_eq!(child.damage, 4);
        assert!((child.x - 300.0).abs() <= 20.0 && (child.y - 300.0).abs() <= 20.0);
    }

    // Generation 2 bombs die for good.
    let last = world.spawn_unit(p2, UnitType::RecursiveBomb, 0.0, 0.0);
    world.entities.get_mut(&last).unwrap().generation = 2;
    let before = world.entities.len();
    combat::apply_damage(&mut world, last, 100, None, NOW);
    assert_eq!(world.entities.len(), before - 1);
    assert!(!world.entities.contains_key(&last));
}

#[test]
fn transaction_guard_rolls_back_nearby_owned_nodes() {
    let (mut world, p1, p2) = arena();
    let guard = world.spawn_unit(p2, UnitType::TransactionGuard, 0.0, 0.0);

    let mut near = Entity::resource_node(ResourceKind::Memory, 50.0, 0.0);
    near.owner_id = Some(p2);
    let near = world.insert(near);
    let mut far = Entity::resource_node(ResourceKind::Cpu, 300.0, 0.0);
    far.owner_id = Some(p2);
    let far = world.insert(far);
    let mut theirs = Entity::resource_node(ResourceKind::Cpu, 20.0, 0.0);
    theirs.owner_id = Some(p1);
    let theirs = world.insert(theirs);

    combat::apply_damage(&mut world, guard, 1000, None, NOW);

    assert_eq!(world.entities[&near].owner_id, None);
    assert_eq!(world.entities[&far].owner_id, Some(p2));
    assert_eq!(world.entities[&theirs].owner_id, Some(p1));
}

#[test]
fn garbage_collector_reclaims_resources_on_kill() {
    let (mut world, p1, p2) = arena();
    let gc = world.spawn_unit(p1, UnitType::GarbageCollector, 0.0, 0.0);
    let victim = world.spawn_unit(p2, UnitType::Scout, 10.0, 0.0);
    world.entities.get_mut(&victim).unwrap().hp = 5;

    combat::perform_attack(&mut world, gc, victim, NOW);

    assert!(!world.entities.contains_key(&victim));
    assert_eq!(world.players[&p1].memory, 3);
    assert_eq!(world.players[&p1].cpu, 2);
    assert_eq!(world.players[&p2].memory, 0);
}

#[test]
fn garbage_collector_is_paid_even_when_the_splash_kills_it() {
    let (mut world, p1, p2) = arena();
    let gc = world.spawn_unit(p1, UnitType::GarbageCollector, 0.0, 0.0);
    let knight = world.spawn_unit(p2, UnitType::PromiseKnight, 10.0, 0.0);
    world.entities.get_mut(&gc).unwrap().hp = 10;
    world.entities.get_mut(&knight).unwrap().hp = 5;

    combat::perform_attack(&mut world, gc, knight, NOW);

    assert!(!world.entities.contains_key(&knight));
    assert!(!world.entities.contains_key(&gc), "splash took the collector");
    assert_eq!(world.players[&p1].memory, 3);
    assert_eq!(world.players[&p1].cpu, 2);
}

#[test]
fn destroying_a_base_announces_exactly_one_winner() {
    let (mut world, p1, p2) = arena();
    let base1 = world.insert(Entity::instance(p1, 100.0, 100.0));
    let base2 = world.insert(Entity::instance(p2, 600.0, 400.0));

    combat::apply_damage(&mut world, base2, 5000, None, NOW);

    assert_eq!(world.take_game_over(), Some(p1));
    assert_eq!(world.winner(), Some(p1));
    assert_eq!(world.take_game_over(), None);

    // Nothing afterwards re-announces.
    combat::apply_damage(&mut world, base1, 5000, None, NOW);
    world.tick(NOW + 2000, 0.1);
    assert_eq!(world.take_game_over(), None);
    assert_eq!(world.winner(), Some(p1));
}

#[test]
fn hp_stays_within_bounds_through_a_brawl() {
    let (mut world, p1, p2) = arena();
    world.insert(Entity::instance(p1, 100.0, 300.0));
    world.insert(Entity::instance(p2, 700.0, 300.0));
    for (i, kind) in UnitType::ALL.iter().enumerate() {
        let y = 50.0 + (i as f32) * 20.0;
        world.spawn_unit(p1, *kind, 350.0, y);
        world.spawn_unit(p2, *kind, 450.0, y);
    }

    let mut now = NOW;
    for _ in 0..600 {
        now += 16;
        world.tick(now, 0.016);
        for e in world.entities.values() {
            assert!(e.hp > 0, "{:?} {} left alive at {}", e.kind, e.id, e.hp);
            assert!(e.hp <= e.max_hp, "{:?} {} over max", e.kind, e.id);
        }
    }
}
