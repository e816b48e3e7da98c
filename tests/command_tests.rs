//! Move / Build / PlayCard handling, including every refund path.

use memoryleak_server::game::{
    commands::{handle_command, Command, CommandType, GLOBAL_COOLDOWN},
    types::{Card, CardKind, Entity, EntityKind, PlayerState, UnitType},
    world::World,
};
use uuid::Uuid;

struct Table {
    world: World,
    me: Uuid,
    base: Uuid,
}

/// One player with a base at (100, 100).
fn table(memory: i32, cpu: i32) -> Table {
    let mut world = World::empty(800.0, 600.0);
    let me = Uuid::new_v4();
    world
        .players
        .insert(me, PlayerState::new(me, "me".into(), memory, cpu));
    let base = world.insert(Entity::instance(me, 100.0, 100.0));
    Table { world, me, base }
}

fn cmd(command_type: CommandType) -> Command {
    Command {
        command_type,
        entity_id: None,
        target_x: 0.0,
        target_y: 0.0,
        card_id: None,
    }
}

fn play(card: &Card, x: f32, y: f32) -> Command {
    Command {
        card_id: Some(card.id),
        target_x: x,
        target_y: y,
        ..cmd(CommandType::PlayCard)
    }
}

fn hold(t: &mut Table, kind: CardKind) -> Card {
    let card = Card::new(kind);
    t.world.players.get_mut(&t.me).unwrap().hand.push(card.clone());
    card
}

fn units(world: &World) -> usize {
    world.entities.values().filter(|e| e.is_unit()).count()
}

// ---------- move ----------

#[test]
fn move_sets_target_on_owned_entity() {
    let mut t = table(0, 0);
    let c = Command {
        entity_id: Some(t.base),
        target_x: 300.0,
        target_y: 200.0,
        ..cmd(CommandType::Move)
    };
    handle_command(&mut t.world, t.me, &c);

    let base = &t.world.entities[&t.base];
    assert_eq!((base.target_x, base.target_y), (Some(300.0), Some(200.0)));
}

#[test]
fn move_of_someone_elses_entity_is_ignored() {
    let mut t = table(0, 0);
    let c = Command {
        entity_id: Some(t.base),
        target_x: 300.0,
        target_y: 200.0,
        ..cmd(CommandType::Move)
    };
    handle_command(&mut t.world, Uuid::new_v4(), &c);

    assert_eq!(t.world.entities[&t.base].target_x, None);
}

// ---------- build ----------

#[test]
fn base_builds_factory_for_memory() {
    let mut t = table(100, 0);
    let c = Command {
        entity_id: Some(t.base),
        ..cmd(CommandType::Build)
    };
    handle_command(&mut t.world, t.me, &c);

    assert_eq!(t.world.players[&t.me].memory, 0);
    let factory = t
        .world
        .entities
        .values()
        .find(|e| e.kind == EntityKind::Factory)
        .expect("factory built");
    assert_eq!(factory.owner_id, Some(t.me));
    assert!((factory.x - 100.0).abs() <= 30.0 && (factory.y - 100.0).abs() <= 30.0);
}

#[test]
fn build_without_memory_does_nothing() {
    let mut t = table(99, 0);
    let c = Command {
        entity_id: Some(t.base),
        ..cmd(CommandType::Build)
    };
    handle_command(&mut t.world, t.me, &c);

    assert_eq!(t.world.players[&t.me].memory, 99);
    assert_eq!(t.world.entities.len(), 1);
}

#[test]
fn factory_builds_generic_unit_for_cpu() {
    let mut t = table(0, 60);
    let factory = t.world.insert(Entity::factory(t.me, 200.0, 200.0));
    let c = Command {
        entity_id: Some(factory),
        ..cmd(CommandType::Build)
    };
    handle_command(&mut t.world, t.me, &c);

    assert_eq!(t.world.players[&t.me].cpu, 10);
    let unit = t
        .world
        .entities
        .values()
        .find(|e| e.is_unit())
        .expect("unit built");
    assert_eq!((unit.x, unit.y), (220.0, 220.0));
    assert_eq!(unit.hp, 50);
    assert_eq!(unit.max_hp, 50);
    assert_eq!(unit.speed, 120.0);
}

#[test]
fn building_from_a_unit_does_nothing() {
    let mut t = table(500, 500);
    let scout = t.world.spawn_unit(t.me, UnitType::Scout, 0.0, 0.0);
    let c = Command {
        entity_id: Some(scout),
        ..cmd(CommandType::Build)
    };
    handle_command(&mut t.world, t.me, &c);

    assert_eq!(t.world.players[&t.me].memory, 500);
    assert_eq!(t.world.entities.len(), 2);
}

// ---------- play card ----------

#[test]
fn accepted_play_spawns_charges_and_redraws() {
    let mut t = table(100, 100);
    let card = hold(&mut t, CardKind::Spawn(UnitType::Scout));
    let next = Card::new(CardKind::Spawn(UnitType::Tank));
    t.world.players.get_mut(&t.me).unwrap().deck.push(next.clone());

    handle_command(&mut t.world, t.me, &play(&card, 150.0, 150.0));

    let p = &t.world.players[&t.me];
    assert_eq!(p.memory, 70);
    assert_eq!(p.cpu, 80);
    assert_eq!(p.global_cooldown, GLOBAL_COOLDOWN);
    assert_eq!(p.hand, vec![next]);
    assert_eq!(p.discard_pile, vec![card]);

    let scout = t
        .world
        .entities
        .values()
        .find(|e| e.is_unit_of(UnitType::Scout))
        .expect("scout spawned");
    assert_eq!((scout.x, scout.y), (150.0, 150.0));
    assert_eq!(scout.owner_id, Some(t.me));
}

#[test]
fn factory_card_places_factory_at_point() {
    let mut t = table(500, 500);
    let card = hold(&mut t, CardKind::BuildFactory);

    handle_command(&mut t.world, t.me, &play(&card, 120.0, 80.0));

    let factory = t
        .world
        .entities
        .values()
        .find(|e| e.kind == EntityKind::Factory)
        .expect("factory placed");
    assert_eq!((factory.x, factory.y), (120.0, 80.0));
}

#[test]
fn spawn_too_far_from_base_is_refunded() {
    let mut t = table(500, 500);
    let card = hold(&mut t, CardKind::Spawn(UnitType::Scout));

    handle_command(&mut t.world, t.me, &play(&card, 400.0, 100.0));

    let p = &t.world.players[&t.me];
    assert_eq!(p.hand, vec![card]);
    assert!(p.discard_pile.is_empty());
    assert_eq!(p.memory, 500);
    assert_eq!(p.global_cooldown, 0.0);
    assert_eq!(units(&t.world), 0);
}

#[test]
fn exactly_at_max_distance_is_allowed() {
    let mut t = table(500, 500);
    let card = hold(&mut t, CardKind::Spawn(UnitType::Scout));

    handle_command(&mut t.world, t.me, &play(&card, 300.0, 100.0));
    assert_eq!(units(&t.world), 1);
}

#[test]
fn play_during_cooldown_is_refunded() {
    let mut t = table(500, 500);
    let card = hold(&mut t, CardKind::Spawn(UnitType::Scout));
    t.world.players.get_mut(&t.me).unwrap().global_cooldown = 0.4;

    handle_command(&mut t.world, t.me, &play(&card, 120.0, 120.0));

    let p = &t.world.players[&t.me];
    assert_eq!(p.hand, vec![card]);
    assert!(p.discard_pile.is_empty());
    assert_eq!(p.memory, 500);
    assert_eq!(units(&t.world), 0);
}

#[test]
fn unaffordable_play_is_refunded() {
    let mut t = table(10, 500);
    let card = hold(&mut t, CardKind::Spawn(UnitType::Tank));

    handle_command(&mut t.world, t.me, &play(&card, 120.0, 120.0));

    let p = &t.world.players[&t.me];
    assert_eq!(p.hand, vec![card]);
    assert_eq!((p.memory, p.cpu), (10, 500));
    assert_eq!(units(&t.world), 0);
}

#[test]
fn playing_an_unheld_card_is_a_noop() {
    let mut t = table(500, 500);
    let stranger = Card::new(CardKind::Spawn(UnitType::Scout));

    handle_command(&mut t.world, t.me, &play(&stranger, 120.0, 120.0));

    let p = &t.world.players[&t.me];
    assert!(p.hand.is_empty());
    assert!(p.discard_pile.is_empty());
    assert_eq!(p.memory, 500);
}

#[test]
fn without_a_base_the_range_check_is_skipped() {
    let mut t = table(500, 500);
    t.world.entities.remove(&t.base);
    let card = hold(&mut t, CardKind::Spawn(UnitType::Scout));

    handle_command(&mut t.world, t.me, &play(&card, 700.0, 500.0));
    assert_eq!(units(&t.world), 1);
}

#[test]
fn attack_and_capture_are_accepted_but_inert() {
    let mut t = table(500, 500);
    let before = t.world.entities.len();
    handle_command(&mut t.world, t.me, &cmd(CommandType::Attack));
    handle_command(&mut t.world, t.me, &cmd(CommandType::Capture));
    assert_eq!(t.world.entities.len(), before);
}

#[test]
fn wire_format_uses_screaming_command_types() {
    let raw = r#"{"commandType":"PLAY_CARD","cardId":"6f1c1f2e-6c1a-4a5e-9d55-2f1f0b6c9a10","targetX":10.5,"targetY":20}"#;
    let parsed: Command = serde_json::from_str(raw).expect("valid command");
    assert_eq!(parsed.command_type, CommandType::PlayCard);
    assert_eq!(parsed.target_x, 10.5);
    assert_eq!(parsed.entity_id, None);
    assert!(parsed.card_id.is_some());
}
