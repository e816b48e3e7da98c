//! Static lookup tables: unit stats and card prices.

use crate::game::types::{CardKind, UnitType};
use serde::Serialize;

/// Combat stats of a unit kind. Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStats {
    pub max_hp: i32,
    pub speed: f32,
    pub damage: i32,
    pub attack_range: f32,
    /// Attacks per second.
    pub attack_speed: f32,
}

const fn s(max_hp: i32, speed: f32, damage: i32, attack_range: f32, attack_speed: f32) -> UnitStats {
    UnitStats {
        max_hp,
        speed,
        damage,
        attack_range,
        attack_speed,
    }
}

impl UnitStats {
    /// Milliseconds between two attacks.
    pub fn attack_cooldown_ms(&self) -> i64 {
        if self.attack_speed <= 0.0 {
            return i64::MAX;
        }
        (1000.0 / self.attack_speed) as i64
    }
}

impl UnitType {
    pub fn stats(self) -> UnitStats {
        match self {
            UnitType::Scout => s(30, 150.0, 5, 50.0, 1.5),
            UnitType::Tank => s(150, 50.0, 10, 50.0, 0.8),
            UnitType::Ranged => s(40, 100.0, 15, 120.0, 1.0),
            UnitType::Healer => s(50, 80.0, 0, 80.0, 2.0),

            UnitType::Allocator => s(40, 60.0, 2, 30.0, 0.5),
            UnitType::GarbageCollector => s(60, 70.0, 8, 60.0, 1.0),
            UnitType::BasicProcess => s(35, 90.0, 6, 45.0, 1.2),

            UnitType::InheritanceDrone => s(45, 85.0, 7, 50.0, 1.0),
            UnitType::PolymorphWarrior => s(80, 75.0, 12, 55.0, 1.1),
            UnitType::EncapsulationShield => s(100, 40.0, 3, 40.0, 0.5),
            UnitType::AbstractionAgent => s(35, 110.0, 4, 50.0, 0.8),

            UnitType::ReflectionSpy => s(25, 130.0, 1, 100.0, 0.3),
            UnitType::CodeInjector => s(50, 95.0, 10, 70.0, 0.7),
            UnitType::DynamicDispatcher => s(55, 80.0, 5, 50.0, 1.5),

            UnitType::CoroutineArcher => s(38, 95.0, 18, 130.0, 0.9),
            UnitType::PromiseKnight => s(90, 65.0, 11, 50.0, 1.0),
            UnitType::DeadlockTrap => s(20, 120.0, 2, 60.0, 0.5),

            UnitType::LambdaSniper => s(30, 70.0, 50, 150.0, 0.2),
            UnitType::RecursiveBomb => s(25, 100.0, 8, 40.0, 1.0),
            UnitType::HigherOrderCommander => s(70, 60.0, 6, 60.0, 0.8),

            UnitType::ApiGateway => s(65, 50.0, 4, 70.0, 0.6),
            UnitType::WebsocketScout => s(28, 140.0, 3, 90.0, 0.7),
            UnitType::RestfulHealer => s(55, 85.0, 0, 90.0, 1.8),

            UnitType::CacheRunner => s(20, 180.0, 4, 35.0, 1.5),
            UnitType::Indexer => s(42, 75.0, 5, 80.0, 0.9),
            UnitType::TransactionGuard => s(75, 55.0, 7, 50.0, 0.8),
        }
    }
}

impl CardKind {
    /// `(memory, cpu)` price of playing the card.
    pub fn cost(self) -> (i32, i32) {
        match self {
            CardKind::BuildFactory => (100, 0),
            CardKind::Spawn(unit) => match unit {
                UnitType::Scout => (30, 20),
                UnitType::Tank => (80, 40),
                UnitType::Ranged => (50, 60),
                UnitType::Healer => (50, 40),

                UnitType::Allocator => (40, 30),
                UnitType::GarbageCollector => (50, 40),
                UnitType::BasicProcess => (35, 25),

                UnitType::InheritanceDrone => (60, 45),
                UnitType::PolymorphWarrior => (85, 60),
                UnitType::EncapsulationShield => (100, 50),
                UnitType::AbstractionAgent => (45, 35),

                UnitType::ReflectionSpy => (30, 25),
                UnitType::CodeInjector => (70, 55),
                UnitType::DynamicDispatcher => (65, 50),

                UnitType::CoroutineArcher => (75, 65),
                UnitType::PromiseKnight => (90, 70),
                UnitType::DeadlockTrap => (40, 40),

                UnitType::LambdaSniper => (100, 80),
                UnitType::RecursiveBomb => (55, 50),
                UnitType::HigherOrderCommander => (80, 65),

                UnitType::ApiGateway => (70, 55),
                UnitType::WebsocketScout => (35, 30),
                UnitType::RestfulHealer => (70, 60),

                UnitType::CacheRunner => (25, 20),
                UnitType::Indexer => (50, 45),
                UnitType::TransactionGuard => (75, 60),
            },
        }
    }
}

/// Composition of the starting deck: card kind and number of copies.
pub const DEFAULT_DECK: &[(CardKind, usize)] = &[
    (CardKind::Spawn(UnitType::Scout), 1),
    (CardKind::Spawn(UnitType::Tank), 1),
    (CardKind::Spawn(UnitType::Ranged), 1),
    (CardKind::Spawn(UnitType::Allocator), 2),
    (CardKind::Spawn(UnitType::GarbageCollector), 1),
    (CardKind::Spawn(UnitType::BasicProcess), 2),
    (CardKind::Spawn(UnitType::InheritanceDrone), 1),
    (CardKind::Spawn(UnitType::PolymorphWarrior), 1),
    (CardKind::Spawn(UnitType::EncapsulationShield), 1),
    (CardKind::Spawn(UnitType::AbstractionAgent), 1),
    (CardKind::Spawn(UnitType::ReflectionSpy), 1),
    (CardKind::Spawn(UnitType::CodeInjector), 1),
    (CardKind::Spawn(UnitType::DynamicDispatcher), 1),
    (CardKind::Spawn(UnitType::CoroutineArcher), 1),
    (CardKind::Spawn(UnitType::PromiseKnight), 1),
    (CardKind::Spawn(UnitType::DeadlockTrap), 1),
    (CardKind::Spawn(UnitType::LambdaSniper), 1),
    (CardKind::Spawn(UnitType::RecursiveBomb), 1),
    (CardKind::Spawn(UnitType::HigherOrderCommander), 1),
    (CardKind::Spawn(UnitType::ApiGateway), 1),
    (CardKind::Spawn(UnitType::WebsocketScout), 1),
    (CardKind::Spawn(UnitType::RestfulHealer), 1),
    (CardKind::Spawn(UnitType::CacheRunner), 1),
    (CardKind::Spawn(UnitType::Indexer), 1),
    (CardKind::Spawn(UnitType::TransactionGuard), 1),
    (CardKind::BuildFactory, 1),
];
