use crate::error::UnknownCardKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type EntityId = Uuid;
pub type PlayerId = Uuid;
pub type CardId = Uuid;

/// Top-level entity variant, serialized as the entity's `type`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Instance,
    Factory,
    Unit,
    ResourceNode,
}

impl EntityKind {
    /// Enemy ranking used by target selection, lower is preferred.
    pub fn target_priority(self) -> u8 {
        match self {
            EntityKind::Unit => 1,
            EntityKind::Factory => 2,
            EntityKind::Instance => 3,
            EntityKind::ResourceNode => 4,
        }
    }

    /// Kinds a unit will stop and fire at once in range.
    pub fn is_attackable(self) -> bool {
        matches!(self, EntityKind::Unit | EntityKind::Instance)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Memory,
    Cpu,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiState {
    #[default]
    Idle,
    MovingToTarget,
    Attacking,
}

/// The 26 combat unit kinds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    Scout,
    Tank,
    Ranged,
    Healer,

    Allocator,
    GarbageCollector,
    BasicProcess,

    InheritanceDrone,
    PolymorphWarrior,
    EncapsulationShield,
    AbstractionAgent,

    ReflectionSpy,
    CodeInjector,
    DynamicDispatcher,

    CoroutineArcher,
    PromiseKnight,
    DeadlockTrap,

    LambdaSniper,
    RecursiveBomb,
    HigherOrderCommander,

    ApiGateway,
    WebsocketScout,
    RestfulHealer,

    CacheRunner,
    Indexer,
    TransactionGuard,
}

impl UnitType {
    pub const ALL: [UnitType; 26] = [
        UnitType::Scout,
        UnitType::Tank,
        UnitType::Ranged,
        UnitType::Healer,
        UnitType::Allocator,
        UnitType::GarbageCollector,
        UnitType::BasicProcess,
        UnitType::InheritanceDrone,
        UnitType::PolymorphWarrior,
        UnitType::EncapsulationShield,
        UnitType::AbstractionAgent,
        UnitType::ReflectionSpy,
        UnitType::CodeInjector,
        UnitType::DynamicDispatcher,
        UnitType::CoroutineArcher,
        UnitType::PromiseKnight,
        UnitType::DeadlockTrap,
        UnitType::LambdaSniper,
        UnitType::RecursiveBomb,
        UnitType::HigherOrderCommander,
        UnitType::ApiGateway,
        UnitType::WebsocketScout,
        UnitType::RestfulHealer,
        UnitType::CacheRunner,
        UnitType::Indexer,
        UnitType::TransactionGuard,
    ];

    /// Wire name, identical to the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::Scout => "SCOUT",
            UnitType::Tank => "TANK",
            UnitType::Ranged => "RANGED",
            UnitType::Healer => "HEALER",
            UnitType::Allocator => "ALLOCATOR",
            UnitType::GarbageCollector => "GARBAGE_COLLECTOR",
            UnitType::BasicProcess => "BASIC_PROCESS",
            UnitType::InheritanceDrone => "INHERITANCE_DRONE",
            UnitType::PolymorphWarrior => "POLYMORPH_WARRIOR",
            UnitType::EncapsulationShield => "ENCAPSULATION_SHIELD",
            UnitType::AbstractionAgent => "ABSTRACTION_AGENT",
            UnitType::ReflectionSpy => "REFLECTION_SPY",
            UnitType::CodeInjector => "CODE_INJECTOR",
            UnitType::DynamicDispatcher => "DYNAMIC_DISPATCHER",
            UnitType::CoroutineArcher => "COROUTINE_ARCHER",
            UnitType::PromiseKnight => "PROMISE_KNIGHT",
            UnitType::DeadlockTrap => "DEADLOCK_TRAP",
            UnitType::LambdaSniper => "LAMBDA_SNIPER",
            UnitType::RecursiveBomb => "RECURSIVE_BOMB",
            UnitType::HigherOrderCommander => "HIGHER_ORDER_COMMANDER",
            UnitType::ApiGateway => "API_GATEWAY",
            UnitType::WebsocketScout => "WEBSOCKET_SCOUT",
            UnitType::RestfulHealer => "RESTFUL_HEALER",
            UnitType::CacheRunner => "CACHE_RUNNER",
            UnitType::Indexer => "INDEXER",
            UnitType::TransactionGuard => "TRANSACTION_GUARD",
        }
    }

    /// Collectors always head for a capturable node when one exists.
    pub fn is_collector(self) -> bool {
        matches!(self, UnitType::Allocator | UnitType::CacheRunner)
    }
}

/// Time-windowed effect carried by an entity.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    Shielded,
    Hidden,
    Scanned,
    Infected,
    Boosted,
    Deadlocked,
    Commanded,
    RangeBoosted,
    Revealed,
    Indexed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Absolute server time (ms) at which the effect stops applying.
    pub expires_at: i64,
}

/// One simulated object. Targets are held by id and re-resolved every tick.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    /// `None` is neutral.
    pub owner_id: Option<PlayerId>,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: f32,

    pub target_x: Option<f32>,
    pub target_y: Option<f32>,

    pub unit_type: Option<UnitType>,
    pub resource_type: Option<ResourceKind>,
    pub resource_amount: i32,

    pub ai_state: AiState,
    pub target_enemy_id: Option<EntityId>,
    pub attacking_target_id: Option<EntityId>,
    pub last_attack_time: i64,
    pub last_ability_time: i64,

    /// Base damage per hit; copied from the stats table on spawn.
    pub damage: i32,
    /// Split depth for recursive units, 0 for everything else.
    pub generation: u8,
    pub effects: Vec<StatusEffect>,
}

impl Entity {
    fn base(kind: EntityKind, x: f32, y: f32, owner_id: Option<PlayerId>, hp: i32) -> Self {
        Entity {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            owner_id,
            hp,
            max_hp: hp,
            speed: 100.0,
            target_x: None,
            target_y: None,
            unit_type: None,
            resource_type: None,
            resource_amount: 0,
            ai_state: AiState::Idle,
            target_enemy_id: None,
            attacking_target_id: None,
            last_attack_time: 0,
            last_ability_time: 0,
            damage: 0,
            generation: 0,
            effects: Vec::new(),
        }
    }

    pub fn instance(owner: PlayerId, x: f32, y: f32) -> Self {
        Entity {
            speed: 15.0,
            ..Entity::base(EntityKind::Instance, x, y, Some(owner), 1000)
        }
    }

    pub fn factory(owner: PlayerId, x: f32, y: f32) -> Self {
        Entity {
            speed: 35.0,
            ..Entity::base(EntityKind::Factory, x, y, Some(owner), 200)
        }
    }

    pub fn resource_node(kind: ResourceKind, x: f32, y: f32) -> Self {
        Entity {
            resource_type: Some(kind),
            resource_amount: 1000,
            ..Entity::base(EntityKind::ResourceNode, x, y, None, 100)
        }
    }

    /// A combat unit carrying the table stats for `unit_type`.
    pub fn unit(owner: PlayerId, unit_type: UnitType, x: f32, y: f32) -> Self {
        let stats = unit_type.stats();
        Entity {
            speed: stats.speed,
            unit_type: Some(unit_type),
            damage: stats.damage,
            ..Entity::base(EntityKind::Unit, x, y, Some(owner), stats.max_hp)
        }
    }

    pub fn distance_to(&self, other: &Entity) -> f32 {
        self.distance_to_point(other.x, other.y)
    }

    pub fn distance_to_point(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_unit(&self) -> bool {
        self.kind == EntityKind::Unit
    }

    pub fn is_unit_of(&self, unit_type: UnitType) -> bool {
        self.unit_type == Some(unit_type)
    }
}

/// What a card does when played. On the wire it is a flat string:
/// `"SPAWN_<UNIT_TYPE>"` or `"BUILD_FACTORY"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub enum CardKind {
    Spawn(UnitType),
    BuildFactory,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardKind::Spawn(unit) => write!(f, "SPAWN_{}", unit.as_str()),
            CardKind::BuildFactory => f.write_str("BUILD_FACTORY"),
        }
    }
}

impl From<CardKind> for String {
    fn from(kind: CardKind) -> Self {
        kind.to_string()
    }
}

impl TryFrom<String> for CardKind {
    type Error = UnknownCardKind;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if raw == "BUILD_FACTORY" {
            return Ok(CardKind::BuildFactory);
        }
        raw.strip_prefix("SPAWN_")
            .and_then(|name| UnitType::ALL.into_iter().find(|u| u.as_str() == name))
            .map(CardKind::Spawn)
            .ok_or(UnknownCardKind(raw))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    #[serde(rename = "type")]
    pub kind: CardKind,
    pub memory_cost: i32,
    pub cpu_cost: i32,
}

impl Card {
    pub fn new(kind: CardKind) -> Self {
        let (memory_cost, cpu_cost) = kind.cost();
        Card {
            id: Uuid::new_v4(),
            kind,
            memory_cost,
            cpu_cost,
        }
    }
}

/// One connected player.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub memory: i32,
    pub cpu: i32,
    pub deck: Vec<Card>,
    pub hand: Vec<Card>,
    pub discard_pile: Vec<Card>,
    /// Seconds until another card may be played.
    pub global_cooldown: f32,
}

impl PlayerState {
    pub fn new(id: PlayerId, name: String, memory: i32, cpu: i32) -> Self {
        PlayerState {
            id,
            name,
            memory,
            cpu,
            deck: Vec::new(),
            hand: Vec::new(),
            discard_pile: Vec::new(),
            global_cooldown: 0.0,
        }
    }

    pub fn can_afford(&self, card: &Card) -> bool {
        self.memory >= card.memory_cost && self.cpu >= card.cpu_cost
    }
}
