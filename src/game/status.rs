//! Typed, time-windowed status effects.

use crate::game::types::{EffectKind, Entity, StatusEffect};

pub const SHIELD_MS: i64 = 2000;
pub const HIDE_MS: i64 = 3000;
pub const SCAN_MS: i64 = 5000;
pub const INFECTION_MS: i64 = 5000;
pub const BOOST_MS: i64 = 2000;
pub const DEADLOCK_MS: i64 = 3000;
pub const COMMAND_MS: i64 = 3000;
pub const RANGE_BOOST_MS: i64 = 4000;
pub const REVEAL_MS: i64 = 5000;
pub const INDEX_MS: i64 = 5000;

/// Hit points lost per income second while infected.
pub const INFECTION_DAMAGE: i32 = 4;
pub const RANGE_BOOST: f32 = 30.0;
pub const BOOST_ATTACK_SPEED: f32 = 1.5;

impl Entity {
    /// Attach `kind` until `now + duration_ms`, refreshing an existing record.
    pub fn apply_effect(&mut self, kind: EffectKind, now: i64, duration_ms: i64) {
        let expires_at = now + duration_ms;
        match self.effects.iter_mut().find(|e| e.kind == kind) {
            Some(existing) => existing.expires_at = existing.expires_at.max(expires_at),
            None => self.effects.push(StatusEffect { kind, expires_at }),
        }
    }

    pub fn has_effect(&self, kind: EffectKind, now: i64) -> bool {
        self.effects
            .iter()
            .any(|e| e.kind == kind && e.expires_at > now)
    }

    pub fn clear_effect(&mut self, kind: EffectKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Drop every record whose window has closed.
    pub fn expire_effects(&mut self, now: i64) {
        self.effects.retain(|e| e.expires_at > now);
    }

    /// Hidden entities cannot be picked as targets unless revealed.
    pub fn is_concealed(&self, now: i64) -> bool {
        self.has_effect(EffectKind::Hidden, now) && !self.has_effect(EffectKind::Revealed, now)
    }

    /// Movement speed after immobilising effects.
    pub fn effective_speed(&self, now: i64) -> f32 {
        if self.has_effect(EffectKind::Deadlocked, now) {
            0.0
        } else {
            self.speed
        }
    }
}
