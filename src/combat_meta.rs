//! Combat metadata store
//!
//! Plain key-value maps filled by the content loaders and read by combat
//! resolution. Nothing here is computed lazily; an unknown key reads as the
//! default. Attack positions are limited to `0..=MAX_ATTACK_INDEX`.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::drops::CreatureId;

/// Highest valid attack position of a creature
pub const MAX_ATTACK_INDEX: u8 = 7;

/// One attack slot of one creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackKey {
    pub creature_id: CreatureId,
    pub attack_index: u8,
}

impl AttackKey {
    /// `None` when the position is outside `0..=7`
    pub fn new(creature_id: CreatureId, attack_index: i32) -> Option<Self> {
        u8::try_from(attack_index)
            .ok()
            .filter(|index| *index <= MAX_ATTACK_INDEX)
            .map(|attack_index| Self {
                creature_id,
                attack_index,
            })
    }
}

/// One level of one skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillKey {
    pub skill_id: i32,
    pub level: i32,
}

/// MP cost and cooldown of a creature attack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackCost {
    pub mp_cost: i32,
    /// Cooldown in milliseconds
    pub cooldown: i32,
}

#[derive(Default)]
pub struct CombatMetadataStore {
    attack_animation: RwLock<HashMap<AttackKey, i32>>,
    skill_animation: RwLock<HashMap<SkillKey, i32>>,
    attack_cost: RwLock<HashMap<AttackKey, AttackCost>>,
}

impl CombatMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attack_animation_time(&self, creature_id: CreatureId, attack_index: i32, millis: i32) {
        match AttackKey::new(creature_id, attack_index) {
            Some(key) => {
                self.attack_animation.write().insert(key, millis);
            }
            None => warn!(creature_id, attack_index, "Attack animation position out of range"),
        }
    }

    /// Animation length of an attack, 0 when unknown
    pub fn attack_animation_time(&self, creature_id: CreatureId, attack_index: i32) -> i32 {
        AttackKey::new(creature_id, attack_index)
            .and_then(|key| self.attack_animation.read().get(&key).copied())
            .unwrap_or(0)
    }

    pub fn set_skill_animation_time(&self, skill_id: i32, level: i32, millis: i32) {
        self.skill_animation
            .write()
            .insert(SkillKey { skill_id, level }, millis);
    }

    /// Animation length of a skill level, 0 when unknown
    pub fn skill_animation_time(&self, skill_id: i32, level: i32) -> i32 {
        self.skill_animation
            .read()
            .get(&SkillKey { skill_id, level })
            .copied()
            .unwrap_or(0)
    }

    pub fn set_attack_info(&self, creature_id: CreatureId, attack_index: i32, mp_cost: i32, cooldown: i32) {
        match AttackKey::new(creature_id, attack_index) {
            Some(key) => {
                self.attack_cost
                    .write()
                    .insert(key, AttackCost { mp_cost, cooldown });
            }
            None => warn!(creature_id, attack_index, "Attack info position out of range"),
        }
    }

    pub fn attack_info(&self, creature_id: CreatureId, attack_index: i32) -> Option<AttackCost> {
        let key = AttackKey::new(creature_id, attack_index)?;
        self.attack_cost.read().get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_key_range() {
        assert!(AttackKey::new(1, 0).is_some());
        assert!(AttackKey::new(1, 7).is_some());
        assert!(AttackKey::new(1, 8).is_none());
        assert!(AttackKey::new(1, -1).is_none());
        assert!(AttackKey::new(1, 300).is_none());
    }

    #[test]
    fn test_attack_animation() {
        let store = CombatMetadataStore::new();
        store.set_attack_animation_time(100_100, 0, 720);
        store.set_attack_animation_time(100_100, 1, 900);

        assert_eq!(store.attack_animation_time(100_100, 0), 720);
        assert_eq!(store.attack_animation_time(100_100, 1), 900);
        assert_eq!(store.attack_animation_time(100_100, 2), 0);
        assert_eq!(store.attack_animation_time(100_101, 0), 0);
    }

    #[test]
    fn test_out_of_range_positions() {
        let store = CombatMetadataStore::new();
        store.set_attack_animation_time(5, 8, 100);
        store.set_attack_info(5, -1, 10, 10);

        assert_eq!(store.attack_animation_time(5, 8), 0);
        assert_eq!(store.attack_info(5, -1), None);
        assert_eq!(store.attack_info(5, 9), None);
    }

    #[test]
    fn test_skill_animation() {
        let store = CombatMetadataStore::new();
        store.set_skill_animation_time(120, 3, 1500);

        assert_eq!(store.skill_animation_time(120, 3), 1500);
        assert_eq!(store.skill_animation_time(120, 4), 0);
    }

    #[test]
    fn test_attack_info_overwrite() {
        let store = CombatMetadataStore::new();
        store.set_attack_info(8_800_000, 3, 20, 5000);
        assert_eq!(
            store.attack_info(8_800_000, 3),
            Some(AttackCost { mp_cost: 20, cooldown: 5000 })
        );

        store.set_attack_info(8_800_000, 3, 25, 4000);
        assert_eq!(
            store.attack_info(8_800_000, 3),
            Some(AttackCost { mp_cost: 25, cooldown: 4000 })
        );
        assert_eq!(store.attack_info(8_800_000, 2), None);
    }
}
