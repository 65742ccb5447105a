//! Entity registry: owns every live entity and the spawn/replenish policy
//!
//! Collectibles are replenished one-for-one so their population never
//! changes. Hazards are placed once per session. Each secret kind has at
//! most one live instance.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{
    Anchor, CollectibleKind, Entity, EntityId, EntityKind, SecretKind, VisualTable,
};
use crate::consts::*;
use crate::error::InvalidTransition;
use crate::viewport_center;

/// Sizes, populations and unlock thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub player_size: i32,
    pub collectible_size: i32,
    pub hazard_size: i32,
    pub secret_size: i32,
    pub collectible_count: usize,
    pub hazard_count: usize,
    /// Score needed before each secret may appear, indexed by `SecretKind::index`
    pub secret_thresholds: [u64; 2],
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            collectible_size: COLLECTIBLE_SIZE,
            hazard_size: HAZARD_SIZE,
            secret_size: SECRET_SIZE,
            collectible_count: COLLECTIBLE_COUNT,
            hazard_count: HAZARD_COUNT,
            secret_thresholds: [SECRET_A_THRESHOLD, SECRET_B_THRESHOLD],
        }
    }
}

impl RegistryConfig {
    pub fn threshold(&self, kind: SecretKind) -> u64 {
        self.secret_thresholds[kind.index()]
    }
}

/// Result of removing an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Despawned {
    pub removed: Entity,
    /// The collectible spawned to keep the population constant
    pub replacement: Option<Entity>,
}

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    config: RegistryConfig,
    viewport: IVec2,
    visuals: VisualTable,
    player: Entity,
    /// Live collectibles (spawn order)
    collectibles: Vec<Entity>,
    /// Hazards placed at session start
    hazards: Vec<Entity>,
    /// At most one live secret per kind
    secrets: [Option<Entity>; 2],
    next_id: u32,
}

impl EntityRegistry {
    /// Registry holding only the player, centered in the viewport
    pub fn new(config: RegistryConfig, viewport: IVec2, visuals: VisualTable) -> Self {
        let size = IVec2::splat(config.player_size);
        let player = Entity {
            id: EntityId(0),
            kind: EntityKind::Player,
            pos: viewport_center(viewport),
            size,
            anchor: Anchor::Center,
            visual: visuals.player,
        };
        Self {
            config,
            viewport,
            visuals,
            player,
            collectibles: Vec::with_capacity(config.collectible_count),
            hazards: Vec::with_capacity(config.hazard_count),
            secrets: [None, None],
            next_id: 1,
        }
    }

    /// Spawn the full collectible and hazard populations
    pub fn populate(&mut self, rng: &mut impl Rng) {
        while self.collectibles.len() < self.config.collectible_count {
            self.spawn_collectible(rng);
        }
        while self.hazards.len() < self.config.hazard_count {
            self.spawn_hazard(rng);
        }
        log::debug!(
            "Populated {} collectibles, {} hazards in {}x{}",
            self.collectibles.len(),
            self.hazards.len(),
            self.viewport.x,
            self.viewport.y
        );
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Uniform top-left corner keeping a `size` sprite inside the viewport
    fn random_corner(&self, size: i32, rng: &mut impl Rng) -> IVec2 {
        let max_x = (self.viewport.x - size).max(0);
        let max_y = (self.viewport.y - size).max(0);
        IVec2::new(rng.random_range(0..=max_x), rng.random_range(0..=max_y))
    }

    fn place(&mut self, kind: EntityKind, size: i32, rng: &mut impl Rng) -> Entity {
        let pos = self.random_corner(size, rng);
        Entity {
            id: self.next_entity_id(),
            kind,
            pos,
            size: IVec2::splat(size),
            anchor: Anchor::TopLeft,
            visual: self.visuals.for_kind(kind),
        }
    }

    /// Spawn a collectible of a uniformly chosen kind
    pub fn spawn_collectible(&mut self, rng: &mut impl Rng) -> Entity {
        let kind = CollectibleKind::ALL[rng.random_range(0..CollectibleKind::ALL.len())];
        self.spawn_collectible_of(kind, rng)
    }

    /// Spawn a collectible of the given kind at a random position
    pub fn spawn_collectible_of(&mut self, kind: CollectibleKind, rng: &mut impl Rng) -> Entity {
        let entity = self.place(
            EntityKind::Collectible(kind),
            self.config.collectible_size,
            rng,
        );
        self.collectibles.push(entity.clone());
        entity
    }

    /// Spawn a hazard at a random position
    pub fn spawn_hazard(&mut self, rng: &mut impl Rng) -> Entity {
        let entity = self.place(EntityKind::Hazard, self.config.hazard_size, rng);
        self.hazards.push(entity.clone());
        entity
    }

    /// Spawn a secret if the score has reached its threshold, it has not been
    /// collected this session, and none is live.
    pub fn try_spawn_secret(
        &mut self,
        kind: SecretKind,
        current_score: u64,
        already_collected: bool,
        rng: &mut impl Rng,
    ) -> Option<Entity> {
        if already_collected
            || current_score < self.config.threshold(kind)
            || self.secrets[kind.index()].is_some()
        {
            return None;
        }
        let entity = self.place(EntityKind::Secret(kind), self.config.secret_size, rng);
        self.secrets[kind.index()] = Some(entity.clone());
        log::info!("Secret {:?} unlocked at score {}", kind, current_score);
        Some(entity)
    }

    /// Remove a live entity. Collectibles are replaced immediately.
    pub fn despawn(
        &mut self,
        id: EntityId,
        rng: &mut impl Rng,
    ) -> Result<Despawned, InvalidTransition> {
        if let Some(idx) = self.collectibles.iter().position(|e| e.id == id) {
            let removed = self.collectibles.remove(idx);
            let replacement = self.spawn_collectible(rng);
            return Ok(Despawned {
                removed,
                replacement: Some(replacement),
            });
        }
        if let Some(idx) = self.hazards.iter().position(|e| e.id == id) {
            let removed = self.hazards.remove(idx);
            return Ok(Despawned {
                removed,
                replacement: None,
            });
        }
        for slot in self.secrets.iter_mut() {
            if slot.as_ref().is_some_and(|e| e.id == id) {
                if let Some(removed) = slot.take() {
                    return Ok(Despawned {
                        removed,
                        replacement: None,
                    });
                }
            }
        }
        Err(InvalidTransition::UnknownEntity(id))
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    /// Shift the player by `delta` (unclamped)
    pub fn move_player(&mut self, delta: IVec2) {
        self.player.pos += delta;
    }

    /// Push the player back inside the viewport. Returns true if it moved.
    pub fn clamp_player(&mut self) -> bool {
        let bbox = self.player.bbox();
        let mut shift = IVec2::ZERO;
        if bbox.min.x < 0 {
            shift.x = -bbox.min.x;
        } else if bbox.max.x > self.viewport.x {
            shift.x = self.viewport.x - bbox.max.x;
        }
        if bbox.min.y < 0 {
            shift.y = -bbox.min.y;
        } else if bbox.max.y > self.viewport.y {
            shift.y = self.viewport.y - bbox.max.y;
        }
        self.player.pos += shift;
        shift != IVec2::ZERO
    }

    /// Put the player back at the viewport center
    pub fn reset_player(&mut self) {
        self.player.pos = viewport_center(self.viewport);
    }

    pub fn collectibles(&self) -> &[Entity] {
        &self.collectibles
    }

    pub fn hazards(&self) -> &[Entity] {
        &self.hazards
    }

    pub fn secret(&self, kind: SecretKind) -> Option<&Entity> {
        self.secrets[kind.index()].as_ref()
    }

    /// Everything the player can collide with: collectibles, hazards, secrets
    pub fn collision_targets(&self) -> impl Iterator<Item = &Entity> {
        self.collectibles
            .iter()
            .chain(self.hazards.iter())
            .chain(self.secrets.iter().flatten())
    }

    /// Every live entity including the player
    pub fn all(&self) -> impl Iterator<Item = &Entity> {
        std::iter::once(&self.player).chain(self.collision_targets())
    }

    pub fn viewport(&self) -> IVec2 {
        self.viewport
    }

    pub fn visuals(&self) -> &VisualTable {
        &self.visuals
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn registry() -> (EntityRegistry, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut reg = EntityRegistry::new(
            RegistryConfig::default(),
            IVec2::new(800, 600),
            VisualTable::default(),
        );
        reg.populate(&mut rng);
        (reg, rng)
    }

    #[test]
    fn test_populate_counts() {
        let (reg, _) = registry();
        assert_eq!(reg.collectibles().len(), 10);
        assert_eq!(reg.hazards().len(), 10);
        assert!(reg.secret(SecretKind::A).is_none());
        assert!(reg.secret(SecretKind::B).is_none());
        assert_eq!(reg.player().pos, IVec2::new(400, 300));
    }

    #[test]
    fn test_spawns_stay_in_bounds() {
        let (mut reg, mut rng) = registry();
        for _ in 0..500 {
            let e = reg.spawn_collectible(&mut rng);
            let bbox = e.bbox();
            assert!(bbox.min.x >= 0 && bbox.min.y >= 0);
            assert!(bbox.max.x <= 800 && bbox.max.y <= 600);
        }
    }

    #[test]
    fn test_tiny_viewport_pins_to_origin() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut reg = EntityRegistry::new(
            RegistryConfig::default(),
            IVec2::new(20, 20),
            VisualTable::default(),
        );
        let e = reg.spawn_hazard(&mut rng);
        assert_eq!(e.pos, IVec2::ZERO);
    }

    #[test]
    fn test_despawn_collectible_replenishes() {
        let (mut reg, mut rng) = registry();
        for _ in 0..30 {
            let id = reg.collectibles()[0].id;
            let out = reg.despawn(id, &mut rng).unwrap();
            assert_eq!(out.removed.id, id);
            let replacement = out.replacement.unwrap();
            assert_ne!(replacement.id, id);
            assert_eq!(reg.collectibles().len(), 10);
            assert!(reg.collectibles().iter().all(|e| e.id != id));
        }
    }

    #[test]
    fn test_despawn_hazard_not_replaced() {
        let (mut reg, mut rng) = registry();
        let id = reg.hazards()[3].id;
        let out = reg.despawn(id, &mut rng).unwrap();
        assert!(out.replacement.is_none());
        assert_eq!(reg.hazards().len(), 9);
    }

    #[test]
    fn test_despawn_unknown_is_error() {
        let (mut reg, mut rng) = registry();
        assert_eq!(
            reg.despawn(EntityId(9999), &mut rng),
            Err(InvalidTransition::UnknownEntity(EntityId(9999)))
        );
        assert_eq!(reg.collectibles().len(), 10);
    }

    #[test]
    fn test_secret_threshold_and_single_instance() {
        let (mut reg, mut rng) = registry();
        assert!(reg.try_spawn_secret(SecretKind::A, 999, false, &mut rng).is_none());
        let secret = reg.try_spawn_secret(SecretKind::A, 1000, false, &mut rng);
        assert!(secret.is_some());
        // Already live
        assert!(reg.try_spawn_secret(SecretKind::A, 5000, false, &mut rng).is_none());
        // B has its own, higher threshold
        assert!(reg.try_spawn_secret(SecretKind::B, 5000, false, &mut rng).is_none());
        assert!(reg.try_spawn_secret(SecretKind::B, 10_000, false, &mut rng).is_some());
    }

    #[test]
    fn test_collected_secret_never_respawns() {
        let (mut reg, mut rng) = registry();
        let secret = reg
            .try_spawn_secret(SecretKind::A, 1000, false, &mut rng)
            .unwrap();
        reg.despawn(secret.id, &mut rng).unwrap();
        assert!(reg.secret(SecretKind::A).is_none());
        assert!(reg.try_spawn_secret(SecretKind::A, 50_000, true, &mut rng).is_none());
    }

    #[test]
    fn test_clamp_player() {
        let (mut reg, _) = registry();
        reg.move_player(IVec2::new(-1000, 0));
        assert!(reg.clamp_player());
        assert_eq!(reg.player().bbox().min.x, 0);

        reg.move_player(IVec2::new(0, 1000));
        assert!(reg.clamp_player());
        assert_eq!(reg.player().bbox().max.y, 600);

        assert!(!reg.clamp_player());
        reg.reset_player();
        assert_eq!(reg.player().pos, IVec2::new(400, 300));
    }

    #[test]
    fn test_collision_targets_order() {
        let (mut reg, mut rng) = registry();
        reg.try_spawn_secret(SecretKind::A, 1000, false, &mut rng);
        let kinds: Vec<_> = reg.collision_targets().map(|e| e.kind).collect();
        assert_eq!(kinds.len(), 21);
        assert!(matches!(kinds[0], EntityKind::Collectible(_)));
        assert_eq!(kinds[10], EntityKind::Hazard);
        assert_eq!(kinds[20], EntityKind::Secret(SecretKind::A));
        assert_eq!(reg.all().count(), 22);
    }
}
