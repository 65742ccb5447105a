//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only, timing measured in ticks
//! - Injected RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod input;
pub mod life;
pub mod progression;
pub mod registry;
pub mod schedule;
pub mod session;

pub use collision::{CollisionEvent, overlaps, resolve_frame};
pub use entity::{
    Aabb, Anchor, CollectibleKind, Entity, EntityId, EntityKind, SecretKind, VisualId,
    VisualTable,
};
pub use input::{Direction, InputAction, InputState, Key};
pub use life::{DeathOutcome, LifePhase, LifeState};
pub use progression::{
    CollectedCounts, ScoreRules, ScoreState, SecretPossession, SecretsHeld, speed_multiplier,
};
pub use registry::{Despawned, EntityRegistry, RegistryConfig};
pub use schedule::{DeferredAction, Scheduler};
pub use session::{DEATH_MESSAGES, GameSession, RestartToken, TickReport};
