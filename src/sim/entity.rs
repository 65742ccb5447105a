//! Spatial entity model
//!
//! Pure data: positioned, sized game objects. Behavior lives in the registry,
//! the collision resolver and the session.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Opaque handle to a visual owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualId(pub u32);

/// The three dino collectibles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollectibleKind {
    Rex,
    Trike,
    Bronto,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 3] = [
        CollectibleKind::Rex,
        CollectibleKind::Trike,
        CollectibleKind::Bronto,
    ];

    /// Stable index into per-kind tables (bag slots, visuals)
    pub fn index(self) -> usize {
        match self {
            CollectibleKind::Rex => 0,
            CollectibleKind::Trike => 1,
            CollectibleKind::Bronto => 2,
        }
    }
}

/// The two rare collectibles unlocked by score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecretKind {
    A,
    B,
}

impl SecretKind {
    pub const ALL: [SecretKind; 2] = [SecretKind::A, SecretKind::B];

    pub fn index(self) -> usize {
        match self {
            SecretKind::A => 0,
            SecretKind::B => 1,
        }
    }

    /// Text revealed when the held secret is opened from the bag
    pub fn message(self) -> &'static str {
        match self {
            SecretKind::A => {
                "This secret is still being written. Check back when it's ready.\n\
                 The second secret hints at why."
            }
            SecretKind::B => "Both secrets are on hold until the story is finished.",
        }
    }
}

/// What an entity is. Drives collision dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Collectible(CollectibleKind),
    Hazard,
    Secret(SecretKind),
}

/// Which point of the sprite `pos` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// `pos` is the sprite center (the player)
    Center,
    /// `pos` is the top-left corner (everything placed at random)
    TopLeft,
}

/// Axis-aligned bounding box, `min` inclusive corner, `max` exclusive corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: IVec2,
    pub max: IVec2,
}

impl Aabb {
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left corner and a size
    pub fn from_corner(corner: IVec2, size: IVec2) -> Self {
        Self {
            min: corner,
            max: corner + size,
        }
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        self.max - self.min
    }
}

/// A positioned, sized game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: IVec2,
    pub size: IVec2,
    pub anchor: Anchor,
    /// Missing visuals are tolerated: the entity still collides and scores.
    pub visual: Option<VisualId>,
}

impl Entity {
    /// Bounding box derived from position, size and anchor
    pub fn bbox(&self) -> Aabb {
        match self.anchor {
            Anchor::TopLeft => Aabb::from_corner(self.pos, self.size),
            Anchor::Center => Aabb::from_corner(self.pos - self.size / 2, self.size),
        }
    }
}

/// Visual handles resolved once per session by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualTable {
    pub player: Option<VisualId>,
    pub collectibles: [Option<VisualId>; 3],
    pub hazard: Option<VisualId>,
    pub secrets: [Option<VisualId>; 2],
}

impl VisualTable {
    pub fn for_kind(&self, kind: EntityKind) -> Option<VisualId> {
        match kind {
            EntityKind::Player => self.player,
            EntityKind::Collectible(c) => self.collectibles[c.index()],
            EntityKind::Hazard => self.hazard,
            EntityKind::Secret(s) => self.secrets[s.index()],
        }
    }
}
