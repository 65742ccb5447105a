//! Collision detection between the player and static entities
//!
//! Axis-aligned boxes only. A full scan per tick is plenty at this entity
//! count, and keeps the dispatch order stable.

use serde::{Deserialize, Serialize};

use super::entity::{Aabb, CollectibleKind, Entity, EntityId, EntityKind, SecretKind};

/// One overlap between the player and another entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    Collected { id: EntityId, kind: CollectibleKind },
    HazardHit { id: EntityId },
    SecretCollected { id: EntityId, kind: SecretKind },
}

/// AABB intersection test.
///
/// Boxes that only share an edge do not overlap: the separating test uses
/// `<=`, so a grazing touch is never a hit.
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let separated = a.max.x <= b.min.x
        || b.max.x <= a.min.x
        || a.max.y <= b.min.y
        || b.max.y <= a.min.y;
    !separated
}

/// Test the player box against every entity, in iteration order.
///
/// Each overlapping entity yields exactly one event; several may fire in the
/// same frame. Player entities in the input are skipped.
pub fn resolve_frame<'a>(
    player: &Aabb,
    entities: impl IntoIterator<Item = &'a Entity>,
) -> Vec<CollisionEvent> {
    entities
        .into_iter()
        .filter(|e| overlaps(player, &e.bbox()))
        .filter_map(|e| match e.kind {
            EntityKind::Player => None,
            EntityKind::Collectible(kind) => Some(CollisionEvent::Collected { id: e.id, kind }),
            EntityKind::Hazard => Some(CollisionEvent::HazardHit { id: e.id }),
            EntityKind::Secret(kind) => Some(CollisionEvent::SecretCollected { id: e.id, kind }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Anchor;
    use glam::IVec2;
    use proptest::prelude::*;

    fn boxed(x: i32, y: i32, w: i32, h: i32) -> Aabb {
        Aabb::from_corner(IVec2::new(x, y), IVec2::new(w, h))
    }

    fn placed(id: u32, kind: EntityKind, x: i32, y: i32) -> Entity {
        Entity {
            id: EntityId(id),
            kind,
            pos: IVec2::new(x, y),
            size: IVec2::new(50, 50),
            anchor: Anchor::TopLeft,
            visual: None,
        }
    }

    #[test]
    fn test_overlap_basic() {
        let a = boxed(0, 0, 50, 50);
        let b = boxed(25, 25, 50, 50);
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_shared_edge_is_not_overlap() {
        // a's right edge is x=50, b's left edge is x=50
        let a = boxed(0, 0, 50, 50);
        let b = boxed(50, 0, 50, 50);
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));

        // Same along y
        let c = boxed(0, 50, 50, 50);
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn test_one_pixel_in_is_overlap() {
        let a = boxed(0, 0, 50, 50);
        let b = boxed(49, 49, 50, 50);
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_containment_is_overlap() {
        let outer = boxed(0, 0, 100, 100);
        let inner = boxed(40, 40, 10, 10);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn test_resolve_frame_fires_all_overlaps() {
        let player = boxed(100, 100, 50, 50);
        let entities = [
            placed(1, EntityKind::Collectible(CollectibleKind::Trike), 120, 120),
            placed(2, EntityKind::Hazard, 90, 90),
            placed(3, EntityKind::Hazard, 400, 400),
            placed(4, EntityKind::Secret(SecretKind::A), 140, 100),
        ];

        let events = resolve_frame(&player, &entities);
        assert_eq!(
            events,
            vec![
                CollisionEvent::Collected {
                    id: EntityId(1),
                    kind: CollectibleKind::Trike
                },
                CollisionEvent::HazardHit { id: EntityId(2) },
                CollisionEvent::SecretCollected {
                    id: EntityId(4),
                    kind: SecretKind::A
                },
            ]
        );
    }

    #[test]
    fn test_resolve_frame_skips_player() {
        let player = boxed(0, 0, 50, 50);
        let entities = [placed(1, EntityKind::Player, 0, 0)];
        assert!(resolve_frame(&player, &entities).is_empty());
    }

    proptest! {
        #[test]
        fn overlaps_is_symmetric(
            ax in -500i32..500, ay in -500i32..500, aw in 1i32..200, ah in 1i32..200,
            bx in -500i32..500, by in -500i32..500, bw in 1i32..200, bh in 1i32..200
        ) {
            let a = boxed(ax, ay, aw, ah);
            let b = boxed(bx, by, bw, bh);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn edge_adjacent_boxes_never_overlap(
            x in -500i32..500, y in -500i32..500, w in 1i32..200, h in 1i32..200,
            other_w in 1i32..200, dy in -100i32..100
        ) {
            let a = boxed(x, y, w, h);
            let b = boxed(x + w, y + dy, other_w, h);
            prop_assert!(!overlaps(&a, &b));
        }
    }
}
