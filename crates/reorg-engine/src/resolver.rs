//! Drop-target resolution.
//!
//! Given the pointer position and the set of geometrically-overlapping
//! drop candidates, pick exactly one authoritative target. A compact node
//! card visually contains its own drop zone as a child region; naive
//! rectangle collision would report both, and the engine must never ask
//! "did you mean the card, or its declared zone?" - the explicit zone
//! always wins.
//!
//! This is a pure function of `(pointer, candidates)`: O(candidates) per
//! pointer event, no tree walks, no rendering machinery.

use serde::{Deserialize, Serialize};

use org_console_types::{AssemblyId, NodeId};

use crate::geometry::{Rect, Vec2};

/// What a successful drop would reparent onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum DropTarget {
    /// Make the dragged node a root of this Assembly.
    Assembly(AssemblyId),
    /// Make the dragged node a child of this node.
    Node(NodeId),
}

/// Confidence tier of a candidate region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Affordance {
    /// Declared drop zone: unambiguous reparent intent.
    ExplicitZone,
    /// A draggable node's own body: implicit, lower-confidence target.
    NodeBody,
}

/// One geometrically-overlapping drop candidate, as reported by the
/// rendering layer's collision pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropCandidate {
    pub target: DropTarget,
    pub affordance: Affordance,
    pub bounds: Rect,
}

/// Pick at most one winning candidate.
///
/// Priority order, first non-empty tier wins:
/// 1. candidates whose bounds contain the pointer itself; if none, fall
///    back to the full (bounding-box overlap) candidate list;
/// 2. explicit zones over node bodies;
/// 3. first in traversal order. Ties are not expected in practice because
///    zones are spatially disjoint, but determinism matters for tests.
pub fn resolve_drop_target<'a>(
    pointer: Vec2,
    candidates: &'a [DropCandidate],
) -> Option<&'a DropCandidate> {
    let contained: Vec<&DropCandidate> = candidates
        .iter()
        .filter(|c| c.bounds.contains(pointer))
        .collect();

    let pool: Vec<&DropCandidate> = if contained.is_empty() {
        candidates.iter().collect()
    } else {
        contained
    };

    pool.iter()
        .find(|c| c.affordance == Affordance::ExplicitZone)
        .or_else(|| pool.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn zone(target: DropTarget, min: (f32, f32), size: (f32, f32)) -> DropCandidate {
        DropCandidate {
            target,
            affordance: Affordance::ExplicitZone,
            bounds: Rect::from_min_size(Vec2::new(min.0, min.1), size.0, size.1),
        }
    }

    fn body(id: i64, min: (f32, f32), size: (f32, f32)) -> DropCandidate {
        DropCandidate {
            target: DropTarget::Node(NodeId(id)),
            affordance: Affordance::NodeBody,
            bounds: Rect::from_min_size(Vec2::new(min.0, min.1), size.0, size.1),
        }
    }

    #[test]
    fn test_empty_candidates_resolve_to_nothing() {
        assert!(resolve_drop_target(Vec2::new(5.0, 5.0), &[]).is_none());
    }

    #[test]
    fn test_nested_zone_beats_containing_body() {
        // A node card whose embedded "add child" zone also intersects the
        // pointer - the classic double-hit.
        let card = body(1, (0.0, 0.0), (100.0, 40.0));
        let embedded = zone(DropTarget::Node(NodeId(1)), (60.0, 10.0), (30.0, 20.0));
        let candidates = [card, embedded];

        let winner = resolve_drop_target(Vec2::new(70.0, 20.0), &candidates).unwrap();
        assert_eq!(winner.affordance, Affordance::ExplicitZone);
    }

    #[test]
    fn test_pointer_containment_restricts_the_pool() {
        // Pointer sits inside the body only; the far-away zone overlapped
        // the dragged rect but not the pointer, so the body wins.
        let far_zone = zone(DropTarget::Assembly(AssemblyId(9)), (200.0, 0.0), (50.0, 20.0));
        let under_pointer = body(1, (0.0, 0.0), (100.0, 40.0));
        let candidates = [far_zone, under_pointer];

        let winner = resolve_drop_target(Vec2::new(10.0, 10.0), &candidates).unwrap();
        assert_eq!(winner.target, DropTarget::Node(NodeId(1)));
    }

    #[test]
    fn test_bounding_box_fallback_when_pointer_misses_everything() {
        let card = body(1, (0.0, 0.0), (100.0, 40.0));
        let candidates = [card];

        // Candidate list is non-empty (rect overlap) but the pointer is
        // outside every rect: fall back to the overlap pool.
        let winner = resolve_drop_target(Vec2::new(500.0, 500.0), &candidates).unwrap();
        assert_eq!(winner.target, DropTarget::Node(NodeId(1)));
    }

    #[test]
    fn test_first_zone_wins_among_multiple() {
        let a = zone(DropTarget::Node(NodeId(1)), (0.0, 0.0), (50.0, 50.0));
        let b = zone(DropTarget::Node(NodeId(2)), (0.0, 0.0), (50.0, 50.0));
        let candidates = [a, b];

        let winner = resolve_drop_target(Vec2::new(25.0, 25.0), &candidates).unwrap();
        assert_eq!(winner.target, DropTarget::Node(NodeId(1)));
    }

    proptest! {
        /// Same inputs, same winner - the resolver holds no state.
        #[test]
        fn prop_resolution_is_deterministic(
            px in -50.0f32..150.0,
            py in -50.0f32..150.0,
            rects in prop::collection::vec(
                ((-50.0f32..100.0, -50.0f32..100.0), (1.0f32..80.0, 1.0f32..80.0), any::<bool>()),
                0..8,
            ),
        ) {
            let candidates: Vec<DropCandidate> = rects
                .iter()
                .enumerate()
                .map(|(i, ((x, y), (w, h), is_zone))| DropCandidate {
                    target: DropTarget::Node(NodeId(i as i64)),
                    affordance: if *is_zone { Affordance::ExplicitZone } else { Affordance::NodeBody },
                    bounds: Rect::from_min_size(Vec2::new(*x, *y), *w, *h),
                })
                .collect();
            let pointer = Vec2::new(px, py);

            let first = resolve_drop_target(pointer, &candidates).copied();
            let second = resolve_drop_target(pointer, &candidates).copied();
            prop_assert_eq!(first, second);
        }

        /// If any explicit zone contains the pointer, no node body can win.
        #[test]
        fn prop_zone_under_pointer_always_beats_bodies(
            px in 0.0f32..100.0,
            py in 0.0f32..100.0,
            rects in prop::collection::vec(
                ((-50.0f32..100.0, -50.0f32..100.0), (1.0f32..80.0, 1.0f32..80.0), any::<bool>()),
                1..8,
            ),
        ) {
            let candidates: Vec<DropCandidate> = rects
                .iter()
                .enumerate()
                .map(|(i, ((x, y), (w, h), is_zone))| DropCandidate {
                    target: DropTarget::Node(NodeId(i as i64)),
                    affordance: if *is_zone { Affordance::ExplicitZone } else { Affordance::NodeBody },
                    bounds: Rect::from_min_size(Vec2::new(*x, *y), *w, *h),
                })
                .collect();
            let pointer = Vec2::new(px, py);

            let zone_contains_pointer = candidates.iter().any(|c| {
                c.affordance == Affordance::ExplicitZone && c.bounds.contains(pointer)
            });
            if zone_contains_pointer {
                let winner = resolve_drop_target(pointer, &candidates).unwrap();
                prop_assert_eq!(winner.affordance, Affordance::ExplicitZone);
            }
        }
    }
}
