//! Axis-aligned collision boxes and the per-entity overlap query.
//!
//! Each box is re-derived from its owner's position and size before every
//! query, so results never carry stale geometry across a tick.
//!
//! The query is **interval intersection with an inset margin**: an axis only
//! counts as overlapping when the two intervals share more than the inset
//! (2 units horizontally, 5 vertically by default). An actor standing on a
//! block therefore overlaps it horizontally but not vertically, so resting
//! contact never registers as a wall hit.
//!
//! Edge slots hold the contact line (`Some(coordinate)`) in the frame of the
//! box that ran the query. Within one query at most one vertical edge (top or
//! bottom) and one horizontal edge (left or right) can register.

use glam::Vec2;
use scroll_core::config::CollisionInset;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
}

impl Edges {
    pub fn any(&self) -> bool {
        self.top.is_some() || self.right.is_some() || self.bottom.is_some() || self.left.is_some()
    }

    /// The same contacts seen from the other box: our top is its bottom.
    pub fn mirrored(self) -> Self {
        Self {
            top: self.bottom,
            right: self.left,
            bottom: self.top,
            left: self.right,
        }
    }

    /// Per-slot OR. The first reported coordinate in a slot wins.
    pub fn merge(self, other: Self) -> Self {
        Self {
            top: self.top.or(other.top),
            right: self.right.or(other.right),
            bottom: self.bottom.or(other.bottom),
            left: self.left.or(other.left),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionResult {
    pub colliding: bool,
    pub edges: Edges,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionBox {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl CollisionBox {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        let mut aabb = Self::default();
        aabb.update(position, size);
        aabb
    }

    /// `position` is the bottom-left corner in y-up world space.
    pub fn update(&mut self, position: Vec2, size: Vec2) {
        self.left = position.x;
        self.right = position.x + size.x;
        self.bottom = position.y;
        self.top = position.y + size.y;
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left + self.width() / 2.0,
            self.bottom + self.height() / 2.0,
        )
    }

    pub fn overlaps_horizontally(&self, other: &Self, inset: f32) -> bool {
        self.left + inset < other.right && other.left + inset < self.right
    }

    pub fn overlaps_vertically(&self, other: &Self, inset: f32) -> bool {
        self.bottom + inset < other.top && other.bottom + inset < self.top
    }

    pub fn overlap(&self, other: &Self, inset: CollisionInset) -> CollisionResult {
        let mut result = CollisionResult::default();

        if self.overlaps_horizontally(other, inset.horizontal) {
            if self.top >= other.bottom && self.bottom < other.bottom {
                result.edges.top = Some(self.top);
            } else if self.bottom <= other.top && self.bottom > other.bottom {
                result.edges.bottom = Some(self.bottom);
            }
        }

        if self.overlaps_vertically(other, inset.vertical) {
            if self.left <= other.right && self.right > other.right {
                result.edges.left = Some(self.left);
            } else if self.right >= other.left && self.right < other.right {
                result.edges.right = Some(self.right);
            }
        }

        result.colliding = result.edges.any();
        result
    }

    /// World-space segments for every edge flagged in `edges`.
    pub fn edge_segments(&self, edges: &Edges) -> Vec<(Vec2, Vec2)> {
        let mut out = Vec::new();
        if edges.top.is_some() {
            out.push((
                Vec2::new(self.left, self.top),
                Vec2::new(self.right, self.top),
            ));
        }
        if edges.right.is_some() {
            out.push((
                Vec2::new(self.right, self.top),
                Vec2::new(self.right, self.bottom),
            ));
        }
        if edges.bottom.is_some() {
            out.push((
                Vec2::new(self.right, self.bottom),
                Vec2::new(self.left, self.bottom),
            ));
        }
        if edges.left.is_some() {
            out.push((
                Vec2::new(self.left, self.bottom),
                Vec2::new(self.left, self.top),
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(x: f32, y: f32, w: f32, h: f32) -> CollisionBox {
        CollisionBox::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    fn inset() -> CollisionInset {
        CollisionInset::default()
    }

    #[test]
    fn update_rederives_extents() {
        let mut b = aabb(0.0, 0.0, 16.0, 16.0);
        b.update(Vec2::new(32.0, 8.0), Vec2::new(16.0, 24.0));
        assert_eq!(b.left, 32.0);
        assert_eq!(b.right, 48.0);
        assert_eq!(b.bottom, 8.0);
        assert_eq!(b.top, 32.0);
        assert_eq!(b.center(), Vec2::new(40.0, 20.0));
    }

    #[test]
    fn actor_resting_on_block_hits_block_top_only() {
        let block = aabb(0.0, 0.0, 16.0, 16.0);
        let actor = aabb(2.0, 16.0, 16.0, 32.0);
        let result = block.overlap(&actor, inset());
        assert!(result.colliding);
        assert_eq!(result.edges.top, Some(16.0));
        assert_eq!(result.edges.bottom, None);
        assert_eq!(result.edges.left, None);
        assert_eq!(result.edges.right, None);
    }

    #[test]
    fn actor_bumping_from_below_hits_block_bottom() {
        let block = aabb(0.0, 64.0, 16.0, 16.0);
        let actor = aabb(0.0, 33.0, 16.0, 32.0);
        let result = block.overlap(&actor, inset());
        assert_eq!(result.edges.bottom, Some(64.0));
        assert_eq!(result.edges.top, None);
    }

    #[test]
    fn actor_walking_into_wall_hits_wall_left() {
        let wall = aabb(100.0, 0.0, 16.0, 64.0);
        let actor = aabb(85.0, 10.0, 16.0, 32.0);
        let result = wall.overlap(&actor, inset());
        assert_eq!(result.edges.left, Some(100.0));
        assert_eq!(result.edges.right, None);
        // One unit of penetration stays under the horizontal inset.
        assert_eq!(result.edges.top, None);
        assert_eq!(result.edges.bottom, None);
    }

    #[test]
    fn actor_walking_into_wall_from_right_hits_wall_right() {
        let wall = aabb(100.0, 0.0, 16.0, 64.0);
        let actor = aabb(115.0, 10.0, 16.0, 32.0);
        let result = wall.overlap(&actor, inset());
        assert_eq!(result.edges.right, Some(116.0));
        assert_eq!(result.edges.left, None);
    }

    #[test]
    fn grazing_corners_inside_inset_do_not_collide() {
        let block = aabb(0.0, 0.0, 16.0, 16.0);
        let actor = aabb(15.0, 14.0, 16.0, 32.0);
        let result = block.overlap(&actor, inset());
        assert!(!result.colliding);
        assert_eq!(result.edges, Edges::default());
    }

    #[test]
    fn disjoint_boxes_do_not_collide() {
        let block = aabb(0.0, 0.0, 16.0, 16.0);
        let actor = aabb(200.0, 200.0, 16.0, 32.0);
        assert!(!block.overlap(&actor, inset()).colliding);
    }

    #[test]
    fn detection_is_symmetric_per_axis() {
        let cases = [
            (aabb(0.0, 0.0, 16.0, 16.0), aabb(2.0, 16.0, 16.0, 32.0)),
            (aabb(100.0, 0.0, 16.0, 64.0), aabb(85.0, 10.0, 16.0, 32.0)),
            (aabb(0.0, 0.0, 16.0, 16.0), aabb(15.0, 14.0, 16.0, 32.0)),
            (aabb(-8.0, -8.0, 64.0, 8.0), aabb(0.0, -3.0, 8.0, 8.0)),
        ];
        let inset = inset();
        for (a, b) in cases {
            assert_eq!(
                a.overlaps_horizontally(&b, inset.horizontal),
                b.overlaps_horizontally(&a, inset.horizontal)
            );
            assert_eq!(
                a.overlaps_vertically(&b, inset.vertical),
                b.overlaps_vertically(&a, inset.vertical)
            );
        }
    }

    #[test]
    fn vertical_and_horizontal_edges_are_mutually_exclusive() {
        let inset = CollisionInset {
            horizontal: 0.0,
            vertical: 0.0,
        };
        let big = aabb(0.0, 0.0, 64.0, 64.0);
        for (x, y) in [(10.0, 10.0), (-5.0, 20.0), (60.0, 60.0), (20.0, -10.0)] {
            let small = aabb(x, y, 16.0, 16.0);
            let edges = big.overlap(&small, inset).edges;
            assert!(!(edges.top.is_some() && edges.bottom.is_some()));
            assert!(!(edges.left.is_some() && edges.right.is_some()));
        }
    }

    #[test]
    fn mirrored_swaps_opposite_edges() {
        let edges = Edges {
            top: Some(16.0),
            left: Some(100.0),
            ..Default::default()
        };
        let mirrored = edges.mirrored();
        assert_eq!(mirrored.bottom, Some(16.0));
        assert_eq!(mirrored.right, Some(100.0));
        assert_eq!(mirrored.top, None);
        assert_eq!(mirrored.left, None);
    }

    #[test]
    fn merge_keeps_first_reported_coordinate() {
        let a = Edges {
            bottom: Some(16.0),
            ..Default::default()
        };
        let b = Edges {
            bottom: Some(32.0),
            right: Some(90.0),
            ..Default::default()
        };
        let merged = a.merge(b);
        assert_eq!(merged.bottom, Some(16.0));
        assert_eq!(merged.right, Some(90.0));
        assert!(merged.any());
    }

    #[test]
    fn edge_segments_follow_flags() {
        let b = aabb(0.0, 0.0, 10.0, 20.0);
        let segments = b.edge_segments(&Edges {
            top: Some(20.0),
            left: Some(0.0),
            ..Default::default()
        });
        assert_eq!(
            segments,
            vec![
                (Vec2::new(0.0, 20.0), Vec2::new(10.0, 20.0)),
                (Vec2::new(0.0, 0.0), Vec2::new(0.0, 20.0)),
            ]
        );
    }
}
