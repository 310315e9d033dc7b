//! Axis-aligned box collision primitive.
//!
//! The sole collision shape in the game is the AABB; everything else
//! (axis-separated resolution, stomp directionality) is built on this one
//! strict-inequality overlap test.

use glam::Vec2;

/// Two boxes overlap iff each one's near edge is strictly before the other's
/// far edge on both axes. Boxes sharing only an edge do not collide.
pub fn check_collision(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes_collide() {
        assert!(check_collision(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(10.0, 10.0),
        ));
    }

    #[test]
    fn separated_boxes_do_not_collide() {
        assert!(!check_collision(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(10.0, 10.0),
        ));
    }

    #[test]
    fn symmetry() {
        let cases = [
            (Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0), Vec2::new(3.0, 3.0)),
            (Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(50.0, 5.0), Vec2::new(3.0, 3.0)),
            (Vec2::new(-5.0, -5.0), Vec2::new(10.0, 10.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)),
        ];
        for (ap, asz, bp, bsz) in cases {
            assert_eq!(
                check_collision(ap, asz, bp, bsz),
                check_collision(bp, bsz, ap, asz),
            );
        }
    }

    #[test]
    fn touching_edges_do_not_collide() {
        // Right edge of A exactly on left edge of B
        assert!(!check_collision(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ));
        // Bottom edge of A exactly on top edge of B
        assert!(!check_collision(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
        ));
    }

    #[test]
    fn containment_collides() {
        assert!(check_collision(
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(40.0, 40.0),
            Vec2::new(5.0, 5.0),
        ));
    }
}
