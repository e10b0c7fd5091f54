//! Fighter kinematics: gravity, integration, ground contact and arena walls
//!
//! All quantities are per tick at [`SIMULATION_TPS`](crate::util::time::SIMULATION_TPS);
//! the step is fixed so no delta-time scaling is applied.

use serde::{Deserialize, Serialize};

/// Horizontal facing of a fighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// +1.0 for right, -1.0 for left
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Axis-aligned rectangle in arena coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap test; rectangles that only touch edges do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Arena dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Y coordinate of the floor surface
    pub ground_level: f32,
    /// Distance from each side wall that fighters cannot enter
    pub wall_margin: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            ground_level: 480.0,
            wall_margin: 20.0,
        }
    }
}

impl Arena {
    pub fn min_x(&self) -> f32 {
        self.wall_margin
    }

    /// Rightmost x a body of `body_width` can occupy
    pub fn max_x(&self, body_width: f32) -> f32 {
        self.width - self.wall_margin - body_width
    }
}

/// Physics system for fighter movement
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Vertical velocity after one tick of gravity. Grounded bodies do not accelerate.
    pub fn apply_gravity(vel_y: f32, gravity: f32, grounded: bool) -> f32 {
        if grounded {
            vel_y
        } else {
            vel_y + gravity
        }
    }

    /// Integrate position by velocity over one tick
    /// Returns (new_x, new_y)
    pub fn integrate(x: f32, y: f32, vel_x: f32, vel_y: f32) -> (f32, f32) {
        (x + vel_x, y + vel_y)
    }

    /// Snapped y if the body's bottom edge has reached the floor
    pub fn ground_contact(y: f32, height: f32, ground_level: f32) -> Option<f32> {
        if y + height >= ground_level {
            Some(ground_level - height)
        } else {
            None
        }
    }

    /// Clamp horizontal position to the playable area
    pub fn clamp_to_arena(x: f32, body_width: f32, arena: &Arena) -> f32 {
        if x < arena.min_x() {
            arena.min_x()
        } else if x > arena.max_x(body_width) {
            arena.max_x(body_width)
        } else {
            x
        }
    }

    /// Facing toward the opponent; ties face left
    pub fn facing_toward(x: f32, opponent_x: f32) -> Facing {
        if x < opponent_x {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_requires_interior_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(-20.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn gravity_skips_grounded_bodies() {
        assert_eq!(PhysicsSystem::apply_gravity(0.0, 0.6, true), 0.0);
        assert!((PhysicsSystem::apply_gravity(-14.0, 0.6, false) + 13.4).abs() < 1e-5);
    }

    #[test]
    fn ground_contact_snaps_to_floor() {
        assert_eq!(PhysicsSystem::ground_contact(389.0, 90.0, 480.0), None);
        assert_eq!(PhysicsSystem::ground_contact(390.0, 90.0, 480.0), Some(390.0));
        assert_eq!(PhysicsSystem::ground_contact(455.5, 90.0, 480.0), Some(390.0));
    }

    #[test]
    fn walls_clamp_both_sides() {
        let arena = Arena::default();
        assert_eq!(PhysicsSystem::clamp_to_arena(-5.0, 70.0, &arena), 20.0);
        assert_eq!(PhysicsSystem::clamp_to_arena(900.0, 70.0, &arena), 710.0);
        assert_eq!(PhysicsSystem::clamp_to_arena(300.0, 70.0, &arena), 300.0);
    }

    #[test]
    fn facing_points_at_opponent() {
        assert_eq!(PhysicsSystem::facing_toward(100.0, 650.0), Facing::Right);
        assert_eq!(PhysicsSystem::facing_toward(650.0, 100.0), Facing::Left);
        assert_eq!(PhysicsSystem::facing_toward(300.0, 300.0), Facing::Left);
    }
}
