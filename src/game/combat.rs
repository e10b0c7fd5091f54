//! Combat system - attack moves, hitbox geometry, damage and hit effects

use serde::{Deserialize, Serialize};

use super::physics::{Facing, Rect};
use crate::feed::protocol::Side;

/// Energy gained by the attacker for each landed hit
pub const ENERGY_PER_HIT: f32 = 8.0;
/// Ticks a critical hit keeps the defender stunned
pub const STUN_TICKS: u32 = 20;
/// Horizontal knockback speed for regular hits
pub const KNOCKBACK_FORCE: f32 = 5.0;
/// Horizontal knockback speed for critical hits
pub const CRITICAL_KNOCKBACK_FORCE: f32 = 8.0;
/// Vertical pop applied to every hit defender
pub const KNOCKBACK_LIFT: f32 = -4.0;
/// Uppercut crits when the roll is above this (30% chance)
pub const UPPERCUT_CRIT_THRESHOLD: f32 = 0.7;

/// The four attack moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Punch,
    Kick,
    Uppercut,
    /// Requires a full energy bar and consumes all of it
    Special,
}

/// Fixed properties of an attack move
#[derive(Debug, Clone, Copy)]
pub struct MoveStats {
    /// Damage per landed hit
    pub damage: f32,
    /// Ticks before the fighter may start another attack
    pub cooldown_ticks: u32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
}

impl MoveStats {
    pub fn for_kind(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Punch => Self {
                damage: 8.0,
                cooldown_ticks: 25,
                hitbox_width: 55.0,
                hitbox_height: 30.0,
            },
            AttackKind::Kick => Self {
                damage: 12.0,
                cooldown_ticks: 25,
                hitbox_width: 75.0,
                hitbox_height: 25.0,
            },
            AttackKind::Uppercut => Self {
                damage: 15.0,
                cooldown_ticks: 35,
                hitbox_width: 50.0,
                hitbox_height: 60.0,
            },
            AttackKind::Special => Self {
                damage: 25.0,
                cooldown_ticks: 50,
                hitbox_width: 120.0,
                hitbox_height: 80.0,
            },
        }
    }
}

/// Combat rules shared by every fighter
pub struct CombatSystem;

impl CombatSystem {
    /// Hitbox of `kind` for an attacker with the given body rect and facing.
    /// When facing left the box mirrors to the other side of the body.
    pub fn hitbox_for(kind: AttackKind, body: &Rect, facing: Facing) -> Rect {
        let stats = MoveStats::for_kind(kind);
        let w = stats.hitbox_width;

        let (offset_x, offset_y) = match kind {
            AttackKind::Punch => (Self::forward_offset(body, w, facing, 0.0), body.height / 3.0),
            AttackKind::Kick => (Self::forward_offset(body, w, facing, 0.0), body.height / 2.0),
            // Uppercut reaches 20px back into the body and above the head
            AttackKind::Uppercut => (Self::forward_offset(body, w, facing, 20.0), -20.0),
            AttackKind::Special => (Self::forward_offset(body, w, facing, 0.0), 0.0),
        };

        Rect::new(body.x + offset_x, body.y + offset_y, w, stats.hitbox_height)
    }

    fn forward_offset(body: &Rect, hitbox_width: f32, facing: Facing, overlap: f32) -> f32 {
        match facing {
            Facing::Right => body.width - overlap,
            Facing::Left => -hitbox_width + overlap,
        }
    }

    /// Critical flag for a landed hit. `roll` is uniform in [0, 1) and only
    /// consulted for uppercuts.
    pub fn is_critical(kind: AttackKind, roll: f32) -> bool {
        match kind {
            AttackKind::Special => true,
            AttackKind::Uppercut => roll > UPPERCUT_CRIT_THRESHOLD,
            AttackKind::Punch | AttackKind::Kick => false,
        }
    }

    /// Knockback velocity imparted to the defender
    /// Returns (vel_x, vel_y)
    pub fn knockback(attacker_facing: Facing, critical: bool) -> (f32, f32) {
        let force = if critical {
            CRITICAL_KNOCKBACK_FORCE
        } else {
            KNOCKBACK_FORCE
        };
        (attacker_facing.sign() * force, KNOCKBACK_LIFT)
    }

    /// Apply damage to health, returns (new_health, is_knocked_out)
    pub fn apply_damage(current_health: f32, damage: f32) -> (f32, bool) {
        let new_health = (current_health - damage).max(0.0);
        (new_health, new_health <= 0.0)
    }

    /// Energy after a landed hit, capped at `max_energy`
    pub fn gain_energy(current_energy: f32, max_energy: f32) -> f32 {
        (current_energy + ENERGY_PER_HIT).min(max_energy)
    }
}

/// Outcome of one landed hit
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub attacker: Side,
    pub defender: Side,
    pub kind: AttackKind,
    pub damage: f32,
    pub critical: bool,
    /// Impact point (defender's head center)
    pub x: f32,
    pub y: f32,
    pub defender_health: f32,
    pub knocked_out: bool,
    /// Attacker's combo count including this hit
    pub combo: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Rect {
        Rect::new(100.0, 390.0, 70.0, 90.0)
    }

    #[test]
    fn punch_box_extends_past_body() {
        let hb = CombatSystem::hitbox_for(AttackKind::Punch, &body(), Facing::Right);
        assert_eq!(hb, Rect::new(170.0, 420.0, 55.0, 30.0));

        let hb = CombatSystem::hitbox_for(AttackKind::Punch, &body(), Facing::Left);
        assert_eq!(hb, Rect::new(45.0, 420.0, 55.0, 30.0));
    }

    #[test]
    fn kick_and_special_geometry() {
        let kick = CombatSystem::hitbox_for(AttackKind::Kick, &body(), Facing::Right);
        assert_eq!(kick, Rect::new(170.0, 435.0, 75.0, 25.0));

        let special = CombatSystem::hitbox_for(AttackKind::Special, &body(), Facing::Left);
        assert_eq!(special, Rect::new(-20.0, 390.0, 120.0, 80.0));
    }

    #[test]
    fn uppercut_overlaps_body_and_rises() {
        let right = CombatSystem::hitbox_for(AttackKind::Uppercut, &body(), Facing::Right);
        assert_eq!(right, Rect::new(150.0, 370.0, 50.0, 60.0));

        let left = CombatSystem::hitbox_for(AttackKind::Uppercut, &body(), Facing::Left);
        assert_eq!(left, Rect::new(70.0, 370.0, 50.0, 60.0));
    }

    #[test]
    fn critical_rules() {
        assert!(CombatSystem::is_critical(AttackKind::Special, 0.0));
        assert!(!CombatSystem::is_critical(AttackKind::Punch, 0.99));
        assert!(!CombatSystem::is_critical(AttackKind::Kick, 0.99));
        assert!(!CombatSystem::is_critical(AttackKind::Uppercut, 0.7));
        assert!(CombatSystem::is_critical(AttackKind::Uppercut, 0.71));
    }

    #[test]
    fn knockback_follows_attacker() {
        assert_eq!(CombatSystem::knockback(Facing::Right, false), (5.0, -4.0));
        assert_eq!(CombatSystem::knockback(Facing::Left, true), (-8.0, -4.0));
    }

    #[test]
    fn damage_and_energy_clamp() {
        assert_eq!(CombatSystem::apply_damage(10.0, 25.0), (0.0, true));
        assert_eq!(CombatSystem::apply_damage(100.0, 8.0), (92.0, false));
        assert_eq!(CombatSystem::gain_energy(96.0, 100.0), 100.0);
        assert_eq!(CombatSystem::gain_energy(50.0, 100.0), 58.0);
    }

    #[test]
    fn cooldowns_by_move() {
        assert_eq!(MoveStats::for_kind(AttackKind::Punch).cooldown_ticks, 25);
        assert_eq!(MoveStats::for_kind(AttackKind::Kick).cooldown_ticks, 25);
        assert_eq!(MoveStats::for_kind(AttackKind::Uppercut).cooldown_ticks, 35);
        assert_eq!(MoveStats::for_kind(AttackKind::Special).cooldown_ticks, 50);
    }
}
