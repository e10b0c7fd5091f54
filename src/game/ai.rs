//! Heuristic AI opponent
//!
//! Stateless: every tick the decision is re-derived from both fighters'
//! current positions, health and energy plus one uniform roll.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::combat::AttackKind;
use super::fighter::{Fighter, MAX_ENERGY};
use super::Intent;

/// Beyond this horizontal distance the AI closes in
pub const APPROACH_DISTANCE: f32 = 200.0;
/// Beyond this (and within approach distance) the AI attacks; closer, it backs off
pub const ATTACK_DISTANCE: f32 = 100.0;
/// Below this health the AI tends to retreat
pub const LOW_HEALTH: f32 = 30.0;

/// Pick an intent for `me` given one roll `r` in [0, 1)
pub fn decide(me: &Fighter, opponent: &Fighter, r: f32) -> Intent {
    let mut intent = Intent::default();

    let distance = (me.x - opponent.x).abs();
    let toward: i8 = if me.x < opponent.x { 1 } else { -1 };

    if distance > APPROACH_DISTANCE {
        intent.move_direction = toward;
        intent.running = r > 0.6;
    } else if distance > ATTACK_DISTANCE {
        intent.attack = if r < 0.4 {
            Some(AttackKind::Punch)
        } else if r < 0.7 {
            Some(AttackKind::Kick)
        } else if r < 0.9 {
            Some(AttackKind::Uppercut)
        } else if me.energy >= MAX_ENERGY {
            Some(AttackKind::Special)
        } else {
            None
        };
    } else {
        intent.move_direction = -toward;
    }

    if r > 0.85 && me.grounded {
        intent.jump = true;
    }

    // Low health overrides whatever movement was picked above
    if me.health < LOW_HEALTH && r > 0.5 {
        intent.move_direction = -toward;
    }

    intent
}

/// Same as [`decide`], drawing the roll from `rng`
pub fn decide_with<R: Rng>(me: &Fighter, opponent: &Fighter, rng: &mut R) -> Intent {
    let r: f32 = rng.gen();
    decide(me, opponent, r)
}

/// AI driver owning its own random stream
#[derive(Debug, Clone)]
pub struct AiController {
    rng: ChaCha8Rng,
}

impl AiController {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn next_intent(&mut self, me: &Fighter, opponent: &Fighter) -> Intent {
        decide_with(me, opponent, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::protocol::Side;
    use crate::game::roster;
    use rand::rngs::mock::StepRng;

    fn pair(me_x: f32, opponent_x: f32) -> (Fighter, Fighter) {
        let mut me = Fighter::new(me_x, 390.0, roster::default_profile(), Side::Player2);
        let opp = Fighter::new(opponent_x, 390.0, roster::default_profile(), Side::Player1);
        me.grounded = true;
        (me, opp)
    }

    #[test]
    fn far_away_approaches() {
        let (me, opp) = pair(301.0, 100.0);
        let intent = decide(&me, &opp, 0.3);
        assert_eq!(intent.move_direction, -1);
        assert!(!intent.running);
        assert!(intent.attack.is_none());

        let (me, opp) = pair(100.0, 650.0);
        let intent = decide(&me, &opp, 0.61);
        assert_eq!(intent.move_direction, 1);
        assert!(intent.running);
    }

    #[test]
    fn boundary_200_is_attack_range() {
        let (me, opp) = pair(300.0, 100.0);
        let intent = decide(&me, &opp, 0.1);
        assert_eq!(intent.move_direction, 0);
        assert_eq!(intent.attack, Some(AttackKind::Punch));
    }

    #[test]
    fn attack_range_picks_by_roll() {
        let (me, opp) = pair(250.0, 100.0);
        assert_eq!(decide(&me, &opp, 0.39).attack, Some(AttackKind::Punch));
        assert_eq!(decide(&me, &opp, 0.41).attack, Some(AttackKind::Kick));
        assert_eq!(decide(&me, &opp, 0.69).attack, Some(AttackKind::Kick));
        assert_eq!(decide(&me, &opp, 0.7).attack, Some(AttackKind::Uppercut));
        assert_eq!(decide(&me, &opp, 0.89).attack, Some(AttackKind::Uppercut));
        assert_eq!(decide(&me, &opp, 0.95).attack, None);
    }

    #[test]
    fn special_only_with_full_energy() {
        let (mut me, opp) = pair(250.0, 100.0);
        me.energy = MAX_ENERGY;
        let intent = decide(&me, &opp, 0.95);
        assert_eq!(intent.attack, Some(AttackKind::Special));
        assert!(intent.jump);
    }

    #[test]
    fn too_close_retreats() {
        let (me, opp) = pair(200.0, 100.0);
        let intent = decide(&me, &opp, 0.2);
        assert_eq!(intent.move_direction, 1);
        assert!(intent.attack.is_none());

        let (me, opp) = pair(100.0, 150.0);
        assert_eq!(decide(&me, &opp, 0.2).move_direction, -1);
    }

    #[test]
    fn jumps_only_when_grounded() {
        let (mut me, opp) = pair(400.0, 100.0);
        assert!(decide(&me, &opp, 0.86).jump);
        assert!(!decide(&me, &opp, 0.85).jump);

        me.grounded = false;
        assert!(!decide(&me, &opp, 0.86).jump);
    }

    #[test]
    fn low_health_overrides_movement() {
        let (mut me, opp) = pair(100.0, 650.0);
        me.health = 20.0;
        // would approach, but retreats instead
        let intent = decide(&me, &opp, 0.7);
        assert_eq!(intent.move_direction, -1);
        assert!(intent.running);

        // attack range: attack kept, retreat added
        let (mut me, opp) = pair(250.0, 100.0);
        me.health = 20.0;
        let intent = decide(&me, &opp, 0.6);
        assert_eq!(intent.attack, Some(AttackKind::Kick));
        assert_eq!(intent.move_direction, 1);

        // roll too low to override
        let (mut me, opp) = pair(100.0, 650.0);
        me.health = 20.0;
        assert_eq!(decide(&me, &opp, 0.4).move_direction, 1);
    }

    #[test]
    fn seeded_rolls_are_reproducible() {
        let (me, opp) = pair(250.0, 100.0);
        let mut zero = StepRng::new(0, 0);
        assert_eq!(decide_with(&me, &opp, &mut zero).attack, Some(AttackKind::Punch));

        let mut a = AiController::new(42);
        let mut b = AiController::new(42);
        for _ in 0..50 {
            assert_eq!(a.next_intent(&me, &opp), b.next_intent(&me, &opp));
        }
    }
}
