//! Fighter entity: kinematics, animation state machine and combat state
//!
//! A fighter is driven by intents (`move_to`, `jump`, `attack`, `stop`) and
//! advanced once per tick by [`Fighter::update`], which also runs hit
//! resolution against the opponent.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::combat::{AttackKind, CombatSystem, HitResult, MoveStats, STUN_TICKS};
use super::physics::{Arena, Facing, PhysicsSystem, Rect};
use super::roster::CharacterProfile;
use super::Intent;
use crate::feed::protocol::Side;
use crate::util::time::ms_to_ticks;

pub const MAX_HEALTH: f32 = 100.0;
pub const MAX_ENERGY: f32 = 100.0;
pub const STARTING_ENERGY: f32 = 50.0;

pub const FIGHTER_WIDTH: f32 = 70.0;
pub const FIGHTER_HEIGHT: f32 = 90.0;

/// Ticks per animation frame
pub const FRAME_DELAY: u32 = 6;
/// Ticks between attack initiation and the hitbox going live (150ms)
pub const HITBOX_STARTUP_TICKS: u32 = ms_to_ticks(150);
/// Ticks the red hit flash stays on
pub const HIT_EFFECT_TICKS: u32 = 8;

/// Animation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimState {
    Idle,
    Walk,
    Run,
    Jump,
    Punch,
    Kick,
    Uppercut,
    Special,
    Hurt,
    /// Present in the frame table; nothing currently enters it
    Block,
}

impl AnimState {
    /// Number of frames in one cycle of this animation
    pub fn frame_budget(self) -> u32 {
        match self {
            AnimState::Idle => 6,
            AnimState::Walk => 8,
            AnimState::Run => 6,
            AnimState::Jump => 3,
            AnimState::Punch => 5,
            AnimState::Kick => 6,
            AnimState::Uppercut => 7,
            AnimState::Special => 10,
            AnimState::Hurt => 3,
            AnimState::Block => 2,
        }
    }
}

impl From<AttackKind> for AnimState {
    fn from(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Punch => AnimState::Punch,
            AttackKind::Kick => AnimState::Kick,
            AttackKind::Uppercut => AnimState::Uppercut,
            AttackKind::Special => AnimState::Special,
        }
    }
}

/// Movement tunables, per tick
#[derive(Debug, Clone, Copy)]
pub struct FighterStats {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_power: f32,
    pub gravity: f32,
}

impl Default for FighterStats {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            run_speed: 8.0,
            jump_power: 14.0,
            gravity: 0.6,
        }
    }
}

/// Floating damage number (cosmetic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageNumber {
    pub value: u32,
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
    pub critical: bool,
}

impl DamageNumber {
    /// Drift up and fade one tick; returns false once fully transparent
    fn fade(&mut self) -> bool {
        self.y -= 1.0;
        self.alpha -= 0.02;
        self.alpha > 0.0
    }
}

/// One combatant
#[derive(Debug, Clone)]
pub struct Fighter {
    pub profile: Arc<CharacterProfile>,
    pub side: Side,
    pub stats: FighterStats,

    // Kinematics
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    pub grounded: bool,
    pub is_jumping: bool,
    pub is_running: bool,

    // Animation
    pub state: AnimState,
    pub frame: u32,
    pub frame_timer: u32,

    // Combat
    pub health: f32,
    pub energy: f32,
    pub attacking: bool,
    pub attack_cooldown: u32,
    pub current_move: Option<AttackKind>,
    pub hitbox: Option<Rect>,
    /// Ticks until the pending attack's hitbox goes live
    pub hitbox_startup: Option<u32>,
    pub hit_registered: bool,
    pub combo_counter: u32,
    pub stunned: bool,
    pub stunned_timer: u32,

    // Effects
    pub hit_effect: bool,
    pub hit_effect_timer: u32,
    pub damage_numbers: Vec<DamageNumber>,
}

impl Fighter {
    /// Fresh fighter with full health and half energy. Starts airborne and
    /// settles onto the ground on its first update.
    pub fn new(x: f32, y: f32, profile: Arc<CharacterProfile>, side: Side) -> Self {
        Self {
            profile,
            side,
            stats: FighterStats::default(),
            x,
            y,
            vel_x: 0.0,
            vel_y: 0.0,
            width: FIGHTER_WIDTH,
            height: FIGHTER_HEIGHT,
            facing: match side {
                Side::Player1 => Facing::Right,
                Side::Player2 => Facing::Left,
            },
            grounded: false,
            is_jumping: false,
            is_running: false,
            state: AnimState::Idle,
            frame: 0,
            frame_timer: 0,
            health: MAX_HEALTH,
            energy: STARTING_ENERGY,
            attacking: false,
            attack_cooldown: 0,
            current_move: None,
            hitbox: None,
            hitbox_startup: None,
            hit_registered: false,
            combo_counter: 0,
            stunned: false,
            stunned_timer: 0,
            hit_effect: false,
            hit_effect_timer: 0,
            damage_numbers: Vec::new(),
        }
    }

    /// Bounding box
    pub fn body(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Attacks and stun both lock out movement and new attacks
    pub fn is_locked(&self) -> bool {
        self.attacking || self.stunned
    }

    pub fn is_knocked_out(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply one tick's intent: movement (or stop), then jump, then attack.
    /// Returns true if an attack was started.
    pub fn apply_intent(&mut self, intent: &Intent) -> bool {
        let direction = intent.direction();
        if direction != 0 {
            self.move_to(direction, intent.running);
        } else {
            self.stop();
        }

        if intent.jump {
            self.jump();
        }

        match intent.attack {
            Some(kind) => self.attack(kind),
            None => false,
        }
    }

    /// Walk or run in `direction` (-1, 0, 1). Airborne fighters keep their state.
    pub fn move_to(&mut self, direction: i8, running: bool) {
        if self.is_locked() {
            return;
        }

        self.is_running = running;
        let speed = if running {
            self.stats.run_speed
        } else {
            self.stats.walk_speed
        };
        self.vel_x = f32::from(direction) * speed;

        if self.grounded {
            self.state = match (direction, running) {
                (0, _) => AnimState::Idle,
                (_, true) => AnimState::Run,
                (_, false) => AnimState::Walk,
            };
        }
    }

    pub fn jump(&mut self) {
        if !self.grounded || self.is_locked() {
            return;
        }

        self.vel_y = -self.stats.jump_power;
        self.is_jumping = true;
        self.grounded = false;
        self.state = AnimState::Jump;
    }

    /// Start an attack. Ignored while attacking, stunned or cooling down, and
    /// a special needs a full energy bar. Returns true if the attack started.
    pub fn attack(&mut self, kind: AttackKind) -> bool {
        if self.is_locked() || self.attack_cooldown > 0 {
            return false;
        }
        if kind == AttackKind::Special && self.energy < MAX_ENERGY {
            return false;
        }

        self.attacking = true;
        self.attack_cooldown = MoveStats::for_kind(kind).cooldown_ticks;
        self.frame = 0;
        self.frame_timer = 0;
        self.state = kind.into();
        self.current_move = Some(kind);
        self.vel_x = 0.0;
        self.hit_registered = false;
        self.hitbox_startup = Some(HITBOX_STARTUP_TICKS);

        if kind == AttackKind::Special {
            self.energy = 0.0;
        }

        true
    }

    pub fn stop(&mut self) {
        if self.is_locked() {
            return;
        }

        self.vel_x = 0.0;
        self.is_running = false;
        if self.grounded {
            self.state = AnimState::Idle;
        }
    }

    /// Take a hit. Interrupts the current animation unless mid-special or mid-jump.
    pub fn take_damage(&mut self, amount: f32, critical: bool) {
        let (health, _) = CombatSystem::apply_damage(self.health, amount);
        self.health = health;
        self.hit_effect = true;
        self.hit_effect_timer = HIT_EFFECT_TICKS;

        self.damage_numbers.push(DamageNumber {
            value: amount.ceil() as u32,
            x: self.x + self.width / 2.0,
            y: self.y,
            alpha: 1.0,
            critical,
        });

        if !matches!(self.state, AnimState::Special | AnimState::Jump) {
            self.state = AnimState::Hurt;
            self.frame = 0;
        }
    }

    /// Advance one tick against `opponent`. Returns the hit landed this tick, if any.
    pub fn update<R: Rng>(
        &mut self,
        arena: &Arena,
        opponent: &mut Fighter,
        rng: &mut R,
    ) -> Option<HitResult> {
        self.advance_animation();
        self.tick_timers();
        self.tick_hitbox_startup();

        self.vel_y = PhysicsSystem::apply_gravity(self.vel_y, self.stats.gravity, self.grounded);
        let (x, y) = PhysicsSystem::integrate(self.x, self.y, self.vel_x, self.vel_y);
        self.x = x;
        self.y = y;

        match PhysicsSystem::ground_contact(self.y, self.height, arena.ground_level) {
            Some(ground_y) => {
                self.y = ground_y;
                self.vel_y = 0.0;
                self.grounded = true;
                self.is_jumping = false;
                if self.state == AnimState::Jump {
                    self.state = AnimState::Idle;
                }
            }
            None => self.grounded = false,
        }

        self.x = PhysicsSystem::clamp_to_arena(self.x, self.width, arena);

        // Facing is locked for the duration of an attack
        if !self.attacking {
            self.facing = PhysicsSystem::facing_toward(self.x, opponent.x);
        }

        if self.hitbox.is_some() && !self.hit_registered {
            return self.resolve_hit(opponent, rng);
        }
        None
    }

    fn advance_animation(&mut self) {
        self.frame_timer += 1;
        if self.frame_timer < FRAME_DELAY {
            return;
        }

        self.frame_timer = 0;
        self.frame += 1;

        if self.frame >= self.state.frame_budget() {
            if self.attacking {
                self.attacking = false;
                self.state = AnimState::Idle;
                self.hitbox = None;
                self.hitbox_startup = None;
                self.current_move = None;
            }
            self.frame = 0;
        }
    }

    fn tick_timers(&mut self) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);

        if self.stunned_timer > 0 {
            self.stunned_timer -= 1;
            if self.stunned_timer == 0 {
                self.stunned = false;
            }
        }

        if self.hit_effect_timer > 0 {
            self.hit_effect_timer -= 1;
            if self.hit_effect_timer == 0 {
                self.hit_effect = false;
            }
        }

        self.damage_numbers.retain_mut(DamageNumber::fade);
    }

    /// Count down the startup window and attach the hitbox once it elapses.
    /// The countdown is dropped with the attack, so a stale one can never fire.
    fn tick_hitbox_startup(&mut self) {
        let Some(remaining) = self.hitbox_startup else {
            return;
        };

        if remaining > 1 {
            self.hitbox_startup = Some(remaining - 1);
            return;
        }

        self.hitbox_startup = None;
        if let (true, Some(kind)) = (self.attacking, self.current_move) {
            self.hitbox = Some(CombatSystem::hitbox_for(kind, &self.body(), self.facing));
        }
    }

    fn resolve_hit<R: Rng>(
        &mut self,
        opponent: &mut Fighter,
        rng: &mut R,
    ) -> Option<HitResult> {
        let hitbox = self.hitbox?;
        let kind = self.current_move?;
        if !hitbox.overlaps(&opponent.body()) {
            return None;
        }

        let damage = MoveStats::for_kind(kind).damage;
        let roll = if kind == AttackKind::Uppercut {
            rng.gen::<f32>()
        } else {
            0.0
        };
        let critical = CombatSystem::is_critical(kind, roll);

        opponent.take_damage(damage, critical);
        self.energy = CombatSystem::gain_energy(self.energy, MAX_ENERGY);
        self.hit_registered = true;
        self.combo_counter += 1;

        let (vel_x, vel_y) = CombatSystem::knockback(self.facing, critical);
        opponent.vel_x = vel_x;
        opponent.vel_y = vel_y;

        if critical {
            opponent.stunned = true;
            opponent.stunned_timer = STUN_TICKS;
        }

        Some(HitResult {
            attacker: self.side,
            defender: opponent.side,
            kind,
            damage,
            critical,
            x: opponent.x + opponent.width / 2.0,
            y: opponent.y,
            defender_health: opponent.health,
            knocked_out: opponent.is_knocked_out(),
            combo: self.combo_counter,
        })
    }
}
