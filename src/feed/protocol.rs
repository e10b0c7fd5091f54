//! Feed message definitions
//! These are the JSON-lines types exchanged with input layers and renderers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::combat::AttackKind;
use crate::game::fighter::{AnimState, DamageNumber};
use crate::game::physics::{Facing, Rect};
use crate::game::roster::CharacterProfile;
use crate::game::Intent;

/// Which of the two fighters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Player1 => 0,
            Side::Player2 => 1,
        }
    }
}

/// Who controls each fighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleMode {
    /// Player 1 from the feed, player 2 AI
    Ai,
    /// Both players from the feed (local two-player)
    Player,
    /// Both fighters AI
    Demo,
}

impl Default for BattleMode {
    fn default() -> Self {
        Self::Ai
    }
}

impl BattleMode {
    pub fn is_ai(self, side: Side) -> bool {
        match self {
            BattleMode::Ai => side == Side::Player2,
            BattleMode::Player => false,
            BattleMode::Demo => true,
        }
    }
}

/// Messages sent from an input layer to the match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Held input for one fighter, applied every tick until replaced
    Input { side: Side, intent: Intent },

    /// Start over with fresh fighters
    Restart,

    /// Abandon the match
    Quit,
}

/// Messages sent from the match to renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Match created
    MatchStarted {
        match_id: Uuid,
        seed: u64,
        mode: BattleMode,
        player1: CharacterProfile,
        player2: CharacterProfile,
    },

    /// Fighter state snapshot (sent at regular intervals)
    Snapshot {
        tick: u64,
        fighters: Vec<FighterSnapshot>,
        /// Events that occurred since last snapshot
        events: Vec<GameEvent>,
    },

    /// Fighters were reset mid-match
    MatchRestarted { epoch: u32 },

    /// Match has ended
    MatchEnd {
        outcome: MatchOutcome,
        stats: MatchStats,
    },
}

/// Public fighter state a renderer draws from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterSnapshot {
    pub side: Side,
    pub character_id: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    pub state: AnimState,
    /// Moving at run speed rather than walking
    pub running: bool,
    pub frame: u32,
    /// Health (0-100)
    pub health: f32,
    /// Special energy (0-100)
    pub energy: f32,
    pub combo_counter: u32,
    pub stunned: bool,
    pub hit_effect: bool,
    /// Live attack hitbox, if any
    pub hitbox: Option<Rect>,
    pub damage_numbers: Vec<DamageNumber>,
}

/// Game events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// An attack began its animation
    AttackStarted { side: Side, kind: AttackKind },

    /// Hit registered
    Hit {
        attacker: Side,
        defender: Side,
        kind: AttackKind,
        damage: f32,
        critical: bool,
        x: f32,
        y: f32,
        combo: u32,
    },

    /// A fighter's health reached zero
    KnockOut { side: Side },
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MatchOutcome {
    Winner { side: Side },
    /// Both fighters dropped to zero on the same tick
    Draw,
    /// Quit before anyone was knocked out
    Abandoned,
}

/// Match statistics at end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchStats {
    pub duration_ticks: u64,
    pub duration_secs: f32,
    pub fighters: Vec<FighterMatchStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FighterMatchStats {
    pub character_id: u32,
    pub attacks_started: u32,
    pub hits_landed: u32,
    pub critical_hits: u32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub max_combo: u32,
}
