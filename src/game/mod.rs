//! Game simulation modules

pub mod ai;
pub mod combat;
pub mod fighter;
pub mod r#match;
pub mod physics;
pub mod roster;
pub mod snapshot;

pub use combat::AttackKind;
pub use fighter::Fighter;
pub use r#match::{GameMatch, MatchHandle, MatchState};

use serde::{Deserialize, Serialize};

/// What one fighter wants to do this tick, from a human input layer or the AI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// -1 = left, 0 = none, 1 = right
    #[serde(default)]
    pub move_direction: i8,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub attack: Option<AttackKind>,
}

impl Intent {
    /// Movement direction normalized to -1, 0 or 1
    pub fn direction(&self) -> i8 {
        self.move_direction.signum()
    }
}
