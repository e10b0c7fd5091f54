//! Snapshot building for renderers

use crate::feed::protocol::{FighterSnapshot, GameEvent, ServerMsg};

use super::Fighter;

/// Builds snapshots at a fixed tick interval, decoupled from the simulation rate
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (used for important events)
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    /// Build a snapshot message
    pub fn build(&self, tick: u64, fighters: [&Fighter; 2], events: Vec<GameEvent>) -> ServerMsg {
        ServerMsg::Snapshot {
            tick,
            fighters: fighters.iter().map(|f| Self::fighter_snapshot(f)).collect(),
            events,
        }
    }

    fn fighter_snapshot(f: &Fighter) -> FighterSnapshot {
        FighterSnapshot {
            side: f.side,
            character_id: f.profile.id,
            x: f.x,
            y: f.y,
            width: f.width,
            height: f.height,
            facing: f.facing,
            state: f.state,
            running: f.is_running,
            frame: f.frame,
            health: f.health,
            energy: f.energy,
            combo_counter: f.combo_counter,
            stunned: f.stunned,
            hit_effect: f.hit_effect,
            hitbox: f.hitbox,
            damage_numbers: f.damage_numbers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::protocol::Side;
    use crate::game::roster;

    #[test]
    fn sends_every_interval() {
        let mut builder = SnapshotBuilder::new(2);
        assert!(!builder.should_send());
        assert!(builder.should_send());
        assert!(!builder.should_send());

        builder.force_next();
        assert!(builder.should_send());
    }

    #[test]
    fn zero_interval_means_every_tick() {
        let mut builder = SnapshotBuilder::new(0);
        assert!(builder.should_send());
        assert!(builder.should_send());
    }

    #[test]
    fn snapshot_carries_public_state() {
        let a = Fighter::new(100.0, 300.0, roster::default_profile(), Side::Player1);
        let mut b = Fighter::new(650.0, 300.0, roster::find(5).unwrap(), Side::Player2);
        b.move_to(-1, true);
        let msg = SnapshotBuilder::new(1).build(7, [&a, &b], Vec::new());

        match msg {
            ServerMsg::Snapshot { tick, fighters, events } => {
                assert_eq!(tick, 7);
                assert!(events.is_empty());
                assert_eq!(fighters.len(), 2);
                assert_eq!(fighters[1].character_id, 5);
                assert_eq!(fighters[1].x, 650.0);
                assert_eq!(fighters[0].energy, 50.0);
                assert!(!fighters[0].running);
                assert!(fighters[1].running);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
