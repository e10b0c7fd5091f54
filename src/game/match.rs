//! Match state and fixed-step tick loop

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::feed::protocol::{
    BattleMode, ClientMsg, FighterMatchStats, GameEvent, MatchOutcome, MatchStats, ServerMsg, Side,
};
use crate::util::time::{tick_duration, ticks_to_secs, SIMULATION_TPS, SNAPSHOT_TPS};

use super::ai::AiController;
use super::combat::HitResult;
use super::physics::Arena;
use super::roster::CharacterProfile;
use super::snapshot::SnapshotBuilder;
use super::{Fighter, Intent};

/// Spawn points (x, y); fighters drop to the floor from here
pub const PLAYER1_SPAWN: (f32, f32) = (100.0, 300.0);
pub const PLAYER2_SPAWN: (f32, f32) = (650.0, 300.0);

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Fighters are exchanging blows
    InProgress,
    /// Outcome decided, no more ticks
    Ended,
}

/// Everything needed to set up a match
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub id: Uuid,
    pub seed: u64,
    pub mode: BattleMode,
    pub player1: Arc<CharacterProfile>,
    pub player2: Arc<CharacterProfile>,
    pub arena: Arena,
    /// Pace ticks with wall-clock time; otherwise simulate as fast as possible
    pub realtime: bool,
    /// End the match after this many ticks, deciding by remaining health
    pub time_limit_ticks: Option<u64>,
}

/// Match state (owned by the match task)
#[derive(Debug, Clone)]
pub struct MatchState {
    pub id: Uuid,
    pub seed: u64,
    pub phase: MatchPhase,
    pub tick: u64,
    /// Bumped on every restart
    pub epoch: u32,
    pub arena: Arena,
    pub player1: Fighter,
    pub player2: Fighter,
    pub outcome: Option<MatchOutcome>,
    pub time_limit_ticks: Option<u64>,
    stats: [FighterMatchStats; 2],
    rng: ChaCha8Rng,
}

impl MatchState {
    pub fn new(
        id: Uuid,
        seed: u64,
        arena: Arena,
        player1: Arc<CharacterProfile>,
        player2: Arc<CharacterProfile>,
    ) -> Self {
        let player1 = Self::spawn(player1, Side::Player1);
        let player2 = Self::spawn(player2, Side::Player2);
        let stats = Self::fresh_stats(&player1, &player2);

        Self {
            id,
            seed,
            phase: MatchPhase::InProgress,
            tick: 0,
            epoch: 0,
            arena,
            player1,
            player2,
            outcome: None,
            time_limit_ticks: None,
            stats,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn spawn(profile: Arc<CharacterProfile>, side: Side) -> Fighter {
        let (x, y) = match side {
            Side::Player1 => PLAYER1_SPAWN,
            Side::Player2 => PLAYER2_SPAWN,
        };
        Fighter::new(x, y, profile, side)
    }

    fn fresh_stats(player1: &Fighter, player2: &Fighter) -> [FighterMatchStats; 2] {
        [
            FighterMatchStats {
                character_id: player1.profile.id,
                ..Default::default()
            },
            FighterMatchStats {
                character_id: player2.profile.id,
                ..Default::default()
            },
        ]
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    pub fn stats(&self, side: Side) -> &FighterMatchStats {
        &self.stats[side.index()]
    }

    /// Run one tick: both intents, both updates, then the win check.
    /// Does nothing once the match has ended.
    pub fn step(&mut self, intent1: &Intent, intent2: &Intent) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase == MatchPhase::Ended {
            return events;
        }

        self.tick += 1;

        for (side, intent) in [(Side::Player1, intent1), (Side::Player2, intent2)] {
            let fighter = match side {
                Side::Player1 => &mut self.player1,
                Side::Player2 => &mut self.player2,
            };
            if fighter.apply_intent(intent) {
                if let Some(kind) = fighter.current_move {
                    debug!(match_id = %self.id, tick = self.tick, side = ?side, kind = ?kind, "Attack started");
                    self.stats[side.index()].attacks_started += 1;
                    events.push(GameEvent::AttackStarted { side, kind });
                }
            }
        }

        if let Some(hit) = self.player1.update(&self.arena, &mut self.player2, &mut self.rng) {
            self.record_hit(&hit, &mut events);
        }
        if let Some(hit) = self.player2.update(&self.arena, &mut self.player1, &mut self.rng) {
            self.record_hit(&hit, &mut events);
        }

        self.check_win_condition(&mut events);
        events
    }

    fn record_hit(&mut self, hit: &HitResult, events: &mut Vec<GameEvent>) {
        debug!(
            match_id = %self.id,
            tick = self.tick,
            attacker = ?hit.attacker,
            kind = ?hit.kind,
            damage = hit.damage,
            critical = hit.critical,
            combo = hit.combo,
            "Hit landed"
        );

        let attacker = &mut self.stats[hit.attacker.index()];
        attacker.hits_landed += 1;
        attacker.damage_dealt += hit.damage;
        attacker.max_combo = attacker.max_combo.max(hit.combo);
        if hit.critical {
            attacker.critical_hits += 1;
        }
        self.stats[hit.defender.index()].damage_taken += hit.damage;

        events.push(GameEvent::Hit {
            attacker: hit.attacker,
            defender: hit.defender,
            kind: hit.kind,
            damage: hit.damage,
            critical: hit.critical,
            x: hit.x,
            y: hit.y,
            combo: hit.combo,
        });
    }

    /// Check win condition
    fn check_win_condition(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase != MatchPhase::InProgress {
            return;
        }

        let p1_down = self.player1.is_knocked_out();
        let p2_down = self.player2.is_knocked_out();

        let outcome = match (p1_down, p2_down) {
            (true, true) => MatchOutcome::Draw,
            (true, false) => MatchOutcome::Winner { side: Side::Player2 },
            (false, true) => MatchOutcome::Winner { side: Side::Player1 },
            (false, false) => match self.time_limit_ticks {
                Some(limit) if self.tick >= limit => self.decide_on_health(),
                _ => return,
            },
        };

        if p1_down {
            events.push(GameEvent::KnockOut { side: Side::Player1 });
        }
        if p2_down {
            events.push(GameEvent::KnockOut { side: Side::Player2 });
        }

        self.finish(outcome);
    }

    fn decide_on_health(&self) -> MatchOutcome {
        let (h1, h2) = (self.player1.health, self.player2.health);
        if h1 > h2 {
            MatchOutcome::Winner { side: Side::Player1 }
        } else if h2 > h1 {
            MatchOutcome::Winner { side: Side::Player2 }
        } else {
            MatchOutcome::Draw
        }
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        self.phase = MatchPhase::Ended;
        self.outcome = Some(outcome);
        info!(match_id = %self.id, tick = self.tick, outcome = ?outcome, "Match ended");
    }

    /// End the match without a knockout
    pub fn abandon(&mut self) {
        if self.phase == MatchPhase::InProgress {
            self.finish(MatchOutcome::Abandoned);
        }
    }

    /// Replace both fighters with fresh ones on their spawn points. Anything
    /// pending on the old fighters (startup windows, stun) is discarded with them.
    pub fn restart(&mut self) {
        self.player1 = Self::spawn(self.player1.profile.clone(), Side::Player1);
        self.player2 = Self::spawn(self.player2.profile.clone(), Side::Player2);
        self.stats = Self::fresh_stats(&self.player1, &self.player2);
        self.tick = 0;
        self.phase = MatchPhase::InProgress;
        self.outcome = None;
        self.epoch += 1;

        info!(match_id = %self.id, epoch = self.epoch, "Match restarted");
    }

    /// Build match stats
    pub fn build_match_stats(&self) -> MatchStats {
        MatchStats {
            duration_ticks: self.tick,
            duration_secs: ticks_to_secs(self.tick),
            fighters: self.stats.to_vec(),
        }
    }
}

/// Handle to a running match
#[derive(Clone)]
pub struct MatchHandle {
    pub id: Uuid,
    pub input_tx: mpsc::Sender<ClientMsg>,
    pub snapshot_tx: broadcast::Sender<ServerMsg>,
}

impl MatchHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMsg> {
        self.snapshot_tx.subscribe()
    }
}

/// The match driver: samples input, steps the simulation and publishes state
pub struct GameMatch {
    state: MatchState,
    mode: BattleMode,
    realtime: bool,
    /// AI controllers per side (None = fed by input messages)
    controllers: [Option<AiController>; 2],
    /// Last intent received per side, re-applied every tick until replaced
    held: [Intent; 2],
    input_rx: mpsc::Receiver<ClientMsg>,
    snapshot_tx: broadcast::Sender<ServerMsg>,
    snapshot_builder: SnapshotBuilder,
    pending_events: Vec<GameEvent>,
}

impl GameMatch {
    /// Create a new match
    pub fn new(config: MatchConfig) -> (Self, MatchHandle) {
        let (input_tx, input_rx) = mpsc::channel(256);
        let (snapshot_tx, _) = broadcast::channel(256);

        let handle = MatchHandle {
            id: config.id,
            input_tx,
            snapshot_tx: snapshot_tx.clone(),
        };

        let mut state = MatchState::new(
            config.id,
            config.seed,
            config.arena,
            config.player1,
            config.player2,
        );
        state.time_limit_ticks = config.time_limit_ticks;

        let controller = |side: Side| {
            config
                .mode
                .is_ai(side)
                .then(|| AiController::new(config.seed ^ ai_seed_salt(side)))
        };

        let game_match = Self {
            state,
            mode: config.mode,
            realtime: config.realtime,
            controllers: [controller(Side::Player1), controller(Side::Player2)],
            held: [Intent::default(); 2],
            input_rx,
            snapshot_tx,
            snapshot_builder: SnapshotBuilder::new(SIMULATION_TPS / SNAPSHOT_TPS),
            pending_events: Vec::new(),
        };

        (game_match, handle)
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Run the tick loop until the match ends
    pub async fn run(mut self) -> (MatchOutcome, MatchStats) {
        info!(match_id = %self.state.id, mode = ?self.mode, seed = self.state.seed, "Match started");

        let _ = self.snapshot_tx.send(ServerMsg::MatchStarted {
            match_id: self.state.id,
            seed: self.state.seed,
            mode: self.mode,
            player1: (*self.state.player1.profile).clone(),
            player2: (*self.state.player2.profile).clone(),
        });

        let mut tick_interval = interval(tick_duration());
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if self.realtime {
                tick_interval.tick().await;
            } else {
                tokio::task::yield_now().await;
            }

            self.process_inputs();
            self.tick();

            if self.state.phase == MatchPhase::Ended {
                break;
            }
        }

        let outcome = self.state.outcome.unwrap_or(MatchOutcome::Abandoned);
        let stats = self.state.build_match_stats();
        let _ = self.snapshot_tx.send(ServerMsg::MatchEnd {
            outcome,
            stats: stats.clone(),
        });

        // input_rx drops with self, detaching every input source
        (outcome, stats)
    }

    /// Advance the simulation one tick and publish a snapshot when due
    pub fn tick(&mut self) {
        let intents = [Side::Player1, Side::Player2].map(|side| self.intent_for(side));
        let events = self.state.step(&intents[0], &intents[1]);
        self.pending_events.extend(events);

        if self.state.phase == MatchPhase::Ended {
            self.snapshot_builder.force_next();
        }

        if self.snapshot_builder.should_send() {
            let snapshot = self.snapshot_builder.build(
                self.state.tick,
                [&self.state.player1, &self.state.player2],
                std::mem::take(&mut self.pending_events),
            );
            let _ = self.snapshot_tx.send(snapshot);
        }
    }

    fn intent_for(&mut self, side: Side) -> Intent {
        let me = self.state.fighter(side);
        let opponent = self.state.fighter(side.opponent());

        match self.controllers[side.index()].as_mut() {
            Some(ai) => ai.next_intent(me, opponent),
            None => self.held[side.index()],
        }
    }

    /// Drain all pending input messages
    fn process_inputs(&mut self) {
        loop {
            match self.input_rx.try_recv() {
                Ok(ClientMsg::Input { side, intent }) => {
                    if self.controllers[side.index()].is_some() {
                        warn!(match_id = %self.state.id, side = ?side, "Input for AI-controlled side ignored");
                        continue;
                    }
                    self.held[side.index()] = intent;
                }
                Ok(ClientMsg::Restart) => {
                    self.state.restart();
                    self.held = [Intent::default(); 2];
                    self.pending_events.clear();
                    let _ = self.snapshot_tx.send(ServerMsg::MatchRestarted {
                        epoch: self.state.epoch,
                    });
                }
                Ok(ClientMsg::Quit) => {
                    info!(match_id = %self.state.id, "Quit requested");
                    self.state.abandon();
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Nobody left to drive a human side
                    if self.controllers.iter().any(Option::is_none) {
                        info!(match_id = %self.state.id, "Input feed closed");
                        self.state.abandon();
                    }
                    break;
                }
            }
        }
    }
}

fn ai_seed_salt(side: Side) -> u64 {
    match side {
        Side::Player1 => 0x9E37_79B9_7F4A_7C15,
        Side::Player2 => 0xC2B2_AE3D_27D4_EB4F,
    }
}
