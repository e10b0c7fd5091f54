//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use uuid::Uuid;

use crate::feed::protocol::BattleMode;
use crate::game::physics::Arena;
use crate::game::r#match::MatchConfig;
use crate::game::roster;
use crate::util::time::SIMULATION_TPS;

/// Time limit applied to demo matches unless overridden
pub const DEMO_TIME_LIMIT_SECS: u32 = 99;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Who controls each fighter
    pub battle_mode: BattleMode,
    /// Fixed seed for reproducible matches (random when unset)
    pub match_seed: Option<u64>,
    /// Roster id for player 1
    pub player1_character: u32,
    /// Roster id for player 2
    pub player2_character: u32,
    /// Write snapshots to stdout (lifecycle messages are always written)
    pub emit_snapshots: bool,
    /// Pace ticks at 60 per second instead of running flat out
    pub realtime: bool,
    /// Decide the match on health after this many seconds; 0 disables
    pub time_limit_secs: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let battle_mode = match lookup("BATTLE_MODE") {
            Some(raw) => parse_mode(&raw)?,
            None => BattleMode::default(),
        };

        let player1_character = parse_or("PLAYER1_CHARACTER", lookup("PLAYER1_CHARACTER"), 1)?;
        let player2_character = parse_or("PLAYER2_CHARACTER", lookup("PLAYER2_CHARACTER"), 2)?;
        for id in [player1_character, player2_character] {
            if roster::find(id).is_none() {
                return Err(ConfigError::UnknownCharacter(id));
            }
        }

        let time_limit_secs = match lookup("TIME_LIMIT_SECS") {
            Some(raw) => Some(parse_value::<u32>("TIME_LIMIT_SECS", &raw)?).filter(|s| *s > 0),
            None if battle_mode == BattleMode::Demo => Some(DEMO_TIME_LIMIT_SECS),
            None => None,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            battle_mode,
            match_seed: lookup("MATCH_SEED")
                .map(|raw| parse_value("MATCH_SEED", &raw))
                .transpose()?,
            player1_character,
            player2_character,
            emit_snapshots: parse_bool_or("EMIT_SNAPSHOTS", lookup("EMIT_SNAPSHOTS"), true)?,
            realtime: parse_bool_or("REALTIME", lookup("REALTIME"), true)?,
            time_limit_secs,
        })
    }

    /// Build the match configuration, drawing a seed when none is fixed
    pub fn match_config(&self) -> Result<MatchConfig, ConfigError> {
        let player1 = roster::find(self.player1_character)
            .ok_or(ConfigError::UnknownCharacter(self.player1_character))?;
        let player2 = roster::find(self.player2_character)
            .ok_or(ConfigError::UnknownCharacter(self.player2_character))?;

        Ok(MatchConfig {
            id: Uuid::new_v4(),
            seed: self.match_seed.unwrap_or_else(rand::random),
            mode: self.battle_mode,
            player1,
            player2,
            arena: Arena::default(),
            realtime: self.realtime,
            time_limit_ticks: self
                .time_limit_secs
                .map(|secs| u64::from(secs) * u64::from(SIMULATION_TPS)),
        })
    }
}

fn parse_mode(raw: &str) -> Result<BattleMode, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "ai" => Ok(BattleMode::Ai),
        "player" => Ok(BattleMode::Player),
        "demo" => Ok(BattleMode::Demo),
        _ => Err(ConfigError::InvalidMode(raw.to_string())),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw.to_string()))
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_bool_or(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool(key, raw)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid battle mode '{0}' (expected ai, player or demo)")]
    InvalidMode(String),

    #[error("Invalid number for {0}: '{1}'")]
    InvalidNumber(&'static str, String),

    #[error("Invalid boolean for {0}: '{1}'")]
    InvalidBool(&'static str, String),

    #[error("Unknown character id: {0}")]
    UnknownCharacter(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.battle_mode, BattleMode::Ai);
        assert_eq!(config.match_seed, None);
        assert_eq!(config.player1_character, 1);
        assert_eq!(config.player2_character, 2);
        assert!(config.emit_snapshots);
        assert!(config.realtime);
        assert_eq!(config.time_limit_secs, None);
    }

    #[test]
    fn demo_gets_a_time_limit() {
        let config = load(&[("BATTLE_MODE", "Demo")]).unwrap();
        assert_eq!(config.battle_mode, BattleMode::Demo);
        assert_eq!(config.time_limit_secs, Some(DEMO_TIME_LIMIT_SECS));

        let config = load(&[("BATTLE_MODE", "demo"), ("TIME_LIMIT_SECS", "0")]).unwrap();
        assert_eq!(config.time_limit_secs, None);
    }

    #[test]
    fn parses_overrides() {
        let config = load(&[
            ("BATTLE_MODE", "player"),
            ("MATCH_SEED", "1234"),
            ("PLAYER1_CHARACTER", "7"),
            ("PLAYER2_CHARACTER", "10"),
            ("EMIT_SNAPSHOTS", "false"),
            ("REALTIME", "0"),
            ("TIME_LIMIT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.battle_mode, BattleMode::Player);
        assert_eq!(config.match_seed, Some(1234));
        assert_eq!(config.player1_character, 7);
        assert_eq!(config.player2_character, 10);
        assert!(!config.emit_snapshots);
        assert!(!config.realtime);

        let match_config = config.match_config().unwrap();
        assert_eq!(match_config.seed, 1234);
        assert_eq!(match_config.player1.id, 7);
        assert_eq!(match_config.time_limit_ticks, Some(30 * 60));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("BATTLE_MODE", "arcade")]),
            Err(ConfigError::InvalidMode(_))
        ));
        assert!(matches!(
            load(&[("MATCH_SEED", "abc")]),
            Err(ConfigError::InvalidNumber("MATCH_SEED", _))
        ));
        assert!(matches!(
            load(&[("REALTIME", "maybe")]),
            Err(ConfigError::InvalidBool("REALTIME", _))
        ));
        assert!(matches!(
            load(&[("PLAYER2_CHARACTER", "11")]),
            Err(ConfigError::UnknownCharacter(11))
        ));
    }
}
