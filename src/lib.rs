//! Arena Brawl - two-fighter brawler simulation core
//!
//! The simulation runs at a fixed 60 ticks per second and is fully
//! deterministic for a given seed. A headless driver feeds it held intents
//! over JSON lines and publishes snapshots for renderers.

pub mod config;
pub mod feed;
pub mod game;
pub mod util;
