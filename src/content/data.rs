//! Configuration data shapes for the RON files under assets/data.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::movement::MovementTuning;

// ============================================================================
// Tuning (tuning.ron)
// ============================================================================

/// Movement tuning keyed by difficulty profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TuningFile {
    pub selected_profile: String,
    pub profiles: Vec<DifficultyProfile>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DifficultyProfile {
    pub id: String,
    pub name: String,
    pub tuning: MovementTuning,
}

impl TuningFile {
    /// Tuning for the selected profile, if it exists.
    pub fn selected(&self) -> Option<&DifficultyProfile> {
        self.profiles.iter().find(|p| p.id == self.selected_profile)
    }
}

// ============================================================================
// Run settings (run.ron)
// ============================================================================

#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
pub struct RunSettings {
    /// Number of countdown ticks before the run starts.
    pub countdown_ticks: u32,
    /// Seconds between countdown ticks.
    pub countdown_interval_secs: f32,
    /// How far outside the level (in tiles) the player may fall before dying.
    pub death_margin_tiles: f32,
    pub tile_size: f32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            countdown_ticks: 3,
            countdown_interval_secs: 1.0,
            death_margin_tiles: 13.0,
            tile_size: 32.0,
        }
    }
}

impl RunSettings {
    pub fn death_margin(&self) -> f32 {
        self.death_margin_tiles * self.tile_size
    }
}

// ============================================================================
// Leaderboard settings (leaderboard.ron)
// ============================================================================

#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
pub struct LeaderboardSettings {
    pub leaderboard_id: String,
    /// Rows shown by the standings overlay.
    pub top_n: usize,
    /// Seconds between standings refreshes.
    pub refresh_secs: f32,
    /// Fee displayed in the submit prompt.
    pub submit_fee_sats: u64,
    /// Where the local leaderboard persists its entries. `None` keeps them in memory.
    pub store_path: Option<String>,
    /// Identity key the local wallet reports. `None` makes the wallet fail,
    /// so submissions go in as anonymous.
    pub identity_key: Option<String>,
    /// Display names known to the local identity directory, by identity key.
    pub known_identities: HashMap<String, String>,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            leaderboard_id: "metaspeed:scores".to_string(),
            top_n: 20,
            refresh_secs: 30.0,
            submit_fee_sats: 10_000,
            store_path: None,
            identity_key: None,
            known_identities: HashMap::new(),
        }
    }
}
