//! Content domain: RON configuration loaded at startup.

mod data;
mod loader;

pub use data::{DifficultyProfile, LeaderboardSettings, RunSettings, TuningFile};
pub use loader::{ContentLoadError, LoadedContent, load_all_content};

use bevy::prelude::*;
use std::path::Path;

const DATA_DIR: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RunSettings>()
            .init_resource::<LeaderboardSettings>()
            .add_systems(Startup, load_content.in_set(ContentLoadSet));
    }
}

/// Startup systems that need loaded configuration run after this set.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentLoadSet;

/// Load configuration and replace the compiled-in defaults.
/// A missing or malformed file is a setup error and aborts startup.
fn load_content(mut commands: Commands) {
    match load_all_content(Path::new(DATA_DIR)) {
        Ok(content) => {
            info!(
                "Loaded configuration: profile='{}' (jump height {:.0}px), countdown={} ticks, leaderboard='{}'",
                content.profile_name,
                content.tuning.single_jump_height(),
                content.run.countdown_ticks,
                content.leaderboard.leaderboard_id
            );
            commands.insert_resource(content.tuning);
            commands.insert_resource(content.run);
            commands.insert_resource(content.leaderboard);
        }
        Err(errors) => {
            for e in &errors {
                error!("{}", e);
            }
            panic!(
                "configuration in {} failed to load ({} errors)",
                DATA_DIR,
                errors.len()
            );
        }
    }
}
