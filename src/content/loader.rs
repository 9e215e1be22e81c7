//! Loader for RON configuration files at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use super::data::{LeaderboardSettings, RunSettings, TuningFile};
use crate::movement::MovementTuning;

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Everything read from assets/data.
#[derive(Debug, Clone)]
pub struct LoadedContent {
    pub profile_name: String,
    pub tuning: MovementTuning,
    pub run: RunSettings,
    pub leaderboard: LeaderboardSettings,
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse a single RON struct from a string.
pub(crate) fn parse_ron<T>(file_name: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load a single RON struct from disk.
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_ron(&file_name, &contents)
}

/// Pick the selected difficulty profile out of a tuning file.
pub(crate) fn resolve_profile(
    file_name: &str,
    tuning_file: &TuningFile,
) -> Result<(String, MovementTuning), ContentLoadError> {
    tuning_file
        .selected()
        .map(|profile| (profile.name.clone(), profile.tuning.clone()))
        .ok_or_else(|| ContentLoadError {
            file: file_name.to_string(),
            message: format!(
                "selected profile '{}' is not defined",
                tuning_file.selected_profile
            ),
        })
}

/// Load all configuration from assets/data/*.ron.
/// Returns errors for any files that fail to load.
pub fn load_all_content(base_path: &Path) -> Result<LoadedContent, Vec<ContentLoadError>> {
    let mut errors = Vec::new();

    let tuning_path = base_path.join("tuning.ron");
    let profile = match load_single_file::<TuningFile>(&tuning_path) {
        Ok(file) => match resolve_profile(&tuning_path.display().to_string(), &file) {
            Ok(profile) => Some(profile),
            Err(e) => {
                errors.push(e);
                None
            }
        },
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let run = match load_single_file::<RunSettings>(&base_path.join("run.ron")) {
        Ok(run) => Some(run),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let leaderboard = match load_single_file::<LeaderboardSettings>(&base_path.join("leaderboard.ron"))
    {
        Ok(settings) => Some(settings),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    match (profile, run, leaderboard) {
        (Some((profile_name, tuning)), Some(run), Some(leaderboard)) if errors.is_empty() => {
            Ok(LoadedContent {
                profile_name,
                tuning,
                run,
                leaderboard,
            })
        }
        _ => Err(errors),
    }
}
