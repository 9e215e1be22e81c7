//! UI domain: run HUD, finish panel and standings overlay.

mod hud_finish;
mod hud_run;
mod hud_standings;
#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::core::{FrameSet, GameState};
use crate::ui::hud_finish::{handle_submit_button, spawn_finish_panel, update_finish_panel};
use crate::ui::hud_run::{
    spawn_run_hud, update_countdown_text, update_death_prompt, update_finish_banner,
    update_run_timer_text,
};
use crate::ui::hud_standings::{spawn_standings_overlay, update_standings_overlay};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (spawn_run_hud, spawn_finish_panel, spawn_standings_overlay),
        )
        .add_systems(
            Update,
            (
                update_countdown_text,
                update_run_timer_text,
                update_finish_banner,
                update_death_prompt,
                update_finish_panel,
                handle_submit_button,
                update_standings_overlay,
            )
                .in_set(FrameSet::Hud)
                .run_if(in_state(GameState::Playing)),
        );
    }
}
