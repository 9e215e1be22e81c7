//! Leaderboard domain: finish-time submission, standings, and the service
//! interfaces behind them.

mod identity;
mod services;
mod session;
mod systems;
#[cfg(test)]
mod tests;

pub use identity::{
    ANONYMOUS_PLAYER_ID, Identity, IdentityCache, fallback_label, is_likely_identity_key,
    shorten_identity_key,
};
pub use services::{
    IdentityResolver, LeaderboardClient, LeaderboardEntry, LeaderboardError,
    LocalIdentityDirectory, LocalLeaderboard, LocalWallet, ScoreSubmission, WalletError,
    WalletProvider,
};
pub use session::{
    FinishSession, SubmitOutcome, SubmitTicket, TopEntryDisplay, format_sats, score_from_ms,
};
pub use systems::{
    LeaderboardRefresh, LeaderboardServices, SkipRequested, StandingRow, Standings,
    SubmitRequested,
};

use bevy::prelude::*;

use crate::content::ContentLoadSet;
use crate::core::{FrameSet, GameState};
use crate::leaderboard::systems::{
    handle_skip_requests, handle_submit_requests, invalidate_on_restart, poll_display_name_tasks,
    poll_standings_tasks, poll_submit_tasks, poll_top_entry_tasks, read_prompt_keys,
    refresh_standings, setup_services, start_finish_session,
};

pub struct LeaderboardPlugin;

impl Plugin for LeaderboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FinishSession>()
            .add_message::<SubmitRequested>()
            .add_message::<SkipRequested>()
            .add_message::<LeaderboardRefresh>()
            .add_systems(Startup, setup_services.after(ContentLoadSet))
            .add_systems(
                Update,
                (
                    invalidate_on_restart,
                    start_finish_session,
                    read_prompt_keys,
                    handle_submit_requests,
                    handle_skip_requests,
                    poll_top_entry_tasks,
                    poll_display_name_tasks,
                    poll_submit_tasks,
                    refresh_standings,
                    poll_standings_tasks,
                )
                    .chain()
                    .after(FrameSet::Run)
                    .before(FrameSet::Hud)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
