//! Leaderboard domain: launching and polling service tasks.
//!
//! Service calls run on the IO task pool. Each task lives on its own entity
//! and is polled every frame; finished tasks are despawned after their
//! result is applied.

use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy::tasks::futures::check_ready;
use bevy::tasks::{IoTaskPool, Task};
use std::sync::Arc;

use crate::content::LeaderboardSettings;
use crate::leaderboard::identity::{ANONYMOUS_PLAYER_ID, IdentityCache};
use crate::leaderboard::services::{
    LeaderboardClient, LeaderboardEntry, LeaderboardError, LocalIdentityDirectory,
    LocalLeaderboard, LocalWallet, ScoreSubmission, WalletProvider,
};
use crate::leaderboard::session::{FinishSession, SubmitOutcome};
use crate::run::{LevelRestarted, RunFinished};

/// Player asked to submit the finished run (Y or the submit button)
#[derive(Debug)]
pub struct SubmitRequested;

impl Message for SubmitRequested {}

/// Player declined to submit (N)
#[derive(Debug)]
pub struct SkipRequested;

impl Message for SkipRequested {}

/// A new score was accepted; anything showing standings should reload
#[derive(Debug)]
pub struct LeaderboardRefresh;

impl Message for LeaderboardRefresh {}

/// Handles to the leaderboard, identity and wallet services.
#[derive(Resource, Clone)]
pub struct LeaderboardServices {
    pub client: Arc<dyn LeaderboardClient>,
    pub identities: Arc<IdentityCache>,
    pub wallet: Arc<dyn WalletProvider>,
}

impl LeaderboardServices {
    /// Local services configured from `settings`. A store that cannot be
    /// opened is replaced by an in-memory board.
    pub fn local(settings: &LeaderboardSettings) -> Self {
        let board = match &settings.store_path {
            Some(path) => LocalLeaderboard::open(settings.leaderboard_id.clone(), path)
                .unwrap_or_else(|e| {
                    warn!("{}; scores will not be saved", e);
                    LocalLeaderboard::in_memory(settings.leaderboard_id.clone())
                }),
            None => LocalLeaderboard::in_memory(settings.leaderboard_id.clone()),
        };
        info!("Local leaderboard holds {} entries", board.len());

        let directory = LocalIdentityDirectory::new(settings.known_identities.clone());

        Self {
            client: Arc::new(board),
            identities: Arc::new(IdentityCache::new(Arc::new(directory))),
            wallet: Arc::new(LocalWallet::new(settings.identity_key.clone())),
        }
    }
}

/// One row of the standings overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingRow {
    pub rank: usize,
    pub label: String,
    pub score_ms: u64,
    pub txid: String,
}

/// Top-N standings, refreshed on a timer and on [`LeaderboardRefresh`].
#[derive(Resource, Debug)]
pub struct Standings {
    pub rows: Vec<StandingRow>,
    pub loading: bool,
    pub top_n: usize,
    refresh: Timer,
    in_flight: bool,
    requested: bool,
}

impl Standings {
    pub fn new(settings: &LeaderboardSettings) -> Self {
        Self {
            rows: Vec::new(),
            loading: true,
            top_n: settings.top_n,
            refresh: Timer::from_seconds(settings.refresh_secs, TimerMode::Repeating),
            in_flight: false,
            requested: true,
        }
    }
}

impl Default for Standings {
    fn default() -> Self {
        Self::new(&LeaderboardSettings::default())
    }
}

#[derive(Component)]
pub(crate) struct TopEntryTask {
    nonce: u64,
    task: Task<Result<Option<LeaderboardEntry>, LeaderboardError>>,
}

#[derive(Component)]
pub(crate) struct DisplayNameTask {
    nonce: u64,
    task: Task<Option<String>>,
}

#[derive(Component)]
pub(crate) struct SubmitTask {
    nonce: u64,
    task: Task<Result<(), LeaderboardError>>,
}

#[derive(Component)]
pub(crate) struct StandingsTask {
    task: Task<Result<Vec<StandingRow>, LeaderboardError>>,
}

pub(crate) fn setup_services(mut commands: Commands, settings: Res<LeaderboardSettings>) {
    info!(
        "Leaderboard '{}': top {} refreshed every {}s",
        settings.leaderboard_id, settings.top_n, settings.refresh_secs
    );
    commands.insert_resource(LeaderboardServices::local(&settings));
    commands.insert_resource(Standings::new(&settings));
}

fn spawn_top_entry_task(commands: &mut Commands, services: &LeaderboardServices, nonce: u64) {
    let client = services.client.clone();
    let task = IoTaskPool::get().spawn(async move {
        client.get_top(1).map(|entries| entries.into_iter().next())
    });
    commands.spawn(TopEntryTask { nonce, task });
}

/// Open a finish session for each finished run.
pub(crate) fn start_finish_session(
    mut commands: Commands,
    mut finished: MessageReader<RunFinished>,
    services: Res<LeaderboardServices>,
    mut session: ResMut<FinishSession>,
) {
    for event in finished.read() {
        let nonce = session.begin(event.final_ms);
        spawn_top_entry_task(&mut commands, &services, nonce);
    }
}

pub(crate) fn invalidate_on_restart(
    mut restarted: MessageReader<LevelRestarted>,
    mut session: ResMut<FinishSession>,
) {
    if restarted.read().count() > 0 {
        session.invalidate();
    }
}

/// Y submits, N skips, while the prompt is waiting for an answer.
pub(crate) fn read_prompt_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Res<FinishSession>,
    mut submit: MessageWriter<SubmitRequested>,
    mut skip: MessageWriter<SkipRequested>,
) {
    if !session.accepts_prompt_input() {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyY) {
        submit.write(SubmitRequested);
    } else if keyboard.just_pressed(KeyCode::KeyN) {
        skip.write(SkipRequested);
    }
}

pub(crate) fn handle_submit_requests(
    mut commands: Commands,
    mut requests: MessageReader<SubmitRequested>,
    services: Res<LeaderboardServices>,
    mut session: ResMut<FinishSession>,
) {
    for _ in requests.read() {
        let Some(ticket) = session.begin_submit() else {
            continue;
        };

        let client = services.client.clone();
        let wallet = services.wallet.clone();
        let task = IoTaskPool::get().spawn(async move {
            let player_id = wallet.get_public_key().unwrap_or_else(|e| {
                warn!("Submitting anonymously: {}", e);
                ANONYMOUS_PLAYER_ID.to_string()
            });
            client.submit(&ScoreSubmission {
                player_id,
                score: ticket.score,
            })
        });

        info!("Submitting score {} ms", ticket.score);
        commands.spawn(SubmitTask {
            nonce: ticket.nonce,
            task,
        });
    }
}

pub(crate) fn handle_skip_requests(
    mut requests: MessageReader<SkipRequested>,
    mut session: ResMut<FinishSession>,
) {
    for _ in requests.read() {
        if session.skip() {
            info!("Leaderboard submission skipped");
        }
    }
}

pub(crate) fn poll_top_entry_tasks(
    mut commands: Commands,
    services: Res<LeaderboardServices>,
    mut session: ResMut<FinishSession>,
    mut tasks: Query<(Entity, &mut TopEntryTask)>,
) {
    for (entity, mut pending) in &mut tasks {
        let Some(result) = check_ready(&mut pending.task) else {
            continue;
        };
        commands.entity(entity).despawn();

        if let Err(e) = &result {
            warn!("Top entry lookup failed: {}", e);
        }

        let nonce = pending.nonce;
        let Some(player_id) = session.apply_top_entry(nonce, result) else {
            continue;
        };

        let identities = services.identities.clone();
        let task = IoTaskPool::get().spawn(async move {
            identities.resolve(&player_id).map(|identity| identity.name)
        });
        commands.spawn(DisplayNameTask { nonce, task });
    }
}

pub(crate) fn poll_display_name_tasks(
    mut commands: Commands,
    mut session: ResMut<FinishSession>,
    mut tasks: Query<(Entity, &mut DisplayNameTask)>,
) {
    for (entity, mut pending) in &mut tasks {
        let Some(name) = check_ready(&mut pending.task) else {
            continue;
        };
        commands.entity(entity).despawn();

        if let Some(name) = name {
            session.apply_display_name(pending.nonce, name);
        }
    }
}

pub(crate) fn poll_submit_tasks(
    mut commands: Commands,
    services: Res<LeaderboardServices>,
    mut session: ResMut<FinishSession>,
    mut tasks: Query<(Entity, &mut SubmitTask)>,
    mut refresh: MessageWriter<LeaderboardRefresh>,
) {
    for (entity, mut pending) in &mut tasks {
        let Some(result) = check_ready(&mut pending.task) else {
            continue;
        };
        commands.entity(entity).despawn();

        // The score is on the board even if the player restarted meanwhile
        if result.is_ok() {
            refresh.write(LeaderboardRefresh);
        }

        match session.finish_submit(pending.nonce, result) {
            SubmitOutcome::Submitted { refresh_nonce } => {
                info!("Score submitted");
                spawn_top_entry_task(&mut commands, &services, refresh_nonce);
            }
            SubmitOutcome::Failed => {
                warn!("Score submission failed: {}", session.status());
            }
            SubmitOutcome::Stale => {
                debug!("Dropped submit result for an abandoned session");
            }
        }
    }
}

/// Reload the standings every refresh interval and on refresh requests.
/// The interval runs on wall-clock time so the overlay keeps refreshing
/// while gameplay is paused.
pub(crate) fn refresh_standings(
    mut commands: Commands,
    time: Res<Time<Real>>,
    services: Res<LeaderboardServices>,
    mut standings: ResMut<Standings>,
    mut refresh: MessageReader<LeaderboardRefresh>,
) {
    let requested = refresh.read().count() > 0;
    // Ticking alone shouldn't mark the standings as changed
    let interval_elapsed = standings
        .bypass_change_detection()
        .refresh
        .tick(time.delta())
        .just_finished();
    if interval_elapsed || requested {
        standings.requested = true;
    }

    if !standings.requested || standings.in_flight {
        return;
    }
    standings.requested = false;
    standings.in_flight = true;
    standings.loading = true;

    let client = services.client.clone();
    let identities = services.identities.clone();
    let top_n = standings.top_n;
    let task = IoTaskPool::get().spawn(async move {
        let entries = client.get_top(top_n)?;
        Ok::<_, LeaderboardError>(entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| StandingRow {
                rank: i + 1,
                label: identities.display_label(entry.player_id.as_deref()),
                score_ms: entry.score,
                txid: entry.txid,
            })
            .collect())
    });
    commands.spawn(StandingsTask { task });
}

pub(crate) fn poll_standings_tasks(
    mut commands: Commands,
    mut standings: ResMut<Standings>,
    mut tasks: Query<(Entity, &mut StandingsTask)>,
) {
    for (entity, mut pending) in &mut tasks {
        let Some(result) = check_ready(&mut pending.task) else {
            continue;
        };
        commands.entity(entity).despawn();

        standings.in_flight = false;
        standings.loading = false;
        standings.rows = result.unwrap_or_else(|e| {
            warn!("Standings refresh failed: {}", e);
            Vec::new()
        });
    }
}
