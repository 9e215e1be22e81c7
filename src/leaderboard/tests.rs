//! Leaderboard domain: unit tests for the finish session, identity helpers
//! and the local services.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use bevy::time::TimeUpdateStrategy;

use super::systems::{
    handle_submit_requests, poll_display_name_tasks, poll_standings_tasks, poll_submit_tasks,
    poll_top_entry_tasks, refresh_standings, start_finish_session,
};
use super::*;
use crate::run::RunFinished;

const KEY_A: &str = "02aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const KEY_B: &str = "03bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

fn entry(score: u64, player_id: Option<&str>) -> LeaderboardEntry {
    LeaderboardEntry {
        score,
        player_id: player_id.map(str::to_string),
        submitted_at: 0,
        txid: format!("tx{}", score),
    }
}

fn temp_store(name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "metaspeed-{}-{}.json",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

// -----------------------------------------------------------------------------
// Finish session
// -----------------------------------------------------------------------------

#[test]
fn test_begin_shows_prompt_with_fresh_nonce() {
    let mut session = FinishSession::default();
    let first = session.begin(5000.0);
    let second = session.begin(6000.0);

    assert!(second > first);
    assert!(session.prompt_visible());
    assert!(session.accepts_prompt_input());
    assert_eq!(session.final_ms(), Some(6000.0));
    assert_eq!(session.top_entry(), &TopEntryDisplay::Loading);
}

#[test]
fn test_stale_top_entry_is_discarded() {
    let mut session = FinishSession::default();
    let stale = session.begin(5000.0);
    session.invalidate();
    let current = session.begin(7000.0);

    assert_eq!(
        session.apply_top_entry(stale, Ok(Some(entry(1000, Some(KEY_A))))),
        None
    );
    assert_eq!(session.top_entry(), &TopEntryDisplay::Loading);

    assert_eq!(
        session.apply_top_entry(current, Ok(Some(entry(1000, Some(KEY_A))))),
        Some(KEY_A.to_string())
    );
    assert_eq!(
        session.top_entry(),
        &TopEntryDisplay::Entry {
            label: "02aaaa...".to_string(),
            score_ms: 1000
        }
    );
}

#[test]
fn test_top_entry_placeholders() {
    let mut session = FinishSession::default();
    let nonce = session.begin(5000.0);
    assert_eq!(session.apply_top_entry(nonce, Ok(None)), None);
    assert_eq!(session.top_entry(), &TopEntryDisplay::NoData);

    let nonce = session.begin(5000.0);
    let err = LeaderboardError::Unavailable("offline".to_string());
    assert_eq!(session.apply_top_entry(nonce, Err(err)), None);
    assert_eq!(session.top_entry(), &TopEntryDisplay::NoData);

    let nonce = session.begin(5000.0);
    assert_eq!(session.apply_top_entry(nonce, Ok(Some(entry(900, None)))), None);
    assert_eq!(
        session.top_entry(),
        &TopEntryDisplay::Entry {
            label: ANONYMOUS_PLAYER_ID.to_string(),
            score_ms: 900
        }
    );
}

#[test]
fn test_display_name_upgrade_requires_current_nonce() {
    let mut session = FinishSession::default();
    let nonce = session.begin(5000.0);
    session.apply_top_entry(nonce, Ok(Some(entry(1000, Some(KEY_A)))));

    assert!(!session.apply_display_name(nonce + 1, "Mallory".to_string()));
    assert!(session.apply_display_name(nonce, "Alice".to_string()));
    assert_eq!(
        session.top_entry(),
        &TopEntryDisplay::Entry {
            label: "Alice".to_string(),
            score_ms: 1000
        }
    );
}

#[test]
fn test_submit_is_claimed_once() {
    let mut session = FinishSession::default();
    session.begin(82_417.9);

    let ticket = session.begin_submit().unwrap();
    assert_eq!(ticket.score, 82_417);
    assert_eq!(ticket.nonce, session.nonce());
    assert_eq!(session.status(), "Submitting…");
    assert!(!session.controls_enabled());
    assert!(!session.accepts_prompt_input());

    // Re-entrant request while in flight
    assert_eq!(session.begin_submit(), None);

    session.finish_submit(ticket.nonce, Ok(()));
    assert_eq!(session.begin_submit(), None);
}

#[test]
fn test_failed_submit_allows_retry() {
    let mut session = FinishSession::default();
    session.begin(12_345.0);

    let ticket = session.begin_submit().unwrap();
    let err = LeaderboardError::Rejected("Insufficient funds".to_string());
    assert_eq!(session.finish_submit(ticket.nonce, Err(err)), SubmitOutcome::Failed);

    assert_eq!(session.status(), "Insufficient funds");
    assert!(session.controls_enabled());
    assert!(session.prompt_visible());
    assert!(!session.is_submitting());
    assert_eq!(session.final_ms(), Some(12_345.0));

    let retry = session.begin_submit().unwrap();
    assert_eq!(retry.score, 12_345);
}

#[test]
fn test_failure_without_message_uses_generic_status() {
    let mut session = FinishSession::default();
    session.begin(1000.0);
    let ticket = session.begin_submit().unwrap();

    session.finish_submit(ticket.nonce, Err(LeaderboardError::Rejected(String::new())));
    assert_eq!(session.status(), "Submission failed");
}

#[test]
fn test_skip_hides_prompt_for_good() {
    let mut session = FinishSession::default();
    session.begin(1000.0);

    assert!(session.skip());
    assert!(!session.prompt_visible());
    assert!(!session.skip());
    assert_eq!(session.begin_submit(), None);
}

#[test]
fn test_skip_ignored_while_submitting() {
    let mut session = FinishSession::default();
    session.begin(1000.0);
    session.begin_submit().unwrap();

    assert!(!session.skip());
    assert!(session.prompt_visible());
}

#[test]
fn test_submit_result_after_restart_is_stale() {
    let mut session = FinishSession::default();
    session.begin(1000.0);
    let ticket = session.begin_submit().unwrap();

    session.invalidate();
    assert_eq!(session.finish_submit(ticket.nonce, Ok(())), SubmitOutcome::Stale);
    assert!(!session.is_submitted());
    assert!(!session.is_active());
    assert_eq!(session.status(), "");
}

#[test]
fn test_no_submit_without_finished_run() {
    let mut session = FinishSession::default();
    assert_eq!(session.begin_submit(), None);
}

#[test]
fn test_successful_submit_scenario() {
    let mut session = FinishSession::default();
    let nonce = session.begin(82_417.0);
    session.apply_top_entry(nonce, Ok(None));

    let ticket = session.begin_submit().unwrap();
    assert_eq!(ticket.score, 82_417);

    let outcome = session.finish_submit(ticket.nonce, Ok(()));
    let SubmitOutcome::Submitted { refresh_nonce } = outcome else {
        panic!("expected a successful submit, got {:?}", outcome);
    };

    assert!(refresh_nonce > nonce);
    assert!(session.is_current(refresh_nonce));
    assert!(session.is_submitted());
    assert!(!session.prompt_visible());
    assert_eq!(session.status(), "Submitted!");
    assert_eq!(session.top_entry(), &TopEntryDisplay::Loading);

    // A late answer to the first lookup no longer applies
    session.apply_top_entry(nonce, Ok(None));
    assert_eq!(session.top_entry(), &TopEntryDisplay::Loading);
}

#[test]
fn test_invalidate_never_reuses_nonces() {
    let mut session = FinishSession::default();
    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(session.begin(1000.0));
        session.invalidate();
        seen.push(session.nonce());
    }
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_score_and_fee_formatting() {
    assert_eq!(score_from_ms(82_417.9), 82_417);
    assert_eq!(score_from_ms(-3.0), 0);
    assert_eq!(score_from_ms(f64::NAN), 0);

    assert_eq!(format_sats(10_000), "10,000");
    assert_eq!(format_sats(999), "999");
    assert_eq!(format_sats(1_000), "1,000");
    assert_eq!(format_sats(1_234_567), "1,234,567");
    assert_eq!(format_sats(0), "0");
}

// -----------------------------------------------------------------------------
// Identity
// -----------------------------------------------------------------------------

#[test]
fn test_shorten_identity_key() {
    assert_eq!(shorten_identity_key("Anonymous"), "Anonymous");
    assert_eq!(shorten_identity_key("abcdefghijkl"), "abcdefghijkl");
    assert_eq!(shorten_identity_key("abcdefghijklm"), "abcdef...");
    assert_eq!(shorten_identity_key(KEY_A), "02aaaa...");
}

#[test]
fn test_identity_key_heuristic() {
    assert!(is_likely_identity_key(KEY_A));
    assert!(is_likely_identity_key(&KEY_B.to_uppercase()));
    assert!(!is_likely_identity_key(&KEY_A[..65]));
    assert!(!is_likely_identity_key(&KEY_A.replace('a', "g")));
    assert!(!is_likely_identity_key("Anonymous"));
}

struct CountingResolver {
    calls: AtomicUsize,
    fail: bool,
}

impl IdentityResolver for CountingResolver {
    fn resolve_by_identity_key(&self, key: &str) -> Result<Vec<Identity>, LeaderboardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LeaderboardError::Unavailable("directory down".to_string()));
        }
        if key == KEY_A {
            Ok(vec![Identity {
                name: "Alice".to_string(),
                identity_key: key.to_string(),
            }])
        } else {
            Ok(Vec::new())
        }
    }
}

fn counting(fail: bool) -> Arc<CountingResolver> {
    Arc::new(CountingResolver {
        calls: AtomicUsize::new(0),
        fail,
    })
}

#[test]
fn test_identity_cache_looks_up_each_key_once() {
    let resolver = counting(false);
    let cache = IdentityCache::new(resolver.clone());

    assert_eq!(cache.resolve(KEY_A).map(|i| i.name), Some("Alice".to_string()));
    assert_eq!(cache.resolve(KEY_A).map(|i| i.name), Some("Alice".to_string()));
    assert_eq!(cache.resolve(KEY_B), None);
    assert_eq!(cache.resolve(KEY_B), None);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_identity_cache_skips_non_keys_and_caches_failures() {
    let resolver = counting(true);
    let cache = IdentityCache::new(resolver.clone());

    assert_eq!(cache.resolve("Anonymous"), None);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);

    assert_eq!(cache.resolve(KEY_A), None);
    assert_eq!(cache.resolve(KEY_A), None);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_display_labels() {
    let cache = IdentityCache::new(counting(false));
    assert_eq!(cache.display_label(None), "Anonymous");
    assert_eq!(cache.display_label(Some("Anonymous")), "Anonymous");
    assert_eq!(cache.display_label(Some(KEY_A)), "Alice");
    assert_eq!(cache.display_label(Some(KEY_B)), "03bbbb...");
}

// -----------------------------------------------------------------------------
// Local services
// -----------------------------------------------------------------------------

fn submit(board: &LocalLeaderboard, player_id: &str, score: u64) {
    board
        .submit(&ScoreSubmission {
            player_id: player_id.to_string(),
            score,
        })
        .unwrap();
}

#[test]
fn test_local_leaderboard_ranks_fastest_first() {
    let board = LocalLeaderboard::in_memory("metaspeed:scores").with_seed(7);
    submit(&board, KEY_A, 90_000);
    submit(&board, KEY_B, 45_000);
    submit(&board, "Anonymous", 60_000);

    let top = board.get_top(2).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].score, 45_000);
    assert_eq!(top[0].player_id.as_deref(), Some(KEY_B));
    assert_eq!(top[1].score, 60_000);
    assert_eq!(board.get_top(20).unwrap().len(), 3);
}

#[test]
fn test_local_leaderboard_txids_are_unique_hex() {
    let board = LocalLeaderboard::in_memory("metaspeed:scores").with_seed(42);
    submit(&board, KEY_A, 1000);
    submit(&board, KEY_A, 1000);

    let top = board.get_top(2).unwrap();
    assert_ne!(top[0].txid, top[1].txid);
    for entry in &top {
        assert_eq!(entry.txid.len(), 64);
        assert!(entry.txid.bytes().all(|b| b.is_ascii_hexdigit()));
    }
}

#[test]
fn test_local_leaderboard_persists_between_opens() {
    let path = temp_store("persist");
    {
        let board = LocalLeaderboard::open("metaspeed:scores", &path).unwrap();
        assert!(board.is_empty());
        submit(&board, KEY_A, 70_000);
        submit(&board, KEY_B, 50_000);
    }

    let reopened = LocalLeaderboard::open("metaspeed:scores", &path).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get_top(1).unwrap()[0].score, 50_000);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_corrupt_store_is_a_parse_error() {
    let path = temp_store("corrupt");
    std::fs::write(&path, "not json").unwrap();

    let result = LocalLeaderboard::open("metaspeed:scores", &path);
    assert!(matches!(result, Err(LeaderboardError::Parse(_))));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_local_identity_directory_and_wallet() {
    let mut names = HashMap::new();
    names.insert(KEY_A.to_string(), "Alice".to_string());
    let directory = LocalIdentityDirectory::new(names);

    let found = directory.resolve_by_identity_key(KEY_A).unwrap();
    assert_eq!(found[0].name, "Alice");
    assert!(directory.resolve_by_identity_key(KEY_B).unwrap().is_empty());

    assert_eq!(
        LocalWallet::new(None).get_public_key(),
        Err(WalletError::NoIdentity)
    );
    assert_eq!(
        LocalWallet::new(Some(KEY_A.to_string())).get_public_key(),
        Ok(KEY_A.to_string())
    );
}

// -----------------------------------------------------------------------------
// Task flow
// -----------------------------------------------------------------------------

#[derive(Resource, Default)]
struct RefreshCount(usize);

fn count_refreshes(mut reader: MessageReader<LeaderboardRefresh>, mut count: ResMut<RefreshCount>) {
    count.0 += reader.read().count();
}

fn flow_app(services: LeaderboardServices) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(services)
        .init_resource::<FinishSession>()
        .init_resource::<RefreshCount>()
        .add_message::<RunFinished>()
        .add_message::<SubmitRequested>()
        .add_message::<LeaderboardRefresh>()
        .add_systems(
            Update,
            (
                start_finish_session,
                handle_submit_requests,
                poll_top_entry_tasks,
                poll_display_name_tasks,
                poll_submit_tasks,
                count_refreshes,
            )
                .chain(),
        );
    app
}

/// Update until `done` holds, giving the task pool time to finish.
fn run_until(app: &mut App, done: impl Fn(&World) -> bool) {
    for _ in 0..500 {
        app.update();
        if done(app.world()) {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("condition not reached");
}

#[test]
fn test_finish_and_submit_flow() {
    let mut names = HashMap::new();
    names.insert(KEY_A.to_string(), "Alice".to_string());
    let settings = crate::content::LeaderboardSettings {
        identity_key: Some(KEY_A.to_string()),
        known_identities: names,
        ..Default::default()
    };
    let services = LeaderboardServices::local(&settings);
    let client = services.client.clone();

    let mut app = flow_app(services);
    app.world_mut().write_message(RunFinished { final_ms: 82_417.0 });

    run_until(&mut app, |world| {
        world.resource::<FinishSession>().top_entry() == &TopEntryDisplay::NoData
    });

    app.world_mut().write_message(SubmitRequested);
    run_until(&mut app, |world| {
        matches!(
            world.resource::<FinishSession>().top_entry(),
            TopEntryDisplay::Entry { label, .. } if label == "Alice"
        )
    });

    let session = app.world().resource::<FinishSession>();
    assert_eq!(session.status(), "Submitted!");
    assert!(session.is_submitted());
    assert_eq!(app.world().resource::<RefreshCount>().0, 1);

    let top = client.get_top(1).unwrap();
    assert_eq!(top[0].score, 82_417);
    assert_eq!(top[0].player_id.as_deref(), Some(KEY_A));
}

#[test]
fn test_anonymous_submit_when_wallet_has_no_key() {
    let services = LeaderboardServices::local(&crate::content::LeaderboardSettings::default());
    let client = services.client.clone();

    let mut app = flow_app(services);
    app.world_mut().write_message(RunFinished { final_ms: 5_000.4 });
    app.world_mut().write_message(SubmitRequested);

    run_until(&mut app, |world| {
        matches!(
            world.resource::<FinishSession>().top_entry(),
            TopEntryDisplay::Entry { .. }
        )
    });

    let top = client.get_top(1).unwrap();
    assert_eq!(top[0].player_id.as_deref(), Some(ANONYMOUS_PLAYER_ID));
    assert_eq!(top[0].score, 5_000);
}

// -----------------------------------------------------------------------------
// Standings refresh
// -----------------------------------------------------------------------------

#[derive(Default)]
struct CountingBoard {
    fetches: AtomicUsize,
}

impl LeaderboardClient for CountingBoard {
    fn get_top(&self, _n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(vec![entry(41_000, None)])
    }

    fn submit(&self, _submission: &ScoreSubmission) -> Result<(), LeaderboardError> {
        Ok(())
    }
}

fn set_frame_step(app: &mut App, step: Duration) {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(step));
}

fn standings_idle(world: &World) -> bool {
    !world.resource::<Standings>().loading
}

#[test]
fn test_standings_refresh_on_wall_clock_once_per_trigger() {
    let board = Arc::new(CountingBoard::default());
    let services = LeaderboardServices {
        client: board.clone(),
        identities: Arc::new(IdentityCache::new(counting(false))),
        wallet: Arc::new(LocalWallet::new(None)),
    };
    let settings = crate::content::LeaderboardSettings {
        refresh_secs: 1.0,
        ..Default::default()
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(services)
        .insert_resource(Standings::new(&settings))
        .add_message::<LeaderboardRefresh>()
        .add_systems(Update, (refresh_standings, poll_standings_tasks).chain());
    set_frame_step(&mut app, Duration::ZERO);

    run_until(&mut app, standings_idle);
    assert_eq!(board.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(app.world().resource::<Standings>().rows.len(), 1);

    // Gameplay paused: the interval still elapses on the real clock
    app.world_mut().resource_mut::<Time<Virtual>>().pause();
    set_frame_step(&mut app, Duration::from_secs(1));
    app.update();
    set_frame_step(&mut app, Duration::ZERO);
    run_until(&mut app, standings_idle);
    assert_eq!(board.fetches.load(Ordering::SeqCst), 2);

    // Interval and request on the same frame start a single fetch
    app.world_mut().write_message(LeaderboardRefresh);
    set_frame_step(&mut app, Duration::from_secs(1));
    app.update();
    set_frame_step(&mut app, Duration::ZERO);
    run_until(&mut app, standings_idle);
    for _ in 0..5 {
        app.update();
    }
    run_until(&mut app, standings_idle);
    assert_eq!(board.fetches.load(Ordering::SeqCst), 3);
}
