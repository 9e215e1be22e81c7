//! Leaderboard domain: service interfaces and their local implementations.
//!
//! The game talks to the leaderboard, the identity directory and the wallet
//! only through these traits. The local implementations keep everything on
//! this machine so a run can be submitted without any network service.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::leaderboard::identity::Identity;

/// A ranked leaderboard row. Lower scores (faster times) rank higher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Finish time in whole milliseconds.
    pub score: u64,
    pub player_id: Option<String>,
    /// Unix time in milliseconds.
    pub submitted_at: u64,
    pub txid: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub player_id: String,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    /// Reading or writing the backing store failed.
    Io(String),
    /// The backing store holds data that cannot be decoded.
    Parse(String),
    /// The service could not be reached.
    Unavailable(String),
    /// The service refused the request.
    Rejected(String),
}

impl std::fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaderboardError::Io(msg) => write!(f, "Leaderboard storage error: {}", msg),
            LeaderboardError::Parse(msg) => write!(f, "Leaderboard data is corrupt: {}", msg),
            LeaderboardError::Unavailable(msg) => write!(f, "Leaderboard unavailable: {}", msg),
            LeaderboardError::Rejected(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LeaderboardError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// No identity key is available.
    NoIdentity,
    Unavailable(String),
}

impl std::fmt::Display for WalletError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletError::NoIdentity => write!(f, "wallet has no identity key"),
            WalletError::Unavailable(msg) => write!(f, "wallet unavailable: {}", msg),
        }
    }
}

impl std::error::Error for WalletError {}

/// Ranked score storage.
pub trait LeaderboardClient: Send + Sync {
    /// Best `n` entries, fastest first.
    fn get_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    fn submit(&self, submission: &ScoreSubmission) -> Result<(), LeaderboardError>;
}

/// Directory mapping identity keys to display identities.
pub trait IdentityResolver: Send + Sync {
    fn resolve_by_identity_key(&self, key: &str) -> Result<Vec<Identity>, LeaderboardError>;
}

pub trait WalletProvider: Send + Sync {
    fn get_public_key(&self) -> Result<String, WalletError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Local leaderboard
// ============================================================================

/// On-disk shape of a local leaderboard.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredBoard {
    leaderboard_id: String,
    entries: Vec<LeaderboardEntry>,
}

/// Leaderboard kept in memory and optionally persisted as JSON.
pub struct LocalLeaderboard {
    leaderboard_id: String,
    path: Option<PathBuf>,
    entries: Mutex<Vec<LeaderboardEntry>>,
    rng: Mutex<ChaCha8Rng>,
}

impl LocalLeaderboard {
    pub fn in_memory(leaderboard_id: impl Into<String>) -> Self {
        Self {
            leaderboard_id: leaderboard_id.into(),
            path: None,
            entries: Mutex::new(Vec::new()),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(rand::random::<u64>())),
        }
    }

    /// Open the board stored at `path`. A missing file is an empty board.
    pub fn open(
        leaderboard_id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, LeaderboardError> {
        let path = path.as_ref().to_path_buf();
        let mut board = Self::in_memory(leaderboard_id);

        if path.exists() {
            let json = fs::read_to_string(&path)
                .map_err(|e| LeaderboardError::Io(format!("{}: {}", path.display(), e)))?;
            let stored: StoredBoard = serde_json::from_str(&json)
                .map_err(|e| LeaderboardError::Parse(format!("{}: {}", path.display(), e)))?;

            let mut entries = stored.entries;
            sort_entries(&mut entries);
            board.entries = Mutex::new(entries);
        }

        board.path = Some(path);
        Ok(board)
    }

    /// Use a fixed seed for transaction ids.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_txid(&self) -> String {
        let mut rng = lock(&self.rng);
        (0..4)
            .map(|_| format!("{:016x}", rng.random::<u64>()))
            .collect()
    }

    fn persist(&self, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let stored = StoredBoard {
            leaderboard_id: self.leaderboard_id.clone(),
            entries: entries.to_vec(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| LeaderboardError::Parse(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| LeaderboardError::Io(format!("{}: {}", path.display(), e)))
    }
}

/// Fastest first; ties go to the earlier submission.
fn sort_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        a.score
            .cmp(&b.score)
            .then(a.submitted_at.cmp(&b.submitted_at))
    });
}

impl LeaderboardClient for LocalLeaderboard {
    fn get_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(lock(&self.entries).iter().take(n).cloned().collect())
    }

    fn submit(&self, submission: &ScoreSubmission) -> Result<(), LeaderboardError> {
        let entry = LeaderboardEntry {
            score: submission.score,
            player_id: Some(submission.player_id.clone()),
            submitted_at: unix_millis(),
            txid: self.next_txid(),
        };

        let mut entries = lock(&self.entries);
        let mut updated = entries.clone();
        updated.push(entry);
        sort_entries(&mut updated);

        // Only commit in memory once the store accepted it
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

// ============================================================================
// Local identity directory and wallet
// ============================================================================

/// Identity directory backed by a fixed key -> name table.
#[derive(Debug, Default)]
pub struct LocalIdentityDirectory {
    names: HashMap<String, String>,
}

impl LocalIdentityDirectory {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }
}

impl IdentityResolver for LocalIdentityDirectory {
    fn resolve_by_identity_key(&self, key: &str) -> Result<Vec<Identity>, LeaderboardError> {
        Ok(self
            .names
            .get(key)
            .map(|name| Identity {
                name: name.clone(),
                identity_key: key.to_string(),
            })
            .into_iter()
            .collect())
    }
}

/// Wallet that reports a configured identity key.
#[derive(Debug, Default)]
pub struct LocalWallet {
    identity_key: Option<String>,
}

impl LocalWallet {
    pub fn new(identity_key: Option<String>) -> Self {
        Self { identity_key }
    }
}

impl WalletProvider for LocalWallet {
    fn get_public_key(&self) -> Result<String, WalletError> {
        self.identity_key.clone().ok_or(WalletError::NoIdentity)
    }
}
