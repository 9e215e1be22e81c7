//! Leaderboard domain: the per-finish submission session.
//!
//! Every async result carries the nonce it was launched under and is
//! applied only while that nonce is still current.

use bevy::prelude::*;

use crate::leaderboard::identity::fallback_label;
use crate::leaderboard::services::{LeaderboardEntry, LeaderboardError};

pub const STATUS_SUBMITTING: &str = "Submitting…";
pub const STATUS_SUBMITTED: &str = "Submitted!";
pub const STATUS_FAILED: &str = "Submission failed";

/// What the finish panel shows for the current first place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopEntryDisplay {
    #[default]
    Hidden,
    Loading,
    /// Lookup failed or the board is empty.
    NoData,
    Entry { label: String, score_ms: u64 },
}

/// A submit accepted by [`FinishSession::begin_submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    pub nonce: u64,
    pub score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted; the top entry should be re-fetched under `refresh_nonce`.
    Submitted { refresh_nonce: u64 },
    /// Rejected or unreachable; the prompt is usable again.
    Failed,
    /// The session moved on while the submit was in flight.
    Stale,
}

#[derive(Resource, Debug, Default)]
pub struct FinishSession {
    nonce: u64,
    final_ms: Option<f64>,
    prompt_visible: bool,
    submitting: bool,
    submitted: bool,
    controls_enabled: bool,
    status: String,
    top_entry: TopEntryDisplay,
}

impl FinishSession {
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn is_current(&self, nonce: u64) -> bool {
        self.nonce == nonce
    }

    pub fn final_ms(&self) -> Option<f64> {
        self.final_ms
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn top_entry(&self) -> &TopEntryDisplay {
        &self.top_entry
    }

    /// Whether the panel is showing a finished run.
    pub fn is_active(&self) -> bool {
        self.final_ms.is_some()
    }

    /// Start a session for a finished run and return the nonce for its
    /// top-entry lookup.
    pub fn begin(&mut self, final_ms: f64) -> u64 {
        self.nonce += 1;
        self.final_ms = Some(final_ms);
        self.prompt_visible = true;
        self.submitting = false;
        self.submitted = false;
        self.controls_enabled = true;
        self.status.clear();
        self.top_entry = TopEntryDisplay::Loading;
        self.nonce
    }

    /// Abandon the session. Results still in flight become stale.
    pub fn invalidate(&mut self) {
        let nonce = self.nonce + 1;
        *self = Self {
            nonce,
            ..Self::default()
        };
    }

    /// Apply a top-entry lookup. Returns the player id whose display name
    /// should be resolved next, if any.
    pub fn apply_top_entry(
        &mut self,
        nonce: u64,
        result: Result<Option<LeaderboardEntry>, LeaderboardError>,
    ) -> Option<String> {
        if !self.is_current(nonce) {
            return None;
        }

        match result {
            Ok(Some(entry)) => {
                self.top_entry = TopEntryDisplay::Entry {
                    label: fallback_label(entry.player_id.as_deref()),
                    score_ms: entry.score,
                };
                entry.player_id
            }
            Ok(None) | Err(_) => {
                self.top_entry = TopEntryDisplay::NoData;
                None
            }
        }
    }

    /// Upgrade the top-entry label to a resolved display name.
    pub fn apply_display_name(&mut self, nonce: u64, name: String) -> bool {
        if !self.is_current(nonce) {
            return false;
        }
        match &mut self.top_entry {
            TopEntryDisplay::Entry { label, .. } => {
                *label = name;
                true
            }
            _ => false,
        }
    }

    /// Whether Y/N and the submit button should respond.
    pub fn accepts_prompt_input(&self) -> bool {
        self.prompt_visible && self.controls_enabled && !self.submitting && !self.submitted
    }

    /// Claim the single submit for this session.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if !self.prompt_visible || self.submitting || self.submitted {
            return None;
        }
        let final_ms = self.final_ms?;

        self.submitting = true;
        self.controls_enabled = false;
        self.status = STATUS_SUBMITTING.to_string();

        Some(SubmitTicket {
            nonce: self.nonce,
            score: score_from_ms(final_ms),
        })
    }

    pub fn finish_submit(&mut self, nonce: u64, result: Result<(), LeaderboardError>) -> SubmitOutcome {
        if !self.is_current(nonce) {
            return SubmitOutcome::Stale;
        }
        self.submitting = false;

        match result {
            Ok(()) => {
                self.submitted = true;
                self.prompt_visible = false;
                self.status = STATUS_SUBMITTED.to_string();

                self.nonce += 1;
                self.top_entry = TopEntryDisplay::Loading;
                SubmitOutcome::Submitted {
                    refresh_nonce: self.nonce,
                }
            }
            Err(e) => {
                let message = e.to_string();
                self.status = if message.is_empty() {
                    STATUS_FAILED.to_string()
                } else {
                    message
                };
                self.controls_enabled = true;
                SubmitOutcome::Failed
            }
        }
    }

    /// Hide the prompt for good. Ignored mid-submit.
    pub fn skip(&mut self) -> bool {
        if !self.prompt_visible || self.submitting {
            return false;
        }
        self.prompt_visible = false;
        true
    }
}

/// Whole milliseconds, never negative.
pub fn score_from_ms(final_ms: f64) -> u64 {
    if final_ms.is_finite() {
        final_ms.max(0.0).floor() as u64
    } else {
        0
    }
}

/// Group thousands with commas: 10000 -> "10,000".
pub fn format_sats(sats: u64) -> String {
    let digits = sats.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
