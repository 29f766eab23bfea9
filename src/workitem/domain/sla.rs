//! Pure SLA deadline evaluation.
//!
//! Status is derived at read time from `(stage, created_at, deadline, now)`
//! and is never stored, so it cannot go stale. Every caller — queue
//! projections, servers, clients — derives it through this one function.

use super::Stage;
use crate::config::SlaConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived urgency classification of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaStatus {
    /// The deadline is comfortably in the future, or the item is delivered.
    OnTrack,
    /// The deadline falls within the configured lookahead window.
    DueSoon,
    /// The deadline has passed.
    Overdue,
    /// No deadline can be derived.
    NoDueDate,
}

impl SlaStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::DueSoon => "due_soon",
            Self::Overdue => "overdue",
            Self::NoDueDate => "no_due_date",
        }
    }
}

impl fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evaluates the SLA status of a work item at `now`.
///
/// Delivered or approved work (`Posted`, `ReadyToPost`) is always on track
/// regardless of any deadline. Otherwise the explicit deadline applies when
/// set; failing that, a default deadline of `created_at + default_window` is
/// derived. With neither a deadline nor a creation time the status is
/// `NoDueDate`. The deadline boundary is inclusive: an item whose deadline
/// equals `now` is overdue.
#[must_use]
pub fn evaluate_sla(
    stage: Stage,
    created_at: Option<DateTime<Utc>>,
    sla_deadline_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    config: &SlaConfig,
) -> SlaStatus {
    if matches!(stage, Stage::Posted | Stage::ReadyToPost) {
        return SlaStatus::OnTrack;
    }
    let deadline = sla_deadline_at.or_else(|| created_at.map(|c| c + config.default_window()));
    deadline.map_or(SlaStatus::NoDueDate, |due| {
        if now >= due {
            SlaStatus::Overdue
        } else if due - now <= config.due_soon_window() {
            SlaStatus::DueSoon
        } else {
            SlaStatus::OnTrack
        }
    })
}
