//! Engine configuration for lease windows and SLA deadlines.
//!
//! Durations are persisted as whole hours or days so the structs round-trip
//! cleanly through serde; callers obtain [`chrono::Duration`] values through
//! the accessor methods.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for the lease manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseConfig {
    /// Validity window of a freshly granted or renewed lease, in hours.
    pub duration_hours: i64,
}

impl LeaseConfig {
    /// Default lease validity window in hours.
    pub const DEFAULT_DURATION_HOURS: i64 = 4;

    /// Creates a lease configuration with the given validity window.
    #[must_use]
    pub const fn new(duration_hours: i64) -> Self {
        Self { duration_hours }
    }

    /// Returns the lease validity window as a duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::hours(self.duration_hours)
    }
}

impl Default for LeaseConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION_HOURS)
    }
}

/// Configuration for SLA deadline evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaConfig {
    /// Lookahead window before a deadline during which an item is due soon,
    /// in hours.
    pub due_soon_hours: i64,
    /// Default deadline window applied from item creation when no explicit
    /// deadline is set, in days.
    pub default_window_days: i64,
}

impl SlaConfig {
    /// Default due-soon lookahead in hours.
    pub const DEFAULT_DUE_SOON_HOURS: i64 = 24;
    /// Default deadline window in days.
    pub const DEFAULT_WINDOW_DAYS: i64 = 7;

    /// Creates an SLA configuration with the given windows.
    #[must_use]
    pub const fn new(due_soon_hours: i64, default_window_days: i64) -> Self {
        Self {
            due_soon_hours,
            default_window_days,
        }
    }

    /// Returns the due-soon lookahead as a duration.
    #[must_use]
    pub fn due_soon_window(&self) -> Duration {
        Duration::hours(self.due_soon_hours)
    }

    /// Returns the default deadline window as a duration.
    #[must_use]
    pub fn default_window(&self) -> Duration {
        Duration::days(self.default_window_days)
    }
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DUE_SOON_HOURS, Self::DEFAULT_WINDOW_DAYS)
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lease manager configuration.
    pub lease: LeaseConfig,
    /// SLA evaluator configuration.
    pub sla: SlaConfig,
}

impl EngineConfig {
    /// Creates an engine configuration from its parts.
    #[must_use]
    pub const fn new(lease: LeaseConfig, sla: SlaConfig) -> Self {
        Self { lease, sla }
    }
}
