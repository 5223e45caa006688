//! Scripted status-progression profiles.

use std::time::Duration;

use serde_json::Value;

/// A scripted progression behavior assigned to one simulated job.
///
/// Profiles queue up on the fake runtime and are consumed FIFO as jobs are
/// submitted; an empty queue yields [`JobProfile::Normal`].
#[derive(Debug, Clone)]
pub enum JobProfile {
    /// Queued, running, then completed with the payload `"foo"`.
    Normal,
    /// Queued, running, then failed with the error payload `"Kaboom!"`.
    Failing,
    /// Queued, running, then cancelled by the server for running too long.
    RanTooLong,
    /// Queued then running, never terminal on its own — only an explicit
    /// cancel ends it.
    Cancelable,
    /// Like [`JobProfile::Normal`] but completing with the given payload.
    CustomResult(Value),
    /// Running for the given duration, then completed with `"foo"`.
    Timed(Duration),
}
