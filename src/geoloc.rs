//! Tracking for asynchronous position requests.
//!
//! Geolocation is the one boundary where the core waits on the outside
//! world: the device provider resolves some time after the request, and a
//! user can retrigger acquisition while an earlier request is still in
//! flight. Left alone, whichever callback lands last would win. A
//! [`PositionWatch`] makes that race explicit instead: every request gets a
//! token, a newer [`begin`](PositionWatch::begin) supersedes the requests
//! before it, and a completion carrying a superseded token is rejected
//! rather than applied.
//!
//! The watch holds state only; actually calling the device provider (and
//! enforcing [`GEOLOCATION_TIMEOUT`]) stays with the embedding application.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::types::Coord;

/// How long a provider should wait for a position before completing the
/// request with [`GeolocateError::Timeout`].
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Identifies one position request issued by [`PositionWatch::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Why a position request failed.
///
/// All variants are retryable and none of them touches incident state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocateError {
    /// The user or platform denied the location permission.
    #[error("location permission denied")]
    Denied,
    /// The provider could not produce a position.
    #[error("position unavailable")]
    Unavailable,
    /// No position arrived before the acquisition deadline.
    #[error("position request timed out")]
    Timeout,
}

/// State machine for the viewer's position.
///
/// At most one request is live at a time. The held fix survives later
/// failed requests, so the feed keeps its last known center when a retry
/// times out.
#[derive(Debug, Default)]
pub struct PositionWatch {
    next_generation: u64,
    pending: Option<u64>,
    fix: Option<Coord>,
    error: Option<GeolocateError>,
}

impl PositionWatch {
    /// Creates a watch with no position and no pending request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new position request, superseding any still in flight.
    ///
    /// The returned token must be presented with the outcome; completions
    /// for superseded requests are rejected.
    pub fn begin(&mut self) -> RequestToken {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.pending = Some(generation);
        debug!(generation, "position request started");
        RequestToken(generation)
    }

    /// Applies the outcome of a position request.
    ///
    /// Returns `true` when the outcome was applied. A completion whose
    /// token was superseded by a newer [`begin`](PositionWatch::begin), or
    /// already completed, returns `false` and changes nothing.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<Coord, GeolocateError>,
    ) -> bool {
        if self.pending != Some(token.0) {
            debug!(generation = token.0, "stale position completion rejected");
            return false;
        }
        self.pending = None;

        match outcome {
            Ok(coord) => {
                debug!(lat = coord.lat, lng = coord.lng, "position fix acquired");
                self.fix = Some(coord);
                self.error = None;
            }
            Err(error) => {
                warn!(%error, "position request failed");
                self.error = Some(error);
            }
        }
        true
    }

    /// The most recent successful fix, if any.
    pub fn position(&self) -> Option<Coord> {
        self.fix
    }

    /// The most recent failure, cleared by the next successful fix.
    pub fn last_error(&self) -> Option<GeolocateError> {
        self.error
    }

    /// Reports whether a request is currently awaiting its outcome.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
