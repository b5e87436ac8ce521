use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::core::geo::LngLat;

/// The most recent self coordinate, plus whether it came from a live fix or
/// the fallback default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedLocation {
    pub coords: LngLat,
    pub live: bool,
}

struct TrackerState {
    current: Option<TrackedLocation>,
    last_applied: u64,
}

/// Shared self-location state with explicit write ordering.
///
/// A manual "locate me" and the background watch both write here. Each write
/// carries a ticket issued when its request started; `apply` commits only
/// writes newer than the last committed one, so a slow manual fetch cannot
/// clobber a fresher background fix.
pub struct LocationTracker {
    tickets: AtomicU64,
    state: Mutex<TrackerState>,
}

impl LocationTracker {
    pub fn new() -> Self {
        Self {
            tickets: AtomicU64::new(0),
            state: Mutex::new(TrackerState {
                current: None,
                last_applied: 0,
            }),
        }
    }

    /// Takes a ticket for a write. Call this when the request is issued, not
    /// when it completes.
    pub fn issue_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Commits a write if its ticket is still the newest seen. Returns
    /// whether the write was applied.
    pub fn apply(&self, ticket: u64, coords: LngLat, live: bool) -> bool {
        let mut state = self.state.lock().unwrap();
        if ticket <= state.last_applied {
            log::debug!("dropping stale location write (ticket {})", ticket);
            return false;
        }
        state.last_applied = ticket;
        state.current = Some(TrackedLocation { coords, live });
        true
    }

    /// Ticket-and-commit in one step, for writes that complete at issue time
    /// (watch fixes arriving from the platform).
    pub fn record(&self, coords: LngLat, live: bool) {
        let ticket = self.issue_ticket();
        self.apply(ticket, coords, live);
    }

    pub fn current(&self) -> Option<TrackedLocation> {
        self.state.lock().unwrap().current
    }
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new()
    }
}
