//! Scripted geolocation backend for demos and tests.
//!
//! Stands in for the host platform: one-shot responses are consumed from a
//! queue, watch fixes are pushed by the driver with [`SimulatedGeolocation::emit`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::geo::LngLat;
use crate::location::capability::{
    ErrorCallback, FixCallback, FixError, FixHints, GeolocationCapability,
};
use crate::prelude::HashMap;

/// A scripted one-shot response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptedFix {
    /// Resolve with this coordinate.
    Fix(LngLat),
    /// Resolve with this failure.
    Fail(FixError),
    /// Never resolve; lets callers exercise their bounded wait.
    Hang,
}

struct Watcher {
    on_fix: FixCallback,
    on_error: ErrorCallback,
}

#[derive(Default)]
struct SimState {
    queued: VecDeque<ScriptedFix>,
    watchers: HashMap<u64, Watcher>,
}

/// In-process stand-in for the platform geolocation capability.
pub struct SimulatedGeolocation {
    state: Mutex<SimState>,
    next_watch_id: AtomicU64,
    available: bool,
}

impl SimulatedGeolocation {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState::default()),
            next_watch_id: AtomicU64::new(1),
            available: true,
        }
    }

    /// A platform with no geolocation support at all.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Queues the response for the next one-shot request.
    pub fn script(&self, fix: ScriptedFix) {
        self.state.lock().unwrap().queued.push_back(fix);
    }

    /// Queues a successful one-shot fix.
    pub fn script_fix(&self, coords: LngLat) {
        self.script(ScriptedFix::Fix(coords));
    }

    /// Pushes a watch fix to every registered watcher, returning how many
    /// watchers saw it.
    pub fn emit(&self, coords: LngLat) -> usize {
        let state = self.state.lock().unwrap();
        for watcher in state.watchers.values() {
            (watcher.on_fix)(coords);
        }
        state.watchers.len()
    }

    /// Pushes a transient error to every registered watcher.
    pub fn emit_error(&self, error: FixError) -> usize {
        let state = self.state.lock().unwrap();
        for watcher in state.watchers.values() {
            (watcher.on_error)(error);
        }
        state.watchers.len()
    }

    /// Number of live watches.
    pub fn watcher_count(&self) -> usize {
        self.state.lock().unwrap().watchers.len()
    }
}

impl Default for SimulatedGeolocation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeolocationCapability for SimulatedGeolocation {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn current_position(&self, _hints: FixHints) -> Result<LngLat, FixError> {
        let scripted = self.state.lock().unwrap().queued.pop_front();
        match scripted {
            Some(ScriptedFix::Fix(coords)) => Ok(coords),
            Some(ScriptedFix::Fail(error)) => Err(error),
            Some(ScriptedFix::Hang) => {
                // Far beyond any caller's bounded wait.
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(FixError::Timeout)
            }
            None => Err(FixError::PositionUnavailable),
        }
    }

    fn watch_position(
        &self,
        _hints: FixHints,
        on_fix: FixCallback,
        on_error: ErrorCallback,
    ) -> u64 {
        let watch_id = self.next_watch_id.fetch_add(1, Ordering::Relaxed);
        self.state
            .lock()
            .unwrap()
            .watchers
            .insert(watch_id, Watcher { on_fix, on_error });
        log::debug!("simulated watch {} registered", watch_id);
        watch_id
    }

    fn clear_watch(&self, watch_id: u64) {
        if self.state.lock().unwrap().watchers.remove(&watch_id).is_some() {
            log::debug!("simulated watch {} cleared", watch_id);
        }
    }
}
