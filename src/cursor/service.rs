// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Polling cursor detection service
//!
//! Owns one background thread that runs [`CursorDetector::evaluate`] every
//! interval while the service is running. Changes are handed to a sink
//! callback on that thread; the app's sink posts them to the UI mailbox so
//! the auto click-through channel is only ever written on the UI context.
//!
//! ```text
//! Stopped --start--> Running --suspend--> Suspended
//!    ^                  ^  <----resume-------'
//!    '------stop--------'
//! ```

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use crate::cursor::detector::{CursorDetector, CursorTarget, CursorVisibility};
use crate::engine::ProcessQuery;

/// Shortest allowed polling interval
pub const MIN_INTERVAL_MS: u64 = 50;

/// A visibility change, tagged with the run of the service that saw it
///
/// Every `start` and `stop` opens a new session. A change whose session is
/// not [`CursorDetectionService::session`] came from a run that has since
/// been reset and must be ignored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CursorChange {
    pub visibility: CursorVisibility,
    pub session: u64,
}

/// Receives visibility changes on the polling thread
///
/// Called with the service lock held, so changes arrive in the order they
/// were evaluated. Must not block or call back into the service.
pub type CursorSink = Arc<dyn Fn(CursorChange) + Send + Sync>;

/// Errors starting the polling thread
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Failed to spawn cursor polling thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Lifecycle state
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ServiceState {
    Stopped,
    Running,
    Suspended,
}

struct Inner {
    state: ServiceState,
    detector: CursorDetector,
    interval: Duration,
    session: u64,
}

impl Inner {
    fn evaluate(&mut self, system: &dyn ProcessQuery) -> Option<CursorChange> {
        let session = self.session;
        self.detector
            .evaluate(system)
            .map(|visibility| CursorChange { visibility, session })
    }
}

struct Shared {
    inner: Mutex<Inner>,
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Foreground cursor visibility poller
pub struct CursorDetectionService {
    system: Arc<dyn ProcessQuery>,
    sink: CursorSink,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

/// Clamps a configured interval to [`MIN_INTERVAL_MS`].
pub fn clamp_interval(interval_ms: u64) -> Duration {
    Duration::from_millis(interval_ms.max(MIN_INTERVAL_MS))
}

impl CursorDetectionService {
    /// Creates a stopped service.
    pub fn new(system: Arc<dyn ProcessQuery>, sink: CursorSink, override_key: u32) -> Self {
        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                state: ServiceState::Stopped,
                detector: CursorDetector::new(CursorTarget::None, override_key, false),
                interval: clamp_interval(0),
                session: 0,
            }),
            wake: Condvar::new(),
        });
        Self {
            system,
            sink,
            shared,
            worker: None,
        }
    }

    pub fn state(&self) -> ServiceState {
        self.shared.lock().state
    }

    pub fn interval(&self) -> Duration {
        self.shared.lock().interval
    }

    /// Current session; see [`CursorChange`].
    pub fn session(&self) -> u64 {
        self.shared.lock().session
    }

    /// Starts (or restarts) polling for `target`.
    ///
    /// Resets the remembered cursor state to "visible", so the first tick
    /// inside a game that has captured the cursor reports `Hidden`. Opens
    /// a new session.
    ///
    /// # Errors
    ///
    /// Returns `CursorError::Spawn` if the polling thread cannot be created;
    /// the service stays stopped.
    pub fn start(&mut self, target: CursorTarget, interval_ms: u64, debug_log: bool) -> Result<(), CursorError> {
        {
            let mut inner = self.shared.lock();
            inner.detector.set_target(target);
            inner.detector.set_debug_log(debug_log);
            inner.detector.reset();
            inner.interval = clamp_interval(interval_ms);
            inner.session += 1;
            inner.state = ServiceState::Running;
            tracing::info!(
                tracked = ?inner.detector.target(),
                interval_ms = inner.interval.as_millis() as u64,
                "cursor detection started"
            );
        }
        self.shared.wake.notify_all();

        if self.worker.is_some() {
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        let system = Arc::clone(&self.system);
        let sink = Arc::clone(&self.sink);
        let spawned = thread::Builder::new()
            .name("cursor-detection".to_string())
            .spawn(move || poll_loop(&shared, system.as_ref(), &sink));

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared.lock().state = ServiceState::Stopped;
                Err(CursorError::Spawn(e))
            }
        }
    }

    /// Pauses ticking, keeping target and interval.
    pub fn suspend(&self) {
        let mut inner = self.shared.lock();
        if inner.state == ServiceState::Running {
            inner.state = ServiceState::Suspended;
            tracing::debug!("cursor detection suspended");
        }
        drop(inner);
        self.shared.wake.notify_all();
    }

    /// Resumes ticking and evaluates once right away.
    pub fn resume(&self) {
        {
            let mut inner = self.shared.lock();
            if inner.state != ServiceState::Suspended {
                return;
            }
            inner.state = ServiceState::Running;
            tracing::debug!("cursor detection resumed");
            if let Some(change) = inner.evaluate(self.system.as_ref()) {
                (self.sink)(change);
            }
        }
        self.shared.wake.notify_all();
    }

    /// Replaces the tracked process set in place.
    pub fn set_target_process(&self, target: CursorTarget) {
        self.shared.lock().detector.set_target(target);
    }

    /// Changes the polling interval in place (clamped).
    pub fn set_interval(&self, interval_ms: u64) {
        self.shared.lock().interval = clamp_interval(interval_ms);
        self.shared.wake.notify_all();
    }

    pub fn set_override_key(&self, vk_code: u32) {
        self.shared.lock().detector.set_override_key(vk_code);
    }

    /// Stops polling and joins the thread. Safe to call repeatedly.
    ///
    /// Stopping a running or suspended service opens a new session.
    pub fn stop(&mut self) {
        {
            let mut inner = self.shared.lock();
            if inner.state != ServiceState::Stopped {
                inner.session += 1;
                tracing::info!("cursor detection stopped");
            }
            inner.state = ServiceState::Stopped;
        }
        self.shared.wake.notify_all();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("cursor polling thread panicked");
            }
        }
    }

    /// Releases the polling thread. Same as [`stop`](Self::stop).
    pub fn dispose(&mut self) {
        self.stop();
    }
}

impl Drop for CursorDetectionService {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_loop(shared: &Shared, system: &dyn ProcessQuery, sink: &CursorSink) {
    let mut inner = shared.lock();
    loop {
        match inner.state {
            ServiceState::Stopped => return,
            ServiceState::Suspended => {
                inner = shared.wake.wait(inner).unwrap_or_else(PoisonError::into_inner);
                continue;
            }
            ServiceState::Running => {}
        }

        let interval = inner.interval;
        let (guard, timeout) = shared
            .wake
            .wait_timeout(inner, interval)
            .unwrap_or_else(PoisonError::into_inner);
        inner = guard;

        // Woken early by a state or interval change: re-check before ticking
        if !timeout.timed_out() || inner.state != ServiceState::Running {
            continue;
        }

        if let Some(change) = inner.evaluate(system) {
            sink(change);
        }
    }
}
