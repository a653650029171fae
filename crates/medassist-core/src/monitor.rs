//! Periodic liveness probing of the agent service.
//!
//! The monitor owns a background task that probes the health endpoint once
//! immediately and then on every interval tick, publishing the result on a
//! `watch` channel. Probe failures never escape the task; they only turn the
//! indicator to `Down`. The indicator is advisory and never gates dispatch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use medassist_types::config::MonitorConfig;
use medassist_types::connectivity::ConnectivityState;

use crate::transport::BoxAgentTransport;

/// Probe the agent once and classify the result.
///
/// Any error, timeout, or non-`ok` status yields `Down`.
pub async fn probe(transport: &BoxAgentTransport, timeout: Duration) -> ConnectivityState {
    let healthy = match tokio::time::timeout(timeout, transport.health()).await {
        Ok(Ok(health)) => {
            if !health.is_ok() {
                tracing::debug!(status = %health.status, "Agent reported non-ok health status");
            }
            health.is_ok()
        }
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "Health probe failed");
            false
        }
        Err(_) => {
            tracing::debug!(timeout_ms = timeout.as_millis() as u64, "Health probe timed out");
            false
        }
    };
    ConnectivityState::after_probe(healthy)
}

/// Running connectivity probe bound to a consultation's lifetime.
///
/// Dropping the monitor stops the probe task.
pub struct ConnectivityMonitor {
    state: watch::Receiver<ConnectivityState>,
    cancel: CancellationToken,
    stopped: AtomicBool,
    task: Option<JoinHandle<()>>,
}

impl ConnectivityMonitor {
    /// Start probing with the configured interval and timeout.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(transport: Arc<BoxAgentTransport>, config: &MonitorConfig) -> Self {
        Self::start_with(transport, config.interval(), config.probe_timeout())
    }

    pub fn start_with(
        transport: Arc<BoxAgentTransport>,
        interval: Duration,
        probe_timeout: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(ConnectivityState::Unknown);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_probe_loop(
            transport,
            tx,
            cancel.clone(),
            interval,
            probe_timeout,
        ));

        Self {
            state: rx,
            cancel,
            stopped: AtomicBool::new(false),
            task: Some(task),
        }
    }

    /// Current indicator value.
    pub fn state(&self) -> ConnectivityState {
        *self.state.borrow()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.state.clone()
    }

    /// Stop probing. Returns `true` only for the call that actually stopped it.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.cancel.cancel();
        tracing::debug!("Connectivity monitor stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
    }

    /// Stop probing and wait for the probe task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "Connectivity monitor task ended abnormally");
            }
        }
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("state", &self.state())
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_probe_loop(
    transport: Arc<BoxAgentTransport>,
    tx: watch::Sender<ConnectivityState>,
    cancel: CancellationToken,
    interval: Duration,
    probe_timeout: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            state = probe(&transport, probe_timeout) => state,
        };

        publish(&tx, next, transport.base_url());
    }
}

fn publish(tx: &watch::Sender<ConnectivityState>, next: ConnectivityState, base_url: &str) {
    tx.send_if_modified(|current| {
        if *current == next {
            return false;
        }
        match next {
            ConnectivityState::Up => tracing::info!(agent = %base_url, "Agent service is reachable"),
            _ => tracing::warn!(agent = %base_url, "Agent service is unreachable"),
        }
        *current = next;
        true
    });
}
