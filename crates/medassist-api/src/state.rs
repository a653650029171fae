//! Application state wiring the consultation together.
//!
//! AppState holds the shared transport, the single consultation session, and
//! (for long-running commands) the connectivity monitor. Used by both the CLI
//! chat loop and the REST handlers.

use std::sync::Arc;

use medassist_core::monitor::ConnectivityMonitor;
use medassist_core::session::ConsultationSession;
use medassist_core::transport::BoxAgentTransport;
use medassist_infra::agent::HttpAgentClient;
use medassist_types::config::ClientConfig;
use medassist_types::connectivity::ConnectivityState;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClientConfig>,
    pub transport: Arc<BoxAgentTransport>,
    pub session: Arc<ConsultationSession>,
    pub monitor: Option<Arc<ConnectivityMonitor>>,
}

impl AppState {
    /// Build the HTTP transport and open a consultation session.
    pub fn init(config: ClientConfig) -> anyhow::Result<Self> {
        let client = HttpAgentClient::new(&config.agent)?;
        tracing::debug!(agent = %config.agent.base(), "Agent client ready");
        Ok(Self::with_transport(config, BoxAgentTransport::new(client)))
    }

    pub fn with_transport(config: ClientConfig, transport: BoxAgentTransport) -> Self {
        let transport = Arc::new(transport);
        let session = ConsultationSession::new(transport.clone(), config.greeting.as_deref());
        Self {
            config: Arc::new(config),
            transport,
            session: Arc::new(session),
            monitor: None,
        }
    }

    /// Start probing agent liveness for the lifetime of this state.
    ///
    /// Must be called from within the tokio runtime.
    pub fn with_monitor(mut self) -> Self {
        let monitor = ConnectivityMonitor::start(self.transport.clone(), &self.config.monitor);
        self.monitor = Some(Arc::new(monitor));
        self
    }

    pub fn connectivity(&self) -> ConnectivityState {
        self.monitor
            .as_ref()
            .map(|monitor| monitor.state())
            .unwrap_or_default()
    }

    /// Stop the connectivity monitor, if one is running.
    pub fn shutdown(&self) {
        if let Some(monitor) = &self.monitor {
            monitor.stop();
        }
    }
}
