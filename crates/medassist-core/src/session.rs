//! Consultation session: transcript, dispatch, and form elicitation.
//!
//! `ConsultationSession` is the single owner of the transcript. It is shared
//! between the interactive CLI and the REST handlers behind an `Arc`, so all
//! mutable state sits behind short-lived `std::sync::Mutex` locks that are
//! released before any network call. At most one dispatch runs at a time.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde_json::Value;

use medassist_types::agent::ChatRoute;
use medassist_types::error::FormError;
use medassist_types::form::FormView;
use medassist_types::turn::ChatTurn;

use crate::dispatch::Dispatcher;
use crate::elicitation::ElicitationEngine;
use crate::transcript::Transcript;
use crate::transport::BoxAgentTransport;

/// Why a message was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Input was blank after trimming.
    Empty,
    /// Another dispatch is still in flight.
    Busy,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "message is empty"),
            RejectReason::Busy => write!(f, "a message is already being sent"),
        }
    }
}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    /// Nothing was appended to the transcript.
    Rejected { reason: RejectReason },
    /// The agent replied; its turn was appended.
    Delivered {
        route: ChatRoute,
        #[serde(skip_serializing_if = "Option::is_none")]
        failover_warning: Option<String>,
    },
    /// Both endpoints failed; an error turn was appended.
    Failed { reason: String },
}

/// Point-in-time copy of the session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub turns: Vec<ChatTurn>,
    pub form: Option<FormView>,
    pub busy: bool,
}

/// Clears the in-flight flag when the dispatch completes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ConsultationSession {
    dispatcher: Dispatcher,
    transcript: Mutex<Transcript>,
    elicitation: Mutex<ElicitationEngine>,
    in_flight: AtomicBool,
}

impl ConsultationSession {
    /// Create a session, optionally opened by an agent greeting.
    pub fn new(transport: Arc<BoxAgentTransport>, greeting: Option<&str>) -> Self {
        let transcript = match greeting.map(str::trim).filter(|g| !g.is_empty()) {
            Some(greeting) => Transcript::with_greeting(greeting),
            None => Transcript::new(),
        };

        Self {
            dispatcher: Dispatcher::new(transport),
            transcript: Mutex::new(transcript),
            elicitation: Mutex::new(ElicitationEngine::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn agent_address(&self) -> &str {
        self.dispatcher.transport().base_url()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send a typed message to the agent.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let message = text.trim();
        if message.is_empty() {
            return SendOutcome::Rejected {
                reason: RejectReason::Empty,
            };
        }
        self.dispatch(message.to_string()).await
    }

    /// Validate and store one form value.
    pub fn set_form_value(&self, name: &str, value: &str) -> Result<(), FormError> {
        self.engine().set_value(name, value)
    }

    /// Validate a batch of form values and store them only if all are valid.
    pub fn set_form_values<'a>(
        &self,
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), FormError> {
        self.engine().set_values(values)
    }

    /// Compile the open form and dispatch it as a user message.
    pub async fn submit_form(&self) -> Result<SendOutcome, FormError> {
        if self.is_busy() {
            return Ok(SendOutcome::Rejected {
                reason: RejectReason::Busy,
            });
        }
        let message = self.engine().compile()?;
        tracing::info!(message = %message, "Submitting parameter form");
        Ok(self.dispatch(message).await)
    }

    /// Close the open form. Returns whether one was open.
    pub fn cancel_form(&self) -> bool {
        self.engine().cancel()
    }

    pub fn form(&self) -> Option<FormView> {
        self.engine().view()
    }

    /// Record a dropped file and the agent's canned acknowledgment.
    pub fn attach(&self, file_name: &str) -> Result<(), RejectReason> {
        let name = file_name.trim();
        if name.is_empty() {
            return Err(RejectReason::Empty);
        }

        let mut transcript = self.transcript();
        transcript.append(ChatTurn::user(format!("Attached file: {name}")));
        transcript.append(ChatTurn::agent_notice(format!(
            "Received {name}. Upload processing is not available yet, \
             so please summarise the relevant values in your message."
        )));
        tracing::debug!(file = %name, "Recorded attachment");
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let turns = self.transcript().turns().to_vec();
        SessionSnapshot {
            turns,
            form: self.form(),
            busy: self.is_busy(),
        }
    }

    pub fn turns(&self) -> Vec<ChatTurn> {
        self.transcript().turns().to_vec()
    }

    /// Model output attached to the newest agent turn that carries metadata.
    pub fn latest_model_result(&self) -> Option<Value> {
        self.transcript()
            .latest_agent_metadata()
            .and_then(|metadata| metadata.model_result.clone())
    }

    async fn dispatch(&self, message: String) -> SendOutcome {
        let Some(_in_flight) = self.begin_dispatch() else {
            tracing::debug!("Dispatch already in flight, ignoring message");
            return SendOutcome::Rejected {
                reason: RejectReason::Busy,
            };
        };

        let history = {
            let mut transcript = self.transcript();
            let history = transcript.history();
            transcript.append(ChatTurn::user(message.clone()));
            history
        };

        let (turn, outcome) = match self.dispatcher.deliver(&message, history).await {
            Ok(success) => {
                tracing::info!(route = %success.route, "Agent reply received");
                let outcome = SendOutcome::Delivered {
                    route: success.route,
                    failover_warning: success.failover_warning,
                };
                (
                    ChatTurn::agent(success.reply.reply, success.reply.metadata),
                    outcome,
                )
            }
            Err(err) => {
                let reason = err.to_string();
                let text = format!(
                    "Could not reach the agent: {reason}. Check that the service is running at {}.",
                    self.agent_address()
                );
                (ChatTurn::agent_notice(text), SendOutcome::Failed { reason })
            }
        };

        let metadata = turn.metadata.clone();
        self.transcript().append(turn);
        // Error turns carry no metadata and leave the form as it is.
        if let Some(metadata) = metadata {
            self.engine().observe(Some(&metadata));
        }

        outcome
    }

    fn begin_dispatch(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    fn transcript(&self) -> MutexGuard<'_, Transcript> {
        self.transcript.lock().expect("transcript lock poisoned")
    }

    fn engine(&self) -> MutexGuard<'_, ElicitationEngine> {
        self.elicitation.lock().expect("elicitation lock poisoned")
    }
}

impl fmt::Debug for ConsultationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsultationSession")
            .field("agent", &self.agent_address())
            .field("busy", &self.is_busy())
            .finish()
    }
}
