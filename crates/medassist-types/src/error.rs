use thiserror::Error;

/// Errors from talking to the agent service.
///
/// The `Display` output is what users see inside transcript error turns.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("network error: {0}")]
    Network(String),

    #[error("agent returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not parse agent response: {0}")]
    Deserialization(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors from the parameter form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("no parameter form is open")]
    NotCollecting,

    #[error("the form has no values to submit")]
    NothingToSubmit,

    #[error("invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Errors loading an explicitly requested configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },
}
