use std::borrow::Cow;

pub mod config;
pub mod decoder;
pub mod executor;
pub mod logging;
pub mod output;
pub mod session;
pub mod transport;

pub use config::{ConfigError, SessionConfig, SessionOptions, TransportKind};
pub use executor::CommandExecutor;
pub use logging::SessionLogger;
pub use output::{Output, OutputChunk, StreamKind};
pub use session::{CommandGuard, CommandId, ShellGuard, ShellId, ShellSession, ShellState};
pub use transport::{Transport, TransportError};

pub use ironwinrm_wsman::enumeration::{WqlItems, WqlValue};
pub use ironwinrm_wsman::rsp::{CommandOptions, ShellKind, ShellOptions};
pub use ironwinrm_wsman::soap::WsManFault;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("WS-Management fault: {0}")]
    Fault(WsManFault),

    #[error("Transport error: {0}")]
    Transport(TransportError),

    /// An element the protocol guarantees was absent or unreadable.
    #[error("Malformed response: {0}")]
    MalformedResponse(ironwinrm_wsman::WsManError),

    #[error("Failed to build request: {0}")]
    Request(#[from] ironwinrm_wsman::WsManError),

    #[error("PowerShell remoting error: {0}")]
    PowerShellRemoting(#[from] ironwinrm_psrp::PowerShellRemotingError),

    #[error("Failed to decode stream: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Invalid state: {0}")]
    InvalidState(Cow<'static, str>),

    #[error("Command output not complete after {limit} receive iterations")]
    ReceiveLimitExceeded { limit: u64 },
}

impl ClientError {
    /// The server's machine-readable fault code, if this error is a WS-Management fault.
    pub fn fault_code(&self) -> Option<&str> {
        match self {
            Self::Fault(fault) => fault.fault_code(),
            _ => None,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Fault(fault) => Self::Fault(fault),
            other => Self::Transport(other),
        }
    }
}

impl From<ironwinrm_xml::XmlError> for ClientError {
    fn from(err: ironwinrm_xml::XmlError) -> Self {
        Self::MalformedResponse(err.into())
    }
}
