use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use ironwinrm_wsman::soap::WsManFault;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("WS-Management fault: {0}")]
    Fault(WsManFault),

    #[error("HTTP status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Unsupported transport: {0}")]
    Unsupported(Cow<'static, str>),
}

impl TransportError {
    pub fn fault_code(&self) -> Option<&str> {
        match self {
            Self::Fault(fault) => fault.fault_code(),
            _ => None,
        }
    }
}

/// Carries one serialized envelope to the endpoint and returns the response body.
///
/// Implementations raise [`TransportError::Fault`] for WS-Management faults and enforce
/// the receive timeout. A transport shared between sessions must be safe for that.
pub trait Transport {
    fn send_request(&self, request: &str) -> Result<String, TransportError>;

    fn set_receive_timeout(&self, timeout: Duration);
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send_request(&self, request: &str) -> Result<String, TransportError> {
        (**self).send_request(request)
    }

    fn set_receive_timeout(&self, timeout: Duration) {
        (**self).set_receive_timeout(timeout);
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send_request(&self, request: &str) -> Result<String, TransportError> {
        (**self).send_request(request)
    }

    fn set_receive_timeout(&self, timeout: Duration) {
        (**self).set_receive_timeout(timeout);
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_request(&self, request: &str) -> Result<String, TransportError> {
        (**self).send_request(request)
    }

    fn set_receive_timeout(&self, timeout: Duration) {
        (**self).set_receive_timeout(timeout);
    }
}
