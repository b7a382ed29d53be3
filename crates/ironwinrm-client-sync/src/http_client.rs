use std::cell::Cell;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ironwinrm_client_core::{SessionConfig, Transport, TransportError, TransportKind, WsManFault};
use tracing::{debug, error, info, instrument, warn};

const SOAP_CONTENT_TYPE: &str = "application/soap+xml;charset=UTF-8";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts envelopes over HTTP(S) with basic authentication.
pub struct UreqTransport {
    agent: ureq::Agent,
    endpoint: String,
    authorization: String,
    receive_timeout: Cell<Duration>,
    retry_limit: u32,
    retry_delay: Duration,
}

impl UreqTransport {
    pub fn new(config: &SessionConfig) -> Result<Self, TransportError> {
        let mut builder = ureq::AgentBuilder::new().timeout_connect(CONNECT_TIMEOUT);

        match &config.transport {
            TransportKind::Plaintext { .. } => {}
            TransportKind::Ssl {
                ssl_peer_fingerprint: Some(_),
                ..
            } => {
                return Err(TransportError::Unsupported(
                    "ssl peer fingerprint pinning".into(),
                ));
            }
            TransportKind::Ssl {
                no_ssl_peer_verification,
                ca_trust_path,
                ..
            } => {
                let connector = tls_connector(*no_ssl_peer_verification, ca_trust_path.as_deref())?;
                builder = builder.tls_connector(Arc::new(connector));
            }
            other => {
                return Err(TransportError::Unsupported(
                    format!("{other} authentication").into(),
                ));
            }
        }

        let credentials = format!("{}:{}", config.user, config.password);
        Ok(Self {
            agent: builder.build(),
            endpoint: config.endpoint.to_string(),
            authorization: format!("Basic {}", STANDARD.encode(credentials)),
            receive_timeout: Cell::new(Duration::from_secs(config.receive_timeout)),
            retry_limit: config.retry_limit,
            retry_delay: Duration::from_secs(config.retry_delay),
        })
    }

    /// One POST. `Err` is a connection-level failure worth retrying.
    fn post(&self, request: &str) -> Result<(u16, String), String> {
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", SOAP_CONTENT_TYPE)
            .set("Authorization", &self.authorization)
            .timeout(self.receive_timeout.get())
            .send_string(request);

        match response {
            Ok(response) => {
                let status = response.status();
                let body = response.into_string().map_err(|e| {
                    error!(error=%e, "failed to read response body");
                    e.to_string()
                })?;
                Ok((status, body))
            }
            Err(ureq::Error::Status(status, response)) => {
                debug!(status=%status, "received status response");
                let body = response.into_string().unwrap_or_default();
                Ok((status, body))
            }
            Err(e) => Err(e.to_string()),
        }
    }
}

impl Transport for UreqTransport {
    #[instrument(
        name = "http_client.send_request",
        level = "debug",
        skip_all,
        fields(url = %self.endpoint, body_length = request.len()),
        err
    )]
    fn send_request(&self, request: &str) -> Result<String, TransportError> {
        let mut attempt = 0;
        loop {
            match self.post(request) {
                Ok((status, body)) => {
                    info!(
                        status_code = status,
                        response_body_length = body.len(),
                        "response received"
                    );
                    return classify(status, body);
                }
                Err(e) if attempt < self.retry_limit => {
                    attempt += 1;
                    warn!(
                        error = %e,
                        attempt,
                        retry_limit = self.retry_limit,
                        "request failed, retrying"
                    );
                    std::thread::sleep(self.retry_delay);
                }
                Err(e) => {
                    error!(error = %e, "request failed");
                    return Err(TransportError::Connection(e));
                }
            }
        }
    }

    fn set_receive_timeout(&self, timeout: Duration) {
        debug!(timeout_secs = timeout.as_secs(), "receive timeout updated");
        self.receive_timeout.set(timeout);
    }
}

fn tls_connector(
    no_peer_verification: bool,
    ca_trust_path: Option<&Path>,
) -> Result<native_tls::TlsConnector, TransportError> {
    let mut builder = native_tls::TlsConnector::builder();
    if no_peer_verification {
        warn!("TLS peer verification disabled - this is INSECURE!");
        builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }
    if let Some(path) = ca_trust_path {
        let pem = std::fs::read(path).map_err(|e| {
            TransportError::Connection(format!("failed to read {}: {e}", path.display()))
        })?;
        let certificate = native_tls::Certificate::from_pem(&pem).map_err(|e| {
            TransportError::Connection(format!("invalid CA certificate {}: {e}", path.display()))
        })?;
        builder.add_root_certificate(certificate);
    }
    builder
        .build()
        .map_err(|e| TransportError::Connection(e.to_string()))
}

/// Maps an HTTP status and body to the transport result. Faults arrive as HTTP 500.
fn classify(status: u16, body: String) -> Result<String, TransportError> {
    match status {
        200..=299 => Ok(body),
        401 => Err(TransportError::Unauthorized),
        _ => match WsManFault::from_xml(&body) {
            Ok(Some(fault)) => Err(TransportError::Fault(fault)),
            _ => Err(TransportError::Http { status, body }),
        },
    }
}
