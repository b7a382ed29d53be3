//! Session configuration, validated once before a session is built.
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

pub const DEFAULT_OPERATION_TIMEOUT: u64 = 60;
pub const DEFAULT_RECEIVE_TIMEOUT: u64 = 70;
pub const DEFAULT_MAX_ENVELOPE_SIZE: u32 = 153_600;
pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_RETRY_DELAY: u64 = 10;
pub const DEFAULT_RETRY_LIMIT: u32 = 3;
pub const DEFAULT_MAX_COMMANDS: u32 = 1480;

/// Seconds added to the operation timeout when the receive timeout does not exceed it.
pub const RECEIVE_TIMEOUT_MARGIN: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Field `{field}` must be a positive integer, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("Field `{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("Invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Unsupported transport {name:?}, expected one of: {valid}")]
    UnsupportedTransport { name: String, valid: String },

    #[error("Transport `{transport}` requires `{field}`")]
    MissingTransportField {
        transport: &'static str,
        field: &'static str,
    },
}

/// How the session reaches the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    /// SPNEGO/NTLM over HTTP.
    Negotiate { service: Option<String> },
    /// GSSAPI.
    Kerberos {
        realm: Option<String>,
        service: Option<String>,
        keytab: Option<PathBuf>,
    },
    /// HTTP basic authentication.
    Plaintext { basic_auth_only: bool },
    Ssl {
        basic_auth_only: bool,
        no_ssl_peer_verification: bool,
        ssl_peer_fingerprint: Option<String>,
        ca_trust_path: Option<PathBuf>,
    },
}

impl TransportKind {
    pub const NAMES: [&'static str; 4] = ["negotiate", "kerberos", "plaintext", "ssl"];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Negotiate { .. } => "negotiate",
            Self::Kerberos { .. } => "kerberos",
            Self::Plaintext { .. } => "plaintext",
            Self::Ssl { .. } => "ssl",
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Kerberos { realm, .. } if realm.as_deref().is_none_or(str::is_empty) => {
                Err(ConfigError::MissingTransportField {
                    transport: self.name(),
                    field: "realm",
                })
            }
            _ => Ok(()),
        }
    }
}

impl Default for TransportKind {
    fn default() -> Self {
        Self::Negotiate { service: None }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "negotiate" => Ok(Self::default()),
            "kerberos" => Ok(Self::Kerberos {
                realm: None,
                service: None,
                keytab: None,
            }),
            "plaintext" => Ok(Self::Plaintext {
                basic_auth_only: true,
            }),
            "ssl" => Ok(Self::Ssl {
                basic_auth_only: false,
                no_ssl_peer_verification: false,
                ssl_peer_fingerprint: None,
                ca_trust_path: None,
            }),
            _ => Err(ConfigError::UnsupportedTransport {
                name: s.to_owned(),
                valid: Self::NAMES.join(", "),
            }),
        }
    }
}

/// Caller-facing, unvalidated options. Numeric fields are signed so that out-of-range
/// input reaches validation instead of being rejected by the type.
#[derive(Debug, Clone, Default, typed_builder::TypedBuilder)]
pub struct SessionOptions {
    #[builder(default, setter(strip_option, into))]
    pub endpoint: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub user: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub password: Option<String>,
    #[builder(default)]
    pub transport: TransportKind,
    #[builder(default, setter(strip_option))]
    pub operation_timeout: Option<i64>,
    #[builder(default, setter(strip_option))]
    pub receive_timeout: Option<i64>,
    #[builder(default, setter(strip_option))]
    pub max_envelope_size: Option<i64>,
    #[builder(default, setter(strip_option))]
    pub retry_limit: Option<i64>,
    #[builder(default, setter(strip_option))]
    pub retry_delay: Option<i64>,
    #[builder(default, setter(strip_option))]
    pub max_commands: Option<i64>,
    #[builder(default, setter(strip_option, into))]
    pub locale: Option<String>,
    /// Unset means the receive loop is bounded only by the transport timeout.
    #[builder(default, setter(strip_option))]
    pub max_receive_iterations: Option<u64>,
}

/// Validated session context.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub endpoint: Url,
    pub user: String,
    pub password: String,
    pub transport: TransportKind,
    /// Seconds.
    pub operation_timeout: u64,
    /// Seconds, always greater than `operation_timeout`.
    pub receive_timeout: u64,
    pub max_envelope_size: u32,
    pub locale: String,
    pub retry_limit: u32,
    /// Seconds.
    pub retry_delay: u64,
    pub max_commands: u32,
    pub max_receive_iterations: Option<u64>,
}

impl SessionConfig {
    pub fn new(options: SessionOptions) -> Result<Self, ConfigError> {
        let endpoint = required(options.endpoint, "endpoint")?;
        let user = required(options.user, "user")?;
        let password = required(options.password, "password")?;
        let endpoint = parse_endpoint(&endpoint)?;

        options.transport.validate()?;

        let operation_timeout =
            positive(options.operation_timeout, "operation_timeout", DEFAULT_OPERATION_TIMEOUT)?;
        let receive_timeout =
            positive(options.receive_timeout, "receive_timeout", DEFAULT_RECEIVE_TIMEOUT)?;

        Ok(Self {
            endpoint,
            user,
            password,
            transport: options.transport,
            operation_timeout,
            receive_timeout: corrected_receive_timeout(operation_timeout, receive_timeout),
            max_envelope_size: narrow(
                options.max_envelope_size,
                "max_envelope_size",
                DEFAULT_MAX_ENVELOPE_SIZE,
            )?,
            locale: options
                .locale
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOCALE.to_owned()),
            retry_limit: narrow(options.retry_limit, "retry_limit", DEFAULT_RETRY_LIMIT)?,
            retry_delay: positive(options.retry_delay, "retry_delay", DEFAULT_RETRY_DELAY)?,
            max_commands: narrow(options.max_commands, "max_commands", DEFAULT_MAX_COMMANDS)?,
            max_receive_iterations: options.max_receive_iterations,
        })
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("transport", &self.transport)
            .field("operation_timeout", &self.operation_timeout)
            .field("receive_timeout", &self.receive_timeout)
            .field("max_envelope_size", &self.max_envelope_size)
            .field("locale", &self.locale)
            .field("retry_limit", &self.retry_limit)
            .field("retry_delay", &self.retry_delay)
            .field("max_commands", &self.max_commands)
            .field("max_receive_iterations", &self.max_receive_iterations)
            .finish()
    }
}

/// `receive` unless it does not exceed `operation`, then `operation + 10`.
pub fn corrected_receive_timeout(operation: u64, receive: u64) -> u64 {
    if receive <= operation {
        operation.saturating_add(RECEIVE_TIMEOUT_MARGIN)
    } else {
        receive
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingField(field))
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        reason,
    };

    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        "http" | "https" => Err(invalid("missing host".to_owned())),
        scheme => Err(invalid(format!("unsupported scheme `{scheme}`"))),
    }
}

fn positive(value: Option<i64>, field: &'static str, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) if v <= 0 => Err(ConfigError::NotPositive { field, value: v }),
        Some(v) => u64::try_from(v).map_err(|_| ConfigError::OutOfRange { field, value: v }),
    }
}

fn narrow(value: Option<i64>, field: &'static str, default: u32) -> Result<u32, ConfigError> {
    let wide = positive(value, field, u64::from(default))?;
    u32::try_from(wide).map_err(|_| ConfigError::OutOfRange {
        field,
        value: value.unwrap_or_default(),
    })
}
