use std::path::PathBuf;
use std::sync::OnceLock;

use clap::{Parser, Subcommand, ValueEnum};
use ironwinrm_client_core::{SessionOptions, ShellOptions, TransportKind};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry::Registry};

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Sets up a panic hook so that panics end up in the log file.
fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!("A panic occurred: {}", panic_info);
    }));
}

/// WinRM remote shell client (Synchronous)
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// WS-Management endpoint, e.g. http://host:5985/wsman
    #[arg(short, long)]
    pub endpoint: String,

    #[arg(short, long, help = "Username for authentication")]
    pub user: String,

    #[arg(short = 'P', long, help = "Password for authentication")]
    pub password: String,

    #[arg(
        short,
        long,
        help = "Transport and authentication",
        default_value_t = TransportArg::Plaintext
    )]
    pub transport: TransportArg,

    #[arg(long, help = "Kerberos realm (kerberos transport)")]
    pub realm: Option<String>,

    /// DANGEROUS: skip TLS peer verification. Only use for testing.
    #[arg(long, help = "DANGEROUS: do not verify the server certificate (ssl transport)")]
    pub insecure: bool,

    #[arg(long, help = "PEM CA bundle to trust (ssl transport)")]
    pub ca_trust_path: Option<PathBuf>,

    #[arg(long, help = "OperationTimeout in seconds")]
    pub operation_timeout: Option<i64>,

    #[arg(long, help = "HTTP receive timeout in seconds")]
    pub receive_timeout: Option<i64>,

    #[arg(long, help = "Locale sent with every request, e.g. en-US")]
    pub locale: Option<String>,

    #[arg(long, help = "Give up after this many Receive requests")]
    pub max_receive_iterations: Option<u64>,

    /// Verbose logging (can be repeated for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase logging verbosity")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a command in a cmd shell and print its output
    Cmd {
        command: String,
        arguments: Vec<String>,

        #[arg(long, help = "Code page of the remote shell, e.g. 65001")]
        codepage: Option<u32>,

        #[arg(long, help = "Working directory of the remote shell")]
        working_directory: Option<String>,

        #[arg(long, help = "Do not load the user profile")]
        no_profile: bool,
    },
    /// Run a WQL query and print the result as JSON
    Wql {
        query: String,

        #[arg(long, default_value = "root/cimv2/*")]
        namespace: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TransportArg {
    Negotiate,
    Kerberos,
    Plaintext,
    Ssl,
}

impl std::fmt::Display for TransportArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negotiate => write!(f, "negotiate"),
            Self::Kerberos => write!(f, "kerberos"),
            Self::Plaintext => write!(f, "plaintext"),
            Self::Ssl => write!(f, "ssl"),
        }
    }
}

impl Args {
    pub fn transport_kind(&self) -> TransportKind {
        match self.transport {
            TransportArg::Negotiate => TransportKind::default(),
            TransportArg::Kerberos => TransportKind::Kerberos {
                realm: self.realm.clone(),
                service: None,
                keytab: None,
            },
            TransportArg::Plaintext => TransportKind::Plaintext {
                basic_auth_only: true,
            },
            TransportArg::Ssl => TransportKind::Ssl {
                basic_auth_only: true,
                no_ssl_peer_verification: self.insecure,
                ssl_peer_fingerprint: None,
                ca_trust_path: self.ca_trust_path.clone(),
            },
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            endpoint: Some(self.endpoint.clone()),
            user: Some(self.user.clone()),
            password: Some(self.password.clone()),
            transport: self.transport_kind(),
            operation_timeout: self.operation_timeout,
            receive_timeout: self.receive_timeout,
            locale: self.locale.clone(),
            max_receive_iterations: self.max_receive_iterations,
            ..SessionOptions::default()
        }
    }
}

pub fn shell_options(
    codepage: Option<u32>,
    working_directory: Option<&str>,
    no_profile: bool,
) -> ShellOptions {
    ShellOptions {
        codepage,
        working_directory: working_directory.map(str::to_owned),
        no_profile: no_profile.then_some(true),
        ..ShellOptions::default()
    }
}

/// Initialize logging with file output and structured fields
pub fn init_logging(verbose_level: u8) -> anyhow::Result<()> {
    setup_panic_hook();

    // Bridge logs from the `log` crate to `tracing`
    LogTracer::init().ok();

    let file = std::fs::File::create("winrm_client.log")?;
    let (nb_writer, guard) = tracing_appender::non_blocking(file);

    // The guard flushes the writer; it has to live for the whole program.
    if LOG_GUARD.set(guard).is_err() {
        tracing::warn!("LOG_GUARD was already set");
    }

    let filter_str = match verbose_level {
        0 => "info,ureq=error",
        1 => "debug,ureq=warn",
        2 => "trace,ureq=info",
        _ => "trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    let subscriber = Registry::default().with(env_filter).with(
        fmt::layer()
            .with_writer(nb_writer)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .compact(),
    );

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Logging system initialized.");

    Ok(())
}
