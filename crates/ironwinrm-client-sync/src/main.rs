mod config;
mod http_client;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use ironwinrm_client_core::{CommandExecutor, SessionConfig, ShellSession, StreamKind};
use tracing::{error, info, instrument};

use config::{Args, Command, init_logging, shell_options};
use http_client::UreqTransport;

#[instrument(name = "main", level = "info")]
fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging. If it fails, we can't log, so just print and exit.
    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return Ok(ExitCode::FAILURE);
    }

    run_app(&args).inspect_err(|e| error!("Application failed to run: {:?}", e))
}

fn run_app(args: &Args) -> anyhow::Result<ExitCode> {
    info!("Starting WinRM client (Synchronous)");

    let config =
        SessionConfig::new(args.session_options()).context("Invalid session configuration")?;
    info!(
        endpoint = %config.endpoint,
        user = %config.user,
        transport = %config.transport,
        "connecting to server"
    );

    let transport = UreqTransport::new(&config).context("Failed to create HTTP transport")?;
    let session = ShellSession::new(config, transport);

    match &args.command {
        Command::Cmd {
            command,
            arguments,
            codepage,
            working_directory,
            no_profile,
        } => {
            let options = shell_options(*codepage, working_directory.as_deref(), *no_profile);
            let mut executor = CommandExecutor::new(session, options);

            let output = executor
                .run_cmd_with(command, arguments, |chunk| match chunk.stream {
                    StreamKind::Stdout => {
                        print!("{}", chunk.text);
                        std::io::stdout().flush().ok();
                    }
                    StreamKind::Stderr => eprint!("{}", chunk.text),
                })
                .context("Failed to run command")?;
            executor.close().context("Failed to close shell")?;

            let exit_code = output.exit_code().unwrap_or_default();
            info!(exit_code, "command finished");
            Ok(ExitCode::from(u8::try_from(exit_code).unwrap_or(1)))
        }
        Command::Wql { query, namespace } => {
            let items = session
                .run_wql_in(namespace, query)
                .context("WQL query failed")?;
            println!("{}", serde_json::to_string_pretty(&items)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
