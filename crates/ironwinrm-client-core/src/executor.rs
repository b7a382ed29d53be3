//! Runs many commands over one reusable shell.
//!
//! The server limits how many commands a shell accepts, so the executor closes and reopens
//! its shell once `max_commands` have run.
use tracing::{info, warn};

use crate::output::{Output, OutputChunk};
use crate::session::{ShellId, ShellSession};
use crate::{ClientError, CommandOptions, ShellOptions, Transport};

pub struct CommandExecutor<T: Transport> {
    session: ShellSession<T>,
    shell_options: ShellOptions,
    command_options: CommandOptions,
    shell: Option<ShellId>,
}

impl<T: Transport> CommandExecutor<T> {
    pub fn new(session: ShellSession<T>, shell_options: ShellOptions) -> Self {
        Self {
            session,
            shell_options,
            command_options: CommandOptions::default(),
            shell: None,
        }
    }

    #[must_use]
    pub fn with_command_options(mut self, options: CommandOptions) -> Self {
        self.command_options = options;
        self
    }

    pub fn session(&self) -> &ShellSession<T> {
        &self.session
    }

    /// The shell currently in use, if one is open.
    pub fn shell_id(&self) -> Option<&ShellId> {
        self.shell.as_ref()
    }

    pub fn run_cmd(&mut self, command: &str, arguments: &[String]) -> Result<Output, ClientError> {
        self.run_cmd_with(command, arguments, |_| {})
    }

    pub fn run_cmd_with(
        &mut self,
        command: &str,
        arguments: &[String],
        on_chunk: impl FnMut(&OutputChunk),
    ) -> Result<Output, ClientError> {
        let shell = self.ready_shell()?;
        let options = self.command_options;

        let mut command =
            self.session
                .run_command_guarded(&shell, command, arguments, &options)?;
        let output = command.output_with(on_chunk)?;
        command.cleanup()?;
        Ok(output)
    }

    /// Closes the current shell. The next command opens a fresh one.
    /// A shell the transport could not reach stays current, so a later close retries it.
    pub fn close(&mut self) -> Result<(), ClientError> {
        let Some(shell) = self.shell.take() else {
            return Ok(());
        };
        if let Err(err) = self.session.close_shell(&shell) {
            self.shell = Some(shell);
            return Err(err);
        }
        Ok(())
    }

    fn ready_shell(&mut self) -> Result<ShellId, ClientError> {
        if let Some(shell) = &self.shell {
            let max_commands = self.session.config().max_commands;
            if self.session.commands_run(shell) < max_commands {
                return Ok(shell.clone());
            }
            self.session.logger().scope(|| {
                info!(shell_id = %shell, max_commands, "recycling shell");
            });
            self.close()?;
        }

        let shell = self.session.open_shell(&self.shell_options)?;
        self.shell = Some(shell.clone());
        Ok(shell)
    }
}

impl<T: Transport> Drop for CommandExecutor<T> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            self.session.logger().scope(|| {
                warn!(error = %err, "failed to close shell on drop");
            });
        }
    }
}
