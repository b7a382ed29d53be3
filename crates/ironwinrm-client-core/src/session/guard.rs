//! Scope guards that release remote shells and commands when dropped.
use tracing::warn;

use super::{CommandId, ShellId, ShellSession};
use crate::output::{Output, OutputChunk};
use crate::{ClientError, CommandOptions, ShellOptions, Transport};

impl<T: Transport> ShellSession<T> {
    /// Opens a shell that is closed when the returned guard goes out of scope.
    pub fn open_shell_guarded(
        &mut self,
        options: &ShellOptions,
    ) -> Result<ShellGuard<'_, T>, ClientError> {
        let id = self.open_shell(options)?;
        Ok(ShellGuard {
            session: self,
            id,
            released: false,
        })
    }

    /// Starts a command that is terminated when the returned guard goes out of scope.
    pub fn run_command_guarded(
        &mut self,
        shell: &ShellId,
        command: &str,
        arguments: &[String],
        options: &CommandOptions,
    ) -> Result<CommandGuard<'_, T>, ClientError> {
        let id = self.run_command(shell, command, arguments, options)?;
        Ok(CommandGuard {
            session: self,
            shell: shell.clone(),
            id,
            released: false,
        })
    }
}

pub struct ShellGuard<'s, T: Transport> {
    session: &'s mut ShellSession<T>,
    id: ShellId,
    released: bool,
}

impl<T: Transport> ShellGuard<'_, T> {
    pub fn id(&self) -> &ShellId {
        &self.id
    }

    pub fn session(&mut self) -> &mut ShellSession<T> {
        self.session
    }

    pub fn run_command(
        &mut self,
        command: &str,
        arguments: &[String],
        options: &CommandOptions,
    ) -> Result<CommandGuard<'_, T>, ClientError> {
        self.session
            .run_command_guarded(&self.id, command, arguments, options)
    }

    /// Runs a command to completion and terminates it, returning its output.
    pub fn run_to_completion(
        &mut self,
        command: &str,
        arguments: &[String],
        options: &CommandOptions,
    ) -> Result<Output, ClientError> {
        let mut command = self.run_command(command, arguments, options)?;
        let output = command.output()?;
        command.cleanup()?;
        Ok(output)
    }

    /// Closes the shell now, reporting the result instead of logging it.
    pub fn close(mut self) -> Result<(), ClientError> {
        self.released = true;
        self.session.close_shell(&self.id)
    }
}

impl<T: Transport> Drop for ShellGuard<'_, T> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.session.close_shell(&self.id) {
            self.session.logger().scope(|| {
                warn!(shell_id = %self.id, error = %err, "failed to close shell on drop");
            });
        }
    }
}

pub struct CommandGuard<'s, T: Transport> {
    session: &'s mut ShellSession<T>,
    shell: ShellId,
    id: CommandId,
    released: bool,
}

impl<T: Transport> CommandGuard<'_, T> {
    pub fn id(&self) -> &CommandId {
        &self.id
    }

    pub fn shell_id(&self) -> &ShellId {
        &self.shell
    }

    pub fn write_stdin(&mut self, data: &[u8]) -> Result<(), ClientError> {
        self.session.write_stdin(&self.shell, &self.id, data)
    }

    pub fn send_stdin(&mut self, data: &[u8], end: bool) -> Result<(), ClientError> {
        self.session.send_stdin(&self.shell, &self.id, data, end)
    }

    pub fn output(&mut self) -> Result<Output, ClientError> {
        self.session.get_command_output(&self.shell, &self.id)
    }

    pub fn output_with(
        &mut self,
        on_chunk: impl FnMut(&OutputChunk),
    ) -> Result<Output, ClientError> {
        self.session
            .get_command_output_with(&self.shell, &self.id, on_chunk)
    }

    pub fn cleanup(mut self) -> Result<(), ClientError> {
        self.released = true;
        self.session.cleanup_command(&self.shell, &self.id)
    }
}

impl<T: Transport> Drop for CommandGuard<'_, T> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.session.cleanup_command(&self.shell, &self.id) {
            self.session.logger().scope(|| {
                warn!(command_id = %self.id, error = %err, "failed to clean up command on drop");
            });
        }
    }
}
