//! Shell Session: the shell and command lifecycle over one [`Transport`].
mod guard;

pub use guard::{CommandGuard, ShellGuard};

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use ironwinrm_wsman::WsManError;
use ironwinrm_wsman::enumeration::{EnumerateValue, WqlItems, parse_items};
use ironwinrm_wsman::rsp::{
    self, CommandLineValue, CommandOptions, ReceiveResponse, ReceiveValue, SendValue, ShellKind,
    ShellOptions,
};
use ironwinrm_wsman::soap::{HeaderSet, OPERATION_TIMEOUT_FAULT_CODE, WsManFault, build_envelope};
use ironwinrm_wsman::ws_management::{
    DEFAULT_WMI_NAMESPACE, ResourceUri, WsAction, WsManHeaders, action, keep_alive,
    resource_uri, selector_shell_id,
};
use ironwinrm_xml::builder::Element;
use ironwinrm_xml::parser::{self, Document};
use tracing::{Dispatch, debug, info, instrument, trace, warn};
use uuid::Uuid;

use crate::config::{ConfigError, SessionConfig, corrected_receive_timeout};
use crate::output::{Output, OutputChunk, StreamKind};
use crate::{ClientError, SessionLogger, Transport, decoder};

/// Server-assigned shell identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShellId(String);

impl ShellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned command identifier, scoped to one shell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandId(String);

impl CommandId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Unopened,
    Open,
    /// A command's output is being polled.
    Busy,
    Closed,
}

#[derive(Debug, Clone)]
struct ShellEntry {
    kind: ShellKind,
    state: ShellState,
    codepage: Option<u32>,
    commands_run: u32,
}

pub struct ShellSession<T: Transport> {
    transport: T,
    config: SessionConfig,
    session_id: Uuid,
    logger: SessionLogger,
    shells: HashMap<ShellId, ShellEntry>,
}

impl<T: Transport> ShellSession<T> {
    /// A session logging through the caller's current default dispatcher.
    pub fn new(config: SessionConfig, transport: T) -> Self {
        Self::build(config, transport, None)
    }

    /// A session logging through `dispatch` only.
    pub fn with_dispatch(config: SessionConfig, transport: T, dispatch: Dispatch) -> Self {
        Self::build(config, transport, Some(dispatch))
    }

    fn build(config: SessionConfig, transport: T, dispatch: Option<Dispatch>) -> Self {
        let session_id = Uuid::new_v4();
        let logger = SessionLogger::new(dispatch, session_id, config.endpoint.as_str());

        transport.set_receive_timeout(Duration::from_secs(config.receive_timeout));
        logger.scope(|| {
            info!(
                transport = %config.transport,
                operation_timeout = config.operation_timeout,
                receive_timeout = config.receive_timeout,
                "session created"
            );
        });

        Self {
            transport,
            config,
            session_id,
            logger,
            shells: HashMap::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn logger(&self) -> &SessionLogger {
        &self.logger
    }

    /// `Unopened` for shells this session has not opened.
    pub fn shell_state(&self, shell: &ShellId) -> ShellState {
        self.shells
            .get(shell)
            .map_or(ShellState::Unopened, |entry| entry.state)
    }

    pub fn shell_codepage(&self, shell: &ShellId) -> Option<u32> {
        self.shells.get(shell).and_then(|entry| entry.codepage)
    }

    pub fn commands_run(&self, shell: &ShellId) -> u32 {
        self.shells.get(shell).map_or(0, |entry| entry.commands_run)
    }

    /// Sets the operation timeout and the transport's receive timeout. Without an explicit
    /// receive timeout `operation + 10` is used; a receive timeout that does not exceed the
    /// operation timeout is raised the same way.
    pub fn set_timeout(&mut self, operation: u64, receive: Option<u64>) -> Result<(), ClientError> {
        if operation == 0 {
            return Err(ConfigError::NotPositive {
                field: "operation_timeout",
                value: 0,
            }
            .into());
        }

        let receive = corrected_receive_timeout(operation, receive.unwrap_or(0));
        self.config.operation_timeout = operation;
        self.config.receive_timeout = receive;
        self.transport
            .set_receive_timeout(Duration::from_secs(receive));

        self.logger.scope(|| {
            debug!(operation_timeout = operation, receive_timeout = receive, "timeouts updated");
        });
        Ok(())
    }

    pub fn set_max_envelope_size(&mut self, bytes: u32) {
        self.config.max_envelope_size = bytes;
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.config.locale = locale.into();
    }

    pub fn open_shell(&mut self, options: &ShellOptions) -> Result<ShellId, ClientError> {
        let logger = self.logger.clone();
        logger.scope(|| self.open_shell_inner(options))
    }

    pub fn run_command(
        &mut self,
        shell: &ShellId,
        command: &str,
        arguments: &[String],
        options: &CommandOptions,
    ) -> Result<CommandId, ClientError> {
        let logger = self.logger.clone();
        logger.scope(|| self.run_command_inner(shell, command, arguments, options))
    }

    /// Dispatches a PSRP message through a PowerShell pipeline instead of a command line.
    pub fn run_pipeline(
        &mut self,
        shell: &ShellId,
        message_type_hex: &str,
        payload_xml: &str,
        options: &CommandOptions,
    ) -> Result<CommandId, ClientError> {
        let logger = self.logger.clone();
        logger.scope(|| self.run_pipeline_inner(shell, message_type_hex, payload_xml, options))
    }

    /// Sends `data` to the command's stdin. The server does not acknowledge content, so only
    /// transport failures and faults are reported.
    pub fn write_stdin(
        &mut self,
        shell: &ShellId,
        command: &CommandId,
        data: &[u8],
    ) -> Result<(), ClientError> {
        self.send_stdin(shell, command, data, false)
    }

    /// As [`write_stdin`](Self::write_stdin); `end` closes the input stream.
    pub fn send_stdin(
        &mut self,
        shell: &ShellId,
        command: &CommandId,
        data: &[u8],
        end: bool,
    ) -> Result<(), ClientError> {
        let logger = self.logger.clone();
        logger.scope(|| self.send_stdin_inner(shell, command, data, end))
    }

    pub fn get_command_output(
        &mut self,
        shell: &ShellId,
        command: &CommandId,
    ) -> Result<Output, ClientError> {
        self.get_command_output_with(shell, command, |_| {})
    }

    /// Polls until the command is Done. `on_chunk` sees every decoded fragment in the order
    /// it was received.
    pub fn get_command_output_with(
        &mut self,
        shell: &ShellId,
        command: &CommandId,
        on_chunk: impl FnMut(&OutputChunk),
    ) -> Result<Output, ClientError> {
        let logger = self.logger.clone();
        logger.scope(|| self.receive_output(shell, command, on_chunk))
    }

    /// Signals terminate to the command. Request failures are logged and ignored; only an
    /// unknown or non-Open shell is an error.
    pub fn cleanup_command(
        &mut self,
        shell: &ShellId,
        command: &CommandId,
    ) -> Result<(), ClientError> {
        let logger = self.logger.clone();
        logger.scope(|| self.cleanup_command_inner(shell, command))
    }

    /// Deletes the shell and marks it Closed. Request failures are logged and ignored;
    /// closing a closed shell does nothing.
    pub fn close_shell(&mut self, shell: &ShellId) -> Result<(), ClientError> {
        let logger = self.logger.clone();
        logger.scope(|| self.close_shell_inner(shell))
    }

    pub fn run_wql(&self, query: &str) -> Result<WqlItems, ClientError> {
        self.run_wql_in(DEFAULT_WMI_NAMESPACE, query)
    }

    /// Runs a WQL query against the WMI resource of `namespace`, e.g. `root/cimv2/*`.
    pub fn run_wql_in(&self, namespace: &str, query: &str) -> Result<WqlItems, ClientError> {
        self.logger.scope(|| self.run_wql_inner(namespace, query))
    }

    #[instrument(skip_all, fields(kind = ?options.kind), err)]
    fn open_shell_inner(&mut self, options: &ShellOptions) -> Result<ShellId, ClientError> {
        let candidate = format!("{:X}", Uuid::new_v4().hyphenated());
        let candidate_attribute =
            (options.kind == ShellKind::PowerShell).then_some(candidate.as_str());

        let response = self.send(
            WsAction::Create,
            &options.kind.resource_uri(),
            vec![options.option_set()],
            Some(options.body(candidate_attribute)),
        )?;
        let document = parse_response(&response)?;
        let id = ShellId(rsp::shell_id(&document).map_err(ClientError::MalformedResponse)?);

        if candidate_attribute.is_some() && !id.as_str().eq_ignore_ascii_case(&candidate) {
            debug!(%candidate, shell_id = %id, "server replaced the candidate shell id");
        }

        self.shells.insert(
            id.clone(),
            ShellEntry {
                kind: options.kind,
                state: ShellState::Open,
                codepage: options.codepage,
                commands_run: 0,
            },
        );
        info!(shell_id = %id, "shell opened");
        Ok(id)
    }

    #[instrument(skip_all, fields(shell_id = %shell), err)]
    fn run_command_inner(
        &mut self,
        shell: &ShellId,
        command: &str,
        arguments: &[String],
        options: &CommandOptions,
    ) -> Result<CommandId, ClientError> {
        let kind = self.open_entry(shell)?.kind;
        let body = CommandLineValue::new(command, arguments, options).into_body(None);

        let response = self.send(
            WsAction::Command,
            &kind.resource_uri(),
            vec![selector_shell_id(shell.as_str()), options.option_set()],
            Some(body),
        )?;
        self.register_command(shell, &response)
    }

    #[instrument(skip_all, fields(shell_id = %shell, message_type = message_type_hex), err)]
    fn run_pipeline_inner(
        &mut self,
        shell: &ShellId,
        message_type_hex: &str,
        payload_xml: &str,
        options: &CommandOptions,
    ) -> Result<CommandId, ClientError> {
        let kind = self.open_entry(shell)?.kind;
        let command_id = format!("{:X}", Uuid::new_v4().hyphenated());
        let arguments = ironwinrm_psrp::encode_base64(
            shell.as_str(),
            &command_id,
            message_type_hex,
            payload_xml,
        )?;
        let body = CommandLineValue::pipeline(arguments).into_body(Some(&command_id));

        let response = self.send(
            WsAction::Command,
            &kind.resource_uri(),
            vec![selector_shell_id(shell.as_str()), options.option_set()],
            Some(body),
        )?;
        self.register_command(shell, &response)
    }

    fn register_command(
        &mut self,
        shell: &ShellId,
        response: &str,
    ) -> Result<CommandId, ClientError> {
        let document = parse_response(response)?;
        let id = CommandId(rsp::command_id(&document).map_err(ClientError::MalformedResponse)?);

        if let Some(entry) = self.shells.get_mut(shell) {
            entry.commands_run += 1;
        }
        info!(shell_id = %shell, command_id = %id, "command started");
        Ok(id)
    }

    #[instrument(skip_all, fields(shell_id = %shell, command_id = %command), err)]
    fn send_stdin_inner(
        &mut self,
        shell: &ShellId,
        command: &CommandId,
        data: &[u8],
        end: bool,
    ) -> Result<(), ClientError> {
        let kind = self.open_entry(shell)?.kind;
        let body = SendValue::builder()
            .command_id(command.as_str())
            .data(data)
            .end(end)
            .build()
            .into_body();

        let response = self.send(
            WsAction::Send,
            &kind.resource_uri(),
            vec![selector_shell_id(shell.as_str())],
            Some(body),
        )?;
        parse_response(&response)?;
        debug!(bytes = data.len(), end, "stdin sent");
        Ok(())
    }

    #[instrument(skip_all, fields(shell_id = %shell, command_id = %command), err)]
    fn receive_output(
        &mut self,
        shell: &ShellId,
        command: &CommandId,
        mut on_chunk: impl FnMut(&OutputChunk),
    ) -> Result<Output, ClientError> {
        let entry = self.open_entry(shell)?;
        entry.state = ShellState::Busy;
        let (kind, codepage) = (entry.kind, entry.codepage);

        let result = self.poll_output(shell, command, kind, codepage, &mut on_chunk);

        if let Some(entry) = self.shells.get_mut(shell) {
            entry.state = ShellState::Open;
        }
        result
    }

    fn poll_output(
        &self,
        shell: &ShellId,
        command: &CommandId,
        kind: ShellKind,
        codepage: Option<u32>,
        on_chunk: &mut dyn FnMut(&OutputChunk),
    ) -> Result<Output, ClientError> {
        let resource = kind.resource_uri();
        let mut output = Output::new();
        let mut iteration: u64 = 0;

        loop {
            iteration += 1;
            if let Some(limit) = self
                .config
                .max_receive_iterations
                .filter(|&limit| iteration > limit)
            {
                warn!(limit, "command not done within the receive limit");
                return Err(ClientError::ReceiveLimitExceeded { limit });
            }

            let body = ReceiveValue::builder()
                .command_id(command.as_str())
                .build()
                .into_body();
            let received = self
                .send(
                    WsAction::Receive,
                    &resource,
                    vec![selector_shell_id(shell.as_str()), keep_alive()],
                    Some(body),
                )
                .and_then(|xml| parse_receive(&xml));

            let response = match received {
                Ok(response) => response,
                Err(ClientError::Fault(fault)) if fault.is_operation_timeout() => {
                    debug!(
                        iteration,
                        fault_code = OPERATION_TIMEOUT_FAULT_CODE,
                        "no output before OperationTimeout, receiving again"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };

            for stream in &response.streams {
                let Some(stream_kind) = StreamKind::from_name(&stream.name) else {
                    warn!(stream = %stream.name, "ignoring unexpected stream");
                    continue;
                };
                let chunk = OutputChunk {
                    stream: stream_kind,
                    text: decoder::decode(&stream.content, codepage)?,
                };
                on_chunk(&chunk);
                output.push(chunk);
            }

            if response.done {
                let exit_code = response.exit_code.ok_or(ClientError::MalformedResponse(
                    WsManError::MissingElement("ExitCode"),
                ))?;
                output.set_exit_code(exit_code);
                info!(iteration, exit_code, "command done");
                return Ok(output);
            }

            trace!(iteration, streams = response.streams.len(), "command still running");
        }
    }

    #[instrument(skip_all, fields(shell_id = %shell, command_id = %command), err)]
    fn cleanup_command_inner(
        &mut self,
        shell: &ShellId,
        command: &CommandId,
    ) -> Result<(), ClientError> {
        let kind = self.open_entry(shell)?.kind;

        let result = self.send(
            WsAction::Signal,
            &kind.resource_uri(),
            vec![selector_shell_id(shell.as_str())],
            Some(rsp::terminate_body(command.as_str())),
        );
        best_effort(result, "cleanup_command")?;
        debug!("command cleaned up");
        Ok(())
    }

    #[instrument(skip_all, fields(shell_id = %shell), err)]
    fn close_shell_inner(&mut self, shell: &ShellId) -> Result<(), ClientError> {
        let kind = match self.shells.get(shell) {
            Some(entry) if entry.state == ShellState::Closed => {
                debug!("shell already closed");
                return Ok(());
            }
            Some(entry) if entry.state == ShellState::Open => entry.kind,
            Some(entry) => {
                return Err(ClientError::InvalidState(
                    format!("cannot close shell {shell} while {:?}", entry.state).into(),
                ));
            }
            None => return Err(not_opened(shell)),
        };

        let result = self.send(
            WsAction::Delete,
            &kind.resource_uri(),
            vec![selector_shell_id(shell.as_str())],
            None,
        );
        best_effort(result, "close_shell")?;

        if let Some(entry) = self.shells.get_mut(shell) {
            entry.state = ShellState::Closed;
        }
        info!("shell closed");
        Ok(())
    }

    #[instrument(skip_all, fields(%namespace), err)]
    fn run_wql_inner(&self, namespace: &str, query: &str) -> Result<WqlItems, ClientError> {
        let body = EnumerateValue::builder().query(query).build().into_body();
        let response = self.send(
            WsAction::Enumerate,
            &ResourceUri::wmi(namespace),
            Vec::new(),
            Some(body),
        )?;

        let document = parse_response(&response)?;
        let items = parse_items(&document).map_err(ClientError::MalformedResponse)?;
        debug!(keys = items.len(), "wql query complete");
        Ok(items)
    }

    fn open_entry(&mut self, shell: &ShellId) -> Result<&mut ShellEntry, ClientError> {
        match self.shells.get_mut(shell) {
            Some(entry) if entry.state == ShellState::Open => Ok(entry),
            Some(entry) => Err(ClientError::InvalidState(
                format!("shell {shell} is {:?}", entry.state).into(),
            )),
            None => Err(not_opened(shell)),
        }
    }

    /// Builds one envelope from the shared headers, the action and resource, and
    /// `fragments`, then sends it.
    fn send<'a>(
        &'a self,
        ws_action: WsAction,
        resource: &ResourceUri,
        fragments: Vec<HeaderSet<'a>>,
        body: Option<Element<'a>>,
    ) -> Result<String, ClientError> {
        let headers = WsManHeaders::builder()
            .to(self.config.endpoint.as_str())
            .session_id(self.session_id)
            .max_envelope_size(self.config.max_envelope_size)
            .operation_timeout(self.config.operation_timeout)
            .locale(self.config.locale.as_str())
            .build();

        let mut header_sets = vec![
            headers.header_set(),
            action(ws_action),
            resource_uri(resource),
        ];
        header_sets.extend(fragments);

        let request = build_envelope(header_sets, body)?;
        trace!(action = ?ws_action, length = request.len(), "sending request");

        let response = self.transport.send_request(&request)?;
        trace!(length = response.len(), "response received");
        Ok(response)
    }
}

/// Parses a response body, turning a SOAP fault it carries into [`ClientError::Fault`].
fn parse_response(xml: &str) -> Result<Document<'_>, ClientError> {
    let document = parser::parse(xml)?;
    match WsManFault::from_document(&document) {
        Some(fault) => Err(ClientError::Fault(fault)),
        None => Ok(document),
    }
}

fn parse_receive(xml: &str) -> Result<ReceiveResponse, ClientError> {
    let document = parse_response(xml)?;
    ReceiveResponse::from_document(&document).map_err(ClientError::MalformedResponse)
}

/// Cleanup is best-effort for the protocol: faults and unreadable responses are logged and
/// swallowed. A transport that cannot deliver the request is still an error.
fn best_effort(
    result: Result<String, ClientError>,
    operation: &'static str,
) -> Result<(), ClientError> {
    match result.and_then(|xml| parse_response(&xml).map(|_| ())) {
        Ok(()) => Ok(()),
        Err(ClientError::Fault(fault)) => {
            warn!(operation, fault_code = ?fault.fault_code(), %fault, "ignoring fault");
            Ok(())
        }
        Err(err @ ClientError::Transport(_)) => Err(err),
        Err(err) => {
            warn!(operation, error = %err, "ignoring malformed response");
            Ok(())
        }
    }
}

fn not_opened(shell: &ShellId) -> ClientError {
    ClientError::InvalidState(format!("shell {shell} was not opened by this session").into())
}
