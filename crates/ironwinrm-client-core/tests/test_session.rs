mod common;

use std::time::Duration;

use common::*;
use ironwinrm_client_core::{
    ClientError, CommandOptions, SessionOptions, ShellKind, ShellOptions, ShellSession, ShellState,
    StreamKind, TransportError, WqlValue,
};

const SHELL: &str = "3F2C8E14-9B7A-4D61-A0C5-7E8F9A1B2C3D";
const COMMAND: &str = "7A1B2C3D-4E5F-4061-8293-A4B5C6D7E8F9";
const TIMEOUT_CODE: &str = "2150858793";

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn new_session_applies_receive_timeout() {
    let transport = ScriptedTransport::new();
    let session = ShellSession::new(config(), &transport);

    assert_eq!(transport.receive_timeouts(), vec![Duration::from_secs(70)]);
    assert_eq!(session.config().operation_timeout, 60);
}

#[test]
fn open_shell_uses_server_shell_id() {
    let transport = ScriptedTransport::new();
    transport.reply(create_response(SHELL));
    let mut session = ShellSession::new(config(), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();

    assert_eq!(shell.as_str(), SHELL);
    assert_eq!(session.shell_state(&shell), ShellState::Open);

    let requests = transport.requests();
    assert_eq!(action_names(&requests), vec!["Create"]);
    assert_eq!(
        resource_uri(&requests[0]),
        "http://schemas.microsoft.com/wbem/wsman/1/windows/shell/cmd"
    );
    assert!(!body(&requests[0]).contains("ShellId="));
}

#[test]
fn powershell_shell_sends_candidate_but_keeps_server_id() {
    let transport = ScriptedTransport::new();
    transport.reply(create_response(SHELL));
    let mut session = ShellSession::new(config(), &transport);

    let options = ShellOptions::builder().kind(ShellKind::PowerShell).build();
    let shell = session.open_shell(&options).unwrap();

    assert_eq!(shell.as_str(), SHELL);
    let request = &transport.requests()[0];
    assert!(body(request).contains("ShellId=\""));
    assert!(!body(request).contains(SHELL));
    assert_eq!(
        resource_uri(request),
        "http://schemas.microsoft.com/powershell/Microsoft.PowerShell"
    );
}

#[test]
fn command_output_in_single_iteration() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(command_response(COMMAND))
        .reply(receive_response(
            COMMAND,
            &[("stdout", "Windows IP Configuration\r\n"), ("stderr", "warning\r\n")],
            Some(0),
        ));
    let mut session = ShellSession::new(config(), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    let command = session
        .run_command(&shell, "ipconfig", &args(&["/all"]), &CommandOptions::default())
        .unwrap();
    let output = session.get_command_output(&shell, &command).unwrap();

    assert_eq!(command.as_str(), COMMAND);
    assert_eq!(output.stdout(), "Windows IP Configuration\r\n");
    assert_eq!(output.stderr(), "warning\r\n");
    assert_eq!(output.exit_code(), Some(0));
    assert_eq!(session.commands_run(&shell), 1);
    assert_eq!(session.shell_state(&shell), ShellState::Open);

    let requests = transport.requests();
    assert_eq!(action_names(&requests), vec!["Create", "Command", "Receive"]);
    assert!(body(&requests[1]).contains("<rsp:Command>\"ipconfig\"</rsp:Command>"));
    assert!(requests[2].contains("WSMAN_CMDSHELL_OPTION_KEEPALIVE"));
}

#[test]
#[tracing_test::traced_test]
fn receive_retries_operation_timeout_faults() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(command_response(COMMAND))
        .reply(receive_response(COMMAND, &[("stdout", "first ")], None))
        .fault(TIMEOUT_CODE)
        .reply(fault_body(TIMEOUT_CODE))
        .reply(receive_response(
            COMMAND,
            &[("stderr", "oops "), ("stdout", "second")],
            Some(3),
        ));
    let mut session = ShellSession::new(config(), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    let command = session
        .run_command(&shell, "dir", &[], &CommandOptions::default())
        .unwrap();

    let mut seen = Vec::new();
    let output = session
        .get_command_output_with(&shell, &command, |chunk| {
            seen.push((chunk.stream, chunk.text.clone()));
        })
        .unwrap();

    assert_eq!(output.stdout(), "first second");
    assert_eq!(output.stderr(), "oops ");
    assert_eq!(output.exit_code(), Some(3));
    assert_eq!(
        seen,
        vec![
            (StreamKind::Stdout, "first ".to_owned()),
            (StreamKind::Stderr, "oops ".to_owned()),
            (StreamKind::Stdout, "second".to_owned()),
        ]
    );

    let receives: Vec<_> = transport.requests().into_iter().skip(2).collect();
    assert_eq!(receives.len(), 4);
    assert!(receives.iter().all(|r| body(r) == body(&receives[0])));
    assert_ne!(message_id(&receives[1]), message_id(&receives[2]));
    assert!(logs_contain("receiving again"));
}

#[test]
fn other_faults_propagate_and_release_the_shell() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(command_response(COMMAND))
        .fault("2150858843");
    let mut session = ShellSession::new(config(), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    let command = session
        .run_command(&shell, "dir", &[], &CommandOptions::default())
        .unwrap();
    let err = session.get_command_output(&shell, &command).unwrap_err();

    assert!(matches!(err, ClientError::Fault(_)));
    assert_eq!(err.fault_code(), Some("2150858843"));
    assert_eq!(session.shell_state(&shell), ShellState::Open);
}

#[test]
fn transport_failures_propagate() {
    let transport = ScriptedTransport::new();
    transport.fail(TransportError::Connection("connection refused".into()));
    let mut session = ShellSession::new(config(), &transport);

    let err = session.open_shell(&ShellOptions::default()).unwrap_err();

    assert!(matches!(err, ClientError::Transport(TransportError::Connection(_))));
}

#[test]
fn receive_limit_bounds_polling() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(command_response(COMMAND))
        .reply(receive_response(COMMAND, &[("stdout", "a")], None))
        .reply(receive_response(COMMAND, &[("stdout", "b")], None));
    let options = SessionOptions {
        max_receive_iterations: Some(2),
        ..SessionOptions::default()
    };
    let mut session = ShellSession::new(config_with(options), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    let command = session
        .run_command(&shell, "ping", &args(&["-t", "localhost"]), &CommandOptions::default())
        .unwrap();
    let err = session.get_command_output(&shell, &command).unwrap_err();

    assert!(matches!(err, ClientError::ReceiveLimitExceeded { limit: 2 }));
    assert_eq!(transport.requests().len(), 4);
}

#[test]
fn commands_require_an_open_shell() {
    let transport = ScriptedTransport::new();
    transport.reply(create_response(SHELL)).reply(empty_response());
    let mut session = ShellSession::new(config(), &transport);

    let unknown = ironwinrm_client_core::ShellId::new("UNKNOWN");
    let err = session
        .run_command(&unknown, "dir", &[], &CommandOptions::default())
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidState(_)));
    assert_eq!(session.shell_state(&unknown), ShellState::Unopened);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    session.close_shell(&shell).unwrap();
    assert_eq!(session.shell_state(&shell), ShellState::Closed);

    let err = session
        .run_command(&shell, "dir", &[], &CommandOptions::default())
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidState(_)));

    session.close_shell(&shell).unwrap();
    assert_eq!(action_names(&transport.requests()), vec!["Create", "Delete"]);
}

#[test]
#[tracing_test::traced_test]
fn cleanup_and_close_ignore_faults() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(command_response(COMMAND))
        .fault("2150858843")
        .reply(fault_body("2150858843"));
    let mut session = ShellSession::new(config(), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    let command = session
        .run_command(&shell, "dir", &[], &CommandOptions::default())
        .unwrap();

    session.cleanup_command(&shell, &command).unwrap();
    session.close_shell(&shell).unwrap();

    let requests = transport.requests();
    assert_eq!(
        action_names(&requests),
        vec!["Create", "Command", "Signal", "Delete"]
    );
    assert!(body(&requests[2]).contains("signal/terminate"));
    assert_eq!(session.shell_state(&shell), ShellState::Closed);
    assert!(logs_contain("ignoring fault"));
}

#[test]
fn stdin_is_sent_base64_encoded() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(command_response(COMMAND))
        .reply(empty_response())
        .reply(empty_response());
    let mut session = ShellSession::new(config(), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    let command = session
        .run_command(&shell, "cmd", &[], &CommandOptions::default())
        .unwrap();
    session.write_stdin(&shell, &command, b"echo hi\r\n").unwrap();
    session.send_stdin(&shell, &command, b"exit\r\n", true).unwrap();

    let requests = transport.requests();
    assert_eq!(action_names(&requests)[2..], ["Send", "Send"]);
    assert!(body(&requests[2]).contains("ZWNobyBoaQ0K"));
    assert!(!body(&requests[2]).contains("End="));
    assert!(body(&requests[3]).contains("End=\"true\""));
}

#[test]
fn pipeline_is_dispatched_with_client_command_id() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(command_response(COMMAND));
    let mut session = ShellSession::new(config(), &transport);

    let options = ShellOptions::builder().kind(ShellKind::PowerShell).build();
    let shell = session.open_shell(&options).unwrap();
    let command = session
        .run_pipeline(&shell, "00021006", "<Obj RefId=\"0\"/>", &CommandOptions::default())
        .unwrap();

    assert_eq!(command.as_str(), COMMAND);
    let request = &transport.requests()[1];
    assert!(body(request).contains("CommandId=\""));
    assert!(body(request).contains("<rsp:Arguments>"));
    assert!(!body(request).contains("<rsp:Command>"));
}

#[test]
fn wql_query_returns_snake_cased_items() {
    let transport = ScriptedTransport::new();
    transport.reply(enumerate_response(
        r#"<p:Win32_Service xmlns:p="http://schemas.microsoft.com/wbem/wsman/1/wmi/root/cimv2/Win32_Service"><p:DisplayName>Windows Remote Management</p:DisplayName><p:State>Running</p:State></p:Win32_Service><p:Win32_Service xmlns:p="http://schemas.microsoft.com/wbem/wsman/1/wmi/root/cimv2/Win32_Service"><p:DisplayName>Print Spooler</p:DisplayName><p:State>Stopped</p:State></p:Win32_Service>"#,
    ));
    let session = ShellSession::new(config(), &transport);

    let items = session
        .run_wql("SELECT DisplayName, State FROM Win32_Service")
        .unwrap();

    let services = &items["win32_service"];
    assert_eq!(services.len(), 2);
    let WqlValue::Map(first) = &services[0] else {
        panic!("expected a map, got {:?}", services[0]);
    };
    assert_eq!(
        first["display_name"].as_text(),
        Some("Windows Remote Management")
    );

    let request = &transport.requests()[0];
    assert_eq!(action_names(&transport.requests()), vec!["Enumerate"]);
    assert_eq!(
        resource_uri(request),
        "http://schemas.microsoft.com/wbem/wsman/1/wmi/root/cimv2/*"
    );
    assert!(body(request).contains("SELECT DisplayName, State FROM Win32_Service"));
}

#[test]
fn set_timeout_updates_transport_and_headers() {
    let transport = ScriptedTransport::new();
    transport.reply(create_response(SHELL));
    let mut session = ShellSession::new(config(), &transport);

    session.set_timeout(30, None).unwrap();
    session.set_locale("de-DE");
    session.open_shell(&ShellOptions::default()).unwrap();

    assert_eq!(
        transport.receive_timeouts(),
        vec![Duration::from_secs(70), Duration::from_secs(40)]
    );
    let request = &transport.requests()[0];
    assert!(request.contains("PT30S"));
    assert!(request.contains("xml:lang=\"de-DE\""));
    assert!(matches!(
        session.set_timeout(0, None),
        Err(ClientError::Config(_))
    ));
}

#[test]
fn each_request_gets_a_fresh_message_id() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(enumerate_response(""));
    let mut session = ShellSession::new(config(), &transport);

    session.open_shell(&ShellOptions::default()).unwrap();
    session.run_wql("SELECT * FROM Win32_Process").unwrap();

    let requests = transport.requests();
    let first = message_id(&requests[0]);
    assert!(first.starts_with("uuid:"));
    assert_eq!(first[5..], first[5..].to_uppercase());
    assert_ne!(first, message_id(&requests[1]));
    let session_id = format!("uuid:{:X}", session.session_id());
    assert!(requests.iter().all(|r| r.contains(&session_id)));
}

#[test]
fn close_shell_reports_an_unreachable_transport() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .fail(TransportError::Connection("connection reset".into()))
        .reply(empty_response());
    let mut session = ShellSession::new(config(), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    let err = session.close_shell(&shell).unwrap_err();

    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Connection(_))
    ));
    assert_eq!(session.shell_state(&shell), ShellState::Open);

    session.close_shell(&shell).unwrap();
    assert_eq!(session.shell_state(&shell), ShellState::Closed);
    assert_eq!(
        action_names(&transport.requests()),
        vec!["Create", "Delete", "Delete"]
    );
}

#[test]
fn cleanup_command_reports_an_unreachable_transport() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(command_response(COMMAND))
        .fail(TransportError::Connection("connection refused".into()));
    let mut session = ShellSession::new(config(), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    let command = session
        .run_command(&shell, "dir", &[], &CommandOptions::default())
        .unwrap();
    let err = session.cleanup_command(&shell, &command).unwrap_err();

    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Connection(_))
    ));
    assert_eq!(session.shell_state(&shell), ShellState::Open);
}

#[test]
fn cleanup_ignores_malformed_responses() {
    let transport = ScriptedTransport::new();
    transport
        .reply(create_response(SHELL))
        .reply(command_response(COMMAND))
        .reply("not xml".to_owned());
    let mut session = ShellSession::new(config(), &transport);

    let shell = session.open_shell(&ShellOptions::default()).unwrap();
    let command = session
        .run_command(&shell, "dir", &[], &CommandOptions::default())
        .unwrap();

    session.cleanup_command(&shell, &command).unwrap();
}

#[test]
fn set_timeout_saturates_huge_operation_timeouts() {
    let transport = ScriptedTransport::new();
    let mut session = ShellSession::new(config(), &transport);

    session.set_timeout(u64::MAX, None).unwrap();

    assert_eq!(session.config().operation_timeout, u64::MAX);
    assert_eq!(session.config().receive_timeout, u64::MAX);
}
