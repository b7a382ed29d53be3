#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ironwinrm_client_core::{SessionConfig, SessionOptions, Transport, TransportError, WsManFault};
use ironwinrm_xml::parser;

/// Replays scripted responses in order and records every request it was given.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<String, TransportError>>>,
    requests: Mutex<Vec<String>>,
    receive_timeouts: Mutex<Vec<Duration>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, xml: impl Into<String>) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(xml.into()));
        self
    }

    pub fn fail(&self, err: TransportError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn fault(&self, code: &str) -> &Self {
        self.fail(TransportError::Fault(
            WsManFault::builder()
                .code(code)
                .message(format!("scripted fault {code}"))
                .build(),
        ))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn receive_timeouts(&self) -> Vec<Duration> {
        self.receive_timeouts.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn send_request(&self, request: &str) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(request.to_owned());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted response left".into())))
    }

    fn set_receive_timeout(&self, timeout: Duration) {
        self.receive_timeouts.lock().unwrap().push(timeout);
    }
}

pub fn config() -> SessionConfig {
    config_with(SessionOptions::default())
}

pub fn config_with(options: SessionOptions) -> SessionConfig {
    SessionConfig::new(SessionOptions {
        endpoint: Some("http://windows-host:5985/wsman".into()),
        user: Some("administrator".into()),
        password: Some("secret".into()),
        ..options
    })
    .unwrap()
}

const ENVELOPE_OPEN: &str = r#"<s:Envelope xml:lang="en-US" xmlns:s="http://www.w3.org/2003/05/soap-envelope" xmlns:a="http://schemas.xmlsoap.org/ws/2004/08/addressing" xmlns:x="http://schemas.xmlsoap.org/ws/2004/09/transfer" xmlns:n="http://schemas.xmlsoap.org/ws/2004/09/enumeration" xmlns:w="http://schemas.dmtf.org/wbem/wsman/1/wsman.xsd" xmlns:rsp="http://schemas.microsoft.com/wbem/wsman/1/windows/shell"><s:Header><a:Action>response</a:Action></s:Header><s:Body>"#;
const ENVELOPE_CLOSE: &str = "</s:Body></s:Envelope>";

fn envelope(body: &str) -> String {
    format!("{ENVELOPE_OPEN}{body}{ENVELOPE_CLOSE}")
}

pub fn create_response(shell_id: &str) -> String {
    envelope(&format!(
        r#"<x:ResourceCreated><a:ReferenceParameters><w:SelectorSet><w:Selector Name="ShellId">{shell_id}</w:Selector></w:SelectorSet></a:ReferenceParameters></x:ResourceCreated>"#
    ))
}

pub fn command_response(command_id: &str) -> String {
    envelope(&format!(
        "<rsp:CommandResponse><rsp:CommandId>{command_id}</rsp:CommandId></rsp:CommandResponse>"
    ))
}

/// A ReceiveResponse carrying `streams` as `(name, text)` pairs, Done with `exit_code` when
/// one is given.
pub fn receive_response(
    command_id: &str,
    streams: &[(&str, &str)],
    exit_code: Option<i32>,
) -> String {
    let mut body = String::from("<rsp:ReceiveResponse>");
    for (name, text) in streams {
        body.push_str(&format!(
            r#"<rsp:Stream Name="{name}" CommandId="{command_id}">{}</rsp:Stream>"#,
            STANDARD.encode(text)
        ));
    }
    match exit_code {
        Some(code) => body.push_str(&format!(
            r#"<rsp:CommandState CommandId="{command_id}" State="http://schemas.microsoft.com/wbem/wsman/1/windows/shell/CommandState/Done"><rsp:ExitCode>{code}</rsp:ExitCode></rsp:CommandState>"#
        )),
        None => body.push_str(&format!(
            r#"<rsp:CommandState CommandId="{command_id}" State="http://schemas.microsoft.com/wbem/wsman/1/windows/shell/CommandState/Running"/>"#
        )),
    }
    body.push_str("</rsp:ReceiveResponse>");
    envelope(&body)
}

/// Response to Send, Signal or Delete.
pub fn empty_response() -> String {
    envelope("")
}

pub fn fault_body(code: &str) -> String {
    envelope(&format!(
        r#"<s:Fault><s:Code><s:Value>s:Receiver</s:Value></s:Code><s:Reason><s:Text xml:lang="en-US">scripted</s:Text></s:Reason><s:Detail><f:WSManFault xmlns:f="http://schemas.microsoft.com/wbem/wsman/1/wsmanfault" Code="{code}" Machine="windows-host"><f:Message>scripted fault</f:Message></f:WSManFault></s:Detail></s:Fault>"#
    ))
}

pub fn enumerate_response(items: &str) -> String {
    envelope(&format!(
        "<n:EnumerateResponse><n:EnumerationContext/><w:Items>{items}</w:Items><w:EndOfSequence/></n:EnumerateResponse>"
    ))
}

fn element_text(request: &str, local_name: &str) -> Option<String> {
    let doc = parser::parse(request).unwrap();
    doc.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
        .and_then(|n| n.text())
        .map(str::to_owned)
}

pub fn message_id(request: &str) -> String {
    element_text(request, "MessageID").unwrap()
}

pub fn action(request: &str) -> String {
    element_text(request, "Action").unwrap()
}

pub fn resource_uri(request: &str) -> String {
    element_text(request, "ResourceURI").unwrap()
}

/// The `s:Body` element exactly as it was serialized.
pub fn body(request: &str) -> String {
    let doc = parser::parse(request).unwrap();
    let node = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "Body")
        .unwrap();
    request[node.range()].to_owned()
}

pub fn action_names(requests: &[String]) -> Vec<String> {
    requests
        .iter()
        .map(|request| {
            let action = action(request);
            action.rsplit('/').next().unwrap().to_owned()
        })
        .collect()
}
