//! Identifier extraction from Create and Command responses.
use ironwinrm_xml::parser::Document;

use crate::WsManError;

/// The server-assigned ShellId: the first `ShellId` element, or a `Selector Name="ShellId"`.
pub fn shell_id(document: &Document<'_>) -> Result<String, WsManError> {
    document
        .root_element()
        .descendants()
        .filter(|n| n.is_element())
        .find(|n| n.tag_name().name() == "ShellId" || n.attribute("Name") == Some("ShellId"))
        .and_then(|n| n.text())
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .ok_or(WsManError::MissingElement("ShellId"))
}

/// The server-assigned CommandId from a CommandResponse.
pub fn command_id(document: &Document<'_>) -> Result<String, WsManError> {
    document
        .root_element()
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "CommandId")
        .and_then(|n| n.text())
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .ok_or(WsManError::MissingElement("CommandId"))
}
