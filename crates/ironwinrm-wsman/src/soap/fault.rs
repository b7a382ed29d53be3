use std::fmt;

use ironwinrm_xml::parser::{self, Document, Node, find_descendant};
use tracing::debug;

use crate::WsManError;
use crate::cores::SOAP_ENVELOPE_NAMESPACE_URI;

/// Reported by the server when no output became available before `OperationTimeout`.
/// A client receiving it should issue the same Receive again.
pub const OPERATION_TIMEOUT_FAULT_CODE: &str = "2150858793";

/// A WS-Management fault as carried in a SOAP 1.2 `s:Fault`.
#[derive(Debug, Clone, Default, PartialEq, Eq, typed_builder::TypedBuilder)]
pub struct WsManFault {
    /// Numeric `Code` attribute of the `WSManFault` detail.
    #[builder(default, setter(into, strip_option))]
    pub code: Option<String>,
    /// `s:Code/s:Subcode/s:Value`, e.g. `w:TimedOut`.
    #[builder(default, setter(into, strip_option))]
    pub subcode: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub reason: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub message: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub machine: Option<String>,
}

impl WsManFault {
    /// Machine-readable code: the numeric WSManFault code, else the SOAP subcode.
    pub fn fault_code(&self) -> Option<&str> {
        self.code.as_deref().or(self.subcode.as_deref())
    }

    pub fn is_operation_timeout(&self) -> bool {
        self.code.as_deref() == Some(OPERATION_TIMEOUT_FAULT_CODE)
    }

    /// Returns the fault carried by `doc`, if its body holds one.
    pub fn from_document(doc: &Document<'_>) -> Option<Self> {
        let fault = doc.root_element().descendants().find(|n| {
            n.is_element()
                && n.tag_name().name() == "Fault"
                && n.tag_name().namespace() == Some(SOAP_ENVELOPE_NAMESPACE_URI)
        })?;

        let subcode = find_descendant(fault, "Subcode")
            .and_then(|subcode| find_descendant(subcode, "Value"))
            .and_then(node_text);

        let reason = find_descendant(fault, "Reason")
            .and_then(|reason| find_descendant(reason, "Text"))
            .and_then(node_text);

        let detail = find_descendant(fault, "WSManFault");
        let code = detail.and_then(|d| d.attribute("Code")).map(str::to_owned);
        let machine = detail.and_then(|d| d.attribute("Machine")).map(str::to_owned);
        let message = detail
            .and_then(|d| find_descendant(d, "Message"))
            .and_then(node_text);

        let fault = Self {
            code,
            subcode,
            reason,
            message,
            machine,
        };
        debug!(fault_code = ?fault.fault_code(), "parsed soap fault");
        Some(fault)
    }

    /// Parses `xml` and extracts its fault.
    pub fn from_xml(xml: &str) -> Result<Option<Self>, WsManError> {
        let doc = parser::parse(xml)?;
        Ok(Self::from_document(&doc))
    }
}

/// Concatenated, trimmed text of `node` and its descendants.
fn node_text(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

impl fmt::Display for WsManFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.fault_code().unwrap_or("unknown"))?;
        if let Some(message) = self.message.as_ref().or(self.reason.as_ref()) {
            write!(f, " {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for WsManFault {}
