use ironwinrm_xml::builder::Element;
use ironwinrm_xml::parser::{Document, Node};
use tracing::{debug, trace};

use crate::WsManError;
use crate::cores::{
    Attribute, DesiredStream, Namespace, Receive, Stream, Tag, TagName, TagValue, Text,
};

pub const COMMAND_STATE_DONE: &str =
    "http://schemas.microsoft.com/wbem/wsman/1/windows/shell/CommandState/Done";

pub const DEFAULT_DESIRED_STREAMS: &str = "stdout stderr";

#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct ReceiveValue<'a> {
    pub command_id: &'a str,
    #[builder(default = DEFAULT_DESIRED_STREAMS)]
    pub desired_streams: &'a str,
}

impl<'a> ReceiveValue<'a> {
    pub fn into_body(self) -> Element<'a> {
        Tag::from_name(Receive).with_value(self).into_element()
    }
}

impl<'a> TagValue<'a> for ReceiveValue<'a> {
    fn append_to_element(self, element: Element<'a>) -> Element<'a> {
        let desired = Tag::from_name(DesiredStream)
            .with_value(Text::from(self.desired_streams))
            .with_attribute(Attribute::CommandId(self.command_id.into()));
        element.add_child(desired.into_element())
    }
}

/// One non-empty `rsp:Stream` of a ReceiveResponse, still base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedStream {
    pub name: String,
    pub command_id: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveResponse {
    /// In document order.
    pub streams: Vec<ReceivedStream>,
    pub done: bool,
    /// Present exactly when `done` is set.
    pub exit_code: Option<i32>,
}

impl ReceiveResponse {
    pub fn from_xml(xml: &str) -> Result<Self, WsManError> {
        let document = ironwinrm_xml::parser::parse(xml)?;
        Self::from_document(&document)
    }

    pub fn from_document(document: &Document<'_>) -> Result<Self, WsManError> {
        let root = document.root_element();

        let mut streams = Vec::new();
        for node in root.descendants().filter(is_tag::<Stream>) {
            let Some(content) = node.text().filter(|t| !t.trim().is_empty()) else {
                trace!("skipping empty stream element");
                continue;
            };
            let name = node.attribute("Name").ok_or(WsManError::InvalidValue {
                element: "Stream",
                reason: "missing Name attribute".into(),
            })?;

            streams.push(ReceivedStream {
                name: name.to_owned(),
                command_id: node.attribute("CommandId").map(ToOwned::to_owned),
                content: content.to_owned(),
            });
        }

        let done = root
            .descendants()
            .any(|n| n.is_element() && n.attribute("State") == Some(COMMAND_STATE_DONE));

        let exit_code = if done {
            let node = root
                .descendants()
                .find(|n| n.is_element() && n.tag_name().name() == "ExitCode")
                .ok_or(WsManError::MissingElement("ExitCode"))?;
            let text = node.text().unwrap_or_default().trim();
            let code = text.parse::<i32>().map_err(|_| WsManError::InvalidValue {
                element: "ExitCode",
                reason: format!("not an integer: {text:?}").into(),
            })?;
            Some(code)
        } else {
            None
        };

        debug!(streams = streams.len(), done, ?exit_code, "parsed receive response");

        Ok(Self {
            streams,
            done,
            exit_code,
        })
    }
}

pub(crate) fn is_tag<N: TagName>(node: &Node<'_, '_>) -> bool {
    node.is_element()
        && node.tag_name().name() == N::TAG_NAME
        && node.tag_name().namespace() == N::NAMESPACE.map(Namespace::uri)
}
