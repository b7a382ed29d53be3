use base64::Engine;
use ironwinrm_xml::builder::Element;

use crate::cores::{Attribute, Send, Stream, Tag, TagValue, Text};

pub const STDIN_STREAM: &str = "stdin";

/// One stdin chunk for a command. `end` marks the end of the input stream.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct SendValue<'a> {
    pub command_id: &'a str,
    pub data: &'a [u8],
    #[builder(default)]
    pub end: bool,
}

impl<'a> SendValue<'a> {
    pub fn into_body(self) -> Element<'a> {
        Tag::from_name(Send).with_value(self).into_element()
    }
}

impl<'a> TagValue<'a> for SendValue<'a> {
    fn append_to_element(self, element: Element<'a>) -> Element<'a> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(self.data);

        let mut stream = Tag::from_name(Stream)
            .with_value(Text::from(encoded))
            .with_attribute(Attribute::Name(STDIN_STREAM.into()))
            .with_attribute(Attribute::CommandId(self.command_id.into()));
        if self.end {
            stream = stream.with_attribute(Attribute::End(true));
        }

        element.add_child(stream.into_element())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::build_envelope;

    #[test]
    fn stdin_is_base64_encoded() {
        let body = SendValue::builder()
            .command_id("C0FFEE00-0000-0000-0000-000000000001")
            .data(b"echo hi\r\n")
            .build()
            .into_body();
        let xml = build_envelope(Vec::new(), Some(body)).unwrap();

        assert!(xml.contains(concat!(
            "<rsp:Send>",
            r#"<rsp:Stream Name="stdin" CommandId="C0FFEE00-0000-0000-0000-000000000001">"#,
            "ZWNobyBoaQ0K",
            "</rsp:Stream></rsp:Send>"
        )));
    }

    #[test]
    fn end_of_stream_is_flagged() {
        let body = SendValue::builder()
            .command_id("X")
            .data(b"")
            .end(true)
            .build()
            .into_body();
        let xml = build_envelope(Vec::new(), Some(body)).unwrap();

        assert!(xml.contains(r#"<rsp:Stream Name="stdin" CommandId="X" End="true"></rsp:Stream>"#));
    }
}
