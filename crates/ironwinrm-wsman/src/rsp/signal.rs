use ironwinrm_xml::builder::Element;

use crate::cores::{Attribute, Code, Signal, Tag, Text};

pub const TERMINATE_SIGNAL_CODE: &str =
    "http://schemas.microsoft.com/wbem/wsman/1/windows/shell/signal/terminate";

/// `<rsp:Signal CommandId=".."><rsp:Code>terminate</rsp:Code></rsp:Signal>`
pub fn terminate_body(command_id: &str) -> Element<'_> {
    let code = Tag::from_name(Code)
        .with_value(Text::from(TERMINATE_SIGNAL_CODE))
        .into_element();

    Tag::from_name(Signal)
        .with_value(())
        .with_attribute(Attribute::CommandId(command_id.into()))
        .into_element()
        .add_child(code)
}
