pub mod cores;
pub mod enumeration;
pub mod rsp;
pub mod soap;
pub mod ws_addressing;
pub mod ws_management;

mod macros;

use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum WsManError {
    #[error("XML error: {0}")]
    Xml(#[from] ironwinrm_xml::XmlError),

    #[error("XML builder error: {0}")]
    Builder(#[from] ironwinrm_xml::builder::XmlBuilderError),

    #[error("Response is missing the expected {0} element")]
    MissingElement(&'static str),

    #[error("Invalid value for {element}: {reason}")]
    InvalidValue {
        element: &'static str,
        reason: Cow<'static, str>,
    },
}
