//! Header Library: the fixed header fragments of every WS-Management request.
mod header;

pub use header::*;

use std::borrow::Cow;

use crate::cores::{
    Action, Attribute, OptionSet, OptionTagName, ResourceURI, SelectorSet, SelectorTagName,
};
use crate::soap::{HeaderElement, HeaderSet};

pub const CMD_SHELL_RESOURCE_URI: &str =
    "http://schemas.microsoft.com/wbem/wsman/1/windows/shell/cmd";
pub const POWERSHELL_RESOURCE_URI: &str =
    "http://schemas.microsoft.com/powershell/Microsoft.PowerShell";
pub const WMI_RESOURCE_URI_PREFIX: &str = "http://schemas.microsoft.com/wbem/wsman/1/wmi/";
pub const DEFAULT_WMI_NAMESPACE: &str = "root/cimv2/*";

pub const KEEPALIVE_OPTION: &str = "WSMAN_CMDSHELL_OPTION_KEEPALIVE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WsAction {
    Create,
    Delete,
    Command,
    Receive,
    Signal,
    Send,
    Enumerate,
}

impl WsAction {
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Create => "http://schemas.xmlsoap.org/ws/2004/09/transfer/Create",
            Self::Delete => "http://schemas.xmlsoap.org/ws/2004/09/transfer/Delete",
            Self::Command => "http://schemas.microsoft.com/wbem/wsman/1/windows/shell/Command",
            Self::Receive => "http://schemas.microsoft.com/wbem/wsman/1/windows/shell/Receive",
            Self::Signal => "http://schemas.microsoft.com/wbem/wsman/1/windows/shell/Signal",
            Self::Send => "http://schemas.microsoft.com/wbem/wsman/1/windows/shell/Send",
            Self::Enumerate => "http://schemas.xmlsoap.org/ws/2004/09/enumeration/Enumerate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    CmdShell,
    PowerShell,
    /// A WMI resource under the given CIM namespace, e.g. `root/cimv2/*`.
    Wmi(String),
}

impl ResourceUri {
    pub fn wmi(namespace: impl Into<String>) -> Self {
        Self::Wmi(namespace.into())
    }

    pub fn uri(&self) -> Cow<'static, str> {
        match self {
            Self::CmdShell => Cow::Borrowed(CMD_SHELL_RESOURCE_URI),
            Self::PowerShell => Cow::Borrowed(POWERSHELL_RESOURCE_URI),
            Self::Wmi(namespace) => Cow::Owned(format!("{WMI_RESOURCE_URI_PREFIX}{namespace}")),
        }
    }
}

impl Default for ResourceUri {
    fn default() -> Self {
        Self::wmi(DEFAULT_WMI_NAMESPACE)
    }
}

pub fn action(action: WsAction) -> HeaderSet<'static> {
    HeaderElement::new(Action)
        .with_attribute(Attribute::MustUnderstand(true))
        .with_text(action.uri())
        .into()
}

pub fn resource_uri(resource: &ResourceUri) -> HeaderSet<'static> {
    HeaderElement::new(ResourceURI)
        .with_attribute(Attribute::MustUnderstand(true))
        .with_text(resource.uri())
        .into()
}

/// `<w:SelectorSet><w:Selector Name="ShellId">id</w:Selector></w:SelectorSet>`
pub fn selector_shell_id(shell_id: &str) -> HeaderSet<'_> {
    HeaderElement::new(SelectorSet)
        .with_child(
            HeaderElement::new(SelectorTagName)
                .with_attribute(Attribute::Name("ShellId".into()))
                .with_text(shell_id),
        )
        .into()
}

/// An OptionSet with one `w:Option` per entry. No entries yields an empty fragment, so
/// nothing is written.
pub fn option_set<'a>(
    options: impl IntoIterator<Item = (&'static str, Cow<'a, str>)>,
) -> HeaderSet<'a> {
    let options: Vec<_> = options
        .into_iter()
        .map(|(name, value)| {
            HeaderElement::new(OptionTagName)
                .with_attribute(Attribute::Name(name.into()))
                .with_text(value)
        })
        .collect();

    if options.is_empty() {
        return HeaderSet::new();
    }

    options
        .into_iter()
        .fold(HeaderElement::new(OptionSet), HeaderElement::with_child)
        .into()
}

pub fn keep_alive() -> HeaderSet<'static> {
    option_set([(KEEPALIVE_OPTION, Cow::Borrowed("TRUE"))])
}

/// `TRUE`/`FALSE`, as the WinRS options expect.
pub fn wsman_bool(value: bool) -> Cow<'static, str> {
    Cow::Borrowed(if value { "TRUE" } else { "FALSE" })
}
