pub const SOAP_ENVELOPE_NAMESPACE_URI: &str = "http://www.w3.org/2003/05/soap-envelope";
pub const SOAP_ENVELOPE_NAMESPACE_ALIAS: &str = "s";

pub const WS_ADDRESSING_NAMESPACE_URI: &str = "http://schemas.xmlsoap.org/ws/2004/08/addressing";
pub const WS_ADDRESSING_NAMESPACE_ALIAS: &str = "a";

pub const CIM_BINDING_NAMESPACE_URI: &str = "http://schemas.dmtf.org/wbem/wsman/1/cimbinding.xsd";
pub const CIM_BINDING_NAMESPACE_ALIAS: &str = "b";

pub const WS_ENUMERATION_NAMESPACE_URI: &str = "http://schemas.xmlsoap.org/ws/2004/09/enumeration";
pub const WS_ENUMERATION_NAMESPACE_ALIAS: &str = "n";

pub const WS_TRANSFER_NAMESPACE_URI: &str = "http://schemas.xmlsoap.org/ws/2004/09/transfer";
pub const WS_TRANSFER_NAMESPACE_ALIAS: &str = "x";

pub const DMTF_WSMAN_SCHEMA_NAMESPACE_URI: &str = "http://schemas.dmtf.org/wbem/wsman/1/wsman.xsd";
pub const DMTF_WSMAN_SCHEMA_NAMESPACE_ALIAS: &str = "w";

pub const MS_WSMAN_SCHEMA_NAMESPACE_URI: &str =
    "http://schemas.microsoft.com/wbem/wsman/1/wsman.xsd";
pub const MS_WSMAN_SCHEMA_NAMESPACE_ALIAS: &str = "p";

pub const WSMAN_SHELL_NAMESPACE_URI: &str =
    "http://schemas.microsoft.com/wbem/wsman/1/windows/shell";
pub const WSMAN_SHELL_NAMESPACE_ALIAS: &str = "rsp";

pub const WSMAN_CONFIG_NAMESPACE_URI: &str = "http://schemas.microsoft.com/wbem/wsman/1/config";
pub const WSMAN_CONFIG_NAMESPACE_ALIAS: &str = "cfg";

/// Declared as the default namespace on the `creationXml` element only.
pub const POWERSHELL_NAMESPACE_URI: &str = "http://schemas.microsoft.com/powershell";

pub const WSMAN_FAULT_NAMESPACE_URI: &str = "http://schemas.microsoft.com/wbem/wsman/1/wsmanfault";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    SoapEnvelope2003,
    WsAddressing2004,
    CimBinding,
    WsEnumeration2004,
    WsTransfer2004,
    DmtfWsmanSchema,
    MsWsmanSchema,
    WsmanShell,
    WsmanConfig,
    PowerShell,
}

/// The namespace set declared on every outbound envelope.
pub const ENVELOPE_NAMESPACES: [Namespace; 9] = [
    Namespace::SoapEnvelope2003,
    Namespace::WsAddressing2004,
    Namespace::CimBinding,
    Namespace::WsEnumeration2004,
    Namespace::WsTransfer2004,
    Namespace::DmtfWsmanSchema,
    Namespace::MsWsmanSchema,
    Namespace::WsmanShell,
    Namespace::WsmanConfig,
];

impl Namespace {
    pub const fn as_tuple(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::SoapEnvelope2003 => (
                SOAP_ENVELOPE_NAMESPACE_URI,
                Some(SOAP_ENVELOPE_NAMESPACE_ALIAS),
            ),
            Self::WsAddressing2004 => (
                WS_ADDRESSING_NAMESPACE_URI,
                Some(WS_ADDRESSING_NAMESPACE_ALIAS),
            ),
            Self::CimBinding => (CIM_BINDING_NAMESPACE_URI, Some(CIM_BINDING_NAMESPACE_ALIAS)),
            Self::WsEnumeration2004 => (
                WS_ENUMERATION_NAMESPACE_URI,
                Some(WS_ENUMERATION_NAMESPACE_ALIAS),
            ),
            Self::WsTransfer2004 => (WS_TRANSFER_NAMESPACE_URI, Some(WS_TRANSFER_NAMESPACE_ALIAS)),
            Self::DmtfWsmanSchema => (
                DMTF_WSMAN_SCHEMA_NAMESPACE_URI,
                Some(DMTF_WSMAN_SCHEMA_NAMESPACE_ALIAS),
            ),
            Self::MsWsmanSchema => (
                MS_WSMAN_SCHEMA_NAMESPACE_URI,
                Some(MS_WSMAN_SCHEMA_NAMESPACE_ALIAS),
            ),
            Self::WsmanShell => (WSMAN_SHELL_NAMESPACE_URI, Some(WSMAN_SHELL_NAMESPACE_ALIAS)),
            Self::WsmanConfig => (WSMAN_CONFIG_NAMESPACE_URI, Some(WSMAN_CONFIG_NAMESPACE_ALIAS)),
            Self::PowerShell => (POWERSHELL_NAMESPACE_URI, None),
        }
    }

    pub const fn uri(self) -> &'static str {
        self.as_tuple().0
    }

    pub const fn alias(self) -> Option<&'static str> {
        self.as_tuple().1
    }
}
