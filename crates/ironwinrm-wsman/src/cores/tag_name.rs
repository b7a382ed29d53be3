use crate::cores::namespace::Namespace;
use crate::{define_custom_tagname, define_tagname};

pub trait TagName {
    const TAG_NAME: &'static str;
    const NAMESPACE: Option<Namespace>;
}

const SOAP: Option<Namespace> = Some(Namespace::SoapEnvelope2003);
const ADDRESSING: Option<Namespace> = Some(Namespace::WsAddressing2004);
const WSMAN: Option<Namespace> = Some(Namespace::DmtfWsmanSchema);
const MS_WSMAN: Option<Namespace> = Some(Namespace::MsWsmanSchema);
const SHELL: Option<Namespace> = Some(Namespace::WsmanShell);
const ENUMERATION: Option<Namespace> = Some(Namespace::WsEnumeration2004);

// =============
// SOAP (s namespace)
// =============
define_tagname!(Envelope, SOAP);
define_tagname!(Header, SOAP);
define_tagname!(Body, SOAP);

// ====================
// WS-Addressing (a namespace)
// ====================
define_tagname!(To, ADDRESSING);
define_tagname!(ReplyTo, ADDRESSING);
define_tagname!(Address, ADDRESSING);
define_tagname!(Action, ADDRESSING);
define_tagname!(MessageID, ADDRESSING);

// ===============================
// WS-Management DMTF (w namespace)
// ===============================
define_tagname!(ResourceURI, WSMAN);
define_tagname!(MaxEnvelopeSize, WSMAN);
define_tagname!(OperationTimeout, WSMAN);
define_tagname!(Locale, WSMAN);
define_tagname!(SelectorSet, WSMAN);
define_tagname!(OptionSet, WSMAN);
define_custom_tagname!(SelectorTagName, "Selector", WSMAN);
define_custom_tagname!(OptionTagName, "Option", WSMAN);
define_tagname!(OptimizeEnumeration, WSMAN);
define_tagname!(MaxElements, WSMAN);
define_tagname!(Filter, WSMAN);

// ====================================
// Microsoft WS-Management (p namespace)
// ====================================
define_tagname!(SessionId, MS_WSMAN);
define_tagname!(DataLocale, MS_WSMAN);

// ===================================
// Windows remote shell (rsp namespace)
// ===================================
define_tagname!(Shell, SHELL);
define_tagname!(InputStreams, SHELL);
define_tagname!(OutputStreams, SHELL);
define_tagname!(WorkingDirectory, SHELL);
define_tagname!(IdleTimeOut, SHELL);
define_tagname!(Environment, SHELL);
define_tagname!(Variable, SHELL);
define_tagname!(CommandLine, SHELL);
define_tagname!(Command, SHELL);
define_tagname!(Arguments, SHELL);
define_tagname!(Receive, SHELL);
define_tagname!(DesiredStream, SHELL);
define_tagname!(Send, SHELL);
define_tagname!(Stream, SHELL);
define_tagname!(Signal, SHELL);
define_tagname!(Code, SHELL);
define_custom_tagname!(CreationXml, "creationXml", Some(Namespace::PowerShell));

// ===================================
// WS-Enumeration (n namespace)
// ===================================
define_tagname!(Enumerate, ENUMERATION);
