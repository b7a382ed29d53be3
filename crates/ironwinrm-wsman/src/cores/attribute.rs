use std::borrow::Cow;

use crate::cores::namespace::Namespace;
use crate::define_attributes;

define_attributes!(
    MustUnderstand(bool) => (Some(Namespace::SoapEnvelope2003), "mustUnderstand"),
    Name(Cow<'a, str>) => (None, "Name"),
    MustComply(bool) => (None, "MustComply"),
    XmlLang(Cow<'a, str>) => (None, "xml:lang"),
    ShellId(Cow<'a, str>) => (None, "ShellId"),
    CommandId(Cow<'a, str>) => (None, "CommandId"),
    End(bool) => (None, "End"),
    Dialect(Cow<'a, str>) => (None, "Dialect"),
);

impl<'a> Attribute<'a> {
    /// The value of the `Name` attribute, which distinguishes repeated siblings such as
    /// `w:Option` and `w:Selector`.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Attribute::Name(name) => Some(name.as_ref()),
            _ => None,
        }
    }
}
