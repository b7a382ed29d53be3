use std::borrow::Cow;

use ironwinrm_xml::builder::Element;

pub trait TagValue<'a> {
    fn append_to_element(self, element: Element<'a>) -> Element<'a>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text<'a>(Cow<'a, str>);

impl<'a> From<&'a str> for Text<'a> {
    fn from(value: &'a str) -> Self {
        Text(value.into())
    }
}

impl From<String> for Text<'_> {
    fn from(value: String) -> Self {
        Text(value.into())
    }
}

impl<'a> From<Cow<'a, str>> for Text<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        Text(value)
    }
}

impl AsRef<str> for Text<'_> {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl<'a> From<Text<'a>> for Cow<'a, str> {
    fn from(val: Text<'a>) -> Self {
        val.0
    }
}

impl<'a> TagValue<'a> for Text<'a> {
    fn append_to_element(self, element: Element<'a>) -> Element<'a> {
        element.set_text(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Empty;

impl<'a> TagValue<'a> for Empty {
    fn append_to_element(self, element: Element<'a>) -> Element<'a> {
        element
    }
}

impl<'a> TagValue<'a> for () {
    fn append_to_element(self, element: Element<'a>) -> Element<'a> {
        element
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U32(pub u32);

impl<'a> TagValue<'a> for U32 {
    fn append_to_element(self, element: Element<'a>) -> Element<'a> {
        element.set_text(self.0.to_string())
    }
}

/// A UUID written in the WS-Addressing form `uuid:XXXXXXXX-...`, upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WsUuid(pub uuid::Uuid);

impl std::fmt::Display for WsUuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "uuid:{:X}", self.0)
    }
}

impl<'a> TagValue<'a> for WsUuid {
    fn append_to_element(self, element: Element<'a>) -> Element<'a> {
        element.set_text(self.to_string())
    }
}

/// Whole seconds written as an ISO-8601 duration, `PT60S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time(pub u64);

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PT{}S", self.0)
    }
}

impl<'a> TagValue<'a> for Time {
    fn append_to_element(self, element: Element<'a>) -> Element<'a> {
        element.set_text(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_uuid_is_prefixed_and_upper_case() {
        let id = uuid::Uuid::parse_str("d7f1aa2c-4b4c-4e12-9a7e-3c7f0f2b9a11").unwrap();
        assert_eq!(
            WsUuid(id).to_string(),
            "uuid:D7F1AA2C-4B4C-4E12-9A7E-3C7F0F2B9A11"
        );
    }

    #[test]
    fn time_formats_as_iso8601_seconds() {
        assert_eq!(Time(60).to_string(), "PT60S");
        assert_eq!(Time(0).to_string(), "PT0S");
    }
}
