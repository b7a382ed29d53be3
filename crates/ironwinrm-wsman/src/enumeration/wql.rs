use std::collections::BTreeMap;

use ironwinrm_xml::parser::{self, Document, Node};
use regex::Regex;
use serde::Serialize;

use crate::WsManError;

/// A WQL result field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WqlValue {
    Null,
    Text(String),
    Map(BTreeMap<String, WqlValue>),
    List(Vec<WqlValue>),
}

impl WqlValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&WqlValue> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Adds `value` under `key`, turning a repeated key into a list.
    fn insert_into(map: &mut BTreeMap<String, WqlValue>, key: String, value: WqlValue) {
        match map.remove(&key) {
            None => {
                map.insert(key, value);
            }
            Some(Self::List(mut items)) => {
                items.push(value);
                map.insert(key, Self::List(items));
            }
            Some(existing) => {
                map.insert(key, Self::List(vec![existing, value]));
            }
        }
    }
}

/// Result keys are snake-cased class names; every value is a sequence.
pub type WqlItems = BTreeMap<String, Vec<WqlValue>>;

/// `Win32_OperatingSystem` to `win32_operating_system`, `CSName` to `cs_name`.
pub struct SnakeCase {
    acronym: Regex,
    camel: Regex,
}

impl SnakeCase {
    pub fn new() -> Result<Self, WsManError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| WsManError::InvalidValue {
                element: "snake_case pattern",
                reason: e.to_string().into(),
            })
        };

        Ok(Self {
            acronym: compile(r"([A-Z]+)([A-Z][a-z])")?,
            camel: compile(r"([a-z\d])([A-Z])")?,
        })
    }

    pub fn convert(&self, name: &str) -> String {
        let name = name.replace("::", "/");
        let name = self.acronym.replace_all(&name, "${1}_${2}");
        let name = self.camel.replace_all(&name, "${1}_${2}");
        name.replace(['.', '-'], "_").to_lowercase()
    }
}

/// Parses an EnumerateResponse into its items, wrapping single-valued keys.
pub fn parse_items(document: &Document<'_>) -> Result<WqlItems, WsManError> {
    let snake_case = SnakeCase::new()?;

    let Some(items) = parser::find_descendant(document.root_element(), "Items") else {
        // an empty result has no Items element
        return Ok(WqlItems::new());
    };

    let mut collected = BTreeMap::new();
    for child in parser::child_elements(items) {
        WqlValue::insert_into(
            &mut collected,
            snake_case.convert(child.tag_name().name()),
            to_value(child, &snake_case),
        );
    }

    Ok(collected
        .into_iter()
        .map(|(key, value)| match value {
            WqlValue::List(values) => (key, values),
            single => (key, vec![single]),
        })
        .collect())
}

fn to_value(node: Node<'_, '_>, snake_case: &SnakeCase) -> WqlValue {
    if node
        .attributes()
        .any(|a| a.name() == "nil" && a.value() == "true")
    {
        return WqlValue::Null;
    }

    let mut children = parser::child_elements(node).peekable();
    if children.peek().is_none() {
        return node
            .text()
            .map_or(WqlValue::Null, |text| WqlValue::Text(text.to_owned()));
    }

    let mut map = BTreeMap::new();
    for child in children {
        WqlValue::insert_into(
            &mut map,
            snake_case.convert(child.tag_name().name()),
            to_value(child, snake_case),
        );
    }
    WqlValue::Map(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(items: &str) -> String {
        format!(
            r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope" xmlns:n="http://schemas.xmlsoap.org/ws/2004/09/enumeration" xmlns:w="http://schemas.dmtf.org/wbem/wsman/1/wsman.xsd" xmlns:p="http://schemas.microsoft.com/wbem/wsman/1/wmi/root/cimv2/Win32_Service" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><s:Body><n:EnumerateResponse><w:Items>{items}</w:Items><w:EndOfSequence/></n:EnumerateResponse></s:Body></s:Envelope>"#
        )
    }

    #[test]
    fn snake_case_follows_acronym_rules() {
        let snake_case = SnakeCase::new().unwrap();
        assert_eq!(snake_case.convert("Win32_OperatingSystem"), "win32_operating_system");
        assert_eq!(snake_case.convert("CSName"), "cs_name");
        assert_eq!(snake_case.convert("Name"), "name");
        assert_eq!(snake_case.convert("DNSHostName"), "dns_host_name");
        assert_eq!(snake_case.convert("Data-Locale.x"), "data_locale_x");
    }

    #[test]
    fn single_item_is_wrapped_in_a_sequence() {
        let xml = response(
            "<p:Win32_Service><p:Name>WinRM</p:Name><p:State>Running</p:State></p:Win32_Service>",
        );
        let doc = parser::parse(&xml).unwrap();
        let items = parse_items(&doc).unwrap();

        let services = &items["win32_service"];
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].get("name").and_then(WqlValue::as_text), Some("WinRM"));
        assert_eq!(services[0].get("state").and_then(WqlValue::as_text), Some("Running"));
    }

    #[test]
    fn repeated_items_are_kept_as_is() {
        let xml = response(concat!(
            "<p:Win32_Service><p:Name>WinRM</p:Name></p:Win32_Service>",
            "<p:Win32_Service><p:Name>Spooler</p:Name></p:Win32_Service>",
        ));
        let doc = parser::parse(&xml).unwrap();
        let items = parse_items(&doc).unwrap();

        let names: Vec<_> = items["win32_service"]
            .iter()
            .filter_map(|s| s.get("name").and_then(WqlValue::as_text))
            .collect();
        assert_eq!(names, vec!["WinRM", "Spooler"]);
    }

    #[test]
    fn nil_and_empty_fields_are_null() {
        let xml = response(
            r#"<p:Win32_Service><p:Description xsi:nil="true"/><p:PathName/></p:Win32_Service>"#,
        );
        let doc = parser::parse(&xml).unwrap();
        let items = parse_items(&doc).unwrap();

        let service = &items["win32_service"][0];
        assert_eq!(service.get("description"), Some(&WqlValue::Null));
        assert_eq!(service.get("path_name"), Some(&WqlValue::Null));
    }

    #[test]
    fn missing_items_yield_empty_result() {
        let xml = r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope"><s:Body/></s:Envelope>"#;
        let doc = parser::parse(xml).unwrap();
        assert!(parse_items(&doc).unwrap().is_empty());
    }
}
