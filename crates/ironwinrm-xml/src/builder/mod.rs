//! Alias-aware XML writer.
//!
//! Elements record the namespace they belong to and the namespace declarations they
//! introduce. Prefixes are resolved while writing, so a child may use a namespace that
//! any ancestor declared.
mod attribute;
mod writer;
mod declaration;
mod element;
mod escape;
mod namespace;

use std::collections::HashMap;

pub use self::attribute::*;
pub use self::writer::*;
pub use self::declaration::*;
pub use self::element::*;
pub use self::namespace::*;

pub type AliasMap<'a> = HashMap<Namespace<'a>, Option<&'a str>>;

#[derive(Debug, thiserror::Error)]
pub enum XmlBuilderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("Namespace '{ns}' not declared for tag '{tag}'")]
    NamespaceNotDeclared { tag: String, ns: String },
    #[error("Namespace '{ns}' not declared for attribute '{attr}'")]
    AttributeNamespaceNotDeclared { attr: String, ns: String },
}

pub trait NamespaceWrite<'a> {
    fn ns_write<W: std::io::Write>(
        &self,
        w: &mut W,
        aliases: &AliasMap<'a>,
    ) -> Result<(), XmlBuilderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_xml() {
        let builder = Builder::new(None, Element::new("root"));
        assert_eq!(builder.to_xml_string().unwrap(), "<root/>");
    }

    #[test]
    fn test_xml_with_attributes() {
        let element = Element::new("root").add_attribute(Attribute::new("attr1", "value1"));
        let xml_string = Builder::new(None, element).to_xml_string().unwrap();
        assert_eq!(xml_string, r#"<root attr1="value1"/>"#);
    }

    #[test]
    fn test_xml_with_namespaces() {
        let element = Element::new("root")
            .set_namespace(Namespace::new("http://example.com/ns1"))
            .add_namespace_declaration("http://example.com/ns1", Some("ns1"));

        let xml_string = Builder::new(None, element).to_xml_string().unwrap();
        assert_eq!(
            xml_string,
            r#"<ns1:root xmlns:ns1="http://example.com/ns1"/>"#
        );
    }

    #[test]
    fn test_full_xml_document() {
        let declaration = Declaration::new("1.0", "UTF-8");
        let child = Element::new("child")
            .set_namespace(Namespace::new("http://example.com/ns2"))
            .add_attribute(Attribute::new("attr2", "value2"));
        let element = Element::new("root")
            .set_namespace(Namespace::new("http://example.com/ns1"))
            .add_namespace_declaration("http://example.com/ns1", Some("ns1"))
            .add_namespace_declaration("http://example.com/ns2", Some("ns2"))
            .add_attribute(Attribute::new("attr1", "value1"))
            .add_child(child);

        let xml_string = Builder::new(Some(declaration), element)
            .to_xml_string()
            .unwrap();

        assert!(xml_string.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml_string.contains(
            r#"<ns1:root xmlns:ns1="http://example.com/ns1" xmlns:ns2="http://example.com/ns2" attr1="value1">"#
        ));
        assert!(xml_string.contains(r#"<ns2:child attr2="value2"/>"#));
        assert!(xml_string.ends_with("</ns1:root>"));
    }

    #[test]
    fn test_setting_text_overwrites_children() {
        let element = Element::new("container")
            .add_child(Element::new("item"))
            .set_text("New text");

        let xml_string = Builder::new(None, element).to_xml_string().unwrap();
        assert_eq!(xml_string, "<container>New text</container>");
    }

    #[test]
    fn test_inherited_namespace_declarations() {
        let grandchild =
            Element::new("grandchild").set_namespace(Namespace::new("http://example.com/ns1"));
        let child = Element::new("child")
            .set_namespace(Namespace::new("http://example.com/ns2"))
            .add_child(grandchild);
        let root = Element::new("root")
            .add_namespace_declaration("http://example.com/ns1", Some("ns1"))
            .add_namespace_declaration("http://example.com/ns2", Some("ns2"))
            .add_child(child);

        let xml_string = Builder::new(None, root).to_xml_string().unwrap();
        assert!(xml_string.contains("<ns2:child><ns1:grandchild/></ns2:child>"));
    }

    #[test]
    fn test_default_namespace_has_no_prefix() {
        let element = Element::new("root")
            .set_namespace(Namespace::new("http://example.com/default"))
            .add_namespace_declaration("http://example.com/default", None);

        let xml_string = Builder::new(None, element).to_xml_string().unwrap();
        assert_eq!(xml_string, r#"<root xmlns="http://example.com/default"/>"#);
    }

    #[test]
    fn test_undeclared_namespace_is_an_error() {
        let element = Element::new("root").set_namespace(Namespace::new("urn:missing"));
        let err = Builder::new(None, element).to_xml_string().unwrap_err();
        assert!(matches!(err, XmlBuilderError::NamespaceNotDeclared { .. }));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let element = Element::new("test")
            .add_attribute(Attribute::new("q", r#"a "b" & <c>"#))
            .set_text("SELECT * FROM Win32_Service WHERE Name = 'x' & <y>");

        let xml_string = Builder::new(None, element).to_xml_string().unwrap();
        assert_eq!(
            xml_string,
            r#"<test q="a &quot;b&quot; &amp; &lt;c>">SELECT * FROM Win32_Service WHERE Name = 'x' &amp; &lt;y&gt;</test>"#
        );
    }

    #[test]
    fn test_namespaced_attribute() {
        let attr = Attribute::new("mustUnderstand", "true").set_namespace("urn:soap");
        let element = Element::new("Action")
            .add_namespace_declaration("urn:soap", Some("s"))
            .add_attribute(attr);

        let xml_string = Builder::new(None, element).to_xml_string().unwrap();
        assert_eq!(
            xml_string,
            r#"<Action xmlns:s="urn:soap" s:mustUnderstand="true"/>"#
        );
    }
}
