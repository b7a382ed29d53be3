use std::borrow::Cow;

use crate::builder::escape::escape_text;
use crate::builder::{AliasMap, Attribute, Namespace, NamespaceWrite, XmlBuilderError};

#[derive(Debug, Clone)]
pub enum Content<'a> {
    /// Represents a text content within an XML element.
    Text(Cow<'a, str>),
    /// Represents a child element within an XML element.
    Elements(Vec<Element<'a>>),

    None,
}

/// Represents an XML element.
#[derive(Debug, Clone)]
pub struct Element<'a> {
    name: &'a str,
    namespace: Option<Namespace<'a>>,
    /// Declarations written on this element, in insertion order.
    namespaces_declaration: Vec<(Namespace<'a>, Option<&'a str>)>,
    attributes: Vec<Attribute<'a>>,
    content: Content<'a>,
}

impl<'a> Element<'a> {
    /// Creates a new instance of `Element` with the given name.
    ///
    /// # Example
    ///
    /// ```
    /// use ironwinrm_xml::builder::Element;
    /// let element = Element::new("root");
    /// assert_eq!(element.name(), "root");
    /// ```
    pub fn new(name: &'a str) -> Self {
        Element {
            name,
            namespace: None,
            namespaces_declaration: Vec::new(),
            attributes: Vec::new(),
            content: Content::None,
        }
    }

    pub fn set_namespace(mut self, namespace: impl Into<Namespace<'a>>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn set_namespace_optional(mut self, namespace: Option<impl Into<Namespace<'a>>>) -> Self {
        self.namespace = namespace.map(Into::into);
        self
    }

    /// Declares `url` on this element, bound to `alias` or as the default namespace.
    pub fn add_namespace_declaration(mut self, url: &'a str, alias: Option<&'a str>) -> Self {
        let namespace = Namespace::new(url);
        self.namespaces_declaration.retain(|(ns, _)| *ns != namespace);
        self.namespaces_declaration.push((namespace, alias));
        self
    }

    pub fn add_attribute(mut self, attribute: Attribute<'a>) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds a child element. Any text content is replaced.
    pub fn add_child(mut self, child: Element<'a>) -> Self {
        match self.content {
            Content::None | Content::Text(_) => {
                self.content = Content::Elements(vec![child]);
            }
            Content::Elements(ref mut children) => {
                children.push(child);
            }
        }
        self
    }

    pub fn add_children(mut self, children: Vec<Element<'a>>) -> Self {
        for child in children {
            self = self.add_child(child);
        }
        self
    }

    /// Sets the text content. Any child elements are replaced.
    pub fn set_text(mut self, text: impl Into<Cow<'a, str>>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn namespace(&self) -> Option<&Namespace<'a>> {
        self.namespace.as_ref()
    }

    pub fn attributes(&self) -> &[Attribute<'a>] {
        &self.attributes
    }

    pub fn content(&self) -> &Content<'a> {
        &self.content
    }
}

impl<'a> NamespaceWrite<'a> for Element<'a> {
    fn ns_write<W: std::io::Write>(
        &self,
        w: &mut W,
        aliases: &AliasMap<'a>,
    ) -> Result<(), XmlBuilderError> {
        let scoped;
        let aliases = if self.namespaces_declaration.is_empty() {
            aliases
        } else {
            let mut extended = aliases.clone();
            extended.extend(self.namespaces_declaration.iter().copied());
            scoped = extended;
            &scoped
        };

        let name = match &self.namespace {
            None => Cow::Borrowed(self.name),
            Some(ns) => match aliases.get(ns) {
                Some(Some(alias)) => Cow::Owned(format!("{alias}:{}", self.name)),
                Some(None) => Cow::Borrowed(self.name),
                None => {
                    return Err(XmlBuilderError::NamespaceNotDeclared {
                        tag: self.name.to_string(),
                        ns: ns.url.to_string(),
                    });
                }
            },
        };

        write!(w, "<{name}")?;

        for (namespace, alias) in &self.namespaces_declaration {
            match alias {
                Some(alias) => write!(w, r#" xmlns:{alias}="{}""#, namespace.url)?,
                None => write!(w, r#" xmlns="{}""#, namespace.url)?,
            }
        }

        for attribute in &self.attributes {
            attribute.ns_write(w, aliases)?;
        }

        match &self.content {
            Content::None => write!(w, "/>")?,
            Content::Text(value) => write!(w, ">{}</{name}>", escape_text(value))?,
            Content::Elements(children) => {
                write!(w, ">")?;
                for child in children {
                    child.ns_write(w, aliases)?;
                }
                write!(w, "</{name}>")?;
            }
        }

        Ok(())
    }
}
