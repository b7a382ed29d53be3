use std::borrow::Cow;

use crate::builder::escape::escape_attribute;

/// Represents an XML attribute with a name and value.
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    name: &'a str,
    value: Cow<'a, str>,
    namespace: Option<crate::builder::Namespace<'a>>,
}

impl<'a> Attribute<'a> {
    /// Creates a new instance of `Attribute`.
    ///
    /// # Example
    ///
    /// ```
    /// use ironwinrm_xml::builder::Attribute;
    /// let attribute = Attribute::new("name", "value");
    /// assert_eq!(attribute.value(), "value");
    /// ```
    pub fn new(name: &'a str, value: impl Into<Cow<'a, str>>) -> Self {
        Attribute {
            name,
            value: value.into(),
            namespace: None,
        }
    }

    pub fn set_namespace(mut self, namespace: impl Into<crate::builder::Namespace<'a>>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl<'a> crate::builder::NamespaceWrite<'a> for Attribute<'a> {
    fn ns_write<W: std::io::Write>(
        &self,
        w: &mut W,
        alias_map: &crate::builder::AliasMap<'a>,
    ) -> Result<(), crate::builder::XmlBuilderError> {
        let value = escape_attribute(&self.value);

        let Some(namespace) = &self.namespace else {
            write!(w, r#" {}="{}""#, self.name, value)?;
            return Ok(());
        };

        match alias_map.get(namespace) {
            Some(Some(alias)) => write!(w, r#" {alias}:{}="{}""#, self.name, value)?,
            // unprefixed attributes never inherit the default namespace
            Some(None) | None => {
                return Err(
                    crate::builder::XmlBuilderError::AttributeNamespaceNotDeclared {
                        attr: self.name.to_string(),
                        ns: namespace.url.to_string(),
                    },
                );
            }
        }
        Ok(())
    }
}
