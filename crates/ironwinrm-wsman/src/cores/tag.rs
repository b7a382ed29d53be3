use ironwinrm_xml::builder::Element;

use super::attribute::Attribute;
use super::namespace::Namespace;
use super::tag_name::TagName;
use super::tag_value::TagValue;

#[derive(Debug, Clone)]
pub struct Tag<'a, V, N>
where
    V: TagValue<'a>,
    N: TagName,
{
    pub value: V,
    pub attributes: Vec<Attribute<'a>>,
    /// Namespaces declared on this tag, e.g. the default namespace of `creationXml`.
    pub namespaces_declaration: Vec<Namespace>,

    __phantom: std::marker::PhantomData<&'a V>,
    __phantom_name: std::marker::PhantomData<N>,
}

pub struct TagNameHolder<N>
where
    N: TagName,
{
    _name: N,
}

impl<N> TagNameHolder<N>
where
    N: TagName,
{
    pub fn with_value<'a, V>(self, value: V) -> Tag<'a, V, N>
    where
        V: TagValue<'a>,
    {
        Tag::new(value)
    }
}

impl<N> Tag<'static, (), N>
where
    N: TagName,
{
    /// Names the tag first so the value type can be inferred from `with_value`.
    pub fn from_name(name: N) -> TagNameHolder<N> {
        TagNameHolder { _name: name }
    }
}

impl<'a, V, N> Tag<'a, V, N>
where
    V: TagValue<'a>,
    N: TagName,
{
    pub fn new(value: impl Into<V>) -> Self {
        Self {
            value: value.into(),
            attributes: Vec::new(),
            namespaces_declaration: Vec::new(),
            __phantom: std::marker::PhantomData,
            __phantom_name: std::marker::PhantomData,
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute<'a>) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_declaration(mut self, declaration: Namespace) -> Self {
        self.namespaces_declaration.push(declaration);
        self
    }

    pub fn into_element(self) -> Element<'a> {
        let mut element = Element::new(N::TAG_NAME);
        if let Some(ns) = N::NAMESPACE {
            element = element.set_namespace(ns.uri());
        }

        for namespace in self.namespaces_declaration {
            let (url, alias) = namespace.as_tuple();
            element = element.add_namespace_declaration(url, alias);
        }

        for attribute in self.attributes {
            element = element.add_attribute(attribute.into());
        }

        self.value.append_to_element(element)
    }

    pub fn name(&self) -> &'static str {
        N::TAG_NAME
    }
}
