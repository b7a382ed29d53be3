//! Typed SOAP header model.
//!
//! A [`HeaderSet`] is an ordered list of [`HeaderElement`]s. Header fragments produced
//! by independent concerns (addressing, resource selection, options) are combined with
//! [`HeaderSet::merge`]: elements with the same identity are merged in place, their
//! attribute maps deep-merged and their child lists merged recursively.
use std::borrow::Cow;

use ironwinrm_xml::builder::Element;

use crate::cores::{Attribute, Namespace, TagName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue<'a> {
    Empty,
    Text(Cow<'a, str>),
    Children(Vec<HeaderElement<'a>>),
}

/// Identity of a header element: its qualified name plus the `Name` attribute, so that
/// `<w:Option Name="A">` and `<w:Option Name="B">` are distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderKey<'k> {
    pub namespace: Option<Namespace>,
    pub name: &'static str,
    pub discriminator: Option<&'k str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderElement<'a> {
    name: &'static str,
    namespace: Option<Namespace>,
    value: HeaderValue<'a>,
    attributes: Vec<Attribute<'a>>,
}

impl<'a> HeaderElement<'a> {
    pub fn new<N: TagName>(_name: N) -> Self {
        Self {
            name: N::TAG_NAME,
            namespace: N::NAMESPACE,
            value: HeaderValue::Empty,
            attributes: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<Cow<'a, str>>) -> Self {
        self.value = HeaderValue::Text(text.into());
        self
    }

    pub fn with_child(mut self, child: HeaderElement<'a>) -> Self {
        match &mut self.value {
            HeaderValue::Children(children) => merge_into(children, child),
            HeaderValue::Empty | HeaderValue::Text(_) => {
                self.value = HeaderValue::Children(vec![child]);
            }
        }
        self
    }

    /// Sets an attribute, replacing any attribute with the same qualified name.
    pub fn with_attribute(mut self, attribute: Attribute<'a>) -> Self {
        set_attribute(&mut self.attributes, attribute);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn namespace(&self) -> Option<Namespace> {
        self.namespace
    }

    pub fn value(&self) -> &HeaderValue<'a> {
        &self.value
    }

    pub fn attributes(&self) -> &[Attribute<'a>] {
        &self.attributes
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            HeaderValue::Text(text) => Some(text.as_ref()),
            HeaderValue::Empty | HeaderValue::Children(_) => None,
        }
    }

    pub fn children(&self) -> &[HeaderElement<'a>] {
        match &self.value {
            HeaderValue::Children(children) => children,
            HeaderValue::Empty | HeaderValue::Text(_) => &[],
        }
    }

    pub fn key(&self) -> HeaderKey<'_> {
        HeaderKey {
            namespace: self.namespace,
            name: self.name,
            discriminator: self.attributes.iter().find_map(Attribute::as_name),
        }
    }

    /// Folds `other` into `self`. Attributes are merged slot by slot with `other` winning,
    /// children are merged by identity and a non-empty value from `other` replaces ours.
    pub fn merge(&mut self, other: HeaderElement<'a>) {
        for attribute in other.attributes {
            set_attribute(&mut self.attributes, attribute);
        }

        match other.value {
            HeaderValue::Empty => {}
            HeaderValue::Children(children) => match &mut self.value {
                HeaderValue::Children(existing) => {
                    for child in children {
                        merge_into(existing, child);
                    }
                }
                HeaderValue::Empty | HeaderValue::Text(_) => {
                    self.value = HeaderValue::Children(children);
                }
            },
            text @ HeaderValue::Text(_) => self.value = text,
        }
    }

    pub fn into_element(self) -> Element<'a> {
        let mut element =
            Element::new(self.name).set_namespace_optional(self.namespace.map(Namespace::uri));

        for attribute in self.attributes {
            element = element.add_attribute(attribute.into());
        }

        match self.value {
            HeaderValue::Empty => element,
            HeaderValue::Text(text) => element.set_text(text),
            HeaderValue::Children(children) => element.add_children(
                children
                    .into_iter()
                    .map(HeaderElement::into_element)
                    .collect(),
            ),
        }
    }
}

fn set_attribute<'a>(attributes: &mut Vec<Attribute<'a>>, attribute: Attribute<'a>) {
    match attributes.iter_mut().find(|a| a.same_slot(&attribute)) {
        Some(existing) => *existing = attribute,
        None => attributes.push(attribute),
    }
}

fn merge_into<'a>(elements: &mut Vec<HeaderElement<'a>>, element: HeaderElement<'a>) {
    let position = elements.iter().position(|e| e.key() == element.key());
    match position {
        Some(index) => elements[index].merge(element),
        None => elements.push(element),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet<'a> {
    elements: Vec<HeaderElement<'a>>,
}

impl<'a> HeaderSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, element: HeaderElement<'a>) -> Self {
        self.insert(element);
        self
    }

    pub fn insert(&mut self, element: HeaderElement<'a>) {
        merge_into(&mut self.elements, element);
    }

    /// Merges `other` into `self`, left to right.
    pub fn merge(mut self, other: HeaderSet<'a>) -> Self {
        for element in other.elements {
            self.insert(element);
        }
        self
    }

    pub fn merge_all(fragments: impl IntoIterator<Item = HeaderSet<'a>>) -> Self {
        fragments.into_iter().fold(Self::new(), Self::merge)
    }

    pub fn get<N: TagName>(&self, _name: N) -> Option<&HeaderElement<'a>> {
        self.elements
            .iter()
            .find(|e| e.name == N::TAG_NAME && e.namespace == N::NAMESPACE)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderElement<'a>> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_elements(self) -> Vec<Element<'a>> {
        self.elements
            .into_iter()
            .map(HeaderElement::into_element)
            .collect()
    }
}

impl<'a> From<HeaderElement<'a>> for HeaderSet<'a> {
    fn from(element: HeaderElement<'a>) -> Self {
        Self::new().with(element)
    }
}

impl<'a> FromIterator<HeaderElement<'a>> for HeaderSet<'a> {
    fn from_iter<I: IntoIterator<Item = HeaderElement<'a>>>(iter: I) -> Self {
        let mut set = Self::new();
        for element in iter {
            set.insert(element);
        }
        set
    }
}
