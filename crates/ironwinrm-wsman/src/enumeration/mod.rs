//! WS-Enumeration request body for WQL queries and normalization of its response.
mod wql;

pub use wql::*;

use ironwinrm_xml::builder::Element;

use crate::cores::{
    Attribute, Empty, Enumerate, Filter, MaxElements, OptimizeEnumeration, Tag, TagValue, Text,
    U32,
};

pub const WQL_DIALECT: &str = "http://schemas.microsoft.com/wbem/wsman/1/WQL";
pub const MAX_ELEMENTS: u32 = 32000;

#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct EnumerateValue<'a> {
    pub query: &'a str,
    #[builder(default = MAX_ELEMENTS)]
    pub max_elements: u32,
}

impl<'a> EnumerateValue<'a> {
    pub fn into_body(self) -> Element<'a> {
        Tag::from_name(Enumerate).with_value(self).into_element()
    }
}

impl<'a> TagValue<'a> for EnumerateValue<'a> {
    fn append_to_element(self, element: Element<'a>) -> Element<'a> {
        let optimize = Tag::from_name(OptimizeEnumeration).with_value(Empty);
        let max_elements = Tag::from_name(MaxElements).with_value(U32(self.max_elements));
        let filter = Tag::from_name(Filter)
            .with_value(Text::from(self.query))
            .with_attribute(Attribute::Dialect(WQL_DIALECT.into()));

        element
            .add_child(optimize.into_element())
            .add_child(max_elements.into_element())
            .add_child(filter.into_element())
    }
}
