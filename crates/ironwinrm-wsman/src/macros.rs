#[macro_export]
macro_rules! define_custom_tagname {
    ($name:ident, $tagName:expr, $namespace:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl $crate::cores::TagName for $name {
            const TAG_NAME: &'static str = $tagName;
            const NAMESPACE: Option<$crate::cores::Namespace> = $namespace;
        }
    };
}

#[macro_export]
macro_rules! define_tagname {
    ($name:ident, $namespace:expr) => {
        $crate::define_custom_tagname!($name, stringify!($name), $namespace);
    };
}

/// Generates the typed [`Attribute`](crate::cores::Attribute) enum together with its
/// wire name, namespace and value rendering.
#[macro_export]
macro_rules! define_attributes {
    (
        $(
            $variant:ident($type:ty) => ($namespace:expr, $attr_name:literal)
        ),* $(,)?
    ) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Attribute<'a> {
            $(
                $variant($type),
            )*
        }

        impl<'a> Attribute<'a> {
            pub fn attribute_name(&self) -> &'static str {
                match self {
                    $(
                        Attribute::$variant(_) => $attr_name,
                    )*
                }
            }

            pub fn namespace(&self) -> Option<$crate::cores::Namespace> {
                match self {
                    $(
                        Attribute::$variant(_) => $namespace,
                    )*
                }
            }

            pub fn value_string(&self) -> String {
                match self {
                    $(
                        Attribute::$variant(value) => value.to_string(),
                    )*
                }
            }

            /// Two attributes share a slot when they render to the same qualified name.
            pub fn same_slot(&self, other: &Attribute<'_>) -> bool {
                self.attribute_name() == other.attribute_name()
                    && self.namespace() == other.namespace()
            }
        }

        impl<'a> From<Attribute<'a>> for ironwinrm_xml::builder::Attribute<'a> {
            fn from(val: Attribute<'a>) -> Self {
                let attr = ironwinrm_xml::builder::Attribute::new(
                    val.attribute_name(),
                    val.value_string(),
                );
                match val.namespace() {
                    Some(ns) => attr.set_namespace(ns.uri()),
                    None => attr,
                }
            }
        }
    };
}
