pub use roxmltree::*;

use tracing::trace;

pub fn parse(xml: &str) -> Result<Document<'_>, crate::XmlError> {
    trace!(length = xml.len(), "parsing xml document");
    Ok(roxmltree::Document::parse(xml)?)
}

/// Depth-first search for the first element below `node` with the given local name.
pub fn find_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    local_name: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
}

pub fn find_descendants<'a, 'input>(
    node: Node<'a, 'input>,
    local_name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a
where
    'input: 'a,
{
    node.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == local_name)
}

pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(Node::is_element)
}
