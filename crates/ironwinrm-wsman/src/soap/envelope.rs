use ironwinrm_xml::builder::{Builder, Declaration, Element};
use tracing::trace;

use crate::WsManError;
use crate::cores::{Body, ENVELOPE_NAMESPACES, Envelope, Header, TagName};
use crate::soap::header::HeaderSet;

fn soap_element<'a, N: TagName>(_name: N) -> Element<'a> {
    Element::new(N::TAG_NAME).set_namespace_optional(N::NAMESPACE.map(|ns| ns.uri()))
}

/// Assembles a SOAP 1.2 envelope.
///
/// Header fragments are merged left to right with [`HeaderSet::merge_all`]; the body is
/// written as the single child of `s:Body`, or `s:Body` is left empty.
pub fn build_envelope<'a>(
    header_fragments: impl IntoIterator<Item = HeaderSet<'a>>,
    body: Option<Element<'a>>,
) -> Result<String, WsManError> {
    let headers = HeaderSet::merge_all(header_fragments);
    trace!(header_count = headers.len(), "building envelope");

    let header = soap_element(Header).add_children(headers.into_elements());

    let mut soap_body = soap_element(Body);
    if let Some(body) = body {
        soap_body = soap_body.add_child(body);
    }

    let mut envelope = soap_element(Envelope);
    for namespace in ENVELOPE_NAMESPACES {
        let (url, alias) = namespace.as_tuple();
        envelope = envelope.add_namespace_declaration(url, alias);
    }
    let envelope = envelope.add_child(header).add_child(soap_body);

    let xml = Builder::new(Some(Declaration::new("1.0", "UTF-8")), envelope).to_xml_string()?;
    Ok(xml)
}
