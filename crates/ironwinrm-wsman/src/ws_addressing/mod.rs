use crate::cores::{Address, Attribute, MessageID, ReplyTo, To, WsUuid};
use crate::soap::HeaderElement;

pub const ANONYMOUS_ROLE_URI: &str =
    "http://schemas.xmlsoap.org/ws/2004/08/addressing/role/anonymous";

pub fn to(endpoint: &str) -> HeaderElement<'_> {
    HeaderElement::new(To).with_text(endpoint)
}

pub fn reply_to_anonymous() -> HeaderElement<'static> {
    HeaderElement::new(ReplyTo).with_child(
        HeaderElement::new(Address)
            .with_attribute(Attribute::MustUnderstand(true))
            .with_text(ANONYMOUS_ROLE_URI),
    )
}

pub fn message_id(id: uuid::Uuid) -> HeaderElement<'static> {
    HeaderElement::new(MessageID).with_text(WsUuid(id).to_string())
}
