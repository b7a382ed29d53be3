use tracing::trace;

use crate::cores::{
    Attribute, DataLocale, Locale, MaxEnvelopeSize, OperationTimeout, SessionId, Time, WsUuid,
};
use crate::soap::{HeaderElement, HeaderSet};
use crate::ws_addressing;

/// Headers shared by every request of one session.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct WsManHeaders<'a> {
    pub to: &'a str,
    pub session_id: uuid::Uuid,
    #[builder(default = 153_600)]
    pub max_envelope_size: u32,
    /// Seconds.
    #[builder(default = 60)]
    pub operation_timeout: u64,
    #[builder(default = "en-US")]
    pub locale: &'a str,
}

impl<'a> WsManHeaders<'a> {
    /// The shared header set with a freshly generated `MessageID`.
    pub fn header_set(&self) -> HeaderSet<'a> {
        self.header_set_with_message_id(uuid::Uuid::new_v4())
    }

    pub fn header_set_with_message_id(&self, message_id: uuid::Uuid) -> HeaderSet<'a> {
        trace!(message_id = %message_id, "assembling session headers");

        HeaderSet::new()
            .with(ws_addressing::to(self.to))
            .with(ws_addressing::reply_to_anonymous())
            .with(
                HeaderElement::new(MaxEnvelopeSize)
                    .with_attribute(Attribute::MustUnderstand(true))
                    .with_text(self.max_envelope_size.to_string()),
            )
            .with(ws_addressing::message_id(message_id))
            .with(
                HeaderElement::new(SessionId)
                    .with_attribute(Attribute::MustUnderstand(false))
                    .with_text(WsUuid(self.session_id).to_string()),
            )
            .with(
                HeaderElement::new(Locale)
                    .with_attribute(Attribute::MustUnderstand(false))
                    .with_attribute(Attribute::XmlLang(self.locale.into())),
            )
            .with(
                HeaderElement::new(DataLocale)
                    .with_attribute(Attribute::MustUnderstand(false))
                    .with_attribute(Attribute::XmlLang(self.locale.into())),
            )
            .with(
                HeaderElement::new(OperationTimeout)
                    .with_text(Time(self.operation_timeout).to_string()),
            )
    }
}
