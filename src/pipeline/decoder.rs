// The `decoder` module turns a raw mailbox message into the record the oracle reads.

use crate::mailbox::{Header, Mailbox, MessageRef, RawMessage, RawPart};
use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

const PLAIN_TEXT: &str = "text/plain";

/// Accepts base64url with or without trailing padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Message has no payload")]
    MissingPayload,
}

/// The normalized view of one message.
///
/// `body` is always valid text. A record with every field absent and an
/// empty body is what a failed decode produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageData {
    pub subject: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub cc: Option<String>,
    pub labels: Vec<String>,
    pub body: String,
}

impl MessageData {
    /// Builds the record from the provider's full representation.
    pub fn from_raw(raw: RawMessage) -> Result<Self, DecodeError> {
        let payload = raw.payload.ok_or(DecodeError::MissingPayload)?;

        let body = body_payload(&payload)
            .map(|data| normalize_text(&decode_payload(data)))
            .unwrap_or_default();

        Ok(Self {
            subject: header_value(&payload.headers, "Subject"),
            to: header_value(&payload.headers, "To"),
            from: header_value(&payload.headers, "From"),
            cc: header_value(&payload.headers, "Cc"),
            labels: raw.label_ids,
            body,
        })
    }

    /// True for the record a failed decode leaves behind.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// First header whose name matches exactly.
fn header_value(headers: &[Header], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|h| h.name == name)
        .map(|h| h.value.clone())
}

/// Picks the payload that holds the readable body.
///
/// A single-part message uses its own body. Otherwise only the first
/// immediate `text/plain` sub-part is considered, even when it carries no
/// data; later text parts and HTML-only bodies are ignored.
fn body_payload(payload: &RawPart) -> Option<&[u8]> {
    if payload.parts.is_empty() {
        if let Some(data) = payload.body.as_deref() {
            return Some(data);
        }
    }

    payload
        .parts
        .iter()
        .find(|part| part.mime_type.as_deref() == Some(PLAIN_TEXT))
        .and_then(|part| part.body.as_deref())
}

/// Decodes a body payload: base64url first, then standard base64, and
/// finally the payload itself when neither alphabet accepts it.
pub fn decode_payload(data: &[u8]) -> Vec<u8> {
    URL_SAFE_LENIENT
        .decode(data)
        .or_else(|_| STANDARD_LENIENT.decode(data))
        .unwrap_or_else(|_| data.to_vec())
}

/// Converts bytes to text, dropping every invalid UTF-8 sequence.
pub fn normalize_text(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Fetches messages and decodes them, never failing the caller.
pub struct Decoder {
    mailbox: Arc<dyn Mailbox>,
}

impl Decoder {
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self { mailbox }
    }

    /// Returns the decoded record, or an empty one if fetching or parsing fails.
    pub async fn decode(&self, message: &MessageRef) -> MessageData {
        let raw = match self.mailbox.get_message(&message.id).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Failed to fetch email");
                return MessageData::default();
            }
        };

        match MessageData::from_raw(raw) {
            Ok(data) => {
                info!(
                    message_id = %message.id,
                    subject = data.subject.as_deref().unwrap_or_default(),
                    sender = data.from.as_deref().unwrap_or_default(),
                    "Fetched email"
                );
                data
            }
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Failed to parse email data");
                MessageData::default()
            }
        }
    }
}
