// The `gmail` module implements the `Mailbox` seam on top of the Gmail API.

use super::{Header, Mailbox, MailboxError, MessagePage, MessageRef, RawMessage, RawPart};
use crate::utils::google_auth::{AuthError, GmailHubType, GoogleAuthConfig, gmail_auth};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use google_gmail1::api::{Message, MessagePart, Scope};
use tracing::debug;

const USER_ID: &str = "me";

/// Deleting messages requires the full mailbox scope (`https://mail.google.com/`).
const MAILBOX_SCOPE: Scope = Scope::Gmai;

/// A builder for [`GmailMailbox`].
pub struct GmailMailboxBuilder {
    conf: GoogleAuthConfig,
}

impl GmailMailboxBuilder {
    /// Creates a new `GmailMailboxBuilder`.
    ///
    /// # Arguments
    ///
    /// * `conf` - Where the OAuth client secret and token cache live.
    pub fn new(conf: GoogleAuthConfig) -> Self {
        Self { conf }
    }

    /// Authenticates with the Gmail API and builds a [`GmailMailbox`].
    pub async fn build(&self) -> Result<GmailMailbox, AuthError> {
        let hub = gmail_auth(self.conf.clone(), &[MAILBOX_SCOPE]).await?;
        Ok(GmailMailbox { hub })
    }
}

/// A [`Mailbox`] backed by the authenticated user's Gmail account.
#[derive(Clone)]
pub struct GmailMailbox {
    hub: GmailHubType,
}

impl GmailMailbox {
    pub fn new(hub: GmailHubType) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl Mailbox for GmailMailbox {
    async fn list_messages(
        &self,
        label: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage, MailboxError> {
        let mut call = self
            .hub
            .users()
            .messages_list(USER_ID)
            .add_label_ids(label);

        if let Some(token) = page_token {
            call = call.page_token(token);
        }

        let (_, response) = call
            .add_scope(MAILBOX_SCOPE)
            .doit()
            .await
            .map_err(|e| MailboxError::List(e.to_string()))?;

        let messages = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| {
                let id = m.id?;
                Some(MessageRef {
                    id,
                    thread_id: m.thread_id,
                })
            })
            .collect();

        Ok(MessagePage {
            messages,
            next_token: response.next_page_token,
        })
    }

    async fn get_message(&self, id: &str) -> Result<RawMessage, MailboxError> {
        let (_, message) = self
            .hub
            .users()
            .messages_get(USER_ID, id)
            .format("full")
            .add_scope(MAILBOX_SCOPE)
            .doit()
            .await
            .map_err(|e| MailboxError::Get {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        debug!(message_id = %id, "Fetched full message");
        Ok(raw_message(message))
    }

    async fn delete_message(&self, id: &str) -> Result<(), MailboxError> {
        self.hub
            .users()
            .messages_delete(USER_ID, id)
            .add_scope(MAILBOX_SCOPE)
            .doit()
            .await
            .map_err(|e| MailboxError::Delete {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

fn raw_message(message: Message) -> RawMessage {
    RawMessage {
        label_ids: message.label_ids.unwrap_or_default(),
        payload: message.payload.map(raw_part),
    }
}

fn raw_part(part: MessagePart) -> RawPart {
    let headers = part
        .headers
        .unwrap_or_default()
        .into_iter()
        .filter_map(|h| Some(Header::new(h.name?, h.value.unwrap_or_default())))
        .collect();

    // The client library hands body data back already decoded; restore the
    // base64url wire form so the pipeline decodes every payload the same way.
    let body = part
        .body
        .and_then(|b| b.data)
        .map(|data| URL_SAFE.encode(data).into_bytes());

    RawPart {
        mime_type: part.mime_type,
        headers,
        body,
        parts: part
            .parts
            .unwrap_or_default()
            .into_iter()
            .map(raw_part)
            .collect(),
    }
}
