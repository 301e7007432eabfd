// Hand-written doubles for the `Mailbox` and `LLM` seams.

use crate::llm::{ChatTurn, LLM, LLMError};
use crate::mailbox::{
    Header, Mailbox, MailboxError, MessagePage, MessageRef, RawMessage, RawPart,
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Encodes text the way the provider ships body data.
pub fn encode(text: &str) -> Vec<u8> {
    URL_SAFE.encode(text).into_bytes()
}

/// A single-part plain-text message in the inbox.
pub fn plain_message(subject: &str, from: &str, body: &str) -> RawMessage {
    RawMessage {
        label_ids: vec!["INBOX".to_string()],
        payload: Some(RawPart {
            mime_type: Some("text/plain".to_string()),
            headers: vec![
                Header::new("Subject", subject),
                Header::new("From", from),
                Header::new("To", "owner@example.com"),
            ],
            body: Some(encode(body)),
            parts: vec![],
        }),
    }
}

pub fn page(ids: &[&str], next_token: Option<&str>) -> MessagePage {
    MessagePage {
        messages: ids.iter().map(|id| MessageRef::new(*id)).collect(),
        next_token: next_token.map(str::to_string),
    }
}

/// A scripted mailbox that records every call.
///
/// List calls consume `pages` in order; once the script runs out (or a
/// scripted entry is `None`) the call fails. Unknown message ids fail to
/// fetch.
#[derive(Default)]
pub struct MockMailbox {
    pages: Mutex<VecDeque<Option<MessagePage>>>,
    messages: HashMap<String, RawMessage>,
    undeletable: HashSet<String>,
    list_calls: Mutex<Vec<(String, Option<String>)>>,
    fetched: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl MockMailbox {
    pub fn with_page(self, page: MessagePage) -> Self {
        self.pages.lock().unwrap().push_back(Some(page));
        self
    }

    pub fn with_failing_page(self) -> Self {
        self.pages.lock().unwrap().push_back(None);
        self
    }

    pub fn with_message(mut self, id: &str, message: RawMessage) -> Self {
        self.messages.insert(id.to_string(), message);
        self
    }

    pub fn with_undeletable(mut self, id: &str) -> Self {
        self.undeletable.insert(id.to_string());
        self
    }

    pub fn list_calls(&self) -> Vec<(String, Option<String>)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailbox for MockMailbox {
    async fn list_messages(
        &self,
        label: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage, MailboxError> {
        self.list_calls
            .lock()
            .unwrap()
            .push((label.to_string(), page_token.map(str::to_string)));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or_else(|| MailboxError::List("scripted failure".to_string()))
    }

    async fn get_message(&self, id: &str) -> Result<RawMessage, MailboxError> {
        self.fetched.lock().unwrap().push(id.to_string());
        self.messages
            .get(id)
            .cloned()
            .ok_or_else(|| MailboxError::Get {
                id: id.to_string(),
                reason: "not found".to_string(),
            })
    }

    async fn delete_message(&self, id: &str) -> Result<(), MailboxError> {
        if self.undeletable.contains(id) {
            return Err(MailboxError::Delete {
                id: id.to_string(),
                reason: "permission denied".to_string(),
            });
        }
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

type Answer = Box<dyn Fn(&ChatTurn) -> Result<String, LLMError> + Send + Sync>;

/// A model that answers through a closure and records every turn it sees.
pub struct MockLLM {
    answer: Answer,
    turns: Arc<Mutex<Vec<ChatTurn>>>,
}

impl MockLLM {
    pub fn new(answer: impl Fn(&ChatTurn) -> Result<String, LLMError> + Send + Sync + 'static) -> Self {
        Self {
            answer: Box::new(answer),
            turns: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answers with `text`.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Always fails as if the provider were unreachable.
    pub fn failing() -> Self {
        Self::new(|_| Err(LLMError::PromptError("connection reset".to_string())))
    }

    /// A handle on the recorded turns that outlives the boxed model.
    pub fn turns(&self) -> Arc<Mutex<Vec<ChatTurn>>> {
        self.turns.clone()
    }
}

#[async_trait]
impl LLM for MockLLM {
    async fn prompt(&self, turn: ChatTurn) -> Result<String, LLMError> {
        let answer = (self.answer)(&turn);
        self.turns.lock().unwrap().push(turn);
        answer
    }
}
