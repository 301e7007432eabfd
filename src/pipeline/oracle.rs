// The `oracle` module asks a language model whether a message is noise worth deleting.

use crate::llm::{ChatTurn, LLM, LLMError};
use crate::pipeline::decoder::MessageData;
use crate::utils::{TEngine, TEngineError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Bodies longer than this many characters are cut before classification.
pub const MAX_BODY_CHARS: usize = 3000;
pub const CLASSIFIER_TEMPERATURE: f64 = 0.0;
/// The answer is a single `True`/`False` token.
pub const CLASSIFIER_MAX_TOKENS: u64 = 1;

const POLICY_TEMPLATE_NAME: &str = "policy";
const FACT_SHEET_TEMPLATE_NAME: &str = "fact_sheet";

const POLICY_TEMPLATE: &str = "\
You help manage the personal (not work) Gmail inbox of a busy person, \
{{first_name}} {{last_name}}, by filtering out promotional email. Above all, \
make sure that email from individual people is never discarded: family members \
(who share the last name {{last_name}}), close acquaintances, and potential \
contacts {{first_name}} might be interested in hearing from. Your job is to tell \
promotional, automated, or mass-sent email apart from personal communication.

Answer \"True\" if the email is promotional and should be discarded according to \
the criteria below, and \"False\" otherwise. Personal communication always takes \
priority; email written by a real person must not be filtered out.

Discard an email when:
- It is promotional: it makes offers, advertises discounts, or markets a product \
or service.
- It is automated: a system or service sent it, not a real person.
- It is mass-sent or comes from a non-essential mailing list: it does not address \
{{first_name}} by name, has no personal context showing it was written for them, \
or comes from a list unrelated to their interests or work.

Exceptions:
- If the email comes from an actual person, especially a family member (same \
last name), a close acquaintance, or a potential contact {{first_name}} might be \
interested in, and its content is personalized one-to-one communication, do not \
discard it, whatever promotional content it contains.
- Do not discard email that asks for action on an important matter, such as a \
request to send a payment. Requests for non-essential actions, like buying \
discounted items or joining a rewards program, may be discarded.

When in doubt whether an email is promotional or personal, answer \"False\".

The message you receive has this format:
Subject: <email subject>
To: <to names, to emails>
From: <from name, from email>
Cc: <cc names, cc emails>
Gmail labels: <labels>
Body: <plain-text body of the email>

Your answer must be exactly:
\"True\" or \"False\"";

const FACT_SHEET_TEMPLATE: &str = "\
Subject: {{subject}}
To: {{to}}
From: {{from}}
Cc: {{cc}}
Gmail labels: {{verbatim labels}}
Body: {{body}}";

/// The `OracleError` enum covers every way a classification can fail before
/// producing an answer.
#[derive(Debug, Error)]
pub enum OracleError {
    /// A prompt could not be rendered.
    #[error("Failed to render classifier prompt: {0}")]
    Template(#[from] TEngineError),
    /// The model call failed.
    #[error(transparent)]
    Model(#[from] LLMError),
}

/// Whose inbox is being triaged. Names are trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerIdentity {
    first_name: String,
    last_name: String,
}

impl OwnerIdentity {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

/// What to do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Promotional, automated or mass-sent.
    Delete,
    Keep,
}

impl Verdict {
    /// Reduces the model's raw answer.
    ///
    /// Only `True`, after trimming surrounding whitespace, means delete. The
    /// match is exact: `true`, `Yes` or anything else keeps the message.
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim() == "True" {
            Verdict::Delete
        } else {
            Verdict::Keep
        }
    }

    pub fn is_delete(self) -> bool {
        self == Verdict::Delete
    }
}

#[derive(Serialize)]
struct FactSheet<'a> {
    subject: Option<&'a str>,
    to: Option<&'a str>,
    from: Option<&'a str>,
    cc: Option<&'a str>,
    labels: &'a [String],
    body: String,
}

/// Cuts `body` to [`MAX_BODY_CHARS`] characters, appending `...` only when
/// something was cut.
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// The classification oracle: a fixed policy, an owner, and a model.
pub struct Oracle {
    llm: Box<dyn LLM>,
    engine: TEngine,
    policy: String,
}

impl Oracle {
    /// Renders the policy for `owner` once; every classification reuses it.
    pub fn new(llm: Box<dyn LLM>, owner: &OwnerIdentity) -> Result<Self, OracleError> {
        let mut engine = TEngine::new();
        engine.register_template_string(POLICY_TEMPLATE_NAME, POLICY_TEMPLATE)?;
        engine.register_template_string(FACT_SHEET_TEMPLATE_NAME, FACT_SHEET_TEMPLATE)?;
        let policy = engine.render(POLICY_TEMPLATE_NAME, owner)?;

        Ok(Self {
            llm,
            engine,
            policy,
        })
    }

    /// The system instruction sent with every message.
    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// The per-message user prompt.
    pub fn fact_sheet(&self, data: &MessageData) -> Result<String, OracleError> {
        let sheet = FactSheet {
            subject: data.subject.as_deref(),
            to: data.to.as_deref(),
            from: data.from.as_deref(),
            cc: data.cc.as_deref(),
            labels: &data.labels,
            body: truncate_body(&data.body),
        };
        Ok(self.engine.render(FACT_SHEET_TEMPLATE_NAME, &sheet)?)
    }

    /// Classifies one message.
    ///
    /// An answer that is neither `True` nor `False` is logged and kept.
    /// Errors are returned to the caller, which must treat them as
    /// [`Verdict::Keep`].
    pub async fn classify(&self, data: &MessageData) -> Result<Verdict, OracleError> {
        let turn = ChatTurn {
            preamble: self.policy.clone(),
            prompt: self.fact_sheet(data)?,
            temperature: CLASSIFIER_TEMPERATURE,
            max_tokens: CLASSIFIER_MAX_TOKENS,
        };

        let answer = self.llm.prompt(turn).await?;
        let trimmed = answer.trim();
        if trimmed != "True" && trimmed != "False" {
            warn!(answer = %answer, "Ambiguous classifier answer, keeping message");
        } else {
            debug!(answer = %trimmed, "Classifier answered");
        }

        Ok(Verdict::from_answer(&answer))
    }
}
