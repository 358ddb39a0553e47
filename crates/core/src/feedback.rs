use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, GREETING, Sender};

/// Shown in place of a reply when the service answers without usable text.
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, I couldn't come up with a response for that.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequestBody<'a> {
    teacher_text: &'a str,
    slide_index: usize,
    slide_url: &'a str,
}

/// Response body of the feedback service. The field is optional on the
/// wire; blank text is treated the same as an absent field.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReply {
    #[serde(default)]
    pub student_feedback: Option<String>,
}

// The trait mirrors the teacher-facing contract of the remote service: one
// question, scoped to one slide asset, one reply. Mocked in tests so turns
// can be exercised without a network.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait FeedbackService {
    async fn request_feedback(
        &self,
        question: &str,
        slide_index: usize,
        slide_url: &str,
    ) -> Result<FeedbackReply>;
}

/// reqwest-backed client for the remote feedback service.
pub struct HttpFeedbackClient {
    client: Client,
    endpoint: String,
}

impl HttpFeedbackClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl FeedbackService for HttpFeedbackClient {
    async fn request_feedback(
        &self,
        question: &str,
        slide_index: usize,
        slide_url: &str,
    ) -> Result<FeedbackReply> {
        let body = FeedbackRequestBody {
            teacher_text: question,
            slide_index,
            slide_url,
        };
        let reply = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<FeedbackReply>()
            .await?;
        Ok(reply)
    }
}

/// One question captured together with the slide context current at the
/// moment it was submitted, so a late-arriving reply cannot be
/// misattributed after the user navigates away.
#[derive(Debug, Clone)]
pub struct PendingFeedbackRequest {
    pub slide_index_at_send: usize,
    pub remote_id_at_send: Option<String>,
    pub question_text: String,
}

/// Serializes question/answer turns against the feedback service and owns
/// the ordered chat log. Turns queue in FIFO order and at most one request
/// is in flight at a time, so the log always matches submission order and
/// the loading flag means "exactly one outstanding turn".
pub struct FeedbackExchange {
    messages: Vec<ChatMessage>,
    next_message_id: u64,
    pending: VecDeque<PendingFeedbackRequest>,
    loading: bool,
}

impl FeedbackExchange {
    pub fn new() -> Self {
        let mut exchange = Self {
            messages: Vec::new(),
            next_message_id: 1,
            pending: VecDeque::new(),
            loading: false,
        };
        exchange.append(Sender::Assistant, GREETING.to_string());
        exchange
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn append(&mut self, sender: Sender, text: String) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(ChatMessage { id, sender, text });
    }

    /// Records a question and queues it for dispatch. The user message is
    /// appended immediately; blank input is dropped without touching the
    /// log. Returns whether a turn was queued.
    pub fn submit(
        &mut self,
        text: &str,
        slide_index_at_send: usize,
        remote_id_at_send: Option<String>,
    ) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.append(Sender::User, trimmed.to_string());
        self.pending.push_back(PendingFeedbackRequest {
            slide_index_at_send,
            remote_id_at_send,
            question_text: trimmed.to_string(),
        });
        true
    }

    /// Drains queued turns in FIFO order, dispatching each strictly after
    /// the previous turn's cleanup.
    pub async fn process_pending<S>(&mut self, service: &S)
    where
        S: FeedbackService + Send + Sync,
    {
        while let Some(request) = self.pending.pop_front() {
            self.run_turn(service, request).await;
        }
    }

    async fn run_turn<S>(&mut self, service: &S, request: PendingFeedbackRequest)
    where
        S: FeedbackService + Send + Sync,
    {
        // A slide without a remote identifier cannot be referenced by the
        // service; the turn ends with no assistant reply.
        let Some(slide_url) = request.remote_id_at_send else {
            tracing::warn!(
                "slide {} has no remote identifier; dropping feedback turn",
                request.slide_index_at_send
            );
            return;
        };

        self.loading = true;
        match service
            .request_feedback(&request.question_text, request.slide_index_at_send, &slide_url)
            .await
        {
            Ok(reply) => {
                let text = reply
                    .student_feedback
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string());
                self.append(Sender::Assistant, text);
            }
            Err(e) => {
                // The turn ends silently for the user.
                tracing::warn!("feedback request failed: {e:?}");
            }
        }
        self.loading = false;
    }
}

impl Default for FeedbackExchange {
    fn default() -> Self {
        Self::new()
    }
}
