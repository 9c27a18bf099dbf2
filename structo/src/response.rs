//! Response models.
//!
//! Two deliberately unrelated shapes: [`InferenceResponse`] for the
//! single-turn `/api/generate` endpoint and [`ChatResponse`] for the
//! OpenAI-compatible `/api/chat/completions` endpoint. They share
//! nothing beyond both naming a model and carrying timing counters.
//! All are immutable after decode.

use serde::{Deserialize, Serialize};

use structo_core::Message;

/// Reply to a single-turn inference call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InferenceResponse {
    /// Model that produced the reply.
    pub model: String,
    /// Server-side creation timestamp.
    #[serde(default)]
    pub created_at: String,
    /// The generated text.
    pub response: String,
    /// Whether generation finished.
    pub done: bool,
    /// Why generation stopped, when reported.
    #[serde(default)]
    pub done_reason: Option<String>,
    /// Conversation context tokens for follow-up calls.
    #[serde(default)]
    pub context: Option<Vec<i64>>,
    /// Total wall time, nanoseconds.
    #[serde(default)]
    pub total_duration: Option<u64>,
    /// Model load time, nanoseconds.
    #[serde(default)]
    pub load_duration: Option<u64>,
    /// Tokens in the evaluated prompt.
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Prompt evaluation time, nanoseconds.
    #[serde(default)]
    pub prompt_eval_duration: Option<u64>,
    /// Tokens generated.
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Generation time, nanoseconds.
    #[serde(default)]
    pub eval_duration: Option<u64>,
}

/// Reply to a multi-turn chat call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatResponse {
    /// Completion identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Object tag, usually `chat.completion`.
    #[serde(default)]
    pub object: Option<String>,
    /// Unix creation timestamp.
    #[serde(default)]
    pub created: Option<i64>,
    /// Model that produced the reply.
    pub model: String,
    /// Completion choices, usually one.
    pub choices: Vec<Choice>,
    /// Token usage and timing statistics.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// One completion choice in a chat reply.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Choice {
    /// Position within the choice list.
    pub index: u32,
    /// The generated message.
    pub message: Message,
    /// Why generation stopped, when reported.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Usage statistics attached to a chat reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Usage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    /// Tokens in the completion.
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    /// Prompt plus completion tokens.
    #[serde(default)]
    pub total_tokens: Option<u64>,
    /// Total wall time, nanoseconds.
    #[serde(default)]
    pub total_duration: Option<u64>,
    /// Model load time, nanoseconds.
    #[serde(default)]
    pub load_duration: Option<u64>,
    /// Tokens in the evaluated prompt.
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Prompt evaluation time, nanoseconds.
    #[serde(default)]
    pub prompt_eval_duration: Option<u64>,
    /// Tokens generated.
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Generation time, nanoseconds.
    #[serde(default)]
    pub eval_duration: Option<u64>,
}

/// One entry in the model listing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Object tag, usually `model`.
    #[serde(default)]
    pub object: Option<String>,
    /// Unix creation timestamp.
    #[serde(default)]
    pub created: Option<i64>,
    /// Owner reported by the server.
    #[serde(default)]
    pub owned_by: Option<String>,
}

/// Envelope returned by the model-listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ModelList {
    pub data: Vec<ModelInfo>,
}
