//! Wire types for OpenAI-compatible chat completion endpoints.

use serde::{Deserialize, Serialize};
use wikitruth_core::{ChatMessage, CompletionRequest, CompletionResponse};

/// Outgoing chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Option<String>,
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Chat completion response body. Only the fields the pipeline reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// Response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

pub fn to_message(message: &ChatMessage) -> Message {
    Message { role: message.role.as_str().to_string(), content: Some(message.content.clone()) }
}

pub fn build_request(model: &str, request: &CompletionRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: request.messages.iter().map(to_message).collect(),
        temperature: Some(request.params.temperature),
        max_tokens: Some(request.params.max_tokens),
    }
}

/// Take the first choice's message content. Absent content stays `None` so
/// the executor can classify it as an empty reply.
pub fn from_response(response: ChatCompletionResponse) -> CompletionResponse {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    CompletionResponse { content, model: response.model }
}
