//! Streaming HTTP client for a local OpenAI-compatible chat server
//!
//! The reply arrives as newline-delimited JSON chunks, each carrying
//! `choices[..].delta.content` and a terminal `finish_reason: "stop"`.
//! A reader task forwards the deltas over an mpsc channel so the
//! pipeline never touches the socket directly.

use std::time::Duration;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{DeltaStream, GenerationEvent, LlmBackend, LlmError, Result};

/// Buffered deltas before the reader backpressures on the consumer.
const STREAM_BUFFER: usize = 64;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    enable_thinking: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<DeltaContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeltaContent {
    #[serde(default)]
    content: Option<String>,
}

/// Client for a locally hosted chat-completion endpoint.
pub struct HttpLlmClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl HttpLlmClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
        })
    }
}

#[async_trait::async_trait]
impl LlmBackend for HttpLlmClient {
    async fn begin_stream(&self, utterance: &str) -> Result<DeltaStream> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: utterance,
            }],
            stream: true,
            enable_thinking: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(read_stream(response, tx));
        Ok(rx)
    }
}

/// Drain the response body line by line, forwarding deltas.
///
/// Malformed lines are skipped. A transport error or a body that ends
/// without `finish_reason: "stop"` closes the channel without
/// `Finished`, which the consumer surfaces as a turn abort.
async fn read_stream(response: reqwest::Response, tx: mpsc::Sender<GenerationEvent>) {
    let mut body = response.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();

    while let Some(chunk) = body.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Generation stream transport error: {}", e);
                return;
            }
        };
        buf.extend_from_slice(&bytes);

        while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buf.drain(..=pos).collect();
            match parse_line(&line) {
                LineEvent::Delta(content) => {
                    if tx.send(GenerationEvent::Delta(content)).await.is_err() {
                        // Consumer went away (turn cancelled)
                        return;
                    }
                }
                LineEvent::Finished => {
                    let _ = tx.send(GenerationEvent::Finished).await;
                    return;
                }
                LineEvent::Skip => {}
            }
        }
    }

    tracing::warn!("Generation stream closed without a finish marker");
}

enum LineEvent {
    Delta(String),
    Finished,
    Skip,
}

fn parse_line(raw: &[u8]) -> LineEvent {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    // Tolerate SSE framing from servers that prefix `data: `
    let line = line.strip_prefix("data: ").unwrap_or(line);
    if line.is_empty() {
        return LineEvent::Skip;
    }
    if line == "[DONE]" {
        return LineEvent::Finished;
    }

    let chunk: StreamChunk = match serde_json::from_str(line) {
        Ok(chunk) => chunk,
        Err(_) => return LineEvent::Skip,
    };
    let Some(choice) = chunk.choices.last() else {
        return LineEvent::Skip;
    };
    if choice.finish_reason.as_deref() == Some("stop") {
        return LineEvent::Finished;
    }
    match choice.delta.as_ref().and_then(|d| d.content.clone()) {
        Some(content) if !content.is_empty() => LineEvent::Delta(content),
        _ => LineEvent::Skip,
    }
}
