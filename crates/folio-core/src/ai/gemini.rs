use std::collections::VecDeque;
use std::time::Duration;

use futures_util::{stream, Stream, StreamExt, TryStreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatRequest, FragmentStream, ModelProvider};
use crate::config::{Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::ChatError;

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Default)]
struct ChunkPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChunkContent {
    #[serde(default)]
    parts: Vec<ChunkPart>,
}

#[derive(Deserialize)]
struct ChunkCandidate {
    #[serde(default)]
    content: Option<ChunkContent>,
}

#[derive(Deserialize)]
struct ChunkError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct GeminiChunk {
    #[serde(default)]
    candidates: Vec<ChunkCandidate>,
    #[serde(default)]
    error: Option<ChunkError>,
}

impl GeminiChunk {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Client for the configured key, or None when no key is available
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.api_key()?;
        Some(
            Self::new(&api_key)
                .with_base_url(config.base_url())
                .with_timeout(config.request_timeout()),
        )
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Limit on waiting for response headers, and on the gap between body
    /// chunks. A reply that keeps arriving is never cut off.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        )
    }

    async fn open_stream(&self, request: &ChatRequest) -> Result<reqwest::Response, ChatError> {
        let mut contents: Vec<GeminiContent> = request
            .history
            .iter()
            .map(|turn| GeminiContent {
                role: Some(turn.role.as_wire().to_string()),
                parts: vec![GeminiPart { text: turn.text.clone() }],
            })
            .collect();
        contents.push(GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart { text: request.message.clone() }],
        });

        let body = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: request.system_instruction.clone() }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        };

        debug!(model = %request.model, turns = request.history.len(), "opening gemini stream");

        let pending = self
            .client
            .post(self.stream_url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send();
        let response = tokio::time::timeout(self.timeout, pending)
            .await
            .map_err(|_| {
                ChatError::Transport(format!("no response within {}s", self.timeout.as_secs()))
            })??;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Provider {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(response)
    }
}

impl ModelProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn stream_reply(&self, request: ChatRequest) -> FragmentStream {
        let client = self.clone();
        let idle = self.timeout;
        let opened = async move { client.open_stream(&request).await };

        stream::once(opened)
            .map_ok(move |response| decode_sse(response.bytes_stream(), idle))
            .try_flatten()
            .boxed()
    }
}

/// Incremental decoder for `data:` lines. Network chunks may end mid-line
/// (or mid-codepoint), so bytes are buffered until a newline arrives.
/// A failing line stops decoding; fragments parsed before it are still
/// yielded first.
#[derive(Default)]
struct SseDecoder {
    buffer: Vec<u8>,
    ready: VecDeque<String>,
    error: Option<ChatError>,
}

impl SseDecoder {
    fn feed(&mut self, chunk: &[u8]) {
        if self.error.is_some() {
            return;
        }
        self.buffer.extend_from_slice(chunk);
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Err(e) = self.parse_line(&line) {
                self.error = Some(e);
                self.buffer.clear();
                return;
            }
        }
    }

    fn finish(&mut self) {
        if self.buffer.is_empty() || self.error.is_some() {
            return;
        }
        let line = std::mem::take(&mut self.buffer);
        if let Err(e) = self.parse_line(&line) {
            self.error = Some(e);
        }
    }

    fn parse_line(&mut self, raw: &[u8]) -> Result<(), ChatError> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\r', '\n']);

        let Some(data) = line.strip_prefix("data:") else {
            return Ok(());
        };
        let data = data.trim_start();
        if data.is_empty() || data == "[DONE]" {
            return Ok(());
        }

        let chunk: GeminiChunk = serde_json::from_str(data)
            .map_err(|e| ChatError::Transport(format!("malformed stream chunk: {}", e)))?;

        if let Some(err) = chunk.error {
            return Err(ChatError::Provider {
                status: err.code,
                message: err.message,
            });
        }

        let text = chunk.text();
        if !text.is_empty() {
            self.ready.push_back(text);
        }
        Ok(())
    }
}

/// Turn an SSE byte stream into reply fragments. A body that goes quiet for
/// longer than `idle` ends the stream with a transport error.
fn decode_sse<S, B, E>(
    body: S,
    idle: Duration,
) -> impl Stream<Item = Result<String, ChatError>> + Send + 'static
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<ChatError> + Send,
{
    let initial = Some((Box::pin(body.fuse()), SseDecoder::default()));

    stream::unfold(initial, move |state| async move {
        let (mut body, mut decoder) = state?;
        loop {
            if let Some(text) = decoder.ready.pop_front() {
                return Some((Ok(text), Some((body, decoder))));
            }
            if let Some(e) = decoder.error.take() {
                return Some((Err(e), None));
            }
            let Ok(next) = tokio::time::timeout(idle, body.next()).await else {
                let msg = format!("stream idle for {}s", idle.as_secs());
                return Some((Err(ChatError::Transport(msg)), None));
            };
            match next {
                Some(Ok(chunk)) => decoder.feed(chunk.as_ref()),
                Some(Err(e)) => return Some((Err(e.into()), None)),
                None => {
                    decoder.finish();
                    if decoder.ready.is_empty() && decoder.error.is_none() {
                        return None;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(chunks: Vec<Result<&'static str, ChatError>>) -> Vec<Result<String, ChatError>> {
        decode_sse(stream::iter(chunks), Duration::from_secs(5)).collect().await
    }

    fn data(text: &str) -> String {
        format!(
            "data: {{\"candidates\":[{{\"content\":{{\"role\":\"model\",\"parts\":[{{\"text\":\"{}\"}}]}}}}]}}\n\n",
            text
        )
    }

    #[tokio::test]
    async fn test_decodes_fragments_in_order() {
        let body: &'static str = Box::leak(format!("{}{}{}", data("Hel"), data("lo"), data(" world")).into_boxed_str());
        let out = collect(vec![Ok(body)]).await;
        let texts: Vec<String> = out.into_iter().map(Result::unwrap).collect();
        assert_eq!(texts, vec!["Hel", "lo", " world"]);
    }

    #[tokio::test]
    async fn test_line_split_across_chunks() {
        let line: &'static str = Box::leak(data("split").into_boxed_str());
        let (a, b) = line.split_at(17);
        let out = collect(vec![Ok(a), Ok(b)]).await;
        assert_eq!(out, vec![Ok("split".to_string())]);
    }

    #[tokio::test]
    async fn test_multi_part_candidate_is_joined() {
        let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"a\"},{\"text\":\"b\"}]}}]}\n";
        let out = collect(vec![Ok(body)]).await;
        assert_eq!(out, vec![Ok("ab".to_string())]);
    }

    #[tokio::test]
    async fn test_skips_empty_and_non_data_lines() {
        let body = ": keepalive\n\
                    event: message\n\
                    data: {\"candidates\":[{\"content\":{\"parts\":[]}}]}\n\
                    data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"ok\"}]}}]}\n";
        let out = collect(vec![Ok(body)]).await;
        assert_eq!(out, vec![Ok("ok".to_string())]);
    }

    #[tokio::test]
    async fn test_trailing_line_without_newline() {
        let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"tail\"}]}}]}";
        let out = collect(vec![Ok(body)]).await;
        assert_eq!(out, vec![Ok("tail".to_string())]);
    }

    #[tokio::test]
    async fn test_error_payload_ends_stream() {
        let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"partial\"}]}}]}\n\
                    data: {\"error\":{\"code\":429,\"message\":\"quota exceeded\"}}\n\
                    data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"never\"}]}}]}\n";
        let out = collect(vec![Ok(body)]).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Ok("partial".to_string()));
        assert_eq!(
            out[1],
            Err(ChatError::Provider { status: 429, message: "quota exceeded".to_string() })
        );
    }

    #[tokio::test]
    async fn test_body_error_becomes_terminal() {
        let first: &'static str = Box::leak(data("one").into_boxed_str());
        let out = collect(vec![
            Ok(first),
            Err(ChatError::Transport("connection reset".to_string())),
            Ok("data: ignored\n"),
        ])
        .await;
        assert_eq!(out.len(), 2);
        assert!(matches!(out[1], Err(ChatError::Transport(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_transport_error() {
        let out = collect(vec![Ok("data: {not json}\n")]).await;
        assert!(matches!(out.as_slice(), [Err(ChatError::Transport(_))]));
    }

    #[tokio::test]
    async fn test_idle_body_ends_with_transport_error() {
        let first: &'static str = Box::leak(data("slow").into_boxed_str());
        let body = stream::iter(vec![Ok::<_, ChatError>(first)]).chain(stream::pending());
        let out: Vec<_> = decode_sse(body, Duration::from_millis(50)).collect().await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Ok("slow".to_string()));
        assert!(matches!(&out[1], Err(ChatError::Transport(msg)) if msg.contains("idle")));
    }

    #[tokio::test]
    async fn test_steady_stream_outlives_idle_limit() {
        // Five chunks 30ms apart: 150ms total against a 100ms idle limit
        let lines: Vec<&'static str> = (0..5)
            .map(|i| &*Box::leak(data(&i.to_string()).into_boxed_str()))
            .collect();
        let body = stream::iter(lines).then(|line| async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok::<_, ChatError>(line)
        });
        let out: Vec<_> = decode_sse(body, Duration::from_millis(100)).collect().await;
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(Result::is_ok));
    }

    #[test]
    fn test_stream_url() {
        let client = GeminiClient::new("k").with_base_url("http://localhost:9999/");
        assert_eq!(
            client.stream_url("gemini-3-flash-preview"),
            "http://localhost:9999/v1beta/models/gemini-3-flash-preview:streamGenerateContent?alt=sse"
        );
    }
}
