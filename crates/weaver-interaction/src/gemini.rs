//! GeminiGenerator - Direct REST API implementation for Gemini.
//!
//! Calls the Gemini REST API directly without CLI dependency. The API key
//! and model come from the explicit application configuration.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use weaver_core::config::WeaverConfig;
use weaver_core::generate::{DocumentGenerator, GenerationError};
use weaver_core::session::{ChatTurn, MessageRole};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const SYSTEM_INSTRUCTION: &str = r#"You are SiteWeaver, an expert Frontend React & Tailwind CSS engineer.
Your goal is to generate COMPLETE, STANDALONE HTML files based on user requests.

Rules:
1. Return a FULL HTML5 document (<!DOCTYPE html>...</html>).
2. You MUST include the Tailwind CSS CDN in the <head>: <script src="https://cdn.tailwindcss.com"></script>
3. Use Google Fonts (Inter, Space Grotesk) if it makes the design look better.
4. The design must be modern, responsive, and production-ready.
5. Use "https://picsum.photos/800/600" or similar for placeholder images.
6. Return ONLY the HTML code. No markdown formatting.
7. If the user asks for a change, return the COMPLETE updated HTML file, not just the snippet.
8. Ensure high contrast and accessibility best practices."#;

/// Generator implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    /// Creates a generator from the application configuration.
    pub fn new(config: &WeaverConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn send_request(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| GenerationError::Upstream(format!("request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::Upstream(format!("failed to parse response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl DocumentGenerator for GeminiGenerator {
    async fn generate(
        &self,
        instruction: &str,
        current_document: &str,
        history: &[ChatTurn],
    ) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: build_contents(instruction, current_document, history),
            system_instruction: Some(Content {
                role: "system".to_string(),
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            }),
        };

        tracing::debug!(model = %self.model, turns = history.len(), "requesting generation");
        let text = self.send_request(&request).await?;

        let document = strip_code_fences(&text);
        if document.is_empty() {
            return Err(GenerationError::EmptyOutput);
        }
        Ok(document)
    }
}

/// Replays the chat history verbatim, then appends the context-aware
/// prompt for the new instruction.
fn build_contents(instruction: &str, current_document: &str, history: &[ChatTurn]) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|turn| Content {
            role: wire_role(turn.role).to_string(),
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        })
        .collect();

    contents.push(Content {
        role: "user".to_string(),
        parts: vec![Part {
            text: build_prompt(instruction, current_document),
        }],
    });

    contents
}

fn wire_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

/// Builds the final prompt: a fresh description for a new site, or the
/// current code plus the requested change for an update.
fn build_prompt(instruction: &str, current_document: &str) -> String {
    if current_document.trim().is_empty() {
        format!("Create a website based on this description: {instruction}")
    } else {
        format!(
            "This is the current code of the website:\n{current_document}\n\n\
             User Request for updates:\n{instruction}\n\n\
             Please regenerate the FULL HTML code incorporating these changes."
        )
    }
}

/// Removes code-fence markup the model may echo around the document.
fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "")
        .replace("```", "")
        .trim()
        .to_string()
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, GenerationError> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or(GenerationError::EmptyOutput)
}

fn map_http_error(status: StatusCode, body: String) -> GenerationError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    GenerationError::Upstream(format!("HTTP {}: {}", status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```html\n<html></html>\n```"),
            "<html></html>"
        );
        assert_eq!(strip_code_fences("<html></html>"), "<html></html>");
        assert_eq!(strip_code_fences("```\n```"), "");
    }

    #[test]
    fn test_build_prompt_fresh_vs_update() {
        let fresh = build_prompt("a bakery site", "");
        assert!(fresh.starts_with("Create a website based on this description:"));
        assert!(fresh.contains("a bakery site"));

        let update = build_prompt("make the button blue", "<html><body></body></html>");
        assert!(update.contains("current code of the website"));
        assert!(update.contains("make the button blue"));
        assert!(update.contains("<html><body></body></html>"));
    }

    #[test]
    fn test_build_contents_replays_history_in_order() {
        let history = vec![
            ChatTurn::user("a bakery site"),
            ChatTurn::assistant("Here is your initial design!"),
        ];
        let contents = build_contents("make it warmer", "<html></html>", &history);

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].text, "a bakery site");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[2].role, "user");
        assert!(contents[2].parts[0].text.contains("make it warmer"));
    }

    #[test]
    fn test_extract_text_response_takes_last_candidate_text() {
        let response = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(ContentResponse {
                    parts: vec![PartResponse {
                        text: Some("<html></html>".to_string()),
                    }],
                }),
            }]),
        };
        assert_eq!(extract_text_response(response).unwrap(), "<html></html>");
    }

    #[test]
    fn test_extract_text_response_empty_is_error() {
        let response = GenerateContentResponse { candidates: None };
        assert!(matches!(
            extract_text_response(response),
            Err(GenerationError::EmptyOutput)
        ));
    }

    #[test]
    fn test_map_http_error_extracts_message() {
        let body = r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string());
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("RESOURCE_EXHAUSTED"));
        assert!(text.contains("quota exceeded"));
    }
}
