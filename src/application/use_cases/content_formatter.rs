use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::application::ChatClient;
use crate::domain::{CoverTitle, DomainError, ThreadSegments, INTENDED_SEGMENT_COUNT};

/// Token replaced by the topic in thread templates.
pub const TOPIC_PLACEHOLDER: &str = "${topic}";

const THREAD_SYSTEM_PROMPT: &str =
    "You are a social-media content creator who excels at writing threads.";

const TITLE_SYSTEM_PROMPT: &str =
    "You are a content packaging expert who writes titles for social-media cover images.";

/// Thread template used when the caller does not supply one.
pub const DEFAULT_THREAD_TEMPLATE: &str = "\
Write a 7-post X (Twitter) thread about \"${topic}\".

Requirements:
1. Number each post as 1/, 2/, 3/ and so on.
2. Use short sentences separated by blank lines to give the text rhythm.
3. Keep a calm, realistic voice with light irony. No slogans, no pep talk.
4. Each post must be at most 220 characters.

Return ONLY a JSON array of 7 strings, one per post. No prose, no markdown, no code fences.";

/// Builds prompts for thread and cover generation and turns model replies
/// into structured results.
///
/// Transport and API failures come back from [`ChatClient`] untouched; a
/// reply that arrives but cannot be used becomes [`DomainError::Format`]
/// carrying the raw text. Callers that only care about presence can `.ok()`
/// the result.
pub struct ContentFormatter {
    client: Arc<dyn ChatClient>,
}

impl ContentFormatter {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    pub fn build_thread_prompt(topic: &str, template: &str) -> String {
        template.replace(TOPIC_PLACEHOLDER, topic)
    }

    pub async fn generate_thread(
        &self,
        topic: &str,
        template: &str,
    ) -> Result<ThreadSegments, DomainError> {
        info!("Generating thread for topic: {}", topic);
        let prompt = Self::build_thread_prompt(topic, template);

        let start_time = Instant::now();
        let reply = self
            .client
            .simple_chat(&prompt, Some(THREAD_SYSTEM_PROMPT))
            .await
            .inspect_err(|e| {
                warn!(
                    "Thread generation for '{}' failed [{}]: {}",
                    topic,
                    e.category(),
                    e
                );
            })?;
        debug!(
            "Thread reply for '{}' received in {:?} ({} chars)",
            topic,
            start_time.elapsed(),
            reply.chars().count()
        );

        let thread = parse_thread_segments(&reply).inspect_err(|e| {
            warn!(
                "Thread reply for '{}' is unusable: {}. Raw reply: {}",
                topic,
                e,
                reply
            );
        })?;

        if !thread.has_intended_length() {
            debug!(
                "Thread for '{}' has {} segments (asked for {})",
                topic,
                thread.len(),
                INTENDED_SEGMENT_COUNT
            );
        }

        Ok(thread)
    }

    pub fn build_title_prompt(thread_text: &str) -> String {
        format!(
            "Based on the thread below, write a pair of titles for its cover image.\n\n\
             Thread:\n{thread_text}\n\n\
             Return ONLY a JSON object in this shape:\n\
             {{\n  \"main_title\": \"at most 12 characters, taken from the core point\",\n  \
             \"subtitle\": \"at most 18 characters, adds tension to the main title\"\n}}"
        )
    }

    /// Ask the model for a cover title derived from an already generated
    /// thread.
    pub async fn extract_cover_title(
        &self,
        thread: &ThreadSegments,
    ) -> Result<CoverTitle, DomainError> {
        let prompt = Self::build_title_prompt(&thread.joined());

        let reply = self
            .client
            .simple_chat(&prompt, Some(TITLE_SYSTEM_PROMPT))
            .await
            .inspect_err(|e| warn!("Cover title request failed [{}]: {}", e.category(), e))?;

        let cleaned = clean_json_response(&reply);
        serde_json::from_str::<CoverTitle>(&cleaned).map_err(|e| {
            warn!("Cover title reply is unusable: {}. Raw reply: {}", e, reply);
            DomainError::format(format!("cover title is not the expected JSON object: {e}"), reply)
        })
    }

    /// Cover image prompt with the titles interpolated. The topic does not
    /// appear in the prompt.
    pub fn build_image_prompt(_topic: &str, main_title: &str, subtitle: &str) -> String {
        format!(
            "Black background, large bold yellow Chinese text: '{main_title}'.\n\
             Below that in smaller white font: '{subtitle}'.\n\
             Center-aligned, minimalist layout, high contrast, 16:9 aspect ratio, \
             suitable for attention-grabbing social media thumbnail."
        )
    }
}

/// Strip markdown code fences (```json ... ```) and surrounding whitespace.
pub fn clean_json_response(text: &str) -> String {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = cleaned.trim_end().strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim().to_string()
}

/// Parse a model reply as a JSON array of strings. Length is not checked.
pub fn parse_thread_segments(text: &str) -> Result<ThreadSegments, DomainError> {
    let cleaned = clean_json_response(text);

    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| DomainError::format(format!("reply is not valid JSON: {e}"), text))?;

    let Value::Array(items) = value else {
        return Err(DomainError::format("reply is JSON but not a list", text));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(segment) => Ok(segment),
            other => Err(DomainError::format(
                format!("segment {} is not a string: {}", i + 1, other),
                text,
            )),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ThreadSegments::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockChatClient;
    use crate::domain::Role;

    fn seven_posts_json() -> String {
        let posts: Vec<String> = (1..=7).map(|i| format!("{i}/ post number {i}")).collect();
        serde_json::to_string(&posts).unwrap()
    }

    #[test]
    fn build_thread_prompt_replaces_every_placeholder() {
        let template = "About ${topic}. Again: ${topic}!";
        let prompt = ContentFormatter::build_thread_prompt("X", template);
        assert_eq!(prompt, "About X. Again: X!");
        assert!(!prompt.contains(TOPIC_PLACEHOLDER));
    }

    #[test]
    fn default_template_has_placeholder() {
        assert!(DEFAULT_THREAD_TEMPLATE.contains(TOPIC_PLACEHOLDER));
        let prompt = ContentFormatter::build_thread_prompt("副业", DEFAULT_THREAD_TEMPLATE);
        assert!(prompt.contains("\"副业\""));
        assert!(!prompt.contains(TOPIC_PLACEHOLDER));
    }

    #[test]
    fn clean_json_response_strips_fences() {
        assert_eq!(clean_json_response("```json\n[\"a\"]\n```"), "[\"a\"]");
        assert_eq!(clean_json_response("```\n{}\n```\n"), "{}");
        assert_eq!(clean_json_response("  [1]  "), "[1]");
    }

    #[test]
    fn parse_thread_segments_rejects_prose_and_objects() {
        let err = parse_thread_segments("Here is your thread: 1/ hello").unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(err.raw_text(), Some("Here is your thread: 1/ hello"));

        let err = parse_thread_segments(r#"{"posts": ["a"]}"#).unwrap_err();
        assert!(err.is_format_error());

        let err = parse_thread_segments(r#"["a", 2]"#).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn parse_thread_segments_accepts_any_length() {
        let thread = parse_thread_segments(r#"["only", "three", "posts"]"#).unwrap();
        assert_eq!(thread.segments(), ["only", "three", "posts"]);
        assert!(parse_thread_segments("[]").unwrap().is_empty());
    }

    #[test]
    fn build_image_prompt_interpolates_titles() {
        let prompt = ContentFormatter::build_image_prompt("T", "标题", "副标题");
        assert!(prompt.contains("'标题'"));
        assert!(prompt.contains("'副标题'"));
        assert!(!prompt.contains('{'));
        assert!(!prompt.contains("${"));
        assert_eq!(prompt.lines().count(), 3);
    }

    #[tokio::test]
    async fn generate_thread_preserves_order() {
        let client = Arc::new(MockChatClient::with_reply(seven_posts_json()));
        let formatter = ContentFormatter::new(client.clone());

        let thread = formatter
            .generate_thread("side hustles", DEFAULT_THREAD_TEMPLATE)
            .await
            .unwrap();

        assert_eq!(thread.len(), 7);
        for (i, segment) in thread.segments().iter().enumerate() {
            assert!(segment.starts_with(&format!("{}/", i + 1)));
        }

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0][0].role(), Role::System);
        assert_eq!(requests[0][0].content(), THREAD_SYSTEM_PROMPT);
        assert!(requests[0][1].content().contains("side hustles"));
    }

    #[tokio::test]
    async fn generate_thread_propagates_api_failure() {
        let client = Arc::new(MockChatClient::failing_with_status(500));
        let formatter = ContentFormatter::new(client);

        let err = formatter
            .generate_thread("topic", DEFAULT_THREAD_TEMPLATE)
            .await
            .unwrap_err();
        assert!(err.is_api_error());
    }

    #[tokio::test]
    async fn generate_thread_reports_format_failure_for_prose() {
        let client = Arc::new(MockChatClient::with_reply("Sure! Here is a great thread."));
        let formatter = ContentFormatter::new(client);

        let result = formatter.generate_thread("topic", DEFAULT_THREAD_TEMPLATE).await;
        assert!(result.as_ref().is_err_and(|e| e.is_format_error()));
        assert!(result.ok().is_none());
    }

    #[tokio::test]
    async fn extract_cover_title_parses_fenced_reply() {
        let reply = "```json\n{\"主标题\": \"副业真相\", \"副标题\": \"一场结构试验\"}\n```";
        let client = Arc::new(MockChatClient::with_reply(reply));
        let formatter = ContentFormatter::new(client.clone());
        let thread = ThreadSegments::new(vec!["1/ a".into(), "2/ b".into()]);

        let title = formatter.extract_cover_title(&thread).await.unwrap();
        assert_eq!(title, CoverTitle::new("副业真相", "一场结构试验"));
        assert!(client.requests()[0][1].content().contains("1/ a\n\n2/ b"));
    }

    #[tokio::test]
    async fn extract_cover_title_rejects_missing_keys() {
        let client = Arc::new(MockChatClient::with_reply(r#"{"main_title": "only one"}"#));
        let formatter = ContentFormatter::new(client);
        let thread = ThreadSegments::new(vec!["x".into()]);

        let err = formatter.extract_cover_title(&thread).await.unwrap_err();
        assert!(err.is_format_error());
    }
}
