//! Wire types for the chat endpoint.
//!
//! The endpoint answers with one of two reply schemas. A "show me" request
//! yields `{ action: "highlight", target, message }`; a symptom description
//! yields `{ diagnosis, target }`. Both are kept as separate paths.

use crate::conversation::Turn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Value of `action` that requests a highlight.
pub const HIGHLIGHT_ACTION: &str = "highlight";

static INLINE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").expect("inline block pattern is valid"));

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Turn>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Turn>) -> Self {
        Self { messages }
    }
}

/// Response of `POST /chat`. Every field but `reply` may be absent or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
}

/// Which reply schema produced a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Highlight,
    Diagnosis,
}

/// A request to frame a region and explain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportDirective {
    pub kind: DirectiveKind,
    pub target: String,
    pub explanation: String,
}

impl ChatReply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Self::default()
        }
    }

    /// Extracts the viewport directive, if the reply carries one.
    ///
    /// `action == "highlight"` with a target takes the explanation from
    /// `message`; otherwise a diagnosis with a target takes it from
    /// `diagnosis`. Empty strings count as absent.
    pub fn directive(&self) -> Option<ViewportDirective> {
        let target = non_empty(&self.target)?;

        if self.action.as_deref() == Some(HIGHLIGHT_ACTION) {
            return Some(ViewportDirective {
                kind: DirectiveKind::Highlight,
                target: target.to_string(),
                explanation: self.message.clone().unwrap_or_default(),
            });
        }

        let diagnosis = non_empty(&self.diagnosis)?;
        Some(ViewportDirective {
            kind: DirectiveKind::Diagnosis,
            target: target.to_string(),
            explanation: diagnosis.to_string(),
        })
    }

    /// Fills the directive fields from a JSON block embedded in `reply` when
    /// the endpoint sent none of them.
    pub fn with_inline_fallback(mut self) -> Self {
        let has_fields = self.action.is_some()
            || self.target.is_some()
            || self.message.is_some()
            || self.diagnosis.is_some();
        if has_fields {
            return self;
        }

        if let Some(inline) = extract_inline_directive(&self.reply) {
            self.action = inline.action;
            self.target = inline.target;
            self.message = inline.message;
            self.diagnosis = inline.diagnosis;
        }
        self
    }
}

/// Directive fields as an assistant writes them inside its own text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineDirective {
    pub action: Option<String>,
    pub target: Option<String>,
    pub message: Option<String>,
    pub diagnosis: Option<String>,
}

/// Parses the first `{...}` block of `text` (shortest match, may span lines).
///
/// Returns `None` when there is no block or the block is not a JSON object.
/// Fields that are not strings are treated as absent.
pub fn extract_inline_directive(text: &str) -> Option<InlineDirective> {
    let block = INLINE_BLOCK.find(text)?;
    let value: serde_json::Value = match serde_json::from_str(block.as_str()) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("[ChatReply] Ignoring malformed inline block: {}", e);
            return None;
        }
    };
    let object = value.as_object()?;
    let field = |name: &str| object.get(name).and_then(|v| v.as_str()).map(str::to_string);

    Some(InlineDirective {
        action: field("action"),
        target: field("target"),
        message: field("message"),
        diagnosis: field("diagnosis"),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_directive() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"reply":"Looks fine","action":"highlight","target":"Lungs","message":"Mild inflammation"}"#,
        )
        .unwrap();

        let directive = reply.directive().unwrap();
        assert_eq!(directive.kind, DirectiveKind::Highlight);
        assert_eq!(directive.target, "Lungs");
        assert_eq!(directive.explanation, "Mild inflammation");
    }

    #[test]
    fn test_diagnosis_directive() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"reply":"diagnosis ready","diagnosis":"Possible fracture","target":"Legs"}"#,
        )
        .unwrap();

        let directive = reply.directive().unwrap();
        assert_eq!(directive.kind, DirectiveKind::Diagnosis);
        assert_eq!(directive.explanation, "Possible fracture");
    }

    #[test]
    fn test_nulls_and_missing_target_yield_nothing() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"reply":"hello","action":null,"target":null,"message":null,"diagnosis":"flu"}"#,
        )
        .unwrap();
        assert!(reply.directive().is_none());

        let reply = ChatReply {
            action: Some("highlight".into()),
            target: Some(String::new()),
            ..ChatReply::text("x")
        };
        assert!(reply.directive().is_none());
    }

    #[test]
    fn test_highlight_without_message_has_empty_explanation() {
        let reply = ChatReply {
            action: Some("highlight".into()),
            target: Some("heart".into()),
            ..ChatReply::text("Here you go")
        };
        assert_eq!(reply.directive().unwrap().explanation, "");
    }

    #[test]
    fn test_other_action_falls_through_to_diagnosis() {
        let reply = ChatReply {
            action: Some("rotate".into()),
            target: Some("knees".into()),
            diagnosis: Some("Sprain".into()),
            ..ChatReply::default()
        };
        let directive = reply.directive().unwrap();
        assert_eq!(directive.kind, DirectiveKind::Diagnosis);
        assert_eq!(directive.explanation, "Sprain");
    }

    #[test]
    fn test_extract_inline_directive_spans_lines() {
        let text = "You may have a cold.\n{\"diagnosis\": \"Common cold\",\n \"target\": \"throat\"} Rest well.";
        let inline = extract_inline_directive(text).unwrap();
        assert_eq!(inline.diagnosis.as_deref(), Some("Common cold"));
        assert_eq!(inline.target.as_deref(), Some("throat"));
    }

    #[test]
    fn test_extract_inline_directive_rejects_malformed() {
        assert!(extract_inline_directive("no braces here").is_none());
        assert!(extract_inline_directive("{not json}").is_none());
    }

    #[test]
    fn test_extract_inline_directive_skips_non_string_fields() {
        let text = r#"See {"diagnosis": "Bruise", "target": 3, "severity": 2}"#;
        let inline = extract_inline_directive(text).unwrap();
        assert_eq!(inline.diagnosis.as_deref(), Some("Bruise"));
        assert_eq!(inline.target, None);

        assert!(extract_inline_directive("{[1, 2]}").is_none());
    }

    #[test]
    fn test_inline_fallback_only_when_fields_absent() {
        let raw = ChatReply::text(r#"Here it is {"action":"highlight","target":"heart","message":"The heart"}"#);
        let filled = raw.with_inline_fallback();
        assert_eq!(filled.directive().unwrap().explanation, "The heart");

        let explicit = ChatReply {
            target: Some("lungs".into()),
            diagnosis: Some("Asthma".into()),
            ..ChatReply::text(r#"{"diagnosis":"Other","target":"feet"}"#)
        };
        let kept = explicit.clone().with_inline_fallback();
        assert_eq!(kept, explicit);
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest::new(vec![Turn::user("show me the heart")]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "messages": [{ "role": "user", "content": "show me the heart" }] })
        );
    }
}
