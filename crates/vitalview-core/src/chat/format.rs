//! List detection for assistant text.

use regex::Regex;
use std::sync::LazyLock;

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s").expect("numbered pattern is valid"));
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("number prefix pattern is valid"));
static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-•*]\s*").expect("bullet prefix pattern is valid"));

/// Assistant text grouped for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedReply {
    Numbered(Vec<String>),
    Bulleted(Vec<String>),
    Plain(Vec<String>),
}

/// Detects numbered or bulleted lists in assistant text.
///
/// More than one line starting with `N. ` makes a numbered list of every
/// non-empty line. Otherwise any `•` or `- ` makes a bulleted list of the
/// trimmed non-empty lines. Anything else is plain lines.
pub fn format_reply(text: &str) -> FormattedReply {
    if text.is_empty() {
        return FormattedReply::Plain(Vec::new());
    }

    if NUMBERED_ITEM.find_iter(text).count() > 1 {
        let items = text
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| NUMBER_PREFIX.replace(line, "").into_owned())
            .collect();
        return FormattedReply::Numbered(items);
    }

    if text.contains('•') || text.contains("- ") {
        let items = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| BULLET_PREFIX.replace(line, "").into_owned())
            .collect();
        return FormattedReply::Bulleted(items);
    }

    FormattedReply::Plain(text.split('\n').map(str::to_string).collect())
}

impl FormattedReply {
    pub fn items(&self) -> &[String] {
        match self {
            Self::Numbered(items) | Self::Bulleted(items) | Self::Plain(items) => items,
        }
    }

    /// Renders as an `<ol>`, a `<ul>`, or `<br>`-separated text.
    pub fn to_html(&self) -> String {
        let list = |tag: &str, items: &[String]| {
            let body: String = items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_html(item)))
                .collect();
            format!("<{tag}>{body}</{tag}>")
        };

        match self {
            Self::Numbered(items) => list("ol", items),
            Self::Bulleted(items) => list("ul", items),
            Self::Plain(lines) => lines
                .iter()
                .map(|line| escape_html(line))
                .collect::<Vec<_>>()
                .join("<br>"),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
