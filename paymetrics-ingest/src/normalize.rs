//! Body normalizer: turn a raw email payload into plain text for pattern matching.
//!
//! Markup handling is regex-based and total, so a malformed document still
//! yields best-effort text instead of an error.

use paymetrics_core::{BodyPart, MimeHint, RawEmail};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Plain text shorter than this is not trusted as the message body
const MIN_PLAIN_TEXT_LEN: usize = 20;

/// Lines with a number must be longer than this to survive line filtering
const MIN_NUMERIC_LINE_LEN: usize = 10;

/// Vocabulary that marks a line as worth keeping
const RELEVANT_TERMS: [&str; 18] = [
    "debited",
    "credited",
    "rs.",
    "rs ",
    "inr",
    "₹",
    "account",
    "a/c",
    "card",
    "transaction",
    "txn",
    "upi",
    "vpa",
    "spent",
    "amount",
    "merchant",
    "info:",
    "info-",
];

/// Plain-text rendition of an email body, one logical line per `\n`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn markup_sniff_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<\s*(?:!doctype|html|head|body|div|p|br|table|tr|td|span|a|font|b|strong)\b")
            .expect("invalid markup sniff regex")
    })
}

fn script_style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<head\b.*?</head\s*>|<!--.*?-->")
            .expect("invalid script/style regex")
    })
}

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</\s*(?:p|div|tr|li|h[1-6]|table|blockquote)\s*>")
            .expect("invalid line break regex")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("invalid tag regex"))
}

fn numeric_entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#(\d{1,7});").expect("invalid entity regex"))
}

fn ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("invalid ws regex"))
}

/// Whether the body should be treated as markup
pub fn looks_like_markup(body: &str) -> bool {
    markup_sniff_re().is_match(body)
}

/// Normalize a single raw body.
pub fn normalize(raw_body: &str, hint: MimeHint) -> NormalizedText {
    let trimmed = raw_body.trim();
    let is_markup = match hint {
        MimeHint::PlainText => false,
        MimeHint::Html => true,
        MimeHint::Unknown => looks_like_markup(trimmed),
    };

    if !is_markup && trimmed.chars().count() > MIN_PLAIN_TEXT_LEN {
        return NormalizedText(trimmed.to_string());
    }

    let stripped = strip_markup(trimmed);
    NormalizedText(keep_relevant_lines(&stripped).join("\n"))
}

/// Pick the best representation of a multipart message: a usable plain-text
/// part first, then the richest HTML part, then the raw body.
pub fn normalize_parts(parts: &[BodyPart], fallback_body: &str, hint: MimeHint) -> NormalizedText {
    let plain = parts
        .iter()
        .filter(|p| p.hint() == MimeHint::PlainText)
        .map(|p| p.content.trim())
        .find(|c| c.chars().count() > MIN_PLAIN_TEXT_LEN);
    if let Some(plain) = plain {
        return NormalizedText(plain.to_string());
    }

    let richest_html = parts
        .iter()
        .filter(|p| p.hint() == MimeHint::Html)
        .max_by_key(|p| p.content.len());
    if let Some(html) = richest_html {
        return normalize(&html.content, MimeHint::Html);
    }

    normalize(fallback_body, hint)
}

/// Normalize whatever the email exposes.
pub fn normalize_email(email: &RawEmail) -> NormalizedText {
    if email.parts.is_empty() {
        normalize(&email.body, email.mime_hint)
    } else {
        normalize_parts(&email.parts, &email.body, email.mime_hint)
    }
}

/// Remove markup, keeping line structure. Returns non-empty, whitespace-collapsed lines.
pub fn strip_markup(markup: &str) -> String {
    let text = script_style_re().replace_all(markup, " ");
    let text = line_break_re().replace_all(&text, "\n");
    let text = tag_re().replace_all(&text, " ");
    let text = decode_entities(&text);

    text.lines()
        .map(|line| ws_re().replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    let text = numeric_entity_re().replace_all(text, |caps: &regex::Captures| {
        caps[1]
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    // &amp; last so "&amp;lt;" decodes to "&lt;" and not "<"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&rsquo;", "'")
        .replace("&amp;", "&")
}

fn is_relevant(line: &str) -> bool {
    let lower = line.to_lowercase();
    if RELEVANT_TERMS.iter().any(|t| lower.contains(t)) {
        return true;
    }
    line.chars().any(|c| c.is_ascii_digit()) && line.chars().count() > MIN_NUMERIC_LINE_LEN
}

/// Lines carrying transaction vocabulary or a meaningful number; all lines if none do.
fn keep_relevant_lines(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let relevant: Vec<&str> = lines.iter().copied().filter(|l| is_relevant(l)).collect();
    if relevant.is_empty() { lines } else { relevant }
}
