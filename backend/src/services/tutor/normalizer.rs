//! Response normalization
//!
//! Model output is free text that may or may not be the JSON we asked for.
//! Every parser here is two-stage: a strict serde parse first, then a defined
//! fallback. Nothing in this module returns an error to the caller.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::models::{ChatResult, Correction};

pub const FALLBACK_TRANSLATION: &str =
    "I understand what you said. Let's continue our conversation!";

static LATIN_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("latin run pattern is valid"));

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n(.*?)\n?```$").expect("code fence pattern is valid")
});

/// Outcome of normalizing a reply
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedReply {
    /// The model returned the full structured result
    Structured(ChatResult),
    /// Plain text; only the reply line could be recovered
    Fallback(ChatResult),
}

#[derive(Debug, Deserialize)]
struct StructuredReply {
    response: String,
    translation: String,
    #[serde(default)]
    has_errors: Option<bool>,
    #[serde(default)]
    correction: Option<Value>,
}

pub fn normalize_reply(raw: &str) -> NormalizedReply {
    match parse_structured_reply(raw) {
        Some(result) => NormalizedReply::Structured(result),
        None => NormalizedReply::Fallback(fallback_reply(raw)),
    }
}

/// Strict stage: the whole output must be a ChatResult-shaped JSON object
pub fn parse_structured_reply(raw: &str) -> Option<ChatResult> {
    let parsed: StructuredReply = serde_json::from_str(strip_code_fence(raw)).ok()?;

    if let Some(has_errors) = parsed.has_errors {
        tracing::debug!("Structured reply reports has_errors={}", has_errors);
    }

    let correction = parsed.correction.filter(|value| !value.is_null()).and_then(|value| {
        parse_correction_value(value, "grammar_correction")
            .inspect_err(|e| tracing::warn!("Dropping malformed correction record: {}", e))
            .ok()
    });

    Some(ChatResult { response: parsed.response, translation: parsed.translation, correction })
}

/// Lenient stage: first non-empty line as the reply, generic translation
pub fn fallback_reply(raw: &str) -> ChatResult {
    let response = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_else(|| raw.trim())
        .to_string();

    ChatResult { response, translation: FALLBACK_TRANSLATION.to_string(), correction: None }
}

/// Every run of latin letters in the text, in order of appearance
pub fn detect_latin_runs(text: &str) -> Vec<String> {
    LATIN_RUN.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

pub fn interjection_fallback(english_words: &[String]) -> Correction {
    Correction::InterjectionHelp {
        english_words: english_words.to_vec(),
        translations: None,
        suggested_sentence: None,
        explanation: format!(
            "I noticed you used English words: {}. Let me help you say those in Chinese!",
            english_words.join(", ")
        ),
    }
}

/// Parse the interjection-help answer, falling back to a generic record
/// built from the detected words
pub fn parse_interjection_help(raw: &str, english_words: &[String]) -> Correction {
    let parsed = serde_json::from_str::<Value>(strip_code_fence(raw))
        .map_err(|e| e.to_string())
        .and_then(|value| parse_correction_value(value, "interjection_help"));

    match parsed {
        Ok(correction) => correction,
        Err(e) => {
            tracing::warn!("Interjection help was not valid JSON ({}), using fallback", e);
            interjection_fallback(english_words)
        },
    }
}

/// Parse the grammar-correction answer; `None` means nothing to correct
pub fn parse_grammar_correction(raw: &str) -> Option<Correction> {
    if is_no_correction(raw) {
        return None;
    }

    serde_json::from_str::<Value>(strip_code_fence(raw))
        .map_err(|e| e.to_string())
        .and_then(|value| parse_correction_value(value, "grammar_correction"))
        .inspect_err(|e| tracing::warn!("Grammar correction was not usable ({}), skipping", e))
        .ok()
}

/// A `null` anywhere in the answer means the sentence needs no correction
pub fn is_no_correction(raw: &str) -> bool {
    raw.trim().to_lowercase().contains("null")
}

fn parse_correction_value(mut value: Value, default_type: &str) -> Result<Correction, String> {
    if !value.is_object() {
        return Err(format!("expected a JSON object, got {}", value));
    }

    let object = value.as_object_mut().ok_or("expected a JSON object")?;
    let has_type = object.get("type").and_then(Value::as_str).is_some_and(|t| !t.is_empty());
    if !has_type {
        object.insert("type".to_string(), Value::String(default_type.to_string()));
    }

    serde_json::from_value(value).map_err(|e| e.to_string())
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_reply_returned_unchanged() {
        let raw = r#"{
            "response": "你好！你今天怎么样？",
            "translation": "Hello! How are you today?",
            "has_errors": true,
            "correction": {
                "type": "grammar_correction",
                "original": "我是学生的",
                "corrected": "我是学生",
                "explanation": "的 is not needed here"
            }
        }"#;

        let normalized = normalize_reply(raw);
        let expected = ChatResult {
            response: "你好！你今天怎么样？".into(),
            translation: "Hello! How are you today?".into(),
            correction: Some(Correction::GrammarCorrection {
                original: "我是学生的".into(),
                corrected: "我是学生".into(),
                explanation: "的 is not needed here".into(),
            }),
        };
        assert_eq!(normalized, NormalizedReply::Structured(expected));
    }

    #[test]
    fn test_structured_reply_defaults_correction_tag() {
        let raw = r#"{"response": "好", "translation": "Good", "has_errors": true,
            "correction": {"original": "a", "corrected": "b", "explanation": "c"}}"#;
        let result = parse_structured_reply(raw).expect("structured");
        assert_eq!(result.correction.map(|c| c.kind()), Some("grammar_correction"));
    }

    #[test]
    fn test_structured_reply_drops_malformed_correction() {
        let raw = r#"{"response": "好", "translation": "Good", "correction": {"original": 1}}"#;
        let result = parse_structured_reply(raw).expect("structured");
        assert!(result.correction.is_none());
    }

    #[test]
    fn test_structured_reply_inside_code_fence() {
        let raw = "```json\n{\"response\": \"好\", \"translation\": \"Good\"}\n```";
        let result = parse_structured_reply(raw).expect("structured");
        assert_eq!(result.response, "好");
    }

    #[test]
    fn test_missing_required_field_is_not_structured() {
        assert!(parse_structured_reply(r#"{"response": "好"}"#).is_none());
    }

    #[test]
    fn test_plain_text_uses_first_non_empty_line() {
        let normalized = normalize_reply("\n\n  你好！很高兴认识你。 \n你学中文多久了？");
        match normalized {
            NormalizedReply::Fallback(result) => {
                assert_eq!(result.response, "你好！很高兴认识你。");
                assert_eq!(result.translation, FALLBACK_TRANSLATION);
                assert!(result.correction.is_none());
            },
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_fallback_on_blank_text() {
        assert_eq!(fallback_reply("   ").response, "");
    }

    #[test]
    fn test_detect_latin_runs() {
        assert_eq!(
            detect_latin_runs("我想要一个 hamburger 和一些 coffee"),
            vec!["hamburger", "coffee"]
        );
        assert_eq!(detect_latin_runs("我想喝coffee"), vec!["coffee"]);
        assert!(detect_latin_runs("我昨天去了商店买东西了").is_empty());
    }

    #[test]
    fn test_parse_interjection_help() {
        let raw = r#"{
            "type": "interjection_help",
            "english_words": ["hamburger", "coffee"],
            "translations": ["汉堡", "咖啡"],
            "suggested_sentence": "我想要一个汉堡和一些咖啡",
            "explanation": "hamburger is 汉堡, coffee is 咖啡"
        }"#;
        let words = vec!["hamburger".to_string(), "coffee".to_string()];
        match parse_interjection_help(raw, &words) {
            Correction::InterjectionHelp { translations, suggested_sentence, .. } => {
                assert_eq!(translations, Some(vec!["汉堡".to_string(), "咖啡".to_string()]));
                assert_eq!(suggested_sentence.as_deref(), Some("我想要一个汉堡和一些咖啡"));
            },
            other => panic!("expected interjection help, got {:?}", other),
        }
    }

    #[test]
    fn test_interjection_parse_failure_keeps_detected_words() {
        let words = vec!["hamburger".to_string(), "coffee".to_string()];
        let correction = parse_interjection_help("汉堡 = hamburger", &words);
        assert_eq!(
            correction,
            Correction::InterjectionHelp {
                english_words: words.clone(),
                translations: None,
                suggested_sentence: None,
                explanation: "I noticed you used English words: hamburger, coffee. Let me help you say those in Chinese!".into(),
            }
        );
    }

    #[test]
    fn test_interjection_without_tag_gets_default() {
        let raw = r#"{"english_words": ["tea"], "explanation": "tea is 茶"}"#;
        let correction = parse_interjection_help(raw, &["tea".to_string()]);
        assert_eq!(correction.kind(), "interjection_help");
    }

    #[test]
    fn test_grammar_null_means_no_correction() {
        assert!(parse_grammar_correction("null").is_none());
        assert!(parse_grammar_correction("NULL").is_none());
        assert!(parse_grammar_correction("The sentence is correct, so: null").is_none());
    }

    #[test]
    fn test_grammar_correction_defaults_tag() {
        let raw = r#"{"original": "我是学生的", "corrected": "我是学生", "explanation": "Drop 的"}"#;
        assert_eq!(
            parse_grammar_correction(raw),
            Some(Correction::GrammarCorrection {
                original: "我是学生的".into(),
                corrected: "我是学生".into(),
                explanation: "Drop 的".into(),
            })
        );
    }

    #[test]
    fn test_grammar_parse_failure_means_no_correction() {
        assert!(parse_grammar_correction("这个句子有一点问题").is_none());
        assert!(parse_grammar_correction(r#"["not", "an", "object"]"#).is_none());
    }
}
