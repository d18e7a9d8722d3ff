//! Prompt templates for every tutor model call

// ============================================================================
// System Prompt
// ============================================================================

pub const TUTOR_SYSTEM_PROMPT: &str = r#"You are a patient, encouraging Chinese language tutor chatting with a student.

Your job:
1. Hold a natural conversation in Chinese with the student
2. Gently correct mistakes in grammar and word choice
3. Keep every reply very short and simple, as if talking to a five-year-old
4. Ask an easy follow-up question so the conversation keeps going
5. Offer at most one or two suggestions at a time

IMPORTANT: Reply ONLY in simplified Chinese characters (汉字).
Do not include English words, pinyin, or translations in your reply.
English translations are produced separately by the system."#;

// ============================================================================
// Analysis Prompts
// ============================================================================

/// Asks for Chinese equivalents of the English words the student mixed in
pub fn interjection_prompt(english_words: &[String], sentence: &str) -> String {
    format!(
        r#"The student wrote a Chinese sentence but used these English words: {words}
Original sentence: "{sentence}"

Help them by giving the Chinese word for each English word and showing how
to say the whole sentence naturally in Chinese.

Respond with JSON only:
{{
    "type": "interjection_help",
    "english_words": ["each English word"],
    "translations": ["the Chinese translation of each word, same order"],
    "suggested_sentence": "the full sentence rewritten in Chinese",
    "explanation": "a short explanation of how to use these words in Chinese"
}}"#,
        words = english_words.join(", "),
        sentence = sentence,
    )
}

/// Asks for a grammar or word-choice correction; the model answers `null`
/// when the sentence is fine
pub fn grammar_correction_prompt(sentence: &str) -> String {
    format!(
        r#"Check this Chinese sentence for grammar mistakes or better word choices: "{sentence}"

If something should be fixed, respond with JSON only:
{{
    "type": "grammar_correction",
    "original": "the original sentence",
    "corrected": "the corrected sentence",
    "explanation": "what was wrong and why, in English"
}}

If the Chinese is correct, respond with exactly: null"#
    )
}

pub fn translation_prompt(chinese_text: &str) -> String {
    format!("Translate this Chinese text to natural English. Reply with the translation only: {chinese_text}")
}

// ============================================================================
// Topic Prompt
// ============================================================================

pub fn topic_prompt(style: &str, category: &str, starter_number: u32) -> String {
    format!(
        r#"You are writing conversation starter #{starter_number}.
{style} {category}.

Write one engaging conversation starter for a student learning Chinese.
Requirements:
- Easy enough for beginner to intermediate learners
- Culturally relevant and interesting
- Simplified Chinese characters only
- A single question or statement
- Avoid the most common textbook examples; be creative

Respond with ONLY the Chinese text, nothing else."#
    )
}
