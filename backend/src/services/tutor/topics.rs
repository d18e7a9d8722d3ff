//! Conversation starter tables and random selection

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::TopicSuggestion;

pub const TOPIC_CATEGORIES: &[&str] = &[
    "food and cooking, favorite dishes, restaurants",
    "weather, seasons, outdoor activities",
    "hobbies, interests, free time activities",
    "travel, places visited, dream destinations",
    "family, friends, relationships",
    "work, studies, daily routines",
    "entertainment, movies, music, books",
    "holidays, festivals, celebrations",
    "sports, exercise, health",
    "pets, animals, nature",
];

pub const QUESTION_STYLES: &[&str] = &[
    "Ask an interesting question about",
    "Start a conversation about",
    "Make a comment or observation about",
    "Ask for their opinion on",
    "Ask about their experience with",
];

/// Used when the model cannot produce a topic
pub const FALLBACK_TOPICS: &[(&str, &str)] = &[
    ("你今天做了什么有趣的事情？", "What interesting things did you do today?"),
    ("你最喜欢吃什么菜？", "What's your favorite dish?"),
    ("周末你通常做什么？", "What do you usually do on weekends?"),
    ("你觉得今天的天气怎么样？", "How do you think today's weather is?"),
    ("你有什么爱好吗？", "Do you have any hobbies?"),
];

/// One random draw of the prompt ingredients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicSeed {
    pub category: &'static str,
    pub style: &'static str,
    /// Four-digit number that makes otherwise identical prompts differ
    pub starter_number: u32,
}

pub fn pick_topic_seed<R: Rng>(rng: &mut R) -> TopicSeed {
    TopicSeed {
        category: TOPIC_CATEGORIES.choose(rng).copied().unwrap_or(TOPIC_CATEGORIES[0]),
        style: QUESTION_STYLES.choose(rng).copied().unwrap_or(QUESTION_STYLES[0]),
        starter_number: rng.gen_range(1000..10000),
    }
}

pub fn pick_fallback_topic<R: Rng>(rng: &mut R) -> TopicSuggestion {
    let (topic, translation) = FALLBACK_TOPICS.choose(rng).copied().unwrap_or(FALLBACK_TOPICS[0]);
    TopicSuggestion { topic: topic.to_string(), translation: translation.to_string() }
}
