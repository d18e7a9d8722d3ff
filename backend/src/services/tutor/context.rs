//! Conversation context assembly
//!
//! Turns the client-supplied history into the role-tagged message list sent
//! with a reply request: system instruction, then a trailing window of prior
//! turns (oldest first), then the current message.

use crate::models::{ConversationTurn, Sender};
use crate::services::llm::ChatMessage;

pub fn build_conversation_messages(
    system_prompt: &str,
    history: &[ConversationTurn],
    current_message: &str,
    window: usize,
) -> Vec<ChatMessage> {
    // Clients usually append the just-submitted message before sending
    let prior = match history.split_last() {
        Some((last, rest)) if last.sender == Sender::User && last.message == current_message => rest,
        _ => history,
    };

    let start = prior.len().saturating_sub(window);

    let mut messages = Vec::with_capacity(prior.len() - start + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(prior[start..].iter().filter_map(|turn| match turn.sender {
        _ if turn.message.trim().is_empty() => None,
        Sender::User => Some(ChatMessage::user(turn.message.as_str())),
        Sender::Ai => Some(ChatMessage::assistant(turn.message.as_str())),
        Sender::Other => None,
    }));
    messages.push(ChatMessage::user(current_message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm::ChatRole;

    fn history(len: usize) -> Vec<ConversationTurn> {
        (0..len)
            .map(|i| {
                if i % 2 == 0 {
                    ConversationTurn::user(format!("学生 {}", i))
                } else {
                    ConversationTurn::ai(format!("老师 {}", i))
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_history() {
        let messages = build_conversation_messages("sys", &[], "你好", 8);
        assert_eq!(messages, vec![ChatMessage::system("sys"), ChatMessage::user("你好")]);
    }

    #[test]
    fn test_window_keeps_most_recent_turns_oldest_first() {
        let turns = history(20);
        let messages = build_conversation_messages("sys", &turns, "新的消息", 8);

        assert_eq!(messages.len(), 1 + 8 + 1);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].content, "学生 12");
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[2].content, "老师 13");
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(messages[8].content, "老师 19");
        assert_eq!(messages.last(), Some(&ChatMessage::user("新的消息")));
    }

    #[test]
    fn test_current_message_not_duplicated() {
        let mut turns = history(3);
        turns.push(ConversationTurn::user("我喜欢吃中国菜"));

        let messages = build_conversation_messages("sys", &turns, "我喜欢吃中国菜", 8);
        let occurrences = messages.iter().filter(|m| m.content == "我喜欢吃中国菜").count();
        assert_eq!(occurrences, 1);
        assert_eq!(messages.len(), 1 + 3 + 1);
    }

    #[test]
    fn test_duplicate_exclusion_happens_before_windowing() {
        let mut turns = history(10);
        turns.push(ConversationTurn::user("最后"));

        let messages = build_conversation_messages("sys", &turns, "最后", 4);
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["sys", "学生 6", "老师 7", "学生 8", "老师 9", "最后"]);
    }

    #[test]
    fn test_last_ai_turn_with_same_text_is_kept() {
        let turns = vec![ConversationTurn::ai("你好")];
        let messages = build_conversation_messages("sys", &turns, "你好", 8);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], ChatMessage::assistant("你好"));
    }

    #[test]
    fn test_unknown_senders_are_skipped() {
        let turns = vec![
            ConversationTurn::user("一"),
            ConversationTurn { sender: Sender::Other, message: "ignored".into() },
            ConversationTurn::ai("二"),
        ];
        let messages = build_conversation_messages("sys", &turns, "三", 8);
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["sys", "一", "二", "三"]);
    }

    #[test]
    fn test_empty_turns_are_skipped() {
        let turns = vec![ConversationTurn::user("一"), ConversationTurn::ai("  "), ConversationTurn::user("")];
        let messages = build_conversation_messages("sys", &turns, "二", 8);
        assert_eq!(messages, vec![ChatMessage::system("sys"), ChatMessage::user("一"), ChatMessage::user("二")]);
    }
}
