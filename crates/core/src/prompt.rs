//! Prompt assembly for a chat turn.
//!
//! The model receives three system messages: the persona with house rules,
//! the retrieved MEMORY block, and the recent HISTORY block. The user's
//! latest message is already the last HISTORY line and is not repeated.

use serde::{Deserialize, Serialize};

use crate::chat::Message;

/// Role of a message sent to the chat-completion endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: PromptRole::System, content: content.into() }
    }
}

const HOUSE_RULES: [&str; 5] = [
    "Правила:",
    "- Отвечай по-русски.",
    "- Если пользователь спрашивает 'о чём мы говорили', используй HISTORY и MEMORY.",
    "- Не выдумывай факты о пользователе, если их нет в MEMORY/HISTORY.",
    "- Если запрос про насилие/убийства — отказывай и предлагай безопасные альтернативы.",
];

const EMPTY_BLOCK: &str = "(empty)";

/// One line of the MEMORY block.
#[must_use]
pub fn render_memory_line(role: &str, text: &str) -> String {
    format!("- ({role}) {text}")
}

/// Persona prompt followed by a blank line and the house rules.
#[must_use]
pub fn persona_system_prompt(system_prompt: &str) -> String {
    let mut lines = Vec::with_capacity(HOUSE_RULES.len() + 2);
    lines.push(system_prompt);
    lines.push("");
    lines.extend(HOUSE_RULES);
    lines.join("\n")
}

/// Build the full message list for a chat turn.
///
/// `history` must already be in chronological order.
#[must_use]
pub fn build_prompt(
    system_prompt: &str,
    memory_lines: &[String],
    history: &[Message],
) -> Vec<PromptMessage> {
    let memory_block =
        if memory_lines.is_empty() { EMPTY_BLOCK.to_owned() } else { memory_lines.join("\n") };

    let history_block = if history.is_empty() {
        EMPTY_BLOCK.to_owned()
    } else {
        history
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str().to_uppercase(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    };

    vec![
        PromptMessage::system(persona_system_prompt(system_prompt)),
        PromptMessage::system(format!("MEMORY (semantic):\n{memory_block}")),
        PromptMessage::system(format!("HISTORY:\n{history_block}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MessageRole;
    use chrono::Utc;

    fn msg(role: MessageRole, content: &str) -> Message {
        Message {
            id: content.to_owned(),
            conversation_id: "c".to_owned(),
            role,
            content: content.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_blocks_render_placeholder() {
        let prompt = build_prompt("Ты — Лидия.", &[], &[]);
        assert_eq!(prompt.len(), 3);
        assert!(prompt.iter().all(|m| m.role == PromptRole::System));
        assert_eq!(prompt[1].content, "MEMORY (semantic):\n(empty)");
        assert_eq!(prompt[2].content, "HISTORY:\n(empty)");
    }

    #[test]
    fn test_persona_prompt_carries_rules() {
        let prompt = build_prompt("Ты — Лидия.", &[], &[]);
        assert!(prompt[0].content.starts_with("Ты — Лидия.\n\nПравила:\n"));
        assert!(prompt[0].content.ends_with("безопасные альтернативы."));
    }

    #[test]
    fn test_history_lines_are_role_prefixed_in_order() {
        let history =
            vec![msg(MessageRole::User, "Привет"), msg(MessageRole::Assistant, "Мой тан.")];
        let memory = [render_memory_line("user", "Я люблю сладкие рулеты")];
        let prompt = build_prompt("p", &memory, &history);
        assert_eq!(prompt[1].content, "MEMORY (semantic):\n- (user) Я люблю сладкие рулеты");
        assert_eq!(prompt[2].content, "HISTORY:\nUSER: Привет\nASSISTANT: Мой тан.");
    }
}
