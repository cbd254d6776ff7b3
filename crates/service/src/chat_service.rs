//! Retrieval-augmented chat turns and conversation history.

use std::sync::Arc;

use companion_chat_core::{
    Companion, Conversation, DEFAULT_CONVERSATION_TITLE, HISTORY_LIMIT, MemoryFilter, Message,
    MessageRole, NewConversation, RETRIEVAL_TOP_K, build_prompt, dedupe_snippets,
    render_memory_line,
};
use companion_chat_llm::ChatModel;
use companion_chat_storage::ChatStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ServiceError, require_text};
use crate::memory_service::{ChatScope, MemoryService};

/// One user turn.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub conversation_id: Option<String>,
    pub companion_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanionRef {
    pub id: String,
    pub name: String,
}

/// Outcome of a chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub conversation_id: String,
    pub companion: CompanionRef,
    /// Snippets returned by retrieval, counted before dedupe.
    pub used_memory_count: usize,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    pub conversation_id: String,
    pub messages: Vec<Message>,
}

pub struct ChatService {
    store: Arc<dyn ChatStore>,
    model: Arc<dyn ChatModel>,
    memory: Arc<MemoryService>,
}

impl ChatService {
    #[must_use]
    pub fn new(
        store: Arc<dyn ChatStore>,
        model: Arc<dyn ChatModel>,
        memory: Arc<MemoryService>,
    ) -> Self {
        Self { store, model, memory }
    }

    async fn require_companion(&self, id: &str) -> Result<Companion, ServiceError> {
        self.store
            .get_companion(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound { entity: "companion", id: id.to_owned() })
    }

    async fn open_conversation(
        &self,
        user_id: &str,
        companion_id: &str,
    ) -> Result<Conversation, ServiceError> {
        let conversation = self
            .store
            .create_conversation(NewConversation {
                user_id: user_id.to_owned(),
                companion_id: companion_id.to_owned(),
                title: DEFAULT_CONVERSATION_TITLE.to_owned(),
            })
            .await?;
        info!(user_id, companion_id, conversation_id = %conversation.id, "Conversation created");
        Ok(conversation)
    }

    /// The user's most recently active conversation with a companion,
    /// created empty if they have never talked.
    pub async fn history(
        &self,
        user_id: &str,
        companion_id: &str,
    ) -> Result<ChatHistory, ServiceError> {
        let companion_id = require_text("companionId", companion_id)?;
        let conversation = match self.store.latest_conversation(user_id, companion_id).await? {
            Some(conv) => conv,
            None => {
                self.require_companion(companion_id).await?;
                self.open_conversation(user_id, companion_id).await?
            },
        };
        let messages = self.store.list_messages(&conversation.id).await?;
        Ok(ChatHistory { conversation_id: conversation.id, messages })
    }

    /// Run one chat turn: persist, index, retrieve, prompt, reply.
    ///
    /// Each step is awaited in order and the first failure aborts the turn;
    /// whatever was written before it stays written.
    pub async fn send(&self, user_id: &str, input: SendMessage) -> Result<ChatReply, ServiceError> {
        let companion_id = require_text("companionId", &input.companion_id)?;
        require_text("message", &input.message)?;

        let existing = match input.conversation_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => self.store.find_conversation_for_user(id, user_id).await?,
            None => None,
        };
        let (conversation, companion) = match existing {
            Some(conv) => {
                let companion = self.require_companion(&conv.companion_id).await?;
                (conv, companion)
            },
            None => {
                let companion = self.require_companion(companion_id).await?;
                (self.open_conversation(user_id, companion_id).await?, companion)
            },
        };
        let scope =
            ChatScope { user_id, companion_id, conversation_id: conversation.id.as_str() };

        let user_message =
            self.store.append_message(&conversation.id, MessageRole::User, &input.message).await?;
        self.memory.index_chat_message(scope, &user_message).await?;

        let history = self.store.recent_messages(&conversation.id, HISTORY_LIMIT).await?;

        let filter = MemoryFilter::for_user(user_id).and("companion_id", companion_id);
        let hits = self.memory.retrieve(&input.message, &filter, RETRIEVAL_TOP_K).await?;
        let used_memory_count = hits.len();
        let memory_lines: Vec<String> = dedupe_snippets(hits.iter().map(|h| h.content.as_str()))
            .into_iter()
            .filter_map(|(idx, text)| {
                hits.get(idx).map(|hit| render_memory_line(hit.role_label(), text))
            })
            .collect();
        debug!(
            conversation_id = %conversation.id,
            retrieved = used_memory_count,
            kept = memory_lines.len(),
            history = history.len(),
            "Prompt context assembled"
        );

        let prompt = build_prompt(&companion.system_prompt, &memory_lines, &history);
        let answer = self.model.complete(&prompt).await?;

        let reply = self
            .store
            .append_message(&conversation.id, MessageRole::Assistant, &answer)
            .await?;
        self.memory.index_chat_message(scope, &reply).await?;
        self.store.touch_conversation(&conversation.id).await?;

        Ok(ChatReply {
            conversation_id: conversation.id.clone(),
            companion: CompanionRef { id: companion.id, name: companion.name },
            used_memory_count,
            answer,
        })
    }
}
