//! Seam for AI-generated guest replies.
//!
//! Text generation is an external collaborator; the hub only supplies the
//! conversation context and falls back to templates when no model is wired.

use async_trait::async_trait;

use villakit_core::DomainResult;

use crate::store::ConversationMessage;

/// What the model sees when asked to draft a reply.
#[derive(Debug, Clone)]
pub struct ReplyContext {
    pub thread: String,
    pub guest_message: String,
    pub history: Vec<ConversationMessage>,
}

#[async_trait]
pub trait ConciergeModel: Send + Sync {
    async fn draft_reply(&self, context: &ReplyContext) -> DomainResult<String>;
}
