//! Guest conversation history with TTL eviction.
//!
//! The store is injected into the hub and owns its own eviction policy;
//! expired threads are dropped on access rather than by a background timer.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    Outbound,
    Inbound,
}

/// One message in a guest conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub direction: MessageDirection,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Conversation history keyed by thread. Implementations decide retention;
/// the hub never assumes a message it recorded is still there.
pub trait ConversationStore: Send + Sync {
    fn record(&self, thread: &str, message: ConversationMessage);
    fn history(&self, thread: &str) -> Vec<ConversationMessage>;
}

struct Thread {
    messages: Vec<ConversationMessage>,
    last_touched: Instant,
}

/// In-memory store for tests and development. A thread untouched for the
/// configured TTL is evicted the next time any call observes it.
pub struct InMemoryConversationStore {
    threads: Mutex<HashMap<String, Thread>>,
    ttl: Duration,
}

impl InMemoryConversationStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            threads: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn evict_expired(&self, threads: &mut HashMap<String, Thread>) {
        let ttl = self.ttl;
        threads.retain(|_, t| t.last_touched.elapsed() < ttl);
    }

    pub fn thread_count(&self) -> usize {
        let mut threads = self
            .threads
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.evict_expired(&mut threads);
        threads.len()
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(60 * 60 * 24))
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn record(&self, thread: &str, message: ConversationMessage) {
        let mut threads = self
            .threads
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.evict_expired(&mut threads);
        let entry = threads.entry(thread.to_string()).or_insert_with(|| Thread {
            messages: Vec::new(),
            last_touched: Instant::now(),
        });
        entry.messages.push(message);
        entry.last_touched = Instant::now();
    }

    fn history(&self, thread: &str) -> Vec<ConversationMessage> {
        let mut threads = self
            .threads
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.evict_expired(&mut threads);
        threads
            .get(thread)
            .map(|t| t.messages.clone())
            .unwrap_or_default()
    }
}
