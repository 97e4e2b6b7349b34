//! `villakit-messaging` — guest messaging facade.
//!
//! [`MessagingHub`] renders guest-facing messages from templates, hands them
//! to a [`DeliveryChannel`], and records every exchange in an injected
//! [`ConversationStore`]. AI-drafted replies go through the optional
//! [`ConciergeModel`] seam; the hub itself never calls an external service.

pub mod concierge;
pub mod hub;
pub mod store;

pub use concierge::{ConciergeModel, ReplyContext};
pub use hub::{
    DeliveryChannel, LogChannel, MessageKind, MessagingHub, MessagingPort, OutboundMessage,
};
pub use store::{
    ConversationMessage, ConversationStore, InMemoryConversationStore, MessageDirection,
};
