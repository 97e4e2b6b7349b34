//! The messaging facade the orchestrator dispatches into.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use villakit_core::{DomainResult, PropertyId, ReservationId};

use crate::concierge::{ConciergeModel, ReplyContext};
use crate::store::{ConversationMessage, ConversationStore, MessageDirection};

/// Dispatch operations the orchestrator calls. Fire-and-forget from its
/// side: success means the message was handed to a channel, not read.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_reservation_confirmation(
        &self,
        reservation_id: ReservationId,
    ) -> DomainResult<()>;
    async fn send_welcome_message(&self, reservation_id: ReservationId) -> DomainResult<()>;
    async fn schedule_review_request(&self, reservation_id: ReservationId) -> DomainResult<()>;
    async fn send_property_ready_notification(&self, property_id: PropertyId)
    -> DomainResult<()>;
    async fn send_maintenance_notification(
        &self,
        property_id: PropertyId,
        issue: &str,
    ) -> DomainResult<()>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Confirmation,
    Welcome,
    ReviewRequest,
    PropertyReady,
    Maintenance,
    ConciergeReply,
}

/// A rendered message on its way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub kind: MessageKind,
    /// Conversation thread key (reservation or property scoped).
    pub thread: String,
    pub subject: String,
    pub body: String,
    /// Deferred delivery; `None` means send now.
    pub send_after: Option<DateTime<Utc>>,
}

/// Transport seam (email, SMS, push). Channels own retries and provider
/// credentials; the hub only hands messages over.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn deliver(&self, message: &OutboundMessage) -> DomainResult<()>;
}

/// Development channel: logs instead of sending.
#[derive(Debug, Default)]
pub struct LogChannel;

#[async_trait]
impl DeliveryChannel for LogChannel {
    async fn deliver(&self, message: &OutboundMessage) -> DomainResult<()> {
        info!(
            kind = ?message.kind,
            thread = %message.thread,
            subject = %message.subject,
            deferred = message.send_after.is_some(),
            "delivering message"
        );
        Ok(())
    }
}

/// Renders templates, hands them to a channel, and records every exchange
/// in the conversation store.
pub struct MessagingHub {
    channel: Arc<dyn DeliveryChannel>,
    store: Arc<dyn ConversationStore>,
    concierge: Option<Arc<dyn ConciergeModel>>,
    /// How long after checkout the review request goes out.
    review_delay: Duration,
}

impl MessagingHub {
    pub fn new(channel: Arc<dyn DeliveryChannel>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            channel,
            store,
            concierge: None,
            review_delay: Duration::days(3),
        }
    }

    pub fn with_concierge(mut self, concierge: Arc<dyn ConciergeModel>) -> Self {
        self.concierge = Some(concierge);
        self
    }

    pub fn with_review_delay(mut self, review_delay: Duration) -> Self {
        self.review_delay = review_delay;
        self
    }

    async fn dispatch(&self, message: OutboundMessage) -> DomainResult<()> {
        self.channel.deliver(&message).await?;
        self.store.record(
            &message.thread,
            ConversationMessage {
                direction: MessageDirection::Outbound,
                subject: message.subject,
                body: message.body,
                sent_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Draft and send a reply to an inbound guest message. Uses the attached
    /// concierge model when present, a plain acknowledgement otherwise.
    pub async fn reply_to_guest(&self, thread: &str, guest_message: &str) -> DomainResult<()> {
        self.store.record(
            thread,
            ConversationMessage {
                direction: MessageDirection::Inbound,
                subject: "guest message".to_string(),
                body: guest_message.to_string(),
                sent_at: Utc::now(),
            },
        );

        let body = match &self.concierge {
            Some(model) => {
                let context = ReplyContext {
                    thread: thread.to_string(),
                    guest_message: guest_message.to_string(),
                    history: self.store.history(thread),
                };
                model.draft_reply(&context).await?
            }
            None => {
                "Thanks for your message. Our team has received it and will reply shortly."
                    .to_string()
            }
        };

        self.dispatch(OutboundMessage {
            kind: MessageKind::ConciergeReply,
            thread: thread.to_string(),
            subject: "Re: your stay".to_string(),
            body,
            send_after: None,
        })
        .await
    }
}

#[async_trait]
impl MessagingPort for MessagingHub {
    async fn send_reservation_confirmation(
        &self,
        reservation_id: ReservationId,
    ) -> DomainResult<()> {
        self.dispatch(OutboundMessage {
            kind: MessageKind::Confirmation,
            thread: reservation_id.to_string(),
            subject: "Your reservation is confirmed".to_string(),
            body: format!(
                "Reservation {reservation_id} is confirmed. We will send arrival \
                 details closer to your check-in date."
            ),
            send_after: None,
        })
        .await
    }

    async fn send_welcome_message(&self, reservation_id: ReservationId) -> DomainResult<()> {
        self.dispatch(OutboundMessage {
            kind: MessageKind::Welcome,
            thread: reservation_id.to_string(),
            subject: "Welcome! Here is your access info".to_string(),
            body: format!(
                "Welcome to your stay (reservation {reservation_id}). Door codes and \
                 house details are in your guest portal."
            ),
            send_after: None,
        })
        .await
    }

    async fn schedule_review_request(&self, reservation_id: ReservationId) -> DomainResult<()> {
        self.dispatch(OutboundMessage {
            kind: MessageKind::ReviewRequest,
            thread: reservation_id.to_string(),
            subject: "How was your stay?".to_string(),
            body: format!(
                "We hope you enjoyed reservation {reservation_id}. A short review \
                 helps future guests."
            ),
            send_after: Some(Utc::now() + self.review_delay),
        })
        .await
    }

    async fn send_property_ready_notification(
        &self,
        property_id: PropertyId,
    ) -> DomainResult<()> {
        self.dispatch(OutboundMessage {
            kind: MessageKind::PropertyReady,
            thread: property_id.to_string(),
            subject: "Your property is ready".to_string(),
            body: "Housekeeping is complete and the property is ready for arrival.".to_string(),
            send_after: None,
        })
        .await
    }

    async fn send_maintenance_notification(
        &self,
        property_id: PropertyId,
        issue: &str,
    ) -> DomainResult<()> {
        self.dispatch(OutboundMessage {
            kind: MessageKind::Maintenance,
            thread: property_id.to_string(),
            subject: "Maintenance update for your stay".to_string(),
            body: format!(
                "We are aware of an issue at your property ({issue}) and our team is \
                 on it. We will keep you posted."
            ),
            send_after: None,
        })
        .await
    }
}
