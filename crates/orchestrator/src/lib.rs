//! `villakit-orchestrator` — the domain-event wiring table.
//!
//! The orchestrator owns no business logic. It binds each domain event kind
//! to a fixed fan-out of facade calls, run as independent futures per
//! emission: one call failing is logged and never blocks its siblings.
//! Analytics additionally holds a standing wildcard subscription, so every
//! emission is forwarded to telemetry.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use villakit_analytics::AnalyticsPort;
use villakit_core::DomainResult;
use villakit_events::{
    Event, EventBus, EventKind, EventPayload, HousekeepingKind, MaintenancePriority,
    Subscription,
};
use villakit_messaging::MessagingPort;
use villakit_operations::{OperationsPort, PropertyStatus};
use villakit_pricing::RateRefresher;

/// Wires domain events to module facades over a shared [`EventBus`].
///
/// [`register`](Orchestrator::register) may be called again at any time
/// (hot reload, tests); it replaces the previous bindings instead of
/// accumulating duplicates.
pub struct Orchestrator {
    bus: EventBus,
    messaging: Arc<dyn MessagingPort>,
    operations: Arc<dyn OperationsPort>,
    analytics: Arc<dyn AnalyticsPort>,
    pricing: Arc<dyn RateRefresher>,
    subscriptions: Mutex<Vec<Subscription>>,
}

fn log_outcome(event: EventKind, action: &str, outcome: DomainResult<()>) {
    if let Err(err) = outcome {
        warn!(event = %event, action, error = %err, "orchestration call failed");
    }
}

impl Orchestrator {
    /// Build the orchestrator and install its wiring table; the returned
    /// instance is already live on the bus.
    pub fn new(
        bus: EventBus,
        messaging: Arc<dyn MessagingPort>,
        operations: Arc<dyn OperationsPort>,
        analytics: Arc<dyn AnalyticsPort>,
        pricing: Arc<dyn RateRefresher>,
    ) -> Self {
        let orchestrator = Self {
            bus,
            messaging,
            operations,
            analytics,
            pricing,
            subscriptions: Mutex::new(Vec::new()),
        };
        orchestrator.register();
        orchestrator
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Emit a domain event on behalf of an external caller and await the
    /// full fan-out.
    pub async fn emit(&self, event: Event) {
        self.bus.emit(event).await;
    }

    /// Reinstall the wiring table (hot reload, tests). Previous bindings
    /// registered by this orchestrator are removed first, so repeated calls
    /// never double up deliveries.
    pub fn register(&self) {
        let mut subscriptions = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for subscription in subscriptions.drain(..) {
            subscription.unsubscribe();
        }

        subscriptions.push(self.on_reservation_created());
        subscriptions.push(self.on_reservation_check_in());
        subscriptions.push(self.on_reservation_check_out());
        subscriptions.push(self.on_housekeeping_completed());
        subscriptions.push(self.on_maintenance_requested());
        subscriptions.push(self.on_any_event());
    }

    fn on_reservation_created(&self) -> Subscription {
        let messaging = Arc::clone(&self.messaging);
        let operations = Arc::clone(&self.operations);
        let pricing = Arc::clone(&self.pricing);
        self.bus.on(EventKind::ReservationCreated, move |event| {
            let messaging = Arc::clone(&messaging);
            let operations = Arc::clone(&operations);
            let pricing = Arc::clone(&pricing);
            async move {
                let EventPayload::ReservationCreated(details) = event.payload else {
                    return Ok(());
                };
                let (confirmation, housekeeping, rates) = tokio::join!(
                    messaging.send_reservation_confirmation(details.reservation_id),
                    operations.schedule_pre_arrival_housekeeping(details.reservation_id),
                    pricing.refresh_surrounding_rates(
                        details.property_id,
                        details.check_in,
                        details.check_out,
                    ),
                );
                let event = EventKind::ReservationCreated;
                log_outcome(event, "send confirmation", confirmation);
                log_outcome(event, "schedule pre-arrival housekeeping", housekeeping.map(|_| ()));
                log_outcome(event, "refresh surrounding rates", rates);
                Ok(())
            }
        })
    }

    fn on_reservation_check_in(&self) -> Subscription {
        let messaging = Arc::clone(&self.messaging);
        let analytics = Arc::clone(&self.analytics);
        self.bus.on(EventKind::ReservationCheckIn, move |event| {
            let messaging = Arc::clone(&messaging);
            let analytics = Arc::clone(&analytics);
            async move {
                let EventPayload::ReservationCheckIn(details) = event.payload else {
                    return Ok(());
                };
                let (welcome, stay) = tokio::join!(
                    messaging.send_welcome_message(details.reservation_id),
                    analytics.track_stay_start(details.reservation_id),
                );
                let event = EventKind::ReservationCheckIn;
                log_outcome(event, "send welcome message", welcome);
                log_outcome(event, "track stay start", stay);
                Ok(())
            }
        })
    }

    fn on_reservation_check_out(&self) -> Subscription {
        let messaging = Arc::clone(&self.messaging);
        let operations = Arc::clone(&self.operations);
        let analytics = Arc::clone(&self.analytics);
        self.bus.on(EventKind::ReservationCheckOut, move |event| {
            let messaging = Arc::clone(&messaging);
            let operations = Arc::clone(&operations);
            let analytics = Arc::clone(&analytics);
            async move {
                let EventPayload::ReservationCheckOut(details) = event.payload else {
                    return Ok(());
                };
                let (housekeeping, review, stay) = tokio::join!(
                    operations.schedule_post_checkout_housekeeping(details.reservation_id),
                    messaging.schedule_review_request(details.reservation_id),
                    analytics.track_stay_complete(details.reservation_id),
                );
                let event = EventKind::ReservationCheckOut;
                log_outcome(event, "schedule post-checkout housekeeping", housekeeping.map(|_| ()));
                log_outcome(event, "schedule review request", review);
                log_outcome(event, "track stay complete", stay);
                Ok(())
            }
        })
    }

    fn on_housekeeping_completed(&self) -> Subscription {
        let messaging = Arc::clone(&self.messaging);
        let operations = Arc::clone(&self.operations);
        self.bus.on(EventKind::HousekeepingCompleted, move |event| {
            let messaging = Arc::clone(&messaging);
            let operations = Arc::clone(&operations);
            async move {
                let EventPayload::HousekeepingCompleted(done) = event.payload else {
                    return Ok(());
                };
                let notify_guest = async {
                    // Post-checkout cleans have no waiting guest to tell.
                    if done.kind == HousekeepingKind::PreArrival {
                        messaging.send_property_ready_notification(done.property_id).await
                    } else {
                        Ok(())
                    }
                };
                let (status, notified) = tokio::join!(
                    operations.update_property_status(done.property_id, PropertyStatus::Ready),
                    notify_guest,
                );
                let event = EventKind::HousekeepingCompleted;
                log_outcome(event, "mark property ready", status);
                log_outcome(event, "notify guest property ready", notified);
                Ok(())
            }
        })
    }

    fn on_maintenance_requested(&self) -> Subscription {
        let messaging = Arc::clone(&self.messaging);
        let operations = Arc::clone(&self.operations);
        self.bus.on(EventKind::MaintenanceRequested, move |event| {
            let messaging = Arc::clone(&messaging);
            let operations = Arc::clone(&operations);
            async move {
                let EventPayload::MaintenanceRequested(request) = event.payload else {
                    return Ok(());
                };
                let notify_guest = async {
                    if request.priority == MaintenancePriority::Urgent && request.property_occupied
                    {
                        messaging
                            .send_maintenance_notification(request.property_id, &request.issue)
                            .await
                    } else {
                        Ok(())
                    }
                };
                let (team, guest) = tokio::join!(
                    operations.notify_maintenance_team(&request),
                    notify_guest,
                );
                let event = EventKind::MaintenanceRequested;
                log_outcome(event, "notify maintenance team", team);
                log_outcome(event, "notify guest of urgent issue", guest);
                Ok(())
            }
        })
    }

    fn on_any_event(&self) -> Subscription {
        let analytics = Arc::clone(&self.analytics);
        self.bus.on_all(move |event| {
            let analytics = Arc::clone(&analytics);
            async move {
                analytics.track_event(&event).await?;
                Ok(())
            }
        })
    }
}
