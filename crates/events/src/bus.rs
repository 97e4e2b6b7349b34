//! In-process publish/subscribe dispatcher.
//!
//! The bus owns no business logic and persists nothing. `emit` fans an event
//! out to every matching handler (kind-specific first, then wildcard), starts
//! them all without waiting on one another, and joins them fault-tolerantly:
//! a handler failing or panicking is logged and isolated, it never blocks a
//! sibling and never fails the emit call.
//!
//! The registry lock is only held while snapshotting the handler list, never
//! across handler execution, so a handler may re-enter `emit` synchronously
//! without deadlocking the bus.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tracing::{debug, error};

use villakit_core::{DomainError, DomainResult};

use crate::{Event, EventKind};

/// Default deadline for [`EventBus::wait_for`].
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of a single handler invocation.
///
/// The concrete error type is erased: the bus records failures, it does not
/// interpret them.
pub type HandlerResult = anyhow::Result<()>;

type BoxHandler = Arc<dyn Fn(Event) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

struct Registration {
    id: u64,
    once: bool,
    handler: BoxHandler,
}

#[derive(Default)]
struct Registry {
    by_kind: HashMap<EventKind, Vec<Registration>>,
    wildcard: Vec<Registration>,
}

struct BusInner {
    registry: Mutex<Registry>,
    next_id: AtomicU64,
}

/// Typed in-process event bus. Cheap to clone; clones share the registry.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

/// Where a registration lives in the registry.
#[derive(Debug, Copy, Clone)]
enum Slot {
    Kind(EventKind),
    All,
}

/// Handle to a registered handler. `unsubscribe` is idempotent.
///
/// Holds only a weak reference to the bus, so a forgotten subscription does
/// not keep the bus alive.
#[derive(Debug)]
pub struct Subscription {
    inner: Weak<BusInner>,
    slot: Slot,
    id: u64,
}

impl Subscription {
    /// Remove the handler. Removing an already-removed handler is a no-op.
    pub fn unsubscribe(&self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut registry = lock_registry(&inner);
        match self.slot {
            Slot::Kind(kind) => {
                if let Some(list) = registry.by_kind.get_mut(&kind) {
                    list.retain(|r| r.id != self.id);
                }
            }
            Slot::All => registry.wildcard.retain(|r| r.id != self.id),
        }
    }
}

fn lock_registry(inner: &BusInner) -> MutexGuard<'_, Registry> {
    inner.registry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn box_handler<F, Fut>(handler: F) -> BoxHandler
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |event| Box::pin(handler(event)))
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                registry: Mutex::new(Registry::default()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register a handler for exactly one event kind.
    ///
    /// Registering the same callback twice yields two independent
    /// invocations per emission; the bus never de-duplicates.
    pub fn on<F, Fut>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register(Slot::Kind(kind), false, box_handler(handler))
    }

    /// Register a wildcard handler invoked for every emitted event.
    ///
    /// Ordering between kind-specific and wildcard handlers is not
    /// guaranteed beyond "both eventually run" within the same emission.
    pub fn on_all<F, Fut>(&self, handler: F) -> Subscription
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register(Slot::All, false, box_handler(handler))
    }

    /// Register a handler that is removed before its first invocation runs.
    ///
    /// A failure inside the handler cannot resurrect the subscription: the
    /// registration is gone by the time the handler executes.
    pub fn once<F, Fut>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register(Slot::Kind(kind), true, box_handler(handler))
    }

    fn register(&self, slot: Slot, once: bool, handler: BoxHandler) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let registration = Registration { id, once, handler };
        {
            let mut registry = lock_registry(&self.inner);
            match slot {
                Slot::Kind(kind) => registry.by_kind.entry(kind).or_default().push(registration),
                Slot::All => registry.wildcard.push(registration),
            }
        }
        Subscription {
            inner: Arc::downgrade(&self.inner),
            slot,
            id,
        }
    }

    /// Emit an event to every matching handler and await them all.
    ///
    /// Handlers run as independent tasks started together; the returned
    /// future resolves once every handler has finished, regardless of how
    /// many of them failed. Failures are logged here and go nowhere else.
    pub async fn emit(&self, event: Event) {
        let kind = event.kind();
        let handlers: Vec<(u64, BoxHandler)> = {
            let mut registry = lock_registry(&self.inner);
            let mut selected = Vec::new();
            if let Some(list) = registry.by_kind.get_mut(&kind) {
                selected.extend(list.iter().map(|r| (r.id, Arc::clone(&r.handler))));
                // `once` registrations come out of the registry before their
                // handler runs.
                list.retain(|r| !r.once);
            }
            selected.extend(registry.wildcard.iter().map(|r| (r.id, Arc::clone(&r.handler))));
            selected
        };

        debug!(event = %kind, handlers = handlers.len(), "dispatching event");

        let tasks: Vec<_> = handlers
            .into_iter()
            .map(|(id, handler)| {
                let delivered = event.clone();
                (id, tokio::spawn((handler.as_ref())(delivered)))
            })
            .collect();

        for (id, task) in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!(event = %kind, handler = id, error = %err, "event handler failed");
                }
                Err(join_err) => {
                    error!(event = %kind, handler = id, error = %join_err, "event handler panicked");
                }
            }
        }
    }

    /// Resolve on the first event of `kind` satisfying `predicate`, or fail
    /// with [`DomainError::Timeout`] once `timeout` elapses.
    ///
    /// The temporary subscription is torn down on success and on timeout.
    pub async fn wait_for<P>(
        &self,
        kind: EventKind,
        predicate: P,
        timeout: Duration,
    ) -> DomainResult<Event>
    where
        P: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = self.on(kind, move |event| {
            let matched = predicate(&event);
            let tx = tx.clone();
            async move {
                if matched {
                    // The waiter may already be gone; that is fine.
                    let _ = tx.send(event);
                }
                Ok(())
            }
        });

        let outcome = tokio::time::timeout(timeout, rx.recv()).await;
        subscription.unsubscribe();

        match outcome {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(DomainError::timeout(format!("wait for {kind} aborted"))),
            Err(_) => Err(DomainError::timeout(format!(
                "no {kind} event within {}ms",
                timeout.as_millis()
            ))),
        }
    }

    /// Number of kind-specific handlers currently registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        lock_registry(&self.inner)
            .by_kind
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Tear down handlers: all of them, or only those for one kind.
    pub fn remove_all_listeners(&self, kind: Option<EventKind>) {
        let mut registry = lock_registry(&self.inner);
        match kind {
            Some(kind) => {
                registry.by_kind.remove(&kind);
            }
            None => {
                registry.by_kind.clear();
                registry.wildcard.clear();
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let registry = lock_registry(&self.inner);
        f.debug_struct("EventBus")
            .field("kinds", &registry.by_kind.len())
            .field("wildcard", &registry.wildcard.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{
        EventPayload, HousekeepingCompleted, HousekeepingKind, ReservationDetails,
    };
    use chrono::NaiveDate;
    use std::sync::atomic::AtomicUsize;
    use villakit_core::{GuestId, PropertyId, ReservationId, TaskId};

    fn reservation_event(guests: u32) -> Event {
        Event::new(
            EventPayload::ReservationCreated(ReservationDetails {
                reservation_id: ReservationId::new(),
                property_id: PropertyId::new(),
                guest_id: GuestId::new(),
                check_in: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                check_out: NaiveDate::from_ymd_opt(2026, 7, 8).unwrap(),
                guests,
            }),
            "test",
        )
    }

    fn housekeeping_event() -> Event {
        Event::new(
            EventPayload::HousekeepingCompleted(HousekeepingCompleted {
                property_id: PropertyId::new(),
                task_id: TaskId::new(),
                kind: HousekeepingKind::PreArrival,
            }),
            "test",
        )
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test]
    async fn handler_fires_exactly_once_per_emission() {
        let bus = EventBus::new();
        let calls = counter();
        let seen = Arc::clone(&calls);
        bus.on(EventKind::ReservationCreated, move |_| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        bus.emit(reservation_event(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unsubscribed_handler_is_not_invoked() {
        let bus = EventBus::new();
        let calls = counter();
        let seen = Arc::clone(&calls);
        let sub = bus.on(EventKind::ReservationCreated, move |_| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        sub.unsubscribe();
        sub.unsubscribe(); // idempotent
        bus.emit(reservation_event(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(bus.listener_count(EventKind::ReservationCreated), 0);
    }

    #[tokio::test]
    async fn duplicate_registration_means_duplicate_delivery() {
        let bus = EventBus::new();
        let calls = counter();
        for _ in 0..2 {
            let seen = Arc::clone(&calls);
            bus.on(EventKind::ReservationCreated, move |_| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            });
        }

        bus.emit(reservation_event(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failing_handler_does_not_block_later_sibling() {
        let bus = EventBus::new();
        bus.on(EventKind::ReservationCreated, |_| async {
            anyhow::bail!("handler A exploded")
        });
        let calls = counter();
        let seen = Arc::clone(&calls);
        bus.on(EventKind::ReservationCreated, move |_| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        // Resolves despite the failure.
        bus.emit(reservation_event(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_handler_is_isolated() {
        let bus = EventBus::new();
        bus.on(EventKind::ReservationCreated, |_| async {
            panic!("handler A panicked")
        });
        let calls = counter();
        let seen = Arc::clone(&calls);
        bus.on(EventKind::ReservationCreated, move |_| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        bus.emit(reservation_event(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn once_fires_exactly_once_across_two_emissions() {
        let bus = EventBus::new();
        let calls = counter();
        let seen = Arc::clone(&calls);
        bus.once(EventKind::ReservationCreated, move |_| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        bus.emit(reservation_event(2)).await;
        bus.emit(reservation_event(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count(EventKind::ReservationCreated), 0);
    }

    #[tokio::test]
    async fn once_is_removed_even_when_its_handler_fails() {
        let bus = EventBus::new();
        bus.once(EventKind::ReservationCreated, |_| async {
            anyhow::bail!("boom")
        });

        bus.emit(reservation_event(2)).await;
        assert_eq!(bus.listener_count(EventKind::ReservationCreated), 0);
    }

    #[tokio::test]
    async fn wildcard_sees_every_kind() {
        let bus = EventBus::new();
        let calls = counter();
        let seen = Arc::clone(&calls);
        bus.on_all(move |_| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        bus.emit(reservation_event(2)).await;
        bus.emit(housekeeping_event()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn handler_may_re_enter_emit() {
        let bus = EventBus::new();
        let nested = counter();
        let seen = Arc::clone(&nested);
        bus.on(EventKind::HousekeepingCompleted, move |_| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        let rebus = bus.clone();
        bus.on(EventKind::ReservationCreated, move |_| {
            let rebus = rebus.clone();
            async move {
                rebus.emit(housekeeping_event()).await;
                Ok(())
            }
        });

        bus.emit(reservation_event(2)).await;
        assert_eq!(nested.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wait_for_resolves_on_first_matching_event() {
        let bus = EventBus::new();
        let emitter = bus.clone();
        tokio::spawn(async move {
            emitter.emit(reservation_event(2)).await;
            emitter.emit(reservation_event(4)).await;
        });

        let event = bus
            .wait_for(
                EventKind::ReservationCreated,
                |e| matches!(&e.payload, EventPayload::ReservationCreated(r) if r.guests == 4),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        match event.payload {
            EventPayload::ReservationCreated(r) => assert_eq!(r.guests, 4),
            other => panic!("unexpected payload: {other:?}"),
        }
        assert_eq!(bus.listener_count(EventKind::ReservationCreated), 0);
    }

    #[tokio::test]
    async fn wait_for_times_out_and_cleans_up() {
        let bus = EventBus::new();
        let err = bus
            .wait_for(
                EventKind::MaintenanceRequested,
                |_| true,
                Duration::from_millis(20),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Timeout(_)));
        assert_eq!(bus.listener_count(EventKind::MaintenanceRequested), 0);
    }

    #[tokio::test]
    async fn remove_all_listeners_tears_down_one_kind_or_everything() {
        let bus = EventBus::new();
        bus.on(EventKind::ReservationCreated, |_| async { Ok(()) });
        bus.on(EventKind::ReservationCheckIn, |_| async { Ok(()) });
        bus.on_all(|_| async { Ok(()) });

        bus.remove_all_listeners(Some(EventKind::ReservationCreated));
        assert_eq!(bus.listener_count(EventKind::ReservationCreated), 0);
        assert_eq!(bus.listener_count(EventKind::ReservationCheckIn), 1);

        bus.remove_all_listeners(None);
        assert_eq!(bus.listener_count(EventKind::ReservationCheckIn), 0);
    }
}
