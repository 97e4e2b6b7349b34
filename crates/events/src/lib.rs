//! `villakit-events` — domain events and the in-process event bus.
//!
//! This crate is the orchestration substrate of the platform: a typed
//! publish/subscribe dispatcher that decouples the business modules
//! (pricing, messaging, operations, analytics) from one another.
//!
//! Events are **fire-and-forget facts**: immutable once emitted, consumed by
//! zero-to-many handlers, and never persisted by the bus itself.

pub mod bus;
pub mod event;

pub use bus::{DEFAULT_WAIT_TIMEOUT, EventBus, HandlerResult, Subscription};
pub use event::{
    Event, EventKind, EventPayload, HousekeepingCompleted, HousekeepingKind, MaintenancePriority,
    MaintenanceRequested, ReservationDetails,
};
