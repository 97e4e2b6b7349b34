//! Domain event model.
//!
//! The set of event kinds is closed, and the payload is a sum type keyed by
//! kind, so handlers pattern-match exhaustively instead of downcasting.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use villakit_core::{GuestId, PropertyId, ReservationId, TaskId};

/// Closed set of domain event kinds flowing through the bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ReservationCreated,
    ReservationCheckIn,
    ReservationCheckOut,
    HousekeepingCompleted,
    MaintenanceRequested,
}

impl EventKind {
    /// Stable dotted event name (e.g. `"reservation.created"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ReservationCreated => "reservation.created",
            EventKind::ReservationCheckIn => "reservation.checkin",
            EventKind::ReservationCheckOut => "reservation.checkout",
            EventKind::HousekeepingCompleted => "housekeeping.completed",
            EventKind::MaintenanceRequested => "maintenance.requested",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation facts carried by the reservation lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDetails {
    pub reservation_id: ReservationId,
    pub property_id: PropertyId,
    pub guest_id: GuestId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

/// Which housekeeping pass a task belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousekeepingKind {
    PreArrival,
    PostCheckout,
}

/// Payload of `housekeeping.completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousekeepingCompleted {
    pub property_id: PropertyId,
    pub task_id: TaskId,
    pub kind: HousekeepingKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenancePriority {
    Low,
    Normal,
    Urgent,
}

/// Payload of `maintenance.requested`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRequested {
    pub property_id: PropertyId,
    pub issue: String,
    pub priority: MaintenancePriority,
    /// Whether a guest is currently staying at the property. Urgent issues
    /// at occupied properties additionally notify the guest directly.
    pub property_occupied: bool,
}

/// Event payloads, one variant per [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    ReservationCreated(ReservationDetails),
    ReservationCheckIn(ReservationDetails),
    ReservationCheckOut(ReservationDetails),
    HousekeepingCompleted(HousekeepingCompleted),
    MaintenanceRequested(MaintenanceRequested),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::ReservationCreated(_) => EventKind::ReservationCreated,
            EventPayload::ReservationCheckIn(_) => EventKind::ReservationCheckIn,
            EventPayload::ReservationCheckOut(_) => EventKind::ReservationCheckOut,
            EventPayload::HousekeepingCompleted(_) => EventKind::HousekeepingCompleted,
            EventPayload::MaintenanceRequested(_) => EventKind::MaintenanceRequested,
        }
    }
}

/// A domain event: immutable once emitted, never mutated by handlers.
///
/// The kind is derived from the payload, so an event can never carry a
/// payload that disagrees with its advertised kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub payload: EventPayload,
    pub occurred_at: DateTime<Utc>,
    /// The module that emitted the event (e.g. `"booking-api"`).
    pub source: String,
}

impl Event {
    pub fn new(payload: EventPayload, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            payload,
            occurred_at: Utc::now(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}
