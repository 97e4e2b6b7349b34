//! Stay-lifecycle tracking and event telemetry.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;

use villakit_core::{DomainResult, ReservationId};
use villakit_events::{Event, EventKind};

/// Analytics facade the orchestrator dispatches into. `track_event` also
/// backs the standing wildcard telemetry subscription, so it sees every
/// emission on the bus.
#[async_trait]
pub trait AnalyticsPort: Send + Sync {
    async fn track_stay_start(&self, reservation_id: ReservationId) -> DomainResult<()>;
    async fn track_stay_complete(&self, reservation_id: ReservationId) -> DomainResult<()>;
    async fn track_event(&self, event: &Event) -> DomainResult<()>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StayMilestone {
    Started,
    Completed,
}

/// In-memory recorder for tests and development.
#[derive(Debug, Default)]
pub struct InMemoryAnalytics {
    stays: Mutex<Vec<(ReservationId, StayMilestone)>>,
    seen: Mutex<Vec<EventKind>>,
}

impl InMemoryAnalytics {
    pub fn stays(&self) -> Vec<(ReservationId, StayMilestone)> {
        self.stays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn seen_kinds(&self) -> Vec<EventKind> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AnalyticsPort for InMemoryAnalytics {
    async fn track_stay_start(&self, reservation_id: ReservationId) -> DomainResult<()> {
        info!(reservation = %reservation_id, "stay started");
        self.stays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((reservation_id, StayMilestone::Started));
        Ok(())
    }

    async fn track_stay_complete(&self, reservation_id: ReservationId) -> DomainResult<()> {
        info!(reservation = %reservation_id, "stay completed");
        self.stays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((reservation_id, StayMilestone::Completed));
        Ok(())
    }

    async fn track_event(&self, event: &Event) -> DomainResult<()> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.kind());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use villakit_core::{GuestId, PropertyId};
    use villakit_events::{EventPayload, ReservationDetails};

    fn reservation_event(kind_start: bool) -> Event {
        let details = ReservationDetails {
            reservation_id: ReservationId::new(),
            property_id: PropertyId::new(),
            guest_id: GuestId::new(),
            check_in: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
            guests: 4,
        };
        let payload = if kind_start {
            EventPayload::ReservationCheckIn(details)
        } else {
            EventPayload::ReservationCheckOut(details)
        };
        Event::new(payload, "tests")
    }

    #[tokio::test]
    async fn stay_milestones_are_recorded_in_order() {
        let analytics = InMemoryAnalytics::default();
        let reservation = ReservationId::new();
        analytics.track_stay_start(reservation).await.unwrap();
        analytics.track_stay_complete(reservation).await.unwrap();

        let stays = analytics.stays();
        assert_eq!(
            stays,
            vec![
                (reservation, StayMilestone::Started),
                (reservation, StayMilestone::Completed),
            ]
        );
    }

    #[tokio::test]
    async fn every_tracked_event_kind_is_kept() {
        let analytics = InMemoryAnalytics::default();
        analytics
            .track_event(&reservation_event(true))
            .await
            .unwrap();
        analytics
            .track_event(&reservation_event(false))
            .await
            .unwrap();

        assert_eq!(
            analytics.seen_kinds(),
            vec![EventKind::ReservationCheckIn, EventKind::ReservationCheckOut]
        );
    }
}
