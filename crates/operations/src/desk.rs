//! Housekeeping scheduling, property status, and maintenance routing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use villakit_core::{DomainResult, PropertyId, ReservationId, TaskId};
use villakit_events::{HousekeepingKind, MaintenancePriority, MaintenanceRequested};

use crate::jobs::{JobQueue, JobRequest};

/// Where a property sits in the turnover cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Occupied,
    Ready,
    Cleaning,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousekeepingTask {
    pub id: TaskId,
    pub reservation_id: ReservationId,
    pub kind: HousekeepingKind,
    pub created_at: DateTime<Utc>,
}

/// Operations facade the orchestrator dispatches into.
#[async_trait]
pub trait OperationsPort: Send + Sync {
    async fn schedule_pre_arrival_housekeeping(
        &self,
        reservation_id: ReservationId,
    ) -> DomainResult<TaskId>;
    async fn schedule_post_checkout_housekeeping(
        &self,
        reservation_id: ReservationId,
    ) -> DomainResult<TaskId>;
    async fn update_property_status(
        &self,
        property_id: PropertyId,
        status: PropertyStatus,
    ) -> DomainResult<()>;
    async fn notify_maintenance_team(&self, request: &MaintenanceRequested) -> DomainResult<()>;
}

/// In-memory operations desk for tests and development. Scheduling a task
/// records it and hands a job to the queue; the actual cleaner dispatch is
/// the worker's problem.
pub struct OperationsDesk {
    tasks: Mutex<HashMap<TaskId, HousekeepingTask>>,
    statuses: Mutex<HashMap<PropertyId, PropertyStatus>>,
    jobs: Arc<dyn JobQueue>,
}

impl OperationsDesk {
    pub fn new(jobs: Arc<dyn JobQueue>) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            jobs,
        }
    }

    fn schedule(
        &self,
        reservation_id: ReservationId,
        kind: HousekeepingKind,
    ) -> DomainResult<TaskId> {
        let task = HousekeepingTask {
            id: TaskId::new(),
            reservation_id,
            kind,
            created_at: Utc::now(),
        };
        let id = task.id;
        self.jobs.submit(JobRequest {
            name: "housekeeping".to_string(),
            payload: json!({
                "task_id": id,
                "reservation_id": reservation_id,
                "kind": kind,
            }),
        })?;
        info!(task = %id, reservation = %reservation_id, ?kind, "housekeeping scheduled");
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, task);
        Ok(id)
    }

    pub fn task(&self, id: TaskId) -> Option<HousekeepingTask> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn property_status(&self, property_id: PropertyId) -> Option<PropertyStatus> {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&property_id)
            .copied()
    }
}

#[async_trait]
impl OperationsPort for OperationsDesk {
    async fn schedule_pre_arrival_housekeeping(
        &self,
        reservation_id: ReservationId,
    ) -> DomainResult<TaskId> {
        self.schedule(reservation_id, HousekeepingKind::PreArrival)
    }

    async fn schedule_post_checkout_housekeeping(
        &self,
        reservation_id: ReservationId,
    ) -> DomainResult<TaskId> {
        self.schedule(reservation_id, HousekeepingKind::PostCheckout)
    }

    async fn update_property_status(
        &self,
        property_id: PropertyId,
        status: PropertyStatus,
    ) -> DomainResult<()> {
        info!(property = %property_id, ?status, "property status updated");
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(property_id, status);
        Ok(())
    }

    async fn notify_maintenance_team(&self, request: &MaintenanceRequested) -> DomainResult<()> {
        if request.priority == MaintenancePriority::Urgent {
            warn!(
                property = %request.property_id,
                issue = %request.issue,
                occupied = request.property_occupied,
                "urgent maintenance request"
            );
        } else {
            info!(
                property = %request.property_id,
                issue = %request.issue,
                "maintenance request routed"
            );
        }
        self.jobs.submit(JobRequest {
            name: "maintenance".to_string(),
            payload: json!({
                "property_id": request.property_id,
                "issue": request.issue,
                "priority": request.priority,
            }),
        })?;
        Ok(())
    }
}
