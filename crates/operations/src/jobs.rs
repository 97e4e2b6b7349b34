//! Background job submission.
//!
//! Execution, retries, and dead-lettering belong to an external worker; the
//! only contract here is "submit an item, get an identifier back".

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use villakit_core::{DomainResult, JobId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub name: String,
    pub payload: Value,
}

pub trait JobQueue: Send + Sync {
    fn submit(&self, job: JobRequest) -> DomainResult<JobId>;
}

/// Development queue: accepts everything, executes nothing.
#[derive(Debug, Default)]
pub struct LoggingJobQueue {
    accepted: Mutex<Vec<(JobId, JobRequest)>>,
}

impl LoggingJobQueue {
    pub fn accepted(&self) -> Vec<(JobId, JobRequest)> {
        self.accepted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl JobQueue for LoggingJobQueue {
    fn submit(&self, job: JobRequest) -> DomainResult<JobId> {
        let id = JobId::new();
        info!(job = %id, name = %job.name, "job accepted");
        self.accepted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, job));
        Ok(id)
    }
}
