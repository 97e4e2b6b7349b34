//! `villakit-operations` — housekeeping, property status, and maintenance.

pub mod desk;
pub mod jobs;

pub use desk::{HousekeepingTask, OperationsDesk, OperationsPort, PropertyStatus};
pub use jobs::{JobQueue, JobRequest, LoggingJobQueue};
