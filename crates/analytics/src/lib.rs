//! `villakit-analytics` — stay-lifecycle and event telemetry.

pub mod tracker;

pub use tracker::{AnalyticsPort, InMemoryAnalytics, StayMilestone};
