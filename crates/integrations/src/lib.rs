//! `villakit-integrations` — contracts for the external PMS collaborator.
//!
//! The property management system is an external fact source: the core asks
//! it for property details and per-night availability, and nothing else. Its
//! internals (HTTP client, caching, rate limits) live outside this workspace.

pub mod pms;

pub use pms::{AvailabilityDay, InMemoryPms, PmsClient, PropertyFacts};
