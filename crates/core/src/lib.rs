//! `villakit-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model, and currency helpers
//! shared by the pricing and operations modules.

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{GuestId, JobId, PropertyId, ReservationId, TaskId};
pub use money::round_cents;
