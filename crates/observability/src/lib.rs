//! Process-wide tracing/logging setup shared by every villakit surface.

pub mod tracing;

pub use tracing::{init, init_dev};
