//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Identity lookup:
//!     → timeouts.rs (enforce lookup deadline)
//!     → On expiry: lookup reported Unavailable, gate fails closed
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries in the gate; retry policy belongs to the collaborator's client

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded};
