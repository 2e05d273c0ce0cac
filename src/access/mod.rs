//! Access decision subsystem.
//!
//! # Data Flow
//! ```text
//! SessionLookup (from identity collaborator)
//!     → session.rs (Unavailable evaluated as Anonymous)
//! RouteCategory (from routing)
//!     → decision.rs (decision table: Allow | RedirectTo(target))
//!     → redirect.rs (target → Location, with return target for sign-in)
//!     → policy.rs (Verdict: category + decision + location)
//! ```
//!
//! # Design Decisions
//! - Pure: no I/O, no retries, session state is supplied not fetched
//! - Exhaustive match over (category, session) so a missing cell is a
//!   compile error
//! - Fail closed: an unavailable session never authenticates

pub mod decision;
pub mod policy;
pub mod redirect;
pub mod session;

pub use decision::{decide, decide_lookup, Decision, RedirectTarget};
pub use policy::{AccessPolicy, Verdict};
pub use redirect::{extract_return_target, RedirectPaths};
pub use session::{SessionLookup, SessionState, TenantId};
