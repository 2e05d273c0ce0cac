//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the identity lookup, the gate's only suspension point
//! - Cancel the wrapped future cleanly on expiry (it is dropped)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors so they can be counted

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// The wrapped operation did not finish in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation exceeded deadline of {0:?}")]
pub struct DeadlineExceeded(pub Duration);

/// Run `fut` with an upper bound on its duration.
pub async fn with_deadline<F>(deadline: Duration, fut: F) -> Result<F::Output, DeadlineExceeded>
where
    F: Future,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| DeadlineExceeded(deadline))
}
