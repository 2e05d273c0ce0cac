//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign / propagate request ID)
//!     → gate.rs (session lookup → classify → decide)
//!         → redirect: response.rs (307 + Location)
//!         → allow:    proxy.rs (forward unchanged to upstream)
//!     → Send to client
//! ```

pub mod gate;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use gate::{gate_middleware, GateState};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{GateServer, ServerError};
