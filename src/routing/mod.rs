//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request target (path + optional query)
//!     → normalize.rs (strip query, collapse slashes, resolve dot segments)
//!     → matcher.rs (evaluate category patterns)
//!     → classifier.rs (priority order, Public fallback)
//!     → Return: exactly one RouteCategory
//!
//! Pattern Compilation (at startup / reload):
//!     RoutesConfig
//!     → Parse patterns per category
//!     → Freeze as immutable RouteClassifier
//! ```
//!
//! # Design Decisions
//! - Patterns compiled at startup, immutable at runtime
//! - No regex in hot path (segment matching only)
//! - Deterministic: same input always yields the same category

pub mod classifier;
pub mod matcher;
pub mod normalize;

pub use classifier::{RouteCategory, RouteClassifier};
pub use matcher::{Matcher, PathPattern, PatternError, PatternSet};
pub use normalize::{NormalizedPath, PathError};
