/*!
 * Core Module
 * Turn synchronization, limits, timeouts and error handling
 */

pub mod errors;
pub mod limits;
pub mod sync;
pub mod timeout;

// Re-export for convenience
pub use errors::*;
pub use sync::{Alternator, AlternatorConfig, Departure, Participant, StatsSnapshot, TurnGuard};
pub use timeout::TimeoutPolicy;
