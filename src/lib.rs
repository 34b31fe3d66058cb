/*!
 * Turn Alternator Library
 * Strict two-party turn alternation exposed as a library
 */

pub mod core;
pub mod driver;
pub mod monitoring;
pub mod worker;

// Re-exports
pub use crate::core::errors::*;
pub use crate::core::sync::{Alternator, AlternatorConfig, Departure, Participant, TurnGuard};
pub use crate::core::timeout::TimeoutPolicy;
pub use driver::{run, Driver, DriverConfig, ExecutorKind, RunReport};
pub use monitoring::init_tracing;
pub use worker::{Action, MemorySink, OutputFormat, RecordSink, TableAction, TurnRecord, Worker};
