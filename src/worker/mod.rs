/*!
 * Workers
 *
 * A worker owns an ordered sequence of actions and performs them one turn
 * at a time. Workers never share state with each other; they interact only
 * through the alternator and the record sink.
 */

mod action;
mod record;
mod worker;

pub use action::{Action, FailAt, TableAction};
pub use record::{MemorySink, OutputFormat, RecordSink, StdoutSink, TurnRecord};
pub use worker::{Worker, WorkerSummary};
