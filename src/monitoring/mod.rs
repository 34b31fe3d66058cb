/*!
 * Monitoring
 * Structured tracing setup and run correlation
 */

mod tracer;

pub use tracer::{generate_run_id, init_tracing, ENV_TRACE_JSON};
