/*!
 * Alternation Limits and Constants
 *
 * Centralized location for round counts, table multipliers and timeouts.
 * Grouped by domain so drivers, tests and benches agree on the defaults.
 */

use std::time::Duration;

// =============================================================================
// ROUNDS
// =============================================================================

/// Actions per worker in the default run
pub const DEFAULT_ROUNDS: u32 = 10;

/// Upper bound accepted from configuration
/// Keeps a mistyped env value from producing an effectively endless run
pub const MAX_ROUNDS: u32 = 1_000_000;

// =============================================================================
// MULTIPLICATION TABLES
// =============================================================================

/// Multiplier used by worker A
pub const DEFAULT_MULTIPLIER_A: u64 = 2;

/// Multiplier used by worker B
pub const DEFAULT_MULTIPLIER_B: u64 = 4;

// =============================================================================
// TIMEOUTS
// =============================================================================

/// Turn wait bound for the hardened configuration (5s)
/// A counterpart silent for this long is treated as stalled
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(5);

/// Grace period for pool termination before forced shutdown (10s)
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

// =============================================================================
// EXECUTOR
// =============================================================================

/// Blocking threads in the fixed worker pool, one per participant
pub const POOL_SIZE: usize = 2;
