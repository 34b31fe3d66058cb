/*!
 * Turn Synchronization
 *
 * Strict two-party alternation over a mutex + condvar monitor:
 * - `Alternator` owns the turn flag and the wait/notify primitive
 * - `TurnGuard` releases (or abandons) a held turn on every exit path
 * - `AlternatorConfig` selects who moves first and whether waits are bounded
 *
 * # Guarantees
 *
 * - Held-turn intervals strictly alternate, starting with the first participant
 * - Waiting workers block on the condvar; nothing spins
 * - A failed participant never leaves its counterpart waiting forever
 */

mod alternator;
mod config;
mod guard;
mod participant;
mod stats;

pub use alternator::Alternator;
pub use config::AlternatorConfig;
pub use guard::TurnGuard;
pub use participant::{Departure, Participant};
pub use stats::StatsSnapshot;
