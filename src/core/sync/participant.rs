/*!
 * Participants
 *
 * The two parties of an alternation and the turn flag they share.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a two-party alternation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    A,
    B,
}

impl Participant {
    /// Both participants in turn order
    pub const ALL: [Participant; 2] = [Participant::A, Participant::B];

    /// The counterpart
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Slot index for per-participant state
    #[inline]
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// Thread name used when the driver spawns this worker
    pub fn thread_name(self) -> &'static str {
        match self {
            Self::A => "worker-a",
            Self::B => "worker-b",
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// How a participant left the alternation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Departure {
    /// Ran its whole sequence
    Finished,
    /// Stopped early; the counterpart must not wait for it again
    Failed,
}
