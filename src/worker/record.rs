/*!
 * Turn Records
 *
 * Structured output of one action and the sinks that receive it.
 */

use crate::core::sync::Participant;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use tracing::warn;

/// One multiplication-table line emitted while holding the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnRecord {
    pub participant: Participant,
    pub multiplier: u64,
    pub index: u32,
    pub product: u64,
}

impl TurnRecord {
    pub fn new(participant: Participant, multiplier: u64, index: u32, product: u64) -> Self {
        Self {
            participant,
            multiplier,
            index,
            product,
        }
    }
}

impl fmt::Display for TurnRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} x {} = {}",
            self.participant, self.multiplier, self.index, self.product
        )
    }
}

/// How records are rendered on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `A 2 x 1 = 2`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Receiver of turn records
///
/// Called by the worker while it holds the turn, so the order records
/// arrive in is the global turn order.
pub trait RecordSink: Send + Sync {
    fn record(&self, record: &TurnRecord);
}

/// Writes records to stdout
#[derive(Debug, Default)]
pub struct StdoutSink {
    format: OutputFormat,
}

impl StdoutSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render `record` as one line on `out`
    fn write_record<W: Write>(&self, out: &mut W, record: &TurnRecord) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(out, "{}", record),
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, record)?;
                writeln!(out)
            }
        }
    }
}

impl RecordSink for StdoutSink {
    fn record(&self, record: &TurnRecord) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = self.write_record(&mut stdout, record) {
            warn!(error = %e, "failed to write record");
        }
    }
}

/// Collects records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<TurnRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far, in arrival order
    pub fn records(&self) -> Vec<TurnRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl RecordSink for MemorySink {
    fn record(&self, record: &TurnRecord) {
        self.records.lock().push(*record);
    }
}
