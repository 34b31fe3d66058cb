/*!
 * Actions
 *
 * The unit of work a worker performs once per turn.
 */

use super::record::TurnRecord;
use crate::core::errors::ActionError;
use crate::core::sync::Participant;

/// One side-effect-free step of a worker's sequence
///
/// `index` runs from 1 to the worker's round count. The returned record is
/// emitted by the worker while it still holds the turn.
pub trait Action: Send {
    fn perform(&mut self, participant: Participant, index: u32) -> Result<TurnRecord, ActionError>;
}

impl<F> Action for F
where
    F: FnMut(Participant, u32) -> Result<TurnRecord, ActionError> + Send,
{
    fn perform(&mut self, participant: Participant, index: u32) -> Result<TurnRecord, ActionError> {
        self(participant, index)
    }
}

/// Multiplication table line: `multiplier x index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableAction {
    multiplier: u64,
}

impl TableAction {
    pub const fn new(multiplier: u64) -> Self {
        Self { multiplier }
    }

    pub const fn multiplier(&self) -> u64 {
        self.multiplier
    }
}

impl Action for TableAction {
    fn perform(&mut self, participant: Participant, index: u32) -> Result<TurnRecord, ActionError> {
        let product = self.multiplier.checked_mul(u64::from(index)).ok_or_else(|| {
            ActionError::new(format!("{} x {} overflows", self.multiplier, index))
        })?;
        Ok(TurnRecord::new(participant, self.multiplier, index, product))
    }
}

/// Fault injection: delegates to `inner` but fails at one index
#[derive(Debug, Clone)]
pub struct FailAt<A> {
    inner: A,
    index: u32,
    message: String,
}

impl<A: Action> FailAt<A> {
    pub fn new(inner: A, index: u32, message: impl Into<String>) -> Self {
        Self {
            inner,
            index,
            message: message.into(),
        }
    }
}

impl<A: Action> Action for FailAt<A> {
    fn perform(&mut self, participant: Participant, index: u32) -> Result<TurnRecord, ActionError> {
        if index == self.index {
            return Err(ActionError::new(self.message.clone()));
        }
        self.inner.perform(participant, index)
    }
}
