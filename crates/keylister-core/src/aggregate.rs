use tokio::sync::mpsc;
use tracing::debug;

use crate::cancel::CancelSignal;
use crate::error::{KeyListerError, Result};
use crate::types::{Report, WorkOutcome};

/// Fan-in side of the worker pool: reads exactly `expected` outcomes and
/// folds them into a [`Report`] in arrival order.
#[derive(Debug)]
pub struct Aggregator {
    expected: usize,
    received: usize,
    report: Report,
}

impl Aggregator {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            received: 0,
            report: Report::new(),
        }
    }

    /// Drain `outcomes` until `expected` have arrived.
    ///
    /// The first error raises `cancel` and is returned as-is. A channel that
    /// closes early yields `Cancelled` if `cancel` is raised, `Incomplete`
    /// otherwise.
    pub async fn collect(
        mut self,
        mut outcomes: mpsc::Receiver<Result<WorkOutcome>>,
        cancel: &CancelSignal,
    ) -> Result<Report> {
        while self.received < self.expected {
            match outcomes.recv().await {
                Some(Ok(outcome)) => {
                    self.received += 1;
                    self.report.push(outcome);
                }
                Some(Err(err)) => {
                    cancel.cancel();
                    return Err(err);
                }
                None if cancel.is_cancelled() => return Err(KeyListerError::Cancelled),
                None => {
                    return Err(KeyListerError::Incomplete {
                        expected: self.expected,
                        received: self.received,
                    })
                }
            }
        }
        debug!(
            outcomes = self.received,
            rows = self.report.len(),
            "all outcomes received"
        );
        Ok(self.report)
    }
}
