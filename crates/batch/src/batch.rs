// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use silo_events::{BatchId, ModelVersion, ProtocolError};

/// Lifecycle phase of a batch. Closing is one-way; there is no transition
/// out of `Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchPhase {
    Open,
    Closed,
}

/// One batch of encrypted contributions.
///
/// The stamped version never changes after creation: a model-version bump
/// freezes the batch for writes but the record itself stays addressable
/// for closing and decryption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub version: ModelVersion,
    pub phase: BatchPhase,
    pub opened_by: String,
    pub opened_at: u64,
    pub closed_at: Option<u64>,
}

impl Batch {
    pub fn open(
        id: BatchId,
        version: ModelVersion,
        opened_by: impl Into<String>,
        opened_at: u64,
    ) -> Self {
        Self {
            id,
            version,
            phase: BatchPhase::Open,
            opened_by: opened_by.into(),
            opened_at,
            closed_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase == BatchPhase::Open
    }

    pub fn is_closed(&self) -> bool {
        self.phase == BatchPhase::Closed
    }

    /// Transition to `Closed`. Rejects every transition not in the table.
    pub fn close(&mut self, now: u64) -> Result<(), ProtocolError> {
        match self.phase {
            BatchPhase::Open => {
                self.phase = BatchPhase::Closed;
                self.closed_at = Some(now);
                Ok(())
            }
            BatchPhase::Closed => Err(ProtocolError::BatchClosed(self.id)),
        }
    }
}
