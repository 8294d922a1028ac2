// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{AccumulatorEntry, AccumulatorKey, Batch, EncryptedAccumulator};
use serde::{Deserialize, Serialize};
use silo_events::{BatchId, ModelVersion, ProtocolError};
use silo_fhe::ScoreCipher;
use std::collections::HashMap;

/// Exclusive owner of batch records, the model-version epoch, and the
/// encrypted accumulator.
///
/// Every mutator validates completely before touching state, so a failed
/// call observes nothing. Batch ids come from a monotonic counter and are
/// never reused.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchLedger {
    next_id: u64,
    version: ModelVersion,
    batches: HashMap<BatchId, Batch>,
    accumulator: EncryptedAccumulator,
}

impl Default for BatchLedger {
    fn default() -> Self {
        Self {
            next_id: 1,
            version: ModelVersion::default(),
            batches: HashMap::new(),
            accumulator: EncryptedAccumulator::new(),
        }
    }
}

impl BatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single accessor for the current global version.
    pub fn current_version(&self) -> ModelVersion {
        self.version
    }

    /// Advance the epoch, returning (previous, current). Batches stamped
    /// with the previous version are frozen for writes from here on.
    pub fn bump_version(&mut self) -> (ModelVersion, ModelVersion) {
        let previous = self.version;
        self.version = self.version.next();
        (previous, self.version)
    }

    pub fn batch(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(&id)
    }

    pub fn accumulator(&self) -> &EncryptedAccumulator {
        &self.accumulator
    }

    pub fn accumulator_entry(&self, key: &AccumulatorKey) -> Option<&AccumulatorEntry> {
        self.accumulator.entry(key)
    }

    /// Open a new batch stamped with the current version.
    pub fn open_batch(&mut self, opened_by: &str, now: u64) -> Batch {
        let id = BatchId::new(self.next_id);
        self.next_id += 1;

        let batch = Batch::open(id, self.version, opened_by, now);
        self.batches.insert(id, batch.clone());
        batch
    }

    /// Close a batch. Works regardless of version or contents.
    pub fn close_batch(&mut self, id: BatchId, now: u64) -> Result<Batch, ProtocolError> {
        let batch = self
            .batches
            .get_mut(&id)
            .ok_or(ProtocolError::BatchNotFound(id))?;
        batch.close(now)?;
        Ok(batch.clone())
    }

    /// Admit one contribution: fold the submitted field ciphertexts into a
    /// single value and add it to the (batch, current version) sum.
    ///
    /// Returns the stamped version and the accepted-contribution count
    /// after this submission.
    pub fn submit_contribution(
        &mut self,
        id: BatchId,
        values: &[Vec<u8>],
        capacity: u64,
        cipher: &ScoreCipher,
    ) -> Result<(ModelVersion, u64), ProtocolError> {
        let batch = self.batches.get(&id).ok_or(ProtocolError::BatchNotFound(id))?;

        if batch.is_closed() {
            return Err(ProtocolError::BatchClosed(id));
        }
        if batch.version != self.version {
            return Err(ProtocolError::StaleBatch {
                batch_id: id,
                stamped: batch.version,
                current: self.version,
            });
        }

        let key = AccumulatorKey::new(id, self.version);
        if self.accumulator.count(&key) >= capacity {
            return Err(ProtocolError::BatchFull(id));
        }

        let folded = cipher.fold(values).map_err(ProtocolError::cipher)?;
        let count = self.accumulator.add(key, &folded, cipher)?;
        Ok((self.version, count))
    }

    /// Resolve the data a decryption request reveals: the batch must be
    /// Closed and its stamped-version accumulator initialized. A version
    /// bump does not block this; the reveal targets the stamped version's
    /// data.
    pub fn reveal_target(&self, id: BatchId) -> Result<(ModelVersion, Vec<u8>), ProtocolError> {
        let batch = self.batches.get(&id).ok_or(ProtocolError::BatchNotFound(id))?;

        if !batch.is_closed() {
            return Err(ProtocolError::BatchNotClosed(id));
        }

        let key = AccumulatorKey::new(id, batch.version);
        let entry = self
            .accumulator
            .entry(&key)
            .ok_or(ProtocolError::NoContributions(id))?;

        Ok((batch.version, entry.sum.clone()))
    }
}
