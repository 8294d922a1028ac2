// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use silo_events::{BatchId, ModelVersion, ProtocolError};
use silo_fhe::ScoreCipher;
use std::collections::HashMap;
use std::fmt;

/// Key of one running sum: accumulated state is addressed jointly by batch
/// and model version so a version bump leaves older sums immutable under
/// their original key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccumulatorKey {
    pub batch_id: BatchId,
    pub version: ModelVersion,
}

impl AccumulatorKey {
    pub fn new(batch_id: BatchId, version: ModelVersion) -> Self {
        Self { batch_id, version }
    }
}

impl fmt::Display for AccumulatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.batch_id, self.version)
    }
}

/// A running homomorphic sum and the number of contributions folded in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatorEntry {
    pub sum: Vec<u8>,
    pub count: u64,
}

/// Opaque-ciphertext arithmetic surface: running sums change only through
/// `add`. Entries are materialized lazily; a key with no accepted
/// contribution has no observable state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EncryptedAccumulator {
    entries: HashMap<AccumulatorKey, AccumulatorEntry>,
}

impl EncryptedAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, key: &AccumulatorKey) -> Option<&AccumulatorEntry> {
        self.entries.get(key)
    }

    pub fn count(&self, key: &AccumulatorKey) -> u64 {
        self.entries.get(key).map(|e| e.count).unwrap_or(0)
    }

    pub fn is_initialized(&self, key: &AccumulatorKey) -> bool {
        self.entries.contains_key(key)
    }

    /// The running sum for `key`, or a fresh encrypted zero for an absent
    /// key. Pure with respect to observable state: nothing is stored until
    /// the first addition commits it.
    pub fn ensure_initialized(
        &self,
        key: &AccumulatorKey,
        cipher: &ScoreCipher,
    ) -> Result<Vec<u8>, ProtocolError> {
        match self.entries.get(key) {
            Some(entry) => Ok(entry.sum.clone()),
            None => cipher.encrypted_zero().map_err(ProtocolError::cipher),
        }
    }

    /// Fold one contribution into the running sum for `key`, zero-
    /// initializing it first if absent. Nothing is stored until both the
    /// zero construction and the addition have succeeded.
    pub fn add(
        &mut self,
        key: AccumulatorKey,
        contribution: &[u8],
        cipher: &ScoreCipher,
    ) -> Result<u64, ProtocolError> {
        let sum = self.ensure_initialized(&key, cipher)?;
        let sum = cipher
            .add(&sum, contribution)
            .map_err(ProtocolError::cipher)?;

        let count = self.count(&key) + 1;
        self.entries.insert(key, AccumulatorEntry { sum, count });
        Ok(count)
    }
}
