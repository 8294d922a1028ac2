// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{BatchId, ModelVersion, RequestId};
use thiserror::Error;

/// Every way a silo mutation can be rejected.
///
/// Failed calls never mutate state, so each variant describes a rejection
/// the caller can reason about: authorization failures are permanent for
/// that caller, `Paused` and `TooFrequent` clear with time or an unpause,
/// lifecycle violations need different arguments or external state, and
/// the integrity variants guard the oracle callback path against replay
/// and inconsistent input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("caller {0} is not the owner")]
    NotOwner(String),

    #[error("caller {0} is not an authorized provider")]
    NotProvider(String),

    #[error("silo is paused")]
    Paused,

    #[error("action from {actor} too frequent, retry at {retry_at}")]
    TooFrequent { actor: String, retry_at: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} not found")]
    BatchNotFound(BatchId),

    #[error("{0} is closed")]
    BatchClosed(BatchId),

    #[error("{0} is not closed")]
    BatchNotClosed(BatchId),

    #[error("{0} is full")]
    BatchFull(BatchId),

    #[error("{batch_id} was opened under {stamped}, current version is {current}")]
    StaleBatch {
        batch_id: BatchId,
        stamped: ModelVersion,
        current: ModelVersion,
    },

    #[error("no contributions recorded for {0}")]
    NoContributions(BatchId),

    #[error("unknown or already processed request {0}")]
    UnknownRequest(RequestId),

    #[error("model version changed since {0} was issued")]
    VersionMismatch(RequestId),

    #[error("accumulator state changed since {0} was issued")]
    StateMismatch(RequestId),

    #[error("invalid decryption proof for {0}")]
    InvalidProof(RequestId),

    #[error("ciphertext arithmetic failed: {0}")]
    Cipher(String),
}

impl ProtocolError {
    /// Wrap a ciphertext-arithmetic failure from the cipher adaptor.
    pub fn cipher(err: impl std::fmt::Display) -> Self {
        ProtocolError::Cipher(err.to_string())
    }
}
