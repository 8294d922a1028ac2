// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use silo_events::{BatchId, ModelVersion, ProtocolError, RequestId};
use std::collections::HashMap;

/// Phase of one decryption request. Completion is one-way; a completed
/// context can never be consumed again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPhase {
    Requested,
    Completed,
}

/// Everything recorded when a reveal is requested, checked again when the
/// oracle answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionContext {
    pub batch_id: BatchId,
    /// The version whose accumulated data this request reveals: the
    /// batch's stamped version at request time.
    pub version: ModelVersion,
    pub binding_hash: [u8; 32],
    pub requester: String,
    pub phase: RequestPhase,
}

impl DecryptionContext {
    pub fn new(
        batch_id: BatchId,
        version: ModelVersion,
        binding_hash: [u8; 32],
        requester: &str,
    ) -> Self {
        Self {
            batch_id,
            version,
            binding_hash,
            requester: requester.to_string(),
            phase: RequestPhase::Requested,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.phase == RequestPhase::Requested
    }
}

/// Exclusive owner of decryption contexts, keyed by the transport's
/// request id. Contexts are never removed: a completed context is the
/// replay guard for its request id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DecryptionBook {
    contexts: HashMap<RequestId, DecryptionContext>,
}

impl DecryptionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, request_id: RequestId, context: DecryptionContext) {
        self.contexts.insert(request_id, context);
    }

    pub fn context(&self, request_id: RequestId) -> Option<&DecryptionContext> {
        self.contexts.get(&request_id)
    }

    /// The pending context for a callback, or UnknownRequest when the id
    /// was never issued or has already been consumed.
    pub fn pending(&self, request_id: RequestId) -> Result<&DecryptionContext, ProtocolError> {
        self.contexts
            .get(&request_id)
            .filter(|ctx| ctx.is_pending())
            .ok_or(ProtocolError::UnknownRequest(request_id))
    }

    /// Consume a pending context. One-way: a second completion for the
    /// same id fails UnknownRequest.
    pub fn complete(&mut self, request_id: RequestId) -> Result<(), ProtocolError> {
        let context = self
            .contexts
            .get_mut(&request_id)
            .filter(|ctx| ctx.is_pending())
            .ok_or(ProtocolError::UnknownRequest(request_id))?;
        context.phase = RequestPhase::Completed;
        Ok(())
    }
}
