// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use silo_access::AccessControl;
use silo_batch::{AccumulatorEntry, Batch};
use silo_events::{BatchId, ModelVersion, ProtocolError, RequestId};
use silo_oracle::DecryptionContext;

//////////////////////////////////////////////////////////////////////////////
// Owner controls
//////////////////////////////////////////////////////////////////////////////

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ProtocolError>")]
pub struct TransferOwner {
    pub caller: String,
    pub new_owner: String,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ProtocolError>")]
pub struct AddProvider {
    pub caller: String,
    pub provider: String,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ProtocolError>")]
pub struct RemoveProvider {
    pub caller: String,
    pub provider: String,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ProtocolError>")]
pub struct SetPaused {
    pub caller: String,
    pub paused: bool,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ProtocolError>")]
pub struct SetCooldown {
    pub caller: String,
    pub cooldown_secs: u64,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ProtocolError>")]
pub struct SetBatchCapacity {
    pub caller: String,
    pub limit: u64,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<ModelVersion, ProtocolError>")]
pub struct BumpModelVersion {
    pub caller: String,
}

//////////////////////////////////////////////////////////////////////////////
// Batch lifecycle
//////////////////////////////////////////////////////////////////////////////

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<BatchId, ProtocolError>")]
pub struct OpenBatch {
    pub actor: String,
    pub now: u64,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ProtocolError>")]
pub struct CloseBatch {
    pub actor: String,
    pub batch_id: BatchId,
    pub now: u64,
}

/// One submission: each element of `values` is an encrypted trait score;
/// the registry folds them into a single contribution before accumulation.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ProtocolError>")]
pub struct SubmitContribution {
    pub actor: String,
    pub batch_id: BatchId,
    pub values: Vec<Vec<u8>>,
    pub now: u64,
}

//////////////////////////////////////////////////////////////////////////////
// Decryption protocol
//////////////////////////////////////////////////////////////////////////////

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<RequestId, ProtocolError>")]
pub struct RequestDecryption {
    pub actor: String,
    pub batch_id: BatchId,
    pub now: u64,
}

/// The oracle's asynchronous answer. Trust anchors are the proof and the
/// binding hash, not the sender.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), ProtocolError>")]
pub struct OracleCallback {
    pub request_id: RequestId,
    pub cleartext: Vec<u8>,
    pub proof: Vec<u8>,
}

//////////////////////////////////////////////////////////////////////////////
// Queries
//////////////////////////////////////////////////////////////////////////////

#[derive(Message, Clone, Debug)]
#[rtype(result = "Option<Batch>")]
pub struct GetBatch {
    pub batch_id: BatchId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Option<AccumulatorEntry>")]
pub struct GetAccumulatorEntry {
    pub batch_id: BatchId,
    pub version: ModelVersion,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Option<DecryptionContext>")]
pub struct GetDecryptionContext {
    pub request_id: RequestId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Option<AccessControl>")]
pub struct GetAccessState;

#[derive(Message, Clone, Debug)]
#[rtype(result = "Option<ModelVersion>")]
pub struct GetModelVersion;
