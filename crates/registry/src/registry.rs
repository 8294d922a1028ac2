// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    AddProvider, BumpModelVersion, CloseBatch, GetAccessState, GetAccumulatorEntry, GetBatch,
    GetDecryptionContext, GetModelVersion, OpenBatch, OracleCallback, RemoveProvider,
    RequestDecryption, SetBatchCapacity, SetCooldown, SetPaused, SubmitContribution, TransferOwner,
};
use actix::prelude::*;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use silo_access::{AccessControl, RateLimiter};
use silo_batch::{AccumulatorEntry, AccumulatorKey, Batch, BatchLedger};
use silo_config::SiloConfig;
use silo_data::{Checkpoint, FromSnapshotWithParams, Repository, Snapshot};
use silo_events::{
    BatchClosed, BatchId, BatchOpened, BatchSizeLimitUpdated, ContributionSubmitted,
    CooldownUpdated, DecryptionCompleted, DecryptionRequested, EventBus, ModelVersion,
    ModelVersionUpdated, OwnershipTransferred, Paused, ProtocolError, ProviderAdded,
    ProviderRemoved, RequestId, SiloEvent, Subscribe, Unpaused,
};
use silo_fhe::{decode_score, ScoreCipher};
use silo_oracle::{binding_hash, DecryptionBook, DecryptionContext, OracleTransport, ProofVerifier};
use std::sync::Arc;
use tracing::{info, warn};

/// The silo protocol core.
///
/// One actor owns every piece of protocol state, so the mailbox provides
/// the serialized-transition guarantee the protocol relies on: a mutating
/// handler runs from validation through mutation without interleaving.
/// Handlers validate completely (including all fallible ciphertext
/// arithmetic) before any state changes, and the rate limiter records an
/// action only once the rest of the operation has succeeded, so a failed
/// call leaves no trace anywhere.
///
/// The decryption round trip is the one asynchronous edge: the transport
/// dispatch is fire-and-forget and the oracle answers later with an
/// `OracleCallback` message.
pub struct SiloRegistry {
    bus: Addr<EventBus<SiloEvent>>,
    cipher: Arc<ScoreCipher>,
    transport: Box<dyn OracleTransport>,
    verifier: Box<dyn ProofVerifier>,
    instance_id: String,
    access: AccessControl,
    limiter: RateLimiter,
    ledger: BatchLedger,
    requests: DecryptionBook,
    store: Repository<SiloRegistrySnapshot>,
}

pub struct SiloRegistryParams {
    pub bus: Addr<EventBus<SiloEvent>>,
    pub cipher: Arc<ScoreCipher>,
    pub transport: Box<dyn OracleTransport>,
    pub verifier: Box<dyn ProofVerifier>,
    pub config: SiloConfig,
    pub store: Repository<SiloRegistrySnapshot>,
}

impl SiloRegistry {
    pub fn new(params: SiloRegistryParams) -> Self {
        let config = &params.config;
        Self {
            access: AccessControl::new(
                &config.owner,
                config.cooldown_secs,
                config.batch_capacity,
            ),
            limiter: RateLimiter::new(),
            ledger: BatchLedger::new(),
            requests: DecryptionBook::new(),
            instance_id: config.instance_id.clone(),
            bus: params.bus,
            cipher: params.cipher,
            transport: params.transport,
            verifier: params.verifier,
            store: params.store,
        }
    }

    /// Start the registry, hydrated from its repository when a snapshot
    /// exists, and subscribe it to bus shutdown.
    pub async fn attach(params: SiloRegistryParams) -> Result<Addr<Self>> {
        let bus = params.bus.clone();
        let addr = Self::load(params).await?.start();
        bus.do_send(Subscribe::new("Shutdown", addr.clone().recipient()));
        Ok(addr)
    }

    pub async fn load(params: SiloRegistryParams) -> Result<Self> {
        Ok(if let Some(snapshot) = params.store.read().await? {
            info!("Loading registry from snapshot");
            Self::from_snapshot(params, snapshot).await?
        } else {
            info!("Loading registry from params");
            Self::new(params)
        })
    }

    fn publish(&self, event: impl Into<SiloEvent>) {
        self.bus.do_send(event.into())
    }
}

impl Actor for SiloRegistry {
    type Context = Context<Self>;
}

#[derive(Serialize, Deserialize)]
pub struct SiloRegistrySnapshot {
    access: AccessControl,
    limiter: RateLimiter,
    ledger: BatchLedger,
    requests: DecryptionBook,
}

impl Snapshot for SiloRegistry {
    type Snapshot = SiloRegistrySnapshot;
    fn snapshot(&self) -> Result<Self::Snapshot> {
        Ok(SiloRegistrySnapshot {
            access: self.access.clone(),
            limiter: self.limiter.clone(),
            ledger: self.ledger.clone(),
            requests: self.requests.clone(),
        })
    }
}

impl Checkpoint for SiloRegistry {
    fn repository(&self) -> &Repository<Self::Snapshot> {
        &self.store
    }
}

#[async_trait]
impl FromSnapshotWithParams for SiloRegistry {
    type Params = SiloRegistryParams;
    async fn from_snapshot(params: Self::Params, snapshot: Self::Snapshot) -> Result<Self> {
        Ok(Self {
            access: snapshot.access,
            limiter: snapshot.limiter,
            ledger: snapshot.ledger,
            requests: snapshot.requests,
            instance_id: params.config.instance_id.clone(),
            bus: params.bus,
            cipher: params.cipher,
            transport: params.transport,
            verifier: params.verifier,
            store: params.store,
        })
    }
}

//////////////////////////////////////////////////////////////////////////////
// Owner controls
//////////////////////////////////////////////////////////////////////////////

impl Handler<TransferOwner> for SiloRegistry {
    type Result = Result<(), ProtocolError>;

    fn handle(&mut self, msg: TransferOwner, _: &mut Self::Context) -> Self::Result {
        let previous_owner = self.access.transfer_owner(&msg.caller, &msg.new_owner)?;
        self.checkpoint();
        self.publish(OwnershipTransferred {
            previous_owner,
            new_owner: msg.new_owner,
        });
        Ok(())
    }
}

impl Handler<AddProvider> for SiloRegistry {
    type Result = Result<(), ProtocolError>;

    fn handle(&mut self, msg: AddProvider, _: &mut Self::Context) -> Self::Result {
        // idempotent: re-adding an authorized provider is a silent no-op
        if self.access.add_provider(&msg.caller, &msg.provider)? {
            self.checkpoint();
            self.publish(ProviderAdded {
                provider: msg.provider,
            });
        }
        Ok(())
    }
}

impl Handler<RemoveProvider> for SiloRegistry {
    type Result = Result<(), ProtocolError>;

    fn handle(&mut self, msg: RemoveProvider, _: &mut Self::Context) -> Self::Result {
        if self.access.remove_provider(&msg.caller, &msg.provider)? {
            self.checkpoint();
            self.publish(ProviderRemoved {
                provider: msg.provider,
            });
        }
        Ok(())
    }
}

impl Handler<SetPaused> for SiloRegistry {
    type Result = Result<(), ProtocolError>;

    fn handle(&mut self, msg: SetPaused, _: &mut Self::Context) -> Self::Result {
        if self.access.set_paused(&msg.caller, msg.paused)? {
            self.checkpoint();
            if msg.paused {
                self.publish(Paused { by: msg.caller });
            } else {
                self.publish(Unpaused { by: msg.caller });
            }
        }
        Ok(())
    }
}

impl Handler<SetCooldown> for SiloRegistry {
    type Result = Result<(), ProtocolError>;

    fn handle(&mut self, msg: SetCooldown, _: &mut Self::Context) -> Self::Result {
        let previous_secs = self.access.set_cooldown(&msg.caller, msg.cooldown_secs)?;
        self.checkpoint();
        self.publish(CooldownUpdated {
            previous_secs,
            current_secs: msg.cooldown_secs,
        });
        Ok(())
    }
}

impl Handler<SetBatchCapacity> for SiloRegistry {
    type Result = Result<(), ProtocolError>;

    fn handle(&mut self, msg: SetBatchCapacity, _: &mut Self::Context) -> Self::Result {
        let previous = self.access.set_batch_capacity(&msg.caller, msg.limit)?;
        self.checkpoint();
        self.publish(BatchSizeLimitUpdated {
            previous,
            current: msg.limit,
        });
        Ok(())
    }
}

impl Handler<BumpModelVersion> for SiloRegistry {
    type Result = Result<ModelVersion, ProtocolError>;

    fn handle(&mut self, msg: BumpModelVersion, _: &mut Self::Context) -> Self::Result {
        self.access.ensure_owner(&msg.caller)?;
        let (previous, current) = self.ledger.bump_version();
        self.checkpoint();
        self.publish(ModelVersionUpdated { previous, current });
        Ok(current)
    }
}

//////////////////////////////////////////////////////////////////////////////
// Batch lifecycle
//////////////////////////////////////////////////////////////////////////////

impl Handler<OpenBatch> for SiloRegistry {
    type Result = Result<BatchId, ProtocolError>;

    fn handle(&mut self, msg: OpenBatch, _: &mut Self::Context) -> Self::Result {
        self.access.ensure_provider(&msg.actor)?;
        self.access.ensure_unpaused()?;
        self.limiter
            .check(&msg.actor, msg.now, self.access.cooldown_secs())?;

        let batch = self.ledger.open_batch(&msg.actor, msg.now);
        self.limiter.record(&msg.actor, msg.now);
        self.checkpoint();

        self.publish(BatchOpened {
            batch_id: batch.id,
            version: batch.version,
            opened_by: msg.actor,
            opened_at: msg.now,
        });
        Ok(batch.id)
    }
}

impl Handler<CloseBatch> for SiloRegistry {
    type Result = Result<(), ProtocolError>;

    fn handle(&mut self, msg: CloseBatch, _: &mut Self::Context) -> Self::Result {
        self.access.ensure_provider(&msg.actor)?;
        self.access.ensure_unpaused()?;

        // no rate limit, capacity or version gate: stale and empty batches
        // may always be closed
        self.ledger.close_batch(msg.batch_id, msg.now)?;
        self.checkpoint();

        self.publish(BatchClosed {
            batch_id: msg.batch_id,
            closed_by: msg.actor,
            closed_at: msg.now,
        });
        Ok(())
    }
}

impl Handler<SubmitContribution> for SiloRegistry {
    type Result = Result<(), ProtocolError>;

    fn handle(&mut self, msg: SubmitContribution, _: &mut Self::Context) -> Self::Result {
        self.access.ensure_provider(&msg.actor)?;
        self.access.ensure_unpaused()?;
        self.limiter
            .check(&msg.actor, msg.now, self.access.cooldown_secs())?;

        let (version, count) = self.ledger.submit_contribution(
            msg.batch_id,
            &msg.values,
            self.access.batch_capacity(),
            &self.cipher,
        )?;
        self.limiter.record(&msg.actor, msg.now);
        self.checkpoint();

        self.publish(ContributionSubmitted {
            batch_id: msg.batch_id,
            version,
            provider: msg.actor,
            count,
        });
        Ok(())
    }
}

//////////////////////////////////////////////////////////////////////////////
// Decryption protocol
//////////////////////////////////////////////////////////////////////////////

impl Handler<RequestDecryption> for SiloRegistry {
    type Result = Result<RequestId, ProtocolError>;

    fn handle(&mut self, msg: RequestDecryption, _: &mut Self::Context) -> Self::Result {
        // any caller may request a reveal of a closed batch
        self.access.ensure_unpaused()?;
        self.limiter
            .check(&msg.actor, msg.now, self.access.cooldown_secs())?;

        let (version, sum) = self.ledger.reveal_target(msg.batch_id)?;
        let hash = binding_hash(&self.instance_id, msg.batch_id, version, &sum);

        let request_id = self.transport.submit_for_decryption(sum);
        self.requests.register(
            request_id,
            DecryptionContext::new(msg.batch_id, version, hash, &msg.actor),
        );
        self.limiter.record(&msg.actor, msg.now);
        self.checkpoint();

        self.publish(DecryptionRequested {
            request_id,
            batch_id: msg.batch_id,
            version,
            requested_by: msg.actor,
        });
        Ok(request_id)
    }
}

impl Handler<OracleCallback> for SiloRegistry {
    type Result = Result<(), ProtocolError>;

    fn handle(&mut self, msg: OracleCallback, _: &mut Self::Context) -> Self::Result {
        let context = self.requests.pending(msg.request_id)?.clone();

        // the batch must still be what the request was issued against
        let batch = self
            .ledger
            .batch(context.batch_id)
            .ok_or(ProtocolError::BatchNotFound(context.batch_id))?;
        if !batch.is_closed() {
            return Err(ProtocolError::BatchNotClosed(context.batch_id));
        }
        if batch.version != context.version {
            return Err(ProtocolError::VersionMismatch(msg.request_id));
        }

        // the accumulator must hash to exactly what was dispatched
        let key = AccumulatorKey::new(context.batch_id, context.version);
        let entry = self
            .ledger
            .accumulator_entry(&key)
            .ok_or(ProtocolError::StateMismatch(msg.request_id))?;
        let current = binding_hash(&self.instance_id, context.batch_id, context.version, &entry.sum);
        if current != context.binding_hash {
            return Err(ProtocolError::StateMismatch(msg.request_id));
        }

        // a failed proof leaves the context pending so the oracle may retry
        if !self
            .verifier
            .verify(msg.request_id, &msg.cleartext, &msg.proof)
        {
            warn!(request_id = %msg.request_id, "rejected oracle callback with invalid proof");
            return Err(ProtocolError::InvalidProof(msg.request_id));
        }

        let score_total = decode_score(&msg.cleartext).map_err(ProtocolError::cipher)?;

        self.requests.complete(msg.request_id)?;
        self.checkpoint();

        self.publish(DecryptionCompleted {
            request_id: msg.request_id,
            batch_id: context.batch_id,
            score_total,
        });
        Ok(())
    }
}

//////////////////////////////////////////////////////////////////////////////
// Queries
//////////////////////////////////////////////////////////////////////////////

impl Handler<GetBatch> for SiloRegistry {
    type Result = Option<Batch>;

    fn handle(&mut self, msg: GetBatch, _: &mut Self::Context) -> Self::Result {
        self.ledger.batch(msg.batch_id).cloned()
    }
}

impl Handler<GetAccumulatorEntry> for SiloRegistry {
    type Result = Option<AccumulatorEntry>;

    fn handle(&mut self, msg: GetAccumulatorEntry, _: &mut Self::Context) -> Self::Result {
        let key = AccumulatorKey::new(msg.batch_id, msg.version);
        self.ledger.accumulator_entry(&key).cloned()
    }
}

impl Handler<GetDecryptionContext> for SiloRegistry {
    type Result = Option<DecryptionContext>;

    fn handle(&mut self, msg: GetDecryptionContext, _: &mut Self::Context) -> Self::Result {
        self.requests.context(msg.request_id).cloned()
    }
}

impl Handler<GetAccessState> for SiloRegistry {
    type Result = Option<AccessControl>;

    fn handle(&mut self, _: GetAccessState, _: &mut Self::Context) -> Self::Result {
        Some(self.access.clone())
    }
}

impl Handler<GetModelVersion> for SiloRegistry {
    type Result = Option<ModelVersion>;

    fn handle(&mut self, _: GetModelVersion, _: &mut Self::Context) -> Self::Result {
        Some(self.ledger.current_version())
    }
}

//////////////////////////////////////////////////////////////////////////////
// Bus events
//////////////////////////////////////////////////////////////////////////////

impl Handler<SiloEvent> for SiloRegistry {
    type Result = ();

    fn handle(&mut self, msg: SiloEvent, ctx: &mut Self::Context) -> Self::Result {
        if let SiloEvent::Shutdown { .. } = msg {
            info!("Registry shutting down");
            ctx.stop()
        }
    }
}
