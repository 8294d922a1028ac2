// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod common;

use anyhow::Result;
use common::*;
use silo_test_helpers::TakeCallback;
use silo_events::{ModelVersion, ProtocolError, RequestId, SiloEvent};
use silo_registry::{
    BumpModelVersion, CloseBatch, GetAccumulatorEntry, GetBatch, GetDecryptionContext, OpenBatch,
    OracleCallback, RequestDecryption, SetBatchCapacity, SubmitContribution,
};

#[actix::test]
async fn full_round_trip_reveals_the_batch_sum() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;

    // two submissions, each folding (yield, disease resistance)
    silo.registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[3, 4]),
            now: 110,
        })
        .await??;
    silo.registry
        .send(SubmitContribution {
            actor: LAB_B.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[5, 2]),
            now: 120,
        })
        .await??;

    silo.registry
        .send(CloseBatch {
            actor: LAB_A.to_string(),
            batch_id,
            now: 200,
        })
        .await??;

    // any observer may request the reveal of a closed batch
    let request_id = silo
        .registry
        .send(RequestDecryption {
            actor: OBSERVER.to_string(),
            batch_id,
            now: 300,
        })
        .await??;

    deliver_callback(&silo, request_id).await??;

    let completed = events_of_type(&silo, "DecryptionCompleted").await?;
    let [SiloEvent::DecryptionCompleted { data, .. }] = completed.as_slice() else {
        panic!("expected exactly one DecryptionCompleted event");
    };
    assert_eq!(data.batch_id, batch_id);
    assert_eq!(data.request_id, request_id);
    assert_eq!(data.score_total, 14);

    let batch = silo.registry.send(GetBatch { batch_id }).await?.unwrap();
    let entry = silo
        .registry
        .send(GetAccumulatorEntry {
            batch_id,
            version: batch.version,
        })
        .await?
        .unwrap();
    assert_eq!(entry.count, 2);
    Ok(())
}

#[actix::test]
async fn capacity_limits_admissions() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;
    silo.registry
        .send(SetBatchCapacity {
            caller: OWNER.to_string(),
            limit: 1,
        })
        .await??;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;

    silo.registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[1]),
            now: 110,
        })
        .await??;

    let rejected = silo
        .registry
        .send(SubmitContribution {
            actor: LAB_B.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[1]),
            now: 120,
        })
        .await?;
    assert_eq!(rejected, Err(ProtocolError::BatchFull(batch_id)));

    // the rejected call left the accumulator untouched
    let batch = silo.registry.send(GetBatch { batch_id }).await?.unwrap();
    let entry = silo
        .registry
        .send(GetAccumulatorEntry {
            batch_id,
            version: batch.version,
        })
        .await?
        .unwrap();
    assert_eq!(entry.count, 1);
    Ok(())
}

#[actix::test]
async fn closed_batches_accept_nothing_further() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;
    silo.registry
        .send(CloseBatch {
            actor: LAB_A.to_string(),
            batch_id,
            now: 200,
        })
        .await??;

    let submit = silo
        .registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[1]),
            now: 210,
        })
        .await?;
    assert_eq!(submit, Err(ProtocolError::BatchClosed(batch_id)));

    let reclose = silo
        .registry
        .send(CloseBatch {
            actor: LAB_B.to_string(),
            batch_id,
            now: 220,
        })
        .await?;
    assert_eq!(reclose, Err(ProtocolError::BatchClosed(batch_id)));
    Ok(())
}

#[actix::test]
async fn version_bump_freezes_writes_but_not_reveal() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;
    silo.registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[6, 1]),
            now: 110,
        })
        .await??;

    let bumped = silo
        .registry
        .send(BumpModelVersion {
            caller: OWNER.to_string(),
        })
        .await??;

    let stale = silo
        .registry
        .send(SubmitContribution {
            actor: LAB_B.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[9]),
            now: 120,
        })
        .await?;
    assert_eq!(
        stale,
        Err(ProtocolError::StaleBatch {
            batch_id,
            stamped: ModelVersion::new(1),
            current: bumped,
        })
    );

    // closing and revealing still work on the frozen batch
    silo.registry
        .send(CloseBatch {
            actor: LAB_A.to_string(),
            batch_id,
            now: 200,
        })
        .await??;
    let request_id = silo
        .registry
        .send(RequestDecryption {
            actor: LAB_A.to_string(),
            batch_id,
            now: 300,
        })
        .await??;
    deliver_callback(&silo, request_id).await??;

    let completed = events_of_type(&silo, "DecryptionCompleted").await?;
    let [SiloEvent::DecryptionCompleted { data, .. }] = completed.as_slice() else {
        panic!("expected exactly one DecryptionCompleted event");
    };
    assert_eq!(data.score_total, 7);
    Ok(())
}

#[actix::test]
async fn callback_is_consumed_exactly_once() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;
    silo.registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[2]),
            now: 110,
        })
        .await??;
    silo.registry
        .send(CloseBatch {
            actor: LAB_A.to_string(),
            batch_id,
            now: 200,
        })
        .await??;

    let request_id = silo
        .registry
        .send(RequestDecryption {
            actor: LAB_A.to_string(),
            batch_id,
            now: 300,
        })
        .await??;

    let callback = silo
        .oracle
        .send(TakeCallback { request_id })
        .await?
        .unwrap();

    assert_eq!(silo.registry.send(callback.clone()).await?, Ok(()));
    assert_eq!(
        silo.registry.send(callback).await?,
        Err(ProtocolError::UnknownRequest(request_id))
    );

    assert_eq!(
        events_of_type(&silo, "DecryptionCompleted").await?.len(),
        1
    );
    Ok(())
}

#[actix::test]
async fn concurrent_requests_complete_independently() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;
    silo.registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[8]),
            now: 110,
        })
        .await??;
    silo.registry
        .send(CloseBatch {
            actor: LAB_A.to_string(),
            batch_id,
            now: 200,
        })
        .await??;

    let r1 = silo
        .registry
        .send(RequestDecryption {
            actor: LAB_A.to_string(),
            batch_id,
            now: 300,
        })
        .await??;
    let r2 = silo
        .registry
        .send(RequestDecryption {
            actor: LAB_B.to_string(),
            batch_id,
            now: 310,
        })
        .await??;
    assert_ne!(r1, r2);

    // the second request's answer lands first; both reveals stand alone
    deliver_callback(&silo, r2).await??;
    deliver_callback(&silo, r1).await??;

    let completed = events_of_type(&silo, "DecryptionCompleted").await?;
    assert_eq!(completed.len(), 2);
    Ok(())
}

#[actix::test]
async fn invalid_proof_leaves_the_request_retryable() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;
    silo.registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[4]),
            now: 110,
        })
        .await??;
    silo.registry
        .send(CloseBatch {
            actor: LAB_A.to_string(),
            batch_id,
            now: 200,
        })
        .await??;

    let request_id = silo
        .registry
        .send(RequestDecryption {
            actor: LAB_A.to_string(),
            batch_id,
            now: 300,
        })
        .await??;

    let callback = silo
        .oracle
        .send(TakeCallback { request_id })
        .await?
        .unwrap();

    let tampered = OracleCallback {
        request_id,
        cleartext: callback.cleartext.clone(),
        proof: b"forged".to_vec(),
    };
    assert_eq!(
        silo.registry.send(tampered).await?,
        Err(ProtocolError::InvalidProof(request_id))
    );

    // the context is still pending, so the oracle may retry
    let context = silo
        .registry
        .send(GetDecryptionContext { request_id })
        .await?
        .unwrap();
    assert!(context.is_pending());

    assert_eq!(silo.registry.send(callback).await?, Ok(()));
    Ok(())
}

#[actix::test]
async fn unissued_request_ids_are_rejected() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let bogus = RequestId::new(999);
    let result = silo
        .registry
        .send(OracleCallback {
            request_id: bogus,
            cleartext: 14u64.to_le_bytes().to_vec(),
            proof: vec![0; 32],
        })
        .await?;
    assert_eq!(result, Err(ProtocolError::UnknownRequest(bogus)));
    Ok(())
}

#[actix::test]
async fn empty_closed_batches_cannot_be_revealed() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;
    silo.registry
        .send(CloseBatch {
            actor: LAB_A.to_string(),
            batch_id,
            now: 200,
        })
        .await??;

    let result = silo
        .registry
        .send(RequestDecryption {
            actor: LAB_A.to_string(),
            batch_id,
            now: 300,
        })
        .await?;
    assert_eq!(result, Err(ProtocolError::NoContributions(batch_id)));
    Ok(())
}

#[actix::test]
async fn open_batches_cannot_be_revealed() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;

    let result = silo
        .registry
        .send(RequestDecryption {
            actor: LAB_A.to_string(),
            batch_id,
            now: 300,
        })
        .await?;
    assert_eq!(result, Err(ProtocolError::BatchNotClosed(batch_id)));
    Ok(())
}
