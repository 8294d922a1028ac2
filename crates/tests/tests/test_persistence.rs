// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod common;

use anyhow::Result;
use common::*;
use silo_events::{ProtocolError, SiloEvent};
use silo_registry::{
    CloseBatch, GetBatch, GetDecryptionContext, GetModelVersion, OpenBatch, OracleCallback,
    RequestDecryption, SubmitContribution,
};
use silo_test_helpers::{setup_silo, TakeCallback};

#[actix::test]
async fn a_restarted_silo_resumes_from_its_store() -> Result<()> {
    let config = test_config();
    let silo = setup_with_providers(config.clone()).await?;

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
            values: encrypt_values(&silo.cipher, &[9, 2]),
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

    // restart against the same store; the keypair is deterministic in
    // tests, so the old oracle's answer stays valid
    let restarted = setup_silo(config, Some(silo.store.clone())).await?;

    let batch = restarted
        .registry
        .send(GetBatch { batch_id })
        .await?
        .expect("batch survived the restart");
    assert!(batch.is_closed());

    let context = restarted
        .registry
        .send(GetDecryptionContext { request_id })
        .await?
        .expect("pending request survived the restart");
    assert!(context.is_pending());

    // the provider set survived: an unknown actor is still rejected
    let open = restarted
        .registry
        .send(OpenBatch {
            actor: OBSERVER.to_string(),
            now: 400,
        })
        .await?;
    assert_eq!(open, Err(ProtocolError::NotProvider(OBSERVER.to_string())));

    // the pre-restart reveal completes against the rehydrated state
    let callback: OracleCallback = silo
        .oracle
        .send(TakeCallback { request_id })
        .await?
        .expect("oracle prepared the answer before the restart");
    restarted.registry.send(callback).await??;

    let completed = events_of_type(&restarted, "DecryptionCompleted").await?;
    let [SiloEvent::DecryptionCompleted { data, .. }] = completed.as_slice() else {
        panic!("expected exactly one DecryptionCompleted event");
    };
    assert_eq!(data.score_total, 11);
    Ok(())
}

#[actix::test]
async fn the_version_epoch_survives_a_restart() -> Result<()> {
    let config = test_config();
    let silo = setup_with_providers(config.clone()).await?;

    let bumped = silo
        .registry
        .send(silo_registry::BumpModelVersion {
            caller: OWNER.to_string(),
        })
        .await??;

    let restarted = setup_silo(config, Some(silo.store.clone())).await?;
    let version = restarted.registry.send(GetModelVersion).await?.unwrap();
    assert_eq!(version, bumped);
    Ok(())
}
