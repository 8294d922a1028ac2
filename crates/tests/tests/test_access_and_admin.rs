// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod common;

use anyhow::Result;
use common::*;
use silo_config::SiloConfig;
use silo_events::{BatchId, Event, GetHistory, ProtocolError, SiloEvent};
use silo_registry::{
    AddProvider, CloseBatch, GetAccessState, OpenBatch, RemoveProvider, RequestDecryption,
    SetBatchCapacity, SetCooldown, SetPaused, SubmitContribution, TransferOwner,
};
use silo_test_helpers::setup_silo;

#[actix::test]
async fn non_owner_cannot_administer() -> Result<()> {
    let silo = setup_silo(test_config(), None).await?;

    let add = silo
        .registry
        .send(AddProvider {
            caller: LAB_A.to_string(),
            provider: LAB_A.to_string(),
        })
        .await?;
    assert_eq!(add, Err(ProtocolError::NotOwner(LAB_A.to_string())));

    let pause = silo
        .registry
        .send(SetPaused {
            caller: LAB_A.to_string(),
            paused: true,
        })
        .await?;
    assert_eq!(pause, Err(ProtocolError::NotOwner(LAB_A.to_string())));
    Ok(())
}

#[actix::test]
async fn provider_changes_emit_one_event_per_transition() -> Result<()> {
    let silo = setup_silo(test_config(), None).await?;

    for _ in 0..3 {
        silo.registry
            .send(AddProvider {
                caller: OWNER.to_string(),
                provider: LAB_A.to_string(),
            })
            .await??;
    }
    silo.registry
        .send(RemoveProvider {
            caller: OWNER.to_string(),
            provider: LAB_A.to_string(),
        })
        .await??;
    silo.registry
        .send(RemoveProvider {
            caller: OWNER.to_string(),
            provider: LAB_A.to_string(),
        })
        .await??;

    assert_eq!(events_of_type(&silo, "ProviderAdded").await?.len(), 1);
    assert_eq!(events_of_type(&silo, "ProviderRemoved").await?.len(), 1);

    let access = silo.registry.send(GetAccessState).await?.unwrap();
    assert!(!access.is_provider(LAB_A));
    Ok(())
}

#[actix::test]
async fn ownership_transfer_moves_the_gate() -> Result<()> {
    let silo = setup_silo(test_config(), None).await?;

    silo.registry
        .send(TransferOwner {
            caller: OWNER.to_string(),
            new_owner: "0xsuccessor".to_string(),
        })
        .await??;

    let stale_owner = silo
        .registry
        .send(AddProvider {
            caller: OWNER.to_string(),
            provider: LAB_A.to_string(),
        })
        .await?;
    assert_eq!(stale_owner, Err(ProtocolError::NotOwner(OWNER.to_string())));

    silo.registry
        .send(AddProvider {
            caller: "0xsuccessor".to_string(),
            provider: LAB_A.to_string(),
        })
        .await??;

    let transferred = events_of_type(&silo, "OwnershipTransferred").await?;
    let [SiloEvent::OwnershipTransferred { data, .. }] = transferred.as_slice() else {
        panic!("expected exactly one OwnershipTransferred event");
    };
    assert_eq!(data.previous_owner, OWNER);
    assert_eq!(data.new_owner, "0xsuccessor");
    Ok(())
}

#[actix::test]
async fn config_updates_carry_old_and_new_values() -> Result<()> {
    let silo = setup_silo(test_config(), None).await?;

    silo.registry
        .send(SetCooldown {
            caller: OWNER.to_string(),
            cooldown_secs: 30,
        })
        .await??;
    silo.registry
        .send(SetBatchCapacity {
            caller: OWNER.to_string(),
            limit: 5,
        })
        .await??;

    let cooldowns = events_of_type(&silo, "CooldownUpdated").await?;
    let [SiloEvent::CooldownUpdated { data, .. }] = cooldowns.as_slice() else {
        panic!("expected exactly one CooldownUpdated event");
    };
    assert_eq!((data.previous_secs, data.current_secs), (0, 30));

    let capacities = events_of_type(&silo, "BatchSizeLimitUpdated").await?;
    let [SiloEvent::BatchSizeLimitUpdated { data, .. }] = capacities.as_slice() else {
        panic!("expected exactly one BatchSizeLimitUpdated event");
    };
    assert_eq!((data.previous, data.current), (10, 5));

    let zero = silo
        .registry
        .send(SetBatchCapacity {
            caller: OWNER.to_string(),
            limit: 0,
        })
        .await?;
    assert!(matches!(zero, Err(ProtocolError::InvalidConfig(_))));
    Ok(())
}

#[actix::test]
async fn pause_gates_providers_but_not_owner_controls() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    silo.registry
        .send(SetPaused {
            caller: OWNER.to_string(),
            paused: true,
        })
        .await??;
    // idempotent: re-pausing emits nothing
    silo.registry
        .send(SetPaused {
            caller: OWNER.to_string(),
            paused: true,
        })
        .await??;

    let open = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await?;
    assert_eq!(open, Err(ProtocolError::Paused));

    // owner controls stay live while paused
    silo.registry
        .send(SetCooldown {
            caller: OWNER.to_string(),
            cooldown_secs: 10,
        })
        .await??;

    silo.registry
        .send(SetPaused {
            caller: OWNER.to_string(),
            paused: false,
        })
        .await??;
    silo.registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;

    assert_eq!(events_of_type(&silo, "Paused").await?.len(), 1);
    assert_eq!(events_of_type(&silo, "Unpaused").await?.len(), 1);
    Ok(())
}

#[actix::test]
async fn non_providers_cannot_touch_batches() -> Result<()> {
    let silo = setup_with_providers(test_config()).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;

    let open = silo
        .registry
        .send(OpenBatch {
            actor: OBSERVER.to_string(),
            now: 100,
        })
        .await?;
    assert_eq!(open, Err(ProtocolError::NotProvider(OBSERVER.to_string())));

    let submit = silo
        .registry
        .send(SubmitContribution {
            actor: OBSERVER.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[1]),
            now: 110,
        })
        .await?;
    assert_eq!(submit, Err(ProtocolError::NotProvider(OBSERVER.to_string())));

    let close = silo
        .registry
        .send(CloseBatch {
            actor: OBSERVER.to_string(),
            batch_id,
            now: 120,
        })
        .await?;
    assert_eq!(close, Err(ProtocolError::NotProvider(OBSERVER.to_string())));
    Ok(())
}

#[actix::test]
async fn shared_cooldown_clock_limits_every_provider_action() -> Result<()> {
    let config = SiloConfig {
        cooldown_secs: 60,
        ..test_config()
    };
    let silo = setup_with_providers(config).await?;

    let batch_id = silo
        .registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 100,
        })
        .await??;

    // opening and submitting share one per-actor clock
    let submit = silo
        .registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[1]),
            now: 130,
        })
        .await?;
    assert_eq!(
        submit,
        Err(ProtocolError::TooFrequent {
            actor: LAB_A.to_string(),
            retry_at: 160,
        })
    );

    // other actors are unaffected
    silo.registry
        .send(SubmitContribution {
            actor: LAB_B.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[1]),
            now: 130,
        })
        .await??;

    // after the cooldown the clock is free again
    silo.registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id,
            values: encrypt_values(&silo.cipher, &[2]),
            now: 160,
        })
        .await??;
    Ok(())
}

#[actix::test]
async fn failed_calls_do_not_consume_the_cooldown() -> Result<()> {
    let config = SiloConfig {
        cooldown_secs: 60,
        ..test_config()
    };
    let silo = setup_with_providers(config).await?;

    // rejected: no such batch, but well past any cooldown
    let missing = BatchId::new(42);
    let submit = silo
        .registry
        .send(SubmitContribution {
            actor: LAB_A.to_string(),
            batch_id: missing,
            values: encrypt_values(&silo.cipher, &[1]),
            now: 100,
        })
        .await?;
    assert_eq!(submit, Err(ProtocolError::BatchNotFound(missing)));

    // the failure recorded nothing, so an immediate open succeeds
    silo.registry
        .send(OpenBatch {
            actor: LAB_A.to_string(),
            now: 101,
        })
        .await??;
    Ok(())
}

#[actix::test]
async fn rate_limit_applies_to_decryption_requests() -> Result<()> {
    let config = SiloConfig {
        cooldown_secs: 60,
        ..test_config()
    };
    let silo = setup_with_providers(config).await?;

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
            values: encrypt_values(&silo.cipher, &[3]),
            now: 200,
        })
        .await??;
    silo.registry
        .send(CloseBatch {
            actor: LAB_A.to_string(),
            batch_id,
            now: 210,
        })
        .await??;

    let request = silo
        .registry
        .send(RequestDecryption {
            actor: LAB_A.to_string(),
            batch_id,
            now: 220,
        })
        .await?;
    assert_eq!(
        request,
        Err(ProtocolError::TooFrequent {
            actor: LAB_A.to_string(),
            retry_at: 260,
        })
    );

    silo.registry
        .send(RequestDecryption {
            actor: LAB_A.to_string(),
            batch_id,
            now: 260,
        })
        .await??;
    Ok(())
}

#[actix::test]
async fn the_event_log_reconstructs_a_run() -> Result<()> {
    let silo = setup_silo(test_config(), None).await?;

    silo.registry
        .send(AddProvider {
            caller: OWNER.to_string(),
            provider: LAB_A.to_string(),
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
            values: encrypt_values(&silo.cipher, &[3, 4]),
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
    deliver_callback(&silo, request_id).await??;

    let history = silo.bus.send(GetHistory::new()).await?;
    let types: Vec<String> = history.iter().map(|e| e.event_type()).collect();
    assert_eq!(
        types,
        vec![
            "ProviderAdded",
            "BatchOpened",
            "ContributionSubmitted",
            "BatchClosed",
            "DecryptionRequested",
            "DecryptionCompleted",
        ]
    );
    Ok(())
}
