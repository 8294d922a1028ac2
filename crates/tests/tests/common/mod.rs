// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

#![allow(dead_code)]

use anyhow::Result;
use silo_config::SiloConfig;
use silo_events::{Event, GetHistory, ProtocolError, RequestId, SiloEvent};
use silo_fhe::ScoreCipher;
use silo_registry::AddProvider;
use silo_test_helpers::{setup_silo, SimulatedSilo, TakeCallback};

pub const OWNER: &str = "0xowner";
pub const LAB_A: &str = "0xlab-a";
pub const LAB_B: &str = "0xlab-b";
pub const OBSERVER: &str = "0xobserver";

pub fn test_config() -> SiloConfig {
    SiloConfig {
        instance_id: "silo-test".to_string(),
        owner: OWNER.to_string(),
        cooldown_secs: 0,
        batch_capacity: 10,
        ..Default::default()
    }
}

/// A silo with LAB_A and LAB_B authorized as providers.
pub async fn setup_with_providers(config: SiloConfig) -> Result<SimulatedSilo> {
    let silo = setup_silo(config, None).await?;
    for provider in [LAB_A, LAB_B] {
        silo.registry
            .send(AddProvider {
                caller: OWNER.to_string(),
                provider: provider.to_string(),
            })
            .await??;
    }
    Ok(silo)
}

/// Encrypt one submission's trait scores.
pub fn encrypt_values(cipher: &ScoreCipher, scores: &[u64]) -> Vec<Vec<u8>> {
    scores
        .iter()
        .map(|s| cipher.encrypt_score(*s).unwrap())
        .collect()
}

/// Fetch the oracle's prepared answer and deliver it to the registry.
pub async fn deliver_callback(
    silo: &SimulatedSilo,
    request_id: RequestId,
) -> Result<Result<(), ProtocolError>> {
    let callback = silo
        .oracle
        .send(TakeCallback { request_id })
        .await?
        .expect("oracle has not produced a callback for this request");
    Ok(silo.registry.send(callback).await?)
}

/// All bus events of the given type, in publication order.
pub async fn events_of_type(silo: &SimulatedSilo, event_type: &str) -> Result<Vec<SiloEvent>> {
    let history = silo.bus.send(GetHistory::new()).await?;
    Ok(history
        .into_iter()
        .filter(|e| e.event_type() == event_type)
        .collect())
}
