// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{create_shared_rng_from_u64, init_test_tracing, SimulatedOracle};
use actix::{Actor, Addr};
use anyhow::Result;
use fhe::bfv::{PublicKey, SecretKey};
use silo_config::SiloConfig;
use silo_data::{DataStore, InMemStore, RepositoriesFactory};
use silo_events::{EventBus, SiloEvent};
use silo_fhe::{build_bfv_params_arc, ScoreCipher};
use silo_logger::SimpleLogger;
use silo_oracle::{KeyedProofVerifier, RecipientTransport};
use silo_registry::{SiloRegistry, SiloRegistryParams, SiloRegistryRepositoryFactory};
use std::sync::Arc;

/// Key shared between the simulated oracle and the registry's verifier.
pub const TEST_PROOF_KEY: &[u8] = b"silo-test-proof-key";

/// A fully wired silo for tests: registry, bus, oracle and cipher share
/// one BFV keypair, with the secret half held by the oracle only.
pub struct SimulatedSilo {
    pub bus: Addr<EventBus<SiloEvent>>,
    pub registry: Addr<SiloRegistry>,
    pub oracle: Addr<SimulatedOracle>,
    pub cipher: Arc<ScoreCipher>,
    pub store: Addr<InMemStore>,
    pub config: SiloConfig,
}

/// Build a silo from the given config, optionally reusing an existing
/// store actor (to exercise hydration from a previous run's data).
pub async fn setup_silo(
    config: SiloConfig,
    data: Option<Addr<InMemStore>>,
) -> Result<SimulatedSilo> {
    init_test_tracing();

    let rng = create_shared_rng_from_u64(42);
    let params = build_bfv_params_arc(
        config.fhe.degree,
        config.fhe.plaintext_modulus,
        &config.fhe.moduli,
    )?;

    let secret_key = SecretKey::random(&params, &mut *rng.lock().unwrap());
    let public_key = PublicKey::new(&secret_key, &mut *rng.lock().unwrap());
    let cipher = Arc::new(ScoreCipher::new(params.clone(), public_key, rng));

    let bus = EventBus::<SiloEvent>::default().start();
    let oracle = SimulatedOracle::new(params, secret_key, TEST_PROOF_KEY.to_vec()).start();

    let store = data.unwrap_or_else(|| InMemStore::new(true).start());
    let repository = DataStore::from(&store).repositories().registry();

    let registry = SiloRegistry::attach(SiloRegistryParams {
        bus: bus.clone(),
        cipher: cipher.clone(),
        transport: Box::new(RecipientTransport::new(oracle.clone().recipient())),
        verifier: Box::new(KeyedProofVerifier::new(TEST_PROOF_KEY.to_vec())),
        config: config.clone(),
        store: repository,
    })
    .await?;

    SimpleLogger::<SiloEvent>::attach(&config.instance_id, bus.clone());

    Ok(SimulatedSilo {
        bus,
        registry,
        oracle,
        cipher,
        store,
        config,
    })
}
