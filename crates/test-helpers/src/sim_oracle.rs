// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Handler, Message};
use fhe::bfv::{BfvParameters, Ciphertext, Encoding, SecretKey};
use fhe_traits::{DeserializeParametrized, FheDecoder, FheDecrypter};
use silo_events::RequestId;
use silo_oracle::{proof_digest, DecryptionJob};
use silo_registry::OracleCallback;
use std::collections::HashMap;
use std::sync::Arc;

/// In-process stand-in for the external decryption oracle.
///
/// Holds the secret key, decrypts each dispatched job and signs the
/// cleartext with the shared proof key. Prepared callbacks are not sent
/// anywhere: tests take them and deliver them to the registry in whatever
/// order the scenario needs.
pub struct SimulatedOracle {
    params: Arc<BfvParameters>,
    secret_key: SecretKey,
    proof_key: Vec<u8>,
    callbacks: HashMap<RequestId, OracleCallback>,
}

impl SimulatedOracle {
    pub fn new(params: Arc<BfvParameters>, secret_key: SecretKey, proof_key: Vec<u8>) -> Self {
        Self {
            params,
            secret_key,
            proof_key,
            callbacks: HashMap::new(),
        }
    }
}

impl Actor for SimulatedOracle {
    type Context = actix::Context<Self>;
}

impl Handler<DecryptionJob> for SimulatedOracle {
    type Result = ();

    fn handle(&mut self, job: DecryptionJob, _: &mut Self::Context) -> Self::Result {
        let ct = Ciphertext::from_bytes(&job.ciphertext, &self.params).unwrap();
        let pt = self.secret_key.try_decrypt(&ct).unwrap();
        let revealed = Vec::<u64>::try_decode(&pt, Encoding::poly()).unwrap()[0];

        let cleartext = revealed.to_le_bytes().to_vec();
        let proof = proof_digest(&self.proof_key, job.request_id, &cleartext).to_vec();

        self.callbacks.insert(
            job.request_id,
            OracleCallback {
                request_id: job.request_id,
                cleartext,
                proof,
            },
        );
    }
}

/// Take the prepared callback for a request, if the oracle has produced
/// one.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Option<OracleCallback>")]
pub struct TakeCallback {
    pub request_id: RequestId,
}

impl Handler<TakeCallback> for SimulatedOracle {
    type Result = Option<OracleCallback>;

    fn handle(&mut self, msg: TakeCallback, _: &mut Self::Context) -> Self::Result {
        self.callbacks.remove(&msg.request_id)
    }
}
