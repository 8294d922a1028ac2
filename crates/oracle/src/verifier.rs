// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use sha2::{Digest, Sha256};
use silo_events::RequestId;

/// Verification of the oracle's correctness proof for one reveal.
///
/// The protocol treats the proof as opaque bytes; whatever scheme the
/// deployed oracle uses plugs in here.
pub trait ProofVerifier: Send {
    fn verify(&self, request_id: RequestId, cleartext: &[u8], proof: &[u8]) -> bool;
}

/// The digest a keyed oracle produces over one reveal.
pub fn proof_digest(key: &[u8], request_id: RequestId, cleartext: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"silo:proof");
    hasher.update(key);
    hasher.update(request_id.value().to_le_bytes());
    hasher.update(cleartext);
    hasher.finalize().into()
}

/// Shared-key digest verifier: accepts a proof iff it equals the digest
/// over (request id, cleartext) under the key shared with the oracle.
pub struct KeyedProofVerifier {
    key: Vec<u8>,
}

impl KeyedProofVerifier {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }
}

impl ProofVerifier for KeyedProofVerifier {
    fn verify(&self, request_id: RequestId, cleartext: &[u8], proof: &[u8]) -> bool {
        proof == proof_digest(&self.key, request_id, cleartext).as_slice()
    }
}
