// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use sha2::{Digest, Sha256};
use silo_events::{BatchId, ModelVersion};

/// Fingerprint of the accumulator state a decryption request was issued
/// against. Recomputed at callback time: any change to the ciphertext, or
/// a callback addressed to a different silo instance, produces a different
/// hash and the reveal is rejected.
pub fn binding_hash(
    instance_id: &str,
    batch_id: BatchId,
    version: ModelVersion,
    ciphertext: &[u8],
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"silo:binding");
    hasher.update(instance_id.as_bytes());
    hasher.update(batch_id.value().to_le_bytes());
    hasher.update(version.value().to_le_bytes());
    hasher.update(ciphertext);
    hasher.finalize().into()
}
