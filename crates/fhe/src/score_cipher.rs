// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{build_bfv_params_arc, SharedRng};
use anyhow::{anyhow, bail, Context, Result};
use fhe::bfv::{BfvParameters, Ciphertext, Encoding, Plaintext, PublicKey};
use fhe_traits::{DeserializeParametrized, FheEncoder, FheEncrypter, Serialize};
use std::sync::Arc;

/// BFV adaptor for trait-score ciphertexts.
///
/// All ciphertexts cross component boundaries as opaque byte vectors; this
/// adaptor is the only place that deserializes them. It holds the public
/// material only: decryption lives with the external oracle.
#[derive(Clone)]
pub struct ScoreCipher {
    pub params: Arc<BfvParameters>,
    public_key: PublicKey,
    rng: SharedRng,
}

impl ScoreCipher {
    pub fn new(params: Arc<BfvParameters>, public_key: PublicKey, rng: SharedRng) -> Self {
        Self {
            params,
            public_key,
            rng,
        }
    }

    pub fn from_raw_params(
        degree: usize,
        plaintext_modulus: u64,
        moduli: &[u64],
        public_key: &[u8],
        rng: SharedRng,
    ) -> Result<Self> {
        let params = build_bfv_params_arc(degree, plaintext_modulus, moduli)?;
        let public_key = PublicKey::from_bytes(public_key, &params)
            .map_err(|e| anyhow!("Error deserializing public key: {e}"))?;

        Ok(Self::new(params, public_key, rng))
    }

    /// Encrypt a single trait score.
    pub fn encrypt_score(&self, score: u64) -> Result<Vec<u8>> {
        let pt = Plaintext::try_encode(&[score], Encoding::poly(), &self.params)
            .map_err(|e| anyhow!("Error encoding plaintext: {e}"))?;

        let ct = self
            .public_key
            .try_encrypt(&pt, &mut *self.rng.lock().unwrap())
            .map_err(|e| anyhow!("Error encrypting score: {e}"))?;

        Ok(ct.to_bytes())
    }

    /// An encryption of zero, used to materialize fresh accumulator entries.
    pub fn encrypted_zero(&self) -> Result<Vec<u8>> {
        self.encrypt_score(0)
    }

    /// Homomorphically add one contribution onto a running sum.
    pub fn add(&self, sum: &[u8], contribution: &[u8]) -> Result<Vec<u8>> {
        let mut sum_ct = self.deserialize(sum).context("running sum")?;
        let ct = self.deserialize(contribution).context("contribution")?;
        sum_ct += &ct;
        Ok(sum_ct.to_bytes())
    }

    /// Fold several encrypted field values into a single contribution.
    pub fn fold(&self, parts: &[Vec<u8>]) -> Result<Vec<u8>> {
        let Some((first, rest)) = parts.split_first() else {
            bail!("cannot fold an empty contribution");
        };

        let mut folded = self.deserialize(first)?;
        for part in rest {
            folded += &self.deserialize(part)?;
        }
        Ok(folded.to_bytes())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Ciphertext> {
        Ciphertext::from_bytes(bytes, &self.params)
            .map_err(|e| anyhow!("Error deserializing ciphertext: {e}"))
    }
}

/// Decode a cleartext reveal into a score total.
///
/// The oracle returns the revealed sum as little-endian u64 bytes.
pub fn decode_score(cleartext: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = cleartext
        .get(0..8)
        .context("cleartext shorter than 8 bytes")?
        .try_into()?;
    Ok(u64::from_le_bytes(bytes))
}
