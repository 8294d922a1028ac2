// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, Result};
use fhe::bfv::{BfvParameters, BfvParametersBuilder};
use std::sync::Arc;

/// Predefined BFV parameter sets.
///
/// Each set is a tuple of (degree, plaintext_modulus, moduli). The
/// plaintext modulus bounds the largest score sum a batch can hold before
/// wrapping; trait scores are small integers, so the default set leaves
/// generous headroom.
pub mod presets {
    /// Degree 2048, plaintext modulus 1032193, single 54-bit modulus.
    pub const SET_2048_1032193_1: (usize, u64, [u64; 1]) = (
        2048,               // degree
        1032193,            // plaintext_modulus
        [0x3FFFFFFF000001], // moduli
    );
}

/// Build BFV parameters for the given degree, plaintext modulus and moduli.
pub fn build_bfv_params(
    degree: usize,
    plaintext_modulus: u64,
    moduli: &[u64],
) -> Result<BfvParameters> {
    BfvParametersBuilder::new()
        .set_degree(degree)
        .set_plaintext_modulus(plaintext_modulus)
        .set_moduli(moduli)
        .build()
        .map_err(|e| anyhow!("Failed to build BFV parameters: {e}"))
}

/// Build BFV parameters wrapped in an `Arc` for shared ownership.
pub fn build_bfv_params_arc(
    degree: usize,
    plaintext_modulus: u64,
    moduli: &[u64],
) -> Result<Arc<BfvParameters>> {
    BfvParametersBuilder::new()
        .set_degree(degree)
        .set_plaintext_modulus(plaintext_modulus)
        .set_moduli(moduli)
        .build_arc()
        .map_err(|e| anyhow!("Failed to build BFV parameters: {e}"))
}
