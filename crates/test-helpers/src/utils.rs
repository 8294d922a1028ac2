// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use silo_fhe::SharedRng;
use std::sync::{Arc, Mutex, Once};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a fmt subscriber honoring RUST_LOG. Safe to call from every
/// test; only the first call does anything.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn create_shared_rng_from_u64(value: u64) -> SharedRng {
    Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(value)))
}

pub fn create_random_addrs(how_many: u32) -> Vec<String> {
    (0..how_many)
        .map(|_| format!("0x{}", hex::encode(rand::thread_rng().gen::<[u8; 20]>())))
        .collect()
}
