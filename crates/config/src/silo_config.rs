// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// BFV parameter selection. The plaintext modulus bounds the largest
/// score sum a batch can hold before wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FheParams {
    pub degree: usize,
    pub plaintext_modulus: u64,
    pub moduli: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiloConfig {
    /// Identity of this silo deployment, mixed into binding hashes.
    pub instance_id: String,
    /// Initial owner address.
    pub owner: String,
    /// Minimum seconds between state-changing actions per actor.
    pub cooldown_secs: u64,
    /// Maximum accepted contributions per (batch, version).
    pub batch_capacity: u64,
    pub fhe: FheParams,
}

impl Default for SiloConfig {
    fn default() -> Self {
        Self {
            instance_id: "silo".to_string(),
            owner: "owner".to_string(),
            cooldown_secs: 60,
            batch_capacity: 100,
            fhe: FheParams {
                degree: 2048,
                plaintext_modulus: 1032193,
                moduli: vec![0x3FFFFFFF000001],
            },
        }
    }
}

/// Load configuration from defaults, an optional YAML file, and
/// SILO_-prefixed environment variables, in increasing precedence.
pub fn load_config(path: Option<&Path>) -> Result<SiloConfig> {
    let mut figment = Figment::from(Serialized::defaults(SiloConfig::default()));
    if let Some(path) = path {
        figment = figment.merge(Yaml::file(path));
    }
    Ok(figment.merge(Env::prefixed("SILO_")).extract()?)
}
