// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use silo_events::ProtocolError;
use std::collections::HashMap;

/// Per-actor minimum interval between state-changing actions.
///
/// One clock per actor is shared by every rate-limited operation kind.
/// `check` and `record` are split: callers check up front but record only
/// after the whole operation has succeeded, so a rejected call leaves no
/// trace in the limiter.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RateLimiter {
    last_action: HashMap<String, u64>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, actor: &str, now: u64, cooldown_secs: u64) -> Result<(), ProtocolError> {
        if let Some(last) = self.last_action.get(actor) {
            let retry_at = last + cooldown_secs;
            if now < retry_at {
                return Err(ProtocolError::TooFrequent {
                    actor: actor.to_string(),
                    retry_at,
                });
            }
        }
        Ok(())
    }

    pub fn record(&mut self, actor: &str, now: u64) {
        self.last_action.insert(actor.to_string(), now);
    }

    pub fn check_and_record(
        &mut self,
        actor: &str,
        now: u64,
        cooldown_secs: u64,
    ) -> Result<(), ProtocolError> {
        self.check(actor, now, cooldown_secs)?;
        self.record(actor, now);
        Ok(())
    }

    pub fn last_action_at(&self, actor: &str) -> Option<u64> {
        self.last_action.get(actor).copied()
    }
}
