// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use silo_events::ProtocolError;
use std::collections::HashSet;

/// Role and configuration state for one silo.
///
/// The owner is a singleton and transferable; providers are the authorized
/// submitters. Owner-gated mutators take the caller so the authorization
/// check cannot be skipped, and return the previous value where an event
/// needs to carry old and new. Owner controls are exempt from the pause
/// gate so a paused silo can always be administered back to life.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessControl {
    owner: String,
    providers: HashSet<String>,
    paused: bool,
    cooldown_secs: u64,
    batch_capacity: u64,
}

impl AccessControl {
    pub fn new(owner: &str, cooldown_secs: u64, batch_capacity: u64) -> Self {
        Self {
            owner: owner.to_string(),
            providers: HashSet::new(),
            paused: false,
            cooldown_secs,
            batch_capacity,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn providers(&self) -> &HashSet<String> {
        &self.providers
    }

    pub fn is_provider(&self, actor: &str) -> bool {
        self.providers.contains(actor)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn cooldown_secs(&self) -> u64 {
        self.cooldown_secs
    }

    pub fn batch_capacity(&self) -> u64 {
        self.batch_capacity
    }

    pub fn ensure_owner(&self, caller: &str) -> Result<(), ProtocolError> {
        if caller != self.owner {
            return Err(ProtocolError::NotOwner(caller.to_string()));
        }
        Ok(())
    }

    pub fn ensure_provider(&self, actor: &str) -> Result<(), ProtocolError> {
        if !self.providers.contains(actor) {
            return Err(ProtocolError::NotProvider(actor.to_string()));
        }
        Ok(())
    }

    pub fn ensure_unpaused(&self) -> Result<(), ProtocolError> {
        if self.paused {
            return Err(ProtocolError::Paused);
        }
        Ok(())
    }

    /// Transfer ownership, returning the previous owner.
    pub fn transfer_owner(&mut self, caller: &str, new_owner: &str) -> Result<String, ProtocolError> {
        self.ensure_owner(caller)?;
        Ok(std::mem::replace(&mut self.owner, new_owner.to_string()))
    }

    /// Authorize a provider. Returns false if it was already authorized.
    pub fn add_provider(&mut self, caller: &str, provider: &str) -> Result<bool, ProtocolError> {
        self.ensure_owner(caller)?;
        Ok(self.providers.insert(provider.to_string()))
    }

    /// Revoke a provider. Returns false if it was not authorized.
    pub fn remove_provider(&mut self, caller: &str, provider: &str) -> Result<bool, ProtocolError> {
        self.ensure_owner(caller)?;
        Ok(self.providers.remove(provider))
    }

    /// Set the pause flag. Returns false when the flag already had the
    /// requested value, so callers emit a transition event only on change.
    pub fn set_paused(&mut self, caller: &str, paused: bool) -> Result<bool, ProtocolError> {
        self.ensure_owner(caller)?;
        if self.paused == paused {
            return Ok(false);
        }
        self.paused = paused;
        Ok(true)
    }

    /// Update the cooldown interval, returning the previous value.
    pub fn set_cooldown(&mut self, caller: &str, secs: u64) -> Result<u64, ProtocolError> {
        self.ensure_owner(caller)?;
        Ok(std::mem::replace(&mut self.cooldown_secs, secs))
    }

    /// Update the batch capacity, returning the previous value.
    pub fn set_batch_capacity(&mut self, caller: &str, limit: u64) -> Result<u64, ProtocolError> {
        self.ensure_owner(caller)?;
        if limit == 0 {
            return Err(ProtocolError::InvalidConfig(
                "batch capacity must be greater than zero".to_string(),
            ));
        }
        Ok(std::mem::replace(&mut self.batch_capacity, limit))
    }
}
