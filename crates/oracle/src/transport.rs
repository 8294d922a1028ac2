// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Message, Recipient};
use silo_events::RequestId;
use std::sync::atomic::{AtomicU64, Ordering};

/// A ciphertext dispatched to the decryption oracle.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash)]
#[rtype(result = "()")]
pub struct DecryptionJob {
    pub request_id: RequestId,
    pub ciphertext: Vec<u8>,
}

/// Fire-and-forget dispatch to the external decryption oracle.
///
/// `submit_for_decryption` must return immediately with the request id the
/// oracle will echo back; the answer arrives later through the registry's
/// callback message.
pub trait OracleTransport: Send {
    fn submit_for_decryption(&self, ciphertext: Vec<u8>) -> RequestId;
}

/// Transport over an actix Recipient. Request ids come from an atomic
/// counter, so an id uniquely names one dispatch for the process lifetime.
pub struct RecipientTransport {
    next_id: AtomicU64,
    oracle: Recipient<DecryptionJob>,
}

impl RecipientTransport {
    pub fn new(oracle: Recipient<DecryptionJob>) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            oracle,
        }
    }
}

impl OracleTransport for RecipientTransport {
    fn submit_for_decryption(&self, ciphertext: Vec<u8>) -> RequestId {
        let request_id = RequestId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.oracle.do_send(DecryptionJob {
            request_id,
            ciphertext,
        });
        request_id
    }
}
