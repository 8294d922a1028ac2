// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod batch_closed;
mod batch_opened;
mod batch_size_limit_updated;
mod contribution_submitted;
mod cooldown_updated;
mod decryption_completed;
mod decryption_requested;
mod model_version_updated;
mod ownership_transferred;
mod paused;
mod provider_added;
mod provider_removed;
mod shutdown;
mod silo_error;
mod test_event;
mod unpaused;

pub use batch_closed::*;
pub use batch_opened::*;
pub use batch_size_limit_updated::*;
pub use contribution_submitted::*;
pub use cooldown_updated::*;
pub use decryption_completed::*;
pub use decryption_requested::*;
pub use model_version_updated::*;
pub use ownership_transferred::*;
pub use paused::*;
pub use provider_added::*;
pub use provider_removed::*;
pub use shutdown::*;
pub use silo_error::*;
pub use test_event::*;
pub use unpaused::*;

use crate::{BatchId, ErrorEvent, Event, EventId};
use actix::Message;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self},
    hash::Hash,
};

/// Macro to help define From traits for SiloEvent
macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for SiloEvent {
                fn from(data: $variant) -> Self {
                    SiloEvent::$variant {
                        id: EventId::hash(data.clone()),
                        data,
                    }
                }
            }
        )*
    };
}

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub enum SiloEvent {
    OwnershipTransferred {
        id: EventId,
        data: OwnershipTransferred,
    },
    ProviderAdded {
        id: EventId,
        data: ProviderAdded,
    },
    ProviderRemoved {
        id: EventId,
        data: ProviderRemoved,
    },
    Paused {
        id: EventId,
        data: Paused,
    },
    Unpaused {
        id: EventId,
        data: Unpaused,
    },
    CooldownUpdated {
        id: EventId,
        data: CooldownUpdated,
    },
    BatchSizeLimitUpdated {
        id: EventId,
        data: BatchSizeLimitUpdated,
    },
    ModelVersionUpdated {
        id: EventId,
        data: ModelVersionUpdated,
    },
    BatchOpened {
        id: EventId,
        data: BatchOpened,
    },
    BatchClosed {
        id: EventId,
        data: BatchClosed,
    },
    ContributionSubmitted {
        id: EventId,
        data: ContributionSubmitted,
    },
    DecryptionRequested {
        id: EventId,
        data: DecryptionRequested,
    },
    DecryptionCompleted {
        id: EventId,
        data: DecryptionCompleted,
    },
    SiloError {
        id: EventId,
        data: SiloError,
    },
    Shutdown {
        id: EventId,
        data: Shutdown,
    },
    /// This is a test event to use in testing
    TestEvent {
        id: EventId,
        data: TestEvent,
    },
}

impl_from_event!(
    OwnershipTransferred,
    ProviderAdded,
    ProviderRemoved,
    Paused,
    Unpaused,
    CooldownUpdated,
    BatchSizeLimitUpdated,
    ModelVersionUpdated,
    BatchOpened,
    BatchClosed,
    ContributionSubmitted,
    DecryptionRequested,
    DecryptionCompleted,
    SiloError,
    Shutdown,
    TestEvent
);

impl SiloEvent {
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn get_id(&self) -> EventId {
        self.clone().into()
    }

    pub fn get_batch_id(&self) -> Option<BatchId> {
        match self {
            SiloEvent::BatchOpened { data, .. } => Some(data.batch_id),
            SiloEvent::BatchClosed { data, .. } => Some(data.batch_id),
            SiloEvent::ContributionSubmitted { data, .. } => Some(data.batch_id),
            SiloEvent::DecryptionRequested { data, .. } => Some(data.batch_id),
            SiloEvent::DecryptionCompleted { data, .. } => Some(data.batch_id),
            _ => None,
        }
    }

    pub fn get_data(&self) -> String {
        match self {
            SiloEvent::OwnershipTransferred { data, .. } => format!("{}", data),
            SiloEvent::ProviderAdded { data, .. } => format!("{}", data),
            SiloEvent::ProviderRemoved { data, .. } => format!("{}", data),
            SiloEvent::Paused { data, .. } => format!("{}", data),
            SiloEvent::Unpaused { data, .. } => format!("{}", data),
            SiloEvent::CooldownUpdated { data, .. } => format!("{}", data),
            SiloEvent::BatchSizeLimitUpdated { data, .. } => format!("{}", data),
            SiloEvent::ModelVersionUpdated { data, .. } => format!("{}", data),
            SiloEvent::BatchOpened { data, .. } => format!("{}", data),
            SiloEvent::BatchClosed { data, .. } => format!("{}", data),
            SiloEvent::ContributionSubmitted { data, .. } => format!("{}", data),
            SiloEvent::DecryptionRequested { data, .. } => format!("{}", data),
            SiloEvent::DecryptionCompleted { data, .. } => format!("{}", data),
            SiloEvent::SiloError { data, .. } => format!("{:?}", data),
            SiloEvent::Shutdown { data, .. } => format!("{:?}", data),
            SiloEvent::TestEvent { data, .. } => format!("{:?}", data),
        }
    }
}

impl From<SiloEvent> for EventId {
    fn from(value: SiloEvent) -> Self {
        match value {
            SiloEvent::OwnershipTransferred { id, .. } => id,
            SiloEvent::ProviderAdded { id, .. } => id,
            SiloEvent::ProviderRemoved { id, .. } => id,
            SiloEvent::Paused { id, .. } => id,
            SiloEvent::Unpaused { id, .. } => id,
            SiloEvent::CooldownUpdated { id, .. } => id,
            SiloEvent::BatchSizeLimitUpdated { id, .. } => id,
            SiloEvent::ModelVersionUpdated { id, .. } => id,
            SiloEvent::BatchOpened { id, .. } => id,
            SiloEvent::BatchClosed { id, .. } => id,
            SiloEvent::ContributionSubmitted { id, .. } => id,
            SiloEvent::DecryptionRequested { id, .. } => id,
            SiloEvent::DecryptionCompleted { id, .. } => id,
            SiloEvent::SiloError { id, .. } => id,
            SiloEvent::Shutdown { id, .. } => id,
            SiloEvent::TestEvent { id, .. } => id,
        }
    }
}

impl Event for SiloEvent {
    type Id = EventId;

    fn event_type(&self) -> String {
        let s = format!("{:?}", self);
        extract_silo_event_name(&s).to_string()
    }

    fn event_id(&self) -> Self::Id {
        self.get_id()
    }
}

impl ErrorEvent for SiloEvent {
    type Error = SiloError;
    type ErrorType = SiloErrorType;

    fn as_error(&self) -> Option<&Self::Error> {
        match self {
            SiloEvent::SiloError { data, .. } => Some(data),
            _ => None,
        }
    }

    fn from_error(err_type: Self::ErrorType, error: anyhow::Error) -> Self {
        SiloEvent::from(SiloError::from_error(err_type, error))
    }
}

impl fmt::Display for SiloEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format!("{}({})", self.event_type(), self.get_data()))
    }
}

fn extract_silo_event_name(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &item) in bytes.iter().enumerate() {
        if item == b' ' || item == b'(' || item == b'{' {
            return &s[..i];
        }
    }
    s
}
