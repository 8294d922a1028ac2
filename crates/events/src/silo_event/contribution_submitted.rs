// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{BatchId, ModelVersion};
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct ContributionSubmitted {
    pub batch_id: BatchId,
    pub version: ModelVersion,
    pub provider: String,
    /// Accepted contributions for (batch_id, version) after this one.
    pub count: u64,
}

impl Display for ContributionSubmitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch_id: {}, version: {}, provider: {}, count: {}",
            self.batch_id, self.version, self.provider, self.count
        )
    }
}
