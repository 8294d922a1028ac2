// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

pub trait FromError {
    type Error;
    fn from_error(err_type: SiloErrorType, error: Self::Error) -> Self;
}

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct SiloError {
    pub err_type: SiloErrorType,
    pub message: String,
}

impl Display for SiloError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiloErrorType {
    Access,
    Lifecycle,
    Decryption,
    Data,
    Config,
}

impl SiloError {
    pub fn new(err_type: SiloErrorType, message: &str) -> Self {
        Self {
            err_type,
            message: message.to_string(),
        }
    }
}

impl FromError for SiloError {
    type Error = anyhow::Error;
    fn from_error(err_type: SiloErrorType, error: Self::Error) -> Self {
        Self {
            err_type,
            message: error.to_string(),
        }
    }
}
