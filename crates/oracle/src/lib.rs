// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod binding;
mod context;
mod transport;
mod verifier;

pub use binding::*;
pub use context::*;
pub use transport::*;
pub use verifier::*;
