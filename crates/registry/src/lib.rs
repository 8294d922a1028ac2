// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod messages;
mod registry;
mod repo;

pub use messages::*;
pub use registry::*;
pub use repo::*;
