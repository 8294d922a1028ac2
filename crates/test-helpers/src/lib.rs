// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod sim_oracle;
mod sim_silo;
mod utils;

pub use sim_oracle::*;
pub use sim_silo::*;
pub use utils::*;
