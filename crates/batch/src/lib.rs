// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod accumulator;
mod batch;
mod ledger;

pub use accumulator::*;
pub use batch::*;
pub use ledger::*;
