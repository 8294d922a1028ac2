// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod batch_id;
mod error;
mod event_id;
mod eventbus;
mod model_version;
mod request_id;
mod silo_event;

pub use batch_id::*;
pub use error::*;
pub use event_id::*;
pub use eventbus::*;
pub use model_version::*;
pub use request_id::*;
pub use silo_event::*;
