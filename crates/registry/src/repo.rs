// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::SiloRegistrySnapshot;
use silo_config::StoreKeys;
use silo_data::{Repositories, Repository};

pub trait SiloRegistryRepositoryFactory {
    fn registry(&self) -> Repository<SiloRegistrySnapshot>;
}

impl SiloRegistryRepositoryFactory for Repositories {
    fn registry(&self) -> Repository<SiloRegistrySnapshot> {
        Repository::new(self.store.scope(StoreKeys::registry()))
    }
}
