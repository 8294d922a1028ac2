// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

/// Central naming for repository scopes so no two components collide on a
/// store location.
pub struct StoreKeys;

impl StoreKeys {
    pub fn registry() -> String {
        String::from("//registry")
    }
}
