// Copyright 2026 The ansible-inventory-drivers Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Local driver.
//!
//! Only reports the machine the inventory runs on, as the `local` group.

use crate::drivers::InventoryDriver;
use crate::errors::*;
use crate::inventory::Inventory;

#[derive(Clone, Copy, Debug)]
pub struct LocalDriver;

impl InventoryDriver for LocalDriver {
    fn collect(&self) -> Result<Inventory> {
        Ok(Inventory::new())
    }
}
