//! OpenStack driver.
//!
//! Not implemented: collecting fails rather than returning an inventory with
//! only the `local` group, so callers can tell it apart from an empty cloud.

use crate::drivers::InventoryDriver;
use crate::errors::*;
use crate::inventory::Inventory;

#[derive(Clone, Copy, Debug)]
pub struct OpenstackDriver;

impl InventoryDriver for OpenstackDriver {
    fn collect(&self) -> Result<Inventory> {
        Err(Error::Unimplemented("openstack".to_string()))
    }
}
