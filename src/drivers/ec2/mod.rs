//! AWS EC2 driver.
//!
//! Not implemented yet, see the OpenStack driver.

use crate::drivers::InventoryDriver;
use crate::errors::*;
use crate::inventory::Inventory;

#[derive(Clone, Copy, Debug)]
pub struct AwsEc2Driver;

impl InventoryDriver for AwsEc2Driver {
    fn collect(&self) -> Result<Inventory> {
        Err(Error::Unimplemented("awsec2".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unimplemented() {
        assert!(matches!(
            AwsEc2Driver.collect(),
            Err(Error::Unimplemented(_))
        ));
    }
}
