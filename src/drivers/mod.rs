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

//! Drivers
//!
//! These are the backends an inventory can be collected from. Each driver
//! knows how to talk to its source of truth and turns what it finds into
//! groups of an `Inventory`.
//!
//! To add a driver, put a `pub mod driver;` line in this file, implement
//! `InventoryDriver` for it, and add an entry to `Registry::builtin()`.

pub mod cmdbapi;
pub mod docker;
pub mod ec2;
pub mod local;
pub mod openstack;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use slog_scope::debug;

use crate::errors::*;
use crate::inventory::Inventory;

/// Default timeout for any single backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the `cmdbapi` driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CmdbConfig {
    pub protocol: String,
    /// Fixed `host[:port]`; when unset the server is discovered through DNS SRV.
    pub server: Option<String>,
    pub api: String,
    pub domain: String,
    pub user_agent: String,
}

impl Default for CmdbConfig {
    fn default() -> Self {
        CmdbConfig {
            protocol: "http".to_string(),
            server: None,
            api: "api/v1".to_string(),
            domain: "local".to_string(),
            user_agent: "AnsibleInventory/0.0.1 (ansible 2.2.1.0)".to_string(),
        }
    }
}

/// Everything a driver may need to set itself up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    pub cmdb: CmdbConfig,
    /// Path or name of the `docker-machine` binary.
    pub docker_machine: String,
    pub timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            cmdb: CmdbConfig::default(),
            docker_machine: "docker-machine".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub trait InventoryDriver {
    /// Query the backend and build an inventory from it.
    fn collect(&self) -> Result<Inventory>;
}

/// Builds a driver from configuration.
pub type DriverFactory = fn(&DriverConfig) -> Result<Box<dyn InventoryDriver>>;

macro_rules! box_result {
    ($exp:expr) => {
        Ok(Box::new($exp))
    };
}

/// Table of available drivers, keyed by lowercase name.
#[derive(Clone, Default)]
pub struct Registry {
    drivers: BTreeMap<String, DriverFactory>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.drivers.keys()).finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Registry holding every driver shipped with this crate.
    pub fn builtin() -> Self {
        let mut registry = Registry::new();
        registry.register("local", |_| box_result!(local::LocalDriver));
        registry.register("cmdbapi", |cfg| {
            box_result!(cmdbapi::CmdbApiDriver::try_new(&cfg.cmdb, cfg.timeout)?)
        });
        registry.register("docker", |cfg| {
            box_result!(docker::DockerDriver::new(&cfg.docker_machine, cfg.timeout))
        });
        registry.register("openstack", |_| box_result!(openstack::OpenstackDriver));
        registry.register("awsec2", |_| box_result!(ec2::AwsEc2Driver));
        registry
    }

    /// Add a driver, replacing any previous one with the same name.
    pub fn register(&mut self, name: &str, factory: DriverFactory) {
        self.drivers.insert(name.trim().to_lowercase(), factory);
    }

    /// Find the factory for `name`, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<DriverFactory> {
        self.drivers
            .get(&name.trim().to_lowercase())
            .copied()
            .ok_or_else(|| Error::DriverNotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.drivers.keys().cloned().collect()
    }

    /// Resolve `name`, build the driver and collect an inventory with it.
    pub fn collect(&self, name: &str, cfg: &DriverConfig) -> Result<Inventory> {
        let factory = self.resolve(name)?;
        debug!("using driver '{}'", name);
        let driver = factory(cfg)?;
        driver.collect()
    }
}
