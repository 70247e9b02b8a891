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

//! CMDB REST API driver.
//!
//! Hosts are read from the `devices` collection of the inventory API. The API
//! server is either configured explicitly or discovered through a DNS SRV
//! record (`_ansibleinventory._http.<domain>`), picking one answer at random.

use std::time::Duration;

use serde::Deserialize;
use slog_scope::{debug, info};

use crate::drivers::{CmdbConfig, InventoryDriver};
use crate::errors::*;
use crate::http;
use crate::inventory::{Group, Inventory};
use crate::util::srv::{self, DnsLocator, ServiceLocator};


const SERVICE_NAME: &str = "ansibleinventory";
const SERVICE_PROTOCOL: &str = "http";
/// Sub-documents embedded in each returned device.
const DEVICES_EMBEDDED: &str = r#"{"ip_addresses":1,"site.name":1}"#;

const PYTHON_INTERPRETER: &str = "/usr/bin/python2";
const SSH_USER: &str = "admin";

#[derive(Debug, Deserialize)]
struct DeviceCollection {
    #[serde(rename = "_items")]
    items: Vec<Device>,
}

#[derive(Debug, Deserialize)]
struct Device {
    node_name: String,
    #[serde(default)]
    ip_addresses: Vec<String>,
}

impl Device {
    fn into_group(self) -> (String, Group) {
        let group = Group::new(self.ip_addresses)
            .var("ansible_python_interpreter", PYTHON_INTERPRETER)
            .var("ansible_ssh_user", SSH_USER);
        (self.node_name, group)
    }
}

#[derive(Clone, Debug)]
pub struct CmdbApiDriver {
    client: http::Client,
    protocol: String,
    server: String,
    api: String,
}

impl CmdbApiDriver {
    pub fn try_new(cfg: &CmdbConfig, timeout: Duration) -> Result<Self> {
        Self::with_locator(cfg, timeout, &DnsLocator::new(timeout))
    }

    fn with_locator(
        cfg: &CmdbConfig,
        timeout: Duration,
        locator: &dyn ServiceLocator,
    ) -> Result<Self> {
        let server = match cfg.server {
            Some(ref server) => server.clone(),
            None => {
                let query = srv::srv_query(SERVICE_NAME, SERVICE_PROTOCOL, &cfg.domain);
                srv::locate(locator, &query)?.to_string()
            }
        };
        info!("using inventory API server {}", server);

        let client = http::Client::try_new(timeout, &cfg.user_agent)?;
        Ok(CmdbApiDriver {
            client,
            protocol: cfg.protocol.clone(),
            server,
            api: cfg.api.trim_matches('/').to_string(),
        })
    }

    fn endpoint_for(&self, collection: &str) -> Result<reqwest::Url> {
        let url = if self.api.is_empty() {
            format!("{}://{}/{}", self.protocol, self.server, collection)
        } else {
            format!(
                "{}://{}/{}/{}",
                self.protocol, self.server, self.api, collection
            )
        };
        reqwest::Url::parse(&url).map_err(|e| Error::Request {
            url,
            reason: e.to_string(),
        })
    }

    fn devices(&self) -> Result<Vec<Device>> {
        let mut url = self.endpoint_for("devices")?;
        url.query_pairs_mut()
            .append_pair("embedded", DEVICES_EMBEDDED);

        let devices: DeviceCollection = self.client.get(http::Json, url).send()?;
        debug!("found {} devices", devices.items.len());
        Ok(devices.items)
    }
}

impl InventoryDriver for CmdbApiDriver {
    fn collect(&self) -> Result<Inventory> {
        let mut inv = Inventory::new();
        inv.add_groups(self.devices()?.into_iter().map(Device::into_group));
        Ok(inv)
    }
}
