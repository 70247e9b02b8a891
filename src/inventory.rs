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

//! Inventory document
//!
//! This is the structure every driver fills in and which is printed for
//! Ansible: a mapping of group name to the hosts in that group and the
//! connection variables shared by them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::*;

/// Name of the group which is always present.
pub const LOCAL_GROUP: &str = "local";

/// Variable value, either a string or an integer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Str(String),
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

/// A group of hosts sharing the same variables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub hosts: Vec<String>,
    pub vars: BTreeMap<String, Scalar>,
}

impl Group {
    pub fn new(hosts: Vec<String>) -> Self {
        Group {
            hosts,
            vars: BTreeMap::new(),
        }
    }

    /// Set a group variable, replacing any previous value.
    pub fn var(mut self, key: &str, value: impl Into<Scalar>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    groups: BTreeMap<String, Group>,
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory::new()
    }
}

impl Inventory {
    /// Build a new inventory holding only the `local` group.
    pub fn new() -> Self {
        Inventory::with_local_user(local_user())
    }

    fn with_local_user(user: Option<String>) -> Self {
        let mut local = Group::new(vec!["localhost".to_string()]);
        if let Some(user) = user {
            local = local.var("ansible_ssh_user", user);
        }
        let local = local
            .var("ansible_ssh_port", 22i64)
            .var("ansible_ssh_private_key_file", "~/.ssh/id_rsa")
            .var("ansible_connection", "local");

        let mut groups = BTreeMap::new();
        groups.insert(LOCAL_GROUP.to_string(), local);
        Inventory { groups }
    }

    /// Merge groups into the inventory.
    ///
    /// A group with the same name as an existing one replaces it entirely,
    /// variables are not merged.
    pub fn add_groups<I>(&mut self, groups: I)
    where
        I: IntoIterator<Item = (String, Group)>,
    {
        self.groups.extend(groups);
    }

    pub fn add_group(&mut self, name: impl Into<String>, group: Group) {
        self.groups.insert(name.into(), group);
    }

    /// Look up a single group by name.
    #[allow(dead_code)]
    pub fn group(&self, name: &str) -> Result<&Group> {
        self.groups
            .get(name)
            .ok_or_else(|| Error::GroupNotFound(name.to_string()))
    }

    /// All groups, keyed by name.
    #[allow(dead_code)]
    pub fn groups(&self) -> &BTreeMap<String, Group> {
        &self.groups
    }

    /// Render the whole inventory as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// SSH user for the `local` group: `$USER`, else the user owning this process.
fn local_user() -> Option<String> {
    std::env::var("USER").ok().or_else(|| {
        users::get_current_username().and_then(|name| name.into_string().ok())
    })
}
