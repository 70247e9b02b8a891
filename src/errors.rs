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

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown driver '{name}' (available: {})", .available.join(", "))]
    DriverNotFound { name: String, available: Vec<String> },

    #[error("group '{0}' not found in inventory")]
    GroupNotFound(String),

    #[error("service lookup for '{query}' failed: {reason}")]
    ServiceLookup { query: String, reason: String },

    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("'{command}' failed: {reason}")]
    Subprocess { command: String, reason: String },

    #[error("required dependency '{0}' is not available")]
    DependencyUnavailable(String),

    #[error("'{command}' did not complete within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("driver '{0}' is not implemented yet")]
    Unimplemented(String),

    #[error("failed to serialize inventory")]
    Serialize(#[from] serde_json::Error),
}
