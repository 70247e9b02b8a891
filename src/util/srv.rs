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

//! DNS SRV service discovery.

use std::fmt;
use std::time::Duration;

use hickory_resolver::{system_conf, Resolver};
use rand::seq::SliceRandom;
use slog_scope::{debug, trace};

use crate::errors::*;

/// A single `(host, port)` answer to a service query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRecord {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for ServiceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Something able to answer service queries.
pub trait ServiceLocator {
    fn lookup(&self, query: &str) -> Result<Vec<ServiceRecord>>;
}

/// Build the SRV owner name for `service` over `protocol` in `domain`.
pub fn srv_query(service: &str, protocol: &str, domain: &str) -> String {
    format!("_{service}._{protocol}.{domain}")
}

/// Resolve `query` and pick one of the answers at random.
pub fn locate(locator: &dyn ServiceLocator, query: &str) -> Result<ServiceRecord> {
    let records = locator.lookup(query)?;
    trace!("service records for {} - {:?}", query, records);

    let record = records
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| Error::ServiceLookup {
            query: query.to_string(),
            reason: "no records found".to_string(),
        })?;
    debug!("selected {} for {}", record, query);
    Ok(record)
}

/// Service locator backed by the system DNS resolver.
#[derive(Clone, Debug)]
pub struct DnsLocator {
    timeout: Duration,
}

impl DnsLocator {
    pub fn new(timeout: Duration) -> Self {
        DnsLocator { timeout }
    }
}

impl ServiceLocator for DnsLocator {
    fn lookup(&self, query: &str) -> Result<Vec<ServiceRecord>> {
        let failed = |reason: String| Error::ServiceLookup {
            query: query.to_string(),
            reason,
        };

        let (config, mut opts) = system_conf::read_system_conf().map_err(|e| failed(e.to_string()))?;
        opts.timeout = self.timeout;
        let resolver = Resolver::new(config, opts).map_err(|e| failed(e.to_string()))?;

        let answers = resolver
            .srv_lookup(query)
            .map_err(|e| failed(e.to_string()))?;
        let records = answers
            .iter()
            .map(|srv| ServiceRecord {
                host: srv.target().to_utf8().trim_end_matches('.').to_string(),
                port: srv.port(),
            })
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Locator answering every query with a fixed set of records.
    pub(crate) struct StaticLocator(pub Vec<ServiceRecord>);

    impl ServiceLocator for StaticLocator {
        fn lookup(&self, _query: &str) -> Result<Vec<ServiceRecord>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_srv_query() {
        assert_eq!(
            srv_query("ansibleinventory", "http", "local"),
            "_ansibleinventory._http.local"
        );
    }

    #[test]
    fn test_locate_picks_a_candidate() {
        let records = vec![
            ServiceRecord {
                host: "cmdb1.example.com".to_string(),
                port: 8080,
            },
            ServiceRecord {
                host: "cmdb2.example.com".to_string(),
                port: 8081,
            },
        ];
        let locator = StaticLocator(records.clone());
        for _ in 0..10 {
            let picked = locate(&locator, "_svc._http.example.com").unwrap();
            assert!(records.contains(&picked));
        }
    }

    #[test]
    fn test_locate_no_records() {
        let locator = StaticLocator(vec![]);
        match locate(&locator, "_svc._http.example.com") {
            Err(Error::ServiceLookup { query, .. }) => assert_eq!(query, "_svc._http.example.com"),
            x => panic!("unexpected result: {x:?}"),
        }
    }

    #[test]
    fn test_record_display() {
        let record = ServiceRecord {
            host: "cmdb.example.com".to_string(),
            port: 80,
        };
        assert_eq!(record.to_string(), "cmdb.example.com:80");
    }
}
