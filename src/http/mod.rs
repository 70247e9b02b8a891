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

//! http
//!
//! A thin wrapper over a blocking reqwest client. Every request is bounded by
//! the client timeout and performed exactly once; responses are decoded
//! through a `Deserializer` and failures are reported as `Error::Request`.

use std::io::Read;
use std::time::Duration;

use reqwest::{blocking, header};
use slog_scope::{debug, info};

use crate::errors::*;

pub trait Deserializer {
    fn deserialize<T, R>(&self, r: R) -> std::result::Result<T, String>
    where
        T: serde::de::DeserializeOwned,
        R: Read;
    fn accept(&self) -> header::HeaderValue;
}

#[derive(Debug, Clone, Copy)]
pub struct Json;

impl Deserializer for Json {
    fn deserialize<T, R>(&self, r: R) -> std::result::Result<T, String>
    where
        T: serde::de::DeserializeOwned,
        R: Read,
    {
        serde_json::from_reader(r).map_err(|e| format!("failed json deserialization: {e}"))
    }

    fn accept(&self) -> header::HeaderValue {
        header::HeaderValue::from_static("application/json")
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    client: blocking::Client,
}

impl Client {
    pub fn try_new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()
            .map_err(|e| Error::Request {
                url: String::new(),
                reason: format!("failed to initialize client: {e}"),
            })?;
        Ok(Client { client })
    }

    pub fn get<D>(&self, d: D, url: reqwest::Url) -> RequestBuilder<D>
    where
        D: Deserializer,
    {
        RequestBuilder {
            url,
            d,
            client: self.client.clone(),
        }
    }
}

pub struct RequestBuilder<D>
where
    D: Deserializer,
{
    url: reqwest::Url,
    d: D,
    client: blocking::Client,
}

impl<D> RequestBuilder<D>
where
    D: Deserializer,
{
    pub fn send<T>(self) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let failed = |reason: String| Error::Request {
            url: self.url.to_string(),
            reason,
        };

        info!("Fetching {}", self.url);
        let resp = self
            .client
            .get(self.url.clone())
            .header(header::ACCEPT, self.d.accept())
            .send()
            .map_err(|e| {
                info!("Failed to fetch: {}", e);
                failed(e.to_string())
            })?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            info!("Failed to fetch: {}", status);
            return Err(failed(format!("unexpected status {status}")));
        }

        debug!("Fetch successful");
        self.d.deserialize(resp).map_err(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        name: String,
    }

    fn client() -> Client {
        Client::try_new(Duration::from_secs(5), "test-agent/1.0").unwrap()
    }

    #[test]
    fn test_get_json() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/thing")
            .match_header("user-agent", "test-agent/1.0")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body(r#"{"name": "foo"}"#)
            .create();

        let url = reqwest::Url::parse(&format!("{}/thing", server.url())).unwrap();
        let thing: Thing = client().get(Json, url).send().unwrap();
        mock.assert();
        assert_eq!(
            thing,
            Thing {
                name: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_get_failures() {
        let mut server = mockito::Server::new();
        let base = server.url();
        let url_for = |path: &str| reqwest::Url::parse(&format!("{base}{path}")).unwrap();

        // Fail on not found
        let res: Result<Thing> = client().get(Json, url_for("/missing")).send();
        assert!(matches!(res, Err(Error::Request { .. })));

        // Fail on internal server errors
        let mock = server.mock("GET", "/broken").with_status(503).create();
        let res: Result<Thing> = client().get(Json, url_for("/broken")).send();
        assert!(matches!(res, Err(Error::Request { .. })));
        mock.assert();

        // Fail on garbage
        server
            .mock("GET", "/garbage")
            .with_status(200)
            .with_body("not json")
            .create();
        let res: Result<Thing> = client().get(Json, url_for("/garbage")).send();
        match res {
            Err(Error::Request { reason, .. }) => assert!(reason.contains("json")),
            x => panic!("unexpected result: {x:?}"),
        }
    }
}
