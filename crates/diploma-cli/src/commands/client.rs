//! Thin JSON client for the node's HTTP API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9101";

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

pub struct NodeClient {
    endpoint: String,
    http: reqwest::Client,
}

impl NodeClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        self.execute(self.http.get(self.url(path))).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        self.execute(self.http.post(self.url(path)).json(body)).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        self.execute(self.http.patch(self.url(path)).json(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> anyhow::Result<T> {
        let resp = request.send().await.map_err(|e| {
            anyhow::anyhow!(
                "could not reach node at {} ({}); is diploma-node running?",
                self.endpoint,
                e
            )
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        match resp.json::<ErrorResponse>().await {
            Ok(err) => anyhow::bail!("request failed (HTTP {}): {}", status, err.error),
            Err(_) => anyhow::bail!("request failed (HTTP {})", status),
        }
    }
}
