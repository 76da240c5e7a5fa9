//! Hierarchy backend client.
//!
//! HTTP binding of the two engine contracts. Transport failures map to
//! `BackendError::Network`; any non-success status maps to
//! `BackendError::Remote` carrying the (truncated) response body, which
//! the notification layer surfaces verbatim.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use org_console_types::{HierarchyScope, NodeId, ParentPatch, Snapshot};
use reorg_engine::{BackendError, HierarchyBackend};

use crate::config::ConsoleConfig;

const ERROR_BODY_LIMIT: usize = 200;

/// REST implementation of [`HierarchyBackend`].
pub struct RestHierarchyClient {
    http: Client,
    api_base: String,
}

impl RestHierarchyClient {
    /// Build a client from console configuration.
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        Self::with_base(&config.api_base, config.request_timeout)
    }

    /// Build a client against an explicit base URL.
    pub fn with_base(api_base: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn remote_error(response: reqwest::Response) -> BackendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        BackendError::Remote(format!(
            "{}: {}",
            status,
            body.chars().take(ERROR_BODY_LIMIT).collect::<String>()
        ))
    }
}

#[async_trait]
impl HierarchyBackend for RestHierarchyClient {
    async fn fetch_hierarchy(&self, scope: HierarchyScope) -> Result<Snapshot, BackendError> {
        let url = format!("{}/api/hierarchy", self.api_base);
        let response = self
            .http
            .get(&url)
            .query(&[("stateId", scope.state_id), ("partyId", scope.party_id)])
            .send()
            .await
            .map_err(|err| BackendError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::remote_error(response).await);
        }

        response
            .json::<Snapshot>()
            .await
            .map_err(|err| BackendError::Remote(format!("invalid snapshot payload: {err}")))
    }

    async fn update_parent_ref(
        &self,
        node: NodeId,
        patch: &ParentPatch,
    ) -> Result<(), BackendError> {
        let url = format!("{}/api/hierarchy/nodes/{}/parent", self.api_base, node);
        let response = self
            .http
            .put(&url)
            .json(patch)
            .send()
            .await
            .map_err(|err| BackendError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::remote_error(response).await);
        }
        Ok(())
    }
}
