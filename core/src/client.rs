//! HTTP client for a GitLab project's CI variable store.

use std::collections::HashSet;
use std::time::Duration;

use futures::future::{join_all, Either};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use serde_json::Value;

use crate::error::{preview_body, KeyFailure, PageFailure, SyncError};
use crate::models::{Variable, VariablePayload};
use crate::project::ProjectReference;
use crate::sync::{plan_action, SyncAction};
use crate::value;

/// Response header carrying the total page count of a collection.
const TOTAL_PAGES_HEADER: &str = "x-total-pages";

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Client for the CI variables of one remote project.
///
/// The project identity is resolved once at construction; the token rides
/// along verbatim as the `private_token` query parameter on every request,
/// which is what the consumed `api/v4` surface expects. No remote state is
/// cached between calls.
pub struct GitlabClient {
    http: reqwest::Client,
    variables_url: String,
    token_query: String,
}

impl GitlabClient {
    pub fn new(url: &str, token: &str) -> Result<Self, SyncError> {
        Self::with_timeout(url, token, DEFAULT_TIMEOUT_MS)
    }

    /// Like [`GitlabClient::new`] with an explicit per-request timeout.
    pub fn with_timeout(url: &str, token: &str, timeout_ms: u64) -> Result<Self, SyncError> {
        let project = ProjectReference::parse(url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self {
            http,
            variables_url: project.variables_url(),
            // Forwarded bit-for-bit, never re-encoded.
            token_query: format!("private_token={}", token),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}?{}", self.variables_url, self.token_query)
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}?{}&page={}", self.variables_url, self.token_query, page)
    }

    fn member_url(&self, key: &str) -> String {
        format!("{}/{}?{}", self.variables_url, key, self.token_query)
    }

    /// Create a variable on the project.
    ///
    /// The value is serialized per [`value::to_wire`]. A remote refusal
    /// (duplicate key and the like) surfaces as
    /// [`SyncError::RemoteRejected`]; nothing is retried.
    pub async fn create_variable<T: Serialize>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<Variable, SyncError> {
        let wire = value::to_wire(value)?;
        let url = self.collection_url();
        tracing::debug!(target: "varsync.api", stage = "variable.create.in", key = %key);

        let resp = self
            .http
            .post(&url)
            .json(&VariablePayload { key, value: &wire })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::RemoteRejected {
                key: key.to_string(),
                status: status.as_u16(),
                body: preview_body(&body),
            });
        }

        let variable = resp.json::<Variable>().await?;
        tracing::info!(target: "varsync.api", key = %key, "created new variable");
        Ok(variable)
    }

    /// Update an existing variable on the project.
    ///
    /// Fails with [`SyncError::RemoteNotFound`] when the key does not exist
    /// remotely.
    pub async fn update_variable<T: Serialize>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<Variable, SyncError> {
        let wire = value::to_wire(value)?;
        let url = self.member_url(key);
        tracing::debug!(target: "varsync.api", stage = "variable.update.in", key = %key);

        let resp = self
            .http
            .put(&url)
            .json(&VariablePayload { key, value: &wire })
            .send()
            .await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SyncError::RemoteNotFound {
                key: key.to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::RemoteRejected {
                key: key.to_string(),
                status: status.as_u16(),
                body: preview_body(&body),
            });
        }

        let variable = resp.json::<Variable>().await?;
        tracing::info!(target: "varsync.api", key = %key, "updated variable");
        Ok(variable)
    }

    /// Fetch the complete current variable set of the project.
    ///
    /// A HEAD probe discovers the page count, then every page is fetched
    /// concurrently with no cap (page counts in this domain are small; this
    /// is a known scalability limit). Results land in completion order, so
    /// callers get set semantics only: exactly the union of all pages, no
    /// global ordering. Any page failure voids the whole listing.
    pub async fn list_variables(&self) -> Result<Vec<Variable>, SyncError> {
        let probe = self.http.head(&self.collection_url()).send().await?;
        let total_pages = probe
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or(SyncError::PaginationMetadataMissing)?;
        tracing::debug!(target: "varsync.api", stage = "variables.list", pages = total_pages);

        let mut fetches: FuturesUnordered<_> = (1..=total_pages)
            .map(|page| async move { (page, self.fetch_page(page).await) })
            .collect();

        let mut variables = Vec::new();
        let mut failed = Vec::new();
        while let Some((page, outcome)) = fetches.next().await {
            match outcome {
                Ok(mut page_variables) => variables.append(&mut page_variables),
                Err(error) => failed.push(PageFailure {
                    page,
                    error: Box::new(error),
                }),
            }
        }

        if !failed.is_empty() {
            failed.sort_by_key(|f| f.page);
            return Err(SyncError::PartialListingFailure { failed });
        }
        Ok(variables)
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<Variable>, SyncError> {
        let url = self.page_url(page);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::UnexpectedStatus {
                status: status.as_u16(),
                url,
                body: preview_body(&body),
            });
        }
        Ok(resp.json::<Vec<Variable>>().await?)
    }

    /// Apply a desired property set against the project.
    ///
    /// Each key is decided independently: absent keys are created, present
    /// keys are updated when `force_update` is set and skipped otherwise.
    /// Skipped keys are logged and omitted from the result. All create and
    /// update calls run concurrently; outcomes keep the relative key order of
    /// `properties`. If any per-key call fails the batch as a whole fails
    /// with [`SyncError::BatchSyncPartialFailure`] carrying the variables
    /// that were applied and the per-key failure reasons, so intent and
    /// remote state can be reconciled.
    pub async fn set_variables(
        &self,
        properties: &serde_json::Map<String, Value>,
        force_update: bool,
    ) -> Result<Vec<Variable>, SyncError> {
        if properties.is_empty() {
            return Ok(Vec::new());
        }

        let existing: HashSet<String> = self
            .list_variables()
            .await?
            .into_iter()
            .map(|v| v.key)
            .collect();

        let mut pending = Vec::new();
        for (key, desired) in properties {
            let call = match plan_action(existing.contains(key), force_update) {
                SyncAction::Skip => {
                    tracing::info!(
                        target: "varsync.sync",
                        key = %key,
                        "skipped variable, already set for project"
                    );
                    continue;
                }
                SyncAction::Create => Either::Left(self.create_variable(key, desired)),
                SyncAction::Update => Either::Right(self.update_variable(key, desired)),
            };
            pending.push(async move { (key.clone(), call.await) });
        }

        // join_all keeps the relative key order of `properties`.
        let mut applied = Vec::new();
        let mut failures = Vec::new();
        for (key, outcome) in join_all(pending).await {
            match outcome {
                Ok(variable) => applied.push(variable),
                Err(error) => failures.push(KeyFailure {
                    key,
                    error: Box::new(error),
                }),
            }
        }

        if failures.is_empty() {
            Ok(applied)
        } else {
            Err(SyncError::BatchSyncPartialFailure { applied, failures })
        }
    }
}
