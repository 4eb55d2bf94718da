//! [`RemoteStore`] backed by the `eventra-api` HTTP service.
//!
//! Successful responses use the `{ "data": ... }` envelope; errors carry
//! `{ "error": ..., "code": ... }`.

use std::time::Duration;

use async_trait::async_trait;
use eventra_core::category::{Category, CategoryDraft, CategoryPatch};
use eventra_core::settings::SettingsDocument;
use eventra_core::types::DbId;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::SyncError;
use crate::remote::RemoteStore;

/// Default timeout for a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the remote store API.
#[derive(Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api/v1`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, SyncError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn data<T: DeserializeOwned>(response: Response) -> Result<T, SyncError> {
        let envelope: DataEnvelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

/// Turn a non-2xx response into a [`SyncError`].
async fn check(
    response: Response,
    entity: &'static str,
    id: DbId,
) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(SyncError::NotFound { entity, id });
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    tracing::warn!(status = status.as_u16(), error = %message, entity, id, "Remote store request failed");
    Err(SyncError::Remote {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list_categories(&self, event_id: DbId) -> Result<Vec<Category>, SyncError> {
        let response = self
            .client
            .get(self.url(&format!("/events/{event_id}/categories")))
            .send()
            .await?;
        Self::data(check(response, "Event", event_id).await?).await
    }

    async fn insert_category(
        &self,
        event_id: DbId,
        draft: &CategoryDraft,
    ) -> Result<Category, SyncError> {
        let response = self
            .client
            .post(self.url(&format!("/events/{event_id}/categories")))
            .json(draft)
            .send()
            .await?;
        Self::data(check(response, "Event", event_id).await?).await
    }

    async fn update_category(&self, id: DbId, patch: &CategoryPatch) -> Result<Category, SyncError> {
        let response = self
            .client
            .patch(self.url(&format!("/categories/{id}")))
            .json(patch)
            .send()
            .await?;
        Self::data(check(response, "Category", id).await?).await
    }

    async fn delete_category(&self, id: DbId) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(self.url(&format!("/categories/{id}")))
            .send()
            .await?;
        match check(response, "Category", id).await {
            Ok(_) | Err(SyncError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn fetch_settings(&self, event_id: DbId) -> Result<Option<SettingsDocument>, SyncError> {
        let response = self
            .client
            .get(self.url(&format!("/events/{event_id}/attendee-settings")))
            .send()
            .await?;
        let stored: Option<serde_json::Value> =
            Self::data(check(response, "Event", event_id).await?).await?;
        stored
            .map(SettingsDocument::from_value)
            .transpose()
            .map_err(SyncError::from)
    }

    async fn store_settings(
        &self,
        event_id: DbId,
        document: &SettingsDocument,
    ) -> Result<(), SyncError> {
        let response = self
            .client
            .put(self.url(&format!("/events/{event_id}/attendee-settings")))
            .json(document)
            .send()
            .await?;
        check(response, "Event", event_id).await?;
        Ok(())
    }
}
