use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, RequestBuilder, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Item, ItemId},
    error::StoreError,
    protocol::{NewItemRequest, UpdateItemRequest},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::{classify_status, classify_transport, RemoteSetupError};

pub const DEFAULT_API_URL: &str = "https://localhost:7122/api/Items";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The remote source of truth for the item collection.
///
/// Every method is exactly one round trip and reports failures already classified.
#[async_trait]
pub trait ItemRemote: Send + Sync {
    async fn list(&self) -> Result<Vec<Item>, StoreError>;
    async fn fetch(&self, id: ItemId) -> Result<Item, StoreError>;
    async fn create(&self, body: NewItemRequest) -> Result<Item, StoreError>;
    async fn update(&self, id: ItemId, body: UpdateItemRequest) -> Result<Item, StoreError>;
    async fn delete(&self, id: ItemId) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Collection URL; single items live at `{api_url}/{id}`.
    pub api_url: String,
    pub request_timeout: Duration,
    /// Trust self-signed development certificates.
    pub accept_invalid_certs: bool,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

/// JSON-over-HTTP implementation of [`ItemRemote`].
pub struct HttpItemRemote {
    http: Client,
    collection_url: Url,
}

impl HttpItemRemote {
    pub fn new(settings: &RemoteSettings) -> Result<Self, RemoteSetupError> {
        let raw_url = settings.api_url.trim();
        let collection_url = Url::parse(raw_url).map_err(|source| RemoteSetupError::InvalidUrl {
            url: raw_url.to_string(),
            source,
        })?;
        if collection_url.cannot_be_a_base() {
            return Err(RemoteSetupError::CannotBeABase(raw_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn item_url(&self, id: ItemId) -> Url {
        let mut url = self.collection_url.clone();
        // cannot_be_a_base was rejected in new(), so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let request = request
            .build()
            .map_err(|err| StoreError::Unknown(format!("failed to build item request: {err}")))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "items: sending request");

        let outcome = match self.http.execute(request).await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => Err(classify_status(&url, response.status())),
            Err(err) => Err(classify_transport(&url, err)),
        };
        if let Err(err) = &outcome {
            warn!(%method, %url, kind = ?err.kind(), "items: request failed: {err}");
        }
        outcome
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let url = response.url().clone();
        response.json::<T>().await.map_err(|err| {
            let err = classify_transport(&url, err);
            warn!(%url, kind = ?err.kind(), "items: unreadable response: {err}");
            err
        })
    }
}

#[async_trait]
impl ItemRemote for HttpItemRemote {
    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        let response = self
            .execute(self.http.get(self.collection_url.clone()))
            .await?;
        Self::read_json(response).await
    }

    async fn fetch(&self, id: ItemId) -> Result<Item, StoreError> {
        let response = self.execute(self.http.get(self.item_url(id))).await?;
        Self::read_json(response).await
    }

    async fn create(&self, body: NewItemRequest) -> Result<Item, StoreError> {
        let response = self
            .execute(self.http.post(self.collection_url.clone()).json(&body))
            .await?;
        Self::read_json(response).await
    }

    async fn update(&self, id: ItemId, body: UpdateItemRequest) -> Result<Item, StoreError> {
        let response = self
            .execute(self.http.put(self.item_url(id)).json(&body))
            .await?;
        Self::read_json(response).await
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        self.execute(self.http.delete(self.item_url(id))).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
