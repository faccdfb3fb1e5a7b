//! Typed HTTP access to the Bookshelf API.
//!
//! [`HttpRepository`] issues the list/get/create/update/delete calls for one
//! resource type. Reads decode only on `200 OK`; writes report whether the
//! server answered with the success status for that operation.

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use bookshelf_kernel::settings::{ClientSettings, DEFAULT_API_BASE_URL as DEFAULT_BASE_URL};

pub const AUTHORS: &str = "authors";
pub const BOOKS: &str = "books";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// URL of a resource collection, e.g. `http://host/api/books`.
pub fn endpoint(base_url: &str, resource: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), resource)
}

/// Collection URL of `resource` under the configured API root.
pub fn resource_url(settings: &ClientSettings, resource: &str) -> String {
    endpoint(&settings.base_url, resource)
}

fn collection_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn item_url(base_url: &str, id: i64) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

/// Client-side repository for resources of type `T`.
///
/// `base_url` arguments point at a collection endpoint (see [`endpoint`]);
/// a trailing slash is accepted.
#[derive(Debug)]
pub struct HttpRepository<T> {
    client: Client,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpRepository<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T> HttpRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Client with the default settings.
    pub fn new() -> Result<Self> {
        Self::from_settings(&ClientSettings::default())
    }

    /// Client using the configured request timeout.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self::with_client(client))
    }

    /// Share an existing connection pool.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    /// GET one item. `None` for any status other than 200.
    pub async fn get(&self, base_url: &str, id: i64) -> Result<Option<T>> {
        let url = item_url(base_url, id);
        self.fetch(url).await
    }

    /// GET the whole collection. `None` for any status other than 200.
    pub async fn list(&self, base_url: &str) -> Result<Option<Vec<T>>> {
        let url = collection_url(base_url);
        self.fetch(url).await
    }

    /// POST a new item; true iff the server answered 201.
    pub async fn create(&self, base_url: &str, entity: &T) -> Result<bool> {
        let url = collection_url(base_url);
        let request = self.client.post(&url).json(entity);
        self.send_expecting(request, url, StatusCode::CREATED).await
    }

    /// PUT a full replacement of item `id`; true iff the server answered 204.
    pub async fn update(&self, base_url: &str, id: i64, entity: &T) -> Result<bool> {
        let url = item_url(base_url, id);
        let request = self.client.put(&url).json(entity);
        self.send_expecting(request, url, StatusCode::NO_CONTENT).await
    }

    /// DELETE item `id`; true iff the server answered 204.
    ///
    /// Ids below 1 are refused locally without a request.
    pub async fn delete(&self, base_url: &str, id: i64) -> Result<bool> {
        if id < 1 {
            tracing::warn!(id, "refusing to delete with a non-positive id");
            return Ok(false);
        }
        let url = item_url(base_url, id);
        let request = self.client.delete(&url);
        self.send_expecting(request, url, StatusCode::NO_CONTENT).await
    }

    async fn fetch<R: DeserializeOwned>(&self, url: String) -> Result<Option<R>> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(%url, %status, "no content decoded");
            return Ok(None);
        }

        let body = response
            .json()
            .await
            .map_err(|source| ClientError::Decode { url, source })?;
        Ok(Some(body))
    }

    async fn send_expecting(
        &self,
        request: reqwest::RequestBuilder,
        url: String,
        expected: StatusCode,
    ) -> Result<bool> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != expected {
            tracing::warn!(%url, %status, %expected, "unexpected status");
        }
        Ok(status == expected)
    }
}
