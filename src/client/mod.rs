//! HTTP client for the media API with a shared, invalidate-on-write query cache.
//!
//! A [`MediaClient`] is cheap to clone; clones share the same cache, so every
//! consumer reading [`QueryKey::MediaList`] sees the same data and every
//! successful mutation forces the next read to go back to the server.

mod cache;
mod query;

pub use cache::{QueryCache, QueryKey};
pub use query::{
    CreateMediaMutation, DeleteManyMediaMutation, DeleteMediaMutation, MediaListQuery,
    MutationStatus, QueryStatus,
};

use crate::models::{DeleteManyRequest, MediaItem, NewMedia, SuccessResponse};
use reqwest::Response;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, or a response body that could not be decoded.
    #[error("failed to reach media API: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("media API rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type MediaList = Arc<Vec<MediaItem>>;

#[derive(Debug, Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    base_url: Url,
    cache: QueryCache<MediaList>,
}

impl MediaClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self::with_http(reqwest::Client::new(), Url::parse(base_url)?))
    }

    /// `base_url` may carry a path prefix (`http://host/vault`); API paths are
    /// resolved below it.
    pub fn with_http(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache<MediaList> {
        &self.cache
    }

    pub fn list_query(&self) -> MediaListQuery {
        MediaListQuery::new(self.clone())
    }

    pub fn create_mutation(&self) -> CreateMediaMutation {
        CreateMediaMutation::new(self.clone())
    }

    pub fn delete_mutation(&self) -> DeleteMediaMutation {
        DeleteMediaMutation::new(self.clone())
    }

    pub fn delete_many_mutation(&self) -> DeleteManyMediaMutation {
        DeleteManyMediaMutation::new(self.clone())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn fetch_media(&self) -> Result<Vec<MediaItem>, ClientError> {
        let url = self.endpoint(QueryKey::MediaList.path())?;
        let response = self.http.get(url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn post_media(&self, input: &NewMedia) -> Result<MediaItem, ClientError> {
        let url = self.endpoint("/api/media")?;
        let response = self.http.post(url).json(input).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn remove_media(&self, id: i64) -> Result<SuccessResponse, ClientError> {
        let url = self.endpoint(&format!("/api/media/{}", id))?;
        let response = self.http.delete(url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn remove_many_media(&self, ids: &[i64]) -> Result<SuccessResponse, ClientError> {
        let url = self.endpoint("/api/media/delete-many")?;
        let body = DeleteManyRequest { ids: ids.to_vec() };
        let response = self.http.post(url).json(&body).send().await?;
        Ok(check(response).await?.json().await?)
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}
