use super::{ClientError, MediaClient, MediaList, QueryKey};
use crate::models::{MediaItem, MediaType, NewMedia, SuccessResponse};
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error(String),
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Default)]
struct StatusCell<S>(Arc<RwLock<S>>);

impl<S: Clone> StatusCell<S> {
    fn get(&self) -> S {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, status: S) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

/// The media list as seen through the shared cache.
#[derive(Debug, Clone)]
pub struct MediaListQuery {
    client: MediaClient,
    status: StatusCell<QueryStatus>,
}

impl MediaListQuery {
    pub(super) fn new(client: MediaClient) -> Self {
        Self {
            client,
            status: StatusCell::default(),
        }
    }

    pub fn status(&self) -> QueryStatus {
        self.status.get()
    }

    /// Last fetched list, possibly stale.
    pub fn data(&self) -> Option<MediaList> {
        self.client.cache.peek(QueryKey::MediaList)
    }

    /// Returns the cached list, fetching it first when absent or invalidated.
    pub async fn fetch(&self) -> Result<MediaList, ClientError> {
        if let Some(items) = self.client.cache.get(QueryKey::MediaList) {
            self.status.set(QueryStatus::Success);
            return Ok(items);
        }

        let started_at = self.client.cache.generation(QueryKey::MediaList);
        self.status.set(QueryStatus::Loading);
        match self.client.fetch_media().await {
            Ok(items) => {
                let items = Arc::new(items);
                self.client
                    .cache
                    .insert_fetched(QueryKey::MediaList, items.clone(), started_at);
                self.status.set(QueryStatus::Success);
                Ok(items)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch media: {}", e);
                self.status.set(QueryStatus::Error(e.to_string()));
                Err(e)
            }
        }
    }

    pub async fn refetch(&self) -> Result<MediaList, ClientError> {
        self.client.cache.invalidate(QueryKey::MediaList);
        self.fetch().await
    }

    /// Only the photos, or only the videos, of the current list.
    pub async fn of_type(&self, media_type: MediaType) -> Result<Vec<MediaItem>, ClientError> {
        let items = self.fetch().await?;
        Ok(items
            .iter()
            .filter(|item| item.media_type == media_type)
            .cloned()
            .collect())
    }
}

/// Runs one write and moves the status through pending to success or error.
/// A successful write invalidates the media list.
async fn run_mutation<T, F>(
    client: &MediaClient,
    status: &StatusCell<MutationStatus>,
    request: F,
) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    status.set(MutationStatus::Pending);
    match request.await {
        Ok(value) => {
            client.cache.invalidate(QueryKey::MediaList);
            status.set(MutationStatus::Success);
            Ok(value)
        }
        Err(e) => {
            status.set(MutationStatus::Error(e.to_string()));
            Err(e)
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateMediaMutation {
    client: MediaClient,
    status: StatusCell<MutationStatus>,
}

impl CreateMediaMutation {
    pub(super) fn new(client: MediaClient) -> Self {
        Self {
            client,
            status: StatusCell::default(),
        }
    }

    pub async fn mutate(&self, input: &NewMedia) -> Result<MediaItem, ClientError> {
        run_mutation(&self.client, &self.status, self.client.post_media(input)).await
    }

    pub fn status(&self) -> MutationStatus {
        self.status.get()
    }

    pub fn reset(&self) {
        self.status.set(MutationStatus::Idle);
    }
}

#[derive(Debug, Clone)]
pub struct DeleteMediaMutation {
    client: MediaClient,
    status: StatusCell<MutationStatus>,
}

impl DeleteMediaMutation {
    pub(super) fn new(client: MediaClient) -> Self {
        Self {
            client,
            status: StatusCell::default(),
        }
    }

    pub async fn mutate(&self, id: i64) -> Result<SuccessResponse, ClientError> {
        run_mutation(&self.client, &self.status, self.client.remove_media(id)).await
    }

    pub fn status(&self) -> MutationStatus {
        self.status.get()
    }

    pub fn reset(&self) {
        self.status.set(MutationStatus::Idle);
    }
}

#[derive(Debug, Clone)]
pub struct DeleteManyMediaMutation {
    client: MediaClient,
    status: StatusCell<MutationStatus>,
}

impl DeleteManyMediaMutation {
    pub(super) fn new(client: MediaClient) -> Self {
        Self {
            client,
            status: StatusCell::default(),
        }
    }

    pub async fn mutate(&self, ids: &[i64]) -> Result<SuccessResponse, ClientError> {
        run_mutation(&self.client, &self.status, self.client.remove_many_media(ids)).await
    }

    pub fn status(&self) -> MutationStatus {
        self.status.get()
    }

    pub fn reset(&self) {
        self.status.set(MutationStatus::Idle);
    }
}
