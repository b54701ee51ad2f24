//! Mock implementation of the video service for testing

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use favsync_core::service::{CollectionId, ServiceError, VideoService, Visibility};
use favsync_core::track::{SearchCandidate, VideoId};

type ServiceResult<T> = Result<T, ServiceError>;

/// Mock implementation of [`VideoService`] with scripted responses
///
/// Each operation pops the next scripted result from its queue and falls
/// back to a benign default when the queue runs dry: searches return no
/// candidates, collection creation returns collection 1, and adds succeed.
/// Every call is logged so tests can assert on exactly what the caller
/// requested and in which order.
///
/// # Examples
///
/// ```rust
/// use favsync_test_utils::MockVideoService;
/// use favsync_test_utils::builders::candidate;
///
/// let mock = MockVideoService::new();
/// mock.expect_search(Ok(vec![candidate(7, "full song", 200)]));
/// ```
#[derive(Clone, Default)]
pub struct MockVideoService {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    search_results: VecDeque<ServiceResult<Vec<SearchCandidate>>>,
    create_results: VecDeque<ServiceResult<CollectionId>>,
    add_results: VecDeque<ServiceResult<()>>,
    search_queries: Vec<String>,
    created_collections: Vec<(String, Visibility)>,
    added_videos: Vec<(CollectionId, VideoId)>,
    search_delay: Duration,
}

impl MockVideoService {
    /// Create a mock with empty scripts and default fallbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome of the next unscripted search call.
    pub fn expect_search(&self, result: ServiceResult<Vec<SearchCandidate>>) {
        self.state.lock().unwrap().search_results.push_back(result);
    }

    /// Script the outcome of the next unscripted collection creation.
    pub fn expect_create_collection(&self, result: ServiceResult<CollectionId>) {
        self.state.lock().unwrap().create_results.push_back(result);
    }

    /// Script the outcome of the next unscripted add.
    pub fn expect_add(&self, result: ServiceResult<()>) {
        self.state.lock().unwrap().add_results.push_back(result);
    }

    /// Simulated network latency applied to every search.
    pub fn set_search_delay(&self, delay: Duration) {
        self.state.lock().unwrap().search_delay = delay;
    }

    /// Queries passed to `search`, in call order.
    pub fn search_queries(&self) -> Vec<String> {
        self.state.lock().unwrap().search_queries.clone()
    }

    /// Names and visibilities passed to `create_collection`, in call order.
    pub fn created_collections(&self) -> Vec<(String, Visibility)> {
        self.state.lock().unwrap().created_collections.clone()
    }

    /// Videos added so far, paired with their target collection.
    pub fn added_videos(&self) -> Vec<(CollectionId, VideoId)> {
        self.state.lock().unwrap().added_videos.clone()
    }
}

#[async_trait]
impl VideoService for MockVideoService {
    async fn search(&self, query: &str) -> ServiceResult<Vec<SearchCandidate>> {
        let delay = self.state.lock().unwrap().search_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        state.search_queries.push(query.to_string());
        state
            .search_results
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_collection(
        &self,
        name: &str,
        visibility: Visibility,
    ) -> ServiceResult<CollectionId> {
        let mut state = self.state.lock().unwrap();
        state
            .created_collections
            .push((name.to_string(), visibility));
        state
            .create_results
            .pop_front()
            .unwrap_or(Ok(CollectionId(1)))
    }

    async fn add_to_collection(
        &self,
        collection: CollectionId,
        video: VideoId,
    ) -> ServiceResult<()> {
        let mut state = self.state.lock().unwrap();
        state.added_videos.push((collection, video));
        state.add_results.pop_front().unwrap_or(Ok(()))
    }
}
