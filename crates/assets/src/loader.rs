//! Path-keyed model cache with shared in-flight loads

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use atelier_config::AssetConfig;
use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use crate::decode::decode_gltf;
use crate::error::ModelLoadError;
use crate::model::ModelData;
use crate::source::{FsSource, ModelSource};

type LoadResult = Result<Arc<ModelData>, ModelLoadError>;
type SharedLoad = Shared<BoxFuture<'static, LoadResult>>;

/// How transient fetch failures are retried
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&AssetConfig::default())
    }
}

impl From<&AssetConfig> for RetryPolicy {
    fn from(config: &AssetConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            multiplier: config.backoff_multiplier.max(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(self.multiplier.saturating_pow(attempt.saturating_sub(1)))
    }
}

#[derive(Default)]
struct LoaderState {
    cache: HashMap<String, Arc<ModelData>>,
    in_flight: HashMap<String, SharedLoad>,
    /// Bumped by `clear_cache` so loads started earlier don't repopulate it
    generation: u64,
}

struct Inner<S> {
    source: S,
    policy: RetryPolicy,
    state: Mutex<LoaderState>,
}

impl<S: ModelSource> Inner<S> {
    fn lock(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn fetch_with_retry(&self, path: &str) -> Result<Vec<u8>, ModelLoadError> {
        let mut attempt = 1;
        loop {
            match self.source.fetch(path).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) if err.is_transient() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff_for(attempt);
                    warn!(
                        "Fetching {} failed (attempt {}/{}), retrying in {:?}: {}",
                        path, attempt, self.policy.max_attempts, delay, err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn load_uncached(&self, path: &str) -> LoadResult {
        let bytes = self.fetch_with_retry(path).await?;
        let base = self.source.base_dir(path);
        let owned_path = path.to_string();

        let decoded =
            tokio::task::spawn_blocking(move || decode_gltf(&owned_path, &bytes, base.as_deref()))
                .await
                .map_err(|e| ModelLoadError::Decode {
                    path: path.to_string(),
                    message: e.to_string(),
                })??;
        Ok(Arc::new(decoded))
    }
}

/// Loads and caches furniture models.
///
/// Cloning is cheap; clones share the cache.
pub struct ModelLoader<S = FsSource> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for ModelLoader<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ModelLoader<FsSource> {
    /// Loader reading from disk under `config.root`
    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(FsSource::new(config.root.clone()), RetryPolicy::from(config))
    }
}

impl<S: ModelSource> ModelLoader<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                policy,
                state: Mutex::new(LoaderState::default()),
            }),
        }
    }

    /// Load `path`, returning an independent copy of the model.
    ///
    /// Concurrent calls for the same uncached path share a single fetch.
    pub async fn load_model(&self, path: &str) -> Result<ModelData, ModelLoadError> {
        let load = {
            let mut state = self.inner.lock();
            if let Some(model) = state.cache.get(path) {
                debug!("Model cache hit: {}", path);
                return Ok(ModelData::clone(model));
            }
            let generation = state.generation;
            state
                .in_flight
                .entry(path.to_string())
                .or_insert_with(|| self.start_load(path, generation))
                .clone()
        };

        load.await.map(|model| ModelData::clone(&model))
    }

    fn start_load(&self, path: &str, generation: u64) -> SharedLoad {
        let inner = Arc::clone(&self.inner);
        let path = path.to_string();
        info!("Loading model {}", path);

        async move {
            let result = inner.load_uncached(&path).await;

            let mut state = inner.lock();
            state.in_flight.remove(&path);
            match &result {
                Ok(model) if state.generation == generation => {
                    state.cache.insert(path, Arc::clone(model));
                }
                Ok(_) => debug!("Cache cleared while loading {}, not caching", path),
                Err(err) => warn!("Model load failed: {}", err),
            }
            result
        }
        .boxed()
        .shared()
    }

    /// Warm the cache for `paths`. One failure doesn't stop the others.
    pub async fn preload_models<P: AsRef<str>>(
        &self,
        paths: &[P],
    ) -> Vec<(String, Result<(), ModelLoadError>)> {
        let loads = paths.iter().map(|path| {
            let path = path.as_ref().to_string();
            async move {
                let result = self.load_model(&path).await.map(|_| ());
                (path, result)
            }
        });
        let results = join_all(loads).await;

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        info!("Preloaded {} models ({} failed)", results.len(), failed);
        results
    }

    pub fn is_cached(&self, path: &str) -> bool {
        self.inner.lock().cache.contains_key(path)
    }

    pub fn cached_count(&self) -> usize {
        self.inner.lock().cache.len()
    }

    /// Drop every cached model. Loads already running finish but aren't cached.
    pub fn clear_cache(&self) {
        let mut state = self.inner.lock();
        state.cache.clear();
        state.generation += 1;
        debug!("Model cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::tests::TRIANGLE_GLTF;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source that counts fetches and can fail transiently
    #[derive(Default)]
    struct FakeSource {
        fetches: AtomicUsize,
        transient_failures: AtomicUsize,
        delay_ms: u64,
    }

    impl FakeSource {
        fn failing(times: usize) -> Self {
            Self {
                transient_failures: AtomicUsize::new(times),
                ..Default::default()
            }
        }

        fn slow(delay_ms: u64) -> Self {
            Self {
                delay_ms,
                ..Default::default()
            }
        }
    }

    impl ModelSource for FakeSource {
        async fn fetch(&self, path: &str) -> Result<Vec<u8>, ModelLoadError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            match path {
                "missing.glb" => Err(ModelLoadError::Fetch {
                    path: path.to_string(),
                    message: "not found".to_string(),
                    transient: false,
                }),
                "garbage.glb" => Ok(b"garbage".to_vec()),
                _ => {
                    let remaining = self.transient_failures.load(Ordering::SeqCst);
                    if remaining > 0 {
                        self.transient_failures.store(remaining - 1, Ordering::SeqCst);
                        return Err(ModelLoadError::Fetch {
                            path: path.to_string(),
                            message: "connection reset".to_string(),
                            transient: true,
                        });
                    }
                    Ok(TRIANGLE_GLTF.as_bytes().to_vec())
                }
            }
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            multiplier: 2,
        }
    }

    fn source_of<S: ModelSource>(loader: &ModelLoader<S>) -> &S {
        &loader.inner.source
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_for(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_fetch() {
        let loader = ModelLoader::new(FakeSource::default(), fast_policy());
        loader.load_model("desk.gltf").await.unwrap();
        loader.load_model("desk.gltf").await.unwrap();

        assert!(loader.is_cached("desk.gltf"));
        assert_eq!(source_of(&loader).fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_returned_models_are_independent() {
        let loader = ModelLoader::new(FakeSource::default(), fast_policy());
        let mut first = loader.load_model("desk.gltf").await.unwrap();
        first.meshes[0].positions[0] = [9.0, 9.0, 9.0];

        let second = loader.load_model("desk.gltf").await.unwrap();
        assert_eq!(second.meshes[0].positions[0], [1.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_overlapping_loads_share_one_fetch() {
        let loader = ModelLoader::new(FakeSource::slow(20), fast_policy());
        let (a, b) = tokio::join!(loader.load_model("desk.gltf"), loader.load_model("desk.gltf"));

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(source_of(&loader).fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let loader = ModelLoader::new(FakeSource::failing(2), fast_policy());
        assert!(loader.load_model("desk.gltf").await.is_ok());
        assert_eq!(source_of(&loader).fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_give_up_after_max_attempts() {
        let loader = ModelLoader::new(FakeSource::failing(5), fast_policy());
        let err = loader.load_model("desk.gltf").await.unwrap_err();

        assert!(err.is_transient());
        assert!(!loader.is_cached("desk.gltf"));
        assert_eq!(source_of(&loader).fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_failures_are_not_retried() {
        let loader = ModelLoader::new(FakeSource::default(), fast_policy());
        assert!(loader.load_model("missing.glb").await.is_err());
        assert_eq!(source_of(&loader).fetches.load(Ordering::SeqCst), 1);

        let err = loader.load_model("garbage.glb").await.unwrap_err();
        assert!(matches!(err, ModelLoadError::Decode { .. }));
        assert_eq!(source_of(&loader).fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preload_reports_each_path() {
        let loader = ModelLoader::new(FakeSource::default(), fast_policy());
        let results = loader
            .preload_models(&["desk.gltf", "missing.glb", "chair.gltf"])
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, "missing.glb");
        assert!(results[1].1.is_err());
        assert!(results[2].1.is_ok());
        assert_eq!(loader.cached_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let loader = ModelLoader::new(FakeSource::default(), fast_policy());
        loader.load_model("desk.gltf").await.unwrap();
        loader.clear_cache();
        assert_eq!(loader.cached_count(), 0);

        loader.load_model("desk.gltf").await.unwrap();
        assert_eq!(source_of(&loader).fetches.load(Ordering::SeqCst), 2);
    }
}
