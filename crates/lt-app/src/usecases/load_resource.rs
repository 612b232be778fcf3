//! Resolve a configured resource and run it through the acquisition pipeline.
//! 按配置解析资源并执行获取流程。

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info_span, warn, Instrument};

use lt_core::config::ResourceConfig;
use lt_core::ports::BundledDatasetPort;
use lt_core::{AcquireError, AcquiredPack, ResourceId};

use super::{AcquireRequest, AcquireResource};

#[derive(Debug, Error)]
pub enum LoadResourceError {
    #[error("resource `{0}` is not configured")]
    UnknownResource(ResourceId),

    #[error(transparent)]
    Unavailable(#[from] AcquireError),
}

pub struct LoadResource {
    resources: BTreeMap<ResourceId, ResourceConfig>,
    bundled: Arc<dyn BundledDatasetPort>,
    acquire: Arc<AcquireResource>,
}

impl LoadResource {
    pub fn new(
        resources: BTreeMap<ResourceId, ResourceConfig>,
        bundled: Arc<dyn BundledDatasetPort>,
        acquire: Arc<AcquireResource>,
    ) -> Self {
        Self {
            resources,
            bundled,
            acquire,
        }
    }

    pub fn configured(&self) -> impl Iterator<Item = (&ResourceId, &ResourceConfig)> {
        self.resources.iter()
    }

    pub async fn execute(
        &self,
        resource_id: &ResourceId,
        force_network: bool,
    ) -> Result<AcquiredPack, LoadResourceError> {
        let config = self
            .resources
            .get(resource_id)
            .ok_or_else(|| LoadResourceError::UnknownResource(resource_id.clone()))?;

        let span = info_span!("usecase.load_resource.execute", resource_id = %resource_id);
        async {
            // A broken bundled file must not block the other tiers.
            let bundled = match self.bundled.load(resource_id, config.kind).await {
                Ok(pack) => pack,
                Err(err) => {
                    warn!(error = %err, "failed to read bundled dataset");
                    None
                }
            };

            let request = AcquireRequest::new(resource_id.clone(), config.kind)
                .with_mirrors(config.mirrors.iter().cloned())
                .with_bundled(bundled)
                .force_network(force_network)
                .min_items(config.min_items());

            Ok(self.acquire.execute(request).await?)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use lt_core::ports::{ClockPort, MirrorFetcherPort, ResourceStorePort};
    use lt_core::{
        AcquireStatus, Book, CacheEntry, FetchError, ResourceKind, ResourcePack,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct NoStore;

    #[async_trait]
    impl ResourceStorePort for NoStore {
        async fn load(&self, _key: &ResourceId) -> anyhow::Result<Option<CacheEntry>> {
            Ok(None)
        }
        async fn store(&self, _entry: &CacheEntry) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingFetcher {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MirrorFetcherPort for RecordingFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.urls.lock().unwrap().push(url.to_string());
            Err(FetchError::transport(url, "offline"))
        }
    }

    struct Clock;

    impl ClockPort for Clock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    struct OneBook {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BundledDatasetPort for OneBook {
        async fn load(
            &self,
            id: &ResourceId,
            _kind: ResourceKind,
        ) -> anyhow::Result<Option<ResourcePack>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(ResourcePack::scripture(
                id.clone(),
                vec![Book {
                    name: "Gênesis".into(),
                    abbrev: Some("gn".into()),
                    chapters: vec![vec!["No princípio".into()]],
                }],
            )))
        }
    }

    fn config() -> BTreeMap<ResourceId, ResourceConfig> {
        BTreeMap::from([(
            ResourceId::new("bible_nvi"),
            ResourceConfig {
                kind: ResourceKind::Scripture,
                mirrors: vec!["https://m1/nvi.json".into(), "https://m2/nvi.json".into()],
                min_items: None,
            },
        )])
    }

    #[tokio::test]
    async fn uses_configured_mirrors_and_bundled_fallback() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let acquire = Arc::new(AcquireResource::new(
            Arc::new(NoStore),
            fetcher.clone(),
            Arc::new(Clock),
        ));
        let bundled = Arc::new(OneBook {
            calls: AtomicUsize::new(0),
        });
        let usecase = LoadResource::new(config(), bundled.clone(), acquire);

        let acquired = usecase
            .execute(&ResourceId::new("bible_nvi"), false)
            .await
            .unwrap();

        // One book is below the scripture threshold, so mirrors are tried first.
        assert_eq!(acquired.status, AcquireStatus::OfflineFallback);
        assert_eq!(
            *fetcher.urls.lock().unwrap(),
            vec!["https://m1/nvi.json", "https://m2/nvi.json"]
        );
        assert_eq!(bundled.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_resource_is_rejected() {
        let acquire = Arc::new(AcquireResource::new(
            Arc::new(NoStore),
            Arc::new(RecordingFetcher::default()),
            Arc::new(Clock),
        ));
        let usecase = LoadResource::new(
            BTreeMap::new(),
            Arc::new(OneBook {
                calls: AtomicUsize::new(0),
            }),
            acquire,
        );

        let err = usecase
            .execute(&ResourceId::new("harpa"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadResourceError::UnknownResource(_)));
    }
}
