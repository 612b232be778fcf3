//! Use case for acquiring a content pack
//! 获取内容包的用例

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use lt_core::ports::{ClockPort, MirrorFetcherPort, ResourceStorePort};
use lt_core::resource::{normalize, parse_payload};
use lt_core::{
    AcquireError, AcquireStatus, AcquiredPack, AttemptFailure, CacheEntry, FetchError, ResourceId,
    ResourceKind, ResourcePack,
};

/// Input of [`AcquireResource::execute`].
#[derive(Debug, Clone)]
pub struct AcquireRequest {
    pub resource_id: ResourceId,
    pub kind: ResourceKind,
    /// Tried strictly in order, one attempt each.
    pub mirrors: Vec<String>,
    pub bundled: Option<ResourcePack>,
    pub force_network: bool,
    /// Bundled and cached packs must hold more than this many items.
    pub min_items: usize,
}

impl AcquireRequest {
    pub fn new(resource_id: impl Into<ResourceId>, kind: ResourceKind) -> Self {
        Self {
            resource_id: resource_id.into(),
            kind,
            mirrors: Vec::new(),
            bundled: None,
            force_network: false,
            min_items: kind.default_min_items(),
        }
    }

    pub fn with_mirrors<I, S>(mut self, mirrors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mirrors = mirrors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bundled(mut self, bundled: Option<ResourcePack>) -> Self {
        self.bundled = bundled;
        self
    }

    pub fn force_network(mut self, force: bool) -> Self {
        self.force_network = force;
        self
    }

    pub fn min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items;
        self
    }
}

/// Resource Acquisition Pipeline.
///
/// ## Behavior / 行为
/// 1. Bundled dataset above the sanity threshold
/// 2. Durable Resource Store entry above the sanity threshold (skipped when forced)
/// 3. Mirrors in order; the first one that fetches, parses and normalizes wins
///    and is persisted
/// 4. Bundled dataset of any size, flagged as offline fallback
///
/// Malformed bundled or cached data is treated as absent. The only error a
/// caller ever sees is [`AcquireError::ResourceUnavailable`].
pub struct AcquireResource {
    store: Arc<dyn ResourceStorePort>,
    fetcher: Arc<dyn MirrorFetcherPort>,
    clock: Arc<dyn ClockPort>,
}

impl AcquireResource {
    pub fn new(
        store: Arc<dyn ResourceStorePort>,
        fetcher: Arc<dyn MirrorFetcherPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store,
            fetcher,
            clock,
        }
    }

    pub async fn execute(&self, request: AcquireRequest) -> Result<AcquiredPack, AcquireError> {
        let span = info_span!(
            "usecase.acquire_resource.execute",
            resource_id = %request.resource_id,
            kind = %request.kind,
            force_network = request.force_network,
            mirror_count = request.mirrors.len(),
        );

        async move {
            let result = self.acquire(request).await;
            match &result {
                Ok(acquired) => info!(status = %acquired.status, items = acquired.pack.len(), "resource acquired"),
                Err(err) => warn!(error = %err, "resource unavailable"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn acquire(&self, request: AcquireRequest) -> Result<AcquiredPack, AcquireError> {
        let AcquireRequest {
            resource_id,
            kind,
            mirrors,
            bundled,
            force_network,
            min_items,
        } = request;

        let bundled = bundled.filter(|pack| {
            let matches = pack.kind() == kind && !pack.is_empty();
            if !matches {
                warn!(bundled_kind = %pack.kind(), "bundled dataset has wrong shape, ignoring");
            }
            matches
        });

        if !force_network {
            if let Some(pack) = bundled.as_ref().filter(|p| p.passes_sanity(min_items)) {
                return Ok(AcquiredPack {
                    pack: pack.clone(),
                    status: AcquireStatus::Bundled,
                });
            }

            if let Some(pack) = self.load_cached(&resource_id, kind, min_items).await {
                return Ok(AcquiredPack {
                    pack,
                    status: AcquireStatus::Cached,
                });
            }
        }

        let mut attempts = Vec::with_capacity(mirrors.len());
        for url in &mirrors {
            match self.try_mirror(&resource_id, kind, url).await {
                Ok(pack) => {
                    self.persist(&pack).await;
                    return Ok(AcquiredPack {
                        pack,
                        status: AcquireStatus::Network,
                    });
                }
                Err(failure) => {
                    warn!(url = %url, error = %failure, "mirror attempt failed, trying next");
                    attempts.push(failure);
                }
            }
        }

        match bundled {
            Some(pack) => Ok(AcquiredPack {
                pack,
                status: AcquireStatus::OfflineFallback,
            }),
            None => Err(AcquireError::ResourceUnavailable {
                resource_id,
                attempts,
            }),
        }
    }

    async fn load_cached(
        &self,
        resource_id: &ResourceId,
        kind: ResourceKind,
        min_items: usize,
    ) -> Option<ResourcePack> {
        let entry = match self.store.load(resource_id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "durable store read failed, treating as absent");
                return None;
            }
        };

        let pack = match entry.to_pack() {
            Ok(pack) => pack,
            Err(err) => {
                warn!(error = %err, "cached entry is not a resource pack, ignoring");
                return None;
            }
        };

        if pack.kind() != kind || !pack.passes_sanity(min_items) {
            debug!(items = pack.len(), min_items, "cached pack fails sanity check");
            return None;
        }
        Some(pack)
    }

    async fn try_mirror(
        &self,
        resource_id: &ResourceId,
        kind: ResourceKind,
        url: &str,
    ) -> Result<ResourcePack, AttemptFailure> {
        let text = self.fetcher.fetch_text(url).await?;
        let value = parse_payload(&text).map_err(|reason| FetchError::parse(url, reason))?;
        normalize(kind, resource_id, &value).map_err(|source| AttemptFailure::Normalize {
            url: url.to_string(),
            source,
        })
    }

    /// Persisting is best effort: the freshly fetched pack is returned either way.
    async fn persist(&self, pack: &ResourcePack) {
        let entry = match CacheEntry::from_pack(pack, self.clock.now()) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "failed to encode cache entry");
                return;
            }
        };
        if let Err(err) = self.store.store(&entry).await {
            warn!(error = %err, "failed to persist resource pack");
        }
    }
}
