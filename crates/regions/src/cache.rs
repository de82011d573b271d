//! Two-level region cache with cache-or-fetch semantics.
//!
//! Provinces are loaded once (and replaced wholesale on reload). City/regency
//! lists are fetched lazily per province id, stored on success and never
//! evicted. Failed lookups leave nothing behind so the next request retries.
//! Concurrent first requests for the same province share a single fetch.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use serde::Serialize;
use sketchform_core::notification::Notification;
use sketchform_core::region::{self, Region, SubRegion};
use sketchform_events::EventBus;
use tokio::sync::OnceCell;

use crate::error::RegionFetchError;
use crate::source::RegionSource;

/// Default fetch timeout for both hierarchy levels.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(5_000);

type SubRegionSlot = Arc<OnceCell<Arc<Vec<SubRegion>>>>;

/// A cached city/regency that matched a search, with its parent province.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubRegionMatch {
    pub sub_region: SubRegion,
    pub region_id: String,
    pub region_name: String,
}

/// Cache occupancy counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionStats {
    pub regions: usize,
    pub cached_parents: usize,
    pub cached_sub_regions: usize,
}

pub struct RegionCache {
    source: Arc<dyn RegionSource>,
    timeout: Duration,
    events: Arc<EventBus>,
    regions: RwLock<Arc<Vec<Region>>>,
    sub_regions: Mutex<HashMap<String, SubRegionSlot>>,
}

impl RegionCache {
    pub fn new(source: Arc<dyn RegionSource>, timeout: Duration, events: Arc<EventBus>) -> Self {
        Self {
            source,
            timeout,
            events,
            regions: RwLock::new(Arc::new(Vec::new())),
            sub_regions: Mutex::new(HashMap::new()),
        }
    }

    // ---- provinces ----

    /// Fetch the province list, falling back to the built-in list on any
    /// failure. Never fails.
    pub async fn load_regions(&self) -> Arc<Vec<Region>> {
        let loaded = match self.timed(self.source.fetch_regions()).await {
            Ok(list) => {
                tracing::info!(count = list.len(), "Provinces loaded from region API");
                self.events.publish(Notification::info(format!(
                    "{} provinces loaded from server",
                    list.len()
                )));
                Arc::new(list)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Region API unavailable, using offline provinces");
                self.events.publish(Notification::warning(
                    "Region API is slow or unavailable. Using offline data.",
                ));
                Arc::new(region::fallback_regions())
            }
        };

        *self.regions.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&loaded);
        loaded
    }

    /// Currently loaded provinces in fetch order.
    pub fn regions(&self) -> Arc<Vec<Region>> {
        Arc::clone(&self.regions.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Currently loaded provinces sorted by name for display.
    pub fn sorted_regions(&self) -> Vec<Region> {
        region::sorted_by_name(&self.regions())
    }

    pub fn find_region_name(&self, region_id: &str) -> String {
        region::find_name(&self.regions(), region_id).to_string()
    }

    pub fn search_regions(&self, keyword: &str) -> Vec<Region> {
        self.regions()
            .iter()
            .filter(|r| region::name_matches(r, keyword))
            .cloned()
            .collect()
    }

    // ---- cities / regencies ----

    /// Return the cities/regencies of `region_id`, fetching them on first use.
    ///
    /// A cache hit returns the same `Arc` without touching the network.
    /// Ids that are not plain alphanumerics fail with
    /// [`RegionFetchError::InvalidId`] before the cache is consulted.
    pub async fn load_sub_regions(
        &self,
        region_id: &str,
    ) -> Result<Arc<Vec<SubRegion>>, RegionFetchError> {
        region::validate_region_id(region_id)
            .map_err(|_| RegionFetchError::InvalidId(region_id.to_string()))?;
        let slot = self.slot(region_id);

        if let Some(cached) = slot.get() {
            tracing::debug!(region_id, "Using cached cities/regencies");
            self.events.publish(Notification::info(format!(
                "Using cached cities/regencies for province {region_id}"
            )));
            return Ok(Arc::clone(cached));
        }

        let result = slot
            .get_or_try_init(|| async {
                let list = self.timed(self.source.fetch_sub_regions(region_id)).await?;
                tracing::info!(region_id, count = list.len(), "Cities/regencies loaded");
                Ok::<_, RegionFetchError>(Arc::new(list))
            })
            .await;

        match result {
            Ok(list) => {
                self.keep_slot(region_id, &slot);
                if list.is_empty() {
                    self.events.publish(Notification::warning(format!(
                        "No cities/regencies found for province {region_id}"
                    )));
                } else {
                    self.events.publish(Notification::info(format!(
                        "{} cities/regencies available for {}",
                        list.len(),
                        self.display_name(region_id)
                    )));
                }
                Ok(Arc::clone(list))
            }
            Err(e) => {
                self.release_slot(region_id, &slot);
                tracing::warn!(region_id, error = %e, "Failed to load cities/regencies");
                self.events.publish(Notification::error(
                    "Failed to load cities/regencies. Please try again.",
                ));
                Err(e)
            }
        }
    }

    /// Degraded form of [`load_sub_regions`](Self::load_sub_regions): an
    /// empty list on failure.
    pub async fn sub_regions_or_empty(&self, region_id: &str) -> Arc<Vec<SubRegion>> {
        self.load_sub_regions(region_id)
            .await
            .unwrap_or_else(|_| Arc::new(Vec::new()))
    }

    /// Cached cities/regencies of `region_id`, without fetching.
    pub fn cached_sub_regions(&self, region_id: &str) -> Option<Arc<Vec<SubRegion>>> {
        let map = self.sub_regions.lock().unwrap_or_else(|e| e.into_inner());
        map.get(region_id).and_then(|slot| slot.get().cloned())
    }

    pub fn find_sub_region_name(&self, region_id: &str, sub_region_id: &str) -> String {
        self.cached_sub_regions(region_id)
            .map(|list| region::find_name(&list, sub_region_id).to_string())
            .unwrap_or_default()
    }

    /// Search every cached city/regency list by name.
    pub fn search_sub_regions(&self, keyword: &str) -> Vec<SubRegionMatch> {
        let mut matches: Vec<SubRegionMatch> = self
            .cached_entries()
            .into_iter()
            .flat_map(|(region_id, list)| {
                let region_name = self.find_region_name(&region_id);
                list.iter()
                    .filter(|s| region::name_matches(s, keyword))
                    .map(|s| SubRegionMatch {
                        sub_region: s.clone(),
                        region_id: region_id.clone(),
                        region_name: region_name.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        matches.sort_by(|a, b| region::collate_names(&a.sub_region.name, &b.sub_region.name));
        matches
    }

    pub fn stats(&self) -> RegionStats {
        let cached = self.cached_entries();
        RegionStats {
            regions: self.regions().len(),
            cached_parents: cached.len(),
            cached_sub_regions: cached.iter().map(|(_, list)| list.len()).sum(),
        }
    }

    // ---- private helpers ----

    /// Run a fetch under the configured timeout.
    async fn timed<T>(
        &self,
        fetch: impl Future<Output = Result<T, RegionFetchError>>,
    ) -> Result<T, RegionFetchError> {
        tokio::time::timeout(self.timeout, fetch)
            .await
            .map_err(|_| RegionFetchError::Timeout(self.timeout))?
    }

    fn slot(&self, region_id: &str) -> SubRegionSlot {
        let mut map = self.sub_regions.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(map.entry(region_id.to_string()).or_default())
    }

    /// Re-attach a filled slot that a failed concurrent caller released.
    fn keep_slot(&self, region_id: &str, slot: &SubRegionSlot) {
        let mut map = self.sub_regions.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(region_id.to_string())
            .or_insert_with(|| Arc::clone(slot));
    }

    /// Drop the slot of a failed fetch unless another caller has filled or
    /// replaced it meanwhile.
    fn release_slot(&self, region_id: &str, slot: &SubRegionSlot) {
        let mut map = self.sub_regions.lock().unwrap_or_else(|e| e.into_inner());
        let unused = map
            .get(region_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if unused {
            map.remove(region_id);
        }
    }

    fn cached_entries(&self) -> Vec<(String, Arc<Vec<SubRegion>>)> {
        let map = self.sub_regions.lock().unwrap_or_else(|e| e.into_inner());
        map.iter()
            .filter_map(|(id, slot)| slot.get().map(|list| (id.clone(), Arc::clone(list))))
            .collect()
    }

    fn display_name(&self, region_id: &str) -> String {
        let name = self.find_region_name(region_id);
        if name.is_empty() {
            format!("province {region_id}")
        } else {
            name
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use sketchform_core::notification::Severity;
    use tokio::sync::broadcast;

    use super::*;

    #[derive(Default)]
    struct StubSource {
        regions: Option<Vec<Region>>,
        sub_regions: HashMap<String, Vec<SubRegion>>,
        delay: Option<Duration>,
        fail_sub_regions: AtomicBool,
        region_calls: AtomicUsize,
        sub_region_calls: AtomicUsize,
    }

    #[async_trait]
    impl RegionSource for StubSource {
        async fn fetch_regions(&self) -> Result<Vec<Region>, RegionFetchError> {
            self.region_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.regions.clone().ok_or(RegionFetchError::Status {
                status: 503,
                body: "down".to_string(),
            })
        }

        async fn fetch_sub_regions(
            &self,
            region_id: &str,
        ) -> Result<Vec<SubRegion>, RegionFetchError> {
            self.sub_region_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_sub_regions.load(Ordering::SeqCst) {
                return Err(RegionFetchError::Parse("bad payload".to_string()));
            }
            self.sub_regions
                .get(region_id)
                .cloned()
                .ok_or(RegionFetchError::Status {
                    status: 404,
                    body: String::new(),
                })
        }
    }

    fn java_source() -> StubSource {
        StubSource {
            regions: Some(vec![Region::new("32", "JAWA BARAT"), Region::new("11", "ACEH")]),
            sub_regions: [(
                "32".to_string(),
                vec![
                    Region::new("3273", "KOTA BANDUNG"),
                    Region::new("3201", "KABUPATEN BOGOR"),
                ],
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        }
    }

    fn cache_with(
        source: Arc<StubSource>,
        timeout: Duration,
    ) -> (RegionCache, broadcast::Receiver<Notification>) {
        let events = Arc::new(EventBus::default());
        let rx = events.subscribe();
        (RegionCache::new(source, timeout, events), rx)
    }

    fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = rx.try_recv() {
            out.push(n);
        }
        out
    }

    // -- provinces -----------------------------------------------------------

    #[tokio::test]
    async fn load_regions_replaces_list_on_success() {
        let source = Arc::new(java_source());
        let (cache, mut rx) = cache_with(Arc::clone(&source), DEFAULT_FETCH_TIMEOUT);

        let loaded = cache.load_regions().await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(cache.find_region_name("32"), "JAWA BARAT");

        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_offline_list() {
        let source = Arc::new(StubSource::default());
        let (cache, mut rx) = cache_with(source, DEFAULT_FETCH_TIMEOUT);

        let loaded = cache.load_regions().await;
        assert_eq!(loaded.len(), 38);
        assert_eq!(cache.sorted_regions()[0].name, "ACEH");
        assert_eq!(cache.sorted_regions()[37].name, "SUMATERA UTARA");

        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn slow_fetch_times_out_into_fallback() {
        let source = Arc::new(StubSource {
            delay: Some(Duration::from_millis(500)),
            ..java_source()
        });
        let (cache, _rx) = cache_with(source, Duration::from_millis(20));

        let loaded = cache.load_regions().await;
        assert_eq!(loaded.len(), 38);
    }

    #[tokio::test]
    async fn sorted_view_does_not_mutate_fetch_order() {
        let (cache, _rx) = cache_with(Arc::new(java_source()), DEFAULT_FETCH_TIMEOUT);
        cache.load_regions().await;

        assert_eq!(cache.sorted_regions()[0].name, "ACEH");
        assert_eq!(cache.regions()[0].name, "JAWA BARAT");
    }

    #[tokio::test]
    async fn search_regions_is_case_insensitive() {
        let (cache, _rx) = cache_with(Arc::new(StubSource::default()), DEFAULT_FETCH_TIMEOUT);
        cache.load_regions().await;

        let names: Vec<_> = cache.search_regions("papua b").into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["PAPUA BARAT", "PAPUA BARAT DAYA"]);
    }

    // -- cities / regencies --------------------------------------------------

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let source = Arc::new(java_source());
        let (cache, mut rx) = cache_with(Arc::clone(&source), DEFAULT_FETCH_TIMEOUT);

        let first = cache.load_sub_regions("32").await.unwrap();
        let second = cache.load_sub_regions("32").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.sub_region_calls.load(Ordering::SeqCst), 1);

        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 2);
        assert!(notes[1].message.contains("cached"));
    }

    #[tokio::test]
    async fn failures_are_not_cached_and_retry() {
        let source = Arc::new(java_source());
        source.fail_sub_regions.store(true, Ordering::SeqCst);
        let (cache, mut rx) = cache_with(Arc::clone(&source), DEFAULT_FETCH_TIMEOUT);

        assert_matches!(cache.load_sub_regions("32").await, Err(RegionFetchError::Parse(_)));
        assert!(cache.cached_sub_regions("32").is_none());
        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Error);

        source.fail_sub_regions.store(false, Ordering::SeqCst);
        let list = cache.load_sub_regions("32").await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(source.sub_region_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_lookups_leave_no_slots_behind() {
        let source = Arc::new(java_source());
        let (cache, _rx) = cache_with(Arc::clone(&source), DEFAULT_FETCH_TIMEOUT);

        for i in 0..500 {
            assert!(cache.load_sub_regions(&format!("bogus{i}")).await.is_err());
        }
        assert!(cache.sub_regions.lock().unwrap().is_empty());

        cache.load_sub_regions("32").await.unwrap();
        assert_eq!(cache.sub_regions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn path_like_ids_are_rejected_without_fetching() {
        let source = Arc::new(java_source());
        let (cache, mut rx) = cache_with(Arc::clone(&source), DEFAULT_FETCH_TIMEOUT);

        assert_matches!(
            cache.load_sub_regions("../provinsi").await,
            Err(RegionFetchError::InvalidId(_))
        );
        assert_eq!(source.sub_region_calls.load(Ordering::SeqCst), 0);
        assert!(cache.sub_regions.lock().unwrap().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn degraded_lookup_returns_empty_list() {
        let (cache, _rx) = cache_with(Arc::new(java_source()), DEFAULT_FETCH_TIMEOUT);
        assert!(cache.sub_regions_or_empty("99").await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_first_lookups_share_one_fetch() {
        let source = Arc::new(StubSource {
            delay: Some(Duration::from_millis(50)),
            ..java_source()
        });
        let (cache, _rx) = cache_with(Arc::clone(&source), DEFAULT_FETCH_TIMEOUT);

        let (a, b) = tokio::join!(cache.load_sub_regions("32"), cache.load_sub_regions("32"));
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(source.sub_region_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn name_lookups_return_empty_when_unknown() {
        let (cache, _rx) = cache_with(Arc::new(java_source()), DEFAULT_FETCH_TIMEOUT);
        cache.load_regions().await;
        cache.load_sub_regions("32").await.unwrap();

        assert_eq!(cache.find_sub_region_name("32", "3273"), "KOTA BANDUNG");
        assert_eq!(cache.find_sub_region_name("32", "0000"), "");
        assert_eq!(cache.find_sub_region_name("11", "3273"), "");
        assert_eq!(cache.find_region_name("99"), "");
    }

    #[tokio::test]
    async fn sub_region_search_and_stats_cover_cached_lists() {
        let (cache, _rx) = cache_with(Arc::new(java_source()), DEFAULT_FETCH_TIMEOUT);
        cache.load_regions().await;
        cache.load_sub_regions("32").await.unwrap();

        let hits = cache.search_sub_regions("kota");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].region_name, "JAWA BARAT");

        assert_eq!(
            cache.stats(),
            RegionStats {
                regions: 2,
                cached_parents: 1,
                cached_sub_regions: 2,
            }
        );
    }
}
