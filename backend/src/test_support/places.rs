//! Recording and scripted doubles for the places ports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::Place;
use crate::domain::geometry::RouteGeometry;
use crate::domain::ports::{
    PlaceProvider, PlaceProviderError, PlacesCache, PlacesCacheError, PlacesCacheKey,
    PlacesEventSink, PlacesEventSinkError, PlacesFetchedEvent, RawPlace, RouteLookup,
    RouteLookupError, RouteSummary,
};

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("{name} mutex poisoned"),
    }
}

/// How a [`ScriptedProvider`] answers.
#[derive(Debug, Clone)]
pub enum ProviderScript {
    /// Return these places.
    Places(Vec<RawPlace>),
    /// Return this error.
    Fail(PlaceProviderError),
    /// Sleep before returning the places; used to trip timeouts.
    Slow(Duration, Vec<RawPlace>),
    /// Panic inside the provider call.
    Panic,
}

/// Provider double that follows a fixed script and counts calls.
pub struct ScriptedProvider {
    name: String,
    script: ProviderScript,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    pub fn new(name: impl Into<String>, script: ProviderScript) -> Self {
        Self {
            name: name.into(),
            script,
            calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn returning(name: impl Into<String>, places: Vec<RawPlace>) -> Self {
        Self::new(name, ProviderScript::Places(places))
    }

    pub fn failing(name: impl Into<String>, error: PlaceProviderError) -> Self {
        Self::new(name, ProviderScript::Fail(error))
    }

    /// Hold every call until `gate` is notified.
    #[must_use]
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaceProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    async fn fetch_places(
        &self,
        _geometry: &RouteGeometry,
    ) -> Result<Vec<RawPlace>, PlaceProviderError> {
        // Register with the gate before reporting as active so a release
        // issued as soon as every provider is active cannot be missed.
        let released = self.gate.as_ref().map(|gate| gate.notified());
        self.calls.fetch_add(1, Ordering::SeqCst);
        let active_now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active_now, Ordering::SeqCst);
        if let Some(released) = released {
            released.await;
        }
        let result = match &self.script {
            ProviderScript::Places(places) => Ok(places.clone()),
            ProviderScript::Fail(error) => Err(error.clone()),
            ProviderScript::Slow(delay, places) => {
                tokio::time::sleep(*delay).await;
                Ok(places.clone())
            }
            ProviderScript::Panic => panic!("scripted provider panic"),
        };
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Route lookup double answering every id with the same result.
pub struct StubRouteLookup {
    result: Result<RouteSummary, RouteLookupError>,
    calls: AtomicUsize,
}

impl StubRouteLookup {
    /// Answer with a route whose encoded geometry is `geometry`.
    pub fn with_geometry(route_id: &str, geometry: &str) -> Self {
        Self::new(Ok(RouteSummary {
            id: route_id.to_owned(),
            distance_km: 0.0,
            duration_minutes: 0.0,
            geometry: geometry.to_owned(),
        }))
    }

    pub fn new(result: Result<RouteSummary, RouteLookupError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteLookup for StubRouteLookup {
    async fn route_geometry(&self, _route_id: &str) -> Result<RouteSummary, RouteLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// One recorded cache write.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheWrite {
    pub key: String,
    pub places: Vec<Place>,
    pub ttl: Duration,
}

/// Map-backed cache that records reads and writes and can be told to fail.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, Vec<Place>>>,
    writes: Mutex<Vec<CacheWrite>>,
    reads: AtomicUsize,
    fail_reads: bool,
    fail_writes: bool,
}

impl RecordingCache {
    /// Cache pre-populated with `places` under `key`.
    pub fn seeded(key: &PlacesCacheKey, places: Vec<Place>) -> Self {
        let cache = Self::default();
        lock(&cache.entries, "cache entries").insert(key.as_str().to_owned(), places);
        cache
    }

    #[must_use]
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    #[must_use]
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn writes(&self) -> Vec<CacheWrite> {
        lock(&self.writes, "cache writes").clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn stored(&self, key: &PlacesCacheKey) -> Option<Vec<Place>> {
        lock(&self.entries, "cache entries").get(key.as_str()).cloned()
    }
}

#[async_trait]
impl PlacesCache for RecordingCache {
    async fn get(&self, key: &PlacesCacheKey) -> Result<Option<Vec<Place>>, PlacesCacheError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(PlacesCacheError::backend("scripted read failure"));
        }
        Ok(self.stored(key))
    }

    async fn put(
        &self,
        key: &PlacesCacheKey,
        places: &[Place],
        ttl: Duration,
    ) -> Result<(), PlacesCacheError> {
        lock(&self.writes, "cache writes").push(CacheWrite {
            key: key.as_str().to_owned(),
            places: places.to_vec(),
            ttl,
        });
        if self.fail_writes {
            return Err(PlacesCacheError::backend("scripted write failure"));
        }
        lock(&self.entries, "cache entries").insert(key.as_str().to_owned(), places.to_vec());
        Ok(())
    }
}

/// Event sink that keeps every published event.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<PlacesFetchedEvent>>,
    published: Notify,
    fail: bool,
}

impl RecordingEventSink {
    /// Sink that records the attempt and then reports a publish failure.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<PlacesFetchedEvent> {
        lock(&self.events, "event sink").clone()
    }

    /// Wait until at least `count` events arrived or `within` elapsed.
    pub async fn wait_for(&self, count: usize, within: Duration) -> Vec<PlacesFetchedEvent> {
        let waited = tokio::time::timeout(within, async {
            loop {
                let notified = self.published.notified();
                if lock(&self.events, "event sink").len() >= count {
                    return;
                }
                notified.await;
            }
        })
        .await;
        if waited.is_err() {
            panic!("expected {count} events within {within:?}");
        }
        self.events()
    }
}

#[async_trait]
impl PlacesEventSink for RecordingEventSink {
    async fn publish(&self, event: &PlacesFetchedEvent) -> Result<(), PlacesEventSinkError> {
        lock(&self.events, "event sink").push(event.clone());
        self.published.notify_waiters();
        if self.fail {
            return Err(PlacesEventSinkError::publish("scripted publish failure"));
        }
        Ok(())
    }
}

/// Single-tag raw places numbered from 1, for provider scripts.
pub fn raw_places<const N: usize>(
    provider: &str,
    entries: [(&str, &str, f64, f64); N],
) -> Vec<RawPlace> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, (name, tag, latitude, longitude))| {
            RawPlace::new(
                provider,
                (index + 1).to_string(),
                name,
                vec![tag.to_owned()],
                latitude,
                longitude,
            )
        })
        .collect()
}
