//! Vulnerability lookups: static index, caching wrapper, prioritisation.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use crate::application::ports::{LookupError, VulnerabilitySource};
use crate::domain::advisories::{AdvisoryTable, builtin_advisories};
use crate::domain::{DependencyVulnerability, Ecosystem, VulnerabilityRecord};

/// How long a cached lookup stays fresh.
pub const CACHE_TTL_HOURS: i64 = 24;

/// Stable sort by advisory severity, most severe first. Equal severities
/// keep their input order.
pub fn prioritize_security_updates(
    vulnerabilities: &[DependencyVulnerability],
) -> Vec<DependencyVulnerability> {
    let mut sorted = vulnerabilities.to_vec();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.advisory.severity.rank()));
    sorted
}

/// Advisory source backed by an in-memory table.
///
/// Returns every advisory for the package; deciding whether a version is
/// affected is the caller's job.
#[derive(Debug, Clone, Default)]
pub struct VulnerabilityIndex {
    table: AdvisoryTable,
}

impl VulnerabilityIndex {
    pub fn new(table: AdvisoryTable) -> Self {
        Self { table }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_advisories())
    }

    pub fn insert(&mut self, ecosystem: Ecosystem, record: VulnerabilityRecord) {
        self.table
            .entry((ecosystem, record.package.clone()))
            .or_default()
            .push(record);
    }

    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VulnerabilitySource for VulnerabilityIndex {
    fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        _version: &str,
    ) -> Result<Vec<VulnerabilityRecord>, LookupError> {
        Ok(self
            .table
            .get(&(ecosystem, name.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

type CacheKey = (Ecosystem, String, String);

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    records: Vec<VulnerabilityRecord>,
}

/// Caches successful lookups of an inner source for [`CACHE_TTL_HOURS`].
///
/// Failed lookups are not cached. The cache lives only in memory.
pub struct CachedVulnerabilitySource<S> {
    inner: S,
    ttl: Duration,
    cache: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl<S: VulnerabilitySource> CachedVulnerabilitySource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            ttl: Duration::hours(CACHE_TTL_HOURS),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Lookup as of `now`; lets tests move the clock.
    pub fn lookup_at(
        &self,
        now: DateTime<Utc>,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Vec<VulnerabilityRecord>, LookupError> {
        let key = (ecosystem, name.to_string(), version.to_string());

        {
            let cache = self
                .cache
                .lock()
                .map_err(|_| LookupError::Unavailable("cache lock poisoned".into()))?;
            if let Some(entry) = cache.get(&key) {
                if now - entry.fetched_at < self.ttl {
                    trace!(%name, %version, "Advisory cache hit");
                    return Ok(entry.records.clone());
                }
            }
        }

        debug!(%ecosystem, %name, %version, "Looking up advisories");
        let records = self.inner.lookup(ecosystem, name, version)?;

        let mut cache = self
            .cache
            .lock()
            .map_err(|_| LookupError::Unavailable("cache lock poisoned".into()))?;
        cache.insert(
            key,
            CacheEntry {
                fetched_at: now,
                records: records.clone(),
            },
        );
        Ok(records)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

impl<S: VulnerabilitySource> VulnerabilitySource for CachedVulnerabilitySource<S> {
    fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Vec<VulnerabilityRecord>, LookupError> {
        self.lookup_at(Utc::now(), ecosystem, name, version)
    }
}
