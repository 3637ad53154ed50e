//! Translation lookup metrics.
//!
//! Tracks how often text lookups hit or miss the active table and how often
//! translation files load or fail to load.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters owned by a translation cache.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Lookups that found the key in the active table
    lookup_hits: AtomicUsize,

    /// Lookups that fell back to the missing-key marker
    lookup_misses: AtomicUsize,

    /// Translation files read and parsed successfully
    table_loads: AtomicUsize,

    /// Translation files that were missing or unparsable
    load_failures: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup_hit(&self) {
        self.lookup_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup_miss(&self) {
        self.lookup_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_table_load(&self) {
        self.table_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lookup_hits(&self) -> usize {
        self.lookup_hits.load(Ordering::Relaxed)
    }

    pub fn lookup_misses(&self) -> usize {
        self.lookup_misses.load(Ordering::Relaxed)
    }

    pub fn table_loads(&self) -> usize {
        self.table_loads.load(Ordering::Relaxed)
    }

    pub fn load_failures(&self) -> usize {
        self.load_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.lookup_hits();
        let misses = self.lookup_misses();
        let total_lookups = hits + misses;
        let hit_rate = if total_lookups > 0 {
            (hits as f64 / total_lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            lookup_hits: hits,
            lookup_misses: misses,
            hit_rate,
            table_loads: self.table_loads(),
            load_failures: self.load_failures(),
        }
    }
}

/// Snapshot of translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub lookup_hits: usize,
    pub lookup_misses: usize,

    /// Lookup hit rate as a percentage (0-100)
    pub hit_rate: f64,

    pub table_loads: usize,
    pub load_failures: usize,
}
