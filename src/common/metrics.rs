//! Metrics collection for cumulus
//!
//! Monotonic counters grouped into named maps (one map per subsystem, e.g.
//! "write"), registered in a process-wide registry and rendered in
//! Prometheus text format.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Counter for tracking monotonic event counts
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// A named group of counters.
///
/// Counters are created on first use and shared thereafter, so concurrent
/// callers asking for the same name always land on the same atomic.
#[derive(Debug)]
pub struct CounterMap {
    name: String,
    counters: Mutex<HashMap<&'static str, Arc<Counter>>>,
}

impl CounterMap {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// The group name this map was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get or create a counter in this map.
    pub fn counter(&self, name: &'static str) -> Arc<Counter> {
        let mut counters = self.counters.lock().unwrap();
        counters
            .entry(name)
            .or_insert_with(|| Arc::new(Counter::new()))
            .clone()
    }

    /// Current value of a counter, 0 if it has never been touched.
    pub fn get(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap();
        counters.get(name).map(|c| c.get()).unwrap_or(0)
    }

    fn snapshot(&self) -> Vec<(&'static str, u64)> {
        let counters = self.counters.lock().unwrap();
        let mut values: Vec<_> = counters.iter().map(|(k, v)| (*k, v.get())).collect();
        values.sort_by_key(|(k, _)| *k);
        values
    }
}

/// Process-wide metrics registry
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    maps: Mutex<HashMap<String, Arc<CounterMap>>>,
}

impl MetricsRegistry {
    /// Create a new metrics registry
    pub fn new() -> Self {
        Self {
            maps: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create the counter map registered under `name`.
    ///
    /// Registering the same name twice returns the existing map, so
    /// components may re-open without tripping over a collision.
    pub fn counter_map(&self, name: &str) -> Arc<CounterMap> {
        let mut maps = self.maps.lock().unwrap();
        maps.entry(name.to_string())
            .or_insert_with(|| Arc::new(CounterMap::new(name)))
            .clone()
    }

    /// Generate Prometheus-compatible metrics output
    pub fn to_prometheus(&self) -> String {
        use std::fmt::Write;

        let maps = self.maps.lock().unwrap();
        let mut groups: Vec<_> = maps.values().collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));

        let mut out = String::new();
        for map in groups {
            for (counter, value) in map.snapshot() {
                let metric = format!("cumulus_{}_{}", map.name(), counter);
                writeln!(out, "# TYPE {} counter", metric).unwrap();
                writeln!(out, "{} {}", metric, value).unwrap();
            }
        }
        out
    }
}

/// Global metrics instance
pub static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);
