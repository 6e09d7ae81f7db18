//! Timing of the engine's resolution phases.
//!
//! Profiling is process-wide and off by default. When enabled, every
//! hierarchy resolution, candidate ranking, invoker compilation and
//! adaptation call records its duration into a shared `DashMap`, so timings
//! from concurrent callers aggregate without a global lock.
//!
//! Spans are cheap when profiling is off: `time_span!` checks one relaxed
//! atomic and creates nothing.
//!
//! ```ignore
//! use adaptmap::time_span;
//!
//! fn rank() {
//!     time_span!("candidates.rank", parent: "adapt");
//!     // ...
//! }
//! ```

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Span names used by the engine
pub mod spans {
    pub const ADAPT: &str = "adapt";
    pub const HIERARCHY_RESOLVE: &str = "hierarchy.resolve";
    pub const CANDIDATES_RESOLVE: &str = "candidates.resolve";
    pub const INVOKER_COMPILE: &str = "invoker.compile";
    pub const REGISTER: &str = "register";
}

static PROFILING_ENABLED: AtomicBool = AtomicBool::new(false);

static TIMING_COLLECTOR: OnceLock<TimingCollector> = OnceLock::new();

/// Turn on timing collection for the rest of the process
pub fn enable_profiling() {
    PROFILING_ENABLED.store(true, Ordering::SeqCst);
    let _ = collector();
}

#[inline]
pub fn is_profiling_enabled() -> bool {
    PROFILING_ENABLED.load(Ordering::Relaxed)
}

fn collector() -> &'static TimingCollector {
    TIMING_COLLECTOR.get_or_init(TimingCollector::new)
}

/// Snapshot of everything recorded so far
#[must_use]
pub fn get_timing_report() -> TimingReport {
    collector().report()
}

pub fn reset_timing_data() {
    collector().reset();
}

/// RAII guard; records its lifetime when dropped
pub struct TimingSpan {
    name: &'static str,
    parent: Option<&'static str>,
    start: Instant,
}

impl TimingSpan {
    #[inline]
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            start: Instant::now(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_parent(name: &'static str, parent: &'static str) -> Self {
        Self {
            name,
            parent: Some(parent),
            start: Instant::now(),
        }
    }
}

impl Drop for TimingSpan {
    fn drop(&mut self) {
        if is_profiling_enabled() {
            collector().record(self.name, self.parent, self.start.elapsed());
        }
    }
}

#[derive(Default)]
struct TimingEntry {
    total_nanos: AtomicU64,
    max_nanos: AtomicU64,
    count: AtomicU64,
}

struct TimingCollector {
    timings: DashMap<&'static str, TimingEntry>,
    parents: DashMap<&'static str, &'static str>,
}

impl TimingCollector {
    fn new() -> Self {
        Self {
            timings: DashMap::new(),
            parents: DashMap::new(),
        }
    }

    fn record(&self, name: &'static str, parent: Option<&'static str>, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        let entry = self.timings.entry(name).or_default();
        entry.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        entry.max_nanos.fetch_max(nanos, Ordering::Relaxed);
        entry.count.fetch_add(1, Ordering::Relaxed);

        if let Some(p) = parent {
            self.parents.insert(name, p);
        }
    }

    fn reset(&self) {
        self.timings.clear();
        self.parents.clear();
    }

    fn report(&self) -> TimingReport {
        let mut operations: Vec<OperationTiming> = self
            .timings
            .iter()
            .map(|entry| {
                let timing = entry.value();
                let count = timing.count.load(Ordering::Relaxed);
                let total = Duration::from_nanos(timing.total_nanos.load(Ordering::Relaxed));
                OperationTiming {
                    name: entry.key().to_string(),
                    parent: self.parents.get(entry.key()).map(|p| p.to_string()),
                    count,
                    total,
                    max: Duration::from_nanos(timing.max_nanos.load(Ordering::Relaxed)),
                    mean: if count == 0 {
                        Duration::ZERO
                    } else {
                        total / u32::try_from(count).unwrap_or(u32::MAX)
                    },
                }
            })
            .collect();

        // Slowest first
        operations.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

        TimingReport { operations }
    }
}

/// Aggregated timings, one row per span name
#[derive(Debug, Clone, Serialize)]
pub struct TimingReport {
    pub operations: Vec<OperationTiming>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationTiming {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub count: u64,
    pub total: Duration,
    pub mean: Duration,
    pub max: Duration,
}

impl TimingReport {
    pub fn operation(&self, name: &str) -> Option<&OperationTiming> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Human-readable table
    #[must_use]
    pub fn to_summary(&self) -> String {
        let mut output = String::from("\n=== Adaptation Profile ===\n");
        output.push_str(&format!(
            "{:<32} {:>10} {:>12} {:>12} {:>12}\n",
            "Operation", "Count", "Total", "Mean", "Max"
        ));
        output.push_str(&"-".repeat(82));
        output.push('\n');

        for op in &self.operations {
            let name = match &op.parent {
                Some(parent) => format!("{} < {}", op.name, parent),
                None => op.name.clone(),
            };
            output.push_str(&format!(
                "{:<32} {:>10} {:>12} {:>12} {:>12}\n",
                name,
                op.count,
                format_duration(op.total),
                format_duration(op.mean),
                format_duration(op.max)
            ));
        }

        output
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else if d.as_micros() >= 1 {
        format!("{:.1}µs", d.as_secs_f64() * 1_000_000.0)
    } else {
        format!("{}ns", d.as_nanos())
    }
}

/// Time the rest of the enclosing scope when profiling is enabled.
#[macro_export]
macro_rules! time_span {
    ($name:expr) => {
        let _timing_span = if $crate::observability::profiling::is_profiling_enabled() {
            Some($crate::observability::profiling::TimingSpan::new($name))
        } else {
            None
        };
    };
    ($name:expr, parent: $parent:expr) => {
        let _timing_span = if $crate::observability::profiling::is_profiling_enabled() {
            Some($crate::observability::profiling::TimingSpan::with_parent(
                $name, $parent,
            ))
        } else {
            None
        };
    };
}
