// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured telemetry and metrics collection for capability-token
//! minting and verification calls.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::info;

// ---------------------------------------------------------------------------
// DecisionMetrics
// ---------------------------------------------------------------------------

/// Which entry point produced a [`DecisionMetrics`] record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `mint`.
    Mint,
    /// `verify_token`.
    VerifyToken,
    /// `verify` (AST-only, no signature check).
    Verify,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operation::Mint => "mint",
            Operation::VerifyToken => "verify_token",
            Operation::Verify => "verify",
        };
        f.write_str(s)
    }
}

/// The outcome of a single `mint`/`verify_token`/`verify` call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The policy evaluated to a truthy result.
    Allow,
    /// The policy evaluated to a falsy result, or an envelope check
    /// (expiry, signature, PoP) failed.
    Deny,
    /// The call returned `Err` (malformed policy, gas/depth/unknown op,
    /// or an invalid signing key).
    Error,
}

/// Metrics captured for a single call into `spl-token`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionMetrics {
    /// Which entry point was called.
    pub operation: Operation,
    /// What it decided.
    pub outcome: Outcome,
    /// Wall-clock duration in microseconds.
    pub duration_us: u64,
    /// Gas consumed by the evaluator, if evaluation ran.
    pub gas_used: Option<u32>,
    /// Whether the token carried the `sealed` flag.
    pub sealed: bool,
}

// ---------------------------------------------------------------------------
// DecisionSummary
// ---------------------------------------------------------------------------

/// Aggregated statistics across multiple recorded decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionSummary {
    /// Number of decisions recorded.
    pub count: usize,
    /// Mean duration in microseconds.
    pub mean_duration_us: f64,
    /// Median (p50) duration in microseconds.
    pub p50_duration_us: f64,
    /// 99th-percentile duration in microseconds.
    pub p99_duration_us: f64,
    /// Fraction of decisions that resulted in `Outcome::Allow`.
    pub allow_rate: f64,
    /// Fraction of decisions that resulted in `Outcome::Error`.
    pub error_rate: f64,
    /// Per-operation decision counts (deterministic ordering).
    pub operation_counts: BTreeMap<Operation, usize>,
}

impl Default for DecisionSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean_duration_us: 0.0,
            p50_duration_us: 0.0,
            p99_duration_us: 0.0,
            allow_rate: 0.0,
            error_rate: 0.0,
            operation_counts: BTreeMap::new(),
        }
    }
}

/// Compute a percentile value from a **sorted** slice.
fn percentile(sorted: &[u64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0] as f64;
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] as f64 * (1.0 - frac) + sorted[upper] as f64 * frac
}

// ---------------------------------------------------------------------------
// DecisionCollector
// ---------------------------------------------------------------------------

/// Thread-safe collector for decision metrics.
///
/// Wrap in an `Arc` to share across threads (the inner storage is already
/// behind a `Mutex`).
#[derive(Debug, Clone)]
pub struct DecisionCollector {
    inner: Arc<Mutex<Vec<DecisionMetrics>>>,
}

impl Default for DecisionCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionCollector {
    /// Create a new, empty collector.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record a completed call's metrics.
    pub fn record(&self, metrics: DecisionMetrics) {
        let mut data = self.inner.lock().expect("metrics lock poisoned");
        data.push(metrics);
    }

    /// Return all recorded decision metrics.
    pub fn decisions(&self) -> Vec<DecisionMetrics> {
        let data = self.inner.lock().expect("metrics lock poisoned");
        data.clone()
    }

    /// Number of decisions recorded so far.
    pub fn len(&self) -> usize {
        let data = self.inner.lock().expect("metrics lock poisoned");
        data.len()
    }

    /// Whether the collector has no recorded decisions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute an aggregated summary of all recorded decisions.
    pub fn summary(&self) -> DecisionSummary {
        let data = self.inner.lock().expect("metrics lock poisoned");
        if data.is_empty() {
            return DecisionSummary::default();
        }

        let count = data.len();
        let mut durations: Vec<u64> = data.iter().map(|d| d.duration_us).collect();
        durations.sort_unstable();

        let total_duration: u64 = durations.iter().sum();
        let mean_duration_us = total_duration as f64 / count as f64;
        let p50_duration_us = percentile(&durations, 50.0);
        let p99_duration_us = percentile(&durations, 99.0);

        let allows: usize = data.iter().filter(|d| d.outcome == Outcome::Allow).count();
        let errors: usize = data.iter().filter(|d| d.outcome == Outcome::Error).count();
        let allow_rate = allows as f64 / count as f64;
        let error_rate = errors as f64 / count as f64;

        let mut operation_counts: BTreeMap<Operation, usize> = BTreeMap::new();
        for d in data.iter() {
            *operation_counts.entry(d.operation).or_insert(0) += 1;
        }

        DecisionSummary {
            count,
            mean_duration_us,
            p50_duration_us,
            p99_duration_us,
            allow_rate,
            error_rate,
            operation_counts,
        }
    }

    /// Clear all recorded metrics.
    pub fn clear(&self) {
        let mut data = self.inner.lock().expect("metrics lock poisoned");
        data.clear();
    }
}

// ---------------------------------------------------------------------------
// TelemetrySpan
// ---------------------------------------------------------------------------

/// A structured span for tracing integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySpan {
    /// Span name / operation.
    pub name: String,
    /// Arbitrary key-value attributes (deterministic ordering).
    pub attributes: BTreeMap<String, String>,
}

impl TelemetrySpan {
    /// Create a new span with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Insert an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Emit the span via `tracing::info!`.
    pub fn emit(&self) {
        info!(
            span_name = %self.name,
            attributes = ?self.attributes,
            "telemetry_span"
        );
    }
}

// ---------------------------------------------------------------------------
// TelemetryExporter
// ---------------------------------------------------------------------------

/// Trait for exporting collected metrics.
pub trait TelemetryExporter: Send + Sync {
    /// Export the given summary. Returns the serialized output on success.
    fn export(&self, summary: &DecisionSummary) -> Result<String, String>;
}

/// Exports metrics as pretty-printed JSON to a string.
#[derive(Debug, Default)]
pub struct JsonExporter;

impl TelemetryExporter for JsonExporter {
    fn export(&self, summary: &DecisionSummary) -> Result<String, String> {
        serde_json::to_string_pretty(summary).map_err(|e| e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn sample(operation: Operation, outcome: Outcome, duration_us: u64) -> DecisionMetrics {
        DecisionMetrics {
            operation,
            outcome,
            duration_us,
            gas_used: Some(12),
            sealed: false,
        }
    }

    #[test]
    fn collector_new_is_empty() {
        let c = DecisionCollector::new();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
    }

    #[test]
    fn collector_record_and_len() {
        let c = DecisionCollector::new();
        c.record(sample(Operation::Mint, Outcome::Allow, 100));
        assert_eq!(c.len(), 1);
        assert!(!c.is_empty());
    }

    #[test]
    fn collector_decisions_returns_all() {
        let c = DecisionCollector::new();
        c.record(sample(Operation::Mint, Outcome::Allow, 10));
        c.record(sample(Operation::VerifyToken, Outcome::Deny, 20));
        let decisions = c.decisions();
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].operation, Operation::Mint);
        assert_eq!(decisions[1].operation, Operation::VerifyToken);
    }

    #[test]
    fn collector_clear() {
        let c = DecisionCollector::new();
        c.record(sample(Operation::Verify, Outcome::Allow, 50));
        c.clear();
        assert!(c.is_empty());
    }

    #[test]
    fn empty_collector_summary() {
        let c = DecisionCollector::new();
        let s = c.summary();
        assert_eq!(s.count, 0);
        assert_eq!(s.mean_duration_us, 0.0);
        assert_eq!(s.allow_rate, 0.0);
        assert_eq!(s.error_rate, 0.0);
        assert!(s.operation_counts.is_empty());
    }

    #[test]
    fn single_decision_summary_matches() {
        let c = DecisionCollector::new();
        c.record(sample(Operation::VerifyToken, Outcome::Allow, 42));
        let s = c.summary();
        assert_eq!(s.count, 1);
        assert_eq!(s.mean_duration_us, 42.0);
        assert_eq!(s.p50_duration_us, 42.0);
        assert_eq!(s.p99_duration_us, 42.0);
        assert_eq!(s.allow_rate, 1.0);
        assert_eq!(s.error_rate, 0.0);
        assert_eq!(s.operation_counts[&Operation::VerifyToken], 1);
    }

    #[test]
    fn summary_mean_duration() {
        let c = DecisionCollector::new();
        c.record(sample(Operation::Mint, Outcome::Allow, 100));
        c.record(sample(Operation::Mint, Outcome::Allow, 200));
        c.record(sample(Operation::Mint, Outcome::Allow, 300));
        let s = c.summary();
        assert!((s.mean_duration_us - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_p50_odd_count() {
        let c = DecisionCollector::new();
        for d in [10, 20, 30, 40, 50] {
            c.record(sample(Operation::VerifyToken, Outcome::Allow, d));
        }
        let s = c.summary();
        assert!((s.p50_duration_us - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_p99() {
        let c = DecisionCollector::new();
        for d in 1..=100 {
            c.record(sample(Operation::VerifyToken, Outcome::Allow, d));
        }
        let s = c.summary();
        assert!(s.p99_duration_us > 98.0);
        assert!(s.p99_duration_us <= 100.0);
    }

    #[test]
    fn summary_allow_and_error_rates() {
        let c = DecisionCollector::new();
        c.record(sample(Operation::VerifyToken, Outcome::Allow, 10));
        c.record(sample(Operation::VerifyToken, Outcome::Deny, 20));
        c.record(sample(Operation::VerifyToken, Outcome::Error, 30));
        c.record(sample(Operation::VerifyToken, Outcome::Error, 40));
        let s = c.summary();
        assert!((s.allow_rate - 0.25).abs() < f64::EPSILON);
        assert!((s.error_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_operation_counts() {
        let c = DecisionCollector::new();
        c.record(sample(Operation::Mint, Outcome::Allow, 10));
        c.record(sample(Operation::VerifyToken, Outcome::Allow, 20));
        c.record(sample(Operation::Mint, Outcome::Allow, 30));
        let s = c.summary();
        assert_eq!(s.operation_counts[&Operation::Mint], 2);
        assert_eq!(s.operation_counts[&Operation::VerifyToken], 1);
    }

    #[test]
    fn decision_metrics_serde_roundtrip() {
        let m = sample(Operation::Verify, Outcome::Deny, 999);
        let json = serde_json::to_string(&m).unwrap();
        let m2: DecisionMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(m, m2);
    }

    #[test]
    fn decision_summary_serde_roundtrip() {
        let c = DecisionCollector::new();
        c.record(sample(Operation::Mint, Outcome::Error, 50));
        let s = c.summary();
        let json = serde_json::to_string(&s).unwrap();
        let s2: DecisionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(s, s2);
    }

    #[test]
    fn concurrent_recording() {
        let c = DecisionCollector::new();
        let mut handles = vec![];
        for i in 0..10 {
            let cc = c.clone();
            handles.push(thread::spawn(move || {
                cc.record(sample(Operation::VerifyToken, Outcome::Allow, i * 10));
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(c.len(), 10);
    }

    #[test]
    fn operation_display() {
        assert_eq!(Operation::Mint.to_string(), "mint");
        assert_eq!(Operation::VerifyToken.to_string(), "verify_token");
        assert_eq!(Operation::Verify.to_string(), "verify");
    }

    #[test]
    fn telemetry_span_attributes() {
        let span = TelemetrySpan::new("mint")
            .with_attribute("sealed", "false")
            .with_attribute("allow", "true");
        assert_eq!(span.name, "mint");
        assert_eq!(span.attributes.len(), 2);
        assert_eq!(span.attributes["sealed"], "false");
    }

    #[test]
    fn telemetry_span_serde_roundtrip() {
        let span = TelemetrySpan::new("verify_token").with_attribute("outcome", "allow");
        let json = serde_json::to_string(&span).unwrap();
        let span2: TelemetrySpan = serde_json::from_str(&json).unwrap();
        assert_eq!(span2.name, "verify_token");
        assert_eq!(span2.attributes["outcome"], "allow");
    }

    #[test]
    fn json_exporter_valid_output() {
        let c = DecisionCollector::new();
        c.record(sample(Operation::Mint, Outcome::Allow, 100));
        let s = c.summary();
        let exporter = JsonExporter;
        let json = exporter.export(&s).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["count"], 1);
    }

    #[test]
    fn json_exporter_empty_summary() {
        let s = DecisionSummary::default();
        let exporter = JsonExporter;
        let json = exporter.export(&s).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["count"], 0);
    }

    #[test]
    fn percentile_empty() {
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn percentile_single() {
        assert_eq!(percentile(&[42], 99.0), 42.0);
    }
}
