//! Usage and error telemetry per `(locale, key)`.
//!
//! Purely observational: nothing recorded here feeds back into resolution.
//! Reports are pulled by an external telemetry sink.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::{Clock, SystemClock};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageMetric {
    pub usage_count: u64,
    /// Smoothed render time in milliseconds.
    ///
    /// Each sample is averaged with the previous value, `(old + new) / 2`,
    /// which weights recent renders far more than a running mean would.
    pub avg_render_time: f64,
    pub error_count: u64,
    pub last_used: DateTime<Utc>,
}

/// A metric together with the `(locale, key)` it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationMetric {
    pub locale: String,
    pub key: String,
    #[serde(flatten)]
    pub metric: UsageMetric,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub tracked_keys: usize,
    pub total_usage: u64,
    pub total_errors: u64,
}

pub struct UsageAnalytics {
    metrics: HashMap<(String, String), UsageMetric>,
    clock: Arc<dyn Clock>,
}

impl Default for UsageAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageAnalytics {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        UsageAnalytics {
            metrics: HashMap::new(),
            clock,
        }
    }

    fn entry(&mut self, locale: &str, key: &str) -> &mut UsageMetric {
        let now = self.clock.now();
        let metric = self
            .metrics
            .entry((locale.to_string(), key.to_string()))
            .or_insert_with(|| UsageMetric {
                usage_count: 0,
                avg_render_time: 0.0,
                error_count: 0,
                last_used: now,
            });
        metric.last_used = now;
        metric
    }

    /// Record one render of `key` in `locale` that took `render_time_ms`.
    pub fn record_usage(&mut self, locale: &str, key: &str, render_time_ms: f64) {
        let metric = self.entry(locale, key);
        metric.avg_render_time = if metric.usage_count == 0 {
            render_time_ms
        } else {
            (metric.avg_render_time + render_time_ms) / 2.0
        };
        metric.usage_count += 1;
    }

    /// Record a degraded resolution of `key` in `locale`.
    pub fn record_error(&mut self, locale: &str, key: &str) {
        self.entry(locale, key).error_count += 1;
    }

    pub fn metric(&self, locale: &str, key: &str) -> Option<&UsageMetric> {
        self.metrics.get(&(locale.to_string(), key.to_string()))
    }

    /// Every metric, ordered by locale then key.
    pub fn get_metrics(&self) -> Vec<TranslationMetric> {
        let mut all: Vec<TranslationMetric> = self
            .metrics
            .iter()
            .map(|((locale, key), metric)| TranslationMetric {
                locale: locale.clone(),
                key: key.clone(),
                metric: metric.clone(),
            })
            .collect();
        all.sort_by(|a, b| (&a.locale, &a.key).cmp(&(&b.locale, &b.key)));
        all
    }

    /// The `limit` most used translations, most used first.
    pub fn get_most_used_translations(&self, limit: usize) -> Vec<TranslationMetric> {
        let mut all = self.get_metrics();
        all.sort_by(|a, b| b.metric.usage_count.cmp(&a.metric.usage_count));
        all.truncate(limit);
        all
    }

    /// Translations whose smoothed render time exceeds `threshold_ms`,
    /// slowest first.
    pub fn get_slow_translations(&self, threshold_ms: f64) -> Vec<TranslationMetric> {
        let mut slow: Vec<TranslationMetric> = self
            .get_metrics()
            .into_iter()
            .filter(|m| m.metric.avg_render_time > threshold_ms)
            .collect();
        slow.sort_by(|a, b| b.metric.avg_render_time.total_cmp(&a.metric.avg_render_time));
        slow
    }

    /// Translations with at least one recorded error, most errors first.
    pub fn get_error_prone_translations(&self) -> Vec<TranslationMetric> {
        let mut failing: Vec<TranslationMetric> = self
            .get_metrics()
            .into_iter()
            .filter(|m| m.metric.error_count > 0)
            .collect();
        failing.sort_by(|a, b| b.metric.error_count.cmp(&a.metric.error_count));
        failing
    }

    pub fn summary(&self) -> AnalyticsSummary {
        self.metrics.values().fold(
            AnalyticsSummary {
                tracked_keys: self.metrics.len(),
                ..AnalyticsSummary::default()
            },
            |mut summary, metric| {
                summary.total_usage += metric.usage_count;
                summary.total_errors += metric.error_count;
                summary
            },
        )
    }
}
