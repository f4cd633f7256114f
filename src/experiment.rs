//! Text experiments with deterministic user bucketing.
//!
//! A user is assigned to a variant by hashing `user_id + test_key` with an
//! unseeded 32-bit polynomial hash, so the same user always lands in the same
//! variant in every process. The assignment is recomputed on each call and
//! never stored.
//!
//! # Example
//!
//! ```
//! use bazaar_i18n::experiment::AbTestManager;
//!
//! let mut tests = AbTestManager::new();
//! tests
//!     .register_test("cta.button", [("A", "Book now"), ("B", "Reserve today")], None)
//!     .unwrap();
//!
//! let shown = tests.get_variant("cta.button", "user-42").unwrap();
//! assert_eq!(tests.get_variant("cta.button", "user-42").unwrap(), shown);
//! tests.record_conversion("cta.button", "user-42");
//! ```

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{I18nError, I18nResult};

/// Z-score of a 95% two-sided interval
const Z_95: f64 = 1.96;

/// Largest bucket value; keeps buckets inside `[0, 1)`
const BUCKET_CEILING: f64 = 1.0 - f64::EPSILON;

/// 32-bit polynomial string hash, `h = h * 31 + unit` with wraparound,
/// over UTF-16 code units.
pub fn stable_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Bucket position of `input` in `[0, 1)`: `|hash| / i32::MAX`.
pub fn bucket(input: &str) -> f64 {
    let magnitude = (stable_hash(input) as i64).abs() as f64;
    (magnitude / i32::MAX as f64).min(BUCKET_CEILING)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VariantCounters {
    pub views: u64,
    pub conversions: u64,
}

#[derive(Debug, Clone)]
struct Variant {
    id: String,
    text: String,
    weight: f64,
    counters: VariantCounters,
}

#[derive(Debug, Clone)]
struct AbTest {
    /// Registration order; bucketing walks variants in this order
    variants: Vec<Variant>,
}

impl AbTest {
    fn assign(&self, test_key: &str, user_id: &str) -> usize {
        let position = bucket(&format!("{}{}", user_id, test_key));
        let mut cumulative = 0.0;
        for (index, variant) in self.variants.iter().enumerate() {
            cumulative += variant.weight;
            if cumulative > position {
                return index;
            }
        }
        // Rounding can leave the total a hair under the bucket value.
        self.variants.len() - 1
    }
}

/// Per-variant report row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantResult {
    pub variant: String,
    pub text: String,
    pub views: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
    /// `1 - 1.96 * sqrt(p(1-p)/views)` clamped to `[0, 1]`, with `p` capped
    /// at 1.
    ///
    /// A single-proportion margin for dashboards, not a significance test
    /// between variants.
    pub confidence: f64,
}

#[derive(Debug, Default)]
pub struct AbTestManager {
    tests: HashMap<String, AbTest>,
}

impl AbTestManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an experiment.
    ///
    /// `distribution` maps variant ids to weights; it is normalised to sum
    /// to 1, and ids it leaves out get weight 0. Without a distribution the
    /// traffic is split equally.
    ///
    /// # Errors
    ///
    /// - [`I18nError::DuplicateTest`] if `key` is already registered
    /// - [`I18nError::EmptyVariants`] if `variants` is empty
    /// - [`I18nError::InvalidDistribution`] for repeated variant ids, weights
    ///   that are negative, not finite, name unknown variants or sum to zero
    pub fn register_test<I, K, V>(
        &mut self,
        key: &str,
        variants: I,
        distribution: Option<&[(&str, f64)]>,
    ) -> I18nResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if self.tests.contains_key(key) {
            return Err(I18nError::DuplicateTest(key.to_string()));
        }

        let mut entries: Vec<Variant> = Vec::new();
        for (id, text) in variants {
            let id = id.into();
            if entries.iter().any(|v| v.id == id) {
                return Err(invalid(key, format!("variant '{}' is listed twice", id)));
            }
            entries.push(Variant {
                id,
                text: text.into(),
                weight: 0.0,
                counters: VariantCounters::default(),
            });
        }
        if entries.is_empty() {
            return Err(I18nError::EmptyVariants(key.to_string()));
        }

        match distribution {
            None => {
                let share = 1.0 / entries.len() as f64;
                for variant in &mut entries {
                    variant.weight = share;
                }
            }
            Some(weights) => {
                for (id, weight) in weights {
                    if !weight.is_finite() || *weight < 0.0 {
                        return Err(invalid(key, format!("weight for '{}' is {}", id, weight)));
                    }
                    let variant = entries
                        .iter_mut()
                        .find(|v| v.id == *id)
                        .ok_or_else(|| invalid(key, format!("unknown variant '{}'", id)))?;
                    variant.weight = *weight;
                }
                let total: f64 = entries.iter().map(|v| v.weight).sum();
                if total <= 0.0 {
                    return Err(invalid(key, "weights sum to zero".to_string()));
                }
                if !total.is_finite() {
                    return Err(invalid(key, "weights sum overflows".to_string()));
                }
                for variant in &mut entries {
                    variant.weight /= total;
                }
            }
        }

        info!(test = key, variants = entries.len(), "Registered A/B test");
        self.tests
            .insert(key.to_string(), AbTest { variants: entries });
        Ok(())
    }

    /// Variant text for `user_id`, counting a view. `None` for unknown tests.
    pub fn get_variant(&mut self, test_key: &str, user_id: &str) -> Option<String> {
        let Some(test) = self.tests.get_mut(test_key) else {
            debug!(test = test_key, "get_variant on unregistered A/B test");
            return None;
        };
        let index = test.assign(test_key, user_id);
        let variant = &mut test.variants[index];
        variant.counters.views += 1;
        Some(variant.text.clone())
    }

    /// Variant id `user_id` is assigned to, without counting anything.
    pub fn assigned_variant(&self, test_key: &str, user_id: &str) -> Option<&str> {
        let test = self.tests.get(test_key)?;
        Some(test.variants[test.assign(test_key, user_id)].id.as_str())
    }

    /// Count a conversion for the variant `user_id` is assigned to.
    /// Unknown tests are ignored.
    pub fn record_conversion(&mut self, test_key: &str, user_id: &str) {
        let Some(test) = self.tests.get_mut(test_key) else {
            debug!(test = test_key, "record_conversion on unregistered A/B test");
            return;
        };
        let index = test.assign(test_key, user_id);
        test.variants[index].counters.conversions += 1;
    }

    /// Report rows in registration order. `None` for unknown tests.
    pub fn get_results(&self, test_key: &str) -> Option<Vec<VariantResult>> {
        let test = self.tests.get(test_key)?;
        Some(
            test.variants
                .iter()
                .map(|variant| {
                    let VariantCounters { views, conversions } = variant.counters;
                    let (conversion_rate, confidence) = if views == 0 {
                        (0.0, 0.0)
                    } else {
                        // Conversions can be recorded for users who never saw a view.
                        let p = (conversions as f64 / views as f64).min(1.0);
                        let margin = Z_95 * (p * (1.0 - p) / views as f64).sqrt();
                        (p, (1.0 - margin).clamp(0.0, 1.0))
                    };
                    VariantResult {
                        variant: variant.id.clone(),
                        text: variant.text.clone(),
                        views,
                        conversions,
                        conversion_rate,
                        confidence,
                    }
                })
                .collect(),
        )
    }

    /// Normalised weights in registration order.
    pub fn distribution(&self, test_key: &str) -> Option<Vec<(String, f64)>> {
        let test = self.tests.get(test_key)?;
        Some(
            test.variants
                .iter()
                .map(|variant| (variant.id.clone(), variant.weight))
                .collect(),
        )
    }

    /// Registered test keys, sorted.
    pub fn test_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.tests.keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn invalid(key: &str, reason: String) -> I18nError {
    I18nError::InvalidDistribution {
        key: key.to_string(),
        reason,
    }
}
