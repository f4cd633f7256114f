//! Translation resolution and text experimentation for multi-locale UIs.
//!
//! [`Translator`] owns every piece of mutable state (content stores, the
//! template cache, usage analytics and A/B tests) for one application
//! instance. All operations are synchronous and in-memory; loading content and
//! exporting telemetry are left to the caller.
//!
//! # Example
//!
//! ```
//! use bazaar_i18n::{TranslationOptions, TranslationStore, Translator, VariantMap};
//!
//! let en = TranslationStore::new().with_variants(
//!     "greet.hello",
//!     VariantMap::new()
//!         .with_variant("one", "Hello friend")
//!         .with_variant("other", "Hello {count} friends"),
//! );
//!
//! let mut i18n = Translator::new();
//! i18n.with_locale("en").with_store("en", en);
//!
//! assert_eq!(i18n.translate("greet.hello", &TranslationOptions::new().with_count(1)), "Hello friend");
//! assert_eq!(i18n.translate("greet.hello", &TranslationOptions::new().with_count(5)), "Hello 5 friends");
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

pub mod analytics;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod experiment;
pub mod interpolate;
pub mod loader;
pub mod locale;
pub mod options;
pub mod plural;
pub mod resolver;
pub mod selector;
pub mod store;

pub use analytics::{AnalyticsSummary, TranslationMetric, UsageAnalytics, UsageMetric};
pub use cache::{CacheEntry, CacheStats, TranslationCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{TranslatorConfig, VerbosityLevel};
pub use error::{Degradation, I18nError, I18nResult};
pub use experiment::{AbTestManager, VariantResult};
pub use locale::{LocaleProfile, TextDirection};
pub use options::{Formality, Gender, TranslationOptions};
pub use plural::{PluralCategory, PluralRule, plural_category};
pub use resolver::{KeyResolver, Resolved, Source};
pub use store::{TranslationStore, TranslationValue, VariantMap};

pub struct Translator {
    // Keyed by normalised locale tag
    // e.g. stores["en"], stores["pt-br"], stores["ar"]
    stores: HashMap<String, TranslationStore>,
    locale: String,
    default_locale: String,
    verbosity: VerbosityLevel,
    cache_enabled: bool,
    analytics_enabled: bool,
    cache: TranslationCache,
    analytics: UsageAnalytics,
    experiments: AbTestManager,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        Self::from_config(&TranslatorConfig::default())
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        let default_locale = locale::normalize(&config.default_locale);
        let active = config
            .locale
            .as_deref()
            .map(locale::normalize)
            .unwrap_or_else(|| default_locale.clone());
        Translator {
            stores: HashMap::new(),
            locale: active,
            default_locale,
            verbosity: config.verbosity,
            cache_enabled: config.cache_enabled,
            analytics_enabled: config.analytics_enabled,
            cache: TranslationCache::new().with_default_ttl(config.cache_ttl()),
            analytics: UsageAnalytics::new(),
            experiments: AbTestManager::new(),
        }
    }

    /// Switch the active locale. Cached templates are dropped.
    pub fn with_locale(&mut self, locale: &str) -> &mut Self {
        let locale = locale::normalize(locale);
        if locale != self.locale {
            self.cache.clear();
        }
        self.locale = locale;
        self
    }

    pub fn with_default_locale(&mut self, locale: &str) -> &mut Self {
        self.default_locale = locale::normalize(locale);
        self.cache.clear();
        self
    }

    pub fn with_verbosity(&mut self, verbosity: VerbosityLevel) -> &mut Self {
        self.verbosity = verbosity;
        self
    }

    /// Use `clock` for cache expiry and usage timestamps.
    ///
    /// Resets the cache and analytics, so set it up before first use.
    pub fn with_clock(&mut self, clock: Arc<dyn Clock>) -> &mut Self {
        let ttl = self.cache.default_ttl();
        self.cache = TranslationCache::with_clock(clock.clone()).with_default_ttl(ttl);
        self.analytics = UsageAnalytics::with_clock(clock);
        self
    }

    /// Install (or replace) the content of a locale. Cached templates are
    /// dropped, since they may come from the old content.
    pub fn with_store(&mut self, locale: &str, store: TranslationStore) -> &mut Self {
        self.stores.insert(locale::normalize(locale), store);
        self.cache.clear();
        self
    }

    pub fn with_stores(&mut self, stores: HashMap<String, TranslationStore>) -> &mut Self {
        for (locale, store) in stores {
            self.stores.insert(locale::normalize(&locale), store);
        }
        self.cache.clear();
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.stores.contains_key(&locale::normalize(locale))
    }

    /// Text direction of the active locale
    pub fn direction(&self) -> TextDirection {
        LocaleProfile::for_locale(&self.locale).direction
    }

    /// Plural category of `count` in the active locale
    pub fn plural_category(&self, count: i64) -> PluralCategory {
        plural::plural_category(&self.locale, count.unsigned_abs())
    }

    /// Render `key` in the active locale.
    ///
    /// Never fails: unresolvable content degrades to the fallback text or the
    /// key itself, and the degradation is recorded in the analytics. Degraded
    /// templates are cached too; a hit records their degradation again.
    pub fn translate(&mut self, key: &str, options: &TranslationOptions) -> String {
        let started = Instant::now();
        let resolver = KeyResolver::new(&self.stores, &self.default_locale);
        let cache_key = TranslationCache::key_for(
            &resolver.specific_locale(&self.locale, options),
            key,
            options,
        );

        if self.cache_enabled {
            if let Some(entry) = self.cache.get_entry(&cache_key) {
                debug!(key, locale = %self.locale, "Translation cache hit");
                let text = interpolate::interpolate(&entry.data, options);
                self.record(key, started, entry.degradation);
                return text;
            }
        }

        let resolved = resolver.resolve(key, &self.locale, options);
        let selection = selector::select(&resolved.value, &resolved.locale, options);
        let degradation = resolved.degradation().or(selection.degradation);

        self.log_resolution(key, &resolved, degradation.as_ref());

        if self.cache_enabled {
            self.cache
                .set_with_degradation(&cache_key, &selection.text, degradation.clone(), None);
        }

        let text = interpolate::interpolate(&selection.text, options);
        self.record(key, started, degradation);
        text
    }

    fn record(&mut self, key: &str, started: Instant, degradation: Option<Degradation>) {
        if !self.analytics_enabled {
            return;
        }
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.analytics.record_usage(&self.locale, key, elapsed_ms);
        if degradation.is_some() {
            self.analytics.record_error(&self.locale, key);
        }
    }

    fn log_resolution(&self, key: &str, resolved: &Resolved, degradation: Option<&Degradation>) {
        if self.verbosity == VerbosityLevel::Silent {
            return;
        }
        if resolved.source == Source::DefaultLocale {
            info!(
                "[i18n] Fallback: Using message '{}' from locale '{}' (requested: '{}')",
                key, resolved.locale, self.locale
            );
        }
        if let Some(degradation) = degradation {
            warn!(key, locale = %self.locale, "[i18n] Degraded translation: {}", degradation);
        }
        if self.verbosity >= VerbosityLevel::Verbose {
            debug!(
                "[i18n] Fallback chain for '{}': {} -> {} -> key ({} stores consulted)",
                key, self.locale, self.default_locale, resolved.hops
            );
        }
    }

    /// Register a text experiment. See [`AbTestManager::register_test`].
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
        self.experiments.register_test(key, variants, distribution)
    }

    /// Variant text shown to `user_id`, counting a view.
    pub fn get_variant(&mut self, test_key: &str, user_id: &str) -> Option<String> {
        self.experiments.get_variant(test_key, user_id)
    }

    /// Variant text for `user_id` with `{name}` placeholders filled in.
    pub fn get_variant_with(
        &mut self,
        test_key: &str,
        user_id: &str,
        options: &TranslationOptions,
    ) -> Option<String> {
        self.get_variant(test_key, user_id)
            .map(|text| interpolate::interpolate(&text, options))
    }

    pub fn record_conversion(&mut self, test_key: &str, user_id: &str) {
        self.experiments.record_conversion(test_key, user_id);
    }

    pub fn get_results(&self, test_key: &str) -> Option<Vec<VariantResult>> {
        self.experiments.get_results(test_key)
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut TranslationCache {
        &mut self.cache
    }

    pub fn analytics(&self) -> &UsageAnalytics {
        &self.analytics
    }

    pub fn experiments(&self) -> &AbTestManager {
        &self.experiments
    }
}
