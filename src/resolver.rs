use std::collections::HashMap;

use tracing::debug;

use crate::error::Degradation;
use crate::locale;
use crate::options::TranslationOptions;
use crate::store::{TranslationStore, TranslationValue};

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The active locale (refined by region when such a store is loaded)
    Specific,
    /// The default locale, after a miss in the active one
    DefaultLocale,
    /// Caller-supplied `fallback` text
    FallbackText,
    /// Nothing matched; the key itself
    LiteralKey,
}

/// Outcome of walking a key through the fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: TranslationValue,
    /// Locale whose rules apply to `value`
    pub locale: String,
    pub source: Source,
    /// Number of stores consulted
    pub hops: usize,
}

impl Resolved {
    pub fn degradation(&self) -> Option<Degradation> {
        match self.source {
            Source::Specific | Source::DefaultLocale => None,
            Source::FallbackText => Some(Degradation::FallbackText),
            Source::LiteralKey => Some(Degradation::MissingKey),
        }
    }
}

/// Walks dotted keys through locale stores.
///
/// The chain is fixed: specific locale, then the default locale, then the
/// literal key. At most two stores are consulted and resolution never fails.
pub struct KeyResolver<'a> {
    stores: &'a HashMap<String, TranslationStore>,
    default_locale: &'a str,
}

impl<'a> KeyResolver<'a> {
    pub fn new(stores: &'a HashMap<String, TranslationStore>, default_locale: &'a str) -> Self {
        KeyResolver {
            stores,
            default_locale,
        }
    }

    /// Locale tag of the first tier for `active` and the call's options.
    pub fn specific_locale(&self, active: &str, options: &TranslationOptions) -> String {
        if let Some(region) = options.region.as_deref() {
            let regional = locale::with_region(active, region);
            if self.stores.contains_key(&regional) {
                return regional;
            }
        }
        active.to_string()
    }

    pub fn resolve(&self, key: &str, active: &str, options: &TranslationOptions) -> Resolved {
        let specific = self.specific_locale(active, options);

        if let Some(value) = self.lookup(&specific, key) {
            return Resolved {
                value,
                locale: specific,
                source: Source::Specific,
                hops: 1,
            };
        }

        if let Some(fallback) = &options.fallback {
            debug!(key, locale = %specific, "Key missing, using caller fallback text");
            return Resolved {
                value: TranslationValue::Scalar(fallback.clone()),
                locale: specific,
                source: Source::FallbackText,
                hops: 1,
            };
        }

        if specific != self.default_locale {
            if let Some(value) = self.lookup(self.default_locale, key) {
                return Resolved {
                    value,
                    locale: self.default_locale.to_string(),
                    source: Source::DefaultLocale,
                    hops: 2,
                };
            }
            return Resolved {
                value: TranslationValue::Scalar(key.to_string()),
                locale: specific,
                source: Source::LiteralKey,
                hops: 2,
            };
        }

        Resolved {
            value: TranslationValue::Scalar(key.to_string()),
            locale: specific,
            source: Source::LiteralKey,
            hops: 1,
        }
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<TranslationValue> {
        self.stores.get(locale).and_then(|store| store.lookup(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stores() -> HashMap<String, TranslationStore> {
        let mut stores = HashMap::new();
        stores.insert(
            "en".to_string(),
            TranslationStore::new()
                .with_text("nav.home", "Home")
                .with_text("nav.bookings", "Bookings"),
        );
        stores.insert(
            "pt".to_string(),
            TranslationStore::new().with_text("nav.home", "Início"),
        );
        stores.insert(
            "pt-br".to_string(),
            TranslationStore::new().with_text("nav.home", "Página inicial"),
        );
        stores
    }

    #[test]
    fn test_specific_hit() {
        let stores = stores();
        let resolver = KeyResolver::new(&stores, "en");
        let resolved = resolver.resolve("nav.home", "pt", &TranslationOptions::new());
        assert_eq!(resolved.value, TranslationValue::Scalar("Início".to_string()));
        assert_eq!(resolved.source, Source::Specific);
        assert_eq!(resolved.hops, 1);
        assert_eq!(resolved.degradation(), None);
    }

    #[test]
    fn test_region_refines_specific_tier() {
        let stores = stores();
        let resolver = KeyResolver::new(&stores, "en");
        let options = TranslationOptions::new().with_region("BR");
        let resolved = resolver.resolve("nav.home", "pt", &options);
        assert_eq!(
            resolved.value,
            TranslationValue::Scalar("Página inicial".to_string())
        );
        assert_eq!(resolved.locale, "pt-br");

        let options = TranslationOptions::new().with_region("AO");
        assert_eq!(resolver.specific_locale("pt", &options), "pt");
    }

    #[test]
    fn test_default_locale_tier() {
        let stores = stores();
        let resolver = KeyResolver::new(&stores, "en");
        let resolved = resolver.resolve("nav.bookings", "pt", &TranslationOptions::new());
        assert_eq!(resolved.value, TranslationValue::Scalar("Bookings".to_string()));
        assert_eq!(resolved.source, Source::DefaultLocale);
        assert_eq!(resolved.locale, "en");
        assert_eq!(resolved.hops, 2);
    }

    #[test]
    fn test_fallback_wins_over_default_locale() {
        let stores = stores();
        let resolver = KeyResolver::new(&stores, "en");
        let options = TranslationOptions::new().with_fallback("Reservas");
        let resolved = resolver.resolve("nav.bookings", "pt", &options);
        assert_eq!(resolved.value, TranslationValue::Scalar("Reservas".to_string()));
        assert_eq!(resolved.degradation(), Some(Degradation::FallbackText));
    }

    #[test]
    fn test_missing_everywhere_returns_key() {
        let stores = stores();
        let resolver = KeyResolver::new(&stores, "en");

        let resolved = resolver.resolve("nav.nowhere", "pt", &TranslationOptions::new());
        assert_eq!(resolved.value, TranslationValue::Scalar("nav.nowhere".to_string()));
        assert_eq!(resolved.hops, 2);
        assert_eq!(resolved.degradation(), Some(Degradation::MissingKey));

        let resolved = resolver.resolve("nav.nowhere", "en", &TranslationOptions::new());
        assert_eq!(resolved.hops, 1);
        assert_eq!(resolved.source, Source::LiteralKey);
    }

    #[test]
    fn test_unloaded_locale_falls_back_to_default() {
        let stores = stores();
        let resolver = KeyResolver::new(&stores, "en");
        let resolved = resolver.resolve("nav.home", "sw", &TranslationOptions::new());
        assert_eq!(resolved.value, TranslationValue::Scalar("Home".to_string()));
    }
}
