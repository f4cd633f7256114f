//! Property-based invariant tests for the translation engine.
//!
//! 1. Every locale yields a category from the fixed set; unknown locales yield `other`
//! 2. Repeated translation within the TTL is identical and served from cache
//! 3. Bucketing is stable for any user and test key
//! 4. Equal-split distributions sum to 1
//! 5. A key missing everywhere renders as itself after the fixed number of hops
//! 6. Interpolation leaves unknown placeholders intact

use std::collections::HashMap;

use bazaar_i18n::experiment::{AbTestManager, bucket, stable_hash};
use bazaar_i18n::interpolate::interpolate;
use bazaar_i18n::{
    KeyResolver, PluralCategory, Source, TranslationOptions, TranslationStore, TranslationValue,
    Translator, VerbosityLevel, plural_category,
};
use proptest::prelude::*;

const LOCALES: &[&str] = &[
    "en", "de", "fr", "pt-BR", "es", "it", "nl", "sv", "ru", "uk", "pl", "cs", "sk", "ro", "hr",
    "sr", "sl", "lt", "lv", "ar", "he", "ga", "cy", "ja", "zh-Hant", "ko", "th", "vi", "tr", "hi",
    "fa", "el",
];

proptest! {
    #[test]
    fn plural_category_is_in_fixed_set(count in any::<u64>()) {
        for locale in LOCALES {
            let category = plural_category(locale, count);
            prop_assert!(PluralCategory::ALL.contains(&category));
        }
    }

    #[test]
    fn unregistered_locale_is_always_other(count in any::<u64>(), locale in "q[a-z]{2}") {
        prop_assert_eq!(plural_category(&locale, count), PluralCategory::Other);
    }

    #[test]
    fn translate_twice_hits_cache(count in 0i64..10_000, name in "[A-Za-z]{1,12}") {
        let en = TranslationStore::new()
            .with_text("search.title", "Stays for {name}")
            .with_text("search.count", "{count} results");
        let mut i18n = Translator::new();
        i18n.with_verbosity(VerbosityLevel::Silent).with_store("en", en);

        let options = TranslationOptions::new().with_count(count).with_var("name", &name);
        let first = i18n.translate("search.title", &options);
        let hits = i18n.cache().stats().hits;
        let second = i18n.translate("search.title", &options);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(i18n.cache().stats().hits, hits + 1);
        prop_assert_eq!(first, format!("Stays for {}", name));
    }

    #[test]
    fn bucketing_is_stable(user in "[a-z0-9-]{1,24}", key in "[a-z.]{1,16}") {
        let mut tests = AbTestManager::new();
        tests.register_test(&key, [("A", "a"), ("B", "b"), ("C", "c")], None).unwrap();
        let first = tests.get_variant(&key, &user).unwrap();
        for _ in 0..50 {
            prop_assert_eq!(tests.get_variant(&key, &user).unwrap(), first.clone());
        }
        let position = bucket(&format!("{}{}", user, key));
        prop_assert!((0.0..1.0).contains(&position));
    }

    #[test]
    fn equal_split_sums_to_one(n in 1usize..40) {
        let mut tests = AbTestManager::new();
        let variants: Vec<(String, String)> =
            (0..n).map(|i| (format!("v{}", i), format!("text {}", i))).collect();
        tests.register_test("split", variants, None).unwrap();
        let total: f64 = tests.distribution("split").unwrap().iter().map(|(_, w)| w).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_key_renders_literally(key in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}") {
        let mut stores = HashMap::new();
        stores.insert("en".to_string(), TranslationStore::new().with_text("known", "Known"));
        stores.insert("de".to_string(), TranslationStore::new().with_text("known", "Bekannt"));
        prop_assume!(key != "known");

        let resolver = KeyResolver::new(&stores, "en");
        let resolved = resolver.resolve(&key, "de", &TranslationOptions::new());
        prop_assert_eq!(resolved.value, TranslationValue::Scalar(key.clone()));
        prop_assert_eq!(resolved.source, Source::LiteralKey);
        prop_assert_eq!(resolved.hops, 2);

        let resolved = resolver.resolve(&key, "en", &TranslationOptions::new());
        prop_assert_eq!(resolved.hops, 1);
    }

    #[test]
    fn unknown_placeholders_survive(name in "[a-z]{1,10}") {
        let template = format!("Hi {{{}}}!", name);
        prop_assert_eq!(interpolate(&template, &TranslationOptions::new()), template);
    }
}

#[test]
fn bucketing_matches_across_instances() {
    // Fresh managers share no state; assignments must still agree.
    let variants = [("A", "Book now"), ("B", "Reserve today")];
    let mut first = AbTestManager::new();
    let mut second = AbTestManager::new();
    first.register_test("cta.button", variants, None).unwrap();
    second.register_test("cta.button", variants, None).unwrap();
    for i in 0..500 {
        let user = format!("user-{}", i);
        assert_eq!(
            first.get_variant("cta.button", &user),
            second.get_variant("cta.button", &user)
        );
    }
    // Pinned value: a change here would reshuffle live experiments.
    assert_eq!(stable_hash("user-42cta.button"), -12_430_192);
}
