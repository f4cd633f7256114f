//! Contextual variant selection.
//!
//! Turns a raw [`TranslationValue`] into a single template string. Variant
//! maps are resolved with a fixed precedence, first match wins:
//!
//! 1. plural category of `count` (when a count is given)
//! 2. `gender`
//! 3. `formality`
//! 4. `context`
//! 5. the `default` entry
//! 6. the first entry in definition order
//! 7. the map's raw form
//!
//! Plural agreement outranks tone, so a message given both a count and a
//! gender selects by count.

use tracing::debug;

use crate::error::Degradation;
use crate::options::TranslationOptions;
use crate::plural::plural_category;
use crate::store::{TranslationValue, VariantMap};

/// Key of the catch-all entry in a variant map
pub const DEFAULT_VARIANT: &str = "default";

/// Outcome of selecting a template from a raw value
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub text: String,
    pub degradation: Option<Degradation>,
}

impl Selection {
    fn clean(text: &str) -> Self {
        Selection {
            text: text.to_string(),
            degradation: None,
        }
    }
}

/// Select the template for `value` in `locale`.
pub fn select(value: &TranslationValue, locale: &str, options: &TranslationOptions) -> Selection {
    match value {
        TranslationValue::Scalar(text) => Selection::clean(text),
        TranslationValue::Variants(map) => select_variant(map, locale, options),
    }
}

fn select_variant(map: &VariantMap, locale: &str, options: &TranslationOptions) -> Selection {
    let mut plural_miss = None;

    if let Some(count) = options.count {
        let category = plural_category(locale, count.unsigned_abs());
        if let Some(text) = map.get(category.as_str()) {
            return Selection::clean(text);
        }
        debug!(locale, category = %category, "Variant map has no entry for plural category");
        plural_miss = Some(Degradation::PluralCategoryMiss(category));
    }

    let dimensions = [
        options.gender.map(|gender| gender.as_str()),
        options.formality.map(|formality| formality.as_str()),
        options.context.as_deref(),
        Some(DEFAULT_VARIANT),
    ];
    for dimension in dimensions.into_iter().flatten() {
        if let Some(text) = map.get(dimension) {
            return Selection {
                text: text.to_string(),
                degradation: plural_miss,
            };
        }
    }

    match map.first() {
        Some(text) => Selection {
            text: text.to_string(),
            degradation: plural_miss.or(Some(Degradation::ContextMiss)),
        },
        None => Selection {
            text: map.to_string(),
            degradation: Some(Degradation::Unrenderable),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Formality, Gender};
    use crate::plural::PluralCategory;

    fn greeting() -> TranslationValue {
        TranslationValue::Variants(
            VariantMap::new()
                .with_variant("one", "Hello friend")
                .with_variant("other", "Hello {count} friends")
                .with_variant("female", "Hello, madam")
                .with_variant("formal", "Good day")
                .with_variant("checkout", "Welcome to checkout")
                .with_variant("default", "Hello"),
        )
    }

    #[test]
    fn test_scalar_is_unchanged() {
        let value = TranslationValue::Scalar("Plain".to_string());
        let options = TranslationOptions::new().with_count(3);
        assert_eq!(select(&value, "en", &options), Selection::clean("Plain"));
    }

    #[test]
    fn test_plural_outranks_gender() {
        let options = TranslationOptions::new()
            .with_count(1)
            .with_gender(Gender::Female);
        assert_eq!(select(&greeting(), "en", &options).text, "Hello friend");
    }

    #[test]
    fn test_negative_count_uses_absolute_value() {
        let options = TranslationOptions::new().with_count(-1);
        assert_eq!(select(&greeting(), "en", &options).text, "Hello friend");
    }

    #[test]
    fn test_precedence_without_count() {
        let options = TranslationOptions::new()
            .with_gender(Gender::Female)
            .with_formality(Formality::Formal);
        assert_eq!(select(&greeting(), "en", &options).text, "Hello, madam");

        let options = TranslationOptions::new()
            .with_gender(Gender::Male)
            .with_formality(Formality::Formal);
        assert_eq!(select(&greeting(), "en", &options).text, "Good day");

        let options = TranslationOptions::new().with_context("checkout");
        assert_eq!(select(&greeting(), "en", &options).text, "Welcome to checkout");

        let selection = select(&greeting(), "en", &TranslationOptions::new());
        assert_eq!(selection.text, "Hello");
        assert_eq!(selection.degradation, None);
    }

    #[test]
    fn test_plural_category_miss_falls_through() {
        let value = TranslationValue::Variants(
            VariantMap::new()
                .with_variant("one", "один отзыв")
                .with_variant("few", "{count} отзыва"),
        );
        let options = TranslationOptions::new().with_count(5);
        let selection = select(&value, "ru", &options);
        assert_eq!(selection.text, "один отзыв");
        assert_eq!(
            selection.degradation,
            Some(Degradation::PluralCategoryMiss(PluralCategory::Many))
        );
    }

    #[test]
    fn test_first_entry_when_nothing_matches() {
        let value = TranslationValue::Variants(
            VariantMap::new()
                .with_variant("host", "Your host")
                .with_variant("guest", "Your guest"),
        );
        let options = TranslationOptions::new().with_context("admin");
        let selection = select(&value, "en", &options);
        assert_eq!(selection.text, "Your host");
        assert_eq!(selection.degradation, Some(Degradation::ContextMiss));
    }

    #[test]
    fn test_empty_map_renders_raw_form() {
        let value = TranslationValue::Variants(VariantMap::new());
        let selection = select(&value, "en", &TranslationOptions::new());
        assert_eq!(selection.text, "{}");
        assert_eq!(selection.degradation, Some(Degradation::Unrenderable));
    }
}
