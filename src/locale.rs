//! Locale tag handling and per-locale profiles.
//!
//! Tags are kept as normalised strings (`"pt-br"`, `"sr-latn"`) so they can
//! key content stores directly. Profiles are resolved per call from an
//! explicit table with a default for everything else.

use icu_locale::Locale;
use serde::Serialize;

use crate::plural::PluralRule;

/// Normalize a locale tag for use as a store key.
///
/// - `en_US` → `en-us`
/// - ` FR ` → `fr`
pub fn normalize(tag: &str) -> String {
    tag.trim().replace('_', "-").to_lowercase()
}

/// Primary language subtag of a locale tag.
///
/// Uses ICU locale parsing and falls back to the first `-` separated
/// segment for tags ICU rejects (private or legacy tags).
///
/// ```
/// assert_eq!(bazaar_i18n::locale::language_of("zh-Hant-TW"), "zh");
/// assert_eq!(bazaar_i18n::locale::language_of("de_AT"), "de");
/// ```
pub fn language_of(tag: &str) -> String {
    let normalized = normalize(tag);
    match normalized.parse::<Locale>() {
        Ok(locale) => locale.id.language.as_str().to_string(),
        Err(_) => normalized
            .split('-')
            .next()
            .unwrap_or(normalized.as_str())
            .to_string(),
    }
}

/// Tag for `locale` refined by `region` (`"en"` + `"GB"` → `"en-gb"`).
pub fn with_region(locale: &str, region: &str) -> String {
    format!("{}-{}", language_of(locale), normalize(region))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Rendering-relevant facts about a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleProfile {
    /// `None` means the locale has no registered plural rule.
    pub plural_rule: Option<PluralRule>,
    pub direction: TextDirection,
}

impl Default for LocaleProfile {
    fn default() -> Self {
        LocaleProfile {
            plural_rule: None,
            direction: TextDirection::Ltr,
        }
    }
}

impl LocaleProfile {
    /// Profile for a locale tag: the explicit entry for its language, or the
    /// default profile.
    pub fn for_locale(tag: &str) -> Self {
        let language = language_of(tag);
        let default = LocaleProfile::default();
        LocaleProfile {
            plural_rule: PluralRule::for_language(&language).or(default.plural_rule),
            direction: match language.as_str() {
                "ar" | "he" | "iw" | "fa" | "ur" | "ps" | "yi" | "dv" => TextDirection::Rtl,
                _ => default.direction,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("en_US"), "en-us");
        assert_eq!(normalize(" FR "), "fr");
        assert_eq!(normalize("zh-Hant"), "zh-hant");
    }

    #[test]
    fn test_language_of() {
        assert_eq!(language_of("en-US"), "en");
        assert_eq!(language_of("sr_Latn"), "sr");
        assert_eq!(language_of("ar"), "ar");
        assert_eq!(language_of("pt_br"), "pt");
    }

    #[test]
    fn test_with_region() {
        assert_eq!(with_region("en", "GB"), "en-gb");
        assert_eq!(with_region("pt-PT", "br"), "pt-br");
    }

    #[test]
    fn test_profile_direction() {
        assert_eq!(LocaleProfile::for_locale("ar-EG").direction, TextDirection::Rtl);
        assert_eq!(LocaleProfile::for_locale("he").direction, TextDirection::Rtl);
        assert_eq!(LocaleProfile::for_locale("de").direction, TextDirection::Ltr);
    }

    #[test]
    fn test_profile_defaults_for_unknown_locale() {
        let profile = LocaleProfile::for_locale("tlh");
        assert_eq!(profile, LocaleProfile::default());
        assert_eq!(
            LocaleProfile::for_locale("ru").plural_rule,
            Some(PluralRule::EastSlavic)
        );
    }
}
