//! CLDR plural rules for cardinal, non-negative integer counts.
//!
//! Every rule maps a count to exactly one member of the fixed
//! [`PluralCategory`] set. Callers normalise negative counts to their
//! absolute value before asking for a category.
//!
//! # Example
//!
//! ```
//! use bazaar_i18n::plural::{PluralCategory, plural_category};
//!
//! assert_eq!(plural_category("ar", 0), PluralCategory::Zero);
//! assert_eq!(plural_category("ru", 22), PluralCategory::Few);
//! assert_eq!(plural_category("xx", 1), PluralCategory::Other);
//! ```

use serde::Serialize;

use crate::locale;

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// The complete, fixed set of categories.
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    /// Key used for this category inside a variant map.
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A plural rule family.
///
/// Families are named after a representative language; several languages
/// share each family (see [`PluralRule::for_language`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// `one` for 1, `other` for everything else (English, German, ...).
    OneOther,
    /// `one` for 0 and 1, `other` for everything else (French, Portuguese, Hindi).
    ZeroOneAsOne,
    /// Russian, Ukrainian, Belarusian: one / few / many on `n%10` and `n%100`.
    EastSlavic,
    /// Croatian, Serbian, Bosnian: one / few / other.
    SouthSlavic,
    /// Slovenian: one / two / few / other on `n%100`.
    Slovenian,
    /// Polish: `one` only for exactly 1, then few / many.
    Polish,
    /// Czech and Slovak: one / few (2..=4) / other.
    CzechSlovak,
    /// Romanian: `few` covers 0 and any `n%100` in 1..=19 except 1 itself.
    Romanian,
    Lithuanian,
    Latvian,
    /// Arabic: all six categories.
    Arabic,
    /// Hebrew: one / two / other.
    Hebrew,
    Irish,
    Welsh,
    /// Languages with no grammatical number (Japanese, Chinese, Korean, ...).
    Invariant,
}

impl PluralRule {
    /// Registered rule for a primary language subtag, if any.
    pub fn for_language(language: &str) -> Option<Self> {
        let rule = match language {
            "en" | "de" | "nl" | "sv" | "da" | "nb" | "nn" | "no" | "fi" | "et" | "it" | "es"
            | "el" | "hu" | "tr" | "bg" | "ca" | "sw" | "af" | "ka" | "az" | "ur" => {
                PluralRule::OneOther
            }
            "fr" | "pt" | "hi" | "bn" | "fa" | "gu" | "kn" | "zu" | "am" => PluralRule::ZeroOneAsOne,
            "ru" | "uk" | "be" => PluralRule::EastSlavic,
            "hr" | "sr" | "bs" => PluralRule::SouthSlavic,
            "sl" => PluralRule::Slovenian,
            "pl" => PluralRule::Polish,
            "cs" | "sk" => PluralRule::CzechSlovak,
            "ro" | "mo" => PluralRule::Romanian,
            "lt" => PluralRule::Lithuanian,
            "lv" => PluralRule::Latvian,
            "ar" => PluralRule::Arabic,
            "he" | "iw" => PluralRule::Hebrew,
            "ga" => PluralRule::Irish,
            "cy" => PluralRule::Welsh,
            "ja" | "zh" | "ko" | "th" | "vi" | "id" | "ms" | "lo" | "my" | "km" => {
                PluralRule::Invariant
            }
            _ => return None,
        };
        Some(rule)
    }

    /// Registered rule for a full locale tag (`"pt-BR"`, `"sr_Latn"`), if any.
    pub fn for_locale(tag: &str) -> Option<Self> {
        Self::for_language(&locale::language_of(tag))
    }

    /// Determine the plural category for a non-negative count.
    pub fn categorize(&self, n: u64) -> PluralCategory {
        let mod10 = n % 10;
        let mod100 = n % 100;

        match self {
            PluralRule::OneOther => {
                if n == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            PluralRule::ZeroOneAsOne => {
                if n <= 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            PluralRule::EastSlavic => {
                if mod10 == 1 && mod100 != 11 {
                    PluralCategory::One
                } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            PluralRule::SouthSlavic => {
                if mod10 == 1 && mod100 != 11 {
                    PluralCategory::One
                } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Other
                }
            }
            PluralRule::Slovenian => match mod100 {
                1 => PluralCategory::One,
                2 => PluralCategory::Two,
                3 | 4 => PluralCategory::Few,
                _ => PluralCategory::Other,
            },
            PluralRule::Polish => {
                if n == 1 {
                    PluralCategory::One
                } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            PluralRule::CzechSlovak => match n {
                1 => PluralCategory::One,
                2..=4 => PluralCategory::Few,
                _ => PluralCategory::Other,
            },
            PluralRule::Romanian => {
                if n == 1 {
                    PluralCategory::One
                } else if n == 0 || (1..=19).contains(&mod100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Other
                }
            }
            PluralRule::Lithuanian => {
                if (11..=19).contains(&mod100) {
                    PluralCategory::Other
                } else if mod10 == 1 {
                    PluralCategory::One
                } else if mod10 >= 2 {
                    PluralCategory::Few
                } else {
                    PluralCategory::Other
                }
            }
            PluralRule::Latvian => {
                if mod10 == 0 || (11..=19).contains(&mod100) {
                    PluralCategory::Zero
                } else if mod10 == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            PluralRule::Arabic => match n {
                0 => PluralCategory::Zero,
                1 => PluralCategory::One,
                2 => PluralCategory::Two,
                _ if (3..=10).contains(&mod100) => PluralCategory::Few,
                _ if (11..=99).contains(&mod100) => PluralCategory::Many,
                _ => PluralCategory::Other,
            },
            PluralRule::Hebrew => match n {
                1 => PluralCategory::One,
                2 => PluralCategory::Two,
                _ => PluralCategory::Other,
            },
            PluralRule::Irish => match n {
                1 => PluralCategory::One,
                2 => PluralCategory::Two,
                3..=6 => PluralCategory::Few,
                7..=10 => PluralCategory::Many,
                _ => PluralCategory::Other,
            },
            PluralRule::Welsh => match n {
                0 => PluralCategory::Zero,
                1 => PluralCategory::One,
                2 => PluralCategory::Two,
                3 => PluralCategory::Few,
                6 => PluralCategory::Many,
                _ => PluralCategory::Other,
            },
            PluralRule::Invariant => PluralCategory::Other,
        }
    }
}

/// Plural category for `count` in `locale`.
///
/// Locales without a registered rule always yield [`PluralCategory::Other`].
pub fn plural_category(locale: &str, count: u64) -> PluralCategory {
    match PluralRule::for_locale(locale) {
        Some(rule) => rule.categorize(count),
        None => PluralCategory::Other,
    }
}
