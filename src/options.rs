use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::I18nError;

/// Grammatical gender of the subject a message talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

impl Gender {
    /// Key used for this gender inside a variant map
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Neutral => "neutral",
        }
    }
}

impl FromStr for Gender {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" | "masculine" => Ok(Gender::Male),
            "female" | "f" | "feminine" => Ok(Gender::Female),
            "neutral" | "n" | "neuter" => Ok(Gender::Neutral),
            _ => Err(I18nError::InvalidOption {
                kind: "gender",
                value: s.to_string(),
            }),
        }
    }
}

/// Register of address (T-V distinction: tu/vous, du/Sie, ты/вы).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formality {
    Formal,
    Informal,
}

impl Formality {
    /// Key used for this register inside a variant map
    pub fn as_str(&self) -> &'static str {
        match self {
            Formality::Formal => "formal",
            Formality::Informal => "informal",
        }
    }
}

impl FromStr for Formality {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "formal" => Ok(Formality::Formal),
            "informal" | "casual" => Ok(Formality::Informal),
            _ => Err(I18nError::InvalidOption {
                kind: "formality",
                value: s.to_string(),
            }),
        }
    }
}

/// Per-call options for [`crate::Translator::translate`].
///
/// `count`, `gender`, `formality` and `context` pick a variant;
/// `vars` only feed `{name}` placeholders.
///
/// ```
/// use bazaar_i18n::{Gender, TranslationOptions};
///
/// let options = TranslationOptions::new()
///     .with_count(3)
///     .with_gender(Gender::Female)
///     .with_var("host", "Amira");
/// assert_eq!(options.count, Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationOptions {
    pub count: Option<i64>,
    pub context: Option<String>,
    pub fallback: Option<String>,
    pub gender: Option<Gender>,
    pub formality: Option<Formality>,
    pub region: Option<String>,
    pub vars: BTreeMap<String, String>,
}

impl TranslationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_owned());
        self
    }

    pub fn with_fallback(mut self, fallback: &str) -> Self {
        self.fallback = Some(fallback.to_owned());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_formality(mut self, formality: Formality) -> Self {
        self.formality = Some(formality);
        self
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_owned());
        self
    }

    /// Add an interpolation variable, stored in its string form.
    pub fn with_var<V: Display>(mut self, name: &str, value: V) -> Self {
        self.vars.insert(name.to_owned(), value.to_string());
        self
    }

    /// String value for a `{name}` placeholder.
    ///
    /// Explicit variables win; the named selection options (`count`,
    /// `context`, `gender`, `formality`, `region`) are also addressable.
    pub fn value_for(&self, name: &str) -> Option<String> {
        if let Some(value) = self.vars.get(name) {
            return Some(value.clone());
        }
        match name {
            "count" => self.count.map(|count| count.to_string()),
            "context" => self.context.clone(),
            "gender" => self.gender.map(|gender| gender.as_str().to_string()),
            "formality" => self.formality.map(|formality| formality.as_str().to_string()),
            "region" => self.region.clone(),
            _ => None,
        }
    }

    /// Stable serialization of the options that influence the template.
    ///
    /// Interpolation variables are excluded; they never change which
    /// template is chosen. Free-text parts are escaped with
    /// [`escape_key_part`].
    pub fn selection_key(&self) -> String {
        format!(
            "c={}|g={}|f={}|x={}|fb={}",
            self.count.map(|count| count.to_string()).unwrap_or_default(),
            self.gender.map(|gender| gender.as_str()).unwrap_or_default(),
            self.formality
                .map(|formality| formality.as_str())
                .unwrap_or_default(),
            escape_key_part(self.context.as_deref().unwrap_or_default()),
            escape_key_part(self.fallback.as_deref().unwrap_or_default()),
        )
    }
}

/// Escape `\` and `|` so a part can sit between `|` separators.
pub fn escape_key_part(part: &str) -> String {
    part.replace('\\', "\\\\").replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_for_prefers_vars() {
        let options = TranslationOptions::new()
            .with_count(4)
            .with_var("count", "four")
            .with_var("price", 12.5);
        assert_eq!(options.value_for("count"), Some("four".to_string()));
        assert_eq!(options.value_for("price"), Some("12.5".to_string()));
        assert_eq!(options.value_for("missing"), None);
    }

    #[test]
    fn test_value_for_selection_options() {
        let options = TranslationOptions::new()
            .with_count(-2)
            .with_gender(Gender::Female)
            .with_region("BR");
        assert_eq!(options.value_for("count"), Some("-2".to_string()));
        assert_eq!(options.value_for("gender"), Some("female".to_string()));
        assert_eq!(options.value_for("region"), Some("BR".to_string()));
    }

    #[test]
    fn test_selection_key_ignores_vars() {
        let a = TranslationOptions::new().with_count(1).with_var("name", "Ana");
        let b = TranslationOptions::new().with_count(1).with_var("name", "Bo");
        assert_eq!(a.selection_key(), b.selection_key());
        assert_eq!(a.selection_key(), "c=1|g=|f=|x=|fb=");

        let c = TranslationOptions::new()
            .with_count(1)
            .with_formality(Formality::Formal);
        assert_ne!(a.selection_key(), c.selection_key());
    }

    #[test]
    fn test_selection_key_escapes_free_text() {
        let options = TranslationOptions::new().with_context("a|b").with_fallback("c\\d");
        assert_eq!(options.selection_key(), "c=|g=|f=|x=a\\|b|fb=c\\\\d");
        assert_eq!(escape_key_part("plain"), "plain");
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!("F".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("casual".parse::<Formality>().unwrap(), Formality::Informal);
        match "unknown".parse::<Gender>() {
            Err(err) => assert_eq!(err.to_string(), "Unknown gender 'unknown'"),
            Ok(gender) => panic!("expected an error, got {:?}", gender),
        }
        assert!(matches!(
            "loud".parse::<Formality>(),
            Err(I18nError::InvalidOption { kind: "formality", .. })
        ));
    }
}
