use std::path::PathBuf;

use thiserror::Error;

use crate::plural::PluralCategory;

/// Error types for setup-time operations.
///
/// The translation path itself never returns these: a missing key or an
/// unmatched variant degrades to visible text instead. Only caller mistakes
/// that can be found while wiring the engine up (registering experiments,
/// loading content, parsing configuration) surface as errors.
#[derive(Debug, Error)]
pub enum I18nError {
    /// An experiment with this key is already registered
    #[error("A/B test '{0}' is already registered")]
    DuplicateTest(String),

    /// An experiment was registered without any variants
    #[error("A/B test '{0}' has no variants")]
    EmptyVariants(String),

    /// The experiment's traffic split cannot be normalised
    #[error("Invalid distribution for A/B test '{key}': {reason}")]
    InvalidDistribution { key: String, reason: String },

    /// Content or configuration file could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content or configuration file is not valid JSON
    #[error("Failed to parse JSON from '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Content tree has an unusable shape
    #[error("Invalid translation store: {0}")]
    InvalidStore(String),

    /// Configuration value is out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// A gender or formality name that is not recognised
    #[error("Unknown {kind} '{value}'")]
    InvalidOption { kind: &'static str, value: String },
}

/// Result type for setup-time operations
pub type I18nResult<T> = Result<T, I18nError>;

/// A recovered problem on the translation path.
///
/// These never surface to the caller as errors. The facade reports each
/// one to usage analytics so broken content can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Key unresolved in every tier; the literal key was rendered
    MissingKey,
    /// Key unresolved; the caller-supplied fallback text was rendered
    FallbackText,
    /// Variant map has no entry for the selected plural category
    PluralCategoryMiss(PluralCategory),
    /// No requested dimension matched; the first variant was rendered
    ContextMiss,
    /// Variant map had no text entries; its raw form was rendered
    Unrenderable,
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degradation::MissingKey => write!(f, "missing key"),
            Degradation::FallbackText => write!(f, "fallback text used"),
            Degradation::PluralCategoryMiss(category) => {
                write!(f, "no variant for plural category '{}'", category)
            }
            Degradation::ContextMiss => write!(f, "no matching variant"),
            Degradation::Unrenderable => write!(f, "variant map without text"),
        }
    }
}
