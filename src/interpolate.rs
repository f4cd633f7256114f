use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::options::TranslationOptions;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Replace every `{name}` token with the matching option value.
///
/// Tokens without a matching option are left verbatim so the gap stays
/// visible in the rendered text. Substituted values are not scanned again.
///
/// ```
/// use bazaar_i18n::TranslationOptions;
/// use bazaar_i18n::interpolate::interpolate;
///
/// let options = TranslationOptions::new().with_var("city", "Lisbon");
/// assert_eq!(interpolate("Stays in {city} from {price}", &options), "Stays in Lisbon from {price}");
/// ```
pub fn interpolate(template: &str, options: &TranslationOptions) -> String {
    if !template.contains('{') {
        return template.to_string();
    }
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            options
                .value_for(&caps[1])
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Names of the placeholders used in a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}
