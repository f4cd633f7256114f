use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{I18nError, I18nResult};
use crate::locale;
use crate::store::TranslationStore;

/// Load one locale's content tree from a JSON file
///
/// The JSON file should have the following structure:
/// ```json
/// {
///     "@metadata": { ... },
///     "nav": { "home": "Home" },
///     "search.results": { "one": "{count} stay", "other": "{count} stays" }
/// }
/// ```
///
/// # Errors
/// - File not found or unreadable
/// - Invalid JSON
/// - Root is not an object
pub fn load_store_from_file(path: &Path) -> I18nResult<TranslationStore> {
    let content = fs::read_to_string(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let json: Value = serde_json::from_str(&content).map_err(|source| I18nError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    TranslationStore::from_json(&json).map_err(|e| {
        I18nError::InvalidStore(format!("{} in '{}'", e, path.display()))
    })
}

/// Load every `*.json` file of a directory, keyed by normalised locale
///
/// The file stem is the locale: `en.json` → `"en"`, `pt_BR.json` → `"pt-br"`.
///
/// # Errors
/// - Directory not found or not a directory
/// - Any file read/parse error
pub fn load_all_stores_from_dir(dir: &Path) -> I18nResult<HashMap<String, TranslationStore>> {
    let not_a_dir = |reason: &str| I18nError::Io {
        path: dir.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, reason.to_string()),
    };
    if !dir.exists() {
        return Err(not_a_dir("directory not found"));
    }
    if !dir.is_dir() {
        return Err(not_a_dir("path is not a directory"));
    }

    let entries = fs::read_dir(dir).map_err(|source| I18nError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut stores = HashMap::new();
    for entry in entries {
        let path = entry
            .map_err(|source| I18nError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();

        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            warn!(path = %path.display(), "Skipping file with a non UTF-8 name");
            continue;
        };
        let locale = locale::normalize(stem);

        let store = load_store_from_file(&path)?;
        debug!(locale = %locale, entries = store.len(), "Loaded translations");
        stores.insert(locale, store);
    }

    if stores.is_empty() {
        warn!(dir = %dir.display(), "No JSON files found in directory");
    }

    Ok(stores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TranslationValue;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bazaar-i18n-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_directory() {
        let dir = scratch_dir("load");
        fs::write(dir.join("en.json"), r#"{"nav": {"home": "Home"}}"#).unwrap();
        fs::write(dir.join("pt_BR.json"), r#"{"nav.home": "Início"}"#).unwrap();
        fs::write(dir.join("notes.txt"), "not content").unwrap();

        let stores = load_all_stores_from_dir(&dir).unwrap();
        assert_eq!(stores.len(), 2);
        assert_eq!(
            stores["pt-br"].lookup("nav.home"),
            Some(TranslationValue::Scalar("Início".to_string()))
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = scratch_dir("invalid");
        let file = dir.join("fr.json");
        fs::write(&file, "{ not json").unwrap();

        match load_store_from_file(&file) {
            Err(I18nError::Json { path, .. }) => assert_eq!(path, file),
            other => panic!("expected JSON error, got {:?}", other),
        }
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory() {
        let result = load_all_stores_from_dir(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(I18nError::Io { .. })));
    }
}
