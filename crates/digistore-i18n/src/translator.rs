//! Locale resolution with fallback to French.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::catalog::{LoadMode, Lookup, MessageCatalog};
use crate::error::I18nError;
use crate::language::Language;

/// Resolves dotted message keys to display text.
///
/// Resolution order: requested language, then [`Language::FALLBACK`], then
/// the key itself. Resolution never fails.
#[derive(Debug, Default)]
pub struct Translator {
    catalogs: HashMap<Language, MessageCatalog>,
    missing: Mutex<MissingKeys>,
}

#[derive(Debug, Default)]
struct MissingKeys {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the catalog for a language.
    pub fn with_catalog(mut self, language: Language, catalog: MessageCatalog) -> Self {
        self.catalogs.insert(language, catalog);
        self
    }

    /// Load `<code>.json` for every supported language from a directory.
    ///
    /// A missing file leaves that language on the fallback catalog.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, I18nError> {
        let dir = dir.as_ref();
        let mut translator = Self::new();

        for language in Language::ALL {
            let path = dir.join(format!("{}.json", language.code()));
            if !path.exists() {
                warn!(language = %language, path = %path.display(), "message catalog not found");
                continue;
            }
            let catalog = MessageCatalog::load_file(&path, LoadMode::Lenient)?;
            debug!(language = %language, messages = catalog.len(), "message catalog loaded");
            translator.catalogs.insert(language, catalog);
        }

        info!(languages = translator.catalogs.len(), "translations loaded");
        Ok(translator)
    }

    /// Catalog for a language, if loaded.
    pub fn catalog(&self, language: Language) -> Option<&MessageCatalog> {
        self.catalogs.get(&language)
    }

    /// Languages with a loaded catalog.
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.catalogs.keys().copied().collect();
        languages.sort();
        languages
    }

    /// Resolve a key for a language.
    pub fn resolve(&self, language: Language, key: &str) -> String {
        match self.lookup_text(language, key) {
            Some(text) => text.to_string(),
            None => {
                warn!(key, language = %language, "translation key not found");
                self.record_missing(key);
                key.to_string()
            }
        }
    }

    /// Resolve a key for a raw language code; unknown codes use the fallback.
    pub fn resolve_code(&self, code: &str, key: &str) -> String {
        let language = Language::from_code(code).unwrap_or_else(|| {
            warn!(code, "invalid language, falling back to {}", Language::FALLBACK);
            Language::FALLBACK
        });
        self.resolve(language, key)
    }

    /// Resolve a key and replace `{name}` placeholders.
    ///
    /// Placeholders without a matching parameter are left as-is.
    pub fn resolve_with(&self, language: Language, key: &str, params: &[(&str, &str)]) -> String {
        let mut text = self.resolve(language, key);
        for (name, value) in params {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }

    /// Resolve a plural form.
    ///
    /// `count == 0` tries `key.zero`, `count == 1` tries `key.one`, both then
    /// try `key.other`; any other count tries `key.other`. The bare key is
    /// the last resort.
    pub fn resolve_plural(&self, language: Language, key: &str, count: u64) -> String {
        let specific = match count {
            0 => Some("zero"),
            1 => Some("one"),
            _ => None,
        };

        let candidates = specific
            .into_iter()
            .chain(std::iter::once("other"))
            .map(|suffix| format!("{}.{}", key, suffix));

        for candidate in candidates {
            if let Some(text) = self.lookup_text(language, &candidate) {
                return text.replace("{count}", &count.to_string());
            }
        }
        self.resolve(language, key).replace("{count}", &count.to_string())
    }

    /// Keys that resolved to themselves, in first-seen order.
    pub fn missing_keys(&self) -> Vec<String> {
        match self.missing.lock() {
            Ok(missing) => missing.order.clone(),
            Err(poisoned) => poisoned.into_inner().order.clone(),
        }
    }

    /// Walk the requested catalog, then the fallback, without recording misses.
    fn lookup_text(&self, language: Language, key: &str) -> Option<&str> {
        let primary = match self.catalogs.get(&language) {
            Some(catalog) => Some(catalog),
            None => {
                warn!(language = %language, "no catalog for language, falling back to {}", Language::FALLBACK);
                None
            }
        };

        if let Some(catalog) = primary {
            match catalog.lookup(key) {
                Lookup::Text(text) => return Some(text),
                Lookup::Group => {
                    debug!(key, language = %language, "key names a group, not a message");
                    return None;
                }
                Lookup::Missing => {}
            }
        }

        match self.catalogs.get(&Language::FALLBACK)?.lookup(key) {
            Lookup::Text(text) => Some(text),
            _ => None,
        }
    }

    fn record_missing(&self, key: &str) {
        if key.is_empty() {
            return;
        }
        let mut missing = match self.missing.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if missing.seen.insert(key.to_string()) {
            missing.order.push(key.to_string());
        }
    }
}
