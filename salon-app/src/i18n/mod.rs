//! Translations
//!
//! Catalogs are embedded JSON documents (nested objects, string leaves),
//! flattened to dotted keys at load time. The store is read-only after
//! construction; pages get a cheap [`Translator`] handle bound to a locale.
//!
//! Lookup falls back from the requested locale to English and then to the
//! key itself. `{{name}}` placeholders are substituted from the supplied
//! arguments; placeholders without an argument are left as written.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::AppResult;

const EN_JSON: &str = include_str!("en.json");
const AR_JSON: &str = include_str!("ar.json");

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ar];

    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    /// Parse a locale tag, tolerant of case and region (`ar-SY`, `en_US`)
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next().unwrap_or("") {
            "en" => Some(Locale::En),
            "ar" => Some(Locale::Ar),
            _ => None,
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Locale::Ar)
    }

    /// Text direction attribute
    pub fn dir(self) -> &'static str {
        if self.is_rtl() { "rtl" } else { "ltr" }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Catalog = HashMap<String, String>;

/// All catalogs, keyed by locale
#[derive(Debug, Default)]
pub struct TranslationStore {
    catalogs: HashMap<Locale, Catalog>,
}

impl TranslationStore {
    /// Catalogs bundled with the binary
    pub fn embedded() -> AppResult<Self> {
        Self::from_json(&[(Locale::En, EN_JSON), (Locale::Ar, AR_JSON)])
    }

    pub fn from_json(sources: &[(Locale, &str)]) -> AppResult<Self> {
        let mut catalogs = HashMap::new();
        for (locale, source) in sources {
            let document: Value = serde_json::from_str(source)?;
            let mut catalog = Catalog::new();
            flatten("", &document, &mut catalog);
            tracing::debug!(locale = %locale, keys = catalog.len(), "Loaded translations");
            catalogs.insert(*locale, catalog);
        }
        Ok(Self { catalogs })
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        self.catalogs
            .get(&locale)
            .and_then(|catalog| catalog.get(key))
            .map(String::as_str)
    }

    /// Template for `key`: requested locale, then English, then the key
    pub fn template<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.lookup(locale, key)
            .or_else(|| self.lookup(Locale::En, key))
            .unwrap_or(key)
    }

    pub fn contains(&self, locale: Locale, key: &str) -> bool {
        self.lookup(locale, key).is_some()
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut Catalog) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        Value::Null | Value::Array(_) => {}
    }
}

/// Substitute `{{name}}` placeholders (inner whitespace ignored)
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after[..end].trim();
        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Locale-bound handle over the shared store
#[derive(Debug, Clone)]
pub struct Translator {
    store: Arc<TranslationStore>,
    locale: Locale,
}

impl Translator {
    pub fn new(store: Arc<TranslationStore>, locale: Locale) -> Self {
        Self { store, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn with_locale(&self, locale: Locale) -> Self {
        Self {
            store: self.store.clone(),
            locale,
        }
    }

    pub fn t(&self, key: &str) -> String {
        self.store.template(self.locale, key).to_string()
    }

    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(self.store.template(self.locale, key), args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator(locale: Locale) -> Translator {
        let store = TranslationStore::from_json(&[
            (
                Locale::En,
                r#"{"common": {"pagination": "Page {{currentPage}} of {{totalPages}}", "only_en": "English"}}"#,
            ),
            (Locale::Ar, r#"{"common": {"pagination": "صفحة {{currentPage}} من {{totalPages}}"}}"#),
        ])
        .unwrap();
        Translator::new(Arc::new(store), locale)
    }

    #[test]
    fn test_lookup_falls_back_to_english_then_key() {
        let t = translator(Locale::Ar);
        assert_eq!(t.t("common.only_en"), "English");
        assert_eq!(t.t("common.missing"), "common.missing");
        assert!(t.locale().is_rtl());
    }

    #[test]
    fn test_interpolation() {
        let t = translator(Locale::En);
        assert_eq!(
            t.t_with("common.pagination", &[("currentPage", "2"), ("totalPages", "5")]),
            "Page 2 of 5"
        );
        assert_eq!(
            t.t_with("common.pagination", &[("currentPage", "2")]),
            "Page 2 of {{totalPages}}"
        );
        assert_eq!(interpolate("{{ name }}!", &[("name", "Sam")]), "Sam!");
        assert_eq!(interpolate("broken {{name", &[("name", "Sam")]), "broken {{name");
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!(Locale::parse("ar-SY"), Some(Locale::Ar));
        assert_eq!(Locale::parse("EN_us"), Some(Locale::En));
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::Ar.dir(), "rtl");
    }

    #[test]
    fn test_embedded_catalogs() {
        let store = TranslationStore::embedded().unwrap();
        let en = Translator::new(Arc::new(store), Locale::En);
        assert_eq!(
            en.t_with("admin.forms.product.notifications.add_success", &[("name", "Pomade")]),
            "Product \"Pomade\" added successfully!"
        );
        let ar = en.with_locale(Locale::Ar);
        assert_ne!(ar.t("navigation.home"), en.t("navigation.home"));
    }
}
