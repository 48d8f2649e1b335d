//! Language registry: Single source of truth for all supported UI languages.
//!
//! The list mirrors the locales available on the localization platform.
//! It uses a singleton pattern with `OnceLock` so every part of the shell
//! reads the same immutable table.

use std::sync::OnceLock;

/// Configuration for a supported UI language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Locale code as used by the localization platform (e.g., "en", "zh-CN", "pt-BR")
    pub code: &'static str,

    /// Display name shown in the language picker (e.g., "English", "简体中文")
    pub name: &'static str,
}

/// Global language registry singleton.
///
/// Initialized once on first access and immutable thereafter. Order is the
/// order the language picker presents.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its exact code.
    ///
    /// Codes are compared verbatim; "zh-cn" does not resolve to "zh-CN".
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all languages in picker order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }
}

fn lang(code: &'static str, name: &'static str) -> LanguageConfig {
    LanguageConfig { code, name }
}

/// Supported UI languages in picker order.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        lang("en", "English"),
        lang("ar", "العربية"),
        lang("ca", "Català"),
        lang("zh-CN", "简体中文"),
        lang("zh-TW", "繁體中文"),
        lang("cs", "Čeština"),
        lang("da", "Dansk"),
        lang("de", "Deutsch"),
        lang("nl", "Nederlands"),
        lang("fi", "Suomi"),
        lang("fil", "Filipino"),
        lang("fr", "Français"),
        lang("el", "Ελληνικά"),
        lang("hi", "हिंदी"),
        lang("hu", "Magyar"),
        lang("id", "Bahasa Indonesia"),
        lang("it", "Italiano"),
        lang("ja", "日本語"),
        lang("ko", "한국어"),
        lang("pt-BR", "Português (Brazil)"),
        lang("ro", "Română"),
        lang("ru", "Русский"),
        lang("sr", "Српски"),
        lang("es-ES", "Español"),
        lang("sv-SE", "Svenska"),
        lang("tr", "Türkçe"),
        lang("uk", "Українська"),
        lang("vi", "Tiếng Việt"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LanguageRegistry::get().get_by_code("en").unwrap();
        assert_eq!(config.code, "en");
        assert_eq!(config.name, "English");
    }

    #[test]
    fn test_get_by_code_region_code() {
        let config = LanguageRegistry::get().get_by_code("zh-CN").unwrap();
        assert_eq!(config.name, "简体中文");
    }

    #[test]
    fn test_get_by_code_is_case_sensitive() {
        assert!(LanguageRegistry::get().get_by_code("zh-cn").is_none());
        assert!(LanguageRegistry::get().get_by_code("EN").is_none());
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LanguageRegistry::get().get_by_code("xx").is_none());
        assert!(LanguageRegistry::get().get_by_code("").is_none());
    }

    #[test]
    fn test_codes_are_unique() {
        let all = LanguageRegistry::get().list_all();
        let codes: HashSet<_> = all.iter().map(|lang| lang.code).collect();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_list_all_starts_with_default() {
        let all = LanguageRegistry::get().list_all();
        assert_eq!(all[0].code, "en");
        assert!(all.len() > 1);
    }
}
