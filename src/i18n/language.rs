//! Language descriptor: a locale validated against the registry.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Serialize, Serializer};

/// A validated UI language.
///
/// Only codes present in the registry can be turned into a `Language`, so
/// holding one is proof that the locale is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    code: &'static str,
}

impl Language {
    /// The fallback language used when no preference is stored.
    pub const DEFAULT: Language = Language { code: "en" };

    /// Create a Language from a locale code.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is in the registry
    /// * `Err` if the code is unknown
    pub fn from_code(code: &str) -> Result<Language> {
        match Self::find(code) {
            Some(language) => Ok(language),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Look up a Language by code, `None` when the code is unknown.
    pub fn find(code: &str) -> Option<Language> {
        LanguageRegistry::get()
            .get_by_code(code)
            .map(|config| Language { code: config.code })
    }

    /// All supported languages in picker order.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .list_all()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    /// Locale code (e.g., "en", "zh-CN").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full registry entry for this language.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for values built through `find`, `from_code` or `DEFAULT`.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Display name for the language picker.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn is_default(&self) -> bool {
        *self == Language::DEFAULT
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::DEFAULT
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code)
    }
}

#[derive(Serialize)]
struct LanguageView {
    code: &'static str,
    language: &'static str,
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        LanguageView {
            code: self.code,
            language: self.name(),
        }
        .serialize(serializer)
    }
}
