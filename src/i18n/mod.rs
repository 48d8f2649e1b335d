//! Internationalization (i18n) module.
//!
//! - `registry`: single source of truth for the supported UI languages
//! - `language`: validated `Language` descriptor built from the registry
//! - `metrics`: counters for translation fetches
//!
//! # Example
//!
//! ```rust,ignore
//! use swap_shell::i18n::Language;
//!
//! let fallback = Language::DEFAULT;
//! let japanese = Language::from_code("ja")?;
//! let picker = Language::all();
//! ```

mod language;
mod metrics;
mod registry;

pub use language::Language;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
