//! Language selection and translation loading.
//!
//! The bootstrapper owns the locale context of one shell instance: which
//! language is selected, which language the loaded strings belong to, and
//! the strings themselves. The context is published through a
//! `tokio::sync::watch` channel so any number of consumers can read the
//! latest value or wait for the next change.
//!
//! Every selection change bumps a generation counter and spawns one fetch.
//! In-flight fetches are never cancelled; a fetch whose generation is no
//! longer current settles silently and its result is dropped.

use crate::config::Config;
use crate::crowdin::{TranslationEntry, TranslationSource};
use crate::i18n::{Language, TranslationMetrics};
use crate::preferences::{PreferenceStore, LANGUAGE_KEY};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Placeholder element of the legacy sequence when no strings are available.
pub const ERROR_SENTINEL: &str = "error";

/// Parameters of every translations request except the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationQuery {
    pub project_id: u64,
    pub file_id: u64,
    pub limit: u32,
}

impl TranslationQuery {
    pub fn from_config(config: &Config) -> Self {
        Self {
            project_id: config.crowdin_project_id,
            file_id: config.crowdin_file_id,
            limit: config.translations_page_limit,
        }
    }
}

/// Outcome of the latest settled fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranslationSet {
    /// No fetch has settled yet
    NotLoaded,
    Loaded { entries: Vec<TranslationEntry> },
    /// The platform answered but has nothing for the language
    Empty,
    Failed { cause: String },
}

impl TranslationSet {
    pub fn entries(&self) -> &[TranslationEntry] {
        match self {
            TranslationSet::Loaded { entries } => entries.as_slice(),
            _ => &[],
        }
    }

    /// True for both `Empty` and `Failed`.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TranslationSet::Empty | TranslationSet::Failed { .. })
    }

    /// Flat sequence older front ends consume: the entries when loaded,
    /// `["error"]` when empty or failed, `[]` before the first fetch.
    pub fn legacy_sequence(&self) -> serde_json::Value {
        match self {
            TranslationSet::NotLoaded => serde_json::Value::Array(Vec::new()),
            TranslationSet::Loaded { entries } => {
                serde_json::to_value(entries).unwrap_or_else(|_| serde_json::json!([ERROR_SENTINEL]))
            }
            TranslationSet::Empty | TranslationSet::Failed { .. } => {
                serde_json::json!([ERROR_SENTINEL])
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    /// Initialized, no fetch started
    Selecting,
    Fetching,
    Settled,
}

/// The ambient locale context.
#[derive(Debug, Clone, Serialize)]
pub struct LocaleState {
    pub phase: Phase,
    pub selected: Option<Language>,
    /// Language of the last successfully settled fetch; may lag `selected`
    pub translated: Option<Language>,
    pub translations: TranslationSet,
    pub generation: u64,
    pub settled_at: Option<DateTime<Utc>>,
}

impl Default for LocaleState {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
            selected: None,
            translated: None,
            translations: TranslationSet::NotLoaded,
            generation: 0,
            settled_at: None,
        }
    }
}

pub struct LanguageBootstrapper {
    source: Arc<dyn TranslationSource>,
    preferences: Arc<dyn PreferenceStore>,
    query: TranslationQuery,
    state: watch::Sender<LocaleState>,
    initialized: AtomicBool,
    /// Generation of the last selection written to the store
    persisted_generation: Mutex<u64>,
}

impl LanguageBootstrapper {
    pub fn new(
        source: Arc<dyn TranslationSource>,
        preferences: Arc<dyn PreferenceStore>,
        query: TranslationQuery,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(LocaleState::default());
        Arc::new(Self {
            source,
            preferences,
            query,
            state,
            initialized: AtomicBool::new(false),
            persisted_generation: Mutex::new(0),
        })
    }

    /// Current value of the locale context.
    pub fn snapshot(&self) -> LocaleState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every change to the locale context.
    pub fn subscribe(&self) -> watch::Receiver<LocaleState> {
        self.state.subscribe()
    }

    /// Pick the initial language from the persisted preference.
    ///
    /// No stored code selects the default language. A stored code that the
    /// registry does not know leaves the selection empty and starts no fetch.
    /// Only the first call does anything; it returns the handle of the fetch
    /// it started, if any.
    pub fn initialize(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("Language bootstrapper already initialized");
            return None;
        }

        let stored = match self.preferences.get(LANGUAGE_KEY) {
            Ok(code) => code.filter(|c| !c.is_empty()),
            Err(e) => {
                warn!("Failed to read stored language preference: {:#}", e);
                None
            }
        };

        let initial = match stored {
            None => Some(Language::DEFAULT),
            Some(code) => {
                let language = Language::find(&code);
                if language.is_none() {
                    warn!("Stored language code {:?} is not supported, no language selected", code);
                }
                language
            }
        };

        match initial {
            Some(language) => {
                info!("Initial language: {}", language);
                Some(self.start_fetch(language))
            }
            None => {
                self.state.send_modify(|s| s.phase = Phase::Selecting);
                None
            }
        }
    }

    /// Change the selected language and persist the choice.
    ///
    /// Re-selecting the current language changes nothing and starts no
    /// fetch. Otherwise one task is spawned that saves the code and then
    /// fetches; earlier in-flight fetches keep running but can no longer
    /// update the context.
    pub fn select_language(self: &Arc<Self>, language: Language) -> Option<JoinHandle<()>> {
        // an explicit choice wins over a later initialize()
        self.initialized.store(true, Ordering::SeqCst);

        let mut generation = 0;
        let changed = self.state.send_if_modified(|s| {
            if s.selected == Some(language) {
                generation = s.generation;
                return false;
            }
            Self::begin_fetch(s, language);
            generation = s.generation;
            true
        });

        let this = Arc::clone(self);
        if !changed {
            debug!("Language {} already selected", language);
            tokio::spawn(async move {
                this.persist_selection(language, generation).await;
            });
            return None;
        }

        info!("Language selected: {}", language);
        Some(tokio::spawn(async move {
            this.persist_selection(language, generation).await;
            this.fetch_translations(language, generation).await;
        }))
    }

    fn begin_fetch(state: &mut LocaleState, language: Language) {
        state.generation += 1;
        state.selected = Some(language);
        state.phase = Phase::Fetching;
    }

    fn start_fetch(self: &Arc<Self>, language: Language) -> JoinHandle<()> {
        let mut generation = 0;
        self.state.send_modify(|s| {
            Self::begin_fetch(s, language);
            generation = s.generation;
        });

        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.fetch_translations(language, generation).await;
        })
    }

    /// Save the code of the selection made at `generation`.
    ///
    /// Runs on the blocking pool. A save older than the last written one is
    /// skipped, so the store always ends up holding the latest selection.
    async fn persist_selection(self: &Arc<Self>, language: Language, generation: u64) {
        let this = Arc::clone(self);
        let saved = tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
            let mut last = this
                .persisted_generation
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if generation < *last {
                return Ok(false);
            }
            this.preferences.set(LANGUAGE_KEY, language.code())?;
            *last = generation;
            Ok(true)
        })
        .await;

        match saved {
            Ok(Ok(true)) => debug!("Persisted language preference {}", language.code()),
            Ok(Ok(false)) => debug!(
                "Skipped persisting {} from generation {}, a newer selection was saved",
                language.code(),
                generation
            ),
            Ok(Err(e)) => warn!(
                "Failed to persist language preference {}: {:#}",
                language.code(),
                e
            ),
            Err(e) => warn!("Language preference task failed: {}", e),
        }
    }

    /// Fetch the strings for `language` and settle them into the context.
    ///
    /// The result is applied only while `generation` is still the current
    /// one; returns whether it was. Errors are recorded in the context and
    /// logged, never returned.
    pub async fn fetch_translations(&self, language: Language, generation: u64) -> bool {
        let metrics = TranslationMetrics::global();
        metrics.record_fetch();

        debug!(
            "Fetching translations for {} (generation {}, file {}, limit {})",
            language.code(),
            generation,
            self.query.file_id,
            self.query.limit
        );

        let result = self
            .source
            .list_language_translations(
                self.query.project_id,
                language.code(),
                self.query.file_id,
                self.query.limit,
            )
            .await;

        let (translations, succeeded) = match result {
            Ok(entries) if entries.is_empty() => {
                warn!("No translations available for {}", language);
                metrics.record_empty();
                (TranslationSet::Empty, true)
            }
            Ok(entries) => {
                info!("Loaded {} translations for {}", entries.len(), language);
                metrics.record_loaded();
                (TranslationSet::Loaded { entries }, true)
            }
            Err(e) => {
                error!("Failed to fetch translations for {}: {}", language, e);
                metrics.record_failure();
                (TranslationSet::Failed { cause: e.to_string() }, false)
            }
        };

        self.state.send_if_modified(|s| {
            if s.generation != generation {
                debug!(
                    "Dropping translations for {} from generation {}, current is {}",
                    language.code(),
                    generation,
                    s.generation
                );
                metrics.record_stale();
                return false;
            }

            s.translations = translations;
            if succeeded {
                s.translated = Some(language);
            }
            s.phase = Phase::Settled;
            s.settled_at = Some(Utc::now());
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crowdin::CrowdinError;
    use crate::preferences::MemoryPreferences;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Source answering from a fixed table; a language with a gate waits
    /// until the gate is opened.
    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<HashMap<&'static str, Result<Vec<TranslationEntry>, u16>>>,
        gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
        calls: Mutex<Vec<(u64, String, u64, u32)>>,
    }

    impl ScriptedSource {
        fn respond(self, code: &'static str, response: Result<Vec<TranslationEntry>, u16>) -> Self {
            self.responses.lock().unwrap().insert(code, response);
            self
        }

        fn gate(&self, code: &'static str) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            self.gates.lock().unwrap().insert(code, Arc::clone(&notify));
            notify
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|c| c.1.clone()).collect()
        }
    }

    #[async_trait::async_trait]
    impl TranslationSource for ScriptedSource {
        async fn list_language_translations(
            &self,
            project_id: u64,
            language_id: &str,
            file_id: u64,
            limit: u32,
        ) -> Result<Vec<TranslationEntry>, CrowdinError> {
            self.calls
                .lock()
                .unwrap()
                .push((project_id, language_id.to_string(), file_id, limit));

            let gate = self.gates.lock().unwrap().get(language_id).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            let response = self.responses.lock().unwrap().get(language_id).cloned();
            match response {
                Some(Ok(entries)) => Ok(entries),
                Some(Err(status)) => Err(CrowdinError::Api {
                    status,
                    body: "scripted failure".to_string(),
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    const QUERY: TranslationQuery = TranslationQuery {
        project_id: 415522,
        file_id: 6,
        limit: 200,
    };

    fn entries(texts: &[&str]) -> Vec<TranslationEntry> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| TranslationEntry::text(i as u64 + 1, text))
            .collect()
    }

    fn lang(code: &str) -> Language {
        Language::from_code(code).unwrap()
    }

    fn bootstrapper(
        source: Arc<ScriptedSource>,
        preferences: MemoryPreferences,
    ) -> Arc<LanguageBootstrapper> {
        LanguageBootstrapper::new(source, Arc::new(preferences), QUERY)
    }

    /// Store whose reads always fail.
    struct UnreadablePreferences;

    impl PreferenceStore for UnreadablePreferences {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("disk unavailable")
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// Store that takes a while to write one particular value.
    struct SlowPreferences {
        inner: MemoryPreferences,
        slow_value: &'static str,
    }

    impl PreferenceStore for SlowPreferences {
        fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            if value == self.slow_value {
                std::thread::sleep(Duration::from_millis(300));
            }
            self.inner.set(key, value)
        }
    }

    // ==================== initialize ====================

    #[tokio::test]
    #[serial]
    async fn test_initialize_without_preference_selects_default() {
        let source = Arc::new(ScriptedSource::default().respond("en", Ok(entries(&["Swap"]))));
        let shell = bootstrapper(Arc::clone(&source), MemoryPreferences::new());

        assert_eq!(shell.snapshot().phase, Phase::Uninitialized);

        shell.initialize().expect("Should start a fetch").await.unwrap();

        let state = shell.snapshot();
        assert_eq!(state.selected, Some(Language::DEFAULT));
        assert_eq!(state.translated, Some(Language::DEFAULT));
        assert_eq!(state.phase, Phase::Settled);
        assert_eq!(source.calls(), vec!["en".to_string()]);
    }

    #[tokio::test]
    #[serial]
    async fn test_initialize_with_known_preference() {
        let source = Arc::new(ScriptedSource::default().respond("ja", Ok(entries(&["スワップ"]))));
        let shell = bootstrapper(
            Arc::clone(&source),
            MemoryPreferences::with(LANGUAGE_KEY, "ja"),
        );

        shell.initialize().unwrap().await.unwrap();

        assert_eq!(shell.snapshot().selected, Some(lang("ja")));
        assert_eq!(source.calls(), vec!["ja".to_string()]);
    }

    #[tokio::test]
    #[serial]
    async fn test_initialize_with_unknown_preference_selects_nothing() {
        let source = Arc::new(ScriptedSource::default());
        let shell = bootstrapper(
            Arc::clone(&source),
            MemoryPreferences::with(LANGUAGE_KEY, "tlh"),
        );

        assert!(shell.initialize().is_none());

        let state = shell.snapshot();
        assert_eq!(state.selected, None);
        assert_eq!(state.translated, None);
        assert_eq!(state.phase, Phase::Selecting);
        assert_eq!(state.translations, TranslationSet::NotLoaded);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_initialize_with_empty_preference_selects_default() {
        let source = Arc::new(ScriptedSource::default());
        let shell = bootstrapper(Arc::clone(&source), MemoryPreferences::with(LANGUAGE_KEY, ""));

        shell.initialize().unwrap().await.unwrap();

        assert_eq!(shell.snapshot().selected, Some(Language::DEFAULT));
    }

    #[tokio::test]
    #[serial]
    async fn test_initialize_with_unreadable_preference_selects_default() {
        let source = Arc::new(ScriptedSource::default().respond("en", Ok(entries(&["Swap"]))));
        let shell = LanguageBootstrapper::new(
            Arc::clone(&source) as Arc<dyn TranslationSource>,
            Arc::new(UnreadablePreferences),
            QUERY,
        );

        shell.initialize().unwrap().await.unwrap();

        let state = shell.snapshot();
        assert_eq!(state.selected, Some(Language::DEFAULT));
        assert_eq!(state.translated, Some(Language::DEFAULT));
        assert_eq!(source.calls(), vec!["en".to_string()]);
    }

    #[tokio::test]
    #[serial]
    async fn test_initialize_runs_once() {
        let source = Arc::new(ScriptedSource::default().respond("en", Ok(entries(&["Swap"]))));
        let shell = bootstrapper(Arc::clone(&source), MemoryPreferences::new());

        shell.initialize().unwrap().await.unwrap();
        assert!(shell.initialize().is_none());

        assert_eq!(source.calls().len(), 1);
        assert_eq!(shell.snapshot().generation, 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_uses_configured_query() {
        let source = Arc::new(ScriptedSource::default());
        let shell = bootstrapper(Arc::clone(&source), MemoryPreferences::new());

        shell.initialize().unwrap().await.unwrap();

        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(415522, "en".to_string(), 6, 200)]);
    }

    // ==================== fetch outcomes ====================

    #[tokio::test]
    #[serial]
    async fn test_fetch_with_entries_loads_them_verbatim() {
        let loaded = entries(&["Échanger", "Liquidité"]);
        let source = Arc::new(ScriptedSource::default().respond("fr", Ok(loaded.clone())));
        let shell = bootstrapper(source, MemoryPreferences::new());

        shell.select_language(lang("fr")).unwrap().await.unwrap();

        let state = shell.snapshot();
        assert_eq!(state.translations, TranslationSet::Loaded { entries: loaded.clone() });
        assert_eq!(state.translations.entries(), loaded.as_slice());
        assert_eq!(state.translated, Some(lang("fr")));
        assert!(state.settled_at.is_some());
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_with_no_entries_is_empty() {
        let source = Arc::new(ScriptedSource::default().respond("vi", Ok(Vec::new())));
        let shell = bootstrapper(source, MemoryPreferences::new());

        shell.select_language(lang("vi")).unwrap().await.unwrap();

        let state = shell.snapshot();
        assert_eq!(state.translations, TranslationSet::Empty);
        assert_eq!(state.translations.legacy_sequence(), serde_json::json!(["error"]));
        assert_eq!(state.translated, Some(lang("vi")));
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_failure_keeps_previous_translated_language() {
        let source = Arc::new(
            ScriptedSource::default()
                .respond("en", Ok(entries(&["Swap"])))
                .respond("de", Err(503)),
        );
        let shell = bootstrapper(source, MemoryPreferences::new());

        shell.initialize().unwrap().await.unwrap();
        shell.select_language(lang("de")).unwrap().await.unwrap();

        let state = shell.snapshot();
        assert_eq!(state.selected, Some(lang("de")));
        assert_eq!(state.translated, Some(Language::DEFAULT));
        assert!(state.translations.is_unavailable());
        assert_eq!(state.translations.legacy_sequence(), serde_json::json!(["error"]));
        match state.translations {
            TranslationSet::Failed { cause } => assert!(cause.contains("503")),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_failure_before_any_success_leaves_translated_unset() {
        let source = Arc::new(ScriptedSource::default().respond("en", Err(500)));
        let shell = bootstrapper(source, MemoryPreferences::new());

        shell.initialize().unwrap().await.unwrap();

        let state = shell.snapshot();
        assert_eq!(state.translated, None);
        assert_eq!(state.phase, Phase::Settled);
    }

    // ==================== selection changes ====================

    #[tokio::test]
    #[serial]
    async fn test_select_persists_code() {
        let preferences = Arc::new(MemoryPreferences::new());
        let shell = LanguageBootstrapper::new(
            Arc::new(ScriptedSource::default()),
            Arc::clone(&preferences) as Arc<dyn PreferenceStore>,
            QUERY,
        );

        shell.select_language(lang("ko")).unwrap().await.unwrap();

        assert_eq!(preferences.get(LANGUAGE_KEY).unwrap().as_deref(), Some("ko"));
    }

    #[tokio::test]
    #[serial]
    async fn test_select_same_language_starts_no_fetch() {
        let source = Arc::new(ScriptedSource::default());
        let shell = bootstrapper(Arc::clone(&source), MemoryPreferences::new());

        shell.select_language(lang("it")).unwrap().await.unwrap();
        assert!(shell.select_language(lang("it")).is_none());

        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[serial]
    async fn test_concurrent_selections_persist_the_latest() {
        let preferences = Arc::new(SlowPreferences {
            inner: MemoryPreferences::new(),
            slow_value: "fr",
        });
        let shell = LanguageBootstrapper::new(
            Arc::new(ScriptedSource::default()),
            Arc::clone(&preferences) as Arc<dyn PreferenceStore>,
            QUERY,
        );

        let first = shell.select_language(lang("fr")).unwrap();
        let second = shell.select_language(lang("de")).unwrap();
        first.await.unwrap();
        second.await.unwrap();

        let selected = shell.snapshot().selected.unwrap();
        assert_eq!(selected, lang("de"));
        assert_eq!(
            preferences.get(LANGUAGE_KEY).unwrap().as_deref(),
            Some(selected.code())
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_select_same_language_still_persists() {
        let preferences = Arc::new(MemoryPreferences::new());
        let shell = LanguageBootstrapper::new(
            Arc::new(ScriptedSource::default()),
            Arc::clone(&preferences) as Arc<dyn PreferenceStore>,
            QUERY,
        );
        shell.initialize().unwrap().await.unwrap();
        assert_eq!(preferences.get(LANGUAGE_KEY).unwrap(), None);

        assert!(shell.select_language(Language::DEFAULT).is_none());

        tokio::time::timeout(Duration::from_secs(5), async {
            while preferences.get(LANGUAGE_KEY).unwrap().is_none() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(preferences.get(LANGUAGE_KEY).unwrap().as_deref(), Some("en"));
    }

    #[tokio::test]
    #[serial]
    async fn test_stale_result_is_not_observable() {
        let source = Arc::new(
            ScriptedSource::default()
                .respond("fr", Ok(entries(&["Échanger"])))
                .respond("de", Ok(entries(&["Tauschen"]))),
        );
        let fr_gate = source.gate("fr");
        let shell = bootstrapper(Arc::clone(&source), MemoryPreferences::new());

        let slow = shell.select_language(lang("fr")).unwrap();
        let fast = shell.select_language(lang("de")).unwrap();
        fast.await.unwrap();

        let state = shell.snapshot();
        assert_eq!(state.generation, 2);
        assert_eq!(state.translated, Some(lang("de")));

        // the superseded fetch finishes last and must not win
        fr_gate.notify_one();
        slow.await.unwrap();

        let state = shell.snapshot();
        assert_eq!(state.selected, Some(lang("de")));
        assert_eq!(state.translated, Some(lang("de")));
        assert_eq!(state.translations.entries()[0].text.as_deref(), Some("Tauschen"));
        let mut calls = source.calls();
        calls.sort();
        assert_eq!(calls, vec!["de".to_string(), "fr".to_string()]);
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_translations_reports_stale_generation() {
        let shell = bootstrapper(Arc::new(ScriptedSource::default()), MemoryPreferences::new());

        shell.select_language(lang("fr")).unwrap().await.unwrap();

        assert!(!shell.fetch_translations(lang("fr"), 0).await);
        assert!(shell.fetch_translations(lang("fr"), 1).await);
    }

    #[tokio::test]
    #[serial]
    async fn test_subscriber_sees_fetching_then_settled() {
        let source = Arc::new(ScriptedSource::default().respond("es-ES", Ok(entries(&["Cambiar"]))));
        let gate = source.gate("es-ES");
        let shell = bootstrapper(source, MemoryPreferences::new());
        let mut context = shell.subscribe();

        let handle = shell.select_language(lang("es-ES")).unwrap();
        context.changed().await.unwrap();
        assert_eq!(context.borrow_and_update().phase, Phase::Fetching);

        gate.notify_one();
        context.changed().await.unwrap();
        let state = context.borrow_and_update().clone();
        assert_eq!(state.phase, Phase::Settled);
        assert_eq!(state.translated, Some(lang("es-ES")));

        handle.await.unwrap();
    }

    // ==================== TranslationSet ====================

    #[test]
    fn test_legacy_sequence_variants() {
        assert_eq!(TranslationSet::NotLoaded.legacy_sequence(), serde_json::json!([]));
        assert_eq!(
            TranslationSet::Failed { cause: "x".into() }.legacy_sequence(),
            serde_json::json!(["error"])
        );

        let loaded = TranslationSet::Loaded { entries: entries(&["Pool"]) };
        assert_eq!(loaded.legacy_sequence()[0]["text"], "Pool");
        assert!(!loaded.is_unavailable());
    }

    #[test]
    fn test_translation_set_serializes_tagged() {
        let json = serde_json::to_value(TranslationSet::Failed { cause: "timeout".into() }).unwrap();
        assert_eq!(json, serde_json::json!({"status": "failed", "cause": "timeout"}));

        let json = serde_json::to_value(TranslationSet::Empty).unwrap();
        assert_eq!(json, serde_json::json!({"status": "empty"}));
    }
}
