//! In-memory translation model with locale aliasing and three-tier lookup.

use std::collections::BTreeMap;

use thiserror::Error;

use super::cultures::{
    self,
    Culture,
};
use super::property::{
    ClassMap,
    PropertyMap,
    TranslationProperty,
};
use crate::host::translator::{
    MachineTranslator,
    TranslateFailure,
};
use crate::text::macros;

/// Reserved language used as the last fallback tier.
pub const NEUTRAL_LANGUAGE: &str = "Neutral";

/// Locale aliases of the canonical source language, in priority order.
pub const ENGLISH_LOCALES: [&str; 3] = ["en", "en-US", "en-GB"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No English translation found: create a language with locale en, en-US or en-GB")]
    MissingEnglishTier,

    #[error("Language '{0}' already exists")]
    LanguageExists(String),
}

/// Languages → classes → properties, plus the directives collected while loading.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    /// Language name → classes. Language names are the primary keys.
    languages: BTreeMap<String, ClassMap>,
    /// Locale code → language name.
    locales: BTreeMap<String, String>,
    /// Declared `using`/`imports` namespaces, in declaration order.
    code_usings: Vec<String>,
    /// Declared `module`/`dll` references, in declaration order.
    code_modules: Vec<String>,
    /// Classes declared with `static`.
    static_classes: Vec<String>,
    /// Explicitly selected language.
    current_language: Option<String>,
    /// Locale of the running session, used when no language was selected.
    ui_locale: Option<String>,

    pub log_file_name: Option<String>,
    pub debug_file_name: Option<String>,
    pub framework_version: Option<String>,
    pub template_file_name: Option<String>,
}

/// Appends `item` unless it is blank or already present.
fn push_unique(items: &mut Vec<String>, item: &str) {
    let item = item.trim();
    if !item.is_empty() && !items.iter().any(|known| known == item) {
        items.push(item.to_string());
    }
}

impl TranslationStore {
    /// Creates an empty store without any locale alias.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose locale aliases are seeded from the culture table.
    #[must_use]
    pub fn with_default_locales() -> Self {
        let mut store = Self::new();
        store.init();
        store
    }

    /// Removes every language and seeds the locale aliases.
    ///
    /// Each neutral code maps to its English language name (`pl` → `Polish`), each
    /// regional code to the name of its neutral prefix (`pl-PL` → `Polish`).
    pub fn init(&mut self) {
        self.languages.clear();
        for culture in cultures::CULTURES {
            self.locales.insert(culture.code.to_string(), culture.english_name.to_string());
        }
        for code in cultures::REGIONAL_CODES {
            let prefix = cultures::primary_subtag(code);
            if let Some(language) = self.locales.get(prefix).cloned() {
                self.locales.insert((*code).to_string(), language);
            }
        }
        tracing::debug!("Seeded {} locale aliases", self.locales.len());
    }

    /// Empties languages, locales, directives and the selected language.
    pub fn clear_all(&mut self) {
        self.languages.clear();
        self.locales.clear();
        self.code_usings.clear();
        self.code_modules.clear();
        self.static_classes.clear();
        self.current_language = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Language names, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Classes of a language (name or locale).
    #[must_use]
    pub fn classes(&self, language: &str) -> Option<&ClassMap> {
        self.resolve_language(language).and_then(|name| self.languages.get(name))
    }

    /// Aliases `locale` to `language`.
    pub fn set_locale(&mut self, locale: &str, language: &str) {
        let locale = locale.trim();
        if !locale.is_empty() {
            self.locales.insert(locale.to_string(), language.to_string());
        }
    }

    /// All known locale codes, sorted.
    pub fn all_locales(&self) -> impl Iterator<Item = (&str, &str)> {
        self.locales.iter().map(|(locale, language)| (locale.as_str(), language.as_str()))
    }

    /// Locale codes aliasing `language`, compared case-insensitively.
    #[must_use]
    pub fn locales_for(&self, language: &str) -> Vec<&str> {
        let language = language.trim().to_lowercase();
        self.locales
            .iter()
            .filter(|(_, target)| target.to_lowercase() == language)
            .map(|(locale, _)| locale.as_str())
            .collect()
    }

    pub fn add_code_using(&mut self, namespace: &str) {
        push_unique(&mut self.code_usings, namespace);
    }

    pub fn add_code_module(&mut self, module: &str) {
        push_unique(&mut self.code_modules, module);
    }

    pub fn add_static_class(&mut self, class_name: &str) {
        push_unique(&mut self.static_classes, class_name);
    }

    #[must_use]
    pub fn code_usings(&self) -> &[String] {
        &self.code_usings
    }

    #[must_use]
    pub fn code_modules(&self) -> &[String] {
        &self.code_modules
    }

    #[must_use]
    pub fn static_classes(&self) -> &[String] {
        &self.static_classes
    }

    #[must_use]
    pub fn is_static_class(&self, class_name: &str) -> bool {
        self.static_classes.iter().any(|known| known == class_name)
    }

    /// Returns the primary key for a language name or locale alias, if it is stored.
    #[must_use]
    pub fn resolve_language(&self, language: &str) -> Option<&str> {
        let language = language.trim();
        if let Some((name, _)) = self.languages.get_key_value(language) {
            return Some(name);
        }
        self.locales
            .get(language)
            .and_then(|target| self.languages.get_key_value(target))
            .map(|(name, _)| name.as_str())
    }

    /// Like [`Self::resolve_language`], but returns the input when nothing resolves.
    #[must_use]
    pub fn find_language(&self, language: &str) -> String {
        self.resolve_language(language).unwrap_or(language).to_string()
    }

    /// True if `language` is stored, directly or through a locale alias.
    #[must_use]
    pub fn exists(&self, language: &str) -> bool {
        self.resolve_language(language).is_some()
    }

    #[must_use]
    pub fn exists_class(&self, language: &str, class_name: &str) -> bool {
        self.classes(language).is_some_and(|classes| classes.contains_key(class_name))
    }

    #[must_use]
    pub fn exists_property(&self, language: &str, class_name: &str, property_name: &str) -> bool {
        self.lookup(language, class_name, property_name).is_some()
    }

    /// The canonical source language: the first of `en`, `en-US`, `en-GB` that resolves.
    pub fn english_language(&self) -> Result<&str, StoreError> {
        ENGLISH_LOCALES
            .iter()
            .find_map(|locale| self.resolve_language(locale))
            .ok_or(StoreError::MissingEnglishTier)
    }

    /// Classes of the canonical source language.
    pub fn english_classes(&self) -> Result<&ClassMap, StoreError> {
        let english = self.english_language()?;
        self.languages.get(english).ok_or(StoreError::MissingEnglishTier)
    }

    /// Writes one property, creating the language and class on demand.
    ///
    /// An existing value is replaced.
    pub fn set_property(
        &mut self,
        language: &str,
        class_name: &str,
        property_name: &str,
        message: impl Into<String>,
        is_static: bool,
    ) {
        let language = self.find_language(language);
        self.languages
            .entry(language)
            .or_default()
            .entry(class_name.to_string())
            .or_insert_with(PropertyMap::new)
            .insert(property_name, TranslationProperty::new(message, is_static));
    }

    /// Property of exactly this language, without fallback.
    fn lookup(
        &self,
        language: &str,
        class_name: &str,
        property_name: &str,
    ) -> Option<&TranslationProperty> {
        self.classes(language)?.get(class_name)?.get(property_name)
    }

    /// Looks a property up in `language`, then English, then `Neutral`.
    ///
    /// Never fails: a miss in every tier yields an empty, non-static property.
    #[must_use]
    pub fn property(
        &self,
        language: &str,
        class_name: &str,
        property_name: &str,
    ) -> TranslationProperty {
        self.lookup(language, class_name, property_name)
            .or_else(|| {
                let english = self.english_language().ok()?;
                self.lookup(english, class_name, property_name)
            })
            .or_else(|| self.lookup(NEUTRAL_LANGUAGE, class_name, property_name))
            .cloned()
            .unwrap_or_default()
    }

    /// [`Self::property`] in the current language.
    #[must_use]
    pub fn property_in_current(&self, class_name: &str, property_name: &str) -> TranslationProperty {
        self.property(self.current_language().unwrap_or_default(), class_name, property_name)
    }

    /// [`Self::property`] with the store-wide macros replaced through `resolver`.
    pub fn property_with_macros<F>(
        &self,
        language: &str,
        class_name: &str,
        property_name: &str,
        resolver: F,
    ) -> TranslationProperty
    where
        F: FnMut(&str) -> String,
    {
        let mut property = self.property(language, class_name, property_name);
        property.message = self.replace_macros(&property.message, resolver);
        property
    }

    /// Replaces every macro known to the store in `message`.
    pub fn replace_macros<F>(&self, message: &str, resolver: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        macros::replace(message, &self.macros(), resolver)
    }

    /// Macro names used by any stored message, in first-seen order.
    #[must_use]
    pub fn macros(&self) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let messages = self
            .languages
            .values()
            .flat_map(|classes| classes.values())
            .flat_map(|properties| properties.iter())
            .map(|(_, property)| property.message.as_str());
        for message in messages {
            for name in macros::get_macros(message) {
                if !found.contains(&name) {
                    found.push(name);
                }
            }
        }
        found
    }

    /// Class names across all languages, deduplicated in first-seen order.
    #[must_use]
    pub fn all_classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = Vec::new();
        for class_name in self.languages.values().flat_map(|classes| classes.keys()) {
            if !classes.contains(&class_name.as_str()) {
                classes.push(class_name);
            }
        }
        classes
    }

    /// The selected language if it is stored, else the language of the UI locale.
    #[must_use]
    pub fn current_language(&self) -> Option<&str> {
        if let Some(language) = self.current_language.as_deref()
            && let Some(resolved) = self.resolve_language(language)
        {
            return Some(resolved);
        }
        self.ui_locale
            .as_deref()
            .and_then(|locale| self.locales.get(locale))
            .and_then(|language| self.resolve_language(language))
    }

    pub fn set_current_language(&mut self, language: Option<&str>) {
        self.current_language = language.map(str::to_string);
    }

    pub fn set_ui_locale(&mut self, locale: Option<&str>) {
        self.ui_locale = locale.map(str::to_string);
    }

    #[must_use]
    pub fn ui_locale(&self) -> Option<&str> {
        self.ui_locale.as_deref()
    }

    /// Resolves a language name or locale to a culture.
    ///
    /// # Precedence
    /// 1. exact locale code (`pl`, `pl-PL`)
    /// 2. locale alias of a stored language (`Polski` declared with `locale pl`)
    /// 3. English name (`Polish`)
    /// 4. native name (`polski`)
    ///
    /// All comparisons ignore case.
    #[must_use]
    pub fn find_culture(&self, language: &str) -> Option<&'static Culture> {
        let language = language.trim();
        if language.is_empty() {
            return None;
        }

        let is_code = self.locales.keys().any(|locale| locale.eq_ignore_ascii_case(language))
            || cultures::CULTURES.iter().any(|culture| culture.code.eq_ignore_ascii_case(language));
        if is_code && let Some(culture) = cultures::by_code(language) {
            return Some(culture);
        }

        if let Some(stored) = self.resolve_language(language)
            && let Some(culture) =
                self.locales_for(stored).into_iter().find_map(cultures::by_code)
        {
            return Some(culture);
        }

        cultures::by_english_name(language).or_else(|| cultures::by_native_name(language))
    }

    /// Adds an empty language and fills it with every property of `from`.
    ///
    /// `from` defaults to the English language. With a `translator`, each message is
    /// machine-translated; a failed translation stores an empty message. Without one,
    /// every message is empty. `progress(done, total)` is called after each property.
    pub fn add_language<P>(
        &mut self,
        language: &str,
        from: Option<&str>,
        translator: Option<&dyn MachineTranslator>,
        mut progress: P,
    ) -> Result<(), StoreError>
    where
        P: FnMut(usize, usize),
    {
        let language = language.trim();
        if self.languages.contains_key(language) {
            return Err(StoreError::LanguageExists(language.to_string()));
        }

        let source = match from.map(str::trim).filter(|from| !from.is_empty()) {
            Some(from) => self.find_language(from),
            None => self.english_language()?.to_string(),
        };

        let entries: Vec<(String, String, TranslationProperty)> = self
            .languages
            .get(&source)
            .into_iter()
            .flat_map(|classes| classes.iter())
            .flat_map(|(class_name, properties)| {
                properties.iter().map(move |(property_name, property)| {
                    (class_name.clone(), property_name.clone(), property.clone())
                })
            })
            .collect();

        tracing::debug!("Adding language {} from {} ({} properties)", language, source, entries.len());
        self.languages.insert(language.to_string(), ClassMap::new());

        let codes = translator.map(|_| (self.find_culture(&source), self.find_culture(language)));
        let total = entries.len();
        for (done, (class_name, property_name, property)) in entries.into_iter().enumerate() {
            let message = match (translator, codes) {
                (Some(translator), Some((from_culture, to_culture))) => {
                    translate_message(translator, &property.message, from_culture, to_culture)
                        .unwrap_or_else(|err| {
                            tracing::warn!(
                                "Auto-translate of ({}){} failed: {}",
                                class_name,
                                property_name,
                                err
                            );
                            String::new()
                        })
                }
                _ => String::new(),
            };
            self.set_property(language, &class_name, &property_name, message, property.is_static);
            progress(done + 1, total);
        }
        Ok(())
    }
}

/// Runs one message through the translator, failing when either culture is unknown.
fn translate_message(
    translator: &dyn MachineTranslator,
    message: &str,
    from: Option<&Culture>,
    to: Option<&Culture>,
) -> Result<String, TranslateFailure> {
    match (from, to) {
        (Some(from), Some(to)) => translator.translate(message, from.code, to.code),
        _ => Err(TranslateFailure::new("unknown culture")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[fixture]
    fn store() -> TranslationStore {
        let mut store = TranslationStore::with_default_locales();
        store.set_property("English", "Form1", "Title", "Main window", true);
        store.set_property("English", "Form1", "button1.Text", "Hello $(User)", false);
        store.set_property("English", "Form2", "Text", "Options", false);
        store.set_property("Polish", "Form1", "button1.Text", "Cześć $(User)", false);
        store.set_property(NEUTRAL_LANGUAGE, "Form2", "Version", "1.0", false);
        store
    }

    #[googletest::test]
    fn test_init_seeds_neutral_and_regional_locales() {
        let store = TranslationStore::with_default_locales();

        let locales: BTreeMap<&str, &str> = store.all_locales().collect();

        expect_that!(locales.get("pl"), some(eq(&"Polish")));
        expect_that!(locales.get("pl-PL"), some(eq(&"Polish")));
        expect_that!(locales.get("sr-Cyrl-SP"), some(eq(&"Serbian")));
        expect_that!(locales.get("en-GB"), some(eq(&"English")));
        expect_that!(store.is_empty(), eq(true));
    }

    #[rstest]
    #[case::primary_key("Polish", Some("Polish"))]
    #[case::neutral_locale("pl", Some("Polish"))]
    #[case::regional_locale("pl-PL", Some("Polish"))]
    #[case::padded(" English ", Some("English"))]
    #[case::locale_of_missing_language("de", None)]
    #[case::unknown("Klingon", None)]
    fn test_resolve_language(
        store: TranslationStore,
        #[case] language: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(store.resolve_language(language), expected);
    }

    #[rstest]
    fn test_find_language_returns_input_when_unresolved(store: TranslationStore) {
        assert_eq!(store.find_language("de"), "de");
        assert_eq!(store.find_language("en-US"), "English");
    }

    #[rstest]
    fn test_exists_class_and_property(store: TranslationStore) {
        assert!(store.exists_class("pl", "Form1"));
        assert!(!store.exists_class("pl", "Form2"));
        assert!(store.exists_property("en", "Form1", "Title"));
        assert!(!store.exists_property("pl", "Form1", "Title"));
    }

    #[rstest]
    #[case::exact("pl", "Form1", "button1.Text", "Cześć $(User)")]
    #[case::english_fallback("pl", "Form1", "Title", "Main window")]
    #[case::unknown_language_falls_back("fr", "Form2", "Text", "Options")]
    #[case::neutral_fallback("pl", "Form2", "Version", "1.0")]
    #[case::miss("pl", "Form3", "Text", "")]
    fn test_property_three_tiers(
        store: TranslationStore,
        #[case] language: &str,
        #[case] class_name: &str,
        #[case] property_name: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(store.property(language, class_name, property_name).message, expected);
    }

    #[googletest::test]
    fn test_property_miss_is_empty_and_not_static() {
        let mut store = TranslationStore::with_default_locales();
        store.set_property("English", "C", "Other", "x", true);

        let property = store.property("fr", "C", "P");

        expect_that!(property, eq(&TranslationProperty::new("", false)));
    }

    #[googletest::test]
    fn test_property_without_english_skips_tier() {
        let mut store = TranslationStore::new();
        store.set_property(NEUTRAL_LANGUAGE, "C", "P", "neutral", false);

        expect_that!(store.english_language(), err(eq(&StoreError::MissingEnglishTier)));
        expect_that!(store.property("fr", "C", "P").message, eq("neutral"));
    }

    #[googletest::test]
    fn test_english_language_uses_alias_priority() {
        let mut store = TranslationStore::new();
        store.set_locale("en-GB", "British");
        store.set_locale("en-US", "American");
        store.set_property("British", "C", "P", "colour", false);
        store.set_property("American", "C", "P", "color", false);

        expect_that!(store.english_language(), ok(eq(&"American")));
    }

    #[googletest::test]
    fn test_set_property_through_locale_alias_overwrites() {
        let mut store = TranslationStore::with_default_locales();
        store.set_property("English", "C", "P", "old", false);
        store.set_property("en-US", "C", "P", "new", true);

        expect_that!(store.languages().collect::<Vec<_>>(), elements_are![eq(&"English")]);
        expect_that!(store.property("en", "C", "P"), eq(&TranslationProperty::new("new", true)));
    }

    #[rstest]
    fn test_macros_and_replace(store: TranslationStore) {
        assert_eq!(store.macros(), vec!["User".to_string()]);

        let property = store.property_with_macros("pl", "Form1", "button1.Text", |_| "Ann".into());

        assert_eq!(property.message, "Cześć Ann");
    }

    #[rstest]
    fn test_all_classes_deduplicated(store: TranslationStore) {
        assert_eq!(store.all_classes(), vec!["Form1", "Form2"]);
    }

    #[rstest]
    fn test_current_language_prefers_selected_language(mut store: TranslationStore) {
        store.set_ui_locale(Some("en-US"));
        assert_eq!(store.current_language(), Some("English"));

        store.set_current_language(Some("pl"));
        assert_eq!(store.current_language(), Some("Polish"));

        store.set_current_language(Some("Klingon"));
        assert_eq!(store.current_language(), Some("English"));

        store.set_ui_locale(Some("de-DE"));
        assert_eq!(store.current_language(), None);
        assert_eq!(store.property_in_current("Form2", "Text").message, "Options");
    }

    #[rstest]
    #[case::code("pl", Some("pl"))]
    #[case::regional_code("PL-pl", Some("pl"))]
    #[case::english_name("German", Some("de"))]
    #[case::native_name("Deutsch", Some("de"))]
    #[case::unknown("Klingon", None)]
    fn test_find_culture(
        store: TranslationStore,
        #[case] language: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(store.find_culture(language).map(|culture| culture.code), expected);
    }

    #[googletest::test]
    fn test_find_culture_through_declared_locale() {
        let mut store = TranslationStore::with_default_locales();
        store.set_locale("pl", "Polski");
        store.set_property("Polski", "C", "P", "x", false);

        expect_that!(store.find_culture("Polski").map(|culture| culture.code), some(eq("pl")));
    }

    #[rstest]
    fn test_add_language_translates_each_property(mut store: TranslationStore) {
        let translator = |text: &str, from: &str, to: &str| -> std::result::Result<String, TranslateFailure> {
            Ok(format!("[{from}>{to}] {text}"))
        };
        let mut calls = Vec::new();

        store
            .add_language("German", None, Some(&translator), |done, total| calls.push((done, total)))
            .unwrap();

        assert_eq!(store.property("de", "Form2", "Text").message, "[en>de] Options");
        assert!(store.property("de", "Form1", "Title").is_static);
        assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[rstest]
    fn test_add_language_failure_stores_empty_message(mut store: TranslationStore) {
        let translator = |_: &str, _: &str, _: &str| -> std::result::Result<String, TranslateFailure> {
            Err(TranslateFailure::new("offline"))
        };

        store.add_language("German", None, Some(&translator), |_, _| {}).unwrap();

        assert!(store.exists_property("German", "Form2", "Text"));
        assert_eq!(store.property("German", "Form2", "Text").message, "");
    }

    #[rstest]
    fn test_add_language_without_translator_and_unknown_culture(mut store: TranslationStore) {
        store.add_language("Elvish", Some("Polish"), None, |_, _| {}).unwrap();

        assert_eq!(store.classes("Elvish").map(ClassMap::len), Some(1));
        assert_eq!(store.property("Elvish", "Form1", "button1.Text").message, "");
    }

    #[rstest]
    fn test_add_language_rejects_existing(mut store: TranslationStore) {
        let result = store.add_language("Polish", None, None, |_, _| {});

        assert_eq!(result, Err(StoreError::LanguageExists("Polish".to_string())));
    }

    #[googletest::test]
    fn test_add_language_requires_english_source() {
        let mut store = TranslationStore::new();

        let result = store.add_language("German", None, None, |_, _| {});

        expect_that!(result, err(eq(&StoreError::MissingEnglishTier)));
    }

    #[rstest]
    fn test_directives_are_deduplicated(mut store: TranslationStore) {
        store.add_code_module("Forms.dll");
        store.add_code_module(" Forms.dll ");
        store.add_code_using("System.Drawing");
        store.add_code_using("");
        store.add_static_class("Messages");

        assert_eq!(store.code_modules(), ["Forms.dll".to_string()]);
        assert_eq!(store.code_usings(), ["System.Drawing".to_string()]);
        assert!(store.is_static_class("Messages"));
    }

    #[rstest]
    fn test_clear_all(mut store: TranslationStore) {
        store.add_code_using("System");
        store.set_current_language(Some("pl"));

        store.clear_all();

        assert!(store.is_empty());
        assert_eq!(store.all_locales().count(), 0);
        assert!(store.code_usings().is_empty());
        assert_eq!(store.current_language(), None);
    }
}
