//! Localizer context: owns the store, the templates and the compiled translator.
//!
//! The compiled unit is cached until the store or the templates change.

mod compile;
mod error;

use std::any::Any;
use std::fmt;
use std::path::{
    Path,
    PathBuf,
};

pub use error::LocalizerError;

use crate::codegen::{
    CodeTemplates,
    Synthesizer,
    compile_modules,
    compile_usings,
};
use crate::config::LocalizerSettings;
use crate::host::compiler::{
    Arg,
    CallableUnit,
    CompileRequest,
    Compiler,
    effective_framework_version,
};
use crate::host::types::TypeResolver;
use crate::input;
use crate::store::TranslationStore;

/// Entry point translating statics or one object.
pub const ENTRY_TRANSLATE: &str = "Translate";
/// Entry point restoring remembered values.
pub const ENTRY_RESTORE: &str = "Restore";
/// Prefix of the per-class factory entry points (`CreateFormMain`).
pub const ENTRY_CREATE: &str = "Create";

/// Runtime facade over one translation directory.
pub struct Localizer {
    settings: LocalizerSettings,
    store: TranslationStore,
    templates: CodeTemplates,
    /// Host type lookup used by synthesis.
    types: Box<dyn TypeResolver>,
    /// Backend turning synthesized source into a callable unit.
    compiler: Option<Box<dyn Compiler>>,
    /// Cached result of the last successful compile.
    compiled: Option<Box<dyn CallableUnit>>,
    /// Directory languages were last loaded from. Relative `debug` and
    /// `template` paths resolve against it.
    directory: PathBuf,
    /// Whether languages were loaded at least once. Not reset by `invalidate`.
    loaded: bool,
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("settings", &self.settings)
            .field("directory", &self.directory)
            .field("languages", &self.store.languages().collect::<Vec<_>>())
            .field("has_compiler", &self.compiler.is_some())
            .field("compiled", &self.compiled.is_some())
            .finish_non_exhaustive()
    }
}

/// Calls an entry point of `unit`; logs and propagates failures.
///
/// Without a unit (empty translation in lenient mode) nothing is called.
fn invoke(
    unit: Option<&dyn CallableUnit>,
    entry_point: &str,
    args: &mut [Arg<'_>],
) -> Result<Option<Box<dyn Any>>, LocalizerError> {
    let Some(unit) = unit else {
        tracing::debug!("No compiled translator, skipping {}", entry_point);
        return Ok(None);
    };
    unit.invoke(entry_point, args).map_err(|err| {
        tracing::error!("{} error: {}", entry_point, err);
        LocalizerError::from(err)
    })
}

impl Localizer {
    /// Creates a context with an empty store seeded with the built-in locales.
    #[must_use]
    pub fn new(settings: LocalizerSettings, types: Box<dyn TypeResolver>) -> Self {
        let mut store = TranslationStore::with_default_locales();
        store.set_ui_locale(settings.effective_ui_locale().as_deref());
        let directory =
            settings.translation_directory.clone().unwrap_or_else(|| PathBuf::from("."));
        Self {
            settings,
            store,
            templates: CodeTemplates::new(),
            types,
            compiler: None,
            compiled: None,
            directory,
            loaded: false,
        }
    }

    #[must_use]
    pub fn with_compiler(mut self, compiler: Box<dyn Compiler>) -> Self {
        self.compiler = Some(compiler);
        self.compiled = None;
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &LocalizerSettings {
        &self.settings
    }

    #[must_use]
    pub const fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Mutable store access. Drops the compiled translator.
    pub fn store_mut(&mut self) -> &mut TranslationStore {
        self.invalidate();
        &mut self.store
    }

    #[must_use]
    pub const fn templates(&self) -> &CodeTemplates {
        &self.templates
    }

    /// Mutable template access. Drops the compiled translator.
    pub fn templates_mut(&mut self) -> &mut CodeTemplates {
        self.invalidate();
        &mut self.templates
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub const fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Drops the compiled translator; the next call compiles again.
    pub fn invalidate(&mut self) {
        if self.compiled.take().is_some() {
            tracing::debug!("Compiled translator invalidated");
        }
    }

    /// Reloads languages from the configured translation directory.
    pub fn load_languages(&mut self) -> Result<usize, LocalizerError> {
        let directory = self.directory.clone();
        self.load_languages_from(&directory)
    }

    /// Replaces the store with the languages found under `directory` and
    /// reapplies template overrides. Returns the number of files read.
    ///
    /// The UI locale survives the reload.
    pub fn load_languages_from(&mut self, directory: &Path) -> Result<usize, LocalizerError> {
        self.invalidate();
        let ui_locale = self.store.ui_locale().map(str::to_string);
        self.store = TranslationStore::with_default_locales();
        self.store.set_ui_locale(ui_locale.as_deref());
        self.directory = directory.to_path_buf();

        let count = input::read_directory(
            directory,
            &self.settings.lang_file_pattern,
            &self.settings.nested_directory,
            &mut self.store,
        )?;
        self.loaded = true;

        self.templates = CodeTemplates::new();
        if let Some(name) = &self.store.template_file_name {
            self.templates.load_file(&directory.join(name))?;
        }
        if let Some(path) = &self.settings.template_file {
            self.templates.load_file(path)?;
        }

        tracing::info!(
            "Loaded {} language files ({} languages) from {:?}",
            count,
            self.store.languages().count(),
            directory
        );

        if self.store.is_empty() && self.settings.report_errors {
            return Err(LocalizerError::EmptyTranslation { directory: directory.to_path_buf() });
        }
        Ok(count)
    }

    /// Synthesizes the translator source for the current store.
    pub fn generate_source(&self) -> Result<String, LocalizerError> {
        let usings = compile_usings(&self.store, self.types.as_ref(), &self.settings.implicit_usings);
        let macros = self.store.macros();
        let source = Synthesizer::new(&self.store, &self.templates, self.types.as_ref())
            .strict(self.settings.report_errors)
            .synthesize(&usings, &macros, chrono::Local::now().date_naive())?;
        Ok(source)
    }

    /// Synthesizes and compiles the translator, replacing any cached one.
    ///
    /// Returns `false` when the translation is empty in lenient mode; nothing is
    /// compiled then.
    pub fn compile(&mut self) -> Result<bool, LocalizerError> {
        self.invalidate();
        if self.store.is_empty() {
            if self.settings.report_errors {
                return Err(LocalizerError::EmptyTranslation { directory: self.directory.clone() });
            }
            tracing::debug!("Translation is empty, nothing to compile");
            return Ok(false);
        }

        let compiler = self.compiler.as_deref().ok_or(LocalizerError::NoCompiler)?;
        let source = self.generate_source()?;

        if let Some(name) = &self.store.debug_file_name {
            let path = self.directory.join(name);
            std::fs::write(&path, &source)
                .map_err(|source| LocalizerError::Io { path: path.clone(), source })?;
            tracing::debug!("Wrote generated source to {:?}", path);
        }

        let modules = compile_modules(&self.store, self.types.as_ref());
        let framework_version = effective_framework_version(
            self.store.framework_version.as_deref(),
            compiler.runtime_version().as_deref(),
        );
        tracing::info!(
            "Compiling translator: modules {:?}, {} macros, framework {:?}",
            modules,
            self.store.macros().len(),
            framework_version
        );

        let request = CompileRequest { source, modules, framework_version };
        let unit = compile::compile_with_retry(compiler, request)?;
        self.compiled = Some(unit);
        Ok(true)
    }

    /// Compiles unless a translator is cached. Loads languages first when the
    /// store is empty and nothing was loaded yet. Returns `true` if this call
    /// compiled.
    pub fn compile_if_necessary(&mut self) -> Result<bool, LocalizerError> {
        if self.compiled.is_some() {
            return Ok(false);
        }
        if self.store.is_empty() && !self.loaded {
            self.load_languages()?;
        }
        self.compile()
    }

    /// Translates every static class into `language`, or into the current
    /// language when `None`.
    pub fn translate_statics(&mut self, language: Option<&str>) -> Result<(), LocalizerError> {
        self.compile_if_necessary()?;
        let unit = self.compiled.as_deref();
        match language {
            Some(language) => {
                invoke(unit, ENTRY_TRANSLATE, &mut [Arg::Language(language), Arg::Store(&self.store)])?
            }
            None => invoke(unit, ENTRY_TRANSLATE, &mut [Arg::Store(&self.store)])?,
        };
        Ok(())
    }

    /// Translates one object.
    ///
    /// With `None`, static classes are translated first and the object goes into
    /// the current language.
    pub fn translate_object(
        &mut self,
        language: Option<&str>,
        object: &mut dyn Any,
    ) -> Result<(), LocalizerError> {
        let language = match language {
            Some(language) => language.to_string(),
            None => {
                self.translate_statics(None)?;
                self.store.current_language().unwrap_or_default().to_string()
            }
        };
        self.compile_if_necessary()?;
        invoke(
            self.compiled.as_deref(),
            ENTRY_TRANSLATE,
            &mut [Arg::Language(&language), Arg::Object(object), Arg::Store(&self.store)],
        )?;
        Ok(())
    }

    /// Restores remembered values of every static class.
    pub fn restore_statics(&mut self) -> Result<(), LocalizerError> {
        self.compile_if_necessary()?;
        invoke(self.compiled.as_deref(), ENTRY_RESTORE, &mut [Arg::Store(&self.store)])?;
        Ok(())
    }

    /// Restores remembered values of one object.
    pub fn restore_object(&mut self, object: &mut dyn Any) -> Result<(), LocalizerError> {
        self.compile_if_necessary()?;
        invoke(
            self.compiled.as_deref(),
            ENTRY_RESTORE,
            &mut [Arg::Object(object), Arg::Store(&self.store)],
        )?;
        Ok(())
    }

    /// Creates an instance of `class_name` through its generated factory.
    pub fn create(&mut self, class_name: &str) -> Result<Option<Box<dyn Any>>, LocalizerError> {
        self.compile_if_necessary()?;
        invoke(self.compiled.as_deref(), &format!("{ENTRY_CREATE}{class_name}"), &mut [])
    }
}
