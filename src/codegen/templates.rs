//! Named code templates in the `@Section` text format.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::OnceLock;

use thiserror::Error;

/// Built-in template set.
pub const DEFAULT_TEMPLATES: &str = include_str!("../../templates/default.tpl");

/// Section names looked up during synthesis.
pub mod section {
    pub const CODE: &str = "Code";
    pub const USING: &str = "Using";
    pub const TRANSLATE_CLASS: &str = "TranslateClass";
    pub const REMEMBER_CLASS: &str = "RememberClass";
    pub const RESTORE_CLASS: &str = "RestoreClass";
    pub const DYNAMIC_CLASS: &str = "DynamicClass";
    pub const DYNAMIC_CLASS_REMEMBER: &str = "DynamicClassRemember";
    pub const DYNAMIC_CLASS_TRANSLATE: &str = "DynamicClassTranslate";
    pub const STATIC_CLASS: &str = "StaticClass";
    pub const STATIC_CLASS_REMEMBER: &str = "StaticClassRemember";
    pub const STATIC_CLASS_TRANSLATE: &str = "StaticClassTranslate";
    pub const MACRO: &str = "Macro";
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template '{name}' not found. Please correct .lang files.")]
    Missing { name: String },

    #[error("Failed to read template file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

static DEFAULT_SECTIONS: OnceLock<BTreeMap<String, String>> = OnceLock::new();

/// Parsed built-in set. Parsed once per process.
fn default_sections() -> BTreeMap<String, String> {
    DEFAULT_SECTIONS
        .get_or_init(|| {
            let mut sections = BTreeMap::new();
            merge_sections(&mut sections, DEFAULT_TEMPLATES);
            sections
        })
        .clone()
}

/// Applies `@Section` text to `sections`.
///
/// Every declared section is reset, then receives the lines up to the next
/// header, each terminated by `\n`. Sections not declared in `text` are kept.
fn merge_sections(sections: &mut BTreeMap<String, String>, text: &str) {
    let mut current: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(name) = trimmed.strip_prefix('@') {
            let name = name.trim();
            current = (!name.is_empty()).then(|| name.to_string());
            if let Some(name) = &current {
                sections.insert(name.clone(), String::new());
            }
            continue;
        }
        if trimmed.starts_with(';') {
            continue;
        }
        if let Some(body) = current.as_ref().and_then(|name| sections.get_mut(name)) {
            body.push_str(line);
            body.push('\n');
        }
    }
}

/// The effective template set: the built-in one plus any loaded overrides.
///
/// The built-in set is materialized on first access.
#[derive(Debug, Clone, Default)]
pub struct CodeTemplates {
    sections: OnceCell<BTreeMap<String, String>>,
    /// Override file applied last, if any.
    file_name: Option<PathBuf>,
}

impl CodeTemplates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sections(&self) -> &BTreeMap<String, String> {
        self.sections.get_or_init(default_sections)
    }

    /// Returns the body of a section.
    pub fn get(&self, name: &str) -> Result<&str, TemplateError> {
        self.sections()
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| TemplateError::Missing { name: name.to_string() })
    }

    /// Section names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections().keys().map(String::as_str)
    }

    /// Applies override text on top of the effective set.
    pub fn load_text(&mut self, text: &str) {
        let mut sections = self.sections.take().unwrap_or_else(default_sections);
        merge_sections(&mut sections, text);
        self.sections = OnceCell::from(sections);
    }

    /// Applies an override file.
    ///
    /// A missing file leaves the set unchanged and returns `false`.
    pub fn load_file(&mut self, path: &Path) -> Result<bool, TemplateError> {
        if !path.is_file() {
            tracing::warn!("Template file {:?} not found, keeping current templates", path);
            return Ok(false);
        }
        let text = std::fs::read_to_string(path)
            .map_err(|source| TemplateError::Io { path: path.to_path_buf(), source })?;
        self.load_text(&text);
        self.file_name = Some(path.to_path_buf());
        tracing::debug!("Loaded templates from {:?}", path);
        Ok(true)
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// Serializes the effective set back into `@Section` text.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.sections().iter().fold(String::new(), |mut text, (name, body)| {
            text.push('@');
            text.push_str(name);
            text.push('\n');
            text.push_str(body);
            text
        })
    }
}
