use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "implicitUsings[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One numbered line per error.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizerSettings {
    /// Directory scanned for `.lang` files.
    /// If unset, the workspace root (or the current directory) is used.
    pub translation_directory: Option<PathBuf>,

    /// Strict mode: unknown classes and members fail synthesis, and an empty
    /// translation is an error.
    pub report_errors: bool,

    /// Template override file. Applied after any `template` directive.
    pub template_file: Option<PathBuf>,

    /// File-name glob of language files.
    pub lang_file_pattern: String,

    /// Name of the subdirectories searched below the translation directory.
    pub nested_directory: String,

    /// Namespaces always imported by the generated source.
    pub implicit_usings: Vec<String>,

    /// Locale used to pick the current language.
    /// If unset, derived from `LC_ALL`, `LC_MESSAGES` or `LANG`.
    pub ui_locale: Option<String>,
}

impl Default for LocalizerSettings {
    fn default() -> Self {
        Self {
            translation_directory: None,
            report_errors: false,
            template_file: None,
            lang_file_pattern: "*.lang".to_string(),
            nested_directory: "Languages".to_string(),
            implicit_usings: vec!["System".to_string()],
            ui_locale: None,
        }
    }
}

impl LocalizerSettings {
    /// # Errors
    /// - Empty or invalid file pattern
    /// - Empty nested directory name
    /// - Blank implicit using
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.lang_file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "langFilePattern",
                "The pattern cannot be empty. Example: \"*.lang\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.lang_file_pattern) {
            errors.push(ValidationError::new(
                "langFilePattern",
                format!("Invalid glob pattern '{}': {e}", self.lang_file_pattern),
            ));
        }

        if self.nested_directory.trim().is_empty() {
            errors.push(ValidationError::new(
                "nestedDirectory",
                "The directory name cannot be empty. Example: \"Languages\"",
            ));
        }

        for (index, namespace) in self.implicit_usings.iter().enumerate() {
            if namespace.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("implicitUsings[{index}]"),
                    "The namespace cannot be empty. Please remove this entry",
                ));
            }
        }

        if let Some(locale) = &self.ui_locale
            && locale.trim().is_empty()
        {
            errors.push(ValidationError::new(
                "uiLocale",
                "The locale cannot be empty. Please specify a locale (e.g., \"pl-PL\"), or remove this field",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// The configured UI locale, or the one of the process environment.
    #[must_use]
    pub fn effective_ui_locale(&self) -> Option<String> {
        self.ui_locale.clone().or_else(locale_from_env)
    }
}

/// Reads the session locale from `LC_ALL`, `LC_MESSAGES` or `LANG`.
#[must_use]
pub fn locale_from_env() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find_map(|value| normalize_posix_locale(&value))
}

/// Converts a POSIX locale (`pl_PL.UTF-8@euro`) into a locale code (`pl-PL`).
///
/// `C` and `POSIX` have no language and yield `None`.
#[must_use]
pub fn normalize_posix_locale(value: &str) -> Option<String> {
    let value = value.trim();
    let value = value.split(['.', '@']).next().unwrap_or(value);
    if value.is_empty() || value.eq_ignore_ascii_case("C") || value.eq_ignore_ascii_case("POSIX") {
        return None;
    }
    Some(value.replace('_', "-"))
}
