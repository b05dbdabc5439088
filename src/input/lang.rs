//! `.lang` file parsing.
//!
//! Each trimmed line is one of:
//!
//! ```text
//! debug [path]            ; generated source dump, default NLocalizer.cs
//! log [path]              ; log file, default NLocalizer.log
//! template [path]         ; template override, default NLocalizer.tpl
//! framework <version>
//! locale <csv>
//! module <csv> | dll <csv>
//! using <csv> | imports <csv>
//! static <csv>
//! [!](ClassName)PropertyName = value
//! ; comment
//! ```

use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::store::TranslationStore;
use crate::text::macros;

pub const DEFAULT_DEBUG_FILE: &str = "NLocalizer.cs";
pub const DEFAULT_LOG_FILE: &str = "NLocalizer.log";
pub const DEFAULT_TEMPLATE_FILE: &str = "NLocalizer.tpl";

#[derive(Error, Debug)]
pub enum LangError {
    #[error("Expected {expected} in line {line_number} of language '{language}': {line}")]
    Expected { expected: char, language: String, line_number: usize, line: String },

    #[error("Failed to read language file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid language file pattern '{pattern}': {source}")]
    Walk {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// A decoded `[!](Class)Property = value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub class_name: String,
    pub property_name: String,
    /// Unescaped value.
    pub message: String,
    pub is_static: bool,
}

/// One classified line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LangLine<'l> {
    Blank,
    Comment,
    Debug(Option<&'l str>),
    Log(Option<&'l str>),
    Template(Option<&'l str>),
    Framework(&'l str),
    Locale(Vec<&'l str>),
    Module(Vec<&'l str>),
    Using(Vec<&'l str>),
    Static(Vec<&'l str>),
    Assignment(Assignment),
}

/// Splits a comma-separated directive argument, dropping blank items.
fn split_csv(argument: &str) -> Vec<&str> {
    argument.split(',').map(str::trim).filter(|item| !item.is_empty()).collect()
}

/// Classifies one line. Only assignments can fail; the error is the missing token.
pub fn parse_line(line: &str) -> Result<LangLine<'_>, char> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(LangLine::Blank);
    }
    if line.starts_with(';') {
        return Ok(LangLine::Comment);
    }
    if line.starts_with(['!', '(']) {
        return decode_assignment(line).map(LangLine::Assignment);
    }

    let (keyword, argument) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let argument = argument.trim();
    let optional = (!argument.is_empty()).then_some(argument);

    let parsed = match keyword.to_ascii_lowercase().as_str() {
        "debug" => LangLine::Debug(optional),
        "log" => LangLine::Log(optional),
        "template" => LangLine::Template(optional),
        "framework" if !argument.is_empty() => LangLine::Framework(argument),
        "locale" => LangLine::Locale(split_csv(argument)),
        "module" | "dll" => LangLine::Module(split_csv(argument)),
        "using" | "imports" => LangLine::Using(split_csv(argument)),
        "static" => LangLine::Static(split_csv(argument)),
        _ => return decode_assignment(line).map(LangLine::Assignment),
    };
    Ok(parsed)
}

/// Decodes `[!](Class)Property = value`.
///
/// # Examples
/// ```
/// use nlocalizer::input::lang::decode_assignment;
///
/// let assignment = decode_assignment(r"!(Form1) Title = Line\tone").unwrap();
/// assert_eq!(assignment.class_name, "Form1");
/// assert_eq!(assignment.property_name, "Title");
/// assert_eq!(assignment.message, "Line\tone");
/// assert!(assignment.is_static);
/// assert_eq!(decode_assignment("Form1.Title = x"), Err('('));
/// ```
pub fn decode_assignment(line: &str) -> Result<Assignment, char> {
    let line = line.trim();
    let (is_static, line) = match line.strip_prefix('!') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, line),
    };

    let line = line.strip_prefix('(').ok_or('(')?;
    let (class_name, rest) = line.split_once(')').ok_or(')')?;
    let (property_name, value) = rest.split_once('=').ok_or('=')?;

    Ok(Assignment {
        class_name: class_name.trim().to_string(),
        property_name: property_name.trim().to_string(),
        message: unescape(value.trim()),
        is_static,
    })
}

/// Decodes `\r`, `\n`, `\t`, `\"` and `\\`. Macro names are left untouched.
///
/// Unknown escapes are kept as written.
#[must_use]
pub fn unescape(value: &str) -> String {
    let names = macros::get_macros(value);
    let shielded = macros::names_to_numbers(value, &names);

    let mut decoded = String::with_capacity(shielded.len());
    let mut chars = shielded.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            decoded.push(ch);
            continue;
        }
        match chars.next() {
            Some('r') => decoded.push('\r'),
            Some('n') => decoded.push('\n'),
            Some('t') => decoded.push('\t'),
            Some('"') => decoded.push('"'),
            Some('\\') => decoded.push('\\'),
            Some(other) => {
                decoded.push('\\');
                decoded.push(other);
            }
            None => decoded.push('\\'),
        }
    }

    macros::numbers_to_names(&decoded, &names)
}

/// Applies the lines of one language file to `store`, in order.
pub fn read_lines<'l, I>(
    language: &str,
    lines: I,
    store: &mut TranslationStore,
) -> Result<(), LangError>
where
    I: IntoIterator<Item = &'l str>,
{
    for (index, raw) in lines.into_iter().enumerate() {
        let parsed = parse_line(raw).map_err(|expected| LangError::Expected {
            expected,
            language: language.to_string(),
            line_number: index + 1,
            line: raw.trim().to_string(),
        })?;
        apply(language, parsed, store);
    }
    Ok(())
}

/// Applies the content of one language file to `store`.
pub fn read_str(
    language: &str,
    content: &str,
    store: &mut TranslationStore,
) -> Result<(), LangError> {
    read_lines(language, content.lines(), store)
}

/// Reads one file; the language name is the file stem (`Polski.lang` → `Polski`).
pub fn read_file(path: &Path, store: &mut TranslationStore) -> Result<(), LangError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| LangError::Io { path: path.to_path_buf(), source })?;
    let language = language_from_path(path);
    tracing::debug!("Reading language {} from {:?}", language, path);
    read_str(&language, &content, store)
}

/// File stem of a language file.
#[must_use]
pub fn language_from_path(path: &Path) -> String {
    path.file_stem().map(|stem| stem.to_string_lossy().to_string()).unwrap_or_default()
}

/// Writes one classified line into the store.
fn apply(language: &str, line: LangLine<'_>, store: &mut TranslationStore) {
    match line {
        LangLine::Blank | LangLine::Comment => {}
        LangLine::Debug(path) => {
            store.debug_file_name = Some(path.unwrap_or(DEFAULT_DEBUG_FILE).to_string());
        }
        LangLine::Log(path) => {
            store.log_file_name = Some(path.unwrap_or(DEFAULT_LOG_FILE).to_string());
        }
        LangLine::Template(path) => {
            store.template_file_name = Some(path.unwrap_or(DEFAULT_TEMPLATE_FILE).to_string());
        }
        LangLine::Framework(version) => store.framework_version = Some(version.to_string()),
        LangLine::Locale(locales) => {
            for locale in locales {
                store.set_locale(locale, language);
            }
        }
        LangLine::Module(modules) => {
            for module in modules {
                store.add_code_module(module);
            }
        }
        LangLine::Using(usings) => {
            for using in usings {
                store.add_code_using(using);
            }
        }
        LangLine::Static(classes) => {
            for class_name in classes {
                store.add_static_class(class_name);
            }
        }
        LangLine::Assignment(assignment) => store.set_property(
            language,
            &assignment.class_name,
            &assignment.property_name,
            assignment.message,
            assignment.is_static,
        ),
    }
}
