//! 言語ファイルの探索
//!
//! Collects `.lang` files from a translation directory and from nested
//! directories with a fixed name (`Languages` by default).

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobMatcher,
};
use ignore::WalkBuilder;

use super::lang::{
    self,
    LangError,
};
use crate::store::TranslationStore;

/// Lists language files under `directory`.
///
/// Only the top level and subdirectories named `nested_directory` (recursively)
/// are searched. Files are ordered by depth, then by path, so that files closer
/// to `directory` are applied first.
pub fn find_lang_files(
    directory: &Path,
    pattern: &str,
    nested_directory: &str,
) -> Result<Vec<PathBuf>, LangError> {
    let matcher = build_matcher(pattern)?;
    let nested_directory = nested_directory.to_string();

    let mut found_files: Vec<(usize, PathBuf)> = Vec::new();
    // ignore クレートでファイルを走査
    for result in WalkBuilder::new(directory)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !entry.file_type().is_some_and(|ft| ft.is_dir())
                || entry.file_name().to_string_lossy() == nested_directory.as_str()
        })
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        // ファイルのみを対象
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if !matcher.is_match(entry.file_name()) {
            continue;
        }

        found_files.push((entry.depth(), entry.into_path()));
    }

    found_files.sort();
    Ok(found_files.into_iter().map(|(_, path)| path).collect())
}

/// Compiles the file name pattern.
fn build_matcher(pattern: &str) -> Result<GlobMatcher, LangError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|source| LangError::Walk { pattern: pattern.to_string(), source })
}

/// Reads every language file found under `directory` into `store`.
///
/// Unreadable files are skipped with a warning; malformed lines abort the load.
/// Returns the number of files applied.
pub fn read_directory(
    directory: &Path,
    pattern: &str,
    nested_directory: &str,
    store: &mut TranslationStore,
) -> Result<usize, LangError> {
    let files = find_lang_files(directory, pattern, nested_directory)?;
    tracing::debug!("Found {} language files in {:?}", files.len(), directory);

    let mut applied = 0;
    for path in &files {
        match lang::read_file(path, store) {
            Ok(()) => applied += 1,
            Err(LangError::Io { path, source }) => {
                tracing::warn!("Skipping language file {:?}: {}", path, source);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(applied)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn names(dir: &TempDir, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|path| path.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[googletest::test]
    fn test_find_lang_files_only_descends_into_nested_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "English.lang", "");
        write(dir.path(), "notes.txt", "");
        write(dir.path(), "Languages/Polski.lang", "");
        write(dir.path(), "Languages/Languages/Deutsch.lang", "");
        write(dir.path(), "Other/Francais.lang", "");
        write(dir.path(), "Languages/Other/Espanol.lang", "");

        let files = find_lang_files(dir.path(), "*.lang", "Languages").unwrap();

        assert_eq!(
            names(&dir, &files),
            vec!["English.lang", "Languages/Polski.lang", "Languages/Languages/Deutsch.lang"]
        );
    }

    #[googletest::test]
    fn test_find_lang_files_invalid_pattern() {
        let dir = TempDir::new().unwrap();

        let result = find_lang_files(dir.path(), "[", "Languages");

        expect_that!(matches!(result, Err(LangError::Walk { .. })), eq(true));
    }

    #[googletest::test]
    fn test_read_directory_merges_files_of_one_language() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "English.lang", "(Form1)Text = Main\n(Form1)Title = Old");
        write(dir.path(), "Languages/English.lang", "(Form1)Title = New");
        let mut store = TranslationStore::with_default_locales();

        let applied = read_directory(dir.path(), "*.lang", "Languages", &mut store).unwrap();

        expect_that!(applied, eq(2));
        expect_that!(store.property("en", "Form1", "Text").message, eq("Main"));
        expect_that!(store.property("en", "Form1", "Title").message, eq("New"));
    }

    #[googletest::test]
    fn test_read_directory_propagates_parse_errors() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "English.lang", "(Form1 Text = Main");
        let mut store = TranslationStore::new();

        let result = read_directory(dir.path(), "*.lang", "Languages", &mut store);

        expect_that!(matches!(result, Err(LangError::Expected { expected: ')', .. })), eq(true));
    }
}
