//! 設定ファイルの探索と読み込み

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    LocalizerSettings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".nlocalizer.json";

/// 読み込んだ設定ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LoadedConfig {
    /// 設定ファイルのパス
    pub(super) path: PathBuf,

    /// パス系の項目を設定ファイルのディレクトリ基準で解決済みの設定
    pub(super) settings: LocalizerSettings,
}

/// `start` から親ディレクトリへ遡って最初に見つかった設定ファイル
pub(super) fn find_config_file(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(CONFIG_FILE_NAME)).find(|path| path.is_file())
}

/// 相対パスを `base` 基準にする
fn resolve_against(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() { path } else { base.join(path) }
}

/// 翻訳ディレクトリ以上を探して設定を読み込む
///
/// `translationDirectory` と `templateFile` の相対パスは、
/// 設定ファイルが置かれたディレクトリからの相対として解決する。
///
/// # Returns
/// - `Ok(Some(config))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: どの親ディレクトリにも設定ファイルがない
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_config(start: &Path) -> Result<Option<LoadedConfig>, ConfigError> {
    let Some(path) = find_config_file(start) else {
        tracing::debug!("No {} at or above {:?}", CONFIG_FILE_NAME, start);
        return Ok(None);
    };
    tracing::debug!("Loading configuration from: {:?}", path);

    let content = std::fs::read_to_string(&path)?;
    let mut settings: LocalizerSettings = serde_json::from_str(&content)?;

    let base = path.parent().unwrap_or(start);
    settings.translation_directory =
        settings.translation_directory.map(|dir| resolve_against(base, dir));
    settings.template_file = settings.template_file.map(|file| resolve_against(base, file));

    Ok(Some(LoadedConfig { path, settings }))
}
