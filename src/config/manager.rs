//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    LocalizerSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: LocalizerSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,

    /// 読み込んだ設定ファイル
    config_file: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: LocalizerSettings::default(), workspace_root: None, config_file: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `workspace_root` - ワークスペースのルートパス
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        // ワークスペースから親へ遡って設定ファイルを探す
        let loaded = match &workspace_root {
            Some(root) => loader::load_config(root)?,
            None => None,
        };
        let (settings, config_file) = match loaded {
            Some(config) => (config.settings, Some(config.path)),
            None => (LocalizerSettings::default(), None),
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を保存
        self.current_settings = settings;
        self.workspace_root = workspace_root;
        self.config_file = config_file;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する（コマンドライン引数による上書き用）
    pub fn update_settings(&mut self, new_settings: LocalizerSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        // バリデーション
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を更新
        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &LocalizerSettings {
        &self.current_settings
    }

    /// `.lang` ファイルを探すディレクトリ
    ///
    /// 設定ファイル由来の相対パスは読み込み時に解決済み。
    /// 未設定の場合はワークスペースルート、それもなければカレントディレクトリ。
    #[must_use]
    pub fn translation_directory(&self) -> PathBuf {
        self.current_settings
            .translation_directory
            .clone()
            .or_else(|| self.workspace_root.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// 読み込んだ設定ファイルのパス
    #[must_use]
    pub const fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }
}
