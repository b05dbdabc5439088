//! `.nlocalizer.json` workspace settings.
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    LocalizerSettings,
    ValidationError,
    locale_from_env,
    normalize_posix_locale,
};
