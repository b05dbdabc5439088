//! nlocalizer
//!
//! `.lang` 翻訳ファイルの読み込み、ロケールのフォールバック、
//! テンプレートによるランタイム翻訳コードの生成を行うローカライズエンジン

pub mod codegen;
pub mod config;
pub mod host;
pub mod input;
pub mod localizer;
pub mod store;
pub mod text;

#[cfg(test)]
mod test_utils;

pub use localizer::{
    Localizer,
    LocalizerError,
};
pub use store::TranslationStore;
