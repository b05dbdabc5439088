//! Error type of the localizer context.

use std::path::PathBuf;

use thiserror::Error;

use crate::codegen::{
    SynthesisError,
    TemplateError,
};
use crate::config::ConfigError;
use crate::host::compiler::{
    CompileError,
    InvokeError,
};
use crate::input::LangError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum LocalizerError {
    #[error(transparent)]
    Lang(#[from] LangError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Translation is empty. Please add a .lang file to '{}' or one of its subdirectories.",
        directory.display()
    )]
    EmptyTranslation { directory: PathBuf },

    #[error("No compiler backend configured")]
    NoCompiler,
}
