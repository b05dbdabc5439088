//! Machine-translation collaborator used to pre-fill a new language.

use thiserror::Error;

/// The collaborator could not produce a translation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("translation failed: {message}")]
pub struct TranslateFailure {
    pub message: String,
}

impl TranslateFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Translates a message between two ISO 639 language codes.
pub trait MachineTranslator {
    fn translate(
        &self,
        text: &str,
        source_code: &str,
        dest_code: &str,
    ) -> Result<String, TranslateFailure>;
}

impl<F> MachineTranslator for F
where
    F: Fn(&str, &str, &str) -> Result<String, TranslateFailure>,
{
    fn translate(
        &self,
        text: &str,
        source_code: &str,
        dest_code: &str,
    ) -> Result<String, TranslateFailure> {
        self(text, source_code, dest_code)
    }
}
