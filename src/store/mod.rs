//! Translation data model.
pub mod cultures;
mod property;
mod translation;

pub use cultures::Culture;
pub use property::{
    ClassMap,
    PropertyMap,
    TranslationProperty,
};
pub use translation::{
    ENGLISH_LOCALES,
    NEUTRAL_LANGUAGE,
    StoreError,
    TranslationStore,
};
