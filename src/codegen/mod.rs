//! Template-driven generation of the runtime translator source.

pub mod synthesizer;
pub mod templates;

pub use synthesizer::{
    SynthesisError,
    Synthesizer,
    compile_modules,
    compile_usings,
};
pub use templates::{
    CodeTemplates,
    TemplateError,
};
