//! Collaborators supplied by the host program: type information, the
//! compiler backend and machine translation.
pub mod compiler;
pub mod manifest;
pub mod translator;
pub mod types;

pub use compiler::{
    Arg,
    ArgKind,
    CallableUnit,
    CompileError,
    CompileOutput,
    CompileRequest,
    Compiler,
    Diagnostic,
    InvokeError,
};
pub use manifest::{
    ManifestError,
    TypeManifest,
};
pub use translator::{
    MachineTranslator,
    TranslateFailure,
};
pub use types::{
    AcceptAllTypes,
    TypeDescriptor,
    TypeResolver,
};
