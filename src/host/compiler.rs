//! Compile and invoke boundary.
//!
//! The engine hands synthesized source plus module references to a
//! [`Compiler`] and gets back an opaque [`CallableUnit`] whose entry points it
//! calls by name.

use std::any::Any;
use std::fmt;

use thiserror::Error;

use crate::store::TranslationStore;
use crate::text::finder;

/// Diagnostic code for a module reference the compiler cannot resolve.
pub const UNRESOLVED_MODULE: &str = "CS0006";
/// Diagnostic code for a member the target type does not define.
pub const MISSING_MEMBER: &str = "CS0117";

/// One compiler message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stable error code (`CS0117`).
    pub code: String,
    pub message: String,
    pub line: Option<usize>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>, line: Option<usize>) -> Self {
        Self { code: code.into(), message: message.into(), line }
    }

    /// The module named by an unresolved-module diagnostic: the first single-quoted span.
    #[must_use]
    pub fn unresolved_module(&self) -> Option<&str> {
        if self.code != UNRESOLVED_MODULE {
            return None;
        }
        let module = finder::find_between_first(&self.message, "'", "'");
        (!module.is_empty()).then_some(module)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} in line {}: {}", self.code, line, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// Everything a compiler backend needs to build a callable unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileRequest {
    pub source: String,
    /// Module references, in order.
    pub modules: Vec<String>,
    /// Target runtime version (`v4.0`).
    pub framework_version: Option<String>,
}

/// Result of one compiler run. `unit` is set only on success.
pub struct CompileOutput {
    pub unit: Option<Box<dyn CallableUnit>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    #[must_use]
    pub fn success(unit: Box<dyn CallableUnit>) -> Self {
        Self { unit: Some(unit), diagnostics: Vec::new() }
    }

    #[must_use]
    pub fn failure(diagnostics: Vec<Diagnostic>) -> Self {
        Self { unit: None, diagnostics }
    }
}

impl fmt::Debug for CompileOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOutput")
            .field("compiled", &self.unit.is_some())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

/// Compiler backend.
pub trait Compiler {
    fn compile(&self, request: &CompileRequest) -> CompileOutput;

    /// Version of the runtime the backend targets. Caps the declared `framework` version.
    fn runtime_version(&self) -> Option<String> {
        None
    }
}

/// An argument passed to an entry point.
#[derive(Debug)]
pub enum Arg<'a> {
    Language(&'a str),
    Object(&'a mut dyn Any),
    Store(&'a TranslationStore),
}

impl Arg<'_> {
    #[must_use]
    pub const fn kind(&self) -> ArgKind {
        match self {
            Self::Language(_) => ArgKind::Language,
            Self::Object(_) => ArgKind::Object,
            Self::Store(_) => ArgKind::Store,
        }
    }
}

/// Parameter type of an entry point, used to pick an overload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Language,
    Object,
    Store,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Language => "String",
            Self::Object => "Object",
            Self::Store => "Translation",
        };
        f.write_str(name)
    }
}

/// Renders an argument list as a parameter signature (`String, Translation`).
#[must_use]
pub fn signature(args: &[Arg<'_>]) -> String {
    args.iter().map(|arg| arg.kind().to_string()).collect::<Vec<_>>().join(", ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("Method {entry_point}({signature}) is not found in runtime translator")]
    EntryPointNotFound { entry_point: String, signature: String },

    #[error("{entry_point} failed: {message}")]
    Failed { entry_point: String, message: String },
}

impl InvokeError {
    #[must_use]
    pub fn not_found(entry_point: &str, args: &[Arg<'_>]) -> Self {
        Self::EntryPointNotFound { entry_point: entry_point.to_string(), signature: signature(args) }
    }
}

/// Compiled code exposing named entry points.
pub trait CallableUnit {
    /// Calls `entry_point` with `args`. Fails with
    /// [`InvokeError::EntryPointNotFound`] when no overload matches.
    fn invoke(
        &self,
        entry_point: &str,
        args: &mut [Arg<'_>],
    ) -> Result<Option<Box<dyn Any>>, InvokeError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("compile error - {code}: {message}. {hint}")]
    Failed { code: String, message: String, line: Option<usize>, hint: String },
}

/// Parses `v4.0`, `4.0.30319` or `4` into (major, minor).
fn parse_version(text: &str) -> Option<(u32, u32)> {
    let text = text.trim();
    let text = text.strip_prefix(['v', 'V']).unwrap_or(text);
    let mut parts = text.split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.trim().parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

/// The framework version to compile against: the declared one, capped at the runtime's.
///
/// # Examples
/// ```
/// use nlocalizer::host::compiler::effective_framework_version;
///
/// assert_eq!(effective_framework_version(Some("v3.5"), Some("v4.0.30319")).as_deref(), Some("v3.5"));
/// assert_eq!(effective_framework_version(Some("4.5"), Some("v4.0")).as_deref(), Some("v4.0"));
/// assert_eq!(effective_framework_version(None, Some("2.0")).as_deref(), Some("v2.0"));
/// assert_eq!(effective_framework_version(None, None), None);
/// ```
#[must_use]
pub fn effective_framework_version(declared: Option<&str>, runtime: Option<&str>) -> Option<String> {
    let declared = declared.and_then(parse_version);
    let runtime = runtime.and_then(parse_version);
    let (major, minor) = match (declared, runtime) {
        (Some(declared), Some(runtime)) => declared.min(runtime),
        (Some(version), None) | (None, Some(version)) => version,
        (None, None) => return None,
    };
    Some(format!("v{major}.{minor}"))
}
