//! Compiler invocation with the unresolved-module retry.

use crate::host::compiler::{
    CallableUnit,
    CompileError,
    CompileRequest,
    Compiler,
    Diagnostic,
    MISSING_MEMBER,
};

/// Remediation shown with a failed compile.
fn hint(code: &str) -> &'static str {
    if code == MISSING_MEMBER {
        "Please check - is property marked as public?"
    } else {
        "Please correct .lang files."
    }
}

/// Error for a diagnostic that cannot be recovered from.
fn failure(diagnostic: &Diagnostic) -> CompileError {
    CompileError::Failed {
        code: diagnostic.code.clone(),
        message: diagnostic.message.clone(),
        line: diagnostic.line,
        hint: hint(&diagnostic.code).to_string(),
    }
}

/// Removes every module named by an unresolved-module diagnostic.
///
/// Returns the removed modules.
fn drop_unresolved(modules: &mut Vec<String>, diagnostics: &[Diagnostic]) -> Vec<String> {
    let unresolved: Vec<&str> =
        diagnostics.iter().filter_map(Diagnostic::unresolved_module).collect();
    let (dropped, kept) = std::mem::take(modules).into_iter().partition(|module: &String| {
        unresolved.iter().any(|name| module.eq_ignore_ascii_case(name))
    });
    *modules = kept;
    dropped
}

/// Compiles `request`, retrying once without every module named by an
/// unresolved-module diagnostic.
///
/// Any other failure reports the first diagnostic.
pub(crate) fn compile_with_retry(
    compiler: &dyn Compiler,
    mut request: CompileRequest,
) -> Result<Box<dyn CallableUnit>, CompileError> {
    let mut retried = false;
    loop {
        let output = compiler.compile(&request);
        if let Some(unit) = output.unit {
            return Ok(unit);
        }
        for diagnostic in &output.diagnostics {
            tracing::warn!("Compiler: {}", diagnostic);
        }

        let Some(first) = output.diagnostics.first() else {
            return Err(CompileError::Failed {
                code: String::new(),
                message: "compiler reported no diagnostics".to_string(),
                line: None,
                hint: hint("").to_string(),
            });
        };

        if retried {
            return Err(failure(first));
        }
        let dropped = drop_unresolved(&mut request.modules, &output.diagnostics);
        if dropped.is_empty() {
            return Err(failure(first));
        }
        tracing::warn!("Dropping unresolved modules {:?} and compiling again", dropped);
        retried = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::host::compiler::UNRESOLVED_MODULE;
    use crate::test_utils::ScriptedCompiler;

    fn request() -> CompileRequest {
        CompileRequest {
            source: "class A {}".to_string(),
            modules: vec!["Demo.exe".to_string(), "Forms.dll".to_string()],
            framework_version: None,
        }
    }

    fn unresolved(module: &str) -> Diagnostic {
        Diagnostic::new(UNRESOLVED_MODULE, format!("Metadata file '{module}' could not be found"), None)
    }

    #[googletest::test]
    fn test_success_on_first_attempt() {
        let compiler = ScriptedCompiler::new();
        let requests = compiler.requests();

        let result = compile_with_retry(&compiler, request());

        expect_that!(result.is_ok(), eq(true));
        expect_that!(requests.borrow().len(), eq(1));
    }

    #[googletest::test]
    fn test_retries_without_unresolved_module() {
        let compiler = ScriptedCompiler::new().failing_with(vec![unresolved("forms.DLL")]);
        let requests = compiler.requests();

        let result = compile_with_retry(&compiler, request());

        expect_that!(result.is_ok(), eq(true));
        let requests = requests.borrow();
        expect_that!(requests.len(), eq(2));
        assert_eq!(requests.last().unwrap().modules, vec!["Demo.exe"]);
    }

    #[googletest::test]
    fn test_retries_only_once() {
        let compiler = ScriptedCompiler::new()
            .failing_with(vec![unresolved("Forms.dll")])
            .failing_with(vec![unresolved("Demo.exe")]);
        let requests = compiler.requests();

        let result = compile_with_retry(&compiler, request());

        expect_that!(
            matches!(result, Err(CompileError::Failed { ref code, .. }) if code == UNRESOLVED_MODULE),
            eq(true)
        );
        expect_that!(requests.borrow().len(), eq(2));
    }

    #[googletest::test]
    fn test_retry_drops_every_unresolved_module() {
        let compiler = ScriptedCompiler::new().failing_with(vec![
            Diagnostic::new("CS0246", "type or namespace not found", Some(4)),
            unresolved("a.dll"),
            unresolved("B.DLL"),
        ]);
        let requests = compiler.requests();
        let request = CompileRequest {
            modules: vec!["A.dll".to_string(), "B.dll".to_string(), "C.dll".to_string()],
            ..request()
        };

        let result = compile_with_retry(&compiler, request);

        expect_that!(result.is_ok(), eq(true));
        let requests = requests.borrow();
        expect_that!(requests.len(), eq(2));
        assert_eq!(requests.last().unwrap().modules, vec!["C.dll"]);
    }

    #[googletest::test]
    fn test_unknown_module_is_not_retried() {
        let compiler = ScriptedCompiler::new().failing_with(vec![unresolved("Other.dll")]);
        let requests = compiler.requests();

        let result = compile_with_retry(&compiler, request());

        expect_that!(result.is_err(), eq(true));
        expect_that!(requests.borrow().len(), eq(1));
    }

    #[rstest]
    #[case::missing_member(MISSING_MEMBER, "Please check - is property marked as public?")]
    #[case::other("CS1002", "Please correct .lang files.")]
    fn test_failure_reports_first_diagnostic(#[case] code: &str, #[case] expected_hint: &str) {
        let compiler = ScriptedCompiler::new().failing_with(vec![
            Diagnostic::new(code, "first", Some(12)),
            Diagnostic::new("CS9999", "second", Some(40)),
        ]);

        let err = compile_with_retry(&compiler, request()).err().unwrap();

        let CompileError::Failed { code: reported, message, line, hint } = err;
        assert_eq!(reported, code);
        assert_eq!(message, "first");
        assert_eq!(line, Some(12));
        assert_eq!(hint, expected_hint);
    }
}
