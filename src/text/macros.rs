//! `$(name)` macro tokens inside translated messages.
//!
//! A macro name ends at the first unmatched `)`, so names may carry balanced
//! parentheses of their own: `$(Now.ToString("d"))` names `Now.ToString("d")`.

/// Opening marker of a macro token.
pub const MACRO_OPEN: &str = "$(";

/// A macro name located inside a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MacroSpan<'t> {
    /// The macro name, without the surrounding `$(` and `)`.
    name: &'t str,
    /// Byte offset just past the closing `)`, or the end of the text.
    end: usize,
    /// Whether a closing `)` was found.
    closed: bool,
}

/// Scans a macro name starting right after `$(`.
fn scan_name(text: &str, start: usize) -> MacroSpan<'_> {
    let rest = text.get(start..).unwrap_or_default();
    let mut depth = 0_usize;

    for (offset, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => {
                return MacroSpan {
                    name: rest.get(..offset).unwrap_or_default(),
                    end: start + offset + 1,
                    closed: true,
                };
            }
            ')' => depth -= 1,
            _ => {}
        }
    }

    MacroSpan { name: rest, end: text.len(), closed: false }
}

/// Formats `name` as a macro token.
#[must_use]
pub fn token(name: &str) -> String {
    format!("{MACRO_OPEN}{name})")
}

/// Returns the macro names used in `message`, deduplicated in first-seen order.
///
/// # Examples
/// ```
/// use nlocalizer::text::macros::get_macros;
///
/// assert_eq!(get_macros("$(A) and $(B(C)) and $(A)"), vec!["A", "B(C)"]);
/// ```
#[must_use]
pub fn get_macros(message: &str) -> Vec<String> {
    let mut macros: Vec<String> = Vec::new();
    let mut cursor = 0;

    while let Some(found) = message.get(cursor..).and_then(|rest| rest.find(MACRO_OPEN)) {
        let span = scan_name(message, cursor + found + MACRO_OPEN.len());
        if !macros.iter().any(|known| known == span.name) {
            macros.push(span.name.to_string());
        }
        cursor = span.end;
    }

    macros
}

/// Replaces `$(name)` for every name in `macros` with `resolver(name)`.
///
/// Names are processed in list order.
#[must_use]
pub fn replace<S, F>(message: &str, macros: &[S], mut resolver: F) -> String
where
    S: AsRef<str>,
    F: FnMut(&str) -> String,
{
    let mut message = message.to_string();
    for name in macros {
        let name = name.as_ref();
        let token = token(name);
        if message.contains(&token) {
            message = message.replace(&token, &resolver(name));
        }
    }
    message
}

/// Replaces every macro found in `message` itself.
#[must_use]
pub fn replace_own<F>(message: &str, resolver: F) -> String
where
    F: FnMut(&str) -> String,
{
    replace(message, &get_macros(message), resolver)
}

/// Replaces macros from a precomputed name → text mapping.
#[must_use]
pub fn replace_with_map<'m, I>(message: &str, replacements: I) -> String
where
    I: IntoIterator<Item = (&'m String, &'m String)>,
{
    replacements
        .into_iter()
        .fold(message.to_string(), |message, (name, text)| message.replace(&token(name), text))
}

/// Turns `$(name)` into `$(N)`, N being the 1-based position of `name` in `macros`.
///
/// # Examples
/// ```
/// use nlocalizer::text::macros::{get_macros, names_to_numbers, numbers_to_names};
///
/// let message = "$(First) $(Second)";
/// let macros = get_macros(message);
/// let numbered = names_to_numbers(message, &macros);
/// assert_eq!(numbered, "$(1) $(2)");
/// assert_eq!(numbers_to_names(&numbered, &macros), message);
/// ```
#[must_use]
pub fn names_to_numbers<S: AsRef<str>>(message: &str, macros: &[S]) -> String {
    expand(message, |name| {
        macros
            .iter()
            .position(|known| known.as_ref() == name)
            .map(|index| token(&(index + 1).to_string()))
    })
}

/// Inverse of [`names_to_numbers`].
///
/// Tokens are swapped in one pass, so a macro literally named `2` is never
/// confused with the placeholder `$(2)`.
#[must_use]
pub fn numbers_to_names<S: AsRef<str>>(message: &str, macros: &[S]) -> String {
    expand(message, |number| {
        let index = number.parse::<usize>().ok()?.checked_sub(1)?;
        macros.get(index).map(|name| token(name.as_ref()))
    })
}

/// Single-pass placeholder expansion.
///
/// Each closed `$(name)` for which `lookup` returns text is replaced by it.
/// Inserted text is never rescanned, and unknown placeholders are kept verbatim.
pub(crate) fn expand<F>(text: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(found) = text.get(cursor..).and_then(|rest| rest.find(MACRO_OPEN)) {
        let open = cursor + found;
        out.push_str(text.get(cursor..open).unwrap_or_default());

        let span = scan_name(text, open + MACRO_OPEN.len());
        match lookup(span.name).filter(|_| span.closed) {
            Some(value) => {
                out.push_str(&value);
                cursor = span.end;
            }
            None => {
                out.push_str(MACRO_OPEN);
                cursor = open + MACRO_OPEN.len();
            }
        }
    }

    out.push_str(text.get(cursor..).unwrap_or_default());
    out
}
