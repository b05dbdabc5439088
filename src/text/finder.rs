//! Delimiter-bounded substring search.
//!
//! All functions work on byte offsets into UTF-8 text and never panic: cursors
//! past the end are clamped, and offsets that fall inside a multi-byte
//! character are moved to the next character boundary.

/// What `remove_between` deletes around the matched window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovePolicy {
    /// Delete only the interior; both delimiters stay.
    KeepDelimiters,
    /// Delete the interior together with both delimiters.
    WithDelimiters,
}

/// Moves `index` forward to the nearest character boundary, clamped to the text length.
fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Clamps a search position to `[0, len - 1]`.
const fn clamp_position(text: &str, position: usize) -> usize {
    let last = text.len().saturating_sub(1);
    if position < last { position } else { last }
}

/// Finds `needle` in `text` starting at `begin`.
///
/// Forward mode is an ordinal substring search from `begin`. Reverse mode walks
/// from `begin` down to 0 and returns the first position where `needle` starts.
///
/// # Examples
/// ```
/// use nlocalizer::text::finder::index_of;
///
/// assert_eq!(index_of("a.b.c", ".", 0, true), Some(1));
/// assert_eq!(index_of("a.b.c", ".", 4, false), Some(3));
/// assert_eq!(index_of("a.b.c", "x", 0, true), None);
/// ```
#[must_use]
pub fn index_of(text: &str, needle: &str, begin: usize, forward: bool) -> Option<usize> {
    if forward {
        let begin = ceil_char_boundary(text, begin);
        return text.get(begin..).and_then(|rest| rest.find(needle)).map(|found| found + begin);
    }

    (0..=begin.min(text.len()))
        .rev()
        .find(|&position| text.get(position..).is_some_and(|rest| rest.starts_with(needle)))
}

/// Returns the text between `before` and `after`, threading `cursor` through the call.
///
/// `before` is searched from `cursor` in the given direction; when found the
/// window starts right after it, otherwise the window starts at the end of the
/// text and the result is empty. `after` is searched from the window start; when
/// absent the window runs to the end of the text. An empty delimiter skips the
/// search on that side. On return `cursor` sits at the end of the returned slice,
/// so repeated calls walk successive delimited fields left to right.
///
/// # Examples
/// ```
/// use nlocalizer::text::finder::find_between;
///
/// let text = "<a><b>";
/// let mut cursor = 0;
/// assert_eq!(find_between(text, "<", ">", &mut cursor, true), "a");
/// assert_eq!(find_between(text, "<", ">", &mut cursor, true), "b");
/// assert_eq!(find_between(text, "<", ">", &mut cursor, true), "");
/// ```
pub fn find_between<'t>(
    text: &'t str,
    before: &str,
    after: &str,
    cursor: &mut usize,
    forward: bool,
) -> &'t str {
    let len = text.len();
    let mut start = ceil_char_boundary(text, *cursor);

    if !text.is_empty() && !before.is_empty() {
        start = index_of(text, before, clamp_position(text, start), forward)
            .map_or(len, |found| found + before.len());
    }

    let mut end = len;
    if !after.is_empty() {
        end = index_of(text, after, clamp_position(text, start), forward).unwrap_or(len);
    }

    let found = text.get(start..end.max(start)).unwrap_or_default();
    *cursor = start + found.len();
    found
}

/// Forward `find_between` from the start of the text.
#[must_use]
pub fn find_between_first<'t>(text: &'t str, before: &str, after: &str) -> &'t str {
    let mut cursor = 0;
    find_between(text, before, after, &mut cursor, true)
}

/// `find_between` over several candidate opening markers.
///
/// Every marker is tried from the same `cursor`; the match whose window ends
/// earliest wins, and ties go to the marker tried first. When nothing ends
/// before the end of the text the result is empty and `cursor` moves to the end.
pub fn find_between_any<'t>(
    text: &'t str,
    befores: &[&str],
    after: &str,
    cursor: &mut usize,
    forward: bool,
) -> &'t str {
    let mut best_position = text.len();
    let mut best = "";

    for before in befores {
        let mut position = *cursor;
        let found = find_between(text, before, after, &mut position, forward);
        if position < best_position {
            best = found;
            best_position = position;
        }
    }

    *cursor = best_position;
    best
}

/// Removes the first window bounded by `before` and `after`.
///
/// Returns the text unchanged when `before` is not found. When `after` is not
/// found the window runs to the end of the text.
#[must_use]
pub fn remove_between(text: &str, before: &str, after: &str, policy: RemovePolicy) -> String {
    let open = if before.is_empty() { Some(0) } else { text.find(before) };
    let Some(open) = open else {
        return text.to_string();
    };

    let interior_start = open + before.len();
    let close = find_after(text, after, interior_start);

    let (cut_start, cut_end) = match policy {
        RemovePolicy::KeepDelimiters => (interior_start, close.unwrap_or(text.len())),
        RemovePolicy::WithDelimiters => {
            (open, close.map_or(text.len(), |position| position + after.len()))
        }
    };

    let mut result = String::with_capacity(text.len());
    result.push_str(text.get(..cut_start).unwrap_or_default());
    result.push_str(text.get(cut_end..).unwrap_or_default());
    result
}

/// Removes every window bounded by `before` and `after`.
///
/// # Examples
/// ```
/// use nlocalizer::text::finder::{RemovePolicy, remove_between_all};
///
/// let text = "a<b>c<d>e";
/// assert_eq!(remove_between_all(text, "<", ">", RemovePolicy::WithDelimiters), "ace");
/// assert_eq!(remove_between_all(text, "<", ">", RemovePolicy::KeepDelimiters), "a<>c<>e");
/// ```
#[must_use]
pub fn remove_between_all(text: &str, before: &str, after: &str, policy: RemovePolicy) -> String {
    match policy {
        RemovePolicy::WithDelimiters => {
            let mut result = text.to_string();
            loop {
                let next = remove_between(&result, before, after, policy);
                if next.len() >= result.len() {
                    return result;
                }
                result = next;
            }
        }
        RemovePolicy::KeepDelimiters => empty_all_windows(text, before, after),
    }
}

/// Empties each delimited window in turn, scanning left to right.
///
/// The delimiters survive, so the text cannot shrink to a fixed point the way
/// `WithDelimiters` does; a cursor past the last closing delimiter bounds the loop instead.
fn empty_all_windows(text: &str, before: &str, after: &str) -> String {
    let mut result = text.to_string();
    let mut cursor = 0;

    loop {
        let open = if before.is_empty() {
            Some(cursor)
        } else {
            result.get(cursor..).and_then(|rest| rest.find(before)).map(|found| found + cursor)
        };
        let Some(open) = open else {
            return result;
        };

        let interior_start = open + before.len();
        let Some(close) = find_after(&result, after, interior_start) else {
            result.truncate(interior_start);
            return result;
        };

        result.replace_range(interior_start..close, "");
        cursor = interior_start + after.len();
        if cursor >= result.len() {
            return result;
        }
    }
}

/// Finds a non-empty closing delimiter at or after `from`.
fn find_after(text: &str, after: &str, from: usize) -> Option<usize> {
    if after.is_empty() {
        return None;
    }
    text.get(from..).and_then(|rest| rest.find(after)).map(|found| found + from)
}
