//! `{name}` placeholder tokens in text content.
//!
//! Placeholders are filled in by the host program at print time. The script
//! marks a literal that contains one as interpolated (`$"..."`); the editor's
//! preview substitutes sample values.

use std::collections::BTreeMap;

/// Whether any line of `text` has a `{` followed later on the same line by `}`.
pub fn contains_placeholder(text: &str) -> bool {
    text.lines().any(|line| {
        line.find('{')
            .is_some_and(|open| line[open + 1..].contains('}'))
    })
}

/// Names of the well-formed `{name}` placeholders in `text`, in order of
/// appearance. Empty braces and names containing whitespace are skipped.
pub fn placeholder_names(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        let name = &after[..close];
        if !name.is_empty() && !name.contains(char::is_whitespace) && !name.contains('{') {
            names.push(name);
            rest = &after[close + 1..];
        } else {
            rest = after;
        }
    }
    names
}

/// Replace every `{key}` with its value. Placeholders without a value are
/// left as written.
pub fn substitute(text: &str, variables: &BTreeMap<String, String>) -> String {
    let mut out = text.to_string();
    for (key, value) in variables {
        let token = format!("{{{key}}}");
        if out.contains(&token) {
            out = out.replace(&token, value);
        }
    }
    out
}
