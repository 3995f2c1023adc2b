//! Member name conventions.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::config::TextCase;

/// Applies `case` to a declared member name.
///
/// Words are split on `_`, `-` and case changes; a run of capitals is one
/// word (`HTTPServer` is `HTTP` + `Server`).
///
/// ```
/// use vc_serial::config::TextCase;
/// use vc_serial::convert::text_case::apply;
///
/// assert_eq!(apply(TextCase::CamelCase, "FooBar"), "fooBar");
/// assert_eq!(apply(TextCase::CamelCase, "first_name"), "firstName");
/// assert_eq!(apply(TextCase::PascalCase, "first_name"), "FirstName");
/// assert_eq!(apply(TextCase::SnakeCase, "HTTPServer"), "http_server");
/// assert_eq!(apply(TextCase::Default, "as_is"), "as_is");
/// ```
pub fn apply(case: TextCase, name: &str) -> Cow<'_, str> {
    match case {
        TextCase::Default => Cow::Borrowed(name),
        TextCase::PascalCase => {
            let mut out = String::with_capacity(name.len());
            for word in words(name) {
                push_capitalized(&mut out, word);
            }
            Cow::Owned(out)
        }
        TextCase::CamelCase => {
            let mut out = String::with_capacity(name.len());
            for (index, word) in words(name).into_iter().enumerate() {
                if index == 0 {
                    out.extend(word.chars().map(|c| c.to_ascii_lowercase()));
                } else {
                    push_capitalized(&mut out, word);
                }
            }
            Cow::Owned(out)
        }
        TextCase::SnakeCase => {
            let mut out = String::with_capacity(name.len() + 4);
            for (index, word) in words(name).into_iter().enumerate() {
                if index > 0 {
                    out.push('_');
                }
                out.extend(word.chars().map(|c| c.to_ascii_lowercase()));
            }
            Cow::Owned(out)
        }
    }
}

/// Folds a name for lenient matching: no `_` or `-`, ASCII lowercase.
pub fn fold_lenient(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
    }
}

fn words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for part in name.split(['_', '-']).filter(|p| !p.is_empty()) {
        let chars: Vec<(usize, char)> = part.char_indices().collect();
        let mut start = 0;
        for i in 1..chars.len() {
            let (index, c) = chars[i];
            let prev = chars[i - 1].1;
            let next_lower = chars.get(i + 1).is_some_and(|(_, n)| n.is_lowercase());
            let boundary = (c.is_uppercase() && prev.is_lowercase())
                || (c.is_uppercase() && prev.is_uppercase() && next_lower)
                || (c.is_ascii_digit() != prev.is_ascii_digit() && c.is_uppercase());
            if boundary {
                words.push(&part[start..index]);
                start = index;
            }
        }
        words.push(&part[start..]);
    }
    words
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{apply, fold_lenient};
    use crate::config::TextCase;

    #[test]
    fn conversions() {
        let cases = [
            ("FooBar", "fooBar", "FooBar", "foo_bar"),
            ("foo_bar", "fooBar", "FooBar", "foo_bar"),
            ("Id", "id", "Id", "id"),
            ("ID", "id", "ID", "id"),
            ("customerID", "customerID", "CustomerID", "customer_id"),
            ("HTTPServer", "httpServer", "HTTPServer", "http_server"),
            ("Value2", "value2", "Value2", "value2"),
        ];
        for (name, camel, pascal, snake) in cases {
            assert_eq!(apply(TextCase::CamelCase, name), camel, "{name}");
            assert_eq!(apply(TextCase::PascalCase, name), pascal, "{name}");
            assert_eq!(apply(TextCase::SnakeCase, name), snake, "{name}");
        }
    }

    #[test]
    fn lenient_folding() {
        assert_eq!(fold_lenient("First_Name"), "firstname");
        assert_eq!(fold_lenient("first-name"), "firstname");
    }
}
