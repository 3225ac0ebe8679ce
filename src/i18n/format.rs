//! Named placeholder substitution.
//!
//! Templates use `{name}` fields. `{{` and `}}` produce literal braces.
//! Only plain names are supported; positional fields (`{}`, `{0}`),
//! attribute or index access and format specs are rejected.

use std::collections::HashMap;

use thiserror::Error;

/// Placeholder values supplied for one lookup.
pub type Placeholders = HashMap<String, String>;

/// Why a template could not be formatted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The template references a name that was not supplied.
    #[error("missing placeholder '{0}'")]
    Missing(String),
    /// A `{` without a matching `}`.
    #[error("single '{{' encountered in format string")]
    UnmatchedOpen,
    /// A `}` that does not close a field.
    #[error("single '}}' encountered in format string")]
    UnmatchedClose,
    /// `{}` or `{0}` style field.
    #[error("positional field '{{{0}}}' needs positional arguments")]
    Positional(String),
    /// Field with a conversion, format spec, attribute or index.
    #[error("unsupported placeholder field '{{{0}}}'")]
    Unsupported(String),
}

/// What: Substitute named placeholders into a template.
///
/// Inputs:
/// - `template`: Text such as `"Hello, {name}!"`
/// - `placeholders`: Values by name
///
/// Output:
/// - Formatted string
///
/// # Errors
/// - Returns `FormatError::Missing` for the first field without a value
/// - Returns another `FormatError` variant for malformed templates
///
/// Details:
/// - Errors are reported for the first problem found scanning left to right.
/// - Templates without fields are returned with only brace escapes resolved.
pub fn format_template(template: &str, placeholders: &Placeholders) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut field = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    match next {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(FormatError::Unsupported(field)),
                        other => field.push(other),
                    }
                }
                if !closed {
                    return Err(FormatError::UnmatchedOpen);
                }
                out.push_str(substitute(&field, placeholders)?);
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(FormatError::UnmatchedClose);
                }
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// What: Resolve one field body to its value.
fn substitute<'a>(field: &str, placeholders: &'a Placeholders) -> Result<&'a str, FormatError> {
    if field.is_empty() || field.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormatError::Positional(field.to_string()));
    }
    if field.contains([':', '!', '.', '[']) {
        return Err(FormatError::Unsupported(field.to_string()));
    }
    placeholders
        .get(field)
        .map(String::as_str)
        .ok_or_else(|| FormatError::Missing(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> Placeholders {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    /// What: Named fields are replaced, repeated fields included.
    fn substitutes_named_fields() {
        let p = values(&[("name", "Alice"), ("n", "3")]);
        assert_eq!(
            format_template("Hello, {name}!", &p),
            Ok("Hello, Alice!".to_string())
        );
        assert_eq!(
            format_template("{name} has {n} items, {name}", &p),
            Ok("Alice has 3 items, Alice".to_string())
        );
    }

    #[test]
    /// What: Missing names are reported by name.
    fn missing_placeholder() {
        assert_eq!(
            format_template("Hello, {name}!", &Placeholders::new()),
            Err(FormatError::Missing("name".to_string()))
        );
    }

    #[test]
    /// What: Doubled braces are literal; templates without fields pass through.
    fn brace_escapes() {
        let p = values(&[("x", "1")]);
        assert_eq!(
            format_template("{{x}} = {x}", &p),
            Ok("{x} = 1".to_string())
        );
        assert_eq!(
            format_template("plain text", &Placeholders::new()),
            Ok("plain text".to_string())
        );
    }

    #[test]
    /// What: Malformed templates are rejected with a specific error.
    fn malformed_templates() {
        let p = values(&[("name", "Alice")]);
        assert_eq!(
            format_template("Hello {name", &p),
            Err(FormatError::UnmatchedOpen)
        );
        assert_eq!(
            format_template("Hello name}", &p),
            Err(FormatError::UnmatchedClose)
        );
        assert_eq!(
            format_template("Hello {}", &p),
            Err(FormatError::Positional(String::new()))
        );
        assert_eq!(
            format_template("Hello {0}", &p),
            Err(FormatError::Positional("0".to_string()))
        );
        assert_eq!(
            format_template("Hello {name:>10}", &p),
            Err(FormatError::Unsupported("name:>10".to_string()))
        );
    }
}
