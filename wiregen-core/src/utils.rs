//! Identifier case conversion shared by the code generators.

fn is_separator(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// Convert an IDL identifier to PascalCase.
///
/// Accepts ALLCAPS, snake_case, kebab-case or mixed input. Words written
/// entirely in capitals are folded ("HTTP_ERROR" -> "HttpError"); words
/// that already mix cases keep their humps ("fooBar" -> "FooBar").
pub fn to_pascal_case(s: &str) -> String {
    s.split(is_separator)
        .filter(|word| !word.is_empty())
        .map(|word| {
            let shouted = !word.chars().any(char::is_lowercase);
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) if shouted => c
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert an IDL identifier to snake_case (e.g., "HTTPServer" -> "http_server")
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 && !result.is_empty() && !result.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }

    while result.ends_with('_') {
        result.pop();
    }
    result
}

/// Convert an IDL identifier to SCREAMING_SNAKE_CASE (e.g., "maxSize" -> "MAX_SIZE")
pub fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// Turn arbitrary text into a valid identifier.
///
/// Characters outside `[A-Za-z0-9_]` become underscores and a leading
/// digit is prefixed with one. Empty input yields `_`.
pub fn sanitize_identifier(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}
