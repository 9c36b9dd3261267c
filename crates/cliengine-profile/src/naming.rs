//! Identifier derivation from display names.

/// Convert a display name to a snake_case identifier.
///
/// Spaces and hyphens become underscores, word boundaries inside camelCase
/// and PascalCase get an underscore, and the result is lowercased.
/// Acronyms stay together: `HTTPRequest` becomes `http_request`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev != '_'
                && (prev.is_lowercase() || prev.is_ascii_digit() || next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case() {
        assert_eq!(to_snake_case("camelCaseString"), "camel_case_string");
    }

    #[test]
    fn pascal_case() {
        assert_eq!(to_snake_case("PascalCase"), "pascal_case");
    }

    #[test]
    fn spaces_and_underscores() {
        assert_eq!(to_snake_case("some mixed_string"), "some_mixed_string");
        assert_eq!(to_snake_case("My Hero"), "my_hero");
    }

    #[test]
    fn hyphens() {
        assert_eq!(to_snake_case("dark-knight"), "dark_knight");
    }

    #[test]
    fn acronyms() {
        assert_eq!(to_snake_case("HTTPRequest"), "http_request");
        assert_eq!(to_snake_case("ABC"), "abc");
    }

    #[test]
    fn digits_before_capital() {
        assert_eq!(to_snake_case("save2Slot"), "save2_slot");
    }

    #[test]
    fn already_snake() {
        assert_eq!(to_snake_case("a_1"), "a_1");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn no_double_underscore_after_separator() {
        assert_eq!(to_snake_case("Big Boss"), "big_boss");
    }
}
