//! # Raw Token Parsing
//!
//! Legacy schemes fold negation into the permission string itself: a
//! leading `-` or `!` means "explicitly denied", a leading `+` means
//! "explicitly granted". The parser strips the sign and returns the bare
//! name with the decoded value.
//!
//! Empty tokens are never passed in — callers skip empty permission
//! strings before parsing.

/// Split a raw permission token into its name and boolean value.
///
/// If the token is longer than one character and starts with `-` or `!`,
/// the sign is stripped and the value is `false`; a leading `+` is
/// stripped and the value is `true`. Otherwise the token is returned
/// unchanged with `default_value`. A single-character token is never
/// treated as a sign.
pub fn parse_node(token: &str, default_value: bool) -> (&str, bool) {
    if token.len() > 1 {
        match token.as_bytes()[0] {
            b'-' | b'!' => return (&token[1..], false),
            b'+' => return (&token[1..], true),
            _ => {}
        }
    }
    (token, default_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minus_and_bang_negate() {
        assert_eq!(parse_node("-some.perm", true), ("some.perm", false));
        assert_eq!(parse_node("!some.perm", true), ("some.perm", false));
        assert_eq!(parse_node("-some.perm", false), ("some.perm", false));
    }

    #[test]
    fn test_plus_forces_true() {
        assert_eq!(parse_node("+some.perm", false), ("some.perm", true));
        assert_eq!(parse_node("+some.perm", true), ("some.perm", true));
    }

    #[test]
    fn test_unsigned_tokens_keep_default() {
        assert_eq!(parse_node("some.perm", true), ("some.perm", true));
        assert_eq!(parse_node("some.perm", false), ("some.perm", false));
    }

    #[test]
    fn test_single_character_tokens_are_never_stripped() {
        assert_eq!(parse_node("-", true), ("-", true));
        assert_eq!(parse_node("!", false), ("!", false));
        assert_eq!(parse_node("+", false), ("+", false));
        assert_eq!(parse_node("*", true), ("*", true));
    }
}
