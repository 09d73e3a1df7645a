//! Token normalization: whitespace splitting, punctuation stripping, lower-casing.

/// ASCII punctuation recognised at the edges of a token.
const PUNCTUATION_CHARS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

#[inline]
fn is_punctuation(c: char) -> bool {
    c.is_ascii() && PUNCTUATION_CHARS.contains(c)
}

/// Strips leading and trailing punctuation. Punctuation inside the token is kept,
/// and whitespace is not punctuation.
pub fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(is_punctuation)
}

/// Token separators: space, tab, newline, carriage return and form feed.
/// Other Unicode spaces, such as U+00A0, are part of a token.
#[inline]
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// Splits a line on whitespace and yields the normalized, non-empty words.
pub fn tokenize(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split(is_separator)
        .map(strip_punctuation)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_the_edges() {
        assert_eq!(strip_punctuation(""), "");
        assert_eq!(strip_punctuation("abc"), "abc");
        assert_eq!(strip_punctuation(",.!"), "");
        assert_eq!(strip_punctuation(PUNCTUATION_CHARS), "");
        assert_eq!(strip_punctuation("/abc"), "abc");
        assert_eq!(strip_punctuation("abc/"), "abc");
        assert_eq!(strip_punctuation("/abc/"), "abc");
        assert_eq!(strip_punctuation("/ab/c/"), "ab/c");
        assert_eq!(strip_punctuation("a+b-c"), "a+b-c");
    }

    #[test]
    fn whitespace_is_not_punctuation() {
        assert_eq!(strip_punctuation(" abc "), " abc ");
        assert_eq!(strip_punctuation(" ab\tc "), " ab\tc ");
    }

    #[test]
    fn mixed_leading_and_trailing_runs() {
        let token = format!("{PUNCTUATION_CHARS}AB/C{PUNCTUATION_CHARS}");
        assert_eq!(strip_punctuation(&token), "AB/C");
    }

    #[test]
    fn non_ascii_is_kept() {
        assert_eq!(strip_punctuation("«zażółć»"), "«zażółć»");
        assert_eq!(strip_punctuation("(naïve)."), "naïve");
    }

    #[test]
    fn tokenize_normalizes_case() {
        let words: Vec<String> = tokenize("<a b> ,,B \tc a, b. A!").collect();
        assert_eq!(words, ["a", "b", "b", "c", "a", "b", "a"]);
    }

    #[test]
    fn only_ascii_separators_split() {
        let words: Vec<String> = tokenize("a\u{a0}b c\x0cd\u{2028}e\t\tf").collect();
        assert_eq!(words, ["a\u{a0}b", "c", "d\u{2028}e", "f"]);
    }

    #[test]
    fn tokenize_drops_pure_punctuation() {
        assert_eq!(tokenize("-- ... !!").count(), 0);
        assert_eq!(tokenize("").count(), 0);
    }
}
