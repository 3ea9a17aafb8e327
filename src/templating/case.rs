//! Case-conversion helpers shared by the `to*Case` template functions.
//!
//! Each one strips everything except ASCII alphanumerics, `-`, `_`, and
//! space, treating any run of those three as a single word boundary, then
//! re-joins on the target separator — so `"My Cool  App!!"` and
//! `"my-cool_app"` both normalize to the same two words.

fn words(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .map(|word| word.chars().filter(char::is_ascii_alphanumeric).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect()
}

fn join(input: &str, sep: char, case: fn(&str) -> String) -> String {
    words(input).iter().map(|w| case(w)).collect::<Vec<_>>().join(&sep.to_string())
}

fn lower(s: &str) -> String {
    s.to_lowercase()
}

fn upper(s: &str) -> String {
    s.to_uppercase()
}

fn as_is(s: &str) -> String {
    s.to_string()
}

pub fn to_snake_case(input: &str) -> String {
    join(input, '_', as_is)
}

pub fn to_lower_snake_case(input: &str) -> String {
    join(input, '_', lower)
}

pub fn to_upper_snake_case(input: &str) -> String {
    join(input, '_', upper)
}

pub fn to_hyphen_case(input: &str) -> String {
    join(input, '-', as_is)
}

pub fn to_lower_hyphen_case(input: &str) -> String {
    join(input, '-', lower)
}

pub fn to_upper_hyphen_case(input: &str) -> String {
    join(input, '-', upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_joins_space_separated_words() {
        assert_eq!(to_lower_snake_case("My Cool App"), "my_cool_app");
    }

    #[test]
    fn hyphen_case_normalizes_mixed_separators() {
        assert_eq!(to_lower_hyphen_case("My Cool_App"), "my-cool-app");
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(to_upper_snake_case("my-cool app!!"), "MY_COOL_APP");
    }
}
