use std::str::FromStr;

/// Parses trimmed `text` as `T`, returning `zero` when it does not parse.
///
/// Table cells extracted from the report are often empty or hold stray
/// characters, so coercion never fails.
pub fn parse_or_default<T: FromStr>(text: &str, zero: T) -> T {
    text.trim().parse().unwrap_or(zero)
}

/// Title-cases `text`: a letter following another letter is lower-cased,
/// every other letter is upper-cased.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}
