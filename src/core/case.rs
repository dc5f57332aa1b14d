//! Case conversion for field names and service identifiers
//!
//! Validation messages embed field names in camelCase while error bags stay
//! keyed by the raw wire name; service names are reported in snake_case.

use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern compiles"));

static WORD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("static pattern compiles"));

/// Convert an identifier to lower camelCase
///
/// Words are split on any run of non-alphanumeric characters. A word that is
/// entirely uppercase is treated as an acronym and lowercased before it is
/// capitalized.
///
/// # Examples
///
/// ```
/// use restkit::core::case::to_camel_case;
///
/// assert_eq!(to_camel_case("username"), "username");
/// assert_eq!(to_camel_case("first_name"), "firstName");
/// assert_eq!(to_camel_case("api-key id"), "apiKeyId");
/// assert_eq!(to_camel_case("URL_path"), "urlPath");
/// ```
pub fn to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (index, word) in WORD_SEPARATOR
        .split(input)
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let word = if is_acronym(word) {
            word.to_lowercase()
        } else {
            word.to_string()
        };

        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if index == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }

    out
}

/// Convert free text to snake_case
///
/// The input is lowercased and every run of characters that are not ASCII
/// letters or digits collapses into a single underscore. Leading and
/// trailing underscores are dropped.
///
/// # Examples
///
/// ```
/// use restkit::core::case::to_snake_case;
///
/// assert_eq!(to_snake_case("HEY DOES THIS WORK"), "hey_does_this_work");
/// assert_eq!(to_snake_case("talk about . this bro"), "talk_about_this_bro");
/// ```
pub fn to_snake_case(input: &str) -> String {
    let lowered = input.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

fn is_acronym(word: &str) -> bool {
    word.len() > 1 && word.chars().all(|c| !c.is_lowercase())
}
