//! Built-in helper transforms invocable from `{{helper:<name> <path>}}` tokens.
//! Helpers always receive the stringified value of their argument path and
//! produce plain text.

/// The fixed set of built-in text helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    Capitalize,
    Uppercase,
    Lowercase,
    Kebabcase,
    Pascalcase,
    Camelcase,
    Snakecase,
}

impl Helper {
    /// Looks up a helper by its template-facing name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "capitalize" => Some(Self::Capitalize),
            "uppercase" => Some(Self::Uppercase),
            "lowercase" => Some(Self::Lowercase),
            "kebabcase" => Some(Self::Kebabcase),
            "pascalcase" => Some(Self::Pascalcase),
            "camelcase" => Some(Self::Camelcase),
            "snakecase" => Some(Self::Snakecase),
            _ => None,
        }
    }

    /// Applies the transform to the given input text.
    pub fn apply(self, input: &str) -> String {
        match self {
            Self::Capitalize => capitalize(input),
            Self::Uppercase => input.to_uppercase(),
            Self::Lowercase => input.to_lowercase(),
            Self::Kebabcase => delimited_case(input, '-'),
            Self::Pascalcase => pascal_case(input),
            Self::Camelcase => camel_case(input),
            Self::Snakecase => delimited_case(input, '_'),
        }
    }
}

/// Applies the helper named `name` to `input`.
///
/// Unknown helper names fail soft and produce an empty string, so one bad
/// token cannot abort a whole render.
pub fn apply_named(name: &str, input: &str) -> String {
    match Helper::from_name(name) {
        Some(helper) => helper.apply(input),
        None => String::new(),
    }
}

/// Uppercases the first character only; the rest of the input is untouched.
fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Lowercases the input, splitting words on camel boundaries, spaces,
/// hyphens and underscores, then joins them with `sep`.
fn delimited_case(input: &str, sep: char) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower = false;
    for ch in input.chars() {
        if ch == ' ' || ch == '-' || ch == '_' {
            if !out.is_empty() && !out.ends_with(sep) {
                out.push(sep);
            }
            prev_lower = false;
        } else if ch.is_uppercase() {
            if prev_lower && !out.is_empty() && !out.ends_with(sep) {
                out.push(sep);
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

/// Splits on hyphens, underscores and spaces and uppercases each word's
/// first character. Characters inside a word keep their case.
fn pascal_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut upper_next = true;
    for ch in input.chars() {
        if ch == '-' || ch == '_' || ch == ' ' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Pascal case with the leading character lowered.
fn camel_case(input: &str) -> String {
    let pascal = pascal_case(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
