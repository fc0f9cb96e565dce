//! Personal name casing.

/// Trim, uppercase the first character and lowercase the rest.
///
/// Absent or empty input yields an empty string.
#[must_use]
pub fn format_name(name: Option<&str>) -> String {
    let mut chars = name.unwrap_or_default().trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Join formatted first and last names, without stray whitespace when either is empty.
#[must_use]
pub fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}
