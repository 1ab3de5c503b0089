//! Shared utility helpers.

use std::collections::HashSet;

/// Case-insensitive substring search without allocating an uppercase copy.
#[inline]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle_bytes = needle.as_bytes();
    let haystack_bytes = haystack.as_bytes();
    if needle_bytes.len() > haystack_bytes.len() {
        return false;
    }
    haystack_bytes
        .windows(needle_bytes.len())
        .any(|window| window.eq_ignore_ascii_case(needle_bytes))
}

/// Upper-case the first character and leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title-case every run of letters: the first letter of a run is upper-cased,
/// the rest lower-cased. Any non-letter starts a new run, so `abc1def`
/// becomes `Abc1Def`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
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

/// Turn a column name into a header label.
///
/// `order_total` -> `Order Total`, `customerName` -> `Customer Name`.
pub fn humanize_label(field_name: &str) -> String {
    let mut spaced = String::with_capacity(field_name.len() + 4);
    let mut prev: Option<char> = None;
    for c in field_name.chars() {
        if c == '_' {
            spaced.push(' ');
        } else {
            if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase()) {
                spaced.push(' ');
            }
            spaced.push(c);
        }
        prev = Some(c);
    }
    title_case(&spaced)
}

/// Derive a report item identifier from a field name.
///
/// Report item names only allow letters, digits and underscores; everything
/// else is replaced with `_`.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Sanitized identifiers for a list of names, unique ignoring case.
///
/// A name whose identifier is already taken gets the first free `_2`, `_3`, ...
/// suffix, so `Total Sales` and `Total_Sales` become `Total_Sales` and
/// `Total_Sales_2`.
pub fn unique_identifiers<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut identifiers = Vec::new();
    for name in names {
        let base = sanitize_identifier(name);
        let mut identifier = base.clone();
        let mut suffix = 2;
        while !taken.insert(identifier.to_ascii_lowercase()) {
            identifier = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        identifiers.push(identifier);
    }
    identifiers
}
