use std::sync::OnceLock;

use regex::Regex;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

/// Comma separated form value into a trimmed list; blank entries are dropped.
pub fn split_list(value: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect();

    (!items.is_empty()).then_some(items)
}

/// Only same-site absolute paths are followed after sign-in.
pub fn sanitize_destination(path: &str) -> Option<String> {
    let path = path.trim();
    if path.starts_with('/') && !path.starts_with("//") {
        Some(path.to_string())
    } else {
        None
    }
}
