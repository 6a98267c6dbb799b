//! Second-level-domain extraction.

/// Registrable domain of `name`: the label left of the public suffix plus the suffix.
///
/// Names under a suffix the public suffix list doesn't know (e.g. `.invalid`)
/// fall back to their last two labels. Single-label names are returned as
/// they are. An empty name has no second-level domain. Names are compared
/// case-insensitively and returned in lowercase without a trailing dot.
pub fn second_level_domain(name: &str) -> Option<String> {
    let name = name.trim_end_matches('.').to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }

    if let Some(domain) = psl::domain(name.as_bytes()) {
        if domain.suffix().is_known() {
            if let Ok(domain) = std::str::from_utf8(domain.as_bytes()) {
                return Some(domain.to_string());
            }
        }
    }

    let labels: Vec<&str> = name.split('.').collect();
    match labels.as_slice() {
        [.., second, top] => Some(format!("{second}.{top}")),
        _ => Some(name),
    }
}
