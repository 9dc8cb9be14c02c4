//! Slugification of entity names
//!
//! Slugs are the lower-case, hyphen-separated tokens used for page paths
//! and same-page anchors in the rendered documentation.

/// Namespace separator used in qualified paths
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Convert a single name segment into a slug.
///
/// Word boundaries are taken from underscores, punctuation and case changes,
/// so `reboot_cosmos`, `RebootCosmos` and `REBOOT_COSMOS` all become
/// `reboot-cosmos`. Trailing method markers (`?`, `!`, `=`) are dropped.
/// Only ASCII letters and digits survive; anything else separates words.
pub fn slugify(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut slug = String::with_capacity(segment.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            push_hyphen(&mut slug);
            continue;
        }

        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                push_hyphen(&mut slug);
            }
        }

        slug.push(c.to_ascii_lowercase());
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Convert a qualified name (`Space::Cosmos`) into a page path (`space/cosmos`).
///
/// A leading separator is stripped first. An empty name yields an empty path.
pub fn slugify_path(qualified: &str) -> String {
    let trimmed = qualified
        .strip_prefix(NAMESPACE_SEPARATOR)
        .unwrap_or(qualified);

    if trimmed.is_empty() {
        return String::new();
    }

    trimmed
        .split(NAMESPACE_SEPARATOR)
        .map(slugify)
        .collect::<Vec<_>>()
        .join("/")
}

fn push_hyphen(slug: &mut String) {
    if !slug.is_empty() && !slug.ends_with('-') {
        slug.push('-');
    }
}
