//! Extraction of `@name` mentions from comment and review bodies.

use std::collections::HashSet;

use crate::ids::UserId;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '-' || c == '_'
}

/// Extract every user mentioned in `text`.
///
/// A mention is `@` followed by one or more ASCII letters, hyphens or
/// underscores; the name runs until the first character outside that set.
/// A bare `@` (or `@` followed by anything else) is not a mention.
///
/// Names are returned in order of first appearance with duplicates removed.
/// Matching is case-sensitive: `@Bob` and `@bob` are different users.
///
/// # Example
///
/// ```
/// use herald_core::mentions::extract_mentions;
///
/// let mentions = extract_mentions("@carol can you look? cc @dave_x, @carol");
/// let names: Vec<&str> = mentions.iter().map(|u| u.as_str()).collect();
/// assert_eq!(names, ["carol", "dave_x"]);
/// ```
pub fn extract_mentions(text: &str) -> Vec<UserId> {
    let mut seen = HashSet::new();
    let mut mentions = Vec::new();

    let mut rest = text;
    while let Some(at) = rest.find('@') {
        let after = &rest[at + 1..];
        let name_len = after
            .find(|c: char| !is_name_char(c))
            .unwrap_or(after.len());

        if name_len > 0 {
            let name = &after[..name_len];
            if seen.insert(name) {
                mentions.push(UserId::from(name));
            }
        }

        // Name characters are all ASCII, so this is always a char boundary
        rest = &after[name_len..];
    }

    mentions
}
