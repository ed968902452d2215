//! Entity id derivation for new portfolio records.

use chrono::{DateTime, Utc};

use crate::constants::ENTITY_ID_SLUG_MAX_CHARS;

/// Derive the id of a new record from its title and creation time.
///
/// The title is lower-cased and stripped of everything except ASCII letters,
/// digits and Hangul syllables, then truncated to 20 characters and suffixed
/// with `_` and the creation time in Unix milliseconds. No uniqueness check is
/// made.
pub fn generate_entity_id(title: &str, created_at: DateTime<Utc>) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .filter(|c| is_slug_char(*c))
        .take(ENTITY_ID_SLUG_MAX_CHARS)
        .collect();

    format!("{}_{}", slug, created_at.timestamp_millis())
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ('가'..='힣').contains(&c)
}
