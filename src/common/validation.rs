//! Validation of room names and usernames.
//!
//! Both share one token grammar: alphanumeric runs separated by single `.`,
//! `_` or `-` characters. Validation runs at the HTTP boundary, before any
//! name reaches the room directory or the user store.

use once_cell::sync::Lazy;
use regex::Regex;

static NAME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-zA-Z0-9]+([._-][a-zA-Z0-9]+)*$").expect("name regex compiles"));

/// Longest accepted room name.
pub const MAX_ROOM_NAME_LENGTH: usize = 64;

/// Username length bounds.
pub const MIN_USERNAME_LENGTH: usize = 4;
pub const MAX_USERNAME_LENGTH: usize = 20;

/// Check whether `name` is an acceptable room name.
pub fn is_valid_room_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_ROOM_NAME_LENGTH && NAME_TOKEN.is_match(name)
}

/// Check whether `username` is an acceptable username.
pub fn is_valid_username(username: &str) -> bool {
    (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&username.len())
        && NAME_TOKEN.is_match(username)
}
