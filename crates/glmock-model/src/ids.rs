//! Object identifier generation.
use uuid::Uuid;

/// Length of a generated identifier in hex characters.
pub const OBJECT_ID_LEN: usize = 24;

/// Generate a new opaque identifier shaped like a 12-byte object id
/// (24 lowercase hex characters).
pub fn new_object_id() -> String {
    let mut raw = Uuid::new_v4().simple().to_string();
    raw.truncate(OBJECT_ID_LEN);
    raw
}

/// Check whether `value` has the shape produced by [`new_object_id`].
pub fn is_object_id(value: &str) -> bool {
    value.len() == OBJECT_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
