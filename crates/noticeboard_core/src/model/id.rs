//! Notice identifier generation.
//!
//! # Responsibility
//! - Produce unique, opaque notice ids of the form
//!   `notice_<epoch-ms>_<random base-36 suffix>`.
//!
//! # Invariants
//! - The random suffix is at least 9 characters; this module uses 12, so a
//!   collision within one process lifetime is negligible rather than merely
//!   unlikely.

use chrono::Utc;
use rand::Rng;

/// Opaque stable identifier for a notice.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoticeId = String;

const ID_PREFIX: &str = "notice";
const RANDOM_SUFFIX_LEN: usize = 12;
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh notice id from the current wall clock.
pub fn generate_notice_id() -> NoticeId {
    generate_notice_id_at(Utc::now().timestamp_millis())
}

/// Generates a notice id for a caller-provided millisecond timestamp.
///
/// The timestamp component keeps ids roughly sortable by creation time; the
/// random suffix carries the uniqueness guarantee.
pub fn generate_notice_id_at(epoch_ms: i64) -> NoticeId {
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char)
        .collect();
    format!("{ID_PREFIX}_{epoch_ms}_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::{generate_notice_id, generate_notice_id_at, RANDOM_SUFFIX_LEN};
    use std::collections::HashSet;

    #[test]
    fn id_has_prefix_timestamp_and_suffix() {
        let id = generate_notice_id_at(1_700_000_000_000);
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "notice");
        assert_eq!(parts[1], "1700000000000");
        assert_eq!(parts[2].len(), RANDOM_SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn ids_do_not_collide_across_many_generations() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_notice_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
