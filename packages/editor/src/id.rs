//! Version id generation
//!
//! Ids are `v` + base-36 milliseconds since the epoch + a random base-36
//! suffix. The timestamp keeps ids roughly sortable; the suffix keeps ids
//! created within the same millisecond apart.

use crate::model::VersionId;
use chrono::Utc;
use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_LEN: usize = 8;

pub fn generate_version_id() -> VersionId {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..RANDOM_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    VersionId::new(format!("v{}{}", to_base36(millis), suffix))
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
