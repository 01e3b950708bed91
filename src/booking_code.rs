use chrono::{NaiveDate, Utc};
use rand::Rng;

const SUFFIX_LEN: usize = 6;
const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Human-readable booking identifier: `BK-YYYYMMDD-XXXXXX` with a random
/// uppercase base-36 suffix. The primary key on the bookings table is the
/// actual uniqueness guarantee; callers retry with a fresh code when an
/// insert hits a unique violation.
pub fn generate() -> String {
    generate_on(Utc::now().date_naive())
}

pub fn generate_on(date: NaiveDate) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("BK-{}-{}", date.format("%Y%m%d"), suffix)
}
