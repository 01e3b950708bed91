use chrono::NaiveTime;

/// Three-clause interval overlap test over half-open [start, end) slots.
/// Mirrors the SQL predicate used by the conflict scan so in-process
/// checks and the database agree on what counts as a collision.
pub fn overlaps(
    existing_start: NaiveTime,
    existing_end: NaiveTime,
    new_start: NaiveTime,
    new_end: NaiveTime,
) -> bool {
    (existing_start <= new_start && existing_end > new_start)
        || (existing_start < new_end && existing_end >= new_end)
        || (existing_start >= new_start && existing_end <= new_end)
}

/// Exact fractional hour difference. Callers guarantee end > start.
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

pub fn slot_price(price_per_hour: f64, start: NaiveTime, end: NaiveTime) -> f64 {
    price_per_hour * hours_between(start, end)
}
