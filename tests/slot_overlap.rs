use chrono::NaiveTime;
use courtside::domain::slot::{hours_between, overlaps, slot_price};

fn t(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

#[test]
fn touching_boundaries_do_not_conflict() {
    // existing 09:00-10:00, request 10:00-11:00
    assert!(!overlaps(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
    // and the other way around
    assert!(!overlaps(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
}

#[test]
fn identical_slots_conflict() {
    assert!(overlaps(t(14, 0), t(16, 0), t(14, 0), t(16, 0)));
}

#[test]
fn request_containing_existing_conflicts() {
    // existing 10:00-11:00 sits inside a 09:00-12:00 request
    assert!(overlaps(t(10, 0), t(11, 0), t(9, 0), t(12, 0)));
}

#[test]
fn request_inside_existing_conflicts() {
    assert!(overlaps(t(9, 0), t(12, 0), t(10, 0), t(11, 0)));
}

#[test]
fn partial_overlaps_conflict() {
    // request starts inside the existing slot
    assert!(overlaps(t(9, 0), t(11, 0), t(10, 0), t(12, 0)));
    // request ends inside the existing slot
    assert!(overlaps(t(10, 0), t(12, 0), t(9, 0), t(11, 0)));
}

#[test]
fn disjoint_slots_do_not_conflict() {
    assert!(!overlaps(t(8, 0), t(9, 0), t(15, 0), t(16, 0)));
}

#[test]
fn hours_are_exact_fractions() {
    assert_eq!(hours_between(t(14, 0), t(16, 30)), 2.5);
    assert_eq!(hours_between(t(9, 0), t(10, 30)), 1.5);
    assert_eq!(hours_between(t(9, 0), t(10, 0)), 1.0);
}

#[test]
fn price_is_rate_times_fractional_hours() {
    assert_eq!(slot_price(100.0, t(14, 0), t(16, 30)), 250.0);
    assert_eq!(slot_price(80.0, t(9, 0), t(10, 30)), 120.0);
}
