use chrono::{NaiveDate, NaiveTime};
use courtside::domain::booking::{BookingPatch, BookingStatus, PaymentStatus};

#[test]
fn only_cancelled_and_expired_free_the_slot() {
    assert!(BookingStatus::PendingPayment.blocks_slot());
    assert!(BookingStatus::Confirmed.blocks_slot());
    assert!(BookingStatus::Completed.blocks_slot());
    assert!(!BookingStatus::Cancelled.blocks_slot());
    assert!(!BookingStatus::Expired.blocks_slot());
}

#[test]
fn cancellation_guard_matches_state_machine() {
    assert!(BookingStatus::PendingPayment.is_cancellable());
    assert!(BookingStatus::Confirmed.is_cancellable());
    // terminal states never transition again
    assert!(!BookingStatus::Cancelled.is_cancellable());
    assert!(!BookingStatus::Completed.is_cancellable());
    assert!(!BookingStatus::Expired.is_cancellable());
}

#[test]
fn terminal_states() {
    assert!(BookingStatus::Cancelled.is_terminal());
    assert!(BookingStatus::Completed.is_terminal());
    assert!(BookingStatus::Expired.is_terminal());
    assert!(!BookingStatus::PendingPayment.is_terminal());
    assert!(!BookingStatus::Confirmed.is_terminal());
}

#[test]
fn status_serializes_snake_case() {
    // Query-string and JSON filters rely on these exact spellings.
    assert_eq!(
        serde_json::to_value(BookingStatus::PendingPayment).unwrap(),
        "pending_payment"
    );
    assert_eq!(serde_json::to_value(BookingStatus::Expired).unwrap(), "expired");
    assert_eq!(serde_json::to_value(PaymentStatus::Paid).unwrap(), "paid");
    assert_eq!(
        serde_json::from_value::<BookingStatus>(serde_json::json!("confirmed")).unwrap(),
        BookingStatus::Confirmed
    );
}

#[test]
fn status_as_str_matches_storage_spelling() {
    assert_eq!(BookingStatus::PendingPayment.as_str(), "pending_payment");
    assert_eq!(BookingStatus::Confirmed.as_str(), "confirmed");
    assert_eq!(BookingStatus::Cancelled.as_str(), "cancelled");
    assert_eq!(BookingStatus::Completed.as_str(), "completed");
    assert_eq!(BookingStatus::Expired.as_str(), "expired");
}

#[test]
fn empty_patch_is_detected() {
    let patch = BookingPatch::default();
    assert!(patch.is_empty());
    assert!(!patch.changes_slot());
}

#[test]
fn slot_fields_trigger_conflict_revalidation() {
    let date_patch = BookingPatch {
        booking_date: NaiveDate::from_ymd_opt(2025, 7, 10),
        ..Default::default()
    };
    assert!(date_patch.changes_slot());

    let time_patch = BookingPatch {
        start_time: NaiveTime::from_hms_opt(9, 0, 0),
        end_time: NaiveTime::from_hms_opt(11, 0, 0),
        ..Default::default()
    };
    assert!(time_patch.changes_slot());

    let status_patch = BookingPatch {
        status: Some(BookingStatus::Confirmed),
        ..Default::default()
    };
    assert!(!status_patch.changes_slot());
    assert!(!status_patch.is_empty());
}
