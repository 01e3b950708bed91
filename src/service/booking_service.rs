use crate::booking_code;
use crate::domain::booking::{Booking, BookingPatch, CreateBookingRequest};
use crate::domain::slot;
use crate::repo::bookings_repo::{BookingsRepo, NewBooking};
use crate::repo::fields_repo::FieldsRepo;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// How long a pending_payment booking holds its slot before the expiry
/// sweep may reclaim it.
pub const PAYMENT_WINDOW_MINUTES: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("field not found or inactive")]
    FieldUnavailable,
    #[error("booking time slot is not available")]
    SlotConflict,
    #[error("booking not found")]
    NotFound,
    #[error("booking is not in a cancellable status")]
    NotCancellable,
    #[error("end_time must be after start_time")]
    InvalidTimeRange,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        BookingError::Internal(err.into())
    }
}

#[derive(Clone)]
pub struct BookingService {
    pub pool: PgPool,
    pub bookings_repo: BookingsRepo,
}

impl BookingService {
    /// Admits a booking request. Field lookup, conflict scan and insert all
    /// run inside one transaction; the row lock taken on the field row
    /// serializes concurrent admissions for the same field, so of two
    /// racing requests for an overlapping slot exactly one commits and the
    /// other observes the winner's row in its conflict scan.
    ///
    /// A unique violation on the generated booking code aborts the
    /// transaction, so the retry re-runs the whole admission with a fresh
    /// code rather than re-issuing the insert alone.
    pub async fn create(
        &self,
        user_id: Uuid,
        req: &CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        match self.try_create(user_id, req).await {
            Err(BookingError::Internal(err)) if is_unique_violation(&err) => {
                tracing::warn!(field_id = req.field_id, "booking code collision, retrying once");
                self.try_create(user_id, req).await
            }
            other => other,
        }
    }

    async fn try_create(
        &self,
        user_id: Uuid,
        req: &CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let mut tx = self.pool.begin().await?;

        let field = FieldsRepo::get_for_booking_tx(&mut tx, req.field_id)
            .await?
            .ok_or(BookingError::FieldUnavailable)?;

        let conflict = BookingsRepo::find_conflict_tx(
            &mut tx,
            req.field_id,
            req.date,
            req.start_time,
            req.end_time,
            None,
        )
        .await?;
        if conflict.is_some() {
            return Err(BookingError::SlotConflict);
        }

        let data = NewBooking {
            id: booking_code::generate(),
            field_id: field.id,
            user_id,
            booking_date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            total_price: slot::slot_price(field.price_per_hour, req.start_time, req.end_time),
            payment_due: Utc::now() + Duration::minutes(PAYMENT_WINDOW_MINUTES),
            notes: req.notes.clone(),
        };

        let booking = BookingsRepo::insert_tx(&mut tx, &data).await?;
        tx.commit().await?;

        tracing::info!(
            booking_id = %booking.id,
            field_id = booking.field_id,
            user_id = %booking.user_id,
            total_price = booking.total_price,
            "booking created"
        );
        Ok(booking)
    }

    /// Applies an enumerated partial update. When the patch moves the
    /// booking's slot, the conflict scan re-runs against the target slot
    /// (excluding the booking itself) under the same field lock the create
    /// path takes, so a reschedule cannot introduce an overlap that a
    /// fresh booking would have been refused.
    pub async fn update(
        &self,
        booking_id: &str,
        patch: &BookingPatch,
    ) -> Result<Booking, BookingError> {
        let mut tx = self.pool.begin().await?;

        let current = BookingsRepo::fetch_for_update_tx(&mut tx, booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        if patch.changes_slot() {
            let date = patch.booking_date.unwrap_or(current.booking_date);
            let start_time = patch.start_time.unwrap_or(current.start_time);
            let end_time = patch.end_time.unwrap_or(current.end_time);
            let status = patch.status.unwrap_or(current.status);

            if end_time <= start_time {
                return Err(BookingError::InvalidTimeRange);
            }

            if status.blocks_slot() {
                FieldsRepo::lock_tx(&mut tx, current.field_id).await?;
                let conflict = BookingsRepo::find_conflict_tx(
                    &mut tx,
                    current.field_id,
                    date,
                    start_time,
                    end_time,
                    Some(booking_id),
                )
                .await?;
                if conflict.is_some() {
                    return Err(BookingError::SlotConflict);
                }
            }
        }

        let updated = BookingsRepo::apply_patch_tx(&mut tx, booking_id, patch)
            .await?
            .ok_or(BookingError::NotFound)?;
        tx.commit().await?;

        tracing::info!(booking_id = %updated.id, "booking updated");
        Ok(updated)
    }

    /// Cancellation is a status transition, never a delete. The guarded
    /// update only matches pending_payment or confirmed rows; a miss is
    /// split into NotFound vs NotCancellable for the transport layer.
    pub async fn cancel(
        &self,
        booking_id: &str,
        cancelled_by: Uuid,
        reason: Option<&str>,
    ) -> Result<Booking, BookingError> {
        match self.bookings_repo.cancel(booking_id, cancelled_by, reason).await? {
            Some(booking) => {
                tracing::info!(booking_id = %booking.id, cancelled_by = %cancelled_by, "booking cancelled");
                Ok(booking)
            }
            None => {
                if self.bookings_repo.exists(booking_id).await? {
                    Err(BookingError::NotCancellable)
                } else {
                    Err(BookingError::NotFound)
                }
            }
        }
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505")
    )
}
