use crate::domain::booking::{Booking, BookingPatch, BookingStatus, PaymentStatus};
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, field_id, user_id, booking_date, start_time, end_time, \
     total_price, status, payment_status, payment_due, notes, \
     cancellation_reason, cancelled_by, cancelled_at, created_at, updated_at";

pub struct NewBooking {
    pub id: String,
    pub field_id: i32,
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_price: f64,
    pub payment_due: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingListFilter {
    pub status: Option<BookingStatus>,
    pub user_id: Option<Uuid>,
    pub field_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BookingStats {
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64,
    pub cancelled_bookings: i64,
    pub completed_bookings: i64,
    pub expired_bookings: i64,
    pub total_revenue: Option<f64>,
    pub average_booking_value: Option<f64>,
}

#[derive(Clone)]
pub struct BookingsRepo {
    pub pool: PgPool,
}

impl BookingsRepo {
    /// Scans the field's bookings for the day for any active row whose
    /// [start, end) interval intersects the requested one. `exclude` lets
    /// the update path skip the booking being moved. Must run inside the
    /// same transaction as the insert/update that depends on it.
    pub async fn find_conflict_tx(
        tx: &mut Transaction<'_, Postgres>,
        field_id: i32,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude: Option<&str>,
    ) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT id FROM bookings
            WHERE field_id = $1
            AND booking_date = $2
            AND status NOT IN ('cancelled', 'expired')
            AND ($5::text IS NULL OR id <> $5)
            AND (
                (start_time <= $3 AND end_time > $3) OR
                (start_time < $4 AND end_time >= $4) OR
                (start_time >= $3 AND end_time <= $4)
            )
            LIMIT 1
            "#,
        )
        .bind(field_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(exclude)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(row.map(|r| r.get("id")))
    }

    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        data: &NewBooking,
    ) -> Result<Booking> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bookings (
                id, field_id, user_id, booking_date, start_time, end_time,
                total_price, status, payment_status, payment_due, notes
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, 'pending_payment', 'pending', $8, $9
            )
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(&data.id)
        .bind(data.field_id)
        .bind(data.user_id)
        .bind(data.booking_date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.total_price)
        .bind(data.payment_due)
        .bind(&data.notes)
        .fetch_one(tx.as_mut())
        .await?;

        booking_from_row(&row)
    }

    pub async fn fetch(&self, booking_id: &str) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    pub async fn fetch_for_update_tx(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: &str,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(booking_id)
        .fetch_optional(tx.as_mut())
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    pub async fn list(&self, filter: &BookingListFilter) -> Result<(Vec<Booking>, i64)> {
        let offset = (filter.page - 1) * filter.limit;
        let status = filter.status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE ($1::text IS NULL OR status = $1)
            AND ($2::uuid IS NULL OR user_id = $2)
            AND ($3::int4 IS NULL OR field_id = $3)
            AND ($4::date IS NULL OR booking_date = $4)
            "#,
        )
        .bind(status)
        .bind(filter.user_id)
        .bind(filter.field_id)
        .bind(filter.date)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE ($1::text IS NULL OR status = $1)
            AND ($2::uuid IS NULL OR user_id = $2)
            AND ($3::int4 IS NULL OR field_id = $3)
            AND ($4::date IS NULL OR booking_date = $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(status)
        .bind(filter.user_id)
        .bind(filter.field_id)
        .bind(filter.date)
        .bind(filter.limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let bookings = rows
            .iter()
            .map(booking_from_row)
            .collect::<Result<Vec<_>>>()?;
        Ok((bookings, total))
    }

    pub async fn apply_patch_tx(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: &str,
        patch: &BookingPatch,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bookings SET
                status = COALESCE($2::text, status),
                booking_date = COALESCE($3::date, booking_date),
                start_time = COALESCE($4::time, start_time),
                end_time = COALESCE($5::time, end_time),
                notes = COALESCE($6::text, notes),
                payment_status = COALESCE($7::text, payment_status),
                updated_at = now()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.booking_date)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(&patch.notes)
        .bind(patch.payment_status.map(|s| s.as_str()))
        .fetch_optional(tx.as_mut())
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    /// Guarded transition to cancelled. The status filter in the WHERE
    /// clause is the state-machine gate: terminal bookings never match,
    /// so a repeat cancel is a no-op at the storage layer.
    pub async fn cancel(
        &self,
        booking_id: &str,
        cancelled_by: Uuid,
        reason: Option<&str>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                cancellation_reason = $2,
                cancelled_by = $3,
                cancelled_at = now(),
                updated_at = now()
            WHERE id = $1 AND status IN ('pending_payment', 'confirmed')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(reason)
        .bind(cancelled_by)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    pub async fn exists(&self, booking_id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 AS one FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Flips overdue pending_payment rows to expired, freeing their slots.
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = 'expired', updated_at = now()
            WHERE status = 'pending_payment' AND payment_due < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn stats(
        &self,
        user_id: Option<Uuid>,
        field_id: Option<i32>,
    ) -> Result<BookingStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_bookings,
                COUNT(*) FILTER (WHERE status = 'pending_payment') AS pending_bookings,
                COUNT(*) FILTER (WHERE status = 'confirmed') AS confirmed_bookings,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled_bookings,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_bookings,
                COUNT(*) FILTER (WHERE status = 'expired') AS expired_bookings,
                SUM(total_price) AS total_revenue,
                AVG(total_price) AS average_booking_value
            FROM bookings
            WHERE ($1::uuid IS NULL OR user_id = $1)
            AND ($2::int4 IS NULL OR field_id = $2)
            "#,
        )
        .bind(user_id)
        .bind(field_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(BookingStats {
            total_bookings: row.get("total_bookings"),
            pending_bookings: row.get("pending_bookings"),
            confirmed_bookings: row.get("confirmed_bookings"),
            cancelled_bookings: row.get("cancelled_bookings"),
            completed_bookings: row.get("completed_bookings"),
            expired_bookings: row.get("expired_bookings"),
            total_revenue: row.get("total_revenue"),
            average_booking_value: row.get("average_booking_value"),
        })
    }
}

fn booking_from_row(row: &PgRow) -> Result<Booking> {
    let status: String = row.get("status");
    let payment_status: String = row.get("payment_status");

    Ok(Booking {
        id: row.get("id"),
        field_id: row.get("field_id"),
        user_id: row.get("user_id"),
        booking_date: row.get("booking_date"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        total_price: row.get("total_price"),
        status: parse_booking_status(&status)?,
        payment_status: parse_payment_status(&payment_status)?,
        payment_due: row.get("payment_due"),
        notes: row.get("notes"),
        cancellation_reason: row.get("cancellation_reason"),
        cancelled_by: row.get("cancelled_by"),
        cancelled_at: row.get("cancelled_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn parse_booking_status(s: &str) -> Result<BookingStatus> {
    match s {
        "pending_payment" => Ok(BookingStatus::PendingPayment),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "cancelled" => Ok(BookingStatus::Cancelled),
        "completed" => Ok(BookingStatus::Completed),
        "expired" => Ok(BookingStatus::Expired),
        other => Err(anyhow!("unknown booking status: {other}")),
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "paid" => Ok(PaymentStatus::Paid),
        "failed" => Ok(PaymentStatus::Failed),
        other => Err(anyhow!("unknown payment status: {other}")),
    }
}
