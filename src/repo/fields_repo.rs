use crate::domain::field::{CreateFieldRequest, Field, FieldForBooking, FieldPatch};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

const FIELD_COLUMNS: &str = "id, name, location_summary, address, sport_type, capacity, \
     price_per_hour, currency, description, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct FieldsRepo {
    pub pool: PgPool,
}

impl FieldsRepo {
    /// Admission-time lookup. Locks the field row so concurrent bookings
    /// for the same field serialize on the conflict check; inactive and
    /// missing fields both come back as None.
    pub async fn get_for_booking_tx(
        tx: &mut Transaction<'_, Postgres>,
        field_id: i32,
    ) -> Result<Option<FieldForBooking>> {
        let row = sqlx::query(
            "SELECT id, price_per_hour FROM fields WHERE id = $1 AND is_active = true FOR UPDATE",
        )
        .bind(field_id)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(row.map(|r| FieldForBooking {
            id: r.get("id"),
            price_per_hour: r.get("price_per_hour"),
        }))
    }

    /// Locks a field row regardless of activity. Used by the reschedule
    /// path, which must serialize with admissions even when the field has
    /// since been deactivated.
    pub async fn lock_tx(tx: &mut Transaction<'_, Postgres>, field_id: i32) -> Result<()> {
        sqlx::query("SELECT id FROM fields WHERE id = $1 FOR UPDATE")
            .bind(field_id)
            .fetch_optional(tx.as_mut())
            .await?;
        Ok(())
    }

    pub async fn get_active(&self, field_id: i32) -> Result<Option<Field>> {
        let row = sqlx::query(&format!(
            "SELECT {FIELD_COLUMNS} FROM fields WHERE id = $1 AND is_active = true"
        ))
        .bind(field_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(field_from_row))
    }

    pub async fn list_active(
        &self,
        price_min: Option<f64>,
        price_max: Option<f64>,
        sport_type: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Field>, i64)> {
        let offset = (page - 1) * limit;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM fields
            WHERE is_active = true
            AND ($1::float8 IS NULL OR price_per_hour >= $1)
            AND ($2::float8 IS NULL OR price_per_hour <= $2)
            AND ($3::text IS NULL OR sport_type = $3)
            "#,
        )
        .bind(price_min)
        .bind(price_max)
        .bind(sport_type)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {FIELD_COLUMNS} FROM fields
            WHERE is_active = true
            AND ($1::float8 IS NULL OR price_per_hour >= $1)
            AND ($2::float8 IS NULL OR price_per_hour <= $2)
            AND ($3::text IS NULL OR sport_type = $3)
            ORDER BY name ASC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(price_min)
        .bind(price_max)
        .bind(sport_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.iter().map(field_from_row).collect(), total))
    }

    pub async fn create(&self, data: &CreateFieldRequest) -> Result<Field> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO fields (
                name, location_summary, address, sport_type, capacity,
                price_per_hour, currency, description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(&data.location_summary)
        .bind(&data.address)
        .bind(&data.sport_type)
        .bind(data.capacity)
        .bind(data.price_per_hour)
        .bind(data.currency.as_deref().unwrap_or("Rp"))
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(field_from_row(&row))
    }

    pub async fn apply_patch(&self, field_id: i32, patch: &FieldPatch) -> Result<Option<Field>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE fields SET
                name = COALESCE($2::text, name),
                location_summary = COALESCE($3::text, location_summary),
                address = COALESCE($4::text, address),
                sport_type = COALESCE($5::text, sport_type),
                capacity = COALESCE($6::int4, capacity),
                price_per_hour = COALESCE($7::float8, price_per_hour),
                currency = COALESCE($8::text, currency),
                description = COALESCE($9::text, description),
                is_active = COALESCE($10::bool, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(field_id)
        .bind(&patch.name)
        .bind(&patch.location_summary)
        .bind(&patch.address)
        .bind(&patch.sport_type)
        .bind(patch.capacity)
        .bind(patch.price_per_hour)
        .bind(&patch.currency)
        .bind(&patch.description)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(field_from_row))
    }

    /// Soft delete. Historical bookings keep their field reference; the
    /// admission engine stops seeing the field immediately.
    pub async fn deactivate(&self, field_id: i32) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE fields SET is_active = false, updated_at = now() WHERE id = $1 AND is_active = true",
        )
        .bind(field_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn field_from_row(row: &PgRow) -> Field {
    Field {
        id: row.get("id"),
        name: row.get("name"),
        location_summary: row.get("location_summary"),
        address: row.get("address"),
        sport_type: row.get("sport_type"),
        capacity: row.get("capacity"),
        price_per_hour: row.get("price_per_hour"),
        currency: row.get("currency"),
        description: row.get("description"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
