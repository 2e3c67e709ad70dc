//! Booking persistence

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::booking_dto::CustomerSearchHit;
use crate::models::booking::Booking;
use crate::utils::errors::AppError;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let saved = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, booking_number, customer_type, model_id, model_name,
                color_id, color_name, branch_id, gstin, rto_type, rto_amount,
                sales_executive_id, customer_details, payment, discount,
                exchange, accessory_ids, price_components, hpa, note,
                chassis_number, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(&booking.booking_number)
        .bind(booking.customer_type)
        .bind(booking.model_id)
        .bind(&booking.model_name)
        .bind(booking.color_id)
        .bind(&booking.color_name)
        .bind(booking.branch_id)
        .bind(&booking.gstin)
        .bind(booking.rto_type)
        .bind(booking.rto_amount)
        .bind(booking.sales_executive_id)
        .bind(&booking.customer_details)
        .bind(&booking.payment)
        .bind(&booking.discount)
        .bind(&booking.exchange)
        .bind(&booking.accessory_ids)
        .bind(&booking.price_components)
        .bind(booking.hpa)
        .bind(&booking.note)
        .bind(&booking.chassis_number)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// Full-row update: last write wins, no version check
    pub async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        let saved = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET
                customer_type = $2, model_id = $3, model_name = $4,
                color_id = $5, color_name = $6, branch_id = $7, gstin = $8,
                rto_type = $9, rto_amount = $10, sales_executive_id = $11,
                customer_details = $12, payment = $13, discount = $14,
                exchange = $15, accessory_ids = $16, price_components = $17,
                hpa = $18, note = $19, chassis_number = $20, updated_at = $21
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(booking.customer_type)
        .bind(booking.model_id)
        .bind(&booking.model_name)
        .bind(booking.color_id)
        .bind(&booking.color_name)
        .bind(booking.branch_id)
        .bind(&booking.gstin)
        .bind(booking.rto_type)
        .bind(booking.rto_amount)
        .bind(booking.sales_executive_id)
        .bind(&booking.customer_details)
        .bind(&booking.payment)
        .bind(&booking.discount)
        .bind(&booking.exchange)
        .bind(&booking.accessory_ids)
        .bind(&booking.price_components)
        .bind(booking.hpa)
        .bind(&booking.note)
        .bind(&booking.chassis_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// Next sequential booking number, e.g. `BK-00042`. Drawn from the
    /// `booking_number_seq` sequence so concurrent submissions never share
    /// a number; `bookings.booking_number` carries a unique index as a
    /// backstop.
    pub async fn next_booking_number(&self) -> Result<String, AppError> {
        let next: (i64,) = sqlx::query_as("SELECT nextval('booking_number_seq')")
            .fetch_one(&self.pool)
            .await?;
        Ok(format_booking_number(next.0))
    }

    /// Record the allotted stock vehicle on the booking
    pub async fn assign_chassis(&self, id: Uuid, chassis_number: &str) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET chassis_number = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(chassis_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn find_by_chassis(&self, chassis_number: &str) -> Result<Option<Booking>, AppError> {
        let booking =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE chassis_number = $1")
                .bind(chassis_number)
                .fetch_optional(&self.pool)
                .await?;

        Ok(booking)
    }

    /// Bookings captured on one calendar day, for the day book
    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE created_at::date = $1 ORDER BY created_at",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Prefix search over PAN / Aadhar / mobile inside the KYC sub-record
    pub async fn customer_search(&self, query: &str) -> Result<Vec<CustomerSearchHit>, AppError> {
        let pattern = format!("{}%", query);
        let hits = sqlx::query_as::<_, CustomerSearchHit>(
            r#"
            SELECT id AS booking_id,
                   customer_details->>'name' AS name,
                   customer_details->>'pan_no' AS pan_no,
                   customer_details->>'aadhar_number' AS aadhar_number,
                   customer_details->>'mobile1' AS mobile1
            FROM bookings
            WHERE customer_details->>'pan_no' ILIKE $1
               OR customer_details->>'aadhar_number' LIKE $1
               OR customer_details->>'mobile1' LIKE $1
            ORDER BY created_at DESC
            LIMIT 20
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(hits)
    }
}

/// Zero-padded display form of a sequence value
fn format_booking_number(n: i64) -> String {
    format!("BK-{:05}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_booking_number_pads_to_five_digits() {
        assert_eq!(format_booking_number(1), "BK-00001");
        assert_eq!(format_booking_number(42), "BK-00042");
    }

    #[test]
    fn test_format_booking_number_grows_past_five_digits() {
        assert_eq!(format_booking_number(123_456), "BK-123456");
    }
}
