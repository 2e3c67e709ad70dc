use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{Booking, CustomerType, PaymentType};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::reference_repository::ReferenceRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::documents::{
    declarations_or_default, render_accessories_invoice, render_challan, render_day_book,
    render_deal_form, render_helmet_invoice, AccessoriesInvoiceView, ChallanView, DayBookEntry,
    DayBookView, DealFormView, DocumentMeta, HelmetInvoiceView,
};
use crate::services::pricing::{
    accessories_totals, derive_breakdown, derive_line, helmet_rounding, AccessoryBillingItem,
};
use crate::utils::errors::{not_found_error, AppError};

pub struct DocumentController {
    bookings: BookingRepository,
    reference: ReferenceRepository,
    vehicles: VehicleRepository,
}

impl DocumentController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            reference: ReferenceRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    async fn branch_meta(&self, branch_id: Uuid) -> Result<DocumentMeta, AppError> {
        let branch = self
            .reference
            .find_branch(branch_id)
            .await?
            .ok_or_else(|| not_found_error("Branch", &branch_id.to_string()))?;

        Ok(DocumentMeta {
            branch_name: branch.name,
            branch_address: branch.address,
            branch_gstin: branch.gstin,
        })
    }

    async fn booking(&self, id: Uuid) -> Result<Booking, AppError> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))
    }

    pub async fn deal_form(&self, booking_id: Uuid) -> Result<String, AppError> {
        let booking = self.booking(booking_id).await?;
        self.render_deal_form_for(booking).await
    }

    pub async fn deal_form_by_chassis(&self, chassis_number: &str) -> Result<String, AppError> {
        let booking = self
            .bookings
            .find_by_chassis(chassis_number)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No booking for chassis '{}'", chassis_number))
            })?;
        self.render_deal_form_for(booking).await
    }

    async fn render_deal_form_for(&self, booking: Booking) -> Result<String, AppError> {
        let meta = self.branch_meta(booking.branch_id).await?;
        let declarations =
            declarations_or_default(self.reference.find_declarations("deal_form").await?);

        let customer_type = match booking.customer_type {
            CustomerType::B2b => "B2B",
            CustomerType::B2c => "B2C",
            CustomerType::Csd => "CSD",
        };

        let view = DealFormView {
            meta,
            booking_number: booking.booking_number,
            booking_date: booking.created_at.format("%d-%m-%Y").to_string(),
            customer_name: booking.customer_details.0.name.clone(),
            customer_address: booking.customer_details.0.address.clone(),
            customer_mobile: booking.customer_details.0.mobile1.clone(),
            customer_pan: booking.customer_details.0.pan_no.clone(),
            customer_type: customer_type.to_string(),
            gstin: booking.gstin,
            model_name: booking.model_name,
            color_name: booking.color_name,
            chassis_number: booking.chassis_number,
            breakdown: derive_breakdown(&booking.price_components.0),
            declarations,
        };

        Ok(render_deal_form(&view))
    }

    /// Helmet invoice: rendered from the booking's helmet price line, with
    /// the flat round-off to whole rupees.
    pub async fn helmet_invoice(&self, booking_id: Uuid) -> Result<String, AppError> {
        let booking = self.booking(booking_id).await?;
        let meta = self.branch_meta(booking.branch_id).await?;

        let helmet = booking
            .price_components
            .0
            .iter()
            .find(|c| c.key.to_uppercase().contains("HELMET"))
            .ok_or_else(|| {
                AppError::NotFound("Booking has no helmet price line".to_string())
            })?;

        let declarations =
            declarations_or_default(self.reference.find_declarations("helmet_invoice").await?);

        let view = HelmetInvoiceView {
            meta,
            invoice_number: format!("HM-{}", booking.booking_number),
            invoice_date: booking.created_at.format("%d-%m-%Y").to_string(),
            customer_name: booking.customer_details.0.name.clone(),
            chassis_number: booking.chassis_number.clone(),
            line: derive_line(helmet),
            rounding: helmet_rounding(helmet.discounted_value),
            declarations,
        };

        Ok(render_helmet_invoice(&view))
    }

    /// Accessories invoice: GST-exclusive billing of the selected accessories
    pub async fn accessories_invoice(&self, booking_id: Uuid) -> Result<String, AppError> {
        let booking = self.booking(booking_id).await?;
        let meta = self.branch_meta(booking.branch_id).await?;

        if booking.accessory_ids.0.is_empty() {
            return Err(AppError::NotFound(
                "Booking has no accessories to invoice".to_string(),
            ));
        }

        let accessories = self
            .reference
            .find_accessories_by_ids(&booking.accessory_ids.0)
            .await?;
        let items: Vec<AccessoryBillingItem> = accessories
            .into_iter()
            .map(|a| AccessoryBillingItem {
                name: a.name,
                price: a.price,
                quantity: 1,
                gst_rate: a.gst_rate,
            })
            .collect();

        let declarations = declarations_or_default(
            self.reference.find_declarations("accessories_invoice").await?,
        );

        let view = AccessoriesInvoiceView {
            meta,
            invoice_number: format!("AC-{}", booking.booking_number),
            invoice_date: booking.created_at.format("%d-%m-%Y").to_string(),
            customer_name: booking.customer_details.0.name.clone(),
            totals: accessories_totals(&items),
            items,
            declarations,
        };

        Ok(render_accessories_invoice(&view))
    }

    /// Delivery challan for a stock transfer
    pub async fn challan(&self, transfer_id: Uuid) -> Result<String, AppError> {
        let transfer = self
            .vehicles
            .find_transfer(transfer_id)
            .await?
            .ok_or_else(|| not_found_error("Transfer", &transfer_id.to_string()))?;
        let vehicle = self
            .vehicles
            .find_by_id(transfer.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &transfer.vehicle_id.to_string()))?;

        let model = self
            .reference
            .find_model(vehicle.model_id)
            .await?
            .ok_or_else(|| not_found_error("Model", &vehicle.model_id.to_string()))?;
        let color = self
            .reference
            .find_color(vehicle.color_id)
            .await?
            .ok_or_else(|| not_found_error("Color", &vehicle.color_id.to_string()))?;
        let from_branch = self
            .reference
            .find_branch(transfer.from_branch_id)
            .await?
            .ok_or_else(|| not_found_error("Branch", &transfer.from_branch_id.to_string()))?;
        let to_branch = self
            .reference
            .find_branch(transfer.to_branch_id)
            .await?
            .ok_or_else(|| not_found_error("Branch", &transfer.to_branch_id.to_string()))?;

        let meta = DocumentMeta {
            branch_name: from_branch.name.clone(),
            branch_address: from_branch.address,
            branch_gstin: from_branch.gstin,
        };

        let view = ChallanView {
            meta,
            challan_number: format!("CH-{}", &transfer.id.simple().to_string()[..8].to_uppercase()),
            challan_date: transfer.created_at.format("%d-%m-%Y").to_string(),
            from_branch: from_branch.name,
            to_branch: to_branch.name,
            model_name: model.name,
            color_name: color.name,
            chassis_number: vehicle.chassis_number,
            engine_number: vehicle.engine_number,
            key_number: vehicle.key_number,
            battery_number: vehicle.battery_number,
            motor_number: vehicle.motor_number,
            charger_number: vehicle.charger_number,
            note: transfer.note,
        };

        Ok(render_challan(&view))
    }

    /// Day book for a calendar day, rendered for the caller's branch
    pub async fn day_book(&self, branch_id: Uuid, date: NaiveDate) -> Result<String, AppError> {
        let meta = self.branch_meta(branch_id).await?;
        let bookings = self.bookings.list_by_date(date).await?;

        let mut entries = Vec::with_capacity(bookings.len());
        let mut total = Decimal::ZERO;
        for booking in bookings {
            if booking.branch_id != branch_id {
                continue;
            }
            let breakdown = derive_breakdown(&booking.price_components.0);
            let payment_type = match booking.payment.0.payment_type {
                Some(PaymentType::Cash) => "CASH",
                Some(PaymentType::Finance) => "FINANCE",
                None => "-",
            };
            total += breakdown.grand_total;
            entries.push(DayBookEntry {
                booking_number: booking.booking_number,
                customer_name: booking.customer_details.0.name.clone(),
                model_name: booking.model_name,
                payment_type: payment_type.to_string(),
                amount: breakdown.grand_total,
            });
        }

        let view = DayBookView {
            meta,
            date,
            entries,
            total,
        };

        Ok(render_day_book(&view))
    }
}
