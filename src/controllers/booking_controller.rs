use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::booking_dto::{
    BookingDraft, BookingResponse, CustomerSearchHit, ValidateStageRequest, ValidateStageResponse,
};
use crate::models::booking::{Booking, CustomerType, DiscountType, PriceComponentRecord};
use crate::models::vehicle::VehicleStatus;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::reference_repository::ReferenceRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::otp::{OtpStatus, OtpStore};
use crate::services::pricing::{classify_header, LineBucket};
use crate::services::wizard::{self, WizardContext, WizardStage};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::FieldErrors;

pub struct BookingController {
    bookings: BookingRepository,
    reference: ReferenceRepository,
    vehicles: VehicleRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            reference: ReferenceRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    /// Assemble the facts the wizard guards need: executive availability in
    /// the selected branch and the broker OTP handshake state.
    async fn build_context(
        &self,
        user_id: Uuid,
        draft: &BookingDraft,
        otp_store: &OtpStore,
    ) -> Result<WizardContext, AppError> {
        let active_sales_executives = match draft.branch_id {
            Some(branch_id) => {
                self.reference
                    .count_active_sales_executives(branch_id)
                    .await?
            }
            // Not yet selected; stage 1 flags the branch first
            None => 1,
        };

        let (broker_otp_required, otp_status) = match draft.exchange.broker_id {
            Some(broker_id) if draft.exchange.applicable => {
                let broker = self
                    .reference
                    .find_broker(broker_id)
                    .await?
                    .ok_or_else(|| not_found_error("Broker", &broker_id.to_string()))?;
                if broker.otp_required {
                    (true, otp_store.status(user_id, broker_id).await)
                } else {
                    (false, OtpStatus::NotRequired)
                }
            }
            _ => (false, OtpStatus::NotRequired),
        };

        Ok(WizardContext {
            active_sales_executives,
            broker_otp_required,
            otp_status,
        })
    }

    /// Validate a single wizard stage without persisting anything
    pub async fn validate_stage(
        &self,
        user_id: Uuid,
        request: ValidateStageRequest,
        otp_store: &OtpStore,
    ) -> Result<ValidateStageResponse, AppError> {
        let stage = WizardStage::from_number(request.stage)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown stage {}", request.stage)))?;

        let ctx = self.build_context(user_id, &request.draft, otp_store).await?;
        let errors = wizard::validate_stage(stage, &request.draft, &ctx);
        let first_field = errors.first().map(|(f, _)| f.to_string());

        Ok(ValidateStageResponse {
            valid: errors.is_empty(),
            errors,
            first_field,
        })
    }

    /// Submit a new booking: every stage is re-validated, the model's price
    /// sheet is snapshotted onto the row and a booking number is issued.
    pub async fn create(
        &self,
        user_id: Uuid,
        draft: BookingDraft,
        otp_store: &OtpStore,
    ) -> Result<BookingResponse, AppError> {
        let ctx = self.build_context(user_id, &draft, otp_store).await?;
        let errors = wizard::validate_all(&draft, &ctx);
        if !errors.is_empty() {
            return Err(AppError::FormValidation(errors));
        }

        let booking = self.assemble(&draft, None).await?;
        let saved = self.bookings.create(&booking).await?;
        log::info!("📝 Booking {} created", saved.booking_number);

        Ok(BookingResponse::from(saved))
    }

    /// Re-submit an existing booking. Full-row replacement: the caller sends
    /// the complete draft and the last write wins.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        draft: BookingDraft,
        otp_store: &OtpStore,
    ) -> Result<BookingResponse, AppError> {
        let existing = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        let ctx = self.build_context(user_id, &draft, otp_store).await?;
        let errors = wizard::validate_all(&draft, &ctx);
        if !errors.is_empty() {
            return Err(AppError::FormValidation(errors));
        }

        let booking = self.assemble(&draft, Some(existing)).await?;
        let saved = self.bookings.update(&booking).await?;

        Ok(BookingResponse::from(saved))
    }

    pub async fn get(&self, id: Uuid) -> Result<BookingResponse, AppError> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;
        Ok(BookingResponse::from(booking))
    }

    pub async fn get_by_chassis(&self, chassis_number: &str) -> Result<BookingResponse, AppError> {
        let booking = self
            .bookings
            .find_by_chassis(chassis_number)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No booking for chassis '{}'", chassis_number))
            })?;
        Ok(BookingResponse::from(booking))
    }

    /// Allot a stock vehicle to the booking. The vehicle must be in stock at
    /// the booking's branch; it leaves stock as `booked`.
    pub async fn assign_vehicle(
        &self,
        id: Uuid,
        chassis_number: &str,
    ) -> Result<BookingResponse, AppError> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        let vehicle = self
            .vehicles
            .find_by_chassis(chassis_number)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No stock vehicle with chassis '{}'", chassis_number))
            })?;

        if vehicle.status != VehicleStatus::InStock {
            return Err(AppError::Conflict(format!(
                "Vehicle '{}' is not in stock",
                chassis_number
            )));
        }
        if vehicle.branch_id != booking.branch_id {
            return Err(AppError::Conflict(format!(
                "Vehicle '{}' belongs to another branch",
                chassis_number
            )));
        }
        if vehicle.model_id != booking.model_id {
            return Err(AppError::Conflict(format!(
                "Vehicle '{}' is a different model",
                chassis_number
            )));
        }

        self.vehicles
            .update_status(vehicle.id, VehicleStatus::Booked)
            .await?;
        let saved = self.bookings.assign_chassis(id, chassis_number).await?;
        log::info!(
            "🏍️ Vehicle {} allotted to booking {}",
            chassis_number,
            saved.booking_number
        );

        Ok(BookingResponse::from(saved))
    }

    /// Prefix search over PAN / Aadhar / mobile of previously captured
    /// customers. Queries shorter than 3 characters return nothing.
    pub async fn customer_search(&self, query: &str) -> Result<Vec<CustomerSearchHit>, AppError> {
        let query = query.trim();
        if query.len() < 3 {
            return Ok(Vec::new());
        }
        self.bookings.customer_search(query).await
    }

    /// Build the persisted row from a validated draft: snapshot the model
    /// and color names, attach the priced headers and apply the discount.
    async fn assemble(
        &self,
        draft: &BookingDraft,
        existing: Option<Booking>,
    ) -> Result<Booking, AppError> {
        let customer_type = draft
            .customer_type
            .ok_or_else(|| AppError::Internal("validated draft missing customer type".to_string()))?;
        let model_id = draft
            .model_id
            .ok_or_else(|| AppError::Internal("validated draft missing model".to_string()))?;
        let branch_id = draft
            .branch_id
            .ok_or_else(|| AppError::Internal("validated draft missing branch".to_string()))?;
        let color_id = draft
            .model_color
            .ok_or_else(|| AppError::Internal("validated draft missing color".to_string()))?;
        let sales_executive_id = draft
            .sales_executive
            .ok_or_else(|| AppError::Internal("validated draft missing executive".to_string()))?;

        let model = self
            .reference
            .find_model(model_id)
            .await?
            .ok_or_else(|| not_found_error("Model", &model_id.to_string()))?;
        let color = self
            .reference
            .find_color(color_id)
            .await?
            .ok_or_else(|| not_found_error("Color", &color_id.to_string()))?;

        // Selection coherence: an upstream field may have changed since the
        // dependent selects were populated.
        let mut coherence = FieldErrors::new();
        let colors = self.reference.find_colors_for_model(model_id).await?;
        if !colors.iter().any(|c| c.id == color_id) {
            coherence.add("model_color", "Selected color is not available for this model");
        }
        if !draft.accessory_ids.is_empty() {
            let compatible = self.reference.find_accessories_for_model(model_id).await?;
            if draft
                .accessory_ids
                .iter()
                .any(|id| !compatible.iter().any(|a| a.id == *id))
            {
                coherence.add(
                    "accessories",
                    "One or more selected accessories do not fit this model",
                );
            }
        }
        if !coherence.is_empty() {
            return Err(AppError::FormValidation(coherence));
        }

        let price_components = self
            .price_components(draft, model_id, model.discount_percent)
            .await?;

        let gstin = match customer_type {
            CustomerType::B2b => Some(draft.gstin.trim().to_string()),
            _ => None,
        };
        let rto_amount = if draft.rto_type.requires_amount() {
            draft.rto_amount
        } else {
            None
        };
        let note = if draft.note.trim().is_empty() {
            None
        } else {
            Some(draft.note.trim().to_string())
        };

        let (id, booking_number, chassis_number, created_at) = match existing {
            Some(existing) => (
                existing.id,
                existing.booking_number,
                existing.chassis_number,
                existing.created_at,
            ),
            None => (
                Uuid::new_v4(),
                self.bookings.next_booking_number().await?,
                None,
                Utc::now(),
            ),
        };

        Ok(Booking {
            id,
            booking_number,
            customer_type,
            model_id,
            model_name: model.name,
            color_id,
            color_name: color.name,
            branch_id,
            gstin,
            rto_type: draft.rto_type,
            rto_amount,
            sales_executive_id,
            customer_details: Json(draft.customer_details.clone()),
            payment: Json(draft.payment.clone()),
            discount: Json(draft.discount.clone()),
            exchange: Json(draft.exchange.clone()),
            accessory_ids: Json(draft.accessory_ids.clone()),
            price_components: Json(price_components),
            hpa: draft.hpa,
            note,
            chassis_number,
            created_at,
            updated_at: Utc::now(),
        })
    }

    /// Snapshot the priced headers: every mandatory header plus the selected
    /// optional ones, with the discount applied to discount-eligible lines
    /// and a BH/CRTM RTO amount overriding the sheet's RTO line.
    async fn price_components(
        &self,
        draft: &BookingDraft,
        model_id: Uuid,
        max_discount_percent: Decimal,
    ) -> Result<Vec<PriceComponentRecord>, AppError> {
        let sheet = self.reference.find_price_sheet(model_id).await?;
        if sheet.is_empty() {
            return Err(AppError::Conflict(
                "No price sheet is configured for this model".to_string(),
            ));
        }

        let mut components = Vec::new();
        let mut discountable = HashSet::new();
        for h in sheet {
            if !(h.is_mandatory || draft.header_ids.contains(&h.header_id)) {
                continue;
            }
            if h.is_discount {
                discountable.insert(h.header_id);
            }
            components.push(PriceComponentRecord {
                header_id: h.header_id,
                key: h.key,
                hsn_code: h.hsn_code,
                gst_rate: h.gst_rate,
                original_value: h.value,
                discounted_value: h.value,
            });
        }

        if let Some(amount) = draft.rto_amount {
            if draft.rto_type.requires_amount() {
                match components
                    .iter_mut()
                    .find(|c| classify_header(&c.key) == LineBucket::Rto)
                {
                    Some(rto) => {
                        rto.original_value = amount;
                        rto.discounted_value = amount;
                    }
                    None => components.push(PriceComponentRecord {
                        header_id: Uuid::new_v4(),
                        key: format!("RTO {}", draft.rto_type_label()),
                        hsn_code: "9997".to_string(),
                        gst_rate: Decimal::ZERO,
                        original_value: amount,
                        discounted_value: amount,
                    }),
                }
            }
        }

        apply_discount(
            &mut components,
            &discountable,
            draft.discount.discount_type,
            draft.discount.value.unwrap_or(Decimal::ZERO),
            max_discount_percent,
        )?;

        Ok(components)
    }
}

impl BookingDraft {
    fn rto_type_label(&self) -> &'static str {
        match self.rto_type {
            crate::models::booking::RtoType::Mh => "MH",
            crate::models::booking::RtoType::Bh => "BH",
            crate::models::booking::RtoType::Crtm => "CRTM",
        }
    }
}

/// Apply the wizard's discount to the headers the price sheet flags as
/// discountable. Statutory headers (insurance, RTO, hypothecation) carry
/// `is_discount = false` and are never touched.
///
/// Percent discounts reduce every discountable line by the same rate,
/// capped at the model's configured maximum. Fixed discounts are consumed
/// against the discountable lines in sheet order, never driving a line
/// negative.
fn apply_discount(
    components: &mut [PriceComponentRecord],
    discountable: &HashSet<Uuid>,
    discount_type: DiscountType,
    value: Decimal,
    max_percent: Decimal,
) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Ok(());
    }

    match discount_type {
        DiscountType::Percent => {
            if value > max_percent {
                return Err(AppError::BadRequest(format!(
                    "Discount exceeds the {}% allowed for this model",
                    max_percent
                )));
            }
            let factor = (Decimal::from(100) - value) / Decimal::from(100);
            for component in components.iter_mut() {
                if discountable.contains(&component.header_id) {
                    component.discounted_value = component.original_value * factor;
                }
            }
        }
        DiscountType::Fixed => {
            let mut remaining = value;
            for component in components.iter_mut() {
                if remaining <= Decimal::ZERO {
                    break;
                }
                if !discountable.contains(&component.header_id) {
                    continue;
                }
                let cut = remaining.min(component.original_value);
                component.discounted_value = component.original_value - cut;
                remaining -= cut;
            }
            if remaining > Decimal::ZERO {
                return Err(AppError::BadRequest(
                    "Discount exceeds the discountable amount".to_string(),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn component(key: &str, value: i64) -> PriceComponentRecord {
        PriceComponentRecord {
            header_id: Uuid::new_v4(),
            key: key.to_string(),
            hsn_code: "8711".to_string(),
            gst_rate: Decimal::from(28),
            original_value: Decimal::from(value),
            discounted_value: Decimal::from(value),
        }
    }

    fn discountable(components: &[PriceComponentRecord], keys: &[&str]) -> HashSet<Uuid> {
        components
            .iter()
            .filter(|c| keys.contains(&c.key.as_str()))
            .map(|c| c.header_id)
            .collect()
    }

    #[test]
    fn test_percent_discount_skips_non_discountable_lines() {
        let mut components = vec![component("EX SHOWROOM", 1000), component("RTO TAX", 500)];
        let eligible = discountable(&components, &["EX SHOWROOM"]);
        apply_discount(
            &mut components,
            &eligible,
            DiscountType::Percent,
            Decimal::from(10),
            Decimal::from(15),
        )
        .unwrap();

        assert_eq!(components[0].discounted_value, Decimal::from(900));
        assert_eq!(components[1].discounted_value, Decimal::from(500));
    }

    #[test]
    fn test_percent_discount_capped_by_model() {
        let mut components = vec![component("EX SHOWROOM", 1000)];
        let eligible = discountable(&components, &["EX SHOWROOM"]);
        let result = apply_discount(
            &mut components,
            &eligible,
            DiscountType::Percent,
            Decimal::from(20),
            Decimal::from(15),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_fixed_discount_consumed_in_sheet_order() {
        let mut components = vec![
            component("EX SHOWROOM", 1000),
            component("HANDLING", 200),
            component("INSURANCE", 500),
        ];
        let eligible = discountable(&components, &["EX SHOWROOM", "HANDLING"]);
        apply_discount(
            &mut components,
            &eligible,
            DiscountType::Fixed,
            Decimal::from(1100),
            Decimal::from(15),
        )
        .unwrap();

        assert_eq!(components[0].discounted_value, Decimal::ZERO);
        assert_eq!(components[1].discounted_value, Decimal::from(100));
        // Insurance untouched
        assert_eq!(components[2].discounted_value, Decimal::from(500));
    }

    #[test]
    fn test_fixed_discount_larger_than_discountable_rejected() {
        let mut components = vec![component("EX SHOWROOM", 1000)];
        let eligible = discountable(&components, &["EX SHOWROOM"]);
        let result = apply_discount(
            &mut components,
            &eligible,
            DiscountType::Fixed,
            Decimal::from(1001),
            Decimal::from(15),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_discount_is_a_no_op() {
        let mut components = vec![component("EX SHOWROOM", 1000)];
        let eligible = discountable(&components, &["EX SHOWROOM"]);
        apply_discount(
            &mut components,
            &eligible,
            DiscountType::Fixed,
            Decimal::from_str("0").unwrap(),
            Decimal::from(15),
        )
        .unwrap();
        assert_eq!(components[0].discounted_value, Decimal::from(1000));
    }
}
