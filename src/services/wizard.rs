//! Booking wizard state machine
//!
//! Six linear stages, each guarded by a validation pass that fills a
//! field -> message error map. A stage advances only when its map is empty;
//! final submission re-runs every stage in order. Guards never panic and
//! never touch the database: branch/broker facts they need arrive in a
//! `WizardContext` assembled by the controller.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::booking_dto::BookingDraft;
use crate::models::booking::{CustomerType, PaymentType};
use crate::services::otp::OtpStatus;
use crate::utils::validation::{
    validate_aadhar, validate_gstin, validate_mobile, validate_pan, validate_pincode, FieldErrors,
};

/// The six wizard stages, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStage {
    VehicleAndCustomerType,
    ColorAndExecutive,
    KycDetails,
    PaymentAndExchange,
    Accessories,
    DiscountAndReview,
}

impl WizardStage {
    pub const ALL: [WizardStage; 6] = [
        WizardStage::VehicleAndCustomerType,
        WizardStage::ColorAndExecutive,
        WizardStage::KycDetails,
        WizardStage::PaymentAndExchange,
        WizardStage::Accessories,
        WizardStage::DiscountAndReview,
    ];

    pub fn number(self) -> u8 {
        match self {
            WizardStage::VehicleAndCustomerType => 1,
            WizardStage::ColorAndExecutive => 2,
            WizardStage::KycDetails => 3,
            WizardStage::PaymentAndExchange => 4,
            WizardStage::Accessories => 5,
            WizardStage::DiscountAndReview => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }
}

/// Facts the guards need beyond the draft itself
#[derive(Debug, Clone, Copy)]
pub struct WizardContext {
    /// Active, non-frozen sales executives in the selected branch
    pub active_sales_executives: usize,
    /// Whether the selected exchange broker mandates OTP confirmation
    pub broker_otp_required: bool,
    pub otp_status: OtpStatus,
}

impl Default for WizardContext {
    fn default() -> Self {
        Self {
            active_sales_executives: 1,
            broker_otp_required: false,
            otp_status: OtpStatus::NotRequired,
        }
    }
}

/// Validate one stage of the draft, returning its error map
pub fn validate_stage(stage: WizardStage, draft: &BookingDraft, ctx: &WizardContext) -> FieldErrors {
    match stage {
        WizardStage::VehicleAndCustomerType => validate_vehicle_and_customer_type(draft),
        WizardStage::ColorAndExecutive => validate_color_and_executive(draft, ctx),
        WizardStage::KycDetails => validate_kyc_details(draft),
        WizardStage::PaymentAndExchange => validate_payment_and_exchange(draft, ctx),
        WizardStage::Accessories => FieldErrors::new(),
        WizardStage::DiscountAndReview => validate_discount_and_review(draft),
    }
}

/// Validate every stage in form order (final submission)
pub fn validate_all(draft: &BookingDraft, ctx: &WizardContext) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for stage in WizardStage::ALL {
        errors.extend(validate_stage(stage, draft, ctx));
    }
    errors
}

/// Transition guard: the next stage, or the error map blocking the advance
pub fn advance(
    stage: WizardStage,
    draft: &BookingDraft,
    ctx: &WizardContext,
) -> Result<Option<WizardStage>, FieldErrors> {
    let errors = validate_stage(stage, draft, ctx);
    if errors.is_empty() {
        Ok(stage.next())
    } else {
        Err(errors)
    }
}

fn validate_vehicle_and_customer_type(draft: &BookingDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match draft.customer_type {
        None => errors.add("customer_type", "Customer type is required"),
        Some(CustomerType::B2b) => {
            if draft.gstin.trim().is_empty() {
                errors.add("gstin", "GSTIN is required for B2B customers");
            } else if validate_gstin(draft.gstin.trim()).is_err() {
                errors.add("gstin", "Enter a valid 15 character GSTIN");
            }
        }
        Some(_) => {}
    }

    if draft.model_id.is_none() {
        errors.add("model_id", "Model is required");
    }
    if draft.branch_id.is_none() {
        errors.add("branch", "Branch is required");
    }

    if draft.rto_type.requires_amount() {
        match draft.rto_amount {
            Some(amount) if amount > Decimal::ZERO => {}
            _ => errors.add("rto_amount", "RTO amount is required for BH/CRTM registration"),
        }
    }

    errors
}

fn validate_color_and_executive(draft: &BookingDraft, ctx: &WizardContext) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.model_color.is_none() {
        errors.add("model_color", "Color is required");
    }
    if ctx.active_sales_executives == 0 {
        errors.add(
            "sales_executive",
            "No active sales executives are available for this branch",
        );
    } else if draft.sales_executive.is_none() {
        errors.add("sales_executive", "Sales executive is required");
    }

    errors
}

fn validate_kyc_details(draft: &BookingDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let details = &draft.customer_details;

    let required: [(&'static str, &str, &str); 14] = [
        ("salutation", &details.salutation, "Salutation is required"),
        ("name", &details.name, "Customer name is required"),
        ("address", &details.address, "Address is required"),
        ("mobile1", &details.mobile1, "Mobile number is required"),
        ("aadhar_number", &details.aadhar_number, "Aadhar number is required"),
        ("pan_no", &details.pan_no, "PAN number is required"),
        ("dob", &details.dob, "Date of birth is required"),
        ("occupation", &details.occupation, "Occupation is required"),
        ("taluka", &details.taluka, "Taluka is required"),
        ("district", &details.district, "District is required"),
        ("pincode", &details.pincode, "Pincode is required"),
        ("nomineeName", &details.nominee_name, "Nominee name is required"),
        ("nomineeRelation", &details.nominee_relation, "Nominee relation is required"),
        ("nomineeAge", &details.nominee_age, "Nominee age is required"),
    ];

    for (field, value, message) in required {
        if value.trim().is_empty() {
            errors.add(field, message);
        }
    }

    if !details.mobile1.trim().is_empty() && validate_mobile(details.mobile1.trim()).is_err() {
        errors.add("mobile1", "Enter a valid 10 digit mobile number");
    }
    if !details.pan_no.trim().is_empty() && validate_pan(details.pan_no.trim()).is_err() {
        errors.add("pan_no", "Enter a valid PAN number");
    }
    if !details.aadhar_number.trim().is_empty()
        && validate_aadhar(details.aadhar_number.trim()).is_err()
    {
        errors.add("aadhar_number", "Enter a valid 12 digit Aadhar number");
    }
    if !details.pincode.trim().is_empty() && validate_pincode(details.pincode.trim()).is_err() {
        errors.add("pincode", "Enter a valid 6 digit pincode");
    }

    errors
}

fn validate_payment_and_exchange(draft: &BookingDraft, ctx: &WizardContext) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match draft.payment.payment_type {
        None => errors.add("payment_type", "Payment type is required"),
        Some(PaymentType::Finance) => {
            if draft.payment.financer_id.is_none() {
                errors.add("financer", "Financer is required for finance payments");
            }
        }
        Some(PaymentType::Cash) => {}
    }

    if draft.exchange.applicable {
        if draft.exchange.broker_id.is_none() {
            errors.add("broker", "Broker is required for exchange");
        }
        match draft.exchange.price {
            Some(price) if price > Decimal::ZERO => {}
            _ => errors.add("price", "Exchange price is required"),
        }
        if draft.exchange.vehicle_number.trim().is_empty() {
            errors.add("vehicle_number", "Old vehicle number is required");
        }
        if draft.exchange.chassis_number.trim().is_empty() {
            errors.add("chassis_number", "Old chassis number is required");
        }

        if ctx.broker_otp_required && ctx.otp_status != OtpStatus::Verified {
            errors.add(
                "otpVerification",
                "Broker OTP must be verified before submitting the booking",
            );
        }
    }

    errors
}

fn validate_discount_and_review(draft: &BookingDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match draft.discount.value {
        None => errors.add("discount_value", "Discount value is required"),
        Some(value) if value < Decimal::ZERO => {
            errors.add("discount_value", "Discount cannot be negative")
        }
        Some(_) => {}
    }

    errors
}

// Field-change side effects. Selecting upstream fields invalidates the
// selections that depended on them, exactly as the capture form clears them.

pub fn on_customer_type_changed(draft: &mut BookingDraft, customer_type: CustomerType) {
    draft.customer_type = Some(customer_type);
    draft.model_id = None;
    draft.model_color = None;
    draft.accessory_ids.clear();
    if customer_type != CustomerType::B2b {
        draft.gstin.clear();
    }
}

pub fn on_branch_changed(draft: &mut BookingDraft, branch_id: Uuid) {
    draft.branch_id = Some(branch_id);
    draft.model_id = None;
    draft.model_color = None;
    draft.accessory_ids.clear();
    // Branch-scoped lists change with the branch
    draft.sales_executive = None;
    draft.exchange.broker_id = None;
}

pub fn on_model_changed(draft: &mut BookingDraft, model_id: Uuid) {
    draft.model_id = Some(model_id);
    draft.model_color = None;
    draft.accessory_ids.clear();
    draft.header_ids.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{CustomerType, DiscountType, PaymentType};

    fn filled_stage1_draft() -> BookingDraft {
        BookingDraft {
            customer_type: Some(CustomerType::B2c),
            model_id: Some(Uuid::new_v4()),
            branch_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
    }

    fn filled_kyc_draft() -> BookingDraft {
        let mut draft = filled_stage1_draft();
        let d = &mut draft.customer_details;
        d.salutation = "Mr".into();
        d.name = "Ramesh Patil".into();
        d.address = "12 Market Road".into();
        d.mobile1 = "9876543210".into();
        d.aadhar_number = "123456789012".into();
        d.pan_no = "ABCDE1234F".into();
        d.dob = "1990-04-01".into();
        d.occupation = "Farmer".into();
        d.taluka = "Barshi".into();
        d.district = "Solapur".into();
        d.pincode = "413001".into();
        d.nominee_name = "Sunita Patil".into();
        d.nominee_relation = "Wife".into();
        d.nominee_age = "32".into();
        draft
    }

    #[test]
    fn test_stage1_requires_core_fields() {
        let draft = BookingDraft::default();
        let errors = validate_stage(
            WizardStage::VehicleAndCustomerType,
            &draft,
            &WizardContext::default(),
        );
        assert!(errors.get("customer_type").is_some());
        assert!(errors.get("model_id").is_some());
        assert!(errors.get("branch").is_some());
        // First erroring field in form order
        assert_eq!(errors.first().unwrap().0, "customer_type");
    }

    #[test]
    fn test_stage1_b2b_requires_valid_gstin() {
        let mut draft = filled_stage1_draft();
        draft.customer_type = Some(CustomerType::B2b);

        let errors = advance(
            WizardStage::VehicleAndCustomerType,
            &draft,
            &WizardContext::default(),
        )
        .unwrap_err();
        assert!(errors.get("gstin").is_some());

        draft.gstin = "27AAAAP0267H2Z".into(); // wrong length
        let errors = validate_stage(
            WizardStage::VehicleAndCustomerType,
            &draft,
            &WizardContext::default(),
        );
        assert!(errors.get("gstin").is_some());

        draft.gstin = "27AAAAP0267H2ZN".into();
        let next = advance(
            WizardStage::VehicleAndCustomerType,
            &draft,
            &WizardContext::default(),
        )
        .unwrap();
        assert_eq!(next, Some(WizardStage::ColorAndExecutive));
    }

    #[test]
    fn test_stage1_bh_crtm_requires_rto_amount() {
        use crate::models::booking::RtoType;

        let mut draft = filled_stage1_draft();
        draft.rto_type = RtoType::Bh;
        let errors = validate_stage(
            WizardStage::VehicleAndCustomerType,
            &draft,
            &WizardContext::default(),
        );
        assert!(errors.get("rto_amount").is_some());

        draft.rto_amount = Some(Decimal::from(1500));
        let errors = validate_stage(
            WizardStage::VehicleAndCustomerType,
            &draft,
            &WizardContext::default(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_stage2_blocks_without_available_executives() {
        let mut draft = filled_stage1_draft();
        draft.model_color = Some(Uuid::new_v4());
        draft.sales_executive = Some(Uuid::new_v4());

        let ctx = WizardContext {
            active_sales_executives: 0,
            ..Default::default()
        };
        let errors = validate_stage(WizardStage::ColorAndExecutive, &draft, &ctx);
        assert!(errors
            .get("sales_executive")
            .unwrap()
            .contains("No active sales executives"));
    }

    #[test]
    fn test_stage3_format_checks() {
        let mut draft = filled_kyc_draft();
        draft.customer_details.mobile1 = "1234567890".into();
        draft.customer_details.pan_no = "ABCD1234EF".into();

        let errors = validate_stage(WizardStage::KycDetails, &draft, &WizardContext::default());
        assert!(errors.get("mobile1").is_some());
        assert!(errors.get("pan_no").is_some());
        assert!(errors.get("aadhar_number").is_none());

        let errors = validate_stage(
            WizardStage::KycDetails,
            &filled_kyc_draft(),
            &WizardContext::default(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_stage4_otp_gate() {
        let mut draft = filled_kyc_draft();
        draft.payment.payment_type = Some(PaymentType::Cash);
        draft.exchange.applicable = true;
        draft.exchange.broker_id = Some(Uuid::new_v4());
        draft.exchange.price = Some(Decimal::from(15000));
        draft.exchange.vehicle_number = "MH13AB1234".into();
        draft.exchange.chassis_number = "MD626AL55C1F12345".into();

        let ctx = WizardContext {
            active_sales_executives: 1,
            broker_otp_required: true,
            otp_status: OtpStatus::Sent,
        };
        let errors = validate_stage(WizardStage::PaymentAndExchange, &draft, &ctx);
        assert!(errors.get("otpVerification").is_some());

        let ctx = WizardContext {
            otp_status: OtpStatus::Verified,
            ..ctx
        };
        let errors = validate_stage(WizardStage::PaymentAndExchange, &draft, &ctx);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_stage4_finance_requires_financer() {
        let mut draft = filled_kyc_draft();
        draft.payment.payment_type = Some(PaymentType::Finance);

        let errors = validate_stage(
            WizardStage::PaymentAndExchange,
            &draft,
            &WizardContext::default(),
        );
        assert!(errors.get("financer").is_some());

        draft.payment.financer_id = Some(Uuid::new_v4());
        let errors = validate_stage(
            WizardStage::PaymentAndExchange,
            &draft,
            &WizardContext::default(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_stage6_discount_rules() {
        let mut draft = filled_kyc_draft();
        let errors = validate_stage(
            WizardStage::DiscountAndReview,
            &draft,
            &WizardContext::default(),
        );
        assert!(errors.get("discount_value").is_some());

        draft.discount.discount_type = DiscountType::Fixed;
        draft.discount.value = Some(Decimal::from(-5));
        let errors = validate_stage(
            WizardStage::DiscountAndReview,
            &draft,
            &WizardContext::default(),
        );
        assert_eq!(errors.get("discount_value"), Some("Discount cannot be negative"));

        draft.discount.value = Some(Decimal::ZERO);
        let errors = validate_stage(
            WizardStage::DiscountAndReview,
            &draft,
            &WizardContext::default(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_all_collects_in_stage_order() {
        let draft = BookingDraft::default();
        let errors = validate_all(&draft, &WizardContext::default());
        // Stage-1 fields come before stage-4/6 fields
        assert_eq!(errors.first().unwrap().0, "customer_type");
        assert!(errors.get("payment_type").is_some());
        assert!(errors.get("discount_value").is_some());
    }

    #[test]
    fn test_stage_numbering_roundtrip() {
        for stage in WizardStage::ALL {
            assert_eq!(WizardStage::from_number(stage.number()), Some(stage));
        }
        assert_eq!(WizardStage::from_number(0), None);
        assert_eq!(WizardStage::from_number(7), None);
        assert_eq!(WizardStage::DiscountAndReview.next(), None);
    }

    #[test]
    fn test_model_change_clears_dependents() {
        let mut draft = filled_stage1_draft();
        draft.model_color = Some(Uuid::new_v4());
        draft.accessory_ids.push(Uuid::new_v4());

        on_model_changed(&mut draft, Uuid::new_v4());
        assert!(draft.model_color.is_none());
        assert!(draft.accessory_ids.is_empty());
    }

    #[test]
    fn test_branch_change_clears_branch_scoped_fields() {
        let mut draft = filled_stage1_draft();
        draft.sales_executive = Some(Uuid::new_v4());
        draft.exchange.broker_id = Some(Uuid::new_v4());

        on_branch_changed(&mut draft, Uuid::new_v4());
        assert!(draft.model_id.is_none());
        assert!(draft.sales_executive.is_none());
        assert!(draft.exchange.broker_id.is_none());
    }
}
