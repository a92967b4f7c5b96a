/*
[INPUT]:  Veygo API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{EmployeeTier, Gender, PlanTier};

/// Renter / admin profile as published by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRenter {
    pub id: i64,
    pub name: String,
    pub student_email: String,
    #[serde(default)]
    pub student_email_expiration: Option<NaiveDate>,
    pub phone: String,
    pub phone_is_verified: bool,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date_of_registration: DateTime<Utc>,
    #[serde(default)]
    pub drivers_license_number: Option<String>,
    #[serde(default)]
    pub drivers_license_state_region: Option<String>,
    #[serde(default)]
    pub drivers_license_expiration: Option<NaiveDate>,
    #[serde(default)]
    pub insurance_liability_expiration: Option<NaiveDate>,
    #[serde(default)]
    pub insurance_collision_expiration: Option<NaiveDate>,
    pub apartment_id: i64,
    #[serde(default)]
    pub lease_agreement_expiration: Option<NaiveDate>,
    #[serde(default)]
    pub billing_address: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub signature_datetime: Option<DateTime<Utc>>,
    pub plan_tier: PlanTier,
    pub plan_renewal_day: String,
    pub plan_expire_month_year: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub plan_available_duration: Decimal,
    pub is_plan_annual: bool,
    pub employee_tier: EmployeeTier,
    #[serde(default)]
    pub subscription_payment_method_id: Option<i64>,
}

impl PublishRenter {
    /// Whether the student email is still verified on `today`.
    pub fn email_is_valid(&self, today: NaiveDate) -> bool {
        self.student_email_expiration
            .is_some_and(|expiration| expiration >= today)
    }
}

/// Look up a renter by id in a fetched list.
pub fn find_renter(renters: &[PublishRenter], renter_id: i64) -> Option<&PublishRenter> {
    renters.iter().find(|renter| renter.id == renter_id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub accepted_school_email_domain: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub free_tier_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub free_tier_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub silver_tier_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub silver_tier_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gold_tier_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gold_tier_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub platinum_tier_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub platinum_tier_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub duration_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub liability_protection_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pcdw_protection_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pcdw_ext_protection_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rsa_protection_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pai_protection_rate: Decimal,
    pub is_operating: bool,
    pub is_public: bool,
    pub uni_id: i64,
    #[serde(default)]
    pub taxes: Vec<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub multiplier: Decimal,
    pub is_effective: bool,
}

/// Toll transponder company and the column mapping used to import its statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransponderCompany {
    pub id: i64,
    pub name: String,
    pub corresponding_key_for_vehicle_id: String,
    pub corresponding_key_for_transaction_name: String,
    pub custom_prefix_for_transaction_name: String,
    pub corresponding_key_for_transaction_time: String,
    pub corresponding_key_for_transaction_amount: String,
    pub timestamp_format: String,
    #[serde(default)]
    pub timezone: Option<String>,
}
