/*
[INPUT]:  Veygo API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Emails are matched case-insensitively by the backend; send them lowercased.
    pub fn new(email: impl AsRef<str>, password: impl Into<String>) -> Self {
        Self {
            email: email.as_ref().trim().to_lowercase(),
            password: password.into(),
        }
    }
}

/// Payload for `POST /api/v1/apartment/add-apartment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApartment {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub accepted_school_email_domain: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub free_tier_hours: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
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
    #[serde(default = "default_true")]
    pub is_operating: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default = "default_uni_id")]
    pub uni_id: i64,
    #[serde(default)]
    pub taxes: Vec<i64>,
}

fn default_true() -> bool {
    true
}

fn default_uni_id() -> i64 {
    1
}
