/*
[INPUT]:  Veygo API schema definitions and serde requirements
[OUTPUT]: Typed Rust response envelopes with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::{Apartment, PublishRenter, Tax, TransponderCompany};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminEnvelope {
    pub admin: PublishRenter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentsEnvelope {
    pub apartments: Vec<Apartment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxesEnvelope {
    pub taxes: Vec<Tax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransponderCompaniesEnvelope {
    pub transponder_companies: Vec<TransponderCompany>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentersEnvelope {
    pub renters: Vec<PublishRenter>,
}

/// Result of an add-apartment call; the backend answers 406 for a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddApartmentStatus {
    Created,
    AlreadyExists,
}
