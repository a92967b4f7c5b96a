/*
[INPUT]:  HTTP client configuration, credentials and Veygo endpoints
[OUTPUT]: HTTP responses, typed API results and credential outcomes
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod admin;
pub mod apartment;
pub mod client;
pub mod error;
pub mod response;
pub mod toll;
pub mod user;

pub use error::{Result, VeygoError};
pub use response::{ApiResponse, Reply, settle};

pub use client::{ClientConfig, VeygoClient};
