/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for veygo-admin-adapter tests

use std::path::PathBuf;

use veygo_admin_adapter::{ClientConfig, VeygoClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> VeygoClient {
    VeygoClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Fresh credential file path under the system temp dir
#[allow(dead_code)]
pub fn temp_credential_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("veygo-admin-test-{}", uuid::Uuid::new_v4()))
        .join("credential.json")
}

/// `{"admin": ...}` body as returned by login and retrieve
pub fn admin_body(id: i64) -> serde_json::Value {
    serde_json::json!({
        "admin": {
            "id": id,
            "name": "Ada Admin",
            "student_email": "ada@veygo.rent",
            "student_email_expiration": "2030-06-01",
            "phone": "5551234567",
            "phone_is_verified": true,
            "date_of_birth": "1990-05-04",
            "gender": "PNTS",
            "date_of_registration": 1717200000,
            "apartment_id": 1,
            "signature_datetime": 1717300000,
            "plan_tier": "Platinum",
            "plan_renewal_day": "1",
            "plan_expire_month_year": "012027",
            "plan_available_duration": 12.5,
            "is_plan_annual": true,
            "employee_tier": "Admin"
        }
    })
}
