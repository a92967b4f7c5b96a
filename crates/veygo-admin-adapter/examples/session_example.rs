/*
[INPUT]:  Credential file path (first CLI argument, optional)
[OUTPUT]: Console output of the stored session and, if valid, the admin profile
[POS]:    Examples - stored session validation
[UPDATE]: When AdminSession or CredentialStore API changes
*/

//! Example: validate a stored admin session
//!
//! Loads the credential file, runs one validation through the serial queue
//! and prints the rotated credential.

use veygo_admin_adapter::{AdminSession, CredentialStore, JsonFilePersistence, VeygoClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./.veygo-admin/credential.json".to_string());

    let store = CredentialStore::load(JsonFilePersistence::new(&path))?;
    println!("=== Veygo Session Example ===");
    println!("Credential file: {path}");
    println!("Stored user id: {}", store.read().user_id);

    let session = AdminSession::new(VeygoClient::new()?, store);
    match session.validate().await {
        Ok(admin) => println!("Signed in as {} ({})", admin.name, admin.student_email),
        Err(err) => println!("Session not valid: {err}"),
    }

    println!("Authenticated after call: {}", session.credential().is_authenticated());
    Ok(())
}
