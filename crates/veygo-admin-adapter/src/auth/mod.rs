/*
[INPUT]:  Session credentials and task outcomes
[OUTPUT]: Credential store, persistence backends, outcome classification
[POS]:    Auth layer - owns the single active Veygo session credential
[UPDATE]: When credential lifecycle or persistence changes
*/

pub mod credential;
pub mod outcome;
pub mod persistence;
pub mod store;

pub use credential::{AUTH_HEADER, Credential};
pub use outcome::{Outcome, TOKEN_HEADER, classify};
pub use persistence::{CredentialPersistence, JsonFilePersistence, MemoryPersistence};
pub use store::CredentialStore;
