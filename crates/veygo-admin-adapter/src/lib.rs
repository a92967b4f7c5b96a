/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Veygo admin adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod queue;
pub mod session;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    Credential,
    CredentialPersistence,
    CredentialStore,
    JsonFilePersistence,
    MemoryPersistence,
    Outcome,
    classify,
};

// Re-export commonly used types from http
pub use http::{
    ApiResponse,
    ClientConfig,
    Reply,
    Result,
    VeygoClient,
    VeygoError,
    settle,
};

pub use queue::{QueueState, SerialTaskQueue, Submission};
pub use session::AdminSession;

// Re-export all types
pub use types::*;
