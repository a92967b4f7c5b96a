/*
[INPUT]:  API tasks submitted by any caller
[OUTPUT]: One-at-a-time execution with credential outcomes applied in order
[POS]:    Queue layer - serialization point for every credentialed call
[UPDATE]: When scheduling or completion semantics change
*/

pub mod serial;
pub mod submission;

pub use serial::{QueueState, SerialTaskQueue};
pub use submission::Submission;
