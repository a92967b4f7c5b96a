/*
[INPUT]:  Completion signal from the drain loop
[OUTPUT]: Future resolving to the applied outcome
[POS]:    Queue layer - per-task completion handle
[UPDATE]: When completion reporting changes
*/

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::auth::Outcome;
use crate::http::{Result, VeygoError};

/// Handle for one submitted task.
///
/// Resolves once the task ran and its [`Outcome`] was applied to the store.
/// Dropping it does not cancel the task.
#[derive(Debug)]
#[must_use = "drop the submission explicitly to fire and forget"]
pub struct Submission {
    done: oneshot::Receiver<Outcome>,
}

impl Submission {
    pub(crate) fn new(done: oneshot::Receiver<Outcome>) -> Self {
        Self { done }
    }
}

impl Future for Submission {
    type Output = Result<Outcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.done)
            .poll(cx)
            .map(|result| result.map_err(|_| VeygoError::TaskAborted))
    }
}
