use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::error::ChunkerError;

/// Cancellation and deadline signals for an extraction call.
///
/// Cloning shares the underlying token, so one context can be handed to many
/// worker threads and cancelled from anywhere.
#[derive(Debug, Clone, Default)]
pub struct ChunkContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ChunkContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Fail if the call was cancelled or its deadline has passed.
    ///
    /// Cancellation wins when both hold.
    pub fn check(&self) -> Result<(), ChunkerError> {
        if self.token.is_cancelled() {
            return Err(ChunkerError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(ChunkerError::DeadlineExceeded);
        }
        Ok(())
    }
}
