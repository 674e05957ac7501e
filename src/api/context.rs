use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::error::ApiError;

/// Cancellation and deadline carried by every request.
///
/// Cloning shares the same cancellation token. `child()` derives a context
/// that is cancelled with its parent but can also be cancelled on its own.
#[derive(Debug, Clone)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never done unless cancelled explicitly.
    pub fn background() -> Self {
        RequestContext {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn from_token(token: CancellationToken) -> Self {
        RequestContext {
            token,
            deadline: None,
        }
    }

    /// Derives a context whose deadline is `timeout` from now, or the parent's
    /// deadline if that comes first.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };
        RequestContext {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn child(&self) -> Self {
        RequestContext {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The reason this context is finished, if it is.
    pub fn err(&self) -> Option<ApiError> {
        if self.token.is_cancelled() {
            return Some(ApiError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ApiError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> ApiError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => ApiError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => ApiError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                ApiError::Cancelled
            }
        }
    }

    /// Runs `fut` unless the context finishes first.
    ///
    /// An already finished context fails without polling `fut`.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            res = fut => res,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}
