//! Request-scoped trace identifier.
//!
//! The HTTP middleware places a fresh [`TraceId`] in tokio task-local storage
//! for every request so errors and log lines can be correlated. Task-locals do
//! not follow work onto other tasks; [`TraceId::spawn_blocking`] re-enters the
//! scope on the blocking pool for CPU-heavy work such as password hashing.

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the request's trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request correlation identifier.
///
/// # Examples
/// ```
/// use voice_orders::domain::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "00000000-0000-0000-0000-000000000000".parse().expect("uuid");
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a new random trace identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The identifier in scope for the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Run a blocking closure on the blocking pool, keeping the current trace
    /// identifier visible inside it.
    ///
    /// # Errors
    /// Returns the [`tokio::task::JoinError`] when the closure panics or the
    /// runtime is shutting down.
    pub async fn spawn_blocking<F, R>(f: F) -> Result<R, tokio::task::JoinError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        match Self::current() {
            Some(id) => {
                tokio::task::spawn_blocking(move || TRACE_ID.sync_scope(id, f)).await
            }
            None => tokio::task::spawn_blocking(f).await,
        }
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn scope_exposes_identifier() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn blocking_work_sees_caller_scope() {
        let expected = TraceId::from_uuid(Uuid::nil());
        let observed = TraceId::scope(expected, async {
            TraceId::spawn_blocking(TraceId::current).await
        })
        .await
        .expect("blocking task completes");
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn blocking_work_without_scope_has_no_identifier() {
        let observed = TraceId::spawn_blocking(TraceId::current)
            .await
            .expect("blocking task completes");
        assert!(observed.is_none());
    }
}
