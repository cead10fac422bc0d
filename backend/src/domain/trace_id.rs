//! Request correlation identifier.
//!
//! Each request handled by the registry runs inside a [`TraceId::scope`].
//! Errors built while the scope is active record the identifier, and the
//! HTTP layer echoes it in the `trace-id` response header.
//!
//! Task-locals do not follow `tokio::spawn`; wrap spawned work in
//! [`TraceId::scope`] again.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Request and response header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request correlation identifier.
///
/// # Examples
/// ```
/// use user_registry::domain::TraceId;
///
/// let id = TraceId::adopt_or_generate(Some("6f1c9a8e-4b7d-4e0a-9d55-0e2b3c4d5e6f"));
/// assert_eq!(id.to_string(), "6f1c9a8e-4b7d-4e0a-9d55-0e2b3c4d5e6f");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a caller-supplied header value.
    ///
    /// Surrounding whitespace is ignored. The nil UUID is refused because it
    /// cannot tell one request from another.
    #[must_use]
    pub fn from_header(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<Self>()
            .ok()
            .filter(|id| !id.0.is_nil())
    }

    /// Keep the caller's identifier when usable, otherwise mint one.
    #[must_use]
    pub fn adopt_or_generate(raw: Option<&str>) -> Self {
        raw.and_then(Self::from_header)
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
