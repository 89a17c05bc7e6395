/// Classification for retry policy.
///
/// | Class | Retry the same request? |
/// |-------|-------------------------|
/// | `Never` | No, the caller degrades or gives up |
/// | `WithBackoff` | Yes, after waiting |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad key, malformed body, unreadable override file.
    Never,

    /// Transient failure (HTTP 429, timeout). Waiting and retrying may succeed.
    WithBackoff,
}
