/// Classification for retry policy.
///
/// Used to determine how the per-symbol pipeline responds to a fetch error.
///
/// # Behavior Summary
///
/// | Class | Retry? | Effect on the symbol |
/// |-------|--------|----------------------|
/// | `Never` | No | Marked failed immediately |
/// | `WithBackoff` | Yes, bounded attempts | Marked failed once the attempt budget is spent |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - auth rejection or malformed response.
    /// The request is fundamentally broken and retrying won't help.
    Never,

    /// Retry with exponential backoff.
    ///
    /// Used for transient errors like rate limiting (429), timeouts and
    /// 5xx-class provider failures. The attempt budget is bounded; once it
    /// is exhausted the symbol is marked failed for this run, and the next
    /// invocation's overlapping window retries the same dates naturally.
    WithBackoff,
}
