use crate::ApiError;

/// Maximum number of automatic retries after the initial failed attempt.
pub const MAX_RETRIES: u32 = 3;

const BAD_REQUEST: u16 = 400;

/// Default retry policy for billing queries.
///
/// `failure_count` is the number of failures that have already occurred
/// when the engine consults the predicate, starting at 0 after the first
/// failed attempt.
pub fn retry_transient(failure_count: u32, error: &ApiError) -> bool {
    // Don't retry on 400s.
    if error.code == Some(BAD_REQUEST) {
        return false;
    }

    failure_count < MAX_RETRIES
}
