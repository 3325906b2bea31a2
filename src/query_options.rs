use std::rc::Rc;
use std::time::Duration;

use leptos::*;

/// Retry predicate: given the number of failures so far and the error from
/// the latest attempt, decide whether the engine should try again.
pub type RetryFn<E> = Rc<dyn Fn(u32, &E) -> bool>;

const DEFAULT_STALE_TIME: Duration = Duration::from_secs(10);
const DEFAULT_GC_TIME: Duration = Duration::from_secs(60 * 5);

/// Options for a single query.
///
/// Every field is a straight override of the default, with one exception:
/// hooks always AND-combine `enabled` with their own input-presence check,
/// so a caller override can widen the gate but never bypass it.
#[derive(Clone)]
pub struct QueryOptions<V, E> {
    /// Whether the query may execute at all. While false, the engine must
    /// not invoke the fetcher and the query sits in its created state.
    /// Default is true.
    pub enabled: MaybeSignal<bool>,
    /// Retry predicate consulted by the engine after each failed fetch.
    /// None means the hook substitutes its default policy.
    pub retry: Option<RetryFn<E>>,
    /// Placeholder value to use while the query is loading for the first time.
    pub default_value: Option<V>,
    /// The duration that should pass before a query is considered stale.
    /// If no stale_time, the query will never be considered stale.
    /// Stale_time can never be greater than gc_time.
    /// Default is 10 seconds.
    pub stale_time: Option<Duration>,
    /// The amount of time a query will be cached, once it's considered stale.
    /// If no gc_time, the query will never be evicted from cache.
    /// Default is 5 minutes.
    pub gc_time: Option<Duration>,
    /// If no refetch interval, the query will never refetch on a timer.
    pub refetch_interval: Option<Duration>,
}

impl<V, E> QueryOptions<V, E> {
    /// Set the enabled flag or signal.
    pub fn set_enabled(self, enabled: impl Into<MaybeSignal<bool>>) -> Self {
        QueryOptions {
            enabled: enabled.into(),
            ..self
        }
    }

    /// Set the retry predicate.
    pub fn set_retry(self, retry: RetryFn<E>) -> Self {
        QueryOptions {
            retry: Some(retry),
            ..self
        }
    }

    /// Set the default value.
    pub fn set_default_value(self, default_value: Option<V>) -> Self {
        QueryOptions {
            default_value,
            ..self
        }
    }

    /// Set the stale_time.
    pub fn set_stale_time(self, stale_time: Option<Duration>) -> Self {
        QueryOptions { stale_time, ..self }
    }

    /// Set the gc time.
    pub fn set_gc_time(self, gc_time: Option<Duration>) -> Self {
        QueryOptions { gc_time, ..self }
    }

    /// Set the refetch interval.
    pub fn set_refetch_interval(self, refetch_interval: Option<Duration>) -> Self {
        QueryOptions {
            refetch_interval,
            ..self
        }
    }

    /// Ensures that gc_time is >= stale_time.
    pub fn validate(self) -> Self {
        let stale_time = ensure_valid_stale_time(&self.stale_time, &self.gc_time);

        QueryOptions { stale_time, ..self }
    }
}

impl<V, E> Default for QueryOptions<V, E> {
    fn default() -> Self {
        Self {
            enabled: MaybeSignal::Static(true),
            retry: None,
            default_value: None,
            stale_time: Some(DEFAULT_STALE_TIME),
            gc_time: Some(DEFAULT_GC_TIME),
            refetch_interval: None,
        }
    }
}

impl<V, E> std::fmt::Debug for QueryOptions<V, E>
where
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryOptions")
            .field("retry", &self.retry.as_ref().map(|_| "<predicate>"))
            .field("default_value", &self.default_value)
            .field("stale_time", &self.stale_time)
            .field("gc_time", &self.gc_time)
            .field("refetch_interval", &self.refetch_interval)
            .finish()
    }
}

fn ensure_valid_stale_time(
    stale_time: &Option<Duration>,
    gc_time: &Option<Duration>,
) -> Option<Duration> {
    match (stale_time, gc_time) {
        (Some(ref stale_time), Some(ref gc_time)) => {
            if stale_time > gc_time {
                logging::debug_warn!(
                    "stale_time is greater than gc_time. Using gc_time instead. stale_time: {}, gc_time: {}",
                    stale_time.as_millis(),
                    gc_time.as_millis()
                );
                Some(*gc_time)
            } else {
                Some(*stale_time)
            }
        }
        (None, Some(ref gc_duration)) => {
            logging::debug_warn!(
                "stale_time (infinity) is greater than gc_time. Using gc_time instead. gc_time: {}",
                gc_duration.as_millis()
            );
            *gc_time
        }
        (stale_time, _) => *stale_time,
    }
}
