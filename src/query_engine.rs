use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::{QueryKey, QueryOptions, QueryResult, QueryValue};

/// A query fetcher: every invocation produces one attempt at the underlying
/// request. Retries are separate invocations.
pub type QueryFetcher<V, E> = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<V, E>>>;

/// The cached-query capability this crate's hooks are written against.
///
/// An engine owns the cache store and the execution loop; hooks hand it a
/// key, a fetcher and options, and read back reactive state. The engine is
/// expected to:
///
/// - share one cache entry, and one in-flight request, between queries with
///   equal keys (deduplication);
/// - never invoke the fetcher while `options.enabled` is false — a disabled
///   query sits inert in its created state;
/// - consult `options.retry` after each failed attempt, passing the number
///   of failures that have already occurred (0 on the first consult), and
///   refetch while it returns true;
/// - surface the error of the last attempt once the predicate refuses.
///
/// Cancellation of an in-flight fetch is cooperative: the engine drops or
/// races the future returned by the fetcher.
pub trait QueryEngine {
    /// Register a query and return its reactive result.
    fn query<K, V, E>(
        &self,
        key: impl Fn() -> K + 'static,
        fetcher: QueryFetcher<V, E>,
        options: QueryOptions<V, E>,
    ) -> QueryResult<V, E>
    where
        K: QueryKey + 'static,
        V: QueryValue + 'static,
        E: QueryValue + 'static;
}


#[cfg(test)]
mod tests {
    use super::mock::MockEngine;
    use super::*;
    use crate::{retry_transient, ApiError, RetryFn};
    use futures::FutureExt;
    use leptos::SignalGetUntracked;

    fn failing_fetcher() -> QueryFetcher<i32, ApiError> {
        Rc::new(|| async { Err(ApiError::new("server error")) }.boxed_local())
    }

    fn default_options() -> QueryOptions<i32, ApiError> {
        let retry: RetryFn<ApiError> = Rc::new(retry_transient);
        QueryOptions::default().set_retry(retry)
    }

    #[test]
    fn retries_until_the_predicate_refuses() {
        let _ = leptos::create_runtime();

        let engine = MockEngine::new();
        let result = engine.query(
            || "retry-key",
            failing_fetcher(),
            default_options(),
        );

        // 1 initial attempt + 3 retries.
        assert_eq!(engine.last_call().attempts, 4);
        assert_eq!(
            result.error.get_untracked(),
            Some(ApiError::new("server error"))
        );
    }

    #[test]
    fn bad_request_is_not_retried() {
        let _ = leptos::create_runtime();

        let engine = MockEngine::new();
        let fetcher: QueryFetcher<i32, ApiError> =
            Rc::new(|| async { Err(ApiError::with_code("bad request", 400)) }.boxed_local());
        let result = engine.query(|| "bad-request-key", fetcher, default_options());

        assert_eq!(engine.last_call().attempts, 1);
        assert_eq!(
            result.error.get_untracked(),
            Some(ApiError::with_code("bad request", 400))
        );
    }

    #[test]
    fn success_lands_in_loaded() {
        let _ = leptos::create_runtime();

        let engine = MockEngine::new();
        let fetcher: QueryFetcher<i32, ApiError> = Rc::new(|| async { Ok(42) }.boxed_local());
        let result = engine.query(|| "success-key", fetcher, default_options());

        assert_eq!(result.data.get_untracked(), Some(42));
        assert_eq!(result.error.get_untracked(), None);
    }

    #[test]
    fn disabled_queries_never_fetch() {
        let _ = leptos::create_runtime();

        let engine = MockEngine::new();
        let result = engine.query(
            || "disabled-key",
            failing_fetcher(),
            default_options().set_enabled(false),
        );

        let call = engine.last_call();
        assert!(!call.enabled);
        assert_eq!(call.attempts, 0);
        assert_eq!(result.data.get_untracked(), None);
        assert_eq!(result.error.get_untracked(), None);
    }
}
