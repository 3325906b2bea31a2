use std::rc::Rc;

use leptos::*;

use crate::QueryState;

/// Reactive query result, as handed to the UI layer.
#[derive(Clone)]
pub struct QueryResult<V, E>
where
    V: 'static,
    E: 'static,
{
    /// The current value of the query. None until a fetch has completed.
    pub data: Signal<Option<V>>,
    /// The terminal error, once the retry policy has given up. None while
    /// the query is inert, fetching, or has data.
    pub error: Signal<Option<E>>,
    /// The full state of the query lifecycle.
    pub state: Signal<QueryState<V, E>>,
    /// True during the first fetch, when no data exists yet.
    pub is_loading: Signal<bool>,
    /// True whenever a fetch is in flight, including automatic retries.
    pub is_fetching: Signal<bool>,
    /// Refetch the query.
    pub refetch: Rc<dyn Fn()>,
}

impl<V, E> QueryResult<V, E>
where
    V: Clone + 'static,
    E: Clone + 'static,
{
    /// Derives the convenience signals from a state signal.
    ///
    /// Engines hold a single [`QueryState`] signal per cache entry; this is
    /// the one place that fans it out into the data/error/loading views.
    pub fn from_state(state: Signal<QueryState<V, E>>, refetch: Rc<dyn Fn()>) -> Self {
        QueryResult {
            data: Signal::derive(move || state.with(|s| s.data().cloned())),
            error: Signal::derive(move || state.with(|s| s.error().cloned())),
            is_loading: Signal::derive(move || {
                state.with(|s| matches!(s, QueryState::Loading))
            }),
            is_fetching: Signal::derive(move || state.with(|s| s.is_fetching())),
            state,
            refetch,
        }
    }
}
