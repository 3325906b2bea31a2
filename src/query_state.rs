use crate::Instant;

/// The lifecycle of a query.
///
/// A query starts in [`Created`](QueryState::Created), moves through its
/// first fetch, and from then on alternates between holding data and
/// refetching. A fetch that fails after the retry policy gives up lands in
/// [`Errored`](QueryState::Errored).
#[derive(Clone, PartialEq, Eq, Default)]
pub enum QueryState<V, E> {
    /// The query exists but no fetch has been initiated. Disabled queries
    /// stay in this state.
    #[default]
    Created,

    /// The first fetch is in flight and no data is available yet.
    Loading,

    /// A subsequent fetch is in flight. The associated [`QueryData`] holds
    /// the previously fetched data.
    Fetching(QueryData<V>),

    /// A fetch completed successfully.
    Loaded(QueryData<V>),

    /// A fetch failed and the retry policy refused another attempt.
    Errored(E),
}

impl<V, E> QueryState<V, E> {
    /// Returns the QueryData for the current state, if present.
    pub fn query_data(&self) -> Option<&QueryData<V>> {
        match self {
            QueryState::Created | QueryState::Loading | QueryState::Errored(_) => None,
            QueryState::Fetching(data) | QueryState::Loaded(data) => Some(data),
        }
    }

    /// Returns the data contained within the state, if present.
    pub fn data(&self) -> Option<&V> {
        self.query_data().map(|d| &d.data)
    }

    /// Returns the terminal error, if the query is in an error state.
    pub fn error(&self) -> Option<&E> {
        match self {
            QueryState::Errored(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the last updated timestamp, if present.
    pub fn updated_at(&self) -> Option<Instant> {
        self.query_data().map(|d| d.updated_at)
    }

    /// True while a fetch is in flight, first or subsequent.
    pub fn is_fetching(&self) -> bool {
        matches!(self, QueryState::Loading | QueryState::Fetching(_))
    }
}

impl<V, E> std::fmt::Debug for QueryState<V, E>
where
    V: std::fmt::Debug,
    E: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Loading => write!(f, "Loading"),
            Self::Fetching(arg0) => f.debug_tuple("Fetching").field(arg0).finish(),
            Self::Loaded(arg0) => f.debug_tuple("Loaded").field(arg0).finish(),
            Self::Errored(arg0) => f.debug_tuple("Errored").field(arg0).finish(),
        }
    }
}

/// The latest data for a query.
#[derive(Clone, PartialEq, Eq)]
pub struct QueryData<V> {
    /// The data.
    pub data: V,
    /// The instant this data was retrieved.
    pub updated_at: Instant,
}

impl<V> QueryData<V> {
    /// Creates a new QueryData with the current time as the updated_at timestamp.
    pub fn now(data: V) -> Self {
        Self {
            data,
            updated_at: Instant::now(),
        }
    }
}

impl<V> std::fmt::Debug for QueryData<V>
where
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryData")
            .field("data", &self.data)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
