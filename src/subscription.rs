use std::rc::Rc;

use futures::FutureExt;
use leptos::*;
use serde::{Deserialize, Serialize};

use crate::client::decode_response;
use crate::{
    retry_transient, ApiClient, ApiError, CancellationSignal, OrganizationKey, QueryEngine,
    QueryFetcher, QueryOptions, QueryResult, RetryFn,
};

/// Variables identifying whose subscription to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionVariables {
    /// Organization identifier.
    pub organization_slug: Option<String>,
}

impl SubscriptionVariables {
    /// Variables with the identifier present.
    pub fn new(organization_slug: impl Into<String>) -> Self {
        Self {
            organization_slug: Some(organization_slug.into()),
        }
    }

    /// The identifier is present, so the query is allowed to run.
    pub fn is_defined(&self) -> bool {
        self.organization_slug.is_some()
    }

    fn require(&self) -> Result<&str, ApiError> {
        match self.organization_slug.as_deref() {
            Some(slug) if !slug.is_empty() => Ok(slug),
            _ => Err(ApiError::new("organization slug is required")),
        }
    }
}

/// The committed subscription of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSubscription {
    /// Current subscription tier.
    pub tier: String,
    /// Subscription status as reported by the billing provider.
    pub status: String,
    /// Start of the current billing period.
    pub current_period_start: Option<String>,
    /// End of the current billing period.
    pub current_period_end: Option<String>,
    /// Whether the subscription is set to cancel at period end.
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

fn subscription_path(slug: &str) -> String {
    format!("/organizations/{slug}/billing/subscription")
}

/// Fetch the organization's committed subscription.
pub async fn fetch_subscription(
    client: &ApiClient,
    variables: &SubscriptionVariables,
    signal: Option<CancellationSignal>,
) -> Result<OrganizationSubscription, ApiError> {
    let slug = variables.require()?;
    let value = client.get_json(&subscription_path(slug), signal).await?;
    decode_response(value)
}

/// Query hook for the committed subscription, keyed by
/// [`OrganizationKey::subscription`]. Gate, retry and override semantics
/// match [`use_subscription_preview`](crate::use_subscription_preview).
pub fn use_subscription<Engine>(
    engine: &Engine,
    client: ApiClient,
    variables: impl Fn() -> SubscriptionVariables + 'static,
    options: QueryOptions<OrganizationSubscription, ApiError>,
) -> QueryResult<OrganizationSubscription, ApiError>
where
    Engine: QueryEngine,
{
    let variables = Rc::new(variables);

    let enabled = {
        let variables = variables.clone();
        let requested = options.enabled.clone();
        Signal::derive(move || requested.get() && (*variables)().is_defined())
    };

    let retry: RetryFn<ApiError> = options
        .retry
        .clone()
        .unwrap_or_else(|| Rc::new(retry_transient));

    let key = {
        let variables = variables.clone();
        move || {
            let variables = (*variables)();
            OrganizationKey::subscription(variables.organization_slug.as_deref())
        }
    };

    let fetcher: QueryFetcher<OrganizationSubscription, ApiError> = {
        Rc::new(move || {
            let client = client.clone();
            let variables = (*variables)();
            async move { fetch_subscription(&client, &variables, None).await }.boxed_local()
        })
    };

    let options = QueryOptions {
        enabled: enabled.into(),
        retry: Some(retry),
        ..options
    }
    .validate();

    engine.query(key, fetcher, options)
}
