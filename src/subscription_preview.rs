use std::rc::Rc;

use futures::FutureExt;
use leptos::*;
use serde::{Deserialize, Serialize};

use crate::client::decode_response;
use crate::{
    retry_transient, ApiClient, ApiError, CancellationSignal, OrganizationKey, QueryEngine,
    QueryFetcher, QueryOptions, QueryResult, RetryFn,
};

/// Variables identifying the subscription change to preview.
///
/// Both identifiers are optional at the type level because UI code derives
/// them from route or form state that may not have resolved yet. They are
/// required at use: the hook's enablement gate keeps the query inert until
/// both are present, and the requester fails fast if called without them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPreviewVariables {
    /// Organization identifier, carried in the request path.
    pub organization_slug: Option<String>,
    /// Target subscription tier, carried in the request body.
    pub tier: Option<String>,
}

impl SubscriptionPreviewVariables {
    /// Variables with both identifiers present.
    pub fn new(organization_slug: impl Into<String>, tier: impl Into<String>) -> Self {
        Self {
            organization_slug: Some(organization_slug.into()),
            tier: Some(tier.into()),
        }
    }

    /// Both identifiers are present, so the query is allowed to run.
    pub fn is_defined(&self) -> bool {
        self.organization_slug.is_some() && self.tier.is_some()
    }

    /// The cache key for these variables.
    pub fn key(&self) -> OrganizationKey {
        OrganizationKey::subscription_preview(
            self.organization_slug.as_deref(),
            self.tier.as_deref(),
        )
    }

    fn require(&self) -> Result<(&str, &str), ApiError> {
        let slug = match self.organization_slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug,
            _ => return Err(ApiError::new("organization slug is required")),
        };
        let tier = match self.tier.as_deref() {
            Some(tier) if !tier.is_empty() => tier,
            _ => return Err(ApiError::new("tier is required")),
        };
        Ok((slug, tier))
    }
}

#[derive(Debug, Serialize)]
struct SubscriptionPreviewPayload<'a> {
    tier: &'a str,
}

/// One line item of the billing breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    /// Human readable description of the line item.
    pub description: String,
    /// Price per unit.
    pub unit_price: f64,
    /// Number of units.
    pub quantity: u32,
    /// Computed total for the line item.
    pub total_price: f64,
}

/// Server-provided breakdown of what the subscription change would cost.
/// Items are kept in server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPreviewResponse {
    /// Breakdown line items.
    pub breakdown: Vec<BreakdownItem>,
}

fn preview_path(slug: &str) -> String {
    format!("/organizations/{slug}/billing/subscription/preview")
}

/// Fetch the billing breakdown for a prospective tier change, without
/// committing anything.
///
/// Fails before any network activity if either identifier is absent or
/// empty. A response `error` member is propagated to the caller unmodified.
/// This function performs no retries, caching or logging of its own; those
/// belong to the query engine driving it.
pub async fn preview_subscription(
    client: &ApiClient,
    variables: &SubscriptionPreviewVariables,
    signal: Option<CancellationSignal>,
) -> Result<SubscriptionPreviewResponse, ApiError> {
    let (slug, tier) = variables.require()?;

    let payload = SubscriptionPreviewPayload { tier };
    let value = client
        .post_json(&preview_path(slug), &payload, signal)
        .await?;

    decode_response(value)
}

/// Query hook for previewing an organization subscription change.
///
/// Registers [`preview_subscription`] with the engine under the
/// [`OrganizationKey::subscription_preview`] key. The caller's `enabled`
/// option is AND-combined with the presence of both identifiers, so the
/// query stays inert while either is undefined no matter what the caller
/// passed. When no retry predicate is supplied, [`retry_transient`] is
/// used. Every other option field is a straight override.
pub fn use_subscription_preview<Engine>(
    engine: &Engine,
    client: ApiClient,
    variables: impl Fn() -> SubscriptionPreviewVariables + 'static,
    options: QueryOptions<SubscriptionPreviewResponse, ApiError>,
) -> QueryResult<SubscriptionPreviewResponse, ApiError>
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
        move || (*variables)().key()
    };

    let fetcher: QueryFetcher<SubscriptionPreviewResponse, ApiError> = {
        Rc::new(move || {
            let client = client.clone();
            let variables = (*variables)();
            async move { preview_subscription(&client, &variables, None).await }.boxed_local()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_engine::mock::MockEngine;
    use futures::executor::block_on;
    use serde_json::json;

    fn client() -> ApiClient {
        // Never reached: every test here fails validation or skips the fetch.
        ApiClient::new("http://127.0.0.1:9")
    }

    #[test]
    fn missing_slug_fails_before_any_network_call() {
        let variables = SubscriptionPreviewVariables {
            organization_slug: None,
            tier: Some("pro".into()),
        };
        let error = block_on(preview_subscription(&client(), &variables, None)).unwrap_err();
        assert_eq!(error, ApiError::new("organization slug is required"));
    }

    #[test]
    fn empty_slug_fails_before_any_network_call() {
        let variables = SubscriptionPreviewVariables::new("", "pro");
        let error = block_on(preview_subscription(&client(), &variables, None)).unwrap_err();
        assert_eq!(error, ApiError::new("organization slug is required"));
    }

    #[test]
    fn missing_or_empty_tier_fails_before_any_network_call() {
        let missing = SubscriptionPreviewVariables {
            organization_slug: Some("acme".into()),
            tier: None,
        };
        let error = block_on(preview_subscription(&client(), &missing, None)).unwrap_err();
        assert_eq!(error, ApiError::new("tier is required"));

        let empty = SubscriptionPreviewVariables::new("acme", "");
        let error = block_on(preview_subscription(&client(), &empty, None)).unwrap_err();
        assert_eq!(error, ApiError::new("tier is required"));
    }

    #[test]
    fn builds_the_documented_path_and_payload() {
        assert_eq!(
            preview_path("acme"),
            "/organizations/acme/billing/subscription/preview"
        );
        assert_eq!(
            serde_json::to_value(SubscriptionPreviewPayload { tier: "pro" }).unwrap(),
            json!({ "tier": "pro" })
        );
    }

    #[test]
    fn breakdown_is_returned_unchanged() {
        let response: SubscriptionPreviewResponse = decode_response(json!({
            "breakdown": [{
                "description": "Pro seat",
                "unit_price": 25,
                "quantity": 3,
                "total_price": 75
            }]
        }))
        .unwrap();

        assert_eq!(
            response.breakdown,
            vec![BreakdownItem {
                description: "Pro seat".into(),
                unit_price: 25.0,
                quantity: 3,
                total_price: 75.0,
            }]
        );
    }

    #[test]
    fn error_member_is_propagated_and_terminal() {
        let error = decode_response::<SubscriptionPreviewResponse>(json!({
            "error": { "message": "bad request", "code": 400 }
        }))
        .unwrap_err();

        assert_eq!(error, ApiError::with_code("bad request", 400));
        // The default policy refuses to retry it at any failure count.
        assert!(!retry_transient(0, &error));
        assert!(!retry_transient(3, &error));
    }

    #[test]
    fn undefined_tier_disables_the_query_despite_caller_enabled() {
        let _ = leptos::create_runtime();

        let engine = MockEngine::new();
        use_subscription_preview(
            &engine,
            client(),
            || SubscriptionPreviewVariables {
                organization_slug: Some("acme".into()),
                tier: None,
            },
            QueryOptions::default().set_enabled(true),
        );

        let call = engine.last_call();
        assert!(!call.enabled, "presence check must win over caller enabled");
        assert_eq!(call.attempts, 0);
    }

    #[test]
    fn caller_can_narrow_but_not_widen_the_gate() {
        let _ = leptos::create_runtime();

        let engine = MockEngine::inert();
        use_subscription_preview(
            &engine,
            client(),
            || SubscriptionPreviewVariables::new("acme", "pro"),
            QueryOptions::default().set_enabled(false),
        );

        assert!(!engine.last_call().enabled);
    }

    #[test]
    fn passes_key_and_default_retry_to_the_engine() {
        let _ = leptos::create_runtime();

        let engine = MockEngine::inert();
        use_subscription_preview(
            &engine,
            client(),
            || SubscriptionPreviewVariables::new("acme", "pro"),
            QueryOptions::default(),
        );

        let call = engine.last_call();
        assert!(call.enabled);
        assert!(call.has_retry, "default retry policy must be installed");
        assert_eq!(
            call.key,
            format!(
                "{:?}",
                OrganizationKey::subscription_preview(Some("acme"), Some("pro"))
            )
        );
    }
}
