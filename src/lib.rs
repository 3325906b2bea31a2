#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # About Billing Queries
//!
//! Data-access queries for organization billing, written for [Leptos](https://github.com/leptos-rs/leptos) UIs.
//!
//! The central piece is [`use_subscription_preview`]: a query hook that
//! previews what a subscription tier change would cost an organization
//! before it is committed. The hook validates its inputs, performs the
//! preview request, and exposes the result as reactive query state through
//! a key-addressed [`QueryEngine`] — the caching/deduplication/retry
//! collaborator injected by the application.
//!
//! A query provides, via its engine:
//! - caching and deduplication by [`OrganizationKey`]
//! - an enablement gate that keeps the query inert until its inputs exist
//! - automatic retries governed by a retry predicate ([`retry_transient`])
//! - loading / fetching / error state as Leptos signals
//!
//! The requesters can also be called directly, without an engine:
//!
//! ```no_run
//! use billing_queries::{preview_subscription, ApiClient, SubscriptionPreviewVariables};
//!
//! async fn show_preview() -> Result<(), billing_queries::ApiError> {
//!     let client = ApiClient::new("https://api.example.com");
//!     let variables = SubscriptionPreviewVariables::new("acme", "pro");
//!
//!     let preview = preview_subscription(&client, &variables, None).await?;
//!     for item in preview.breakdown {
//!         println!("{}: {} x {} = {}", item.description, item.unit_price, item.quantity, item.total_price);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod instant;
mod keys;
mod query_engine;
mod query_options;
mod query_result;
mod query_state;
mod retry;
mod subscription;
mod subscription_preview;

pub use client::{ApiClient, CancellationSignal};
pub use error::*;
pub use instant::*;
pub use keys::*;
pub use query_engine::{QueryEngine, QueryFetcher};
pub use query_options::*;
pub use query_result::*;
pub use query_state::*;
pub use retry::*;
pub use subscription::*;
pub use subscription_preview::*;

/// Convenience trait for query key requirements.
pub trait QueryKey: std::fmt::Debug + Clone + std::hash::Hash + Eq {}
impl<K> QueryKey for K where K: std::fmt::Debug + Clone + std::hash::Hash + Eq {}

/// Convenience trait for query value requirements.
pub trait QueryValue: std::fmt::Debug + Clone {}
impl<V> QueryValue for V where V: std::fmt::Debug + Clone {}
