/// Cache keys for organization-scoped billing queries.
///
/// Key derivation is deterministic: two hook invocations with identical
/// parameters produce equal keys, which is what lets the query engine share
/// one cache entry and deduplicate identical in-flight requests. Slots are
/// optional because keys are derived before the enablement gate decides
/// whether the query may run at all.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum OrganizationKey {
    /// The committed subscription of an organization.
    Subscription {
        /// Organization identifier.
        slug: Option<String>,
    },
    /// Preview of a subscription change to a target tier.
    SubscriptionPreview {
        /// Organization identifier.
        slug: Option<String>,
        /// Target subscription tier.
        tier: Option<String>,
    },
}

impl OrganizationKey {
    /// Key for the committed subscription of `slug`.
    pub fn subscription(slug: Option<&str>) -> Self {
        OrganizationKey::Subscription {
            slug: slug.map(str::to_owned),
        }
    }

    /// Key for a preview of changing `slug`'s subscription to `tier`.
    pub fn subscription_preview(slug: Option<&str>, tier: Option<&str>) -> Self {
        OrganizationKey::SubscriptionPreview {
            slug: slug.map(str::to_owned),
            tier: tier.map(str::to_owned),
        }
    }
}
