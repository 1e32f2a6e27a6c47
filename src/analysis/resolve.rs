use futures::future::join_all;

use crate::{
    spotify::Catalog,
    types::{CountEntry, Credential, UserSummary},
};

/// Outcome of a single profile lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved { name: String },
    Unresolved { fallback_id: String },
}

impl Resolution {
    pub fn display_name(self) -> String {
        match self {
            Resolution::Resolved { name } => name,
            Resolution::Unresolved { fallback_id } => fallback_id,
        }
    }
}

/// Looks up one user's display name. Never fails: any error becomes
/// [`Resolution::Unresolved`].
///
/// Every id is looked up, including the `"unknown"` placeholder used for
/// items without a contributor. An empty display name falls back to the
/// profile id.
pub async fn resolve_user(
    catalog: &dyn Catalog,
    credential: &Credential,
    user_id: &str,
) -> Resolution {
    let unresolved = || Resolution::Unresolved {
        fallback_id: user_id.to_string(),
    };

    match catalog.user_profile(credential, user_id).await {
        Ok(profile) => {
            let name = profile
                .display_name
                .filter(|n| !n.is_empty())
                .unwrap_or(profile.id);
            if name.is_empty() {
                unresolved()
            } else {
                Resolution::Resolved { name }
            }
        }
        Err(e) => {
            tracing::warn!(user_id, error = %e, "could not resolve user, falling back to id");
            unresolved()
        }
    }
}

/// Resolves display names for the ranked contributors.
///
/// All lookups run concurrently and the result is only produced once every
/// one of them has finished. Order and counts of `top_users` are preserved.
pub async fn resolve_users(
    catalog: &dyn Catalog,
    credential: &Credential,
    top_users: Vec<CountEntry<String>>,
) -> Vec<UserSummary> {
    let lookups = top_users
        .iter()
        .map(|entry| resolve_user(catalog, credential, &entry.key));
    let resolutions = join_all(lookups).await;

    top_users
        .into_iter()
        .zip(resolutions)
        .map(|(entry, resolution)| UserSummary {
            display_name: resolution.display_name(),
            id: entry.key,
            count: entry.count,
        })
        .collect()
}
