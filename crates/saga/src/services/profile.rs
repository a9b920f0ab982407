//! User profile lookup trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the profile provider.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The presented token does not resolve to a profile.
    #[error("No profile for the presented token")]
    NotFound,

    /// The profile service could not be reached.
    #[error("Profile service unavailable: {0}")]
    Upstream(String),
}

/// Identity details behind an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Contact email, handed to the payment gateway.
    pub email: String,
    /// Role names granted to the user.
    pub roles: Vec<String>,
}

/// Trait for resolving bearer tokens to user profiles.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Resolves the profile behind a bearer token.
    async fn get_profile(&self, token: &str) -> Result<UserProfile, ProfileError>;
}

#[derive(Debug, Default)]
struct InMemoryProfileState {
    profiles: HashMap<String, UserProfile>,
    default_profile: Option<UserProfile>,
    lookup_calls: u32,
    fail_upstream: bool,
}

/// In-memory profile provider for testing.
///
/// Lookups resolve registered tokens only, unless a default profile was
/// set, in which case unregistered tokens fall back to it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileProvider {
    state: Arc<RwLock<InMemoryProfileState>>,
}

impl InMemoryProfileProvider {
    /// Creates an empty provider; unregistered tokens resolve to NotFound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that resolves every token to the given profile.
    pub fn with_default_profile(profile: UserProfile) -> Self {
        let provider = Self::default();
        provider.state.write().unwrap().default_profile = Some(profile);
        provider
    }

    /// Registers a profile under a token.
    pub fn register(&self, token: impl Into<String>, profile: UserProfile) {
        self.state
            .write()
            .unwrap()
            .profiles
            .insert(token.into(), profile);
    }

    /// Configures the provider to fail on the next lookup.
    pub fn set_fail_upstream(&self, fail: bool) {
        self.state.write().unwrap().fail_upstream = fail;
    }

    /// Returns how many lookups were attempted.
    pub fn lookup_call_count(&self) -> u32 {
        self.state.read().unwrap().lookup_calls
    }
}

#[async_trait]
impl ProfileProvider for InMemoryProfileProvider {
    async fn get_profile(&self, token: &str) -> Result<UserProfile, ProfileError> {
        let mut state = self.state.write().unwrap();
        state.lookup_calls += 1;

        if state.fail_upstream {
            return Err(ProfileError::Upstream(
                "Profile service timed out".to_string(),
            ));
        }

        state
            .profiles
            .get(token)
            .or(state.default_profile.as_ref())
            .cloned()
            .ok_or(ProfileError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> UserProfile {
        UserProfile {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            roles: vec!["user".to_string()],
        }
    }

    #[tokio::test]
    async fn test_registered_token_resolves() {
        let provider = InMemoryProfileProvider::new();
        provider.register("tok-1", ada());

        let profile = provider.get_profile("tok-1").await.unwrap();
        assert_eq!(profile, ada());
        assert_eq!(provider.lookup_call_count(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_token_is_not_found() {
        let provider = InMemoryProfileProvider::new();

        let result = provider.get_profile("tok-unknown").await;
        assert!(matches!(result, Err(ProfileError::NotFound)));
    }

    #[tokio::test]
    async fn test_default_profile_covers_any_token() {
        let provider = InMemoryProfileProvider::with_default_profile(ada());

        let profile = provider.get_profile("whatever").await.unwrap();
        assert_eq!(profile.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_fail_upstream() {
        let provider = InMemoryProfileProvider::new();
        provider.register("tok-1", ada());
        provider.set_fail_upstream(true);

        let result = provider.get_profile("tok-1").await;
        assert!(matches!(result, Err(ProfileError::Upstream(_))));
    }
}
