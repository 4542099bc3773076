/// Source of the TMDB API key when none is stored yet.
///
/// `None` means the user declined; the lookup is abandoned without side effects.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn acquire(&self) -> Option<String>;
}

/// A key known up front, or a known refusal.
#[derive(Debug, Clone, Default)]
pub struct FixedCredential(pub Option<String>);

impl FixedCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn declined() -> Self {
        Self(None)
    }
}

#[async_trait::async_trait]
impl CredentialProvider for FixedCredential {
    async fn acquire(&self) -> Option<String> {
        self.0.clone()
    }
}
