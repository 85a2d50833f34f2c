/// Read-only source of the bearer credential. The engine asks for it on
/// every call and never stores it.
pub trait CredentialProvider: Send + Sync {
    fn bearer(&self) -> Option<String>;
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential {
    token: Option<String>,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

impl CredentialProvider for StaticCredential {
    fn bearer(&self) -> Option<String> {
        self.token.clone().filter(|token| !token.trim().is_empty())
    }
}

/// Reads the token from an environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredential {
    fn bearer(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}
