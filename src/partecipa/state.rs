//! Shared portal state handed to every handler.

use url::Url;

use super::credentials::{CredentialChecker, PlaintextChecker};
use super::session::SessionStore;
use super::store::AccountStore;
use super::tokens::{TokenGenerator, WeakTokenGenerator};

#[derive(Clone, Debug)]
pub struct PortalConfig {
    host: String,
    port: u16,
    phone_no: String,
}

impl PortalConfig {
    #[must_use]
    pub fn new(host: &str, port: u16, phone_no: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            phone_no: phone_no.to_string(),
        }
    }

    #[must_use]
    pub fn phone_no(&self) -> &str {
        &self.phone_no
    }

    /// The reset link sent back over SMS, with the token as a query
    /// parameter.
    #[must_use]
    pub fn reset_url(&self, token: &str) -> String {
        match Url::parse(&format!("http://{}:{}/reset", self.host, self.port)) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("token", token);
                url.to_string()
            }
            Err(_) => format!("http://{}:{}/reset?token={token}", self.host, self.port),
        }
    }
}

/// Everything a request needs: configuration, the account table, the
/// session table, and the two capability seams.
pub struct PortalState {
    config: PortalConfig,
    store: Box<dyn AccountStore>,
    sessions: SessionStore,
    tokens: Box<dyn TokenGenerator>,
    credentials: Box<dyn CredentialChecker>,
}

impl PortalState {
    #[must_use]
    pub fn new(config: PortalConfig, store: impl AccountStore + 'static) -> Self {
        Self {
            config,
            store: Box::new(store),
            sessions: SessionStore::new(),
            tokens: Box::new(WeakTokenGenerator),
            credentials: Box::new(PlaintextChecker),
        }
    }

    #[must_use]
    pub fn with_token_generator(mut self, tokens: impl TokenGenerator + 'static) -> Self {
        self.tokens = Box::new(tokens);
        self
    }

    #[must_use]
    pub fn with_credential_checker(mut self, credentials: impl CredentialChecker + 'static) -> Self {
        self.credentials = Box::new(credentials);
        self
    }

    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &dyn AccountStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub fn tokens(&self) -> &dyn TokenGenerator {
        self.tokens.as_ref()
    }

    #[must_use]
    pub fn credentials(&self) -> &dyn CredentialChecker {
        self.credentials.as_ref()
    }
}
