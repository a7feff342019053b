//! Authenticator implementation
//!
//! Signs requests with the API key pair.

use crate::error::{Error, Result};
use chrono::Utc;
use std::collections::HashMap;

/// Signed authentication parameters for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParams {
    /// Timestamp embedded in the signature
    pub ts: String,
    /// Public key
    pub apikey: String,
    /// Hex MD5 of `ts + private_key + public_key`
    pub hash: String,
}

impl AuthParams {
    /// Query parameters in the form the API expects
    pub fn to_query(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("ts".to_string(), self.ts.clone());
        params.insert("apikey".to_string(), self.apikey.clone());
        params.insert("hash".to_string(), self.hash.clone());
        params
    }
}

/// Authenticator handles signing requests
#[derive(Clone)]
pub struct Authenticator {
    public_key: String,
    private_key: String,
}

impl Authenticator {
    /// Create an authenticator, rejecting empty credentials
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Result<Self> {
        let public_key = public_key.into();
        let private_key = private_key.into();

        if public_key.is_empty() {
            return Err(Error::missing_field("public_key"));
        }
        if private_key.is_empty() {
            return Err(Error::missing_field("private_key"));
        }

        Ok(Self {
            public_key,
            private_key,
        })
    }

    /// Public key sent as `apikey`
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Sign with an explicit timestamp
    pub fn sign(&self, ts: &str) -> AuthParams {
        let digest = md5::compute(format!("{ts}{}{}", self.private_key, self.public_key));
        AuthParams {
            ts: ts.to_string(),
            apikey: self.public_key.clone(),
            hash: format!("{digest:x}"),
        }
    }

    /// Sign with the current wall-clock time.
    ///
    /// Must be called per request: the timestamp is part of the signature.
    pub fn sign_now(&self) -> AuthParams {
        self.sign(&Utc::now().timestamp().to_string())
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
