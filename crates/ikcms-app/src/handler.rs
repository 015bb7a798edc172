//! Request handlers
//!
//! A [`Handler`] receives the per-request [`Environment`], the application's
//! root schema and the decoded request, and answers with a raw value.

use crate::error::{AppError, AppResult};
use ikcms_components::{CacheComponent, Environment};
use ikcms_forms::Field;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Answers decoded requests
pub trait Handler: Send + Sync {
    /// Handle one request
    ///
    /// # Errors
    /// [`AppError::Conversion`] when the request does not fit the schema;
    /// other variants for infrastructure failures.
    fn handle(&self, env: &Environment, root: &Field, request: &Value) -> AppResult<Value>;
}

/// Converts the request with the root schema and answers with its canonical
/// raw form (undeclared keys dropped, missing fields null, dates re-rendered)
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateHandler;

impl Handler for ValidateHandler {
    fn handle(&self, _env: &Environment, root: &Field, request: &Value) -> AppResult<Value> {
        let typed = root.to_typed(request)?;
        Ok(root.to_raw(&typed)?)
    }
}

/// [`ValidateHandler`] memoised in the cache component
///
/// Only successful answers are cached. Requires a component registered
/// under [`CacheComponent::NAME`].
#[derive(Debug, Clone, Copy)]
pub struct CachedValidateHandler {
    expire: Duration,
}

impl CachedValidateHandler {
    /// Create handler; zero `expire` keeps answers until evicted
    #[inline]
    #[must_use]
    pub fn new(expire: Duration) -> Self {
        Self { expire }
    }

    /// Cache key for a request under a schema
    ///
    /// The whole field tree is hashed, so schemas sharing a root name do not
    /// share answers.
    #[must_use]
    pub fn cache_key(root: &Field, request: &Value) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{root:?}").as_bytes());
        hasher.update([0]);
        hasher.update(request.to_string().as_bytes());
        format!("validated:{}", hex::encode(hasher.finalize()))
    }
}

impl Default for CachedValidateHandler {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Handler for CachedValidateHandler {
    fn handle(&self, env: &Environment, root: &Field, request: &Value) -> AppResult<Value> {
        let cache = env
            .cache()
            .ok_or(AppError::MissingComponent(CacheComponent::NAME))?;
        let key = Self::cache_key(root, request);

        if let Some(hit) = cache.get(&key)? {
            tracing::debug!(key = %key, "validated response served from cache");
            return Ok(hit);
        }

        let response = ValidateHandler.handle(env, root, request)?;
        cache.set(&key, response.clone(), self.expire)?;
        Ok(response)
    }
}
