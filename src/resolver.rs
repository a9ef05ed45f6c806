//! Windows computed at request time
//!
//! Applications register a resolver under a window name. Whenever that name
//! is navigated to, the resolver builds the window from the session and the
//! request, and may hand back a modified session.

use crate::session::{Request, Session};
use crate::window::Window;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by application resolver logic
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ResolveError {
    pub message: String,
}

impl ResolveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Builds a window for the current request
#[async_trait]
pub trait WindowResolver: Send + Sync {
    async fn resolve(
        &self,
        session: Session,
        request: &Request,
    ) -> Result<(Window, Session), ResolveError>;
}

#[async_trait]
impl<T: WindowResolver + ?Sized> WindowResolver for Arc<T> {
    async fn resolve(
        &self,
        session: Session,
        request: &Request,
    ) -> Result<(Window, Session), ResolveError> {
        (**self).resolve(session, request).await
    }
}

/// Adapter for plain synchronous closures
pub struct FnResolver<F>(pub F);

#[async_trait]
impl<F> WindowResolver for FnResolver<F>
where
    F: Fn(Session, &Request) -> Result<(Window, Session), ResolveError> + Send + Sync,
{
    async fn resolve(
        &self,
        session: Session,
        request: &Request,
    ) -> Result<(Window, Session), ResolveError> {
        (self.0)(session, request)
    }
}

/// Window name to resolver mapping, filled during startup
#[derive(Default, Clone)]
pub struct ResolverTable {
    resolvers: HashMap<String, Arc<dyn WindowResolver>>,
}

impl ResolverTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, resolver: Arc<dyn WindowResolver>) {
        let name = name.into();
        if self.resolvers.insert(name.clone(), resolver).is_some() {
            tracing::warn!(window = %name, "Resolver replaced");
        }
    }

    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Session, &Request) -> Result<(Window, Session), ResolveError>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, Arc::new(FnResolver(f)));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn WindowResolver>> {
        self.resolvers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    /// Run the resolver registered under `name`, or `None` if there is none
    pub async fn resolve(
        &self,
        name: &str,
        session: Session,
        request: &Request,
    ) -> Option<Result<(Window, Session), ResolveError>> {
        let resolver = self.resolvers.get(name)?;
        tracing::debug!(window = %name, session_nr = %session.session_nr, "Resolving dynamic window");
        Some(resolver.resolve(session, request).await)
    }
}

impl std::fmt::Debug for ResolverTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.resolvers.keys()).finish()
    }
}
