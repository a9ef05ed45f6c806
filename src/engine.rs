//! Session transition engine
//!
//! Turns a stored session plus an incoming request into the next window.
//! The decision itself is the pure [`transition`] function; this module
//! does the lookups around it and persists the result.

mod error;
pub mod transition;

#[cfg(test)]
mod proptests;

pub use error::{EngineError, EngineResult};
pub use transition::{transition, Capture, Lookup, Transition};

use crate::registry::WindowRegistry;
use crate::resolver::{ResolveError, ResolverTable, WindowResolver};
use crate::session::{Request, Session};
use crate::store::{SessionStore, WindowCache};
use crate::window::{Window, ERROR_MESSAGE, INVALID_OPTION_MESSAGE};
use std::sync::Arc;

/// Outcome of a single turn, before it is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The session moves to `window`
    Advance { window: Window, session: Session },
    /// The current window is shown again with a corrective message
    Reprompt { window: Window, session: Session },
    /// An error window is shown; the session stays where it was
    Misconfigured { window: Window, session: Session },
    /// No definition exists for `window_name`
    Unresolved { window_name: String, session: Session },
}

impl Step {
    pub fn window(&self) -> Option<&Window> {
        match self {
            Step::Advance { window, .. }
            | Step::Reprompt { window, .. }
            | Step::Misconfigured { window, .. } => Some(window),
            Step::Unresolved { .. } => None,
        }
    }

    pub fn session(&self) -> &Session {
        match self {
            Step::Advance { session, .. }
            | Step::Reprompt { session, .. }
            | Step::Misconfigured { session, .. }
            | Step::Unresolved { session, .. } => session,
        }
    }

    /// The window to show, dropping the session
    pub fn into_window(self) -> Option<Window> {
        match self {
            Step::Advance { window, .. }
            | Step::Reprompt { window, .. }
            | Step::Misconfigured { window, .. } => Some(window),
            Step::Unresolved { .. } => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Step::Advance { .. } => "advance",
            Step::Reprompt { .. } => "reprompt",
            Step::Misconfigured { .. } => "misconfigured",
            Step::Unresolved { .. } => "unresolved",
        }
    }
}

/// Collects windows, resolvers and the cache before the engine is built
pub struct EngineBuilder {
    initial_window: String,
    registry: WindowRegistry,
    resolvers: ResolverTable,
    cache: Option<Arc<dyn WindowCache>>,
}

impl EngineBuilder {
    pub fn new(initial_window: impl Into<String>) -> Self {
        Self {
            initial_window: initial_window.into(),
            registry: WindowRegistry::new(),
            resolvers: ResolverTable::new(),
            cache: None,
        }
    }

    /// Register a static window
    #[must_use]
    pub fn window(mut self, window: Window) -> Self {
        self.registry.register(window);
        self
    }

    #[must_use]
    pub fn windows(mut self, windows: impl IntoIterator<Item = Window>) -> Self {
        for window in windows {
            self.registry.register(window);
        }
        self
    }

    /// Use `registry` as the static window set, replacing anything registered so far
    #[must_use]
    pub fn registry(mut self, registry: WindowRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a dynamic window
    #[must_use]
    pub fn resolver(mut self, name: impl Into<String>, resolver: Arc<dyn WindowResolver>) -> Self {
        self.resolvers.register(name, resolver);
        self
    }

    /// Register a dynamic window backed by a plain closure
    #[must_use]
    pub fn resolver_fn<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Session, &Request) -> Result<(Window, Session), ResolveError>
            + Send
            + Sync
            + 'static,
    {
        self.resolvers.register_fn(name, f);
        self
    }

    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn WindowCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build<S: SessionStore>(self, store: S) -> Engine<S> {
        let resolvers = &self.resolvers;
        for problem in self
            .registry
            .validate(&self.initial_window, |name| resolvers.contains(name))
        {
            tracing::warn!(problem = %problem, "Menu configuration");
        }

        tracing::info!(
            initial_window = %self.initial_window,
            windows = self.registry.len(),
            resolvers = ?self.resolvers,
            cache = self.cache.is_some(),
            "Engine ready"
        );

        Engine {
            initial_window: self.initial_window,
            registry: self.registry,
            resolvers: self.resolvers,
            cache: self.cache,
            store,
        }
    }
}

/// Owns the menu definition and drives sessions through it
pub struct Engine<S: SessionStore> {
    initial_window: String,
    registry: WindowRegistry,
    resolvers: ResolverTable,
    cache: Option<Arc<dyn WindowCache>>,
    store: S,
}

impl<S: SessionStore> Engine<S> {
    pub fn initial_window(&self) -> &str {
        &self.initial_window
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> Option<&Arc<dyn WindowCache>> {
        self.cache.as_ref()
    }

    /// Process one client turn and return the window to show
    ///
    /// `Ok(None)` means the window could not be found anywhere, which is a
    /// menu configuration bug rather than a client error.
    ///
    /// # Errors
    ///
    /// Fails when the session store or a resolver fails.
    pub async fn process(&self, request: &Request) -> EngineResult<Option<Window>> {
        Ok(self.process_step(request).await?.into_window())
    }

    /// Like [`Engine::process`], but keeps the kind of step that was taken
    ///
    /// The returned step carries the session as it was persisted.
    ///
    /// # Errors
    ///
    /// Fails when the session store or a resolver fails.
    pub async fn process_step(&self, request: &Request) -> EngineResult<Step> {
        let existing = self
            .store
            .get(&request.session_nr, &request.cell_nr)
            .await
            .map_err(EngineError::Store)?;

        let step = match existing {
            Some(session) => self.step(session, request).await?,
            None => self.start(request).await?,
        };

        tracing::debug!(
            session_nr = %request.session_nr,
            step = step.kind(),
            window = step.window().map_or("-", |w| w.name.as_str()),
            "Processed request"
        );

        self.commit(step).await
    }

    /// First turn of a conversation
    async fn start(&self, request: &Request) -> EngineResult<Step> {
        tracing::info!(
            session_nr = %request.session_nr,
            cell_nr = %request.cell_nr,
            window = %self.initial_window,
            "Starting session"
        );
        let session = Session::new(
            request.session_nr.clone(),
            request.cell_nr.clone(),
            self.initial_window.clone(),
        );
        self.open(&self.initial_window, session, request).await
    }

    /// A turn on an existing session
    ///
    /// # Errors
    ///
    /// Fails when a resolver fails.
    pub async fn step(&self, mut session: Session, request: &Request) -> EngineResult<Step> {
        let Some(current) = self.current_window(&session, request).await? else {
            return Ok(Step::Unresolved {
                window_name: session.window.clone(),
                session,
            });
        };

        match transition(&current, &request.request_str) {
            Transition::Reprompt => Ok(Step::Reprompt {
                window: current.with_message(INVALID_OPTION_MESSAGE),
                session,
            }),
            Transition::Misconfigured => {
                tracing::error!(
                    window = %current.name,
                    "Window requires a variable but names no target window"
                );
                Ok(Step::Misconfigured {
                    window: Window::error(ERROR_MESSAGE),
                    session,
                })
            }
            Transition::Advance {
                target,
                capture,
                lookup,
            } => {
                if let Some(Capture { var, value }) = capture {
                    session.set_variable(var, value);
                }
                match lookup {
                    Lookup::Static => Ok(self.lookup_static(&target, session)),
                    Lookup::Dynamic => self.open(&target, session, request).await,
                }
            }
        }
    }

    /// The window named by `session.window`
    ///
    /// Checked in order: session cache, shared cache, resolver, registry.
    async fn current_window(
        &self,
        session: &Session,
        request: &Request,
    ) -> EngineResult<Option<Window>> {
        let name = &session.window;

        if let Some(window) = self.cached(name, Some(&request.session_nr)).await {
            return Ok(Some(window));
        }
        if let Some(window) = self.cached(name, None).await {
            return Ok(Some(window));
        }

        // Re-rendering the current window must not change the session
        if let Some(result) = self.resolvers.resolve(name, session.clone(), request).await {
            let (window, _) = result.map_err(|source| EngineError::Resolver {
                window: name.clone(),
                source,
            })?;
            return Ok(Some(window));
        }

        Ok(self.registry.get(name).cloned())
    }

    /// Enter `name`, running its resolver when one is registered
    async fn open(&self, name: &str, session: Session, request: &Request) -> EngineResult<Step> {
        let Some(resolver) = self.resolvers.get(name) else {
            return Ok(self.lookup_static(name, session));
        };

        tracing::debug!(window = %name, session_nr = %session.session_nr, "Resolving dynamic window");
        let (window, session) =
            resolver
                .resolve(session, request)
                .await
                .map_err(|source| EngineError::Resolver {
                    window: name.to_string(),
                    source,
                })?;

        if window.name != name {
            // Caching it would shadow whatever `window.name` means for this session
            tracing::warn!(
                window = %name,
                resolved = %window.name,
                "Resolver returned a window under another name, not caching it"
            );
        } else if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&window, Some(&request.session_nr)).await {
                tracing::warn!(window = %window.name, error = %e, "Failed to cache window");
            }
        }

        Ok(Step::Advance { window, session })
    }

    fn lookup_static(&self, name: &str, session: Session) -> Step {
        match self.registry.get(name) {
            Some(window) => Step::Advance {
                window: window.clone(),
                session,
            },
            None => Step::Unresolved {
                window_name: name.to_string(),
                session,
            },
        }
    }

    async fn cached(&self, name: &str, session_nr: Option<&str>) -> Option<Window> {
        let cache = self.cache.as_ref()?;
        match cache.get(name, session_nr).await {
            Ok(window) => window,
            Err(e) => {
                tracing::warn!(window = %name, error = %e, "Window cache lookup failed");
                None
            }
        }
    }

    /// Persist the session for a finished step
    async fn commit(&self, step: Step) -> EngineResult<Step> {
        match step {
            Step::Advance {
                window,
                mut session,
            } => {
                session.window.clone_from(&window.name);
                self.save(&session).await?;
                Ok(Step::Advance { window, session })
            }
            Step::Reprompt {
                window,
                mut session,
            } => {
                session.window.clone_from(&window.name);
                self.save(&session).await?;
                Ok(Step::Reprompt { window, session })
            }
            Step::Misconfigured { .. } => {
                self.save(step.session()).await?;
                Ok(step)
            }
            Step::Unresolved {
                ref window_name,
                ref session,
            } => {
                tracing::warn!(
                    session_nr = %session.session_nr,
                    window = %window_name,
                    "Unknown window"
                );
                Ok(step)
            }
        }
    }

    async fn save(&self, session: &Session) -> EngineResult<()> {
        self.store.save(session).await.map_err(EngineError::Store)
    }
}
