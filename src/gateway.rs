//! Request entry point for transports
//!
//! The engine assumes that turns of one session never overlap. The gateway
//! provides that: each session number gets its own lock, so turns of the
//! same session run one after another in arrival order while different
//! sessions proceed independently.

use crate::engine::{Engine, EngineError, EngineResult, Step};
use crate::response::{project, WindowResponse};
use crate::session::Request;
use crate::store::SessionStore;
use crate::window::Window;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct Gateway<S: SessionStore> {
    engine: Arc<Engine<S>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    finish_on_message: bool,
}

impl<S: SessionStore> Gateway<S> {
    pub fn new(engine: Arc<Engine<S>>) -> Self {
        Self {
            engine,
            locks: Mutex::new(HashMap::new()),
            finish_on_message: true,
        }
    }

    /// Whether a `MESSAGE` window ends the session it is shown to
    #[must_use]
    pub fn finish_on_message(mut self, enabled: bool) -> Self {
        self.finish_on_message = enabled;
        self
    }

    pub fn engine(&self) -> &Arc<Engine<S>> {
        &self.engine
    }

    /// Run one turn and project the resulting window for the client
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub async fn handle(&self, request: &Request) -> EngineResult<Option<WindowResponse>> {
        let lock = self.session_lock(&request.session_nr).await;
        let result = {
            let _turn = lock.lock().await;
            self.run(request).await
        };
        self.release(&request.session_nr, lock).await;
        result
    }

    async fn run(&self, request: &Request) -> EngineResult<Option<WindowResponse>> {
        let step = self.engine.process_step(request).await?;

        if self.ends_session(&step) {
            self.finish(&request.session_nr, &request.cell_nr).await?;
        }

        Ok(project(step.window()))
    }

    /// A misconfigured window leaves the session in place so the client can retry
    fn ends_session(&self, step: &Step) -> bool {
        let shown = match step {
            Step::Advance { window, .. } | Step::Reprompt { window, .. } => window,
            Step::Misconfigured { .. } | Step::Unresolved { .. } => return false,
        };
        self.finish_on_message && shown.is_terminal()
    }

    /// Terminate a session and drop its cached windows
    ///
    /// # Errors
    ///
    /// Fails when the session store fails.
    pub async fn finish(&self, session_nr: &str, cell_nr: &str) -> EngineResult<()> {
        let store = self.engine.store();
        if let Some(session) = store
            .get(session_nr, cell_nr)
            .await
            .map_err(EngineError::Store)?
        {
            store.finish(&session).await.map_err(EngineError::Store)?;
            tracing::info!(
                session_nr = %session_nr,
                window = %session.window,
                variables = session.variables.len(),
                "Session finished"
            );
        }

        if let Some(cache) = self.engine.cache() {
            if let Err(e) = cache.delete(session_nr, None).await {
                tracing::warn!(session_nr = %session_nr, error = %e, "Failed to clear window cache");
            }
        }
        Ok(())
    }

    async fn session_lock(&self, session_nr: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .await
            .entry(session_nr.to_string())
            .or_default()
            .clone()
    }

    /// Drop the lock entry once no other turn of the session holds it
    async fn release(&self, session_nr: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        drop(lock);
        if locks
            .get(session_nr)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(session_nr);
        }
    }

    #[cfg(test)]
    async fn tracked_sessions(&self) -> usize {
        self.locks.lock().await.len()
    }
}
