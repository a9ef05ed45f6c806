//! Capabilities the engine calls for persistence
//!
//! Implementations are supplied by the embedding application. The in-memory
//! versions in [`memory`] back the console driver and the tests.

pub mod memory;

pub use memory::{MemorySessionStore, MemoryWindowCache};

use crate::session::Session;
use crate::window::Window;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage for sessions
///
/// Reads for a session key must observe the previous write to that key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the session for this session/cell pair, if one exists
    async fn get(&self, session_nr: &str, cell_nr: &str) -> Result<Option<Session>, String>;

    /// Persist the session
    async fn save(&self, session: &Session) -> Result<(), String>;

    /// Terminate the session
    async fn finish(&self, session: &Session) -> Result<(), String>;
}

/// Best-effort memoization of computed windows
///
/// Entries are either scoped to one session number or shared by all.
#[async_trait]
pub trait WindowCache: Send + Sync {
    async fn get(&self, window_name: &str, session_nr: Option<&str>)
        -> Result<Option<Window>, String>;

    async fn put(&self, window: &Window, session_nr: Option<&str>) -> Result<(), String>;

    /// Remove every entry of a session, or just `window_name` when given
    async fn delete(&self, session_nr: &str, window_name: Option<&str>) -> Result<(), String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, session_nr: &str, cell_nr: &str) -> Result<Option<Session>, String> {
        (**self).get(session_nr, cell_nr).await
    }

    async fn save(&self, session: &Session) -> Result<(), String> {
        (**self).save(session).await
    }

    async fn finish(&self, session: &Session) -> Result<(), String> {
        (**self).finish(session).await
    }
}

#[async_trait]
impl<T: WindowCache + ?Sized> WindowCache for Arc<T> {
    async fn get(
        &self,
        window_name: &str,
        session_nr: Option<&str>,
    ) -> Result<Option<Window>, String> {
        (**self).get(window_name, session_nr).await
    }

    async fn put(&self, window: &Window, session_nr: Option<&str>) -> Result<(), String> {
        (**self).put(window, session_nr).await
    }

    async fn delete(&self, session_nr: &str, window_name: Option<&str>) -> Result<(), String> {
        (**self).delete(session_nr, window_name).await
    }
}
