//! In-memory session store and window cache

use super::{SessionStore, WindowCache};
use crate::session::Session;
use crate::window::Window;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

type SessionKey = (String, String);

/// Sessions held in a map keyed by (session number, cell number)
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn session_key(session_nr: &str, cell_nr: &str) -> SessionKey {
    (session_nr.to_string(), cell_nr.to_string())
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_nr: &str, cell_nr: &str) -> Result<Option<Session>, String> {
        Ok(self
            .sessions
            .read()
            .await
            .get(&session_key(session_nr, cell_nr))
            .cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), String> {
        self.sessions.write().await.insert(
            session_key(&session.session_nr, &session.cell_nr),
            session.clone(),
        );
        Ok(())
    }

    async fn finish(&self, session: &Session) -> Result<(), String> {
        self.sessions
            .write()
            .await
            .remove(&session_key(&session.session_nr, &session.cell_nr));
        Ok(())
    }
}

/// Windows cached per session and globally
#[derive(Debug, Default)]
pub struct MemoryWindowCache {
    scoped: RwLock<HashMap<String, HashMap<String, Window>>>,
    shared: RwLock<HashMap<String, Window>>,
}

impl MemoryWindowCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WindowCache for MemoryWindowCache {
    async fn get(
        &self,
        window_name: &str,
        session_nr: Option<&str>,
    ) -> Result<Option<Window>, String> {
        let window = match session_nr {
            Some(session_nr) => self
                .scoped
                .read()
                .await
                .get(session_nr)
                .and_then(|windows| windows.get(window_name))
                .cloned(),
            None => self.shared.read().await.get(window_name).cloned(),
        };
        Ok(window)
    }

    async fn put(&self, window: &Window, session_nr: Option<&str>) -> Result<(), String> {
        match session_nr {
            Some(session_nr) => {
                self.scoped
                    .write()
                    .await
                    .entry(session_nr.to_string())
                    .or_default()
                    .insert(window.name.clone(), window.clone());
            }
            None => {
                self.shared
                    .write()
                    .await
                    .insert(window.name.clone(), window.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, session_nr: &str, window_name: Option<&str>) -> Result<(), String> {
        let mut scoped = self.scoped.write().await;
        match window_name {
            Some(name) => {
                if let Some(windows) = scoped.get_mut(session_nr) {
                    windows.remove(name);
                    if windows.is_empty() {
                        scoped.remove(session_nr);
                    }
                }
            }
            None => {
                scoped.remove(session_nr);
            }
        }
        Ok(())
    }
}
