//! Session and request types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-conversation state, persisted between requests by a `SessionStore`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_nr: String,
    pub cell_nr: String,
    /// Name of the window the client is currently looking at
    pub window: String,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl Session {
    pub fn new(
        session_nr: impl Into<String>,
        cell_nr: impl Into<String>,
        window: impl Into<String>,
    ) -> Self {
        Self {
            session_nr: session_nr.into(),
            cell_nr: cell_nr.into(),
            window: window.into(),
            variables: BTreeMap::new(),
        }
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }
}

/// One client turn. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub session_nr: String,
    pub cell_nr: String,
    pub request_str: String,
}

impl Request {
    pub fn new(
        session_nr: impl Into<String>,
        cell_nr: impl Into<String>,
        request_str: impl Into<String>,
    ) -> Self {
        Self {
            session_nr: session_nr.into(),
            cell_nr: cell_nr.into(),
            request_str: request_str.into(),
        }
    }
}
