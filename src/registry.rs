//! Registry of statically defined windows

use crate::window::Window;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read menu file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid menu definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Window declared twice: {0}")]
    DuplicateWindow(String),
}

/// Static window definitions keyed by name
#[derive(Debug, Clone, Default)]
pub struct WindowRegistry {
    windows: HashMap<String, Window>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_windows(windows: impl IntoIterator<Item = Window>) -> Self {
        let mut registry = Self::new();
        for window in windows {
            registry.register(window);
        }
        registry
    }

    /// Parse a JSON array of window definitions
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or when two windows share a name.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let windows: Vec<Window> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for window in windows {
            if registry.contains(&window.name) {
                return Err(RegistryError::DuplicateWindow(window.name));
            }
            registry.windows.insert(window.name.clone(), window);
        }
        Ok(registry)
    }

    /// Load a menu file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not parse.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), windows = registry.len(), "Loaded menu");
        Ok(registry)
    }

    /// Register a window under its own name, replacing any earlier definition
    pub fn register(&mut self, window: Window) {
        if let Some(previous) = self.windows.insert(window.name.clone(), window) {
            tracing::warn!(window = %previous.name, "Window definition replaced");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Window> {
        self.windows.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.windows.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Report dangling references without failing
    ///
    /// `dynamic` tells which names are served by resolvers rather than by
    /// this registry. Returned messages are sorted for stable output.
    pub fn validate(&self, initial: &str, dynamic: impl Fn(&str) -> bool) -> Vec<String> {
        let known = |name: &str| self.contains(name) || dynamic(name);
        let mut problems = Vec::new();

        if !known(initial) {
            problems.push(format!("initial window '{initial}' is not defined"));
        }

        for window in self.windows.values() {
            for option in &window.options {
                if !known(&option.window) {
                    problems.push(format!(
                        "window '{}' option '{}' points to unknown window '{}'",
                        window.name, option.option, option.window
                    ));
                }
            }
            if let Some(required) = &window.required {
                match &required.window {
                    None => problems.push(format!(
                        "window '{}' requires '{}' but has no target window",
                        window.name, required.var
                    )),
                    Some(target) if !self.contains(target) => problems.push(format!(
                        "window '{}' requires '{}' with unknown target '{target}'",
                        window.name, required.var
                    )),
                    Some(_) => {}
                }
            }
        }

        problems.sort();
        problems
    }
}
