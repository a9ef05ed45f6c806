//! Client-facing projection of a window
//!
//! Only what a handset renders leaves the engine: title, message and the
//! option list. Names, flags and capture rules stay internal.

use crate::window::{Window, WindowOption};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionResponse {
    pub option: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowResponse {
    pub message: String,
    pub title: String,
    pub options: Vec<OptionResponse>,
}

impl WindowResponse {
    /// Plain text rendering for terminals and text-only transports
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.options.len() + 2);
        if !self.title.is_empty() {
            lines.push(self.title.clone());
        }
        if !self.message.is_empty() {
            lines.push(self.message.clone());
        }
        lines.extend(
            self.options
                .iter()
                .map(|o| format!("{}. {}", o.option, o.value)),
        );
        lines.join("\n")
    }
}

impl From<&WindowOption> for OptionResponse {
    fn from(option: &WindowOption) -> Self {
        Self {
            option: option.option.clone(),
            value: option.display.clone().unwrap_or_default(),
        }
    }
}

impl From<&Window> for WindowResponse {
    fn from(window: &Window) -> Self {
        Self {
            message: window.message.clone().unwrap_or_default(),
            title: window.title.clone().unwrap_or_default(),
            options: window.options.iter().map(OptionResponse::from).collect(),
        }
    }
}

/// Project a window for the client; `None` stays `None`
pub fn project(window: Option<&Window>) -> Option<WindowResponse> {
    window.map(WindowResponse::from)
}
