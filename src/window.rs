//! Window definitions
//!
//! A window is a titled message plus the options a client may pick from it.
//! Static windows are declared once at startup; dynamic windows are built
//! per request by a resolver.

use serde::{Deserialize, Serialize};

/// Name of the window produced when a window is misconfigured
pub const ERROR_WINDOW: &str = "ERROR";

/// Message shown when a request matches none of a window's options
pub const INVALID_OPTION_MESSAGE: &str = "Please select a valid option";

/// Message shown on the error window
pub const ERROR_MESSAGE: &str = "Error processing your request";

/// Whether a window expects further input or ends the interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum WindowType {
    #[default]
    Form,
    Message,
}

/// A selectable choice on a window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowOption {
    /// Exact text the client must send to pick this option
    pub option: String,
    /// Human readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Window to move to when picked
    pub window: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl WindowOption {
    pub fn new(
        option: impl Into<String>,
        display: impl Into<String>,
        window: impl Into<String>,
    ) -> Self {
        Self {
            option: option.into(),
            display: Some(display.into()),
            window: window.into(),
            active: true,
        }
    }

    /// Option without a label; captures fall back to the option text
    pub fn bare(option: impl Into<String>, window: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            display: None,
            window: window.into(),
            active: true,
        }
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Value stored in the session when this option satisfies a `Required`
    pub fn captured_value(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.option)
    }
}

/// Declares that the next request is captured into a session variable
///
/// `var_type` and `length` describe the expected input for collaborators
/// (validation, rendering hints). Navigation never checks them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Required {
    pub var: String,
    /// Window shown after the capture. `None` is a configuration error.
    #[serde(default)]
    pub window: Option<String>,
    #[serde(default)]
    pub in_options: bool,
    #[serde(rename = "type", default = "default_var_type")]
    pub var_type: String,
    #[serde(default = "default_length")]
    pub length: u32,
}

impl Required {
    /// Capture free text into `var`, then go to `window`
    pub fn text(var: impl Into<String>, window: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            window: Some(window.into()),
            in_options: false,
            var_type: default_var_type(),
            length: default_length(),
        }
    }

    /// Capture the picked option's label into `var`, then go to `window`
    pub fn from_options(var: impl Into<String>, window: impl Into<String>) -> Self {
        Self {
            in_options: true,
            ..Self::text(var, window)
        }
    }
}

/// A unit of displayed content plus its transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub options: Vec<WindowOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Required>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(rename = "type", default)]
    pub window_type: WindowType,
}

impl Window {
    /// A form window with no options
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: Some(title.into()),
            message: Some(message.into()),
            options: Vec::new(),
            required: None,
            active: true,
            window_type: WindowType::Form,
        }
    }

    /// A terminal window that shows a message and offers nothing to pick
    pub fn message_only(
        name: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            window_type: WindowType::Message,
            ..Self::new(name, title, message)
        }
    }

    /// The window returned when a `Required` has no target
    pub fn error(message: impl Into<String>) -> Self {
        Self::message_only(ERROR_WINDOW, ERROR_WINDOW, message)
    }

    #[must_use]
    pub fn with_option(mut self, option: WindowOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: impl IntoIterator<Item = WindowOption>) -> Self {
        self.options.extend(options);
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: Required) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// First option whose text equals `input` exactly
    pub fn select(&self, input: &str) -> Option<&WindowOption> {
        self.options.iter().find(|o| o.option == input)
    }

    pub fn is_terminal(&self) -> bool {
        self.window_type == WindowType::Message
    }
}

fn default_active() -> bool {
    true
}

fn default_var_type() -> String {
    "numeric".to_string()
}

fn default_length() -> u32 {
    11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_is_exact_and_first_match() {
        let window = Window::new("MAIN", "Main", "Pick one")
            .with_option(WindowOption::new("1", "First", "A"))
            .with_option(WindowOption::new("1", "Shadowed", "B"))
            .with_option(WindowOption::new("a", "Lower", "C"));

        assert_eq!(window.select("1").map(|o| o.window.as_str()), Some("A"));
        assert!(window.select("A").is_none());
        assert!(window.select(" 1").is_none());
        assert!(window.select("").is_none());
    }

    #[test]
    fn captured_value_prefers_display() {
        assert_eq!(WindowOption::new("1", "Maputo", "X").captured_value(), "Maputo");
        assert_eq!(WindowOption::bare("7", "X").captured_value(), "7");
    }

    #[test]
    fn deserializes_with_defaults() {
        let window: Window = serde_json::from_str(
            r#"{
                "name": "AGE",
                "title": "Age",
                "message": "How old are you?",
                "required": {"var": "age", "window": "DONE"}
            }"#,
        )
        .unwrap();

        assert!(window.active);
        assert_eq!(window.window_type, WindowType::Form);
        assert!(window.options.is_empty());
        let required = window.required.unwrap();
        assert!(!required.in_options);
        assert_eq!(required.var_type, "numeric");
        assert_eq!(required.length, 11);
    }

    #[test]
    fn window_type_uses_uppercase_names() {
        let window: Window =
            serde_json::from_str(r#"{"name": "BYE", "type": "MESSAGE"}"#).unwrap();
        assert!(window.is_terminal());
        assert_eq!(
            serde_json::to_value(WindowType::Form).unwrap(),
            serde_json::json!("FORM")
        );
    }

    #[test]
    fn error_window_shape() {
        let window = Window::error(ERROR_MESSAGE);
        assert_eq!(window.name, ERROR_WINDOW);
        assert_eq!(window.title.as_deref(), Some(ERROR_WINDOW));
        assert_eq!(window.message.as_deref(), Some(ERROR_MESSAGE));
        assert!(window.is_terminal());
    }
}
