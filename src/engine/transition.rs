//! Pure transition decision
//!
//! Given the window a session is at and the client's input, decide what
//! happens next. No lookups or I/O happen here; the engine carries out the
//! decision.

use crate::window::Window;

/// Where the engine should look for the target window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Registry only
    Static,
    /// Resolver if one is registered for the name, registry otherwise
    Dynamic,
}

/// A variable captured from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub var: String,
    pub value: String,
}

/// Decision for one client turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Input matched nothing. Show the current window again.
    Reprompt,
    /// The current window's `Required` has no target window
    Misconfigured,
    /// Move to `target`, storing `capture` first when present
    Advance {
        target: String,
        capture: Option<Capture>,
        lookup: Lookup,
    },
}

pub fn transition(current: &Window, input: &str) -> Transition {
    if let Some(required) = &current.required {
        let Some(target) = &required.window else {
            return Transition::Misconfigured;
        };

        let value = if required.in_options {
            match current.select(input) {
                Some(option) => option.captured_value().to_string(),
                None => return Transition::Reprompt,
            }
        } else {
            input.to_string()
        };

        return Transition::Advance {
            target: target.clone(),
            capture: Some(Capture {
                var: required.var.clone(),
                value,
            }),
            lookup: Lookup::Static,
        };
    }

    match current.select(input) {
        Some(option) => Transition::Advance {
            target: option.window.clone(),
            capture: None,
            lookup: Lookup::Dynamic,
        },
        None => Transition::Reprompt,
    }
}
