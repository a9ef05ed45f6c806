//! Property-based tests for window transitions
//!
//! These check the navigation rules over arbitrary menus and inputs.

use super::*;
use crate::store::MemorySessionStore;
use crate::window::{Required, WindowOption};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_option() -> impl Strategy<Value = WindowOption> {
    ("[0-9]{1,2}", "[A-Za-z ]{1,12}", "[A-Z]{3,6}")
        .prop_map(|(option, display, window)| WindowOption::new(option, display, window))
}

fn arb_menu_window() -> impl Strategy<Value = Window> {
    proptest::collection::vec(arb_option(), 0..6)
        .prop_map(|options| Window::new("CURRENT", "Current", "Pick").with_options(options))
}

fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9]{1,3}", "[a-z*#]{0,4}", ".{0,8}"]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

// ============================================================================
// Pure transition properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Input that matches no option never advances
    #[test]
    fn prop_unmatched_input_reprompts(window in arb_menu_window(), input in arb_input()) {
        let decision = transition(&window, &input);
        if window.options.iter().any(|o| o.option == input) {
            let is_advance = matches!(decision, Transition::Advance { .. });
            prop_assert!(is_advance);
        } else {
            prop_assert_eq!(decision, Transition::Reprompt);
        }
    }

    // Matching input lands on the first matching option's target
    #[test]
    fn prop_match_targets_first_option(window in arb_menu_window(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!window.options.is_empty());
        let chosen = &window.options[pick.index(window.options.len())];
        let first = window.options.iter().find(|o| o.option == chosen.option).unwrap();

        prop_assert_eq!(
            transition(&window, &chosen.option),
            Transition::Advance {
                target: first.window.clone(),
                capture: None,
                lookup: Lookup::Dynamic,
            }
        );
    }

    // Free text is captured exactly as sent, whatever the options say
    #[test]
    fn prop_free_text_captured_verbatim(window in arb_menu_window(), input in arb_input()) {
        let window = window.with_required(Required::text("v", "NEXT"));
        prop_assert_eq!(
            transition(&window, &input),
            Transition::Advance {
                target: "NEXT".to_string(),
                capture: Some(Capture { var: "v".to_string(), value: input.clone() }),
                lookup: Lookup::Static,
            }
        );
    }
}

// ============================================================================
// Engine properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Whatever sequence of inputs arrives, the stored pointer always names
    // the window that was last returned
    #[test]
    fn prop_pointer_follows_returned_window(inputs in proptest::collection::vec(arb_input(), 1..12)) {
        let store = Arc::new(MemorySessionStore::new());
        let engine = EngineBuilder::new("A")
            .window(
                Window::new("A", "A", "")
                    .with_option(WindowOption::new("1", "to B", "B"))
                    .with_option(WindowOption::new("2", "to C", "C")),
            )
            .window(Window::new("B", "B", "").with_required(Required::text("b", "A")))
            .window(
                Window::new("C", "C", "")
                    .with_option(WindowOption::new("1", "x", "A"))
                    .with_option(WindowOption::new("2", "y", "B"))
                    .with_required(Required::from_options("c", "A")),
            )
            .build(store.clone());

        let rt = runtime();
        for input in inputs {
            let request = Request::new("s", "c", input);
            let window = rt.block_on(engine.process(&request)).unwrap().unwrap();
            let session = rt.block_on(store.get("s", "c")).unwrap().unwrap();
            prop_assert_eq!(&session.window, &window.name);
            if let Some(city) = session.variable("c") {
                prop_assert!(city == "x" || city == "y");
            }
        }
    }
}
