//! Lottus console driver
//!
//! Runs the engine against a menu and feeds it one line of stdin per client
//! turn, the way a USSD gateway would feed it one message per round trip.

use lottus::{
    EngineBuilder, Gateway, LottusConfig, MemorySessionStore, MemoryWindowCache, Request,
    ResolveError, Session, SessionStore, Window, WindowOption, WindowRegistry,
};
use rust_embed::Embed;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Embed)]
#[folder = "menus"]
struct Menus;

const DEMO_MENU: &str = "demo.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LottusConfig::from_env();
    init_logging(config.log_json);

    let registry = load_menu(&config)?;
    let engine = EngineBuilder::new(config.initial_window.as_str())
        .registry(registry)
        .resolver_fn("PROFILE", profile)
        .cache(Arc::new(MemoryWindowCache::new()))
        .build(MemorySessionStore::new());
    let gateway = Gateway::new(Arc::new(engine)).finish_on_message(config.finish_on_message);

    println!("Type a dial code (e.g. *123#) to open a session, then one answer per line. Ctrl-D quits.");

    let mut session_nr = new_session_nr();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let request = Request::new(session_nr.as_str(), config.cell_nr.as_str(), line.trim());

        if let Some(response) = gateway.handle(&request).await? {
            println!("\n{}\n", response.to_text());
        } else {
            tracing::error!(session_nr = %session_nr, "No window to show");
            println!("\n(no window could be resolved, check the menu definition)\n");
        }

        let store = gateway.engine().store();
        if store.get(&session_nr, &config.cell_nr).await?.is_none() {
            println!("-- session ended --\n");
            session_nr = new_session_nr();
        }
    }

    Ok(())
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lottus=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
        }))
        .init();
}

fn load_menu(config: &LottusConfig) -> Result<WindowRegistry, Box<dyn std::error::Error>> {
    if let Some(path) = &config.menu_path {
        return Ok(WindowRegistry::from_json_file(path)?);
    }

    let file = Menus::get(DEMO_MENU).ok_or("demo menu missing from build")?;
    let json = std::str::from_utf8(&file.data)?;
    tracing::info!(menu = DEMO_MENU, "Using built-in demo menu");
    Ok(WindowRegistry::from_json_str(json)?)
}

fn new_session_nr() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Shows what the session has captured so far
#[allow(clippy::unnecessary_wraps)] // signature fixed by `EngineBuilder::resolver_fn`
fn profile(session: Session, request: &Request) -> Result<(Window, Session), ResolveError> {
    let message = match (session.variable("name"), session.variable("city")) {
        (Some(name), Some(city)) => format!("{name} from {city}\nPhone: {}", request.cell_nr),
        (Some(name), None) => format!("{name}, registration incomplete"),
        _ => "You are not registered yet".to_string(),
    };

    let window = Window::new("PROFILE", "My profile", message)
        .with_option(WindowOption::new("1", "Back", "MAIN"))
        .with_option(WindowOption::new("0", "Exit", "BYE"));
    Ok((window, session))
}
