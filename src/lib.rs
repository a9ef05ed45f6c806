//! Lottus - menu navigation engine for USSD-style sessions
//!
//! Each client turn carries a session number, a cell number and a short
//! text. The engine keeps track of which window every session is at and
//! decides the next one from the window's options, capture rules and any
//! dynamic windows the application registered.

pub mod config;
pub mod engine;
pub mod gateway;
pub mod registry;
pub mod resolver;
pub mod response;
pub mod session;
pub mod store;
pub mod window;

pub use config::LottusConfig;
pub use engine::{Engine, EngineBuilder, EngineError, EngineResult, Step};
pub use gateway::Gateway;
pub use registry::{RegistryError, WindowRegistry};
pub use resolver::{FnResolver, ResolveError, ResolverTable, WindowResolver};
pub use response::{project, OptionResponse, WindowResponse};
pub use session::{Request, Session};
pub use store::{MemorySessionStore, MemoryWindowCache, SessionStore, WindowCache};
pub use window::{Required, Window, WindowOption, WindowType};
