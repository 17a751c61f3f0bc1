//! Identity-service side of the form: wire types, the HTTP client, the
//! dispatcher that resolves results, and the session and navigation
//! capabilities it writes to. Passwords and tokens must never be logged here.

pub mod client;
pub mod dispatcher;
pub mod navigation;
pub mod session;
pub mod types;

pub use client::{HttpIdentityService, IdentityService};
pub use dispatcher::{AuthDispatcher, Effect, Resolution};
pub use navigation::{LogNavigator, Navigator, RecordingNavigator};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
