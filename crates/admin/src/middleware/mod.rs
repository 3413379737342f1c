//! Middleware: session layer and authentication extractors.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, require_editor, set_current_admin};
pub use session::create_session_layer;
