//! Domain types for the admin panel.

pub mod admin_user;
pub mod product;

pub use admin_user::{AdminUser, CurrentAdmin};
pub use product::Product;

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
