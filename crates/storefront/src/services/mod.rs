//! Business services: thin orchestration over the repositories.

pub mod auth;
pub mod cart;
pub mod checkout;
