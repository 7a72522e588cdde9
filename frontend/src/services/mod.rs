//! Backend and browser services.
//!
//! # Services
//!
//! - [`api`] - HTTP client for the discharge review API
//! - [`download`] - Raw PDF reconstruction and download

pub mod api;
pub mod download;

pub use api::*;
pub use download::*;
