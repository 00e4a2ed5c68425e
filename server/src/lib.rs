//! # Harvest Manager Server
//!
//! HTTP surface for parser administration.

#![warn(clippy::all)]

pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ServerError;
pub use server::Server;
pub use state::AppState;
