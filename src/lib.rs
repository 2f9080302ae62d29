pub mod auth;
pub mod coerce;
pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod server;
pub mod store;
pub mod transfer;
