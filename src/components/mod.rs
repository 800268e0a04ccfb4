//! Singletons owning a resource, each with start/stop hooks

pub mod database;
pub mod http_server;

pub use database::Database;
pub use http_server::HttpServer;
