//! Bookshelf server
//!
//! A REST JSON API for books and their entries. Routes are declared as
//! [`api::Route`] descriptors, translated to responses by a single dispatch
//! layer, and served by singletons whose startup and shutdown are ordered by
//! a [`lifecycle::Lifecycle`].

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod repository;

pub use app::App;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
