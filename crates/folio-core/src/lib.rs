//! Folio: a portfolio content API with an admin area, visitor testimonials
//! and a contact form guarded against brute force and spam.

pub mod app;
pub mod auth;
pub mod clock;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod extractors;
pub mod guard;
pub mod logging;
pub mod migrations;
pub mod models;
pub mod openapi;
pub mod response;
pub mod storage;
pub mod store;
pub mod testing;

pub use app::App;
pub use config::{Config, GuardConfig};
pub use error::FolioError;
pub use response::ApiResponse;
pub use testing::{TestApp, TestClient, TestResponse};
