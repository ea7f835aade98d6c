//! Core module - configuration, application context and errors
//!
//! - [`Config`] - configuration loaded from the environment
//! - [`AppContext`] - shared services handed to pages and views
//! - [`AppError`] - application error

pub mod config;
pub mod context;
pub mod error;

pub use config::Config;
pub use context::AppContext;
pub use error::{AppError, AppResult};
