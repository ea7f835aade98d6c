//! Salon App - booking and inventory management over a hosted backend
//!
//! # Module structure
//!
//! ```text
//! salon-app/src/
//! ├── core/      # configuration, application context, errors
//! ├── i18n/      # translation catalogs (en, ar)
//! ├── notify.rs  # user notifications
//! ├── forms/     # admin entity forms, multi-step product form
//! ├── views/     # admin list views, calendar, dashboard, settings
//! ├── pages/     # public pages, booking portal, auth
//! ├── routes.rs  # path resolution, guards, rendering
//! └── utils/     # logging, validation
//! ```

pub mod core;
pub mod forms;
pub mod i18n;
pub mod notify;
pub mod pages;
pub mod routes;
pub mod utils;
pub mod views;

// Re-export public types
pub use core::{AppContext, AppError, AppResult, Config};
pub use i18n::{Locale, TranslationStore, Translator};
pub use notify::{Notification, NotificationCenter, NotificationCode, Notifier};
pub use routes::{Route, render, resolve};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and start logging as configured
pub fn setup_environment() -> anyhow::Result<Config> {
    // Missing .env is fine
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;
    Ok(config)
}
