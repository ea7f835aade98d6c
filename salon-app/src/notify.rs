//! User notifications (toasts)
//!
//! Components report outcomes through a [`Notifier`]. The
//! [`NotificationCenter`] keeps them in order for the view layer and mirrors
//! every entry into the log.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// What happened; each outcome branch has its own code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCode {
    // Product form
    ValidationFailed,
    ImagePreviewCleared,
    UploadingImage,
    UploadFailed,
    ProductAdded,
    ProductUpdated,
    ProductAddFailed,
    ProductUpdateFailed,
    OldImageDeleted,
    OldImageDeleteFailed,
    UploadReverted,
    RevertFailed,

    // Admin lists and forms
    LoadFailed,
    Saved,
    SaveFailed,
    Deleted,
    DeleteFailed,
    StatusUpdated,
    StatusUpdateFailed,
    BulkUpdated,
    BulkActionFailed,
    SettingsSaved,
    SettingsSaveFailed,
    SettingsHoursInvalid,

    // Public pages
    MessageSent,
    MessageSendFailed,
    BookingCreated,
    BookingFailed,
    SignedIn,
    SignInFailed,
    Registered,
    RegisterFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub code: NotificationCode,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, code: NotificationCode, message: impl Into<String>) -> Self {
        Self {
            level,
            code,
            message: message.into(),
        }
    }

    pub fn info(code: NotificationCode, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, code, message)
    }

    pub fn success(code: NotificationCode, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, code, message)
    }

    pub fn warning(code: NotificationCode, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, code, message)
    }

    pub fn error(code: NotificationCode, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, code, message)
    }
}

/// Sink for user notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Ordered notification log
#[derive(Debug, Default)]
pub struct NotificationCenter {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything so far, oldest first
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries().clone()
    }

    /// Take and clear
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries())
    }

    pub fn codes(&self) -> Vec<NotificationCode> {
        self.entries().iter().map(|n| n.code).collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries().last().cloned()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error | NotificationLevel::Warning => {
                tracing::warn!(code = ?notification.code, message = %notification.message, "notification")
            }
            _ => {
                tracing::info!(code = ?notification.code, message = %notification.message, "notification")
            }
        }
        self.entries().push(notification);
    }
}
