//! Salon settings editor

use chrono::{NaiveTime, Weekday};
use salon_client::{Backend, ClientResult};
use serde::Serialize;
use shared::form::FieldError;
use shared::models::{OperatingHours, SalonSettings, Setting, SettingsWarning, weekday_key};

use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    SalonName,
    Phone,
    Address,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayRow {
    pub day: &'static str,
    pub label: String,
    pub start: String,
    pub end: String,
    pub closed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsViewModel {
    pub title: String,
    pub salon_name: String,
    pub phone: String,
    pub address: String,
    pub days: Vec<DayRow>,
    pub warnings: Vec<String>,
    pub save_label: String,
}

fn parse_time(raw: &str) -> Result<NaiveTime, FieldError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| FieldError::InvalidDateTime(raw.to_string()))
}

#[derive(Debug, Clone)]
pub struct SettingsView {
    settings: SalonSettings,
    warnings: Vec<String>,
    t: Translator,
}

impl SettingsView {
    pub fn new(translator: Translator) -> Self {
        Self {
            settings: SalonSettings::default(),
            warnings: Vec::new(),
            t: translator,
        }
    }

    pub fn settings(&self) -> &SalonSettings {
        &self.settings
    }

    /// Read all settings rows. Missing or broken hours fall back to defaults.
    pub async fn load(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> ClientResult<()> {
        let rows = backend.settings().list(None).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to load settings");
            notifier.notify(Notification::error(
                NotificationCode::LoadFailed,
                self.t.t("admin.settings.errors.load"),
            ));
        })?;

        let (settings, warnings) = SalonSettings::from_rows(&rows);
        self.settings = settings;
        self.warnings.clear();
        for warning in warnings {
            if let SettingsWarning::HoursUnparsable(reason) = warning {
                tracing::warn!(reason = %reason, "Operating hours unparsable, using defaults");
                let message = self.t.t("admin.settings.errors.parse_hours");
                notifier.notify(Notification::warning(
                    NotificationCode::SettingsHoursInvalid,
                    message.clone(),
                ));
                self.warnings.push(message);
            }
        }
        Ok(())
    }

    pub fn set_field(&mut self, field: SettingsField, raw: &str) {
        let target = match field {
            SettingsField::SalonName => &mut self.settings.salon_name,
            SettingsField::Phone => &mut self.settings.phone,
            SettingsField::Address => &mut self.settings.address,
        };
        *target = raw.trim().to_string();
    }

    /// Set one day's hours from `HH:MM` inputs
    pub fn set_day(
        &mut self,
        weekday: Weekday,
        start: &str,
        end: &str,
        closed: bool,
    ) -> Result<(), FieldError> {
        let day = self.settings.operating_hours.day_mut(weekday);
        if closed {
            day.closed = true;
            return Ok(());
        }
        let (start, end) = (parse_time(start)?, parse_time(end)?);
        if end <= start {
            return Err(FieldError::OutOfRange {
                min: start.format("%H:%M").to_string(),
                max: "23:59".to_string(),
            });
        }
        day.start = start;
        day.end = end;
        day.closed = false;
        Ok(())
    }

    /// Write every settings row (update, or insert when the key is new)
    pub async fn save(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> ClientResult<()> {
        match self.write(backend).await {
            Ok(()) => {
                tracing::info!("Settings saved");
                notifier.notify(Notification::success(
                    NotificationCode::SettingsSaved,
                    self.t.t("admin.settings.notifications.update_success"),
                ));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save settings");
                notifier.notify(Notification::error(
                    NotificationCode::SettingsSaveFailed,
                    self.t.t("admin.settings.errors.save"),
                ));
                Err(e)
            }
        }
    }

    async fn write(&self, backend: &dyn Backend) -> ClientResult<()> {
        for row in self.settings.to_rows()? {
            upsert(backend, &row).await?;
        }
        Ok(())
    }

    pub fn view(&self) -> SettingsViewModel {
        let hours: &OperatingHours = &self.settings.operating_hours;
        SettingsViewModel {
            title: self.t.t("admin.settings.title"),
            salon_name: self.settings.salon_name.clone(),
            phone: self.settings.phone.clone(),
            address: self.settings.address.clone(),
            days: OperatingHours::WEEK
                .iter()
                .map(|&weekday| {
                    let day = hours.day(weekday);
                    let key = weekday_key(weekday);
                    DayRow {
                        day: key,
                        label: self.t.t(&format!("common.days.{key}")),
                        start: day.start.format("%H:%M").to_string(),
                        end: day.end.format("%H:%M").to_string(),
                        closed: day.closed,
                    }
                })
                .collect(),
            warnings: self.warnings.clone(),
            save_label: self.t.t("common.save_settings"),
        }
    }
}

async fn upsert(backend: &dyn Backend, row: &Setting) -> ClientResult<()> {
    match backend.settings().update(&row.key, row).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => backend.settings().create(row).await.map(|_| ()),
        Err(e) => Err(e),
    }
}
