//! Booking calendar
//!
//! Bookings inside a time window as calendar events, plus the salon's
//! operating hours for business-hours shading.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use salon_client::{Backend, ClientResult};
use serde::Serialize;
use shared::models::{Booking, BookingStatus, OperatingHours, SalonSettings, SettingsWarning};
use shared::query::Filter;

use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub service: String,
    pub customer: String,
    pub staff: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub title: String,
    pub events: Vec<CalendarEvent>,
    pub operating_hours: OperatingHours,
    pub warnings: Vec<String>,
}

fn names<I>(rows: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    rows.into_iter().collect()
}

/// Load bookings whose start lies in `[from, to)`
pub async fn load(
    backend: &dyn Backend,
    t: &Translator,
    notifier: &dyn Notifier,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> ClientResult<CalendarView> {
    let filter = Filter::new()
        .gte("start_time", from.to_rfc3339())
        .lt("start_time", to.to_rfc3339())
        .order_by("start_time", true);

    let loaded = async {
        let bookings = backend.bookings().list(Some(&filter)).await?;
        let services = backend.services().list(None).await?;
        let customers = backend.customers().list(None).await?;
        let staff = backend.staff().list(None).await?;
        let settings = backend.settings().list(None).await?;
        ClientResult::Ok((bookings, services, customers, staff, settings))
    }
    .await;
    let (bookings, services, customers, staff, settings) = match loaded {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load calendar data");
            notifier.notify(Notification::error(
                NotificationCode::LoadFailed,
                t.t("admin.calendar.errors.fetch"),
            ));
            return Err(e);
        }
    };

    let service_names = names(services.into_iter().map(|s| (s.id, s.name)));
    let customer_names = names(customers.into_iter().map(|c| (c.id, c.name)));
    let staff_names = names(staff.into_iter().map(|s| (s.id, s.name)));

    let lookup = |map: &HashMap<String, String>, id: Option<&String>, fallback: &str| {
        id.and_then(|id| map.get(id))
            .cloned()
            .unwrap_or_else(|| t.t(fallback))
    };

    let events = bookings
        .iter()
        .map(|b: &Booking| {
            let service = lookup(&service_names, b.service_id.as_ref(), "admin.calendar.event.default_service");
            let customer = lookup(
                &customer_names,
                Some(&b.customer_id),
                "admin.calendar.event.default_customer",
            );
            let staff = lookup(&staff_names, b.staff_id.as_ref(), "admin.calendar.event.default_staff");
            CalendarEvent {
                id: b.id.clone(),
                title: format!("{service} - {customer} ({staff})"),
                start: b.start_time,
                end: b.end_time,
                status: b.status,
                service,
                customer,
                staff,
            }
        })
        .collect();

    let (salon, settings_warnings) = SalonSettings::from_rows(&settings);
    let mut warnings = Vec::new();
    for warning in settings_warnings {
        let message = match warning {
            SettingsWarning::HoursMissing => t.t("admin.calendar.warnings.settings_missing"),
            SettingsWarning::HoursUnparsable(reason) => {
                tracing::warn!(reason = %reason, "Operating hours unparsable, using defaults");
                t.t("admin.calendar.errors.parse_hours")
            }
        };
        notifier.notify(Notification::warning(
            NotificationCode::SettingsHoursInvalid,
            message.clone(),
        ));
        warnings.push(message);
    }

    Ok(CalendarView {
        title: t.t("admin.calendar.title"),
        events,
        operating_hours: salon.operating_hours,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, TranslationStore};
    use crate::notify::NotificationCenter;
    use chrono::TimeZone;
    use salon_client::MemoryBackend;
    use shared::models::{Service, Setting};
    use std::sync::Arc;

    fn booking(id: &str, day: u32, service: Option<&str>) -> Booking {
        Booking {
            id: id.into(),
            customer_id: "missing".into(),
            staff_id: None,
            service_id: service.map(str::to_string),
            start_time: Utc.with_ymd_and_hms(2026, 5, day, 10, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2026, 5, day, 11, 0, 0).unwrap(),
            status: BookingStatus::Scheduled,
            message: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_events_in_window_with_defaults() {
        let backend = MemoryBackend::default();
        backend
            .seed([booking("b1", 4, Some("s1")), booking("b2", 20, None)])
            .unwrap();
        backend
            .seed([Service {
                id: "s1".into(),
                name: "Haircut".into(),
                description: None,
                duration_minutes: 30,
                price: "15".parse().unwrap(),
                category: None,
                is_active: true,
            }])
            .unwrap();
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let center = NotificationCenter::new();

        let view = load(
            &backend,
            &t,
            &center,
            Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 8, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(view.events.len(), 1);
        assert_eq!(view.events[0].title, "Haircut - Customer (Staff)");
        assert_eq!(view.operating_hours, OperatingHours::default());
        assert_eq!(view.warnings, vec!["Operating hours setting not found.".to_string()]);
        assert_eq!(center.codes(), vec![NotificationCode::SettingsHoursInvalid]);
    }

    #[tokio::test]
    async fn test_unparsable_hours_warn() {
        let backend = MemoryBackend::default();
        backend
            .seed([Setting {
                key: "operating_hours".into(),
                value: "{".into(),
            }])
            .unwrap();
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let now = Utc::now();

        let view = load(&backend, &t, &NotificationCenter::new(), now, now)
            .await
            .unwrap();
        assert_eq!(view.warnings, vec!["Error parsing operating hours.".to_string()]);
    }
}
