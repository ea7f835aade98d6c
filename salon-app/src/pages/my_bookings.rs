//! The signed-in customer's bookings

use std::collections::HashMap;

use salon_client::{AuthUser, Backend, ClientResult};
use serde::Serialize;
use shared::models::{Booking, BookingStatus, Customer};
use shared::query::Filter;

use crate::core::{AppError, AppResult};
use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};

#[derive(Debug, Clone, Serialize)]
pub struct MyBookingRow {
    pub id: String,
    pub service: String,
    pub time: String,
    pub staff: String,
    pub status: BookingStatus,
    pub status_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MyBookingsView {
    pub title: String,
    pub rows: Vec<MyBookingRow>,
    pub empty_message: Option<String>,
}

/// Bookings plus service and staff names by id
type Loaded = (Vec<Booking>, HashMap<String, String>, HashMap<String, String>);

async fn fetch(backend: &dyn Backend, user: &AuthUser) -> ClientResult<Loaded> {
    let profile: Option<Customer> = backend
        .customers()
        .list(Some(&Filter::new().eq("auth_user_id", &user.id)))
        .await?
        .into_iter()
        .next();
    let Some(profile) = profile else {
        tracing::warn!(user_id = %user.id, "No customer profile for user");
        return Ok(Default::default());
    };

    let bookings = backend
        .bookings()
        .list(Some(
            &Filter::new()
                .eq("customer_id", &profile.id)
                .order_by("start_time", false),
        ))
        .await?;
    let services = backend.services().list(None).await?;
    let staff = backend.staff().list(None).await?;
    Ok((
        bookings,
        services.into_iter().map(|s| (s.id, s.name)).collect(),
        staff.into_iter().map(|s| (s.id, s.name)).collect(),
    ))
}

/// Bookings newest first
pub async fn load(
    backend: &dyn Backend,
    user: Option<&AuthUser>,
    t: &Translator,
    notifier: &dyn Notifier,
) -> AppResult<MyBookingsView> {
    let Some(user) = user else {
        notifier.notify(Notification::error(
            NotificationCode::LoadFailed,
            t.t("my_bookings.errors.not_logged_in"),
        ));
        return Err(AppError::Unauthorized);
    };

    let (bookings, services, staff) = fetch(backend, user).await.inspect_err(|e| {
        tracing::error!(user_id = %user.id, error = %e, "Failed to load customer bookings");
        notifier.notify(Notification::error(
            NotificationCode::LoadFailed,
            t.t("my_bookings.errors.load_failed"),
        ));
    })?;

    let name = |map: &HashMap<String, String>, id: Option<&String>| id.and_then(|id| map.get(id)).cloned();
    let rows: Vec<MyBookingRow> = bookings
        .into_iter()
        .map(|b| MyBookingRow {
            service: name(&services, b.service_id.as_ref())
                .unwrap_or_else(|| t.t("my_bookings.unknown_service")),
            staff: name(&staff, b.staff_id.as_ref()).unwrap_or_else(|| t.t("common.not_applicable")),
            time: format!(
                "{} - {}",
                b.start_time.format("%Y-%m-%d %H:%M"),
                b.end_time.format("%H:%M")
            ),
            status_label: t.t(&format!("admin.forms.booking.status_options.{}", b.status)),
            status: b.status,
            id: b.id,
        })
        .collect();

    Ok(MyBookingsView {
        title: t.t("my_bookings.title"),
        empty_message: rows.is_empty().then(|| t.t("my_bookings.no_bookings")),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, TranslationStore};
    use crate::notify::NotificationCenter;
    use chrono::{Duration, TimeZone, Utc};
    use salon_client::MemoryBackend;
    use shared::models::Service;
    use std::sync::Arc;

    fn booking(id: &str, customer: &str, day: u32, service: Option<&str>) -> Booking {
        let start = Utc.with_ymd_and_hms(2026, 5, day, 10, 0, 0).unwrap();
        Booking {
            id: id.into(),
            customer_id: customer.into(),
            staff_id: None,
            service_id: service.map(str::to_string),
            start_time: start,
            end_time: start + Duration::minutes(30),
            status: BookingStatus::Scheduled,
            message: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_own_bookings_newest_first() {
        let backend = MemoryBackend::default();
        let user = backend.add_user("lina@example.com", "secret1", None);
        backend
            .seed([Customer {
                id: "me".into(),
                name: "Lina".into(),
                email: "lina@example.com".into(),
                phone: None,
                auth_user_id: Some(user.id.clone()),
                created_at: None,
            }])
            .unwrap();
        backend
            .seed([
                booking("old", "me", 2, Some("svc")),
                booking("new", "me", 9, Some("gone")),
                booking("other", "someone", 5, None),
            ])
            .unwrap();
        backend
            .seed([Service {
                id: "svc".into(),
                name: "Haircut".into(),
                description: None,
                duration_minutes: 30,
                price: "15".parse().unwrap(),
                category: None,
                is_active: true,
            }])
            .unwrap();
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);

        let view = load(&backend, Some(&user), &t, &NotificationCenter::new())
            .await
            .unwrap();
        let ids: Vec<&str> = view.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["new", "old"]);
        assert_eq!(view.rows[0].service, "Service Details Unavailable");
        assert_eq!(view.rows[1].service, "Haircut");
        assert_eq!(view.rows[1].staff, "N/A");
        assert_eq!(view.rows[1].time, "2026-05-02 10:00 - 10:30");
        assert_eq!(view.rows[1].status_label, "Scheduled");
    }

    #[tokio::test]
    async fn test_requires_user() {
        let backend = MemoryBackend::default();
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let center = NotificationCenter::new();
        assert!(matches!(
            load(&backend, None, &t, &center).await,
            Err(AppError::Unauthorized)
        ));
        assert!(backend.calls().is_empty());
    }
}
