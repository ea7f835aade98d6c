//! Admin dashboard summary cards

use chrono::{DateTime, Duration, Utc};
use salon_client::{Backend, ClientResult};
use serde::Serialize;
use shared::models::{BookingStatus, MessageStatus};
use shared::query::Filter;

use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub bookings_today: SummaryCard,
    pub upcoming_24h: SummaryCard,
    pub total_customers: SummaryCard,
    pub unread_messages: SummaryCard,
}

/// Counts as of `now`.
///
/// - today: non-cancelled bookings starting on `now`'s UTC date
/// - upcoming: scheduled bookings starting within the next 24 hours
pub async fn load(
    backend: &dyn Backend,
    t: &Translator,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> ClientResult<DashboardView> {
    let day_start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now);
    let day_end = day_start + Duration::days(1);

    let counts = async {
        let today = backend
            .bookings()
            .list(Some(
                &Filter::new()
                    .gte("start_time", day_start.to_rfc3339())
                    .lt("start_time", day_end.to_rfc3339()),
            ))
            .await?
            .iter()
            .filter(|b| b.status.blocks_slot())
            .count();
        let upcoming = backend
            .bookings()
            .list(Some(
                &Filter::new()
                    .gte("start_time", now.to_rfc3339())
                    .lt("start_time", (now + Duration::hours(24)).to_rfc3339())
                    .eq("status", BookingStatus::Scheduled),
            ))
            .await?
            .len();
        let customers = backend.customers().list(None).await?.len();
        let unread = backend
            .messages()
            .list(Some(&Filter::new().eq("status", MessageStatus::Unread)))
            .await?
            .len();
        ClientResult::Ok((today, upcoming, customers, unread))
    }
    .await;

    let (today, upcoming, customers, unread) = counts.inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load dashboard summary");
        notifier.notify(Notification::error(
            NotificationCode::LoadFailed,
            t.t("admin.dashboard.errors.fetch"),
        ));
    })?;

    let card = |key: &str, value| SummaryCard {
        label: t.t(key),
        value,
    };
    Ok(DashboardView {
        title: t.t("admin.dashboard.title"),
        bookings_today: card("admin.dashboard.card.bookings_today", today),
        upcoming_24h: card("admin.dashboard.card.upcoming_appointments_24h", upcoming),
        total_customers: card("admin.dashboard.card.total_customers", customers),
        unread_messages: card("admin.dashboard.card.new_messages", unread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, TranslationStore};
    use crate::notify::NotificationCenter;
    use chrono::TimeZone;
    use salon_client::MemoryBackend;
    use shared::models::{Booking, Message};
    use std::sync::Arc;

    fn booking(id: &str, start: DateTime<Utc>, status: BookingStatus) -> Booking {
        Booking {
            id: id.into(),
            customer_id: "c".into(),
            staff_id: None,
            service_id: None,
            start_time: start,
            end_time: start + Duration::minutes(30),
            status,
            message: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap();
        let backend = MemoryBackend::default();
        backend
            .seed([
                booking("past", now - Duration::hours(3), BookingStatus::Completed),
                booking("soon", now + Duration::hours(2), BookingStatus::Scheduled),
                booking("off", now + Duration::hours(4), BookingStatus::Cancelled),
                booking("tomorrow", now + Duration::hours(20), BookingStatus::Scheduled),
                booking("later", now + Duration::days(3), BookingStatus::Scheduled),
            ])
            .unwrap();
        backend
            .seed([Message {
                id: "m".into(),
                name: "Sam".into(),
                email: "sam@example.com".into(),
                phone: None,
                message: "Hi".into(),
                status: MessageStatus::Unread,
                created_at: None,
            }])
            .unwrap();
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);

        let view = load(&backend, &t, &NotificationCenter::new(), now).await.unwrap();
        assert_eq!(view.bookings_today.value, 2);
        assert_eq!(view.upcoming_24h.value, 2);
        assert_eq!(view.total_customers.value, 0);
        assert_eq!(view.unread_messages.value, 1);
        assert_eq!(view.unread_messages.label, "New Messages");
    }
}
