//! Booking portal
//!
//! Service → staff (optional) → date → slot → message → confirm. Slots are
//! cut from the day's operating hours in steps of the service duration and
//! skip anything overlapping a booking that still holds its time.
//!
//! Operating hours are interpreted in UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use salon_client::{AuthUser, Backend, ClientError, ClientResult};
use serde::Serialize;
use shared::models::{
    Booking, BookingFields, BookingStatus, Currency, OperatingHours, SalonSettings, Service, Staff,
};
use shared::query::Filter;

use crate::core::{AppError, AppResult};
use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};
use crate::utils::validation::{self, MAX_NOTE_LEN};

/// A bookable time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn label(&self) -> String {
        self.start.format("%H:%M").to_string()
    }
}

/// Free slots on `date`.
///
/// A slot is taken when it overlaps a booking that blocks its slot; with
/// `staff_id` set only that staff member's bookings count. Slots starting
/// before `not_before` are dropped.
pub fn available_slots(
    date: NaiveDate,
    hours: &OperatingHours,
    duration_minutes: i32,
    bookings: &[Booking],
    staff_id: Option<&str>,
    not_before: DateTime<Utc>,
) -> Vec<Slot> {
    let day = hours.day(date.weekday());
    if !day.is_open() || duration_minutes <= 0 {
        return Vec::new();
    }
    let step = Duration::minutes(i64::from(duration_minutes));
    let close = date.and_time(day.end).and_utc();

    let mut slots = Vec::new();
    let mut start = date.and_time(day.start).and_utc();
    while start + step <= close {
        let end = start + step;
        let taken = bookings.iter().any(|b| {
            b.status.blocks_slot()
                && (staff_id.is_none() || b.staff_id.as_deref() == staff_id)
                && b.overlaps(start, end)
        });
        if !taken && start >= not_before {
            slots.push(Slot { start, end });
        }
        start = end;
    }
    slots
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceOption {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub price: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffOption {
    /// `None` is "any available staff"
    pub id: Option<String>,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotOption {
    pub start: DateTime<Utc>,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingPortalView {
    pub title: String,
    /// Set when nobody is signed in
    pub auth_required: Option<String>,
    pub booking_as: Option<String>,
    pub services: Vec<ServiceOption>,
    pub staff: Vec<StaffOption>,
    pub date: Option<NaiveDate>,
    pub slots_title: Option<String>,
    pub slots: Vec<SlotOption>,
    pub no_slots: Option<String>,
    pub message: String,
    pub confirm_label: String,
}

/// Booking portal state for one visitor
#[derive(Debug, Clone)]
pub struct BookingPortal {
    t: Translator,
    services: Vec<Service>,
    staff: Vec<Staff>,
    hours: OperatingHours,
    service_id: Option<String>,
    staff_id: Option<String>,
    date: Option<NaiveDate>,
    slots: Vec<Slot>,
    slot: Option<Slot>,
    message: String,
}

impl BookingPortal {
    /// Load active services, active staff and operating hours
    pub async fn load(
        backend: &dyn Backend,
        t: &Translator,
        notifier: &dyn Notifier,
    ) -> ClientResult<Self> {
        let active = || Filter::new().eq("is_active", true).order_by("name", true);
        let fail = |key: &str, e: &ClientError| {
            tracing::error!(error = %e, "Failed to load booking portal");
            notifier.notify(Notification::error(NotificationCode::LoadFailed, t.t(key)));
        };

        let services = backend
            .services()
            .list(Some(&active()))
            .await
            .inspect_err(|e| fail("booking.errorLoadServices", e))?;
        let staff = backend
            .staff()
            .list(Some(&active()))
            .await
            .inspect_err(|e| fail("booking.errorLoadStaff", e))?;
        let settings = backend
            .settings()
            .list(None)
            .await
            .inspect_err(|e| fail("booking.errorLoadAvailability", e))?;
        let (settings, warnings) = SalonSettings::from_rows(&settings);
        if !warnings.is_empty() {
            tracing::warn!(?warnings, "Booking portal using default operating hours");
        }

        Ok(Self {
            t: t.clone(),
            services,
            staff,
            hours: settings.operating_hours,
            service_id: None,
            staff_id: None,
            date: None,
            slots: Vec::new(),
            slot: None,
            message: String::new(),
        })
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn selected_service(&self) -> Option<&Service> {
        let id = self.service_id.as_deref()?;
        self.services.iter().find(|s| s.id == id)
    }

    fn notify_invalid(&self, notifier: &dyn Notifier, message: &str) {
        notifier.notify(Notification::error(
            NotificationCode::ValidationFailed,
            message,
        ));
    }

    fn reject(&self, notifier: &dyn Notifier, key: &str) -> AppError {
        let message = self.t.t(key);
        self.notify_invalid(notifier, &message);
        AppError::Validation(message)
    }

    fn clear_slots(&mut self) {
        self.slots.clear();
        self.slot = None;
    }

    pub fn select_service(&mut self, notifier: &dyn Notifier, id: &str) -> AppResult<()> {
        if !self.services.iter().any(|s| s.id == id) {
            return Err(self.reject(notifier, "booking.errorSelectService"));
        }
        self.service_id = Some(id.to_string());
        self.clear_slots();
        Ok(())
    }

    /// `None` books with any available staff member
    pub fn select_staff(&mut self, id: Option<&str>) {
        self.staff_id = id
            .filter(|id| self.staff.iter().any(|s| s.id == *id))
            .map(str::to_string);
        self.clear_slots();
    }

    /// Compute the free slots of `date`
    pub async fn select_date(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<&[Slot]> {
        let Some(duration) = self.selected_service().map(|s| s.duration_minutes) else {
            return Err(self.reject(notifier, "booking.errorSelectService"));
        };
        self.date = Some(date);
        self.clear_slots();

        let bookings = day_bookings(backend, date).await.inspect_err(|e| {
            tracing::error!(date = %date, error = %e, "Failed to load availability");
            notifier.notify(Notification::error(
                NotificationCode::LoadFailed,
                self.t.t("booking.errorLoadAvailability"),
            ));
        })?;
        self.slots = available_slots(
            date,
            &self.hours,
            duration,
            &bookings,
            self.staff_id.as_deref(),
            now,
        );
        Ok(&self.slots)
    }

    pub fn select_slot(&mut self, notifier: &dyn Notifier, start: DateTime<Utc>) -> AppResult<()> {
        match self.slots.iter().find(|slot| slot.start == start) {
            Some(slot) => {
                self.slot = Some(*slot);
                Ok(())
            }
            None => Err(self.reject(notifier, "booking.errorSelectSlot")),
        }
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    /// Create a `scheduled` booking for the signed-in customer
    pub async fn submit(
        &mut self,
        backend: &dyn Backend,
        user: Option<&AuthUser>,
        notifier: &dyn Notifier,
    ) -> AppResult<Booking> {
        let Some(user) = user else {
            self.notify_invalid(notifier, &self.t.t("booking.errorAuthRequired"));
            return Err(AppError::Unauthorized);
        };
        if self.selected_service().is_none() {
            return Err(self.reject(notifier, "booking.errorSelectService"));
        }
        let Some(slot) = self.slot else {
            return Err(self.reject(notifier, "booking.errorSelectSlot"));
        };
        let Ok(message) = validation::required_text(&self.message, MAX_NOTE_LEN) else {
            return Err(self.reject(notifier, "booking.errorEnterMessage"));
        };

        match self.create(backend, user, slot, message).await {
            Ok(booking) => {
                tracing::info!(id = %booking.id, start = %booking.start_time, "Booking created");
                notifier.notify(Notification::success(
                    NotificationCode::BookingCreated,
                    self.t.t("booking.confirmationTitle"),
                ));
                self.slots.retain(|s| *s != slot);
                self.slot = None;
                self.message.clear();
                Ok(booking)
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Failed to create booking");
                notifier.notify(Notification::error(
                    NotificationCode::BookingFailed,
                    self.t.t("booking.errorCreateBooking"),
                ));
                Err(e)
            }
        }
    }

    async fn create(
        &self,
        backend: &dyn Backend,
        user: &AuthUser,
        slot: Slot,
        message: String,
    ) -> AppResult<Booking> {
        let customer = backend
            .customers()
            .list(Some(&Filter::new().eq("auth_user_id", &user.id)))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("customer profile for user {}", user.id)))?;

        // Someone may have taken the slot since it was listed
        let bookings = day_bookings(backend, slot.start.date_naive()).await?;
        if bookings.iter().any(|b| {
            b.status.blocks_slot()
                && (self.staff_id.is_none() || b.staff_id == self.staff_id)
                && b.overlaps(slot.start, slot.end)
        }) {
            return Err(AppError::Validation(self.t.t("booking.errorSelectSlot")));
        }

        let fields = BookingFields {
            customer_id: customer.id,
            staff_id: self.staff_id.clone(),
            service_id: self.service_id.clone(),
            start_time: slot.start,
            end_time: slot.end,
            status: BookingStatus::Scheduled,
            message: Some(message),
            notes: None,
        };
        Ok(backend.bookings().create(&fields).await?)
    }

    pub fn view(&self, user: Option<&AuthUser>) -> BookingPortalView {
        let t = &self.t;
        let minutes = t.t("booking.minutes");
        let mut staff = vec![StaffOption {
            id: None,
            name: t.t("booking.anyStaff"),
            selected: self.staff_id.is_none(),
        }];
        staff.extend(self.staff.iter().map(|s| StaffOption {
            id: Some(s.id.clone()),
            name: s.name.clone(),
            selected: self.staff_id.as_deref() == Some(s.id.as_str()),
        }));
        let date_label = self.date.map(|d| d.format("%Y-%m-%d").to_string());

        BookingPortalView {
            title: t.t("booking.pageTitle"),
            auth_required: user.is_none().then(|| t.t("booking.errorAuthRequired")),
            booking_as: user
                .and_then(|u| u.email.as_deref())
                .map(|email| t.t_with("booking.bookingAs", &[("email", email)])),
            services: self
                .services
                .iter()
                .map(|s| ServiceOption {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    duration: format!("{} {minutes}", s.duration_minutes),
                    price: Currency::Usd.format_amount(s.price),
                    selected: self.service_id.as_deref() == Some(s.id.as_str()),
                })
                .collect(),
            staff,
            date: self.date,
            slots_title: date_label
                .as_deref()
                .map(|date| t.t_with("booking.availableSlotsTitle", &[("date", date)])),
            slots: self
                .slots
                .iter()
                .map(|slot| SlotOption {
                    start: slot.start,
                    label: slot.label(),
                    selected: self.slot == Some(*slot),
                })
                .collect(),
            no_slots: (self.date.is_some() && self.slots.is_empty()).then(|| t.t("booking.noSlots")),
            message: self.message.clone(),
            confirm_label: t.t("booking.confirmButton"),
        }
    }
}

/// Bookings starting on `date` (UTC)
async fn day_bookings(backend: &dyn Backend, date: NaiveDate) -> ClientResult<Vec<Booking>> {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start + Duration::days(1);
    backend
        .bookings()
        .list(Some(
            &Filter::new()
                .gte("start_time", start.to_rfc3339())
                .lt("start_time", end.to_rfc3339()),
        ))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, TranslationStore};
    use crate::notify::NotificationCenter;
    use chrono::{NaiveTime, TimeZone};
    use salon_client::MemoryBackend;
    use shared::models::Customer;
    use std::sync::Arc;

    // 2026-05-04 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, hour, minute, 0).unwrap()
    }

    fn booking(start: DateTime<Utc>, minutes: i64, staff: Option<&str>, status: BookingStatus) -> Booking {
        Booking {
            id: start.to_rfc3339(),
            customer_id: "c".into(),
            staff_id: staff.map(str::to_string),
            service_id: None,
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            status,
            message: None,
            notes: None,
        }
    }

    fn early() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_slots_step_by_duration() {
        let slots = available_slots(monday(), &OperatingHours::default(), 60, &[], None, early());
        assert_eq!(slots.len(), 9);
        assert_eq!(slots[0].label(), "09:00");
        assert_eq!(slots[8].end, at(18, 0));

        // 45 minute steps stop before overrunning closing time
        let slots = available_slots(monday(), &OperatingHours::default(), 45, &[], None, early());
        assert_eq!(slots.last().unwrap().label(), "17:15");
    }

    #[test]
    fn test_slots_skip_overlaps() {
        let bookings = [
            booking(at(10, 30), 30, Some("s1"), BookingStatus::Scheduled),
            booking(at(12, 0), 60, Some("s2"), BookingStatus::Cancelled),
        ];
        let labels = |staff| -> Vec<String> {
            available_slots(monday(), &OperatingHours::default(), 60, &bookings, staff, early())
                .iter()
                .map(Slot::label)
                .collect()
        };

        let any = labels(None);
        assert!(!any.contains(&"10:00".to_string()));
        assert!(any.contains(&"12:00".to_string()));

        // Another staff member's booking does not block s2
        assert!(labels(Some("s2")).contains(&"10:00".to_string()));
        assert!(!labels(Some("s1")).contains(&"10:00".to_string()));
    }

    #[test]
    fn test_closed_day_and_past_slots() {
        let sunday = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        assert!(available_slots(sunday, &OperatingHours::default(), 30, &[], None, early()).is_empty());

        let mut hours = OperatingHours::default();
        hours.monday.end = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let slots = available_slots(monday(), &hours, 60, &[], None, at(10, 30));
        assert_eq!(slots.iter().map(Slot::label).collect::<Vec<_>>(), ["11:00"]);
    }

    async fn setup() -> (MemoryBackend, BookingPortal, AuthUser) {
        let backend = MemoryBackend::default();
        backend
            .seed([Service {
                id: "svc".into(),
                name: "Haircut".into(),
                description: None,
                duration_minutes: 60,
                price: "15".parse().unwrap(),
                category: None,
                is_active: true,
            }])
            .unwrap();
        let user = backend.add_user("lina@example.com", "secret1", None);
        backend
            .seed([Customer {
                id: "cust".into(),
                name: "Lina".into(),
                email: "lina@example.com".into(),
                phone: None,
                auth_user_id: Some(user.id.clone()),
                created_at: None,
            }])
            .unwrap();
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let portal = BookingPortal::load(&backend, &t, &NotificationCenter::new())
            .await
            .unwrap();
        (backend, portal, user)
    }

    #[tokio::test]
    async fn test_full_booking_flow() {
        let (backend, mut portal, user) = setup().await;
        let center = NotificationCenter::new();

        portal.select_service(&center, "svc").unwrap();
        let slots = portal
            .select_date(&backend, &center, monday(), early())
            .await
            .unwrap()
            .to_vec();
        assert_eq!(slots.len(), 9);

        portal.select_slot(&center, at(9, 0)).unwrap();
        portal.set_message("Short fade please");
        let booking = portal.submit(&backend, Some(&user), &center).await.unwrap();

        assert_eq!(booking.customer_id, "cust");
        assert_eq!(booking.status, BookingStatus::Scheduled);
        assert_eq!(booking.end_time, at(10, 0));
        assert_eq!(center.last().unwrap().code, NotificationCode::BookingCreated);

        // The taken slot is gone on the next lookup
        let slots = portal
            .select_date(&backend, &center, monday(), early())
            .await
            .unwrap();
        assert_eq!(slots[0].label(), "10:00");
    }

    #[tokio::test]
    async fn test_submit_requirements() {
        let (backend, mut portal, user) = setup().await;
        let center = NotificationCenter::new();

        assert!(matches!(
            portal.submit(&backend, None, &center).await,
            Err(AppError::Unauthorized)
        ));
        let rejected = center.last().unwrap();
        assert_eq!(rejected.code, NotificationCode::ValidationFailed);
        assert_eq!(rejected.message, "You must be logged in to book an appointment.");

        let err = portal.submit(&backend, Some(&user), &center).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Please select a service."));

        assert!(portal.select_date(&backend, &center, monday(), early()).await.is_err());

        portal.select_service(&center, "svc").unwrap();
        portal.select_date(&backend, &center, monday(), early()).await.unwrap();
        let err = portal.submit(&backend, Some(&user), &center).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Please select a time slot."));

        portal.select_slot(&center, at(9, 0)).unwrap();
        portal.set_message("   ");
        let err = portal.submit(&backend, Some(&user), &center).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("Please enter a message")));
        assert!(backend.rows::<Booking>().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_view_lists_any_staff_first() {
        let (_backend, portal, user) = setup().await;
        let view = portal.view(Some(&user));
        assert_eq!(view.staff[0].name, "Any Available Staff");
        assert!(view.staff[0].selected);
        assert_eq!(view.services[0].price, "$15.00");
        assert_eq!(view.auth_required, None);
        assert_eq!(view.booking_as.as_deref(), Some("Booking as: lina@example.com"));
    }
}
