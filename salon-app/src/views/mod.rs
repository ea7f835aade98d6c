//! Admin views
//!
//! Each view owns its rows and produces a serializable view model. Lists
//! share [`ListView`]; the calendar and dashboard are one-shot loads.

pub mod bookings;
pub mod calendar;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod list;
pub mod messages;
pub mod services;
pub mod settings;
pub mod staff;

pub use bookings::{BookingRow, BookingsView};
pub use calendar::{CalendarEvent, CalendarView};
pub use customers::{CustomerRow, CustomersView};
pub use dashboard::{DashboardView, SummaryCard};
pub use inventory::{InventoryView, ProductRow};
pub use list::{AdminResource, ListKeys, ListView, ListViewModel};
pub use messages::{MessageRow, MessagesView};
pub use services::{ServiceRow, ServicesView};
pub use settings::{DayRow, SettingsField, SettingsView, SettingsViewModel};
pub use staff::{StaffRow, StaffView};
