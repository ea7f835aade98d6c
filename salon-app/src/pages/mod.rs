//! Public pages
//!
//! Page controllers for visitors and customers. Each produces a
//! serializable view model; submissions report through the context's
//! notification center.

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod contact;
pub mod home;
pub mod my_bookings;

pub use auth::{AuthPage, RegisterField, RegisterForm, admin_login, customer_login};
pub use booking::{BookingPortal, BookingPortalView, Slot, available_slots};
pub use catalog::{Catalog, CatalogItem, CatalogView, ProductDetail, SortOrder, product_path};
pub use contact::{ContactField, ContactForm, ContactPage};
pub use home::StaticPage;
pub use my_bookings::{MyBookingRow, MyBookingsView};
