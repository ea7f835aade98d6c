//! Routing
//!
//! Path → [`Route`] resolution, access guards and rendering of a route's
//! view model.
//!
//! | Access | Routes | Unauthenticated |
//! |--------|--------|-----------------|
//! | Public | `/`, `/about`, `/contact`, `/inventory`, `/product/:category/:slug`, `/book` | - |
//! | Auth | `/login`, `/register`, `/admin/login` | - |
//! | Customer | `/my-bookings` | redirect `/login` |
//! | Admin | `/admin/**` | redirect `/admin/login` |

use chrono::{DateTime, Duration, Utc};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::core::{AppContext, AppResult};
use crate::i18n::Translator;
use crate::pages::{self, Catalog, SortOrder};
use crate::views::{
    self, BookingsView, CustomersView, InventoryView, MessagesView, ServicesView, SettingsView,
    StaffView,
};

pub const CUSTOMER_LOGIN_PATH: &str = "/login";
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// Calendar window rendered for `/admin/calendar`
const CALENDAR_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Route {
    Home,
    About,
    Contact,
    Inventory {
        category: Option<String>,
        sort: SortOrder,
    },
    Product {
        category: String,
        slug: String,
    },
    Book,
    MyBookings,
    Login,
    Register,
    AdminLogin,
    AdminDashboard,
    AdminCalendar,
    AdminBookings,
    AdminCustomers,
    AdminStaff,
    AdminServices,
    AdminInventory,
    AdminMessages,
    AdminSettings,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Public,
    /// Standalone login/register pages
    Auth,
    Customer,
    Admin,
}

/// Page chrome a route renders inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Header, footer and navigation
    Main,
    /// No chrome
    Standalone,
    /// Sidebar and admin header
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Allow,
    Redirect(&'static str),
}

/// Decoded query pairs of `a=1&b=two+words`; empty values are dropped
fn query_pairs(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

/// Percent-decoded path segment
fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Resolve a path (with optional query string)
pub fn resolve(path: &str) -> Route {
    let (path, query) = path.split_once('?').unwrap_or((path, ""));
    let decoded: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        .collect();
    let segments: Vec<&str> = decoded.iter().map(String::as_str).collect();

    match segments.as_slice() {
        [] => Route::Home,
        ["about"] => Route::About,
        ["contact"] => Route::Contact,
        ["inventory"] => {
            let mut category = None;
            let mut sort = SortOrder::Default;
            for (key, value) in query_pairs(query) {
                match key.as_str() {
                    "category" => category = Some(value),
                    "sort" => sort = value.parse().unwrap_or_default(),
                    _ => {}
                }
            }
            Route::Inventory { category, sort }
        }
        ["product", category, slug] => Route::Product {
            category: category.to_string(),
            slug: slug.to_string(),
        },
        ["book"] => Route::Book,
        ["my-bookings"] => Route::MyBookings,
        ["login"] => Route::Login,
        ["register"] => Route::Register,
        ["admin", "login"] => Route::AdminLogin,
        ["admin"] => Route::AdminDashboard,
        ["admin", "calendar"] => Route::AdminCalendar,
        ["admin", "bookings"] => Route::AdminBookings,
        ["admin", "customers"] => Route::AdminCustomers,
        ["admin", "staff"] => Route::AdminStaff,
        ["admin", "services"] => Route::AdminServices,
        ["admin", "inventory"] => Route::AdminInventory,
        ["admin", "messages"] => Route::AdminMessages,
        ["admin", "settings"] => Route::AdminSettings,
        _ => Route::NotFound,
    }
}

impl Route {
    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Register | Route::AdminLogin => Access::Auth,
            Route::MyBookings => Access::Customer,
            Route::AdminDashboard
            | Route::AdminCalendar
            | Route::AdminBookings
            | Route::AdminCustomers
            | Route::AdminStaff
            | Route::AdminServices
            | Route::AdminInventory
            | Route::AdminMessages
            | Route::AdminSettings => Access::Admin,
            _ => Access::Public,
        }
    }

    pub fn layout(&self) -> Layout {
        match self.access() {
            Access::Public | Access::Customer => Layout::Main,
            Access::Auth => Layout::Standalone,
            Access::Admin => Layout::Admin,
        }
    }

    /// Signed-in user required
    pub fn needs_session(&self) -> bool {
        matches!(self.access(), Access::Customer | Access::Admin)
    }
}

/// Check access for the current session.
///
/// Customer routes accept any signed-in user; admin routes need the admin
/// role.
pub fn guard(route: &Route, ctx: &AppContext) -> Guard {
    match route.access() {
        Access::Public | Access::Auth => Guard::Allow,
        Access::Customer if ctx.is_signed_in() => Guard::Allow,
        Access::Customer => Guard::Redirect(CUSTOMER_LOGIN_PATH),
        Access::Admin if ctx.is_admin() => Guard::Allow,
        Access::Admin => Guard::Redirect(ADMIN_LOGIN_PATH),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: String,
    pub path: &'static str,
}

/// Navigation for a layout
pub fn navigation(layout: Layout, ctx: &AppContext) -> Vec<NavItem> {
    let t = ctx.translator();
    let item = |key: &str, path: &'static str| NavItem {
        label: t.t(key),
        path,
    };
    match layout {
        Layout::Standalone => Vec::new(),
        Layout::Admin => vec![
            item("admin.sidebar.dashboard", "/admin"),
            item("admin.sidebar.calendar", "/admin/calendar"),
            item("admin.sidebar.bookings", "/admin/bookings"),
            item("admin.sidebar.customers", "/admin/customers"),
            item("admin.sidebar.staff", "/admin/staff"),
            item("admin.sidebar.services", "/admin/services"),
            item("admin.sidebar.inventory", "/admin/inventory"),
            item("admin.sidebar.messages", "/admin/messages"),
            item("admin.sidebar.settings", "/admin/settings"),
        ],
        Layout::Main => {
            let mut items = vec![
                item("navigation.home", "/"),
                item("navigation.about", "/about"),
                item("navigation.inventory", "/inventory"),
                item("navigation.contact", "/contact"),
                item("navigation.book_now", "/book"),
            ];
            if ctx.is_signed_in() {
                items.push(item("navigation.my_bookings", "/my-bookings"));
                if ctx.is_admin() {
                    items.push(item("navigation.adminDashboard", "/admin"));
                }
            } else {
                items.push(item("navigation.login", CUSTOMER_LOGIN_PATH));
                items.push(item("navigation.register", "/register"));
            }
            items
        }
    }
}

/// A rendered route
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub route: Route,
    pub layout: Layout,
    /// `ltr` or `rtl`
    pub dir: &'static str,
    pub navigation: Vec<NavItem>,
    pub redirect: Option<&'static str>,
    pub body: Value,
}

#[derive(Debug, Clone, Serialize)]
struct NotFoundPage {
    title: String,
    message: String,
}

fn not_found(t: &Translator) -> NotFoundPage {
    NotFoundPage {
        title: t.t("not_found.title"),
        message: t.t("not_found.message"),
    }
}

/// Resolve, guard and render `path` as of `now`
pub async fn render(ctx: &AppContext, path: &str, now: DateTime<Utc>) -> AppResult<RenderedPage> {
    let route = resolve(path);
    let layout = route.layout();
    let page = |redirect, body| RenderedPage {
        route: route.clone(),
        layout,
        dir: ctx.locale().dir(),
        navigation: navigation(layout, ctx),
        redirect,
        body,
    };

    if let Guard::Redirect(to) = guard(&route, ctx) {
        tracing::info!(path = %path, redirect = to, "Route guarded");
        return Ok(page(Some(to), Value::Null));
    }
    tracing::debug!(path = %path, route = ?route, "Rendering route");
    let body = render_body(ctx, &route, now).await?;
    Ok(page(None, body))
}

async fn render_body(ctx: &AppContext, route: &Route, now: DateTime<Utc>) -> AppResult<Value> {
    let t = ctx.translator();
    let backend = ctx.backend();
    let notifier = ctx.notifications();
    let page_size = ctx.config.page_size;

    let body = match route {
        Route::Home => serde_json::to_value(pages::home::home(&t))?,
        Route::About => serde_json::to_value(pages::home::about(&t))?,
        Route::Contact => serde_json::to_value(pages::contact::load(backend, &t).await?)?,
        Route::Inventory { category, sort } => {
            let catalog = Catalog::load(backend, &t, notifier).await?;
            serde_json::to_value(catalog.view(&t, category.as_deref(), *sort))?
        }
        Route::Product { category, slug } => {
            let detail = pages::catalog::product_detail(backend, &t, notifier, category, slug).await?;
            serde_json::to_value(detail)?
        }
        Route::Book => {
            let portal = pages::BookingPortal::load(backend, &t, notifier).await?;
            serde_json::to_value(portal.view(ctx.user()))?
        }
        Route::MyBookings => {
            serde_json::to_value(pages::my_bookings::load(backend, ctx.user(), &t, notifier).await?)?
        }
        Route::Login => serde_json::to_value(pages::auth::customer_login_page(&t))?,
        Route::Register => serde_json::to_value(pages::auth::register_page(&t))?,
        Route::AdminLogin => serde_json::to_value(pages::auth::admin_login_page(&t))?,
        Route::AdminDashboard => {
            serde_json::to_value(views::dashboard::load(backend, &t, notifier, now).await?)?
        }
        Route::AdminCalendar => {
            let to = now + Duration::days(CALENDAR_DAYS);
            serde_json::to_value(views::calendar::load(backend, &t, notifier, now, to).await?)?
        }
        Route::AdminBookings => {
            let mut view = BookingsView::new(t, page_size);
            view.load(backend, notifier).await?;
            serde_json::to_value(view.view())?
        }
        Route::AdminCustomers => {
            let mut view = CustomersView::new(t, page_size);
            view.list.load(backend, notifier).await?;
            serde_json::to_value(view.view())?
        }
        Route::AdminStaff => {
            let mut view = StaffView::new(t, page_size);
            view.list.load(backend, notifier).await?;
            serde_json::to_value(view.view())?
        }
        Route::AdminServices => {
            let mut view = ServicesView::new(t, page_size);
            view.list.load(backend, notifier).await?;
            serde_json::to_value(view.view())?
        }
        Route::AdminInventory => {
            let mut view = InventoryView::new(t, page_size);
            view.list.load(backend, notifier).await?;
            serde_json::to_value(view.view())?
        }
        Route::AdminMessages => {
            let mut view = MessagesView::new(t, page_size);
            view.load(backend, notifier).await?;
            serde_json::to_value(view.view())?
        }
        Route::AdminSettings => {
            let mut view = SettingsView::new(t);
            view.load(backend, notifier).await?;
            serde_json::to_value(view.view())?
        }
        Route::NotFound => serde_json::to_value(not_found(&t))?,
    };
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("/"), Route::Home);
        assert_eq!(resolve("/admin/"), Route::AdminDashboard);
        assert_eq!(resolve("/admin/inventory"), Route::AdminInventory);
        assert_eq!(
            resolve("/product/hair-styling/matte-pomade"),
            Route::Product {
                category: "hair-styling".into(),
                slug: "matte-pomade".into()
            }
        );
        assert_eq!(
            resolve("/inventory?category=Beard+Care&sort=price_desc"),
            Route::Inventory {
                category: Some("Beard Care".into()),
                sort: SortOrder::PriceDesc
            }
        );
        assert_eq!(
            resolve("/inventory?sort=bogus"),
            Route::Inventory {
                category: None,
                sort: SortOrder::Default
            }
        );
        assert_eq!(
            resolve("/inventory?category=Hair+%26+Beard"),
            Route::Inventory {
                category: Some("Hair & Beard".into()),
                sort: SortOrder::Default
            }
        );
        assert_eq!(
            resolve("/product/%D8%B4%D8%B9%D8%B1/matte%20pomade"),
            Route::Product {
                category: "شعر".into(),
                slug: "matte pomade".into()
            }
        );
        assert_eq!(resolve("/admin/nope"), Route::NotFound);
        assert_eq!(resolve("/product/only-one"), Route::NotFound);
    }

    #[test]
    fn test_access_and_layout() {
        assert_eq!(resolve("/book").access(), Access::Public);
        assert_eq!(resolve("/my-bookings").access(), Access::Customer);
        assert_eq!(resolve("/admin/login").layout(), Layout::Standalone);
        assert_eq!(resolve("/admin/settings").layout(), Layout::Admin);
        assert!(!Route::NotFound.needs_session());
    }

    #[tokio::test]
    async fn test_guards_redirect() {
        let ctx = AppContext::from_config(Config::default()).unwrap();
        assert_eq!(guard(&Route::MyBookings, &ctx), Guard::Redirect("/login"));
        assert_eq!(guard(&Route::AdminMessages, &ctx), Guard::Redirect("/admin/login"));
        assert_eq!(guard(&Route::Contact, &ctx), Guard::Allow);

        let page = render(&ctx, "/admin/calendar", Utc::now()).await.unwrap();
        assert_eq!(page.redirect, Some("/admin/login"));
        assert!(page.body.is_null());

        let admin = ctx.sign_in("admin@salon.local", "admin123").await.unwrap();
        assert_eq!(guard(&Route::AdminMessages, &admin), Guard::Allow);
        assert_eq!(guard(&Route::MyBookings, &admin), Guard::Allow);
    }

    #[tokio::test]
    async fn test_render_pages() {
        let ctx = AppContext::from_config(Config::default())
            .unwrap()
            .sign_in("admin@salon.local", "admin123")
            .await
            .unwrap();

        let page = render(&ctx, "/admin/inventory", Utc::now()).await.unwrap();
        assert_eq!(page.layout, Layout::Admin);
        assert_eq!(page.body["rows"].as_array().unwrap().len(), 3);

        let page = render(&ctx, "/inventory?category=Styling&sort=name_asc", Utc::now())
            .await
            .unwrap();
        assert_eq!(page.body["items"][0]["name"], "Matte Pomade");
        assert_eq!(page.body["items"][0]["price"], "$20.00");

        let page = render(&ctx, "/nowhere", Utc::now()).await.unwrap();
        assert_eq!(page.body["title"], "Page Not Found");

        let missing = render(&ctx, "/product/styling/unknown", Utc::now()).await;
        assert!(missing.is_err());
    }
}
