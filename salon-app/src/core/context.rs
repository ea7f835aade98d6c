use std::sync::Arc;

use chrono::NaiveTime;
use salon_client::{
    AuthUser, Backend, HttpClient, MemoryBackend, Session, StorageNamespace, auth::ADMIN_ROLE,
};
use shared::models::{
    Currency, OperatingHours, Product, SalonSettings, Service, Setting, Staff,
};

use crate::core::{AppError, AppResult, Config};
use crate::i18n::{Locale, TranslationStore, Translator};
use crate::notify::NotificationCenter;

/// Admin account of the in-memory demo backend
pub const DEMO_ADMIN_EMAIL: &str = "admin@salon.local";
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";

/// Application context - shared references to every service
///
/// Cheap to clone. Pages and views receive it explicitly; nothing is global.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | Configuration (immutable) |
/// | root | Anonymous backend handle |
/// | backend | Handle acting for the signed-in user (same as `root` when signed out) |
/// | translations | Loaded catalogs (read-only) |
/// | notifications | Toast log |
/// | session | Current auth session |
/// | locale | Current UI locale |
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    root: Arc<dyn Backend>,
    backend: Arc<dyn Backend>,
    translations: Arc<TranslationStore>,
    notifications: Arc<NotificationCenter>,
    session: Option<Session>,
    locale: Locale,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("locale", &self.locale)
            .field("signed_in", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    pub fn new(config: Config, backend: Arc<dyn Backend>, translations: Arc<TranslationStore>) -> Self {
        Self {
            locale: config.default_locale,
            config,
            root: backend.clone(),
            backend,
            translations,
            notifications: Arc::new(NotificationCenter::new()),
            session: None,
        }
    }

    /// Build the context from configuration.
    ///
    /// With `BACKEND_URL` set this talks to the hosted backend; otherwise it
    /// runs against a seeded in-memory backend.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let translations = Arc::new(TranslationStore::embedded()?);
        let backend: Arc<dyn Backend> = match config.client_config() {
            Some(client_config) => {
                tracing::info!(url = %client_config.base_url, "Using hosted backend");
                Arc::new(HttpClient::new(&client_config)?)
            }
            None => {
                tracing::info!("BACKEND_URL not set, using in-memory demo backend");
                let memory = MemoryBackend::new(StorageNamespace::new(
                    config.storage_root(),
                    config.storage_bucket.as_str(),
                ));
                seed_demo(&memory, &config)?;
                Arc::new(memory)
            }
        };
        Ok(Self::new(config, backend, translations))
    }

    /// Gateway for the current user
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.translations.clone(), self.locale)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(AuthUser::is_admin)
    }

    /// Switch to acting on behalf of `session`
    pub fn signed_in(mut self, session: Session) -> Self {
        tracing::info!(user_id = %session.user.id, admin = session.user.is_admin(), "Signed in");
        self.backend = self.root.with_session(&session);
        self.session = Some(session);
        self
    }

    /// Sign out remotely (best effort) and drop the session
    pub async fn sign_out(mut self) -> Self {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.root.auth().sign_out(&session).await {
                tracing::warn!(error = %e, "Remote sign out failed");
            }
        }
        self.backend = self.root.clone();
        self
    }

    /// Sign in with email and password
    pub async fn sign_in(self, email: &str, password: &str) -> AppResult<Self> {
        let session = self.root.auth().sign_in(email, password).await?;
        Ok(self.signed_in(session))
    }

    /// Require a signed-in user
    pub fn require_user(&self) -> AppResult<&AuthUser> {
        self.user().ok_or(AppError::Unauthorized)
    }

    /// Require a signed-in admin
    pub fn require_admin(&self) -> AppResult<&AuthUser> {
        let user = self.require_user()?;
        if !user.is_admin() {
            return Err(AppError::Forbidden);
        }
        Ok(user)
    }
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Demo data for the in-memory backend
fn seed_demo(memory: &MemoryBackend, config: &Config) -> AppResult<()> {
    let (email, password) = config
        .credentials()
        .unwrap_or((DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD));
    memory.add_user(email, password, Some(ADMIN_ROLE));

    let service = |id: &str, name: &str, minutes: i32, price: &str, category: &str| Service {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        duration_minutes: minutes,
        price: price.parse().unwrap_or_default(),
        category: Some(category.to_string()),
        is_active: true,
    };
    memory.seed([
        service("1", "Haircut", 30, "15", "Hair"),
        service("2", "Beard Trim", 20, "10", "Beard"),
        service("3", "Haircut & Beard", 45, "22", "Hair"),
    ])?;

    memory.seed(["Sami", "Omar"].into_iter().enumerate().map(|(i, name)| Staff {
        id: (i + 1).to_string(),
        name: name.to_string(),
        phone: None,
        bio: None,
        is_active: true,
    }))?;

    let product = |id: &str, name: &str, category: &str, price: &str, discount: Option<&str>, quantity: i64| Product {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        brand: Some("Manos".to_string()),
        category: Some(category.to_string()),
        purchase_price: None,
        original_price: price.parse().ok(),
        discount_percentage: discount.and_then(|d| d.parse().ok()),
        currency: Currency::Usd,
        quantity_on_hand: quantity,
        reorder_level: Some(3),
        image_url: None,
    };
    memory.seed([
        product("1", "Matte Pomade", "Styling", "25.00", Some("20"), 10),
        product("2", "Beard Oil", "Beard Care", "18.00", None, 2),
        product("3", "Sea Salt Spray", "Styling", "14.50", Some("10"), 6),
    ])?;

    let mut hours = OperatingHours::default();
    hours.saturday.end = time(16, 0);
    let settings = SalonSettings {
        salon_name: "Manos Barber Shop".to_string(),
        phone: "+963 11 000 0000".to_string(),
        address: "Damascus".to_string(),
        operating_hours: hours,
    };
    let rows: Vec<Setting> = settings
        .to_rows()
        .map_err(|e| AppError::Config(format!("demo settings: {e}")))?;
    memory.seed(rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_context_signs_in_admin() {
        let ctx = AppContext::from_config(Config::default()).unwrap();
        assert!(!ctx.is_signed_in());
        assert!(matches!(ctx.require_admin(), Err(AppError::Unauthorized)));

        let ctx = ctx
            .sign_in(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD)
            .await
            .unwrap();
        assert!(ctx.is_admin());
        assert_eq!(ctx.backend().products().list(None).await.unwrap().len(), 3);

        let ctx = ctx.sign_out().await;
        assert!(ctx.session().is_none());
    }

    #[test]
    fn test_locale_switch() {
        let ctx = AppContext::from_config(Config::default())
            .unwrap()
            .with_locale(Locale::Ar);
        assert_eq!(ctx.translator().locale(), Locale::Ar);
    }
}
