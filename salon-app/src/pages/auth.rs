//! Register, customer login and admin login

use serde::Serialize;
use shared::models::{Customer, CustomerFields};

use crate::core::AppContext;
use crate::forms::{FormError, invalid};
use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};
use crate::utils::validation::{self, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub name: &'static str,
    pub label: String,
    pub placeholder: String,
}

/// Login and register pages
#[derive(Debug, Clone, Serialize)]
pub struct AuthPage {
    pub title: String,
    pub fields: Vec<InputField>,
    pub submit_label: String,
    /// Prompt and link to the other page (`Don't have an account?` / `Sign up`)
    pub alternate: Option<(String, String, &'static str)>,
}

fn field(t: &Translator, name: &'static str, prefix: &str, key: &str) -> InputField {
    InputField {
        name,
        label: t.t(&format!("{prefix}.{key}Label")),
        placeholder: t.t(&format!("{prefix}.{key}Placeholder")),
    }
}

pub fn register_page(t: &Translator) -> AuthPage {
    let p = "auth.register";
    AuthPage {
        title: t.t("auth.register.title"),
        fields: vec![
            field(t, "name", p, "name"),
            field(t, "email", p, "email"),
            field(t, "phone", p, "phone"),
            field(t, "password", p, "password"),
        ],
        submit_label: t.t("auth.register.submitButton"),
        alternate: Some((
            t.t("auth.register.alreadyHaveAccount"),
            t.t("auth.register.signInLink"),
            "/login",
        )),
    }
}

pub fn customer_login_page(t: &Translator) -> AuthPage {
    let p = "auth.customerLogin";
    AuthPage {
        title: t.t("auth.customerLogin.title"),
        fields: vec![field(t, "email", p, "email"), field(t, "password", p, "password")],
        submit_label: t.t("auth.customerLogin.submitButton"),
        alternate: Some((
            t.t("auth.customerLogin.noAccount"),
            t.t("auth.customerLogin.signUpLink"),
            "/register",
        )),
    }
}

pub fn admin_login_page(t: &Translator) -> AuthPage {
    let p = "auth.login";
    AuthPage {
        title: t.t("auth.login.title"),
        fields: vec![field(t, "email", p, "email"), field(t, "password", p, "password")],
        submit_label: t.t("auth.login.submitButton"),
        alternate: None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Name,
    Email,
    Phone,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    name: String,
    email: String,
    phone: String,
    password: String,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: RegisterField, raw: &str) {
        let target = match field {
            RegisterField::Name => &mut self.name,
            RegisterField::Email => &mut self.email,
            RegisterField::Phone => &mut self.phone,
            RegisterField::Password => &mut self.password,
        };
        *target = raw.to_string();
    }

    /// Create the auth account, then the linked customer profile.
    ///
    /// Signs nobody in; the account may still need email confirmation.
    pub async fn submit(&self, ctx: &AppContext) -> Result<Customer, FormError> {
        let t = ctx.translator();
        let notifier = ctx.notifications();

        let (Ok(name), Ok(email)) = (
            validation::required_text(&self.name, MAX_NAME_LEN),
            validation::email(&self.email),
        ) else {
            return Err(invalid(&t, notifier, "auth.register.errorRequiredFields"));
        };
        if self.password.is_empty() {
            return Err(invalid(&t, notifier, "auth.register.errorRequiredFields"));
        }
        let Ok(password) = validation::password(&self.password) else {
            return Err(invalid(&t, notifier, "auth.register.errorPasswordLength"));
        };
        let Ok(phone) = validation::optional_text_max(&self.phone, MAX_SHORT_TEXT_LEN) else {
            return Err(invalid(&t, notifier, "auth.register.errorRequiredFields"));
        };

        let user = match ctx.backend().auth().sign_up(&email, password).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(email = %email, error = %e, "Sign up failed");
                fail(notifier, t.t("auth.register.errorGeneric"));
                return Err(FormError::Backend(e));
            }
        };
        if user.id.is_empty() {
            let message = t.t("auth.register.errorUserIdNotFound");
            fail(notifier, message.clone());
            return Err(FormError::Invalid(message));
        }

        let fields = CustomerFields {
            name,
            email,
            phone,
            auth_user_id: Some(user.id.clone()),
        };
        match ctx.backend().customers().create(&fields).await {
            Ok(customer) => {
                tracing::info!(user_id = %user.id, customer_id = %customer.id, "Customer registered");
                notifier.notify(Notification::success(
                    NotificationCode::Registered,
                    t.t("auth.register.successMessage"),
                ));
                Ok(customer)
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Failed to save customer profile");
                let reason = e.to_string();
                fail(
                    notifier,
                    t.t_with("auth.register.errorProfileSave", &[("message", reason.as_str())]),
                );
                Err(FormError::Backend(e))
            }
        }
    }
}

fn fail(notifier: &dyn Notifier, message: String) {
    notifier.notify(Notification::error(NotificationCode::RegisterFailed, message));
}

fn signed_in(ctx: &AppContext) {
    let email = ctx.user().and_then(|u| u.email.clone()).unwrap_or_default();
    let t = ctx.translator();
    ctx.notifications().notify(Notification::success(
        NotificationCode::SignedIn,
        format!("{} {email}", t.t("navigation.signedInAs")),
    ));
}

/// Sign a customer in, returning the signed-in context
pub async fn customer_login(
    ctx: &AppContext,
    email: &str,
    password: &str,
) -> Result<AppContext, FormError> {
    let session = match ctx.backend().auth().sign_in(email.trim(), password).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(email = %email, error = %e, "Customer sign in failed");
            let message = ctx.translator().t("auth.customerLogin.errorGeneric");
            ctx.notifications()
                .notify(Notification::error(NotificationCode::SignInFailed, message));
            return Err(FormError::Backend(e));
        }
    };
    let ctx = ctx.clone().signed_in(session);
    signed_in(&ctx);
    Ok(ctx)
}

/// Sign an admin in. Accounts without the admin role are signed out again.
pub async fn admin_login(
    ctx: &AppContext,
    email: &str,
    password: &str,
) -> Result<AppContext, FormError> {
    let session = match ctx.backend().auth().sign_in(email.trim(), password).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(email = %email, error = %e, "Admin sign in failed");
            let message = ctx.translator().t("auth.login.errorUnknown");
            ctx.notifications()
                .notify(Notification::error(NotificationCode::SignInFailed, message));
            return Err(FormError::Backend(e));
        }
    };

    let signed = ctx.clone().signed_in(session);
    if !signed.is_admin() {
        tracing::warn!(email = %email, "Admin login rejected, account lacks admin role");
        signed.sign_out().await;
        let message = ctx.translator().t("auth.login.errorNotAdmin");
        ctx.notifications().notify(Notification::error(
            NotificationCode::SignInFailed,
            message.clone(),
        ));
        return Err(FormError::Invalid(message));
    }
    signed_in(&signed);
    Ok(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::i18n::TranslationStore;
    use salon_client::{Backend, Call, MemoryBackend, auth::ADMIN_ROLE};
    use std::sync::Arc;

    fn context(backend: &MemoryBackend) -> AppContext {
        AppContext::new(
            Config::default(),
            Arc::new(backend.clone()) as Arc<dyn Backend>,
            Arc::new(TranslationStore::embedded().unwrap()),
        )
    }

    fn filled() -> RegisterForm {
        let mut form = RegisterForm::new();
        form.set_field(RegisterField::Name, "Lina");
        form.set_field(RegisterField::Email, "lina@example.com");
        form.set_field(RegisterField::Password, "secret1");
        form
    }

    #[tokio::test]
    async fn test_register_links_customer() {
        let backend = MemoryBackend::default();
        let ctx = context(&backend);

        let customer = filled().submit(&ctx).await.unwrap();
        let user_id = customer.auth_user_id.clone().unwrap();
        assert!(!user_id.is_empty());
        assert_eq!(backend.rows::<Customer>().unwrap().len(), 1);
        assert_eq!(
            ctx.notifications().last().unwrap().code,
            NotificationCode::Registered
        );
    }

    #[tokio::test]
    async fn test_register_validation() {
        let backend = MemoryBackend::default();
        let ctx = context(&backend);

        let mut form = filled();
        form.set_field(RegisterField::Password, "12345");
        let err = form.submit(&ctx).await.unwrap_err();
        assert!(matches!(err, FormError::Invalid(msg) if msg == "Password must be at least 6 characters."));

        form.set_field(RegisterField::Email, "not-an-email");
        let err = form.submit(&ctx).await.unwrap_err();
        assert!(matches!(err, FormError::Invalid(msg) if msg.starts_with("Please fill in")));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_register_profile_failure() {
        let backend = MemoryBackend::default();
        backend.fail_writes("customers", true);
        let ctx = context(&backend);

        assert!(filled().submit(&ctx).await.is_err());
        let last = ctx.notifications().last().unwrap();
        assert_eq!(last.code, NotificationCode::RegisterFailed);
        assert!(last.message.starts_with("Account created, but failed to save profile:"));
        assert!(backend.calls().contains(&Call::SignUp {
            email: "lina@example.com".into()
        }));
    }

    #[tokio::test]
    async fn test_admin_login_requires_role() {
        let backend = MemoryBackend::default();
        backend.add_user("boss@example.com", "secret1", Some(ADMIN_ROLE));
        backend.add_user("lina@example.com", "secret1", None);

        let ctx = context(&backend);

        let err = admin_login(&ctx, "lina@example.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::Invalid(msg) if msg == "This account does not have admin access."));
        assert!(backend.calls().contains(&Call::SignOut));

        let admin = admin_login(&ctx, "boss@example.com", "secret1").await.unwrap();
        assert!(admin.is_admin());
        assert!(!ctx.is_signed_in());
    }

    #[tokio::test]
    async fn test_customer_login_failure() {
        let backend = MemoryBackend::default();
        let ctx = context(&backend);
        assert!(customer_login(&ctx, "x@example.com", "nope").await.is_err());
        assert_eq!(
            ctx.notifications().last().unwrap().message,
            "Failed to log in. Please check your credentials."
        );
    }
}
