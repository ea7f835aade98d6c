use anyhow::Context;
use chrono::Utc;
use salon_app::core::context::{DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD};
use salon_app::{AppContext, render, resolve, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging) and configuration
    let config = setup_environment()?;

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    tracing::info!(path = %path, "Salon app starting");

    // 2. Context: hosted backend, or the in-memory demo
    let mut ctx = AppContext::from_config(config).context("failed to build application context")?;

    // 3. Sign in when the route needs a session
    if resolve(&path).needs_session() {
        let credentials = ctx
            .config
            .credentials()
            .map(|(email, password)| (email.to_string(), password.to_string()));
        match credentials {
            Some((email, password)) => {
                ctx = ctx
                    .sign_in(&email, &password)
                    .await
                    .context("sign in with SALON_EMAIL/SALON_PASSWORD failed")?;
            }
            None if ctx.config.backend_url.is_none() => {
                ctx = ctx
                    .sign_in(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD)
                    .await
                    .context("demo sign in failed")?;
            }
            None => tracing::warn!("Route requires a session but no credentials are configured"),
        }
    }

    // 4. Render
    let page = render(&ctx, &path, Utc::now()).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
