//! Invoxa API Server
//!
//! Main entry point for the Invoxa backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoxa_api::{AppState, GatewayClient, create_router};
use invoxa_db::connect_with_pool;
use invoxa_shared::{AppConfig, EmailService, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "invoxa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let payments = &config.payments;
    for (gateway, configured) in [
        ("paypal", payments.paypal.is_some()),
        ("paystack", payments.paystack.is_some()),
        ("yoco", payments.yoco.is_some()),
    ] {
        if configured {
            info!(gateway, "Payment gateway configured");
        } else {
            warn!(gateway, "Payment gateway not configured; its routes will fail");
        }
    }
    let gateways = GatewayClient::new().context("Failed to build gateway HTTP client")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        email_service: Arc::new(email_service),
        gateways: Arc::new(gateways),
        config: Arc::new(config),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
