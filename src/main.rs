//! Billing webhooks server.

use std::sync::Arc;

use billing_webhooks::adapters::http::{app_router, WebhookAppState};
use billing_webhooks::adapters::{
    InMemoryOrderSynchronizer, InMemorySubscriptionInvoiceSynchronizer,
    InMemorySubscriptionSynchronizer, TracingReporter,
};
use billing_webhooks::application::{ProcessWebhookHandler, Synchronizers};
use billing_webhooks::config::{AppConfig, LogFormat, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server)?;
    config.validate()?;

    let endpoint = Arc::new(config.webhook.endpoint_config());
    let synchronizers = Synchronizers {
        orders: Arc::new(InMemoryOrderSynchronizer::new(endpoint.tenant_id())),
        invoices: Arc::new(InMemorySubscriptionInvoiceSynchronizer::new()),
        subscriptions: Arc::new(InMemorySubscriptionSynchronizer::new()),
    };
    let handler = ProcessWebhookHandler::new(
        config.webhook.provider.as_str(),
        endpoint.clone(),
        synchronizers,
        Arc::new(TracingReporter),
    )
    .with_tolerance(config.webhook.tolerance_secs);

    let app = app_router(WebhookAppState::new([handler]));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        provider = %config.webhook.provider,
        tenant_id = %endpoint.tenant_id(),
        test_mode = endpoint.is_test_mode(),
        "Billing webhooks listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&server.log_level))?;

    match server.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?,
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining in-flight webhooks");
}
