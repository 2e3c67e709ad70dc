use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use dealer_backoffice::config::environment::EnvironmentConfig;
use dealer_backoffice::database::connection::create_pool;
use dealer_backoffice::middleware::auth::auth_middleware;
use dealer_backoffice::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use dealer_backoffice::routes;
use dealer_backoffice::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🏍️ Dealer Back Office - Booking & Documents API");
    info!("================================================");

    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Database connection failed: {}", e);
            return Err(anyhow::anyhow!("Database error: {}", e));
        }
    };
    info!("✅ Database connected");

    let config = EnvironmentConfig::default();
    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };
    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(pool, config);

    // Sweep expired, unverified OTP codes in the background
    let otp_store = app_state.otp_store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            otp_store.cleanup_expired().await;
        }
    });

    let protected = Router::new()
        .nest("/api", routes::reference_routes::create_reference_router())
        .nest("/api/bookings", routes::booking_routes::create_booking_router())
        .nest("/api/brokers", routes::broker_routes::create_broker_router())
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/documents", routes::document_routes::create_document_router())
        .route_layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .merge(protected)
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Server starting on http://{}", addr);
    info!("🔍 Available endpoints:");
    info!("   GET  /health - Health check");
    info!("🔐 Auth:");
    info!("   POST /api/auth/login - Sign in");
    info!("📚 Reference data:");
    info!("   GET  /api/branches - List branches");
    info!("   GET  /api/branches/:id/sales-executives - Active executives");
    info!("   GET  /api/models?customer_type= - Models for a customer type");
    info!("   GET  /api/models/:id/price-sheet - Model price sheet");
    info!("   GET  /api/models/:id/colors - Model colors");
    info!("   GET  /api/models/:id/accessories - Model accessories");
    info!("   GET  /api/accessories - All accessories");
    info!("   GET  /api/financers - Financers");
    info!("   GET  /api/declarations?form_type= - Declaration texts");
    info!("📝 Bookings:");
    info!("   POST /api/bookings - Submit booking");
    info!("   POST /api/bookings/validate-stage - Validate one wizard stage");
    info!("   GET  /api/bookings/:id - Fetch booking");
    info!("   PUT  /api/bookings/:id - Re-submit booking");
    info!("   PUT  /api/bookings/:id/assign-vehicle - Allot stock vehicle");
    info!("   GET  /api/bookings/by-chassis/:chassis - Booking by chassis");
    info!("   GET  /api/bookings/search/customers?q= - Debounced customer search");
    info!("🤝 Brokers:");
    info!("   GET  /api/brokers?branch_id= - Exchange brokers");
    info!("   POST /api/brokers/send-otp - Send broker OTP");
    info!("   POST /api/brokers/verify-otp - Verify broker OTP");
    info!("   GET  /api/brokers/:id/otp-status - OTP handshake state");
    info!("🏍️ Stock:");
    info!("   POST /api/vehicles - Inward stock entry");
    info!("   GET  /api/vehicles?branch_id= - Stock list");
    info!("   GET  /api/vehicles/:id - Fetch vehicle");
    info!("   GET  /api/vehicles/by-chassis/:chassis - Vehicle by chassis");
    info!("   POST /api/vehicles/transfers - Dispatch stock transfer");
    info!("   PUT  /api/vehicles/transfers/:id/receive - Receive transfer");
    info!("🖨️ Documents:");
    info!("   GET  /api/documents/deal-form/:booking_id - Deal form");
    info!("   GET  /api/documents/deal-form/by-chassis/:chassis - Deal form by chassis");
    info!("   GET  /api/documents/helmet-invoice/:booking_id - Helmet invoice");
    info!("   GET  /api/documents/accessories-invoice/:booking_id - Accessories invoice");
    info!("   GET  /api/documents/challan/:transfer_id - Delivery challan");
    info!("   GET  /api/documents/day-book?date= - Day book");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            anyhow::anyhow!("Server error: {}", e)
        })?;

    info!("👋 Server stopped");
    Ok(())
}

async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "dealer_backoffice",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
