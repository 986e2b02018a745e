use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod db;
mod model;
mod service;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize application");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let db_pool = web::Data::new(state.db_pool.as_ref().clone());
    let eligibility_service = web::Data::new(state.eligibility_service);
    let checklist_service = web::Data::new(state.checklist_service);
    let knowledge_service = web::Data::new(state.knowledge_service);
    let analytics_service = web::Data::new(state.analytics_service);

    tracing::info!("Starting eligibility engine on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db_pool.clone())
            .app_data(eligibility_service.clone())
            .app_data(checklist_service.clone())
            .app_data(knowledge_service.clone())
            .app_data(analytics_service.clone())
            .configure(api::eligibility::configure)
            .configure(api::checklist::configure)
            .configure(api::routes::configure)
            .configure(api::analytics::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
