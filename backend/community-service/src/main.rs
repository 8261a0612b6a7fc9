use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use community_service::db::{PgContentStore, PgIdentityDirectory, PgReactionStore};
use community_service::middleware::JwtAuth;
use community_service::storage::S3MediaStorage;
use community_service::{handlers, AppState, Config};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health(pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "community-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "community-service"
        })),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("info,community_service=debug")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    let aws_config = aws_config::load_from_env().await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);

    let state = AppState::new(
        Arc::new(PgContentStore::new(pool.clone())),
        Arc::new(PgReactionStore::new(pool.clone())),
        Arc::new(PgIdentityDirectory::new(pool.clone())),
        Arc::new(S3MediaStorage::new(s3_client, &config.media)),
    );

    let bind_addr = (config.app.host.clone(), config.app.port);
    tracing::info!(host = %config.app.host, port = config.app.port, "starting community-service");

    let allowed_origins = config.cors.allowed_origins.clone();
    let jwt_secret = config.auth.jwt_secret.clone();

    HttpServer::new(move || {
        let cors = if allowed_origins == "*" {
            Cors::permissive()
        } else {
            let mut cors = Cors::default()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);
            for origin in allowed_origins.split(',') {
                cors = cors.allowed_origin(origin.trim());
            }
            cors
        };

        App::new()
            .wrap(TracingLogger::default())
            .wrap(JwtAuth::new(&jwt_secret))
            .wrap(cors)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(state.clone()))
            .route("/health", web::get().to(health))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
