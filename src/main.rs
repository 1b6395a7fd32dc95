use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use mentor_match::config::Settings;
use mentor_match::core::Matcher;
use mentor_match::error::{handle_json_payload_error, handle_path_error, handle_query_payload_error};
use mentor_match::routes::{self, AppState};
use mentor_match::services::{CacheManager, PictureStore, PostgresClient, TokenService};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Settings are read first so they can pick the log level and format;
    // LOG_LEVEL / LOG_FORMAT still win when set
    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or(logging.level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(logging.format);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Mentor Match service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    if settings.auth.jwt_secret == "change-me" {
        tracing::warn!("Using the default JWT secret; set JWT_SECRET outside development");
    }

    // Cache: Redis when reachable, in-process only otherwise
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);
    let cache = Arc::new(
        CacheManager::from_settings(settings.cache.redis_url.as_deref(), l1_cache_size, cache_ttl).await,
    );

    info!(
        "Cache manager initialized (L1: {} entries, TTL: {}s, Redis: {})",
        l1_cache_size,
        cache_ttl,
        cache.has_redis()
    );

    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e)
        })?,
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let tokens = Arc::new(TokenService::new(&settings.auth.jwt_secret, settings.auth.token_ttl_hours));
    let pictures = Arc::new(PictureStore::new(&settings.uploads.dir, settings.uploads.max_picture_bytes));

    info!("Pictures stored under {} (max {} bytes)", settings.uploads.dir, settings.uploads.max_picture_bytes);

    let app_state = AppState {
        postgres,
        cache,
        tokens,
        pictures,
        matcher: Matcher::new(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
